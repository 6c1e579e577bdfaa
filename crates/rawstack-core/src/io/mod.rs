pub mod cleanup;
pub mod discover;
mod run_log;

pub use cleanup::{clean_stale_artifacts, remove_rasters};
pub use discover::{check_unique_stems, discover_frames, is_raw_file};
pub use run_log::RunLog;
