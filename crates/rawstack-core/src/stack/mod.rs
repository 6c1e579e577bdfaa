pub mod exposure;
pub mod merge;
pub mod operator;

pub use exposure::ExposureRecord;
pub use merge::{run_merge, LevelClause, MergeCommand};
pub use operator::StackOperator;
