/// Raw file extensions picked up by frame discovery (compared case-insensitively).
pub const RAW_EXTENSIONS: [&str; 14] = [
    "dng", "crw", "cr2", "cr3", "raw", "raf", "3fr", "fff", "rwl", "new", "nrw", "pef", "arw",
    "nef",
];

/// Extension of the common raw container every frame is normalized into.
pub const DNG_EXTENSION: &str = "dng";

/// Extension of the per-frame rasters the compositor reads.
pub const RASTER_EXTENSION: &str = "tif";

/// Merged raster produced by the compositor, renamed to [`TEMP_DNG`] before rebuild.
pub const TEMP_TIF: &str = "temp.tif";

/// Pre-validation DNG. Left on disk when validation fails.
pub const TEMP_DNG: &str = "temp.dng";

/// Exposure side-record written by earlier runs of the stacker.
pub const TEMP_XMP: &str = "temp.xmp";

/// Suffix of the opcode-stripped copy used to render a frame's raster.
pub const STRIPPED_SUFFIX: &str = "-temp";

/// Default run log file name, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "rawstack.log";

/// Default number of frames normalized concurrently.
pub const DEFAULT_JOBS: usize = 1;

/// Default executable names, resolved through `PATH`.
pub const DEFAULT_DNG_CONVERTER: &str = "Adobe DNG Converter";
pub const DEFAULT_EXIFTOOL: &str = "exiftool";
pub const DEFAULT_DNG_VALIDATE: &str = "dng_validate";
pub const DEFAULT_COMPOSITOR: &str = "convert";
