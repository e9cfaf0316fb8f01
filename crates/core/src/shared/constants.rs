/// Side length of the square tiles used for skin aggregation.
pub const DEFAULT_BLOCK_SIZE: u32 = 50;

/// A block is a candidate only above this skin-pixel ratio...
pub const DEFAULT_MIN_SKIN_RATIO: f64 = 0.3;

/// ...and above this absolute skin-pixel count.
pub const DEFAULT_MIN_SKIN_PIXELS: u32 = 100;

/// Merged regions at or below this confidence are discarded.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.4;

/// Merged regions at or below this area (px²) are discarded.
pub const DEFAULT_MIN_AREA: i64 = 1000;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

pub const SETTINGS_DIR_NAME: &str = "FaceCheck";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
