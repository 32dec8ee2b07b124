// * Configuration Constants
// * Central location for scoring weights, artifact names and default locations

// * Composite score weights
pub const RAM_WEIGHT: f64 = 3.0;
pub const STORAGE_DIVISOR: f64 = 64.0;
pub const BATTERY_DIVISOR: f64 = 1500.0;
pub const CAMERA_DIVISOR: f64 = 12.0;
pub const DISPLAY_WEIGHT: f64 = 0.5;

// * Currency unit used to normalise the value metric
pub const VALUE_CURRENCY_UNIT: f64 = 100_000.0;

// * Default pipeline directories
pub const DEFAULT_RAW_DIR: &str = "data/raw";
pub const DEFAULT_CLEAN_DIR: &str = "data/clean";
pub const DEFAULT_PROCESSED_DIR: &str = "data/processed";
pub const DEFAULT_COMBINED_FILE: &str = "all_brands_20k.csv";

// * File naming conventions for brand batches
pub const RAW_EXTENSION: &str = "json";
pub const RAW_STEM_MARKER: &str = "_raw";
pub const CLEAN_STEM_MARKER: &str = "_clean";
pub const CLEAN_FILE_SUFFIX: &str = "_clean.csv";

// * Default number of rows in the top-N report
pub const DEFAULT_TOP_N: usize = 10;
