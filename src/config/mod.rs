// * Pipeline Configuration
// * Every stage receives its paths explicitly; nothing relies on the working directory.

pub mod constants;

use std::path::{Path, PathBuf};

use self::constants::{DEFAULT_CLEAN_DIR, DEFAULT_COMBINED_FILE, DEFAULT_PROCESSED_DIR, DEFAULT_RAW_DIR};

/// Locations of the raw, intermediate and combined artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Directory holding one `<brand>_raw.json` file per brand
    pub raw_dir: PathBuf,
    /// Directory receiving `<brand>_clean.csv` files
    pub clean_dir: PathBuf,
    /// Directory receiving the combined (and later scored) dataset
    pub processed_dir: PathBuf,
    /// File name of the combined dataset inside `processed_dir`
    pub combined_file: String,
}

impl PipelineConfig {
    /// Creates a configuration rooted at `base` using the default sub-directories
    pub fn rooted_at(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            raw_dir: base.join(DEFAULT_RAW_DIR),
            clean_dir: base.join(DEFAULT_CLEAN_DIR),
            processed_dir: base.join(DEFAULT_PROCESSED_DIR),
            combined_file: DEFAULT_COMBINED_FILE.to_string(),
        }
    }

    pub fn with_raw_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.raw_dir = dir.into();
        self
    }

    pub fn with_clean_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.clean_dir = dir.into();
        self
    }

    pub fn with_processed_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.processed_dir = dir.into();
        self
    }

    pub fn with_combined_file(mut self, name: impl Into<String>) -> Self {
        self.combined_file = name.into();
        self
    }

    /// Full path of the combined dataset
    pub fn combined_path(&self) -> PathBuf {
        self.processed_dir.join(&self.combined_file)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from(DEFAULT_RAW_DIR),
            clean_dir: PathBuf::from(DEFAULT_CLEAN_DIR),
            processed_dir: PathBuf::from(DEFAULT_PROCESSED_DIR),
            combined_file: DEFAULT_COMBINED_FILE.to_string(),
        }
    }
}
