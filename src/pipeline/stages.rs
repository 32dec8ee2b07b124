// * Pipeline Stages
// * clean:   <raw_dir>/<brand>_raw.json  -> <clean_dir>/<brand>_clean.csv
// * combine: <clean_dir>/*_clean.csv     -> <processed_dir>/<combined_file>
// * score:   combined file rewritten in place with score columns

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::constants::{CLEAN_FILE_SUFFIX, CLEAN_STEM_MARKER, RAW_EXTENSION, RAW_STEM_MARKER};
use crate::config::PipelineConfig;
use crate::errors::PipelineError;
use crate::persistence::combiner::{combine, BrandBatch};
use crate::persistence::ranker::top_n;
use crate::persistence::schema::{CleanRecord, ScoredRecord};
use crate::persistence::scorer::score;
use crate::persistence::tabular::{
    read_clean_csv, read_corpus_csv, read_raw_batch, read_scored_csv, write_clean_csv, write_corpus_csv,
    write_scored_csv,
};
use crate::refinery::cleaner::clean_batch;

/// Result of cleaning one brand file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandOutcome {
    pub brand: String,
    pub rows: usize,
    pub path: PathBuf,
}

/// Result of the clean stage; empty when no raw files were found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub brands: Vec<BrandOutcome>,
}

impl CleanSummary {
    pub fn total_rows(&self) -> usize {
        self.brands.iter().map(|b| b.rows).sum()
    }
}

/// Result of the combine stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineSummary {
    /// Brands in the order they were combined
    pub brands: Vec<String>,
    pub rows: usize,
    pub path: PathBuf,
}

/// Result of the score stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSummary {
    pub rows: usize,
    /// Rows that could not be scored because a feature was missing
    pub unscored: usize,
    pub path: PathBuf,
}

fn ensure_dir(dir: &Path) -> Result<(), PipelineError> {
    fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))
}

/// Lists the files in `dir` whose names satisfy `keep`, sorted by file name
fn list_files<F>(dir: &Path, keep: F) -> Result<Vec<PathBuf>, PipelineError>
where
    F: Fn(&str) -> bool,
{
    let entries = fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::io(dir, e))?;
        let path = entry.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| keep(name));
        if matches && path.is_file() {
            files.push(path);
        }
    }

    // * Directory order is platform dependent; dedup needs a stable brand order
    files.sort();
    Ok(files)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Brand id of a raw file: `samsung_raw.json` -> `samsung`
pub fn brand_from_raw_file(path: &Path) -> String {
    file_stem(path).replace(RAW_STEM_MARKER, "")
}

/// Brand id of a clean file: `samsung_clean.csv` -> `samsung`
pub fn brand_from_clean_file(path: &Path) -> String {
    file_stem(path).replace(CLEAN_STEM_MARKER, "")
}

/// Reads and cleans one raw brand file without writing anything
fn clean_raw_file(raw_path: &Path) -> Result<(String, Vec<CleanRecord>), PipelineError> {
    let brand = brand_from_raw_file(raw_path);
    info!(brand = %brand, "Cleaning brand");

    let listings = read_raw_batch(raw_path)?;
    let batch_name = raw_path.display().to_string();
    let records = clean_batch(&batch_name, &listings)?;
    Ok((brand, records))
}

fn save_clean(brand: String, records: &[CleanRecord], clean_dir: &Path) -> Result<BrandOutcome, PipelineError> {
    let path = clean_dir.join(format!("{brand}{CLEAN_FILE_SUFFIX}"));
    write_clean_csv(&path, records)?;
    info!(path = %path.display(), rows = records.len(), "Saved clean dataset");

    Ok(BrandOutcome {
        brand,
        rows: records.len(),
        path,
    })
}

/// Cleans one raw brand file into `clean_dir`
pub fn clean_file(raw_path: &Path, clean_dir: &Path) -> Result<BrandOutcome, PipelineError> {
    let (brand, records) = clean_raw_file(raw_path)?;
    save_clean(brand, &records, clean_dir)
}

/// Cleans every raw JSON file.
///
/// Every brand is cleaned in memory before any file is written, so a
/// structural error in one brand leaves the clean directory untouched.
pub fn run_clean(config: &PipelineConfig) -> Result<CleanSummary, PipelineError> {
    ensure_dir(&config.clean_dir)?;

    let raw_files = list_files(&config.raw_dir, |name| {
        Path::new(name)
            .extension()
            .is_some_and(|ext| ext == RAW_EXTENSION)
    })?;
    if raw_files.is_empty() {
        warn!(dir = %config.raw_dir.display(), "No raw JSON files found");
        return Ok(CleanSummary::default());
    }

    let cleaned = raw_files
        .iter()
        .map(|path| clean_raw_file(path))
        .collect::<Result<Vec<_>, _>>()?;

    let mut summary = CleanSummary::default();
    for (brand, records) in cleaned {
        summary.brands.push(save_clean(brand, &records, &config.clean_dir)?);
    }

    info!(files = summary.brands.len(), rows = summary.total_rows(), "Cleaning complete");
    Ok(summary)
}

/// Combines every clean brand file into the combined dataset.
///
/// Returns `None` (and writes nothing) when there are no clean files.
pub fn run_combine(config: &PipelineConfig) -> Result<Option<CombineSummary>, PipelineError> {
    ensure_dir(&config.processed_dir)?;

    let clean_files = list_files(&config.clean_dir, |name| name.ends_with(CLEAN_FILE_SUFFIX))?;
    if clean_files.is_empty() {
        warn!(dir = %config.clean_dir.display(), "No cleaned CSV files found; run the clean stage first");
        return Ok(None);
    }

    let mut batches = Vec::with_capacity(clean_files.len());
    for path in &clean_files {
        let records = read_clean_csv(path)?;
        batches.push(BrandBatch::new(brand_from_clean_file(path), records));
    }

    let corpus = combine(&batches);
    let path = config.combined_path();
    write_corpus_csv(&path, &corpus)?;
    info!(path = %path.display(), rows = corpus.len(), "Combined dataset saved");

    Ok(Some(CombineSummary {
        brands: batches.into_iter().map(|b| b.brand).collect(),
        rows: corpus.len(),
        path,
    }))
}

/// Adds score columns to the combined dataset, rewriting it in place
pub fn run_score(config: &PipelineConfig) -> Result<ScoreSummary, PipelineError> {
    let path = config.combined_path();
    let corpus = read_corpus_csv(&path)?;
    let scored = score(&corpus)?;
    write_scored_csv(&path, &scored)?;

    let unscored = scored.iter().filter(|s| s.composite_score.is_none()).count();
    info!(path = %path.display(), rows = scored.len(), unscored = unscored, "Scoring complete");

    Ok(ScoreSummary {
        rows: scored.len(),
        unscored,
        path,
    })
}

/// Loads the scored dataset and returns its `n` best-value rows
pub fn run_top(config: &PipelineConfig, n: usize) -> Result<Vec<ScoredRecord>, PipelineError> {
    let scored = read_scored_csv(&config.combined_path())?;
    Ok(top_n(&scored, n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_from_file_names() {
        assert_eq!(brand_from_raw_file(Path::new("data/raw/samsung_raw.json")), "samsung");
        assert_eq!(brand_from_raw_file(Path::new("oneplus.json")), "oneplus");
        assert_eq!(brand_from_clean_file(Path::new("data/clean/vivo_clean.csv")), "vivo");
    }

    #[test]
    fn test_list_files_sorted_and_filtered() {
        let dir = std::env::temp_dir().join(format!("phone_refinery_stages_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("nested.json")).unwrap();
        for name in ["b_raw.json", "a_raw.json", "notes.txt"] {
            fs::write(dir.join(name), "[]").unwrap();
        }

        let files = list_files(&dir, |n| n.ends_with(".json")).unwrap();
        let names: Vec<_> = files.iter().map(|p| file_stem(p)).collect();
        assert_eq!(names, vec!["a_raw", "b_raw"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_raw_dir_is_io_error() {
        let dir = std::env::temp_dir().join(format!("phone_refinery_missing_{}", std::process::id()));
        let config = PipelineConfig::rooted_at(&dir);

        let err = run_clean(&config).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));

        let _ = fs::remove_dir_all(&dir);
    }
}
