// * Pipeline Orchestrator
// * Runs clean -> combine -> score as in-process calls and inspects each typed outcome.

pub mod stages;

pub use stages::{
    brand_from_clean_file, brand_from_raw_file, clean_file, run_clean, run_combine, run_score, run_top,
    BrandOutcome, CleanSummary, CombineSummary, ScoreSummary,
};

use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::errors::PipelineError;

/// Outcome of a full pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub clean: CleanSummary,
    pub combine: Option<CombineSummary>,
    /// `None` when scoring was skipped because no combined dataset exists
    pub score: Option<ScoreSummary>,
}

impl RunReport {
    pub fn scored(&self) -> bool {
        self.score.is_some()
    }
}

/// Runs every stage in order.
///
/// When the combine stage produced nothing, or its dataset is missing, the
/// condition is reported and scoring is skipped; it is not an error. A
/// combined file left over from an earlier run is never rescored.
/// Structural errors abort the run.
pub fn run_pipeline(config: &PipelineConfig) -> Result<RunReport, PipelineError> {
    info!("Starting phone data pipeline");

    let clean = run_clean(config)?;
    let combine = run_combine(config)?;

    let score = match &combine {
        Some(summary) if summary.path.is_file() => {
            info!("Adding composite and value scores");
            Some(run_score(config)?)
        }
        _ => {
            warn!(path = %config.combined_path().display(), "Combined dataset not found; skipping scoring");
            None
        }
    };

    info!(scored = score.is_some(), "Pipeline finished");
    Ok(RunReport { clean, combine, score })
}
