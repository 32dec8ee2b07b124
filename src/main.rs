use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use phone_refinery::config::constants::{
    DEFAULT_CLEAN_DIR, DEFAULT_COMBINED_FILE, DEFAULT_PROCESSED_DIR, DEFAULT_RAW_DIR, DEFAULT_TOP_N,
};
use phone_refinery::ops::telemetry::{self, LogFormat};
use phone_refinery::pipeline;
use phone_refinery::PipelineConfig;

#[derive(Parser, Debug)]
#[command(
    name = "phone-refinery",
    about = "Clean, combine and score smartphone specification listings"
)]
struct Cli {
    /// Directory holding one `<brand>_raw.json` file per brand.
    #[arg(long, global = true, default_value = DEFAULT_RAW_DIR)]
    raw_dir: PathBuf,

    /// Directory for per-brand `<brand>_clean.csv` files.
    #[arg(long, global = true, default_value = DEFAULT_CLEAN_DIR)]
    clean_dir: PathBuf,

    /// Directory for the combined dataset.
    #[arg(long, global = true, default_value = DEFAULT_PROCESSED_DIR)]
    processed_dir: PathBuf,

    /// File name of the combined dataset inside the processed directory.
    #[arg(long, global = true, default_value = DEFAULT_COMBINED_FILE)]
    combined_file: String,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format: json or pretty.
    #[arg(long, global = true, default_value = "json")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean every raw brand file into a per-brand CSV.
    Clean,
    /// Combine the per-brand CSVs into one deduplicated dataset.
    Combine,
    /// Add composite_score and value_per_100k to the combined dataset.
    Score,
    /// Run clean, combine and score in order.
    Run,
    /// Print the best-value phones from the scored dataset.
    Top {
        /// Number of rows to print.
        #[arg(short, long, default_value_t = DEFAULT_TOP_N)]
        n: usize,
    },
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_raw_dir(&self.raw_dir)
            .with_clean_dir(&self.clean_dir)
            .with_processed_dir(&self.processed_dir)
            .with_combined_file(&self.combined_file)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::try_init(cli.log_format, &cli.log_level);

    let config = cli.pipeline_config();

    match cli.command {
        Command::Clean => {
            pipeline::run_clean(&config).context("clean stage failed")?;
        }
        Command::Combine => {
            pipeline::run_combine(&config).context("combine stage failed")?;
        }
        Command::Score => {
            pipeline::run_score(&config).context("score stage failed")?;
        }
        Command::Run => {
            let report = pipeline::run_pipeline(&config).context("pipeline run failed")?;
            if !report.scored() {
                println!("Combined dataset not found. Run the combine stage manually.");
            }
        }
        Command::Top { n } => {
            let ranked = pipeline::run_top(&config, n).context("ranking failed")?;
            println!("{:<4} {:<12} {:<40} {:>10} {:>14}", "#", "brand", "name", "price", "value_per_100k");
            for (rank, record) in ranked.iter().enumerate() {
                let value = record
                    .value_per_100k
                    .map(|v| format!("{v:.2}"))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<4} {:<12} {:<40} {:>10} {:>14}",
                    rank + 1,
                    record.brand(),
                    record.name(),
                    record.price(),
                    value
                );
            }
        }
    }

    Ok(())
}
