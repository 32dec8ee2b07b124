pub mod config;
pub mod errors;
pub mod ops;
pub mod persistence;
pub mod pipeline;
pub mod refinery;

pub use config::PipelineConfig;
pub use errors::PipelineError;
