// * Operations: logging infrastructure for pipeline runs

pub mod telemetry;

// * Re-exports for convenient access
pub use telemetry::{try_init, LogFormat};
