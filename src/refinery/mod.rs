// * The Refinery: raw listing -> clean record
// * Spec extraction, field normalization and per-brand batch cleaning.

pub mod cleaner;
pub mod record_normalizer;
pub mod spec_extractor;

// * Re-exports for convenient access
pub use cleaner::{clean_batch, clean_listing, DropReason};
pub use record_normalizer::{normalize_name, normalize_name_value, normalize_price, normalize_price_text};
pub use spec_extractor::{classify, extract_specs};
