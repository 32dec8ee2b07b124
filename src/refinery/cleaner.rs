// * Brand Dataset Cleaner
// * Applies spec extraction and field normalization to every listing of one brand.

use serde_json::Value;
use tracing::debug;

use super::record_normalizer::{normalize_name_value, normalize_price};
use super::spec_extractor::extract_specs;
use crate::persistence::schema::{CleanRecord, RawListing, SchemaError};

/// Why a listing was left out of the cleaned batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    MissingPrice,
    NonPositivePrice,
    MissingName,
}

/// Cleans a single listing, or reports why it must be dropped.
///
/// The caller is responsible for checking that `specs` exists.
pub fn clean_listing(listing: &RawListing) -> Result<CleanRecord, DropReason> {
    let specs = listing
        .specs
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(Value::as_str);
    let parsed = extract_specs(specs);

    let price = normalize_price(listing.price.as_ref()).ok_or(DropReason::MissingPrice)?;
    if !price.is_finite() || price <= 0.0 {
        return Err(DropReason::NonPositivePrice);
    }

    let name = normalize_name_value(listing.name.as_ref())
        .filter(|n| !n.is_empty())
        .ok_or(DropReason::MissingName)?;

    Ok(CleanRecord::new(name, price, parsed))
}

/// Cleans one brand batch.
///
/// Fails with [`SchemaError`] when the batch is empty or any listing lacks a
/// `specs` list; such a batch is malformed as a whole. Listings with no usable
/// price or name are silently dropped.
pub fn clean_batch(batch: &str, listings: &[RawListing]) -> Result<Vec<CleanRecord>, SchemaError> {
    if listings.is_empty() {
        return Err(SchemaError::EmptyBatch {
            batch: batch.to_string(),
        });
    }

    if let Some(record) = listings.iter().position(|l| l.specs.is_none()) {
        return Err(SchemaError::MissingSpecs {
            batch: batch.to_string(),
            record,
        });
    }

    let mut cleaned = Vec::with_capacity(listings.len());
    let mut dropped = 0usize;

    for (index, listing) in listings.iter().enumerate() {
        match clean_listing(listing) {
            Ok(record) => cleaned.push(record),
            Err(reason) => {
                dropped += 1;
                debug!(batch = batch, record = index, reason = ?reason, "Listing dropped");
            }
        }
    }

    debug!(batch = batch, kept = cleaned.len(), dropped = dropped, "Batch cleaned");
    Ok(cleaned)
}
