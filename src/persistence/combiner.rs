// * Corpus Combiner
// * Merges per-brand clean batches into one brand-tagged corpus and removes duplicate listings.

use std::collections::HashSet;

use tracing::{debug, info};

use super::schema::{populated_features, BrandedRecord, CleanRecord, Feature};
use crate::refinery::record_normalizer::normalize_name;

/// The cleaned records of a single brand, as produced by the cleaner
#[derive(Debug, Clone, PartialEq)]
pub struct BrandBatch {
    /// Brand identifier as found in the file name, e.g. `"samsung"`
    pub brand: String,
    pub records: Vec<CleanRecord>,
}

impl BrandBatch {
    pub fn new(brand: impl Into<String>, records: Vec<CleanRecord>) -> Self {
        Self {
            brand: brand.into(),
            records,
        }
    }
}

/// Upper-cases the first character of a brand id, leaving the rest untouched
pub fn brand_label(brand: &str) -> String {
    let mut chars = brand.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// * Identity of a listing for dedup: (name, ram_gb, storage_gb); absent equals absent
type DedupKey = (String, Option<u64>, Option<u64>);

fn dedup_key(record: &BrandedRecord) -> DedupKey {
    let specs = &record.record.specs;
    (
        record.record.name.clone(),
        specs.ram_gb.map(f64::to_bits),
        specs.storage_gb.map(f64::to_bits),
    )
}

/// Removes later listings that repeat an earlier (name, ram_gb, storage_gb).
///
/// When no record in the corpus carries `ram_gb` or `storage_gb` at all, the
/// key is incomplete and the corpus is returned unchanged.
pub fn dedup_corpus(records: Vec<BrandedRecord>) -> Vec<BrandedRecord> {
    let columns = populated_features(records.iter().map(|r| &r.record.specs));
    if !columns.contains(&Feature::RamGb) || !columns.contains(&Feature::StorageGb) {
        debug!("Dedup key columns not present; skipping deduplication");
        return records;
    }

    let before = records.len();
    let mut seen: HashSet<DedupKey> = HashSet::with_capacity(before);
    let kept: Vec<BrandedRecord> = records
        .into_iter()
        .filter(|record| seen.insert(dedup_key(record)))
        .collect();

    debug!(removed = before - kept.len(), "Duplicates removed");
    kept
}

/// Tags, concatenates (in batch order) and deduplicates brand batches
pub fn combine(batches: &[BrandBatch]) -> Vec<BrandedRecord> {
    let mut corpus = Vec::with_capacity(batches.iter().map(|b| b.records.len()).sum());

    for batch in batches {
        let brand = brand_label(&batch.brand);
        info!(brand = %brand, rows = batch.records.len(), "Brand batch loaded");

        corpus.extend(batch.records.iter().map(|record| BrandedRecord {
            brand: brand.clone(),
            record: CleanRecord {
                name: normalize_name(&record.name),
                ..record.clone()
            },
        }));
    }

    dedup_corpus(corpus)
}
