// * Value Scorer
// * Computes a weighted hardware score per listing and normalizes it by price.

use tracing::debug;

use super::schema::{populated_features, BrandedRecord, Feature, MissingColumnError, ParsedSpecs, ScoredRecord};
use crate::config::constants::{
    BATTERY_DIVISOR, CAMERA_DIVISOR, DISPLAY_WEIGHT, RAM_WEIGHT, STORAGE_DIVISOR, VALUE_CURRENCY_UNIT,
};

/// Weights of the composite score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub ram_weight: f64,
    pub storage_divisor: f64,
    pub battery_divisor: f64,
    pub camera_divisor: f64,
    pub display_weight: f64,
    /// Price unit the value metric is expressed in
    pub currency_unit: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            ram_weight: RAM_WEIGHT,
            storage_divisor: STORAGE_DIVISOR,
            battery_divisor: BATTERY_DIVISOR,
            camera_divisor: CAMERA_DIVISOR,
            display_weight: DISPLAY_WEIGHT,
            currency_unit: VALUE_CURRENCY_UNIT,
        }
    }
}

impl ScoreWeights {
    /// Weighted sum of the five features; `None` if any of them is absent
    pub fn composite_score(&self, specs: &ParsedSpecs) -> Option<f64> {
        Some(
            self.ram_weight * specs.ram_gb?
                + specs.storage_gb? / self.storage_divisor
                + specs.battery_mah? / self.battery_divisor
                + specs.camera_mp? / self.camera_divisor
                + specs.display_inch? * self.display_weight,
        )
    }

    /// Composite score per `currency_unit` of price
    pub fn value_per_unit(&self, composite_score: f64, price: f64) -> f64 {
        composite_score / price * self.currency_unit
    }
}

/// Fails unless every scoring feature is populated somewhere in the corpus
fn require_feature_columns(records: &[BrandedRecord]) -> Result<(), MissingColumnError> {
    let present = populated_features(records.iter().map(|r| &r.record.specs));
    let missing: Vec<String> = Feature::ALL
        .into_iter()
        .filter(|f| !present.contains(f))
        .map(|f| f.column().to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MissingColumnError {
            operation: "scoring",
            columns: missing,
        })
    }
}

/// Scores a combined corpus with the default weights
pub fn score(records: &[BrandedRecord]) -> Result<Vec<ScoredRecord>, MissingColumnError> {
    score_with(records, &ScoreWeights::default())
}

/// Scores a combined corpus.
///
/// Listings with a non-positive price are discarded. A listing missing any
/// feature keeps its row but gets no scores. An empty corpus scores to an
/// empty result.
pub fn score_with(
    records: &[BrandedRecord],
    weights: &ScoreWeights,
) -> Result<Vec<ScoredRecord>, MissingColumnError> {
    if records.is_empty() {
        return Ok(Vec::new());
    }
    require_feature_columns(records)?;

    let scored: Vec<ScoredRecord> = records
        .iter()
        .filter(|r| r.record.price > 0.0)
        .map(|r| {
            let composite_score = weights.composite_score(&r.record.specs);
            let value_per_100k = composite_score.map(|c| weights.value_per_unit(c, r.record.price));
            ScoredRecord {
                listing: r.clone(),
                composite_score,
                value_per_100k,
            }
        })
        .collect();

    debug!(
        input = records.len(),
        scored = scored.len(),
        unscored = scored.iter().filter(|s| s.composite_score.is_none()).count(),
        "Corpus scored"
    );
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::schema::CleanRecord;

    fn full_specs() -> ParsedSpecs {
        ParsedSpecs {
            ram_gb: Some(8.0),
            storage_gb: Some(128.0),
            battery_mah: Some(5000.0),
            camera_mp: Some(50.0),
            display_inch: Some(6.5),
        }
    }

    fn branded(name: &str, price: f64, specs: ParsedSpecs) -> BrandedRecord {
        BrandedRecord {
            brand: "Acme".to_string(),
            record: CleanRecord::new(name, price, specs),
        }
    }

    #[test]
    fn test_reference_score() {
        let scored = score(&[branded("Phone X", 29999.0, full_specs())]).unwrap();
        let composite = scored[0].composite_score.unwrap();
        let value = scored[0].value_per_100k.unwrap();

        assert!((composite - 36.75).abs() < 1e-9);
        assert!((value - 122.5041).abs() < 1e-3);
    }

    #[test]
    fn test_absent_feature_propagates() {
        let partial = ParsedSpecs {
            camera_mp: None,
            ..full_specs()
        };
        let records = vec![branded("Full", 20000.0, full_specs()), branded("Partial", 20000.0, partial)];

        let scored = score(&records).unwrap();
        assert_eq!(scored.len(), 2);
        assert!(scored[0].composite_score.is_some());
        assert_eq!(scored[1].composite_score, None);
        assert_eq!(scored[1].value_per_100k, None);
    }

    #[test]
    fn test_non_positive_price_discarded() {
        let records = vec![
            branded("Free", 0.0, full_specs()),
            branded("Negative", -5.0, full_specs()),
            branded("Paid", 100.0, full_specs()),
        ];

        let scored = score(&records).unwrap();
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].name(), "Paid");
    }

    #[test]
    fn test_missing_column_across_corpus() {
        let no_display = ParsedSpecs {
            display_inch: None,
            battery_mah: None,
            ..full_specs()
        };
        let err = score(&[branded("A", 1000.0, no_display)]).unwrap_err();
        assert_eq!(err.columns, vec!["battery_mah".to_string(), "display_inch".to_string()]);
    }

    #[test]
    fn test_empty_corpus() {
        assert!(score(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_custom_weights() {
        let weights = ScoreWeights {
            ram_weight: 0.0,
            storage_divisor: 1.0,
            battery_divisor: f64::INFINITY,
            camera_divisor: f64::INFINITY,
            display_weight: 0.0,
            currency_unit: 1.0,
        };
        let scored = score_with(&[branded("A", 2.0, full_specs())], &weights).unwrap();
        assert_eq!(scored[0].composite_score, Some(128.0));
        assert_eq!(scored[0].value_per_100k, Some(64.0));
    }
}
