// * Corpus layer: record schema, combination, scoring, ranking and tabular artifacts

pub mod combiner;
pub mod ranker;
pub mod schema;
pub mod scorer;
pub mod tabular;

// * Re-exports for convenient access
pub use combiner::{brand_label, combine, dedup_corpus, BrandBatch};
pub use ranker::top_n;
pub use schema::{
    populated_features, BrandedRecord, CleanRecord, Feature, MissingColumnError, ParsedSpecs, RawListing,
    SchemaError, ScoredRecord,
};
pub use scorer::{score, score_with, ScoreWeights};
pub use tabular::{
    read_clean_csv, read_corpus_csv, read_raw_batch, read_scored_csv, write_clean_csv, write_corpus_csv,
    write_scored_csv,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refinery::clean_batch;

    #[test]
    fn test_integration_clean_combine_score_rank() {
        let samsung = vec![
            RawListing::new(
                "Galaxy A15 (Blue, 128GB)",
                "₹14,999",
                &["6 GB RAM", "128 GB Storage", "5000 mAh Battery", "50MP Main Camera", "6.5 inch"],
            ),
            RawListing::new(
                "Galaxy S24 (Onyx Black)",
                "74,999",
                &["8 GB RAM", "256 GB ROM", "4000 mAh", "50 MP Rear Camera", "6.2 inch"],
            ),
        ];
        let redmi = vec![RawListing::new(
            "Galaxy A15 (Green)",
            "13,999",
            &["6 GB RAM", "128 GB Storage", "5000 mAh Battery", "50 MP Camera", "6.5 inch"],
        )];

        let batches = vec![
            BrandBatch::new("samsung", clean_batch("samsung", &samsung).unwrap()),
            BrandBatch::new("redmi", clean_batch("redmi", &redmi).unwrap()),
        ];

        // * The redmi row repeats (name, ram, storage) of the first samsung row
        let corpus = combine(&batches);
        assert_eq!(corpus.len(), 2);
        assert!(corpus.iter().all(|r| r.brand == "Samsung"));

        let scored = score(&corpus).unwrap();
        let best = top_n(&scored, 1);
        assert_eq!(best[0].name(), "Galaxy A15");
    }
}
