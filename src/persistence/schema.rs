// * Record Schema for the Phone Dataset
// * Defines every record shape that flows through the pipeline, from raw listing to scored row

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// * Column names shared by the tabular artifacts
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_PRICE: &str = "price";
pub const COLUMN_BRAND: &str = "brand";
pub const COLUMN_COMPOSITE_SCORE: &str = "composite_score";
pub const COLUMN_VALUE_PER_100K: &str = "value_per_100k";

/// Numeric hardware features extracted from specification strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    RamGb,
    StorageGb,
    BatteryMah,
    CameraMp,
    DisplayInch,
}

impl Feature {
    /// All features in artifact column order
    pub const ALL: [Feature; 5] = [
        Feature::RamGb,
        Feature::StorageGb,
        Feature::BatteryMah,
        Feature::CameraMp,
        Feature::DisplayInch,
    ];

    /// Returns the column name used in tabular artifacts
    pub fn column(&self) -> &'static str {
        match self {
            Feature::RamGb => "ram_gb",
            Feature::StorageGb => "storage_gb",
            Feature::BatteryMah => "battery_mah",
            Feature::CameraMp => "camera_mp",
            Feature::DisplayInch => "display_inch",
        }
    }

    /// Parses a column name back into a feature
    pub fn from_column(column: &str) -> Option<Feature> {
        Feature::ALL.into_iter().find(|f| f.column() == column)
    }
}

/// One listing as scraped, before any cleaning.
///
/// Fields are kept loosely typed because the source files mix text and
/// numbers (prices in particular arrive as `"29,999"` or `29999`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    pub name: Option<Value>,
    pub price: Option<Value>,
    pub specs: Option<Vec<Value>>,
}

impl RawListing {
    /// Convenience constructor for text-only listings
    pub fn new(name: &str, price: &str, specs: &[&str]) -> Self {
        Self {
            name: Some(Value::from(name)),
            price: Some(Value::from(price)),
            specs: Some(specs.iter().map(|s| Value::from(*s)).collect()),
        }
    }
}

/// Features found in a listing's specification strings.
///
/// `None` means the feature was not found; it is never a stand-in for zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedSpecs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram_gb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_gb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_mah: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_mp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_inch: Option<f64>,
}

impl ParsedSpecs {
    pub fn get(&self, feature: Feature) -> Option<f64> {
        match feature {
            Feature::RamGb => self.ram_gb,
            Feature::StorageGb => self.storage_gb,
            Feature::BatteryMah => self.battery_mah,
            Feature::CameraMp => self.camera_mp,
            Feature::DisplayInch => self.display_inch,
        }
    }

    /// Overwrites a feature slot; `None` clears a previously found value
    pub fn set(&mut self, feature: Feature, value: Option<f64>) {
        let slot = match feature {
            Feature::RamGb => &mut self.ram_gb,
            Feature::StorageGb => &mut self.storage_gb,
            Feature::BatteryMah => &mut self.battery_mah,
            Feature::CameraMp => &mut self.camera_mp,
            Feature::DisplayInch => &mut self.display_inch,
        };
        *slot = value;
    }

    /// Returns the features that carry a value
    pub fn present(&self) -> impl Iterator<Item = Feature> + '_ {
        Feature::ALL.into_iter().filter(|f| self.get(*f).is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

/// A cleaned listing: valid name, strictly positive price, optional features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub name: String,
    pub price: f64,
    #[serde(flatten)]
    pub specs: ParsedSpecs,
}

impl CleanRecord {
    pub fn new(name: impl Into<String>, price: f64, specs: ParsedSpecs) -> Self {
        Self {
            name: name.into(),
            price,
            specs,
        }
    }
}

/// A cleaned listing tagged with its brand inside the combined corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandedRecord {
    pub brand: String,
    #[serde(flatten)]
    pub record: CleanRecord,
}

/// A combined-corpus row with its composite score and value metric.
///
/// Both scores are `None` when any scoring input was missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub listing: BrandedRecord,
    pub composite_score: Option<f64>,
    pub value_per_100k: Option<f64>,
}

impl ScoredRecord {
    pub fn brand(&self) -> &str {
        &self.listing.brand
    }

    pub fn name(&self) -> &str {
        &self.listing.record.name
    }

    pub fn price(&self) -> f64 {
        self.listing.record.price
    }
}

/// Returns the feature columns populated by at least one record, in column order
pub fn populated_features<'a, I>(specs: I) -> Vec<Feature>
where
    I: IntoIterator<Item = &'a ParsedSpecs>,
{
    let mut seen = [false; Feature::ALL.len()];
    for parsed in specs {
        for feature in parsed.present() {
            seen[feature as usize] = true;
        }
    }
    Feature::ALL
        .into_iter()
        .filter(|f| seen[*f as usize])
        .collect()
}

/// Structural problems with an input batch or artifact; fatal for that batch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("No 'specs' field found in {batch} (record {record})")]
    MissingSpecs { batch: String, record: usize },

    #[error("No records found in {batch}")]
    EmptyBatch { batch: String },

    #[error("Required column '{column}' missing from {batch}")]
    MissingColumn { batch: String, column: String },
}

/// A scoring or ranking call was made on a dataset lacking required columns
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing required columns for {operation}: {}", .columns.join(", "))]
pub struct MissingColumnError {
    pub operation: &'static str,
    pub columns: Vec<String>,
}
