// * Tabular Artifacts
// * JSON raw batches in, CSV clean / combined / scored datasets out (and back in).
// *
// * Column order: name, price, <populated features>, brand, composite_score, value_per_100k.
// * Feature columns that no record populates are not written; absent cells are empty.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use super::schema::{
    populated_features, BrandedRecord, CleanRecord, Feature, MissingColumnError, ParsedSpecs, RawListing,
    SchemaError, ScoredRecord, COLUMN_BRAND, COLUMN_COMPOSITE_SCORE, COLUMN_NAME, COLUMN_PRICE,
    COLUMN_VALUE_PER_100K,
};
use crate::errors::PipelineError;

/// Reads a raw brand batch: a JSON array of listing objects
pub fn read_raw_batch(path: &Path) -> Result<Vec<RawListing>, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| PipelineError::Json {
        path: path.to_path_buf(),
        source,
    })
}

// * Writing

fn format_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn record_cells(record: &CleanRecord, features: &[Feature]) -> Vec<String> {
    let mut cells = Vec::with_capacity(2 + features.len());
    cells.push(record.name.clone());
    cells.push(record.price.to_string());
    cells.extend(features.iter().map(|f| format_cell(record.specs.get(*f))));
    cells
}

fn header_for(features: &[Feature], trailing: &[&'static str]) -> Vec<String> {
    [COLUMN_NAME, COLUMN_PRICE]
        .into_iter()
        .chain(features.iter().map(Feature::column))
        .chain(trailing.iter().copied())
        .map(str::to_string)
        .collect()
}

fn write_rows<I>(path: &Path, header: Vec<String>, rows: I) -> Result<(), PipelineError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }

    let mut writer = WriterBuilder::new()
        .from_path(path)
        .map_err(|e| PipelineError::csv(path, e))?;
    writer
        .write_record(&header)
        .map_err(|e| PipelineError::csv(path, e))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| PipelineError::csv(path, e))?;
    }
    writer.flush().map_err(|e| PipelineError::io(path, e))
}

/// Writes a per-brand clean dataset
pub fn write_clean_csv(path: &Path, records: &[CleanRecord]) -> Result<(), PipelineError> {
    let features = populated_features(records.iter().map(|r| &r.specs));
    let rows = records.iter().map(|r| record_cells(r, &features));
    write_rows(path, header_for(&features, &[]), rows)
}

/// Writes the combined, brand-tagged dataset
pub fn write_corpus_csv(path: &Path, records: &[BrandedRecord]) -> Result<(), PipelineError> {
    let features = populated_features(records.iter().map(|r| &r.record.specs));
    let rows = records.iter().map(|r| {
        let mut cells = record_cells(&r.record, &features);
        cells.push(r.brand.clone());
        cells
    });
    write_rows(path, header_for(&features, &[COLUMN_BRAND]), rows)
}

/// Writes the combined dataset with its score columns
pub fn write_scored_csv(path: &Path, records: &[ScoredRecord]) -> Result<(), PipelineError> {
    let features = populated_features(records.iter().map(|r| &r.listing.record.specs));
    let rows = records.iter().map(|r| {
        let mut cells = record_cells(&r.listing.record, &features);
        cells.push(r.listing.brand.clone());
        cells.push(format_cell(r.composite_score));
        cells.push(format_cell(r.value_per_100k));
        cells
    });
    let header = header_for(&features, &[COLUMN_BRAND, COLUMN_COMPOSITE_SCORE, COLUMN_VALUE_PER_100K]);
    write_rows(path, header, rows)
}

// * Reading

/// Header lookup for one CSV file
struct Columns<'a> {
    path: &'a Path,
    positions: HashMap<String, usize>,
}

impl<'a> Columns<'a> {
    fn new(path: &'a Path, headers: &StringRecord) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_string(), i))
            .collect();
        Self { path, positions }
    }

    fn has(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    fn require(&self, column: &str) -> Result<(), SchemaError> {
        if self.has(column) {
            Ok(())
        } else {
            Err(SchemaError::MissingColumn {
                batch: self.path.display().to_string(),
                column: column.to_string(),
            })
        }
    }

    /// Raw cell text; missing column or empty cell both read as `None`
    fn text<'r>(&self, row: &'r StringRecord, column: &str) -> Option<&'r str> {
        self.positions
            .get(column)
            .and_then(|i| row.get(*i))
            .filter(|cell| !cell.trim().is_empty())
    }

    fn number(&self, row: &StringRecord, index: usize, column: &str) -> Result<Option<f64>, PipelineError> {
        match self.text(row, column) {
            None => Ok(None),
            Some(cell) => cell
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| PipelineError::InvalidField {
                    path: self.path.to_path_buf(),
                    column: column.to_string(),
                    row: index + 1,
                    value: cell.to_string(),
                }),
        }
    }

    fn clean_record(&self, row: &StringRecord, index: usize) -> Result<CleanRecord, PipelineError> {
        let mut specs = ParsedSpecs::default();
        for feature in Feature::ALL {
            specs.set(feature, self.number(row, index, feature.column())?);
        }

        let price = self
            .number(row, index, COLUMN_PRICE)?
            .ok_or_else(|| PipelineError::InvalidField {
                path: self.path.to_path_buf(),
                column: COLUMN_PRICE.to_string(),
                row: index + 1,
                value: String::new(),
            })?;
        let name = self.text(row, COLUMN_NAME).unwrap_or_default().to_string();

        Ok(CleanRecord::new(name, price, specs))
    }

    fn branded_record(&self, row: &StringRecord, index: usize) -> Result<BrandedRecord, PipelineError> {
        Ok(BrandedRecord {
            brand: self.text(row, COLUMN_BRAND).unwrap_or_default().to_string(),
            record: self.clean_record(row, index)?,
        })
    }
}

/// Opens a CSV file and hands each data row to `parse`
fn read_rows<T, F>(path: &Path, required: &[&str], parse: F) -> Result<Vec<T>, PipelineError>
where
    F: Fn(&Columns<'_>, &StringRecord, usize) -> Result<T, PipelineError>,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| PipelineError::csv(path, e))?;
    let headers = reader.headers().map_err(|e| PipelineError::csv(path, e))?.clone();
    let columns = Columns::new(path, &headers);

    for column in required {
        columns.require(column)?;
    }

    let mut parsed = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(|e| PipelineError::csv(path, e))?;
        parsed.push(parse(&columns, &row, index)?);
    }
    Ok(parsed)
}

/// Reads a per-brand clean dataset
pub fn read_clean_csv(path: &Path) -> Result<Vec<CleanRecord>, PipelineError> {
    read_rows(path, &[COLUMN_NAME, COLUMN_PRICE], |cols, row, i| cols.clean_record(row, i))
}

/// Reads the combined dataset (score columns, if any, are ignored)
pub fn read_corpus_csv(path: &Path) -> Result<Vec<BrandedRecord>, PipelineError> {
    read_rows(path, &[COLUMN_NAME, COLUMN_PRICE, COLUMN_BRAND], |cols, row, i| {
        cols.branded_record(row, i)
    })
}

/// Reads a scored dataset for ranking.
///
/// Fails with [`MissingColumnError`] unless brand, name, price and
/// value_per_100k are all present.
pub fn read_scored_csv(path: &Path) -> Result<Vec<ScoredRecord>, PipelineError> {
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .map_err(|e| PipelineError::csv(path, e))?;
    let headers = reader.headers().map_err(|e| PipelineError::csv(path, e))?.clone();
    let columns = Columns::new(path, &headers);

    let missing: Vec<String> = [COLUMN_BRAND, COLUMN_NAME, COLUMN_PRICE, COLUMN_VALUE_PER_100K]
        .into_iter()
        .filter(|c| !columns.has(c))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(MissingColumnError {
            operation: "ranking",
            columns: missing,
        }
        .into());
    }

    let mut scored = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(|e| PipelineError::csv(path, e))?;
        scored.push(ScoredRecord {
            listing: columns.branded_record(&row, index)?,
            composite_score: columns.number(&row, index, COLUMN_COMPOSITE_SCORE)?,
            value_per_100k: columns.number(&row, index, COLUMN_VALUE_PER_100K)?,
        });
    }
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("phone_refinery_tabular_{}_{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn record(name: &str, price: f64, ram: Option<f64>) -> CleanRecord {
        CleanRecord::new(
            name,
            price,
            ParsedSpecs {
                ram_gb: ram,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_clean_csv_only_populated_columns() {
        let dir = scratch_dir("clean");
        let path = dir.join("acme_clean.csv");
        write_clean_csv(&path, &[record("A, the phone", 9999.0, Some(4.0)), record("B", 500.0, None)]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("name,price,ram_gb"));
        assert_eq!(lines.next(), Some("\"A, the phone\",9999,4"));
        assert_eq!(lines.next(), Some("B,500,"));

        let back = read_clean_csv(&path).unwrap();
        assert_eq!(back[0].name, "A, the phone");
        assert_eq!(back[0].specs.ram_gb, Some(4.0));
        assert_eq!(back[1].specs.ram_gb, None);
        assert_eq!(back[1].specs.storage_gb, None);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_corpus_requires_brand_column() {
        let dir = scratch_dir("corpus");
        let path = dir.join("combined.csv");
        fs::write(&path, "name,price\nA,100\n").unwrap();

        let err = read_corpus_csv(&path).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Schema(SchemaError::MissingColumn { ref column, .. }) if column == "brand"
        ));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_invalid_numeric_cell() {
        let dir = scratch_dir("invalid");
        let path = dir.join("acme_clean.csv");
        fs::write(&path, "name,price,ram_gb\nA,100,lots\n").unwrap();

        let err = read_clean_csv(&path).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidField { ref column, row: 1, .. } if column == "ram_gb"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_scored_csv_ranking_columns() {
        let dir = scratch_dir("scored");
        let path = dir.join("scored.csv");
        fs::write(&path, "name,price,brand\nA,100,Acme\n").unwrap();

        let err = read_scored_csv(&path).unwrap_err();
        match err {
            PipelineError::MissingColumns(e) => assert_eq!(e.columns, vec!["value_per_100k".to_string()]),
            other => panic!("unexpected error: {other}"),
        }

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_raw_batch_json() {
        let dir = scratch_dir("raw");
        let path = dir.join("acme_raw.json");
        fs::write(
            &path,
            r#"[{"name": "A", "price": "1,999", "specs": ["4 GB RAM"], "url": "ignored"}]"#,
        )
        .unwrap();

        let batch = read_raw_batch(&path).unwrap();
        assert_eq!(batch.len(), 1);
        assert!(batch[0].specs.is_some());

        fs::write(&path, "{not json").unwrap();
        assert!(matches!(read_raw_batch(&path), Err(PipelineError::Json { .. })));

        fs::remove_dir_all(&dir).unwrap();
    }
}
