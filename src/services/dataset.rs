//! Shared CSV loading helpers for the static reference datasets

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::num::ParseFloatError;
use std::path::Path;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};

use crate::error::CatalogLoadError;

/// Open a dataset file
pub fn open(path: &Path) -> Result<File, CatalogLoadError> {
    File::open(path).map_err(|source| CatalogLoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Wrap any reader as a headed, comma-separated CSV reader
fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

/// Check that all `required` columns are present in the header row
fn require_columns<R: Read>(
    reader: &mut csv::Reader<R>,
    source: &str,
    required: &[&str],
) -> Result<(), CatalogLoadError> {
    let headers = reader.headers().map_err(|e| csv_error(source, e))?;

    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(CatalogLoadError::MissingColumn {
                path: source.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Deserialize every data row into `T`, paired with its 1-based row number.
///
/// A cell that fails to parse as a number is reported with its column name
/// and raw text. Errors raised by `deserialize_with` helpers carry no column,
/// so they surface as `CatalogLoadError::Csv` with the helper's message.
pub fn read_rows<T, R>(input: R, source: &str, columns: &[&str]) -> Result<Vec<(usize, T)>, CatalogLoadError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = reader(input);
    require_columns(&mut reader, source, columns)?;
    let headers = reader.headers().map_err(|e| csv_error(source, e))?.clone();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let row = i + 1;
        let record = record.map_err(|e| csv_error(source, e))?;

        let parsed = record
            .deserialize::<T>(Some(&headers))
            .map_err(|e| row_error(source, row, &headers, &record, e))?;
        rows.push((row, parsed));
    }

    Ok(rows)
}

fn row_error(
    source: &str,
    row: usize,
    headers: &csv::StringRecord,
    record: &csv::StringRecord,
    error: csv::Error,
) -> CatalogLoadError {
    let field = match error.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err.field().map(|f| f as usize),
        _ => None,
    };

    match field {
        Some(index) => invalid_value(
            source,
            row,
            headers.get(index).unwrap_or_default(),
            record.get(index).unwrap_or_default(),
        ),
        None => csv_error(source, error),
    }
}

fn csv_error(source: &str, error: csv::Error) -> CatalogLoadError {
    CatalogLoadError::Csv {
        path: source.to_string(),
        source: error,
    }
}

pub fn invalid_value(source: &str, row: usize, column: &str, value: impl ToString) -> CatalogLoadError {
    CatalogLoadError::InvalidValue {
        path: source.to_string(),
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

/// Fail on the first key that appears twice
pub fn ensure_unique<'a>(source: &str, keys: impl IntoIterator<Item = &'a str>) -> Result<(), CatalogLoadError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(CatalogLoadError::DuplicateKey {
                path: source.to_string(),
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

/// Parse a currency string like "$3.50" or "$1,024.00". Empty is `None`.
pub fn parse_currency(raw: &str) -> Result<Option<f64>, ParseFloatError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let digits: String = trimmed
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    digits.parse::<f64>().map(Some)
}

/// `deserialize_with` for a price cell that may be blank
pub fn optional_currency<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match parse_currency(&raw) {
        Ok(Some(price)) if price.is_finite() && price >= 0.0 => Ok(Some(price)),
        Ok(None) => Ok(None),
        _ => Err(D::Error::custom(format!("invalid price '{}'", raw))),
    }
}

/// `deserialize_with` for a price cell that must be filled
pub fn currency<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    optional_currency(deserializer)?.ok_or_else(|| D::Error::custom("missing price"))
}
