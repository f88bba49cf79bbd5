use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use serde_json::Value as JsonValue;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::data::datatable::{CampaignStatus, ColumnFormat, DataColumn, DataRow, DataValue};

/// Field that carries a campaign status literal
const STATUS_FIELD: &str = "status";

/// Short keys shown upper-case in generated labels
const ACRONYMS: &[&str] = &["id", "roi", "ctr", "cpc", "cpa", "url"];

/// Rows read from a file, with field names in the order the file declares them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedRows {
    pub rows: Vec<DataRow>,
    pub fields: Vec<String>,
}

impl LoadedRows {
    pub fn columns(&self) -> Vec<DataColumn> {
        infer_columns(&self.fields)
    }
}

/// Load rows from a `.json` or `.csv` file, picked by extension
pub fn load_rows<P: AsRef<Path>>(path: P) -> Result<LoadedRows> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let loaded = match extension.as_deref() {
        Some("json") => load_json_rows(path)?,
        Some("csv") => load_csv_rows(path)?,
        _ => bail!(
            "Unsupported data file {} (expected .json or .csv)",
            path.display()
        ),
    };

    info!(
        target: "loader",
        "Loaded {} rows with {} fields from {}",
        loaded.rows.len(),
        loaded.fields.len(),
        path.display()
    );
    Ok(loaded)
}

/// Load a JSON file holding an array of objects
pub fn load_json_rows<P: AsRef<Path>>(path: P) -> Result<LoadedRows> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open JSON file: {:?}", path.as_ref()))?;
    parse_json_rows(BufReader::new(file))
        .with_context(|| format!("Failed to parse JSON file: {:?}", path.as_ref()))
}

/// Parse an array of objects. Fields are ordered by first appearance across the objects.
pub fn parse_json_rows<R: Read>(reader: R) -> Result<LoadedRows> {
    let json_data: Vec<JsonValue> = serde_json::from_reader(reader)?;

    let mut rows = Vec::with_capacity(json_data.len());
    let mut fields: Vec<String> = Vec::new();
    for (index, item) in json_data.into_iter().enumerate() {
        let JsonValue::Object(obj) = item else {
            bail!("Element {} is not an object", index);
        };

        let mut row = DataRow::new();
        for (key, value) in obj {
            if !fields.contains(&key) {
                fields.push(key.clone());
            }
            let value = json_to_datavalue(&key, value);
            row.set(key, value);
        }
        rows.push(row);
    }
    Ok(LoadedRows { rows, fields })
}

fn json_to_datavalue(key: &str, value: JsonValue) -> DataValue {
    match value {
        JsonValue::Null => DataValue::Null,
        JsonValue::Bool(b) => DataValue::Text(b.to_string()),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => DataValue::Integer(i),
            None => n.as_f64().map(DataValue::Float).unwrap_or(DataValue::Null),
        },
        JsonValue::String(s) => status_or_text(key, s),
        // Nested values are kept as their JSON text
        other => DataValue::Text(other.to_string()),
    }
}

fn status_or_text(key: &str, s: String) -> DataValue {
    if key == STATUS_FIELD {
        if let Ok(status) = s.parse::<CampaignStatus>() {
            return DataValue::Status(status);
        }
    }
    DataValue::Text(s)
}

/// Load a CSV file with a header row; cell types are inferred per cell
pub fn load_csv_rows<P: AsRef<Path>>(path: P) -> Result<LoadedRows> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path.as_ref()))?;
    parse_csv_rows(file)
        .with_context(|| format!("Failed to parse CSV file: {:?}", path.as_ref()))
}

pub fn parse_csv_rows<R: Read>(reader: R) -> Result<LoadedRows> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row = DataRow::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            let value = match DataValue::infer_from_string(cell) {
                DataValue::Text(s) => status_or_text(header, s),
                other => other,
            };
            row.set(header, value);
        }
        rows.push(row);
    }

    debug!(target: "loader", "Parsed {} CSV records with {} columns", rows.len(), headers.len());
    Ok(LoadedRows {
        rows,
        fields: headers.iter().map(str::to_string).collect(),
    })
}

/// Fallback columns when none are configured: one sortable column per field, in the
/// given order, with status columns rendered as badges
pub fn infer_columns(fields: &[String]) -> Vec<DataColumn> {
    fields
        .iter()
        .map(|key| {
            let column = DataColumn::new(key.clone(), humanize_label(key)).sortable();
            if key == STATUS_FIELD {
                column.with_format(ColumnFormat::StatusBadge)
            } else {
                column
            }
        })
        .collect()
}

/// `startDate` -> `Start Date`, `bounce_rate` -> `Bounce Rate`, `roi` -> `ROI`
pub fn humanize_label(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in key.chars() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let lower = word.to_lowercase();
            if ACRONYMS.contains(&lower.as_str()) {
                return lower.to_uppercase();
            }
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
