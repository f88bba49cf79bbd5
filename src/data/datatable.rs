use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a campaign row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Paused,
    Stopped,
}

impl CampaignStatus {
    pub const ALL: [CampaignStatus; 3] = [
        CampaignStatus::Active,
        CampaignStatus::Paused,
        CampaignStatus::Stopped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Stopped => "stopped",
        }
    }
}

impl FromStr for CampaignStatus {
    type Err = String;

    /// Exact literal match; "Active" is not a status
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CampaignStatus::Active),
            "paused" => Ok(CampaignStatus::Paused),
            "stopped" => Ok(CampaignStatus::Stopped),
            other => Err(format!("Unknown campaign status '{}'", other)),
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cell value in a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Status(CampaignStatus),
    Null,
}

impl DataValue {
    /// Infer a typed value from raw text (CSV cells, JSON strings)
    pub fn infer_from_string(s: &str) -> Self {
        if s.is_empty() || s.eq_ignore_ascii_case("null") {
            return DataValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return DataValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() {
                return DataValue::Float(f);
            }
        }
        DataValue::Text(s.to_string())
    }

    /// Numeric view of the value, if it is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Integer(i) => Some(*i as f64),
            DataValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Status view of the value; text holding a status literal counts too
    pub fn as_status(&self) -> Option<CampaignStatus> {
        match self {
            DataValue::Status(s) => Some(*s),
            DataValue::Text(t) => t.parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Text(s) => write!(f, "{}", s),
            DataValue::Integer(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{}", format_number(*fl)),
            DataValue::Status(s) => write!(f, "{}", s),
            DataValue::Null => write!(f, ""),
        }
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Text(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::Text(s)
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Integer(i)
    }
}

impl From<f64> for DataValue {
    fn from(f: f64) -> Self {
        DataValue::Float(f)
    }
}

impl From<CampaignStatus> for DataValue {
    fn from(s: CampaignStatus) -> Self {
        DataValue::Status(s)
    }
}

/// Plain number rendering: whole floats drop the fraction (`2.0` -> `2`)
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Thousands-grouped rendering with at most three fraction digits (`15000` -> `15,000`)
pub fn group_thousands(value: f64) -> String {
    if !value.is_finite() {
        return format!("{}", value);
    }

    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && (int_part != "0" || !frac_part.is_empty());
    let sign = if negative { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

/// How a column renders its values for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnFormat {
    #[default]
    PlainText,
    Numeric,
    Currency,
    Percentage,
    StatusBadge,
}

impl ColumnFormat {
    /// Render a value; non-numeric values under numeric formats fall back to plain text
    pub fn render(&self, value: &DataValue) -> String {
        match (self, value.as_f64()) {
            (ColumnFormat::Numeric, Some(n)) => group_thousands(n),
            (ColumnFormat::Currency, Some(n)) => {
                if n < 0.0 {
                    format!("-${}", group_thousands(-n))
                } else {
                    format!("${}", group_thousands(n))
                }
            }
            (ColumnFormat::Percentage, Some(n)) => {
                let sign = if n > 0.0 { "+" } else { "" };
                format!("{}{:.1}%", sign, n)
            }
            (ColumnFormat::StatusBadge, _) => match value.as_status() {
                Some(status) => format!("[{}]", status),
                None => value.to_string(),
            },
            _ => value.to_string(),
        }
    }
}

/// Column descriptor: declared once, immutable for the life of a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataColumn {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    pub format: ColumnFormat,
    /// Value used when a row has no entry for `key`
    pub default: DataValue,
}

impl DataColumn {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: false,
            format: ColumnFormat::PlainText,
            default: DataValue::Null,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn with_format(mut self, format: ColumnFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_default(mut self, default: DataValue) -> Self {
        self.default = default;
        self
    }

    /// Typed accessor: the row's value for this column, or the declared default
    pub fn value_of<'a>(&'a self, row: &'a DataRow) -> &'a DataValue {
        row.get(&self.key).unwrap_or(&self.default)
    }

    /// Display rendering of this column's value in `row`
    pub fn render(&self, row: &DataRow) -> String {
        self.format.render(self.value_of(row))
    }
}

/// One record: an open-ended mapping from field name to value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    pub fields: BTreeMap<String, DataValue>,
}

impl DataRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut DataValue> {
        self.fields.get_mut(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<DataValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn status(&self) -> Option<CampaignStatus> {
        self.get("status").and_then(DataValue::as_status)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
