use serde::Serialize;

use crate::data::datatable::{ColumnFormat, DataRow, DataValue};

/// Dashboard totals over a daily-metrics row set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub days: usize,
    pub total_revenue: f64,
    pub total_users: f64,
    pub total_conversions: f64,
    /// Mean of `growth` over all rows; `None` for an empty row set
    pub avg_growth: Option<f64>,
    /// Revenue of the latest row
    pub current_revenue: Option<f64>,
    /// Revenue of the row before the latest
    pub previous_revenue: Option<f64>,
}

impl MetricsSummary {
    /// Summarize rows in date order (latest last). Missing or non-numeric fields count as zero.
    pub fn from_rows(rows: &[DataRow]) -> Self {
        let days = rows.len();
        let avg_growth = (days > 0).then(|| sum_field(rows, "growth") / days as f64);
        let revenue_at = |index: Option<usize>| {
            index
                .and_then(|i| rows.get(i))
                .and_then(|row| row.get("revenue"))
                .and_then(DataValue::as_f64)
        };

        Self {
            days,
            total_revenue: sum_field(rows, "revenue"),
            total_users: sum_field(rows, "users"),
            total_conversions: sum_field(rows, "conversions"),
            avg_growth,
            current_revenue: revenue_at(days.checked_sub(1)),
            previous_revenue: revenue_at(days.checked_sub(2)),
        }
    }

    /// Percent change of the latest revenue over the previous entry
    pub fn revenue_change(&self) -> Option<f64> {
        match (self.current_revenue, self.previous_revenue) {
            (Some(current), Some(previous)) if previous != 0.0 => {
                Some((current - previous) / previous * 100.0)
            }
            _ => None,
        }
    }

    /// Label/value pairs in card order
    pub fn cards(&self) -> Vec<(&'static str, String)> {
        let percent = |value: Option<f64>| match value {
            Some(v) => ColumnFormat::Percentage.render(&DataValue::Float(v)),
            None => "n/a".to_string(),
        };

        vec![
            (
                "Total Revenue",
                ColumnFormat::Currency.render(&DataValue::Float(self.total_revenue)),
            ),
            (
                "Total Users",
                ColumnFormat::Numeric.render(&DataValue::Float(self.total_users)),
            ),
            (
                "Conversions",
                ColumnFormat::Numeric.render(&DataValue::Float(self.total_conversions)),
            ),
            ("Avg Growth", percent(self.avg_growth)),
            ("Revenue vs Previous Day", percent(self.revenue_change())),
        ]
    }
}

fn sum_field(rows: &[DataRow], key: &str) -> f64 {
    rows.iter()
        .filter_map(|row| row.get(key).and_then(DataValue::as_f64))
        .sum()
}
