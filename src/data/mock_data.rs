//! Seeded mock data for the campaign and daily-metrics tables.
//!
//! Everything random goes through the generator's `StdRng`, so a given seed always
//! produces the same rows.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::datatable::{CampaignStatus, ColumnFormat, DataColumn, DataRow};

pub const DEFAULT_SEED: u64 = 42;

const CAMPAIGN_NAMES: &[&str] = &[
    "Spring Launch",
    "Retargeting Push",
    "Black Friday",
    "Newsletter Boost",
    "Brand Lift",
    "Loyalty Rewards",
    "Flash Sale",
    "App Install Drive",
    "Webinar Series",
    "Regional Expansion",
];

struct ReferenceCampaign {
    id: &'static str,
    name: &'static str,
    status: CampaignStatus,
    budget: i64,
    spent: i64,
    impressions: i64,
    clicks: i64,
    conversions: i64,
    roi: f64,
    ctr: f64,
    cpc: f64,
    start_date: &'static str,
    end_date: &'static str,
}

const REFERENCE_CAMPAIGNS: [ReferenceCampaign; 5] = [
    ReferenceCampaign {
        id: "camp-1",
        name: "Summer Sale 2024",
        status: CampaignStatus::Active,
        budget: 15000,
        spent: 12450,
        impressions: 245000,
        clicks: 4900,
        conversions: 98,
        roi: 24.5,
        ctr: 2.0,
        cpc: 2.54,
        start_date: "2024-06-01",
        end_date: "2024-08-31",
    },
    ReferenceCampaign {
        id: "camp-2",
        name: "Brand Awareness Q3",
        status: CampaignStatus::Active,
        budget: 8500,
        spent: 6200,
        impressions: 180000,
        clicks: 2700,
        conversions: 54,
        roi: 18.2,
        ctr: 1.5,
        cpc: 2.30,
        start_date: "2024-07-01",
        end_date: "2024-09-30",
    },
    ReferenceCampaign {
        id: "camp-3",
        name: "Product Launch Campaign",
        status: CampaignStatus::Paused,
        budget: 12000,
        spent: 8900,
        impressions: 156000,
        clicks: 3120,
        conversions: 40,
        roi: 12.8,
        ctr: 2.0,
        cpc: 2.85,
        start_date: "2024-05-15",
        end_date: "2024-07-15",
    },
    ReferenceCampaign {
        id: "camp-4",
        name: "Holiday Campaign 2024",
        status: CampaignStatus::Active,
        budget: 22000,
        spent: 18500,
        impressions: 320000,
        clicks: 6400,
        conversions: 201,
        roi: 31.4,
        ctr: 2.0,
        cpc: 2.89,
        start_date: "2024-11-01",
        end_date: "2024-12-31",
    },
    ReferenceCampaign {
        id: "camp-5",
        name: "Back to School",
        status: CampaignStatus::Stopped,
        budget: 9500,
        spent: 9500,
        impressions: 167000,
        clicks: 2505,
        conversions: 38,
        roi: 8.9,
        ctr: 1.5,
        cpc: 3.79,
        start_date: "2024-08-01",
        end_date: "2024-09-15",
    },
];

impl ReferenceCampaign {
    fn to_row(&self) -> DataRow {
        DataRow::new()
            .with("id", self.id)
            .with("name", self.name)
            .with("status", self.status)
            .with("budget", self.budget)
            .with("spent", self.spent)
            .with("impressions", self.impressions)
            .with("clicks", self.clicks)
            .with("conversions", self.conversions)
            .with("roi", self.roi)
            .with("ctr", self.ctr)
            .with("cpc", self.cpc)
            .with("startDate", self.start_date)
            .with("endDate", self.end_date)
    }
}

/// Columns of the campaign table
pub fn campaign_columns() -> Vec<DataColumn> {
    vec![
        DataColumn::new("name", "Campaign Name").sortable(),
        DataColumn::new("status", "Status")
            .sortable()
            .with_format(ColumnFormat::StatusBadge),
        DataColumn::new("budget", "Budget")
            .sortable()
            .with_format(ColumnFormat::Currency),
        DataColumn::new("spent", "Spent")
            .sortable()
            .with_format(ColumnFormat::Currency),
        DataColumn::new("roi", "ROI")
            .sortable()
            .with_format(ColumnFormat::Percentage),
        DataColumn::new("clicks", "Clicks")
            .sortable()
            .with_format(ColumnFormat::Numeric),
        DataColumn::new("conversions", "Conversions")
            .sortable()
            .with_format(ColumnFormat::Numeric),
    ]
}

/// Columns of the daily metrics table
pub fn daily_columns() -> Vec<DataColumn> {
    vec![
        DataColumn::new("date", "Date").sortable(),
        DataColumn::new("revenue", "Revenue")
            .sortable()
            .with_format(ColumnFormat::Currency),
        DataColumn::new("users", "Users")
            .sortable()
            .with_format(ColumnFormat::Numeric),
        DataColumn::new("conversions", "Conversions")
            .sortable()
            .with_format(ColumnFormat::Numeric),
        DataColumn::new("growth", "Growth")
            .sortable()
            .with_format(ColumnFormat::Percentage),
        DataColumn::new("spend", "Spend")
            .sortable()
            .with_format(ColumnFormat::Currency),
        DataColumn::new("bounceRate", "Bounce Rate").sortable(),
    ]
}

pub struct MockDataGenerator {
    rng: StdRng,
}

impl MockDataGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The five reference campaigns; not random
    pub fn campaigns(&self) -> Vec<DataRow> {
        REFERENCE_CAMPAIGNS.iter().map(ReferenceCampaign::to_row).collect()
    }

    /// `count` random campaigns with derived ctr, cpc and roi
    pub fn synthetic_campaigns(&mut self, count: usize) -> Vec<DataRow> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();

        (0..count)
            .map(|i| {
                let base = CAMPAIGN_NAMES[i % CAMPAIGN_NAMES.len()];
                let name = if i < CAMPAIGN_NAMES.len() {
                    base.to_string()
                } else {
                    format!("{} {}", base, i / CAMPAIGN_NAMES.len() + 1)
                };
                let status = CampaignStatus::ALL[self.rng.gen_range(0..CampaignStatus::ALL.len())];

                let budget = self.rng.gen_range(20i64..=250) * 100;
                let spent = (budget as f64 * self.rng.gen_range(0.3..=1.0)).round() as i64;
                let impressions = self.rng.gen_range(50_000i64..=400_000);
                let ctr_ratio = self.rng.gen_range(0.008..=0.025);
                let clicks = (impressions as f64 * ctr_ratio).round() as i64;
                let conversions = (clicks as f64 * self.rng.gen_range(0.01..=0.04)).round() as i64;
                let cpc = if clicks > 0 {
                    round_to(spent as f64 / clicks as f64, 2)
                } else {
                    0.0
                };
                let roi = round_to(self.rng.gen_range(-5.0..=40.0), 1);

                let begins = start + Duration::days(self.rng.gen_range(0..300));
                let ends = begins + Duration::days(self.rng.gen_range(30..=120));

                DataRow::new()
                    .with("id", format!("camp-{}", i + 1))
                    .with("name", name)
                    .with("status", status)
                    .with("budget", budget)
                    .with("spent", spent)
                    .with("impressions", impressions)
                    .with("clicks", clicks)
                    .with("conversions", conversions)
                    .with("roi", roi)
                    .with("ctr", round_to(ctr_ratio * 100.0, 1))
                    .with("cpc", cpc)
                    .with("startDate", begins.format("%Y-%m-%d").to_string())
                    .with("endDate", ends.format("%Y-%m-%d").to_string())
            })
            .collect()
    }

    /// One row per day, oldest first, ending at `end_date`
    pub fn daily_metrics(&mut self, days: usize, end_date: NaiveDate) -> Vec<DataRow> {
        (0..days)
            .rev()
            .map(|days_ago| {
                let date = end_date - Duration::days(days_ago as i64);

                let revenue = (45_000.0 + (self.rng.gen::<f64>() - 0.5) * 10_000.0).max(0.0);
                let users = (1_200.0 + (self.rng.gen::<f64>() - 0.5) * 400.0).max(0.0).floor();
                let conversion_rate = 0.02 + (self.rng.gen::<f64>() - 0.5) * 0.01;
                let conversions = (users * conversion_rate).floor() as i64;
                let growth = round_to((self.rng.gen::<f64>() - 0.3) * 50.0, 1);
                let bounce_rate = ((0.4 + self.rng.gen::<f64>() * 0.3) * 100.0).round() as i64;
                let avg_session = (120.0 + self.rng.gen::<f64>() * 180.0).round() as i64;

                DataRow::new()
                    .with("id", format!("day-{}", days_ago))
                    .with("date", date.format("%Y-%m-%d").to_string())
                    .with("revenue", revenue.round() as i64)
                    .with("users", users as i64)
                    .with("conversions", conversions)
                    .with("growth", growth)
                    .with("spend", (revenue * 0.3).round() as i64)
                    .with("sessions", (users * 1.3).floor() as i64)
                    .with("bounceRate", bounce_rate)
                    .with("avgSessionDuration", avg_session)
            })
            .collect()
    }
}

impl Default for MockDataGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datatable::DataValue;

    #[test]
    fn test_reference_campaigns() {
        let rows = MockDataGenerator::default().campaigns();
        assert_eq!(rows.len(), 5);
        assert_eq!(
            rows[0].get("name"),
            Some(&DataValue::Text("Summer Sale 2024".to_string()))
        );
        assert_eq!(rows[3].get("roi"), Some(&DataValue::Float(31.4)));
        assert_eq!(rows[4].status(), Some(CampaignStatus::Stopped));
    }

    #[test]
    fn test_same_seed_same_rows() {
        let a = MockDataGenerator::new(7).synthetic_campaigns(25);
        let b = MockDataGenerator::new(7).synthetic_campaigns(25);
        assert_eq!(a, b);

        let c = MockDataGenerator::new(8).synthetic_campaigns(25);
        assert_ne!(a, c);
    }

    #[test]
    fn test_synthetic_campaign_fields() {
        let rows = MockDataGenerator::new(1).synthetic_campaigns(12);
        assert_eq!(rows.len(), 12);
        for row in &rows {
            assert!(row.status().is_some());
            let budget = row.get("budget").and_then(DataValue::as_f64).unwrap();
            let spent = row.get("spent").and_then(DataValue::as_f64).unwrap();
            assert!(spent <= budget);
        }
        // Names past the list get a numeric suffix
        assert_eq!(
            rows[10].get("name"),
            Some(&DataValue::Text("Spring Launch 2".to_string()))
        );
    }

    #[test]
    fn test_daily_metrics() {
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let rows = MockDataGenerator::new(3).daily_metrics(30, end);
        assert_eq!(rows.len(), 30);
        assert_eq!(
            rows[0].get("date"),
            Some(&DataValue::Text("2024-06-01".to_string()))
        );
        assert_eq!(
            rows[29].get("date"),
            Some(&DataValue::Text("2024-06-30".to_string()))
        );
        for row in &rows {
            let revenue = row.get("revenue").and_then(DataValue::as_f64).unwrap();
            assert!((40_000.0..=50_000.0).contains(&revenue));
        }
    }

    #[test]
    fn test_columns_cover_export_rules() {
        let keys: Vec<String> = campaign_columns().into_iter().map(|c| c.key).collect();
        assert!(keys.contains(&"roi".to_string()));
        assert!(keys.contains(&"budget".to_string()));
    }
}
