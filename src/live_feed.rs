//! Synthetic real-time updates pushed into a row set on a timer.
//!
//! The feed only mutates rows it is handed; the view re-derives from whatever row set
//! it was last given, so there is nothing to keep in sync beyond calling
//! `DataView::set_rows` after each tick.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::debug;

use crate::data::datatable::{CampaignStatus, DataRow, DataValue};

/// Which rows a tick touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedTarget {
    /// Every campaign whose status is active
    ActiveRows,
    /// Only the last row (today's entry in the daily metrics)
    LatestRow,
}

pub struct LiveFeed {
    rng: StdRng,
    target: FeedTarget,
    interval: Duration,
    ticks: u64,
}

impl LiveFeed {
    pub fn new(seed: u64, target: FeedTarget, interval: Duration) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            target,
            interval,
            ticks: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Apply one round of updates; returns how many rows changed
    pub fn tick(&mut self, rows: &mut [DataRow]) -> usize {
        self.ticks += 1;
        let changed = match self.target {
            FeedTarget::ActiveRows => {
                let mut changed = 0;
                for row in rows
                    .iter_mut()
                    .filter(|r| r.status() == Some(CampaignStatus::Active))
                {
                    self.drift_campaign(row);
                    changed += 1;
                }
                changed
            }
            FeedTarget::LatestRow => match rows.last_mut() {
                Some(row) => {
                    self.drift_daily(row);
                    1
                }
                None => 0,
            },
        };

        debug!(target: "feed", "Tick {} updated {} rows", self.ticks, changed);
        changed
    }

    fn drift_campaign(&mut self, row: &mut DataRow) {
        let spend_step = self.rng.gen_range(0..=250);
        let click_step = self.rng.gen_range(0..=40);
        let conversion_step = self.rng.gen_range(0..=2);
        let roi_step = self.rng.gen_range(-0.5..=0.5);

        add_integer(row, "spent", spend_step);
        add_integer(row, "clicks", click_step);
        add_integer(row, "conversions", conversion_step);

        if let Some(roi) = row.get("roi").and_then(DataValue::as_f64) {
            let next = ((roi + roi_step) * 10.0).round() / 10.0;
            row.set("roi", next);
        }
    }

    fn drift_daily(&mut self, row: &mut DataRow) {
        let revenue_step = ((self.rng.gen::<f64>() - 0.5) * 1000.0).round() as i64;
        let user_step = ((self.rng.gen::<f64>() - 0.5) * 10.0).round() as i64;
        let conversion_step = (self.rng.gen::<f64>() * 2.0).round() as i64;
        let growth = ((self.rng.gen::<f64>() - 0.3) * 500.0).round() / 10.0;

        add_integer(row, "revenue", revenue_step);
        add_integer(row, "users", user_step);
        add_integer(row, "conversions", conversion_step);
        row.set("growth", growth);
    }
}

/// Add `delta` to an integer field, never going below zero; other values are left alone
fn add_integer(row: &mut DataRow, key: &str, delta: i64) {
    if let Some(DataValue::Integer(current)) = row.get_mut(key) {
        *current = current.saturating_add(delta).max(0);
    }
}
