//! Payout history read model.
//!
//! Refreshed after a settled submission or on demand; never mutated
//! locally. Records are held newest-first and grouped by calendar day for
//! display.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::errors::Result;
use crate::gateway::Gateway;
use crate::models::PayoutRecord;

pub struct PayoutHistoryFeed {
    gateway: Arc<dyn Gateway>,
    records: Vec<PayoutRecord>,
}

impl PayoutHistoryFeed {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            records: Vec::new(),
        }
    }

    /// Re-fetch the feed, replacing the cached records.
    pub async fn refresh(&mut self) -> Result<()> {
        let mut records = self.gateway.payout_history().await?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(count = records.len(), "refreshed payout history");
        self.records = records;
        Ok(())
    }

    /// Newest first.
    pub fn records(&self) -> &[PayoutRecord] {
        &self.records
    }

    /// The feed grouped by calendar day (UTC), newest day first, preserving
    /// the newest-first order within each day.
    pub fn grouped_by_day(&self) -> Vec<(NaiveDate, Vec<&PayoutRecord>)> {
        let mut groups: Vec<(NaiveDate, Vec<&PayoutRecord>)> = Vec::new();
        for record in &self.records {
            let day = record.created_at.date_naive();
            match groups.last_mut() {
                Some((current, bucket)) if *current == day => bucket.push(record),
                _ => groups.push((day, vec![record])),
            }
        }
        groups
    }
}
