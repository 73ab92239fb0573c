//! Running totals for a batch run.

use super::RecordOutcome;
use crate::fetch::FetchResult;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub records: u64,
    pub fetched: u64,
    pub skipped: u64,
    pub failed: u64,
    pub bytes_written: u64,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &RecordOutcome) {
        self.records += 1;
        for (_, result) in &outcome.results {
            match result {
                FetchResult::Success { bytes, .. } => {
                    self.fetched += 1;
                    self.bytes_written += bytes;
                }
                FetchResult::Skipped { .. } => self.skipped += 1,
                FetchResult::Failed { .. } => self.failed += 1,
            }
        }
    }

    pub fn tiles(&self) -> u64 {
        self.fetched + self.skipped + self.failed
    }
}
