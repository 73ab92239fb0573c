//! Batch driver: every record × every zoom level, one request at a time.
//!
//! `BatchRunner::run` returns a lazy iterator. Each `next()` fetches all zoom
//! levels for one record. Between a record that hit the network and the next
//! record the runner sleeps for the configured delay, which caps the
//! aggregate request rate independently of retry backoff. Failed tiles are
//! logged and the run moves on; re-running the whole batch is safe because
//! cached tiles are skipped.

mod summary;

pub use summary::BatchSummary;

use crate::fetch::{FetchClient, FetchResult};
use crate::record::{normalize_zoom_levels, Record, ZoomLevel};
use crate::transport::HttpTransport;
use std::time::Duration;

/// Result of fetching every zoom level for one record, in zoom order.
#[derive(Debug)]
pub struct RecordOutcome {
    pub record: Record,
    pub results: Vec<(ZoomLevel, FetchResult)>,
}

impl RecordOutcome {
    pub fn failures(&self) -> impl Iterator<Item = (ZoomLevel, &FetchResult)> {
        self.results
            .iter()
            .filter(|(_, r)| r.is_failed())
            .map(|(z, r)| (*z, r))
    }

    /// True when at least one zoom level issued a request (anything but Skipped).
    pub fn touched_network(&self) -> bool {
        self.results.iter().any(|(_, r)| !r.is_skipped())
    }
}

pub struct BatchRunner<'a, T> {
    client: FetchClient<'a, T>,
    delay: Duration,
}

impl<'a, T: HttpTransport> BatchRunner<'a, T> {
    /// Uses the client's configured inter-record delay.
    pub fn new(client: FetchClient<'a, T>) -> Self {
        let delay = client.config().inter_record_delay;
        Self { client, delay }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Lazily fetch `zoom_levels` (sorted, de-duplicated) for each record in input order.
    pub fn run<I>(&self, records: I, zoom_levels: &[ZoomLevel]) -> BatchRun<'_, 'a, T, I::IntoIter>
    where
        I: IntoIterator<Item = Record>,
    {
        BatchRun {
            client: &self.client,
            records: records.into_iter(),
            zooms: normalize_zoom_levels(zoom_levels),
            delay: self.delay,
            pace_next: false,
        }
    }
}

/// Iterator over per-record outcomes. Finite; not restartable.
pub struct BatchRun<'r, 'a, T, I> {
    client: &'r FetchClient<'a, T>,
    records: I,
    zooms: Vec<ZoomLevel>,
    delay: Duration,
    pace_next: bool,
}

impl<T, I> Iterator for BatchRun<'_, '_, T, I>
where
    T: HttpTransport,
    I: Iterator<Item = Record>,
{
    type Item = RecordOutcome;

    fn next(&mut self) -> Option<RecordOutcome> {
        let record = self.records.next()?;
        if self.pace_next && !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let results: Vec<(ZoomLevel, FetchResult)> = self
            .zooms
            .iter()
            .map(|&zoom| (zoom, self.client.fetch(&record, zoom)))
            .collect();
        let outcome = RecordOutcome { record, results };

        for (zoom, result) in outcome.failures() {
            if let Some(error) = result.error() {
                tracing::warn!(
                    record = record.id(),
                    zoom = zoom.get(),
                    "failed {}: {}",
                    self.client.cache_key(&record, zoom).path().display(),
                    error
                );
            }
        }

        self.pace_next = outcome.touched_network();
        Some(outcome)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}
