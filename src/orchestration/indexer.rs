use crate::domain::BlockHeight;
use crate::orchestration::dispatcher::{Dispatched, Dispatcher};
use crate::projection::{BondOutcome, FungifyOutcome, PositionOutcome};
use crate::source::{EventSource, SourceError};
use thiserror::Error;
use tracing::{error, info, warn};

/// Drives a feed through the dispatcher, strictly one item at a time.
pub struct Indexer {
    dispatcher: Dispatcher,
}

impl Indexer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Consume `source` until it is exhausted.
    ///
    /// Malformed feed items and store failures are logged and counted, and
    /// processing moves on to the next item. Only an I/O failure of the source
    /// ends the run.
    pub async fn run<S>(&self, source: &mut S) -> Result<IndexerStats, IndexerError>
    where
        S: EventSource + ?Sized,
    {
        let mut stats = IndexerStats::default();

        loop {
            let item = match source.next_item().await {
                Ok(Some(item)) => item,
                Ok(None) => break,
                Err(SourceError::Parse { line, message }) => {
                    stats.malformed += 1;
                    error!(line, error = %message, "Skipping malformed feed item");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            stats.items += 1;
            let height = item.block().height;
            if let Some(last) = stats.last_height {
                if height < last {
                    warn!(
                        height = %height,
                        last = %last,
                        "Feed item out of chain order"
                    );
                }
            }
            stats.last_height = Some(height);

            match self.dispatcher.dispatch(&item).await {
                Ok(dispatched) => stats.record(&dispatched),
                Err(e) => {
                    stats.failures += 1;
                    error!(height = %height, error = %e, "Failed to project feed item");
                }
            }
        }

        info!(
            items = stats.items,
            balance_writes = stats.balance_writes,
            positions_opened = stats.positions_opened,
            positions_closed = stats.positions_closed,
            positions_merged = stats.positions_merged,
            bonds_registered = stats.bonds_registered,
            malformed = stats.malformed,
            failures = stats.failures,
            "Feed processed"
        );
        Ok(stats)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexerStats {
    pub items: usize,
    pub last_height: Option<BlockHeight>,
    pub balance_writes: usize,
    pub balance_events_skipped: usize,
    pub positions_opened: usize,
    pub positions_closed: usize,
    pub positions_merged: usize,
    pub fungify_partial_failures: usize,
    pub bonds_registered: usize,
    pub bonds_rejected: usize,
    /// Items no projector applied (unhandled types, filtered or unknown positions).
    pub ignored: usize,
    /// Feed lines that could not be decoded.
    pub malformed: usize,
    /// Items whose projection hit a store error.
    pub failures: usize,
}

impl IndexerStats {
    fn record(&mut self, dispatched: &Dispatched) {
        match dispatched {
            Dispatched::Transaction(report) => {
                self.balance_writes += report.writes;
                self.balance_events_skipped += report.skipped.len();
            }
            Dispatched::Position(PositionOutcome::Opened(_)) => self.positions_opened += 1,
            Dispatched::Position(PositionOutcome::Closed(_)) => self.positions_closed += 1,
            Dispatched::Position(_) => self.ignored += 1,
            Dispatched::Fungify(FungifyOutcome::Merged { .. }) => self.positions_merged += 1,
            Dispatched::Fungify(FungifyOutcome::SampleMissing { .. }) => {
                self.fungify_partial_failures += 1
            }
            Dispatched::Fungify(FungifyOutcome::Ignored(_)) => self.ignored += 1,
            Dispatched::Bond(BondOutcome::Registered(_)) => self.bonds_registered += 1,
            Dispatched::Bond(_) => self.bonds_rejected += 1,
            Dispatched::Unhandled => self.ignored += 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error(transparent)]
    Source(#[from] SourceError),
}
