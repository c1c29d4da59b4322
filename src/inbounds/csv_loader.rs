//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Bulk loading of orders from CSV. Rows are fed to a fresh MatchingEngine in file order, so a file
// that crosses itself produces trades while loading. The first invalid row aborts the load and is
// reported with its 1-based data line number.
//
// | Component            | Description                                                        |
// |----------------------|--------------------------------------------------------------------|
// | LoadSummary          | Engine built from the file plus order and trade counts             |
// | load_orders          | Reads `id,userId,side,price,size` rows from any reader             |
// | load_orders_from_path| Same, opening the file first                                       |
// | load_records         | Applies already-parsed records                                     |
// | load_sample          | Loads the bundled sample book                                      |
//--------------------------------------------------------------------------------------------------

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use super::dtos::OrderRecord;
use super::inbound_error::LoadError;
use crate::domain::models::types::OrderRequest;
use crate::domain::services::matching_engine::MatchingEngine;

/// Sample order file shipped with the crate.
pub const SAMPLE_ORDERS_CSV: &str = include_str!("../../data/sample_orders.csv");

/// Outcome of a completed bulk load.
#[derive(Debug)]
pub struct LoadSummary {
    pub engine: MatchingEngine,
    pub orders_loaded: usize,
    pub trades_executed: usize,
}

impl LoadSummary {
    fn new() -> Self {
        Self {
            engine: MatchingEngine::new(),
            orders_loaded: 0,
            trades_executed: 0,
        }
    }

    fn apply(&mut self, line: usize, record: OrderRecord) -> Result<(), LoadError> {
        let request = OrderRequest::try_from(record)
            .map_err(|source| LoadError::InvalidRecord { line, source })?;
        let result = self
            .engine
            .add_order(request)
            .map_err(|source| LoadError::InvalidRecord { line, source })?;

        self.orders_loaded += 1;
        self.trades_executed += result.trades.len();
        Ok(())
    }

    fn finish(self) -> Self {
        info!(
            orders = self.orders_loaded,
            trades = self.trades_executed,
            resting = self.engine.order_count(),
            "order load complete"
        );
        self
    }
}

/// Loads orders from CSV text with a header row.
pub fn load_orders<R: Read>(reader: R) -> Result<LoadSummary, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut summary = LoadSummary::new();
    for (index, row) in csv_reader.deserialize::<OrderRecord>().enumerate() {
        let record = row?;
        summary.apply(index + 1, record)?;
    }
    Ok(summary.finish())
}

pub fn load_orders_from_path(path: impl AsRef<Path>) -> Result<LoadSummary, LoadError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening order file");
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_orders(file)
}

/// Loads records that were parsed elsewhere, in iteration order.
pub fn load_records<I>(records: I) -> Result<LoadSummary, LoadError>
where
    I: IntoIterator<Item = OrderRecord>,
{
    let mut summary = LoadSummary::new();
    for (index, record) in records.into_iter().enumerate() {
        summary.apply(index + 1, record)?;
    }
    Ok(summary.finish())
}

pub fn load_sample() -> Result<LoadSummary, LoadError> {
    load_orders(SAMPLE_ORDERS_CSV.as_bytes())
}
