use anyhow::Result;
use async_trait::async_trait;

use crate::stock::model::{HistoryRange, Stock, StockHistory};

/// Read contracts the stock core needs from durable storage.
#[async_trait]
pub trait StockRepository: Send + Sync {
    /// Every stock row. Used once, at bootstrap.
    async fn fetch_all(&self) -> Result<Vec<Stock>>;

    async fn fetch_by_id(&self, stock_id: u32) -> Result<Option<Stock>>;

    /// History rows for `stock_id` inside `range`, oldest first.
    async fn fetch_history(&self, stock_id: u32, range: &HistoryRange)
    -> Result<Vec<StockHistory>>;
}
