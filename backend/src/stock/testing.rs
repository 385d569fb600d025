use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::stock::model::{HistoryRange, Stock, StockHistory};
use crate::stock::repository::StockRepository;

/// Stock whose price, bounds and previous close all start at `price`.
pub fn mk_stock(id: u32, price: u32) -> Stock {
    Stock {
        id,
        short_name: format!("STK{id}"),
        full_name: format!("Stock {id} Ltd"),
        description: "test listing".to_string(),
        current_price: price,
        day_high: price,
        day_low: price,
        all_time_high: price,
        all_time_low: price,
        stocks_in_exchange: 1_000,
        stocks_in_market: 500,
        previous_day_close: price,
        up_or_down: false,
        created_at: "2024-01-01T00:00:00Z".to_string(),
        updated_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

pub fn mk_history(stock_id: u32, stock_price: u32, created_at: &str) -> StockHistory {
    StockHistory {
        stock_id,
        stock_price,
        created_at: created_at.to_string(),
    }
}

#[derive(Default)]
pub struct MockStockRepository {
    pub stocks: Vec<Stock>,
    pub history: Vec<StockHistory>,
    pub history_calls: Mutex<Vec<(u32, HistoryRange)>>,
}

#[async_trait]
impl StockRepository for MockStockRepository {
    async fn fetch_all(&self) -> anyhow::Result<Vec<Stock>> {
        Ok(self.stocks.clone())
    }

    async fn fetch_by_id(&self, stock_id: u32) -> anyhow::Result<Option<Stock>> {
        Ok(self.stocks.iter().find(|s| s.id == stock_id).cloned())
    }

    async fn fetch_history(
        &self,
        stock_id: u32,
        range: &HistoryRange,
    ) -> anyhow::Result<Vec<StockHistory>> {
        self.history_calls.lock().push((stock_id, range.clone()));

        let rows = self
            .history
            .iter()
            .filter(|h| h.stock_id == stock_id)
            .cloned()
            .collect();

        range.select(rows)
    }
}

/// Store that is unreachable for every query.
pub struct FailingRepo;

#[async_trait]
impl StockRepository for FailingRepo {
    async fn fetch_all(&self) -> anyhow::Result<Vec<Stock>> {
        Err(anyhow!("Database Offline"))
    }

    async fn fetch_by_id(&self, _: u32) -> anyhow::Result<Option<Stock>> {
        Err(anyhow!("Database Offline"))
    }

    async fn fetch_history(&self, _: u32, _: &HistoryRange) -> anyhow::Result<Vec<StockHistory>> {
        Err(anyhow!("Database Offline"))
    }
}
