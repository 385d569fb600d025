use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

use crate::error::StockError;
use crate::stock::model::Stock;

/// In-memory registry of live stock statistics.
///
/// Locking:
/// - The outer lock guards membership of the map.
/// - Each entry carries its own lock guarding its fields.
///
/// Readers take the outer lock shared, then each entry lock shared, one entry
/// at a time. Writers take the outer lock exclusively for the whole mutation,
/// which already excludes every reader and writer, so entries are mutated
/// through `RwLock::get_mut` without touching the inner lock.
///
/// Consequences:
/// - A reader never observes a half-updated entry.
/// - All price updates are serialized, regardless of which stock they target.
/// - A snapshot is consistent per entry, not across entries.
#[derive(Default)]
pub struct StockRegistry {
    stocks: RwLock<HashMap<u32, RwLock<Stock>>>,
}

impl StockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk insert freshly loaded entries. Intended for a single call at bootstrap.
    #[instrument(skip_all, target = "registry")]
    pub fn load(&self, stocks: impl IntoIterator<Item = Stock>) -> usize {
        let mut map = self.stocks.write();

        let mut count = 0;
        for s in stocks {
            map.insert(s.id, RwLock::new(s));
            count += 1;
        }

        info!(count, total = map.len(), "stocks inserted into registry");
        count
    }

    pub fn len(&self) -> usize {
        self.stocks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.read().is_empty()
    }

    /// Independent copy of every entry.
    ///
    /// Each copy is taken under that entry's own read lock, released before
    /// the next entry is visited.
    pub fn snapshot(&self) -> HashMap<u32, Stock> {
        let map = self.stocks.read();

        map.iter()
            .map(|(id, entry)| (*id, entry.read().clone()))
            .collect()
    }

    /// Independent copy of one entry, if present.
    pub fn get(&self, stock_id: u32) -> Option<Stock> {
        let map = self.stocks.read();
        map.get(&stock_id).map(|entry| entry.read().clone())
    }

    /// Applies a new price to one stock and returns a copy of the updated entry.
    ///
    /// Unknown ids fail with [`StockError::NotFound`] and leave the registry untouched.
    #[instrument(skip(self), target = "registry")]
    pub fn update_price(&self, stock_id: u32, price: u32) -> Result<Stock, StockError> {
        let mut map = self.stocks.write();

        let Some(entry) = map.get_mut(&stock_id) else {
            warn!("price update for unknown stock");
            return Err(StockError::NotFound(stock_id));
        };

        let stock = entry.get_mut();
        stock.apply_price(price);

        debug!(
            day_low = stock.day_low,
            day_high = stock.day_high,
            up_or_down = stock.up_or_down,
            "stock price updated"
        );

        Ok(stock.clone())
    }
}
