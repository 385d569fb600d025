use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Live market statistics for one tradable instrument.
///
/// Prices are in the smallest currency unit. Timestamps are RFC 3339 strings
/// exactly as persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stock {
    pub id: u32,
    pub short_name: String,
    pub full_name: String,
    pub description: String,
    pub current_price: u32,
    pub day_high: u32,
    pub day_low: u32,
    pub all_time_high: u32,
    pub all_time_low: u32,
    pub stocks_in_exchange: u32,
    pub stocks_in_market: u32,
    pub previous_day_close: u32,
    pub up_or_down: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Stock {
    /// Sets the current price and recomputes the derived fields.
    ///
    /// A single price can extend at most one side of each bound pair.
    /// `up_or_down` is strict: a price equal to the previous close is not "up".
    pub fn apply_price(&mut self, price: u32) {
        self.current_price = price;

        if price > self.day_high {
            self.day_high = price;
        } else if price < self.day_low {
            self.day_low = price;
        }

        if price > self.all_time_high {
            self.all_time_high = price;
        } else if price < self.all_time_low {
            self.all_time_low = price;
        }

        self.up_or_down = price > self.previous_day_close;
    }
}

/// A persisted past price observation. Read-only to this crate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StockHistory {
    pub stock_id: u32,
    pub stock_price: u32,
    pub created_at: String,
}

impl StockHistory {
    /// `created_at` as an instant. Precision and offset of the stored text may vary.
    pub fn created_at_utc(&self) -> anyhow::Result<DateTime<Utc>> {
        let ts = DateTime::parse_from_rfc3339(&self.created_at)
            .with_context(|| format!("invalid created_at: {:?}", self.created_at))?;
        Ok(ts.with_timezone(&Utc))
    }
}

/// Flat outbound representation of a [`Stock`] for other subsystems.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: u32,
    pub short_name: String,
    pub full_name: String,
    pub description: String,
    pub current_price: u32,
    pub day_high: u32,
    pub day_low: u32,
    pub all_time_high: u32,
    pub all_time_low: u32,
    pub stocks_in_exchange: u32,
    pub stocks_in_market: u32,
    pub previous_day_close: u32,
    pub up_or_down: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Stock> for StockRecord {
    fn from(s: &Stock) -> Self {
        Self {
            id: s.id,
            short_name: s.short_name.clone(),
            full_name: s.full_name.clone(),
            description: s.description.clone(),
            current_price: s.current_price,
            day_high: s.day_high,
            day_low: s.day_low,
            all_time_high: s.all_time_high,
            all_time_low: s.all_time_low,
            stocks_in_exchange: s.stocks_in_exchange,
            stocks_in_market: s.stocks_in_market,
            previous_day_close: s.previous_day_close,
            up_or_down: s.up_or_down,
            created_at: s.created_at.clone(),
            updated_at: s.updated_at.clone(),
        }
    }
}

/// Time window for history retrieval.
///
/// `since` is inclusive, `until` exclusive. `limit` keeps only the most
/// recent rows inside the window. The default is unbounded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryRange {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl HistoryRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn since(mut self, ts: DateTime<Utc>) -> Self {
        self.since = Some(ts);
        self
    }

    pub fn until(mut self, ts: DateTime<Utc>) -> Self {
        self.until = Some(ts);
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none() && self.limit.is_none()
    }

    /// Whether an instant falls inside `[since, until)`.
    pub fn admits(&self, ts: DateTime<Utc>) -> bool {
        self.since.is_none_or(|s| ts >= s) && self.until.is_none_or(|u| ts < u)
    }

    /// Filters `rows` to the window, orders them oldest first and keeps the
    /// `limit` most recent.
    ///
    /// Timestamps are compared as instants, never as text: stored values may
    /// carry different fractional precision. Rows with equal instants keep
    /// their input order. Any unparsable `created_at` fails the call.
    pub fn select(&self, rows: Vec<StockHistory>) -> anyhow::Result<Vec<StockHistory>> {
        let mut timed = Vec::with_capacity(rows.len());
        for row in rows {
            let ts = row.created_at_utc()?;
            if self.admits(ts) {
                timed.push((ts, row));
            }
        }

        timed.sort_by_key(|(ts, _)| *ts);

        if let Some(n) = self.limit {
            let skip = timed.len().saturating_sub(n);
            timed.drain(..skip);
        }

        Ok(timed.into_iter().map(|(_, row)| row).collect())
    }
}
