use anyhow::{Context, anyhow};
use async_trait::async_trait;
use sqlx::{AnyPool, Row};

use crate::stock::model::{HistoryRange, Stock, StockHistory};
use crate::stock::repository::StockRepository;

const STOCK_COLUMNS: &str = r#"
  id, short_name, full_name, description,
  current_price, day_high, day_low,
  all_time_high, all_time_low,
  stocks_in_exchange, stocks_in_market,
  previous_day_close, up_or_down,
  created_at, updated_at
"#;

/// SQLx-backed implementation of StockRepository.
/// Responsible only for queries and row mapping.
pub struct SqlxStockRepository {
    pool: AnyPool,
}

impl SqlxStockRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StockRepository for SqlxStockRepository {
    async fn fetch_all(&self) -> anyhow::Result<Vec<Stock>> {
        let sql = format!("SELECT {STOCK_COLUMNS} FROM stocks ORDER BY id;");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        // A half-loaded registry is worse than a failed boot: any bad row fails the batch.
        rows.iter()
            .map(|r| row_to_stock(r).context("malformed stock row"))
            .collect()
    }

    async fn fetch_by_id(&self, stock_id: u32) -> anyhow::Result<Option<Stock>> {
        let sql = format!("SELECT {STOCK_COLUMNS} FROM stocks WHERE id = ?;");
        let row = sqlx::query(&sql)
            .bind(i64::from(stock_id))
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some(row_to_stock(&r)?)),
            None => Ok(None),
        }
    }

    async fn fetch_history(
        &self,
        stock_id: u32,
        range: &HistoryRange,
    ) -> anyhow::Result<Vec<StockHistory>> {
        // Stored timestamps vary in precision; window, order and limit
        // apply to parsed instants.
        let rows = sqlx::query(
            "SELECT stock_id, stock_price, created_at FROM stock_history WHERE stock_id = ?;",
        )
        .bind(i64::from(stock_id))
        .fetch_all(&self.pool)
        .await?;

        let history = rows
            .iter()
            .map(row_to_history)
            .collect::<anyhow::Result<Vec<_>>>()?;

        range.select(history)
    }
}

/* =========================
Row mapping + conversions
========================= */

fn row_to_stock(r: &sqlx::any::AnyRow) -> anyhow::Result<Stock> {
    let up_or_down: i64 = r.try_get("up_or_down")?;

    Ok(Stock {
        id: i64_to_u32(r.try_get("id")?).context("id")?,
        short_name: r.try_get::<String, _>("short_name")?,
        full_name: r.try_get::<String, _>("full_name")?,
        description: r.try_get::<String, _>("description")?,
        current_price: i64_to_u32(r.try_get("current_price")?)?,
        day_high: i64_to_u32(r.try_get("day_high")?)?,
        day_low: i64_to_u32(r.try_get("day_low")?)?,
        all_time_high: i64_to_u32(r.try_get("all_time_high")?)?,
        all_time_low: i64_to_u32(r.try_get("all_time_low")?)?,
        stocks_in_exchange: i64_to_u32(r.try_get("stocks_in_exchange")?)?,
        stocks_in_market: i64_to_u32(r.try_get("stocks_in_market")?)?,
        previous_day_close: i64_to_u32(r.try_get("previous_day_close")?)?,
        up_or_down: up_or_down == 1,
        created_at: r.try_get::<String, _>("created_at")?,
        updated_at: r.try_get::<String, _>("updated_at")?,
    })
}

fn row_to_history(r: &sqlx::any::AnyRow) -> anyhow::Result<StockHistory> {
    Ok(StockHistory {
        stock_id: i64_to_u32(r.try_get("stock_id")?).context("stock_id")?,
        stock_price: i64_to_u32(r.try_get("stock_price")?).context("stock_price")?,
        created_at: r.try_get::<String, _>("created_at")?,
    })
}

/* =========================
Numeric safety helpers
========================= */

fn i64_to_u32(v: i64) -> anyhow::Result<u32> {
    u32::try_from(v).map_err(|_| anyhow!("out of range for u32: {v}"))
}
