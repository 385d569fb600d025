use sqlx::AnyPool;

pub async fn migrate(pool: &AnyPool) -> anyhow::Result<()> {
    // Stocks
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS stocks (
  id BIGINT PRIMARY KEY,
  short_name TEXT NOT NULL,
  full_name TEXT NOT NULL,
  description TEXT NOT NULL,
  current_price BIGINT NOT NULL,
  day_high BIGINT NOT NULL,
  day_low BIGINT NOT NULL,
  all_time_high BIGINT NOT NULL,
  all_time_low BIGINT NOT NULL,
  stocks_in_exchange BIGINT NOT NULL,
  stocks_in_market BIGINT NOT NULL,
  previous_day_close BIGINT NOT NULL,
  up_or_down INTEGER NOT NULL CHECK (up_or_down IN (0,1)),
  created_at TEXT NOT NULL,
  updated_at TEXT NOT NULL
);
"#,
    )
    .execute(pool)
    .await?;

    // Price history
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS stock_history (
  stock_id BIGINT NOT NULL,
  stock_price BIGINT NOT NULL,
  created_at TEXT NOT NULL
);
"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE INDEX IF NOT EXISTS idx_stock_history_stock ON stock_history(stock_id, created_at);"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
