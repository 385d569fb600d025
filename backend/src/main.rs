use std::sync::Arc;
use std::time::Duration;

use bourse_backend::{
    config::AppConfig,
    db::Db,
    stock::{
        loader::load_stocks, registry::StockRegistry, repository_sqlx::SqlxStockRepository,
    },
};
use common::logger::{TraceId, child_span, init_logger, root_span};
use tracing::Instrument;

/// Connects, migrates, and loads the registry. Any failure aborts startup.
async fn bootstrap(cfg: &AppConfig) -> anyhow::Result<Arc<StockRegistry>> {
    let db = Db::connect(&cfg.database_url, cfg.db_max_connections).await?;
    db.migrate().await?;

    let repo = SqlxStockRepository::new(db.pool.clone());

    let registry = Arc::new(StockRegistry::new());
    load_stocks(&repo, &registry)
        .instrument(child_span("load_stocks"))
        .await?;

    Ok(registry)
}

/// Periodic market summary built from registry snapshots.
fn start_summary_loop(registry: Arc<StockRegistry>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        loop {
            ticker.tick().await;

            let snapshot = registry.snapshot();
            let up = snapshot.values().filter(|s| s.up_or_down).count();

            tracing::info!(
                stocks = snapshot.len(),
                up,
                down = snapshot.len() - up,
                "market summary"
            );
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sqlx::any::install_default_drivers();

    let cfg = AppConfig::from_env();
    init_logger("bourse-backend", cfg.log_json);

    tracing::info!("Starting bourse backend...");

    let trace_id = TraceId::new();
    let registry = bootstrap(&cfg)
        .instrument(root_span("boot", &trace_id))
        .await?;

    tracing::info!(stocks = registry.len(), "stock registry ready");

    start_summary_loop(registry, Duration::from_secs(30));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    Ok(())
}
