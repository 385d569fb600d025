use std::time::Duration;

use common::logger::warn_if_slow;
use tracing::{error, info, instrument};

use crate::error::StockError;
use crate::stock::registry::StockRegistry;
use crate::stock::repository::StockRepository;

/// Reads every stock row from the store and populates `registry`.
///
/// Store failures are returned as-is; no retry is attempted. Returns the
/// number of stocks loaded.
#[instrument(skip_all)]
pub async fn load_stocks(
    repo: &dyn StockRepository,
    registry: &StockRegistry,
) -> Result<usize, StockError> {
    info!("attempting to load stocks");

    // Query completes before the registry lock is taken.
    let stocks = warn_if_slow("db_fetch_all_stocks", Duration::from_millis(500), async {
        repo.fetch_all().await
    })
    .await
    .map_err(|e| {
        error!(error = %e, "failed to fetch stocks");
        StockError::Storage(e)
    })?;

    let count = registry.load(stocks);

    info!(count, "stock registry loaded");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::testing::{FailingRepo, MockStockRepository, mk_stock};
    use tracing_test::traced_test;

    #[traced_test]
    #[tokio::test]
    async fn loads_every_stock_into_registry() {
        let repo = MockStockRepository {
            stocks: vec![mk_stock(1, 100), mk_stock(2, 250), mk_stock(3, 75)],
            ..Default::default()
        };
        let registry = StockRegistry::new();

        let count = load_stocks(&repo, &registry).await.unwrap();

        assert_eq!(count, 3);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get(2).unwrap(), mk_stock(2, 250));
        assert!(logs_contain("stock registry loaded"));
    }

    #[tokio::test]
    async fn loaded_registry_accepts_updates() {
        let repo = MockStockRepository {
            stocks: vec![mk_stock(1, 100)],
            ..Default::default()
        };
        let registry = StockRegistry::new();
        load_stocks(&repo, &registry).await.unwrap();

        let s = registry.update_price(1, 150).unwrap();
        assert!(s.up_or_down);
    }

    #[traced_test]
    #[tokio::test]
    async fn store_failure_propagates_and_leaves_registry_empty() {
        let registry = StockRegistry::new();

        let err = load_stocks(&FailingRepo, &registry).await.unwrap_err();

        assert!(matches!(err, StockError::Storage(_)));
        assert_eq!(err.to_string(), "Database Offline");
        assert!(registry.is_empty());
        assert!(logs_contain("failed to fetch stocks"));
    }
}
