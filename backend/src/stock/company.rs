use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use common::logger::warn_if_slow;
use tracing::{error, info, instrument, warn};

use crate::config::AppConfig;
use crate::error::StockError;
use crate::stock::model::{HistoryRange, Stock, StockHistory};
use crate::stock::repository::StockRepository;

/// A stock's durable record together with its price history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompanyDetails {
    pub stock: Stock,
    /// History keyed by `created_at`. Rows sharing a timestamp alias:
    /// the last one processed wins. Use `series` when every row matters.
    pub history: BTreeMap<String, StockHistory>,
    /// Every history row in the requested range, oldest first.
    pub series: Vec<StockHistory>,
}

/// On-demand company profile lookups. Reads the store directly, not the registry.
pub struct CompanyDetailsProvider {
    repo: Arc<dyn StockRepository>,
    default_range: HistoryRange,
}

impl CompanyDetailsProvider {
    pub fn new(repo: Arc<dyn StockRepository>) -> Self {
        Self {
            repo,
            default_range: HistoryRange::all(),
        }
    }

    pub fn from_config(repo: Arc<dyn StockRepository>, cfg: &AppConfig) -> Self {
        let provider = Self::new(repo);
        match cfg.history_default_limit {
            Some(n) => provider.with_default_range(HistoryRange::all().limit(n)),
            None => provider,
        }
    }

    /// Range applied by [`Self::company_details`].
    pub fn with_default_range(mut self, range: HistoryRange) -> Self {
        self.default_range = range;
        self
    }

    pub async fn company_details(&self, stock_id: u32) -> Result<CompanyDetails, StockError> {
        self.company_details_in(stock_id, &self.default_range).await
    }

    #[instrument(skip(self))]
    pub async fn company_details_in(
        &self,
        stock_id: u32,
        range: &HistoryRange,
    ) -> Result<CompanyDetails, StockError> {
        info!("attempting to get company profile");

        let stock = warn_if_slow("db_fetch_stock_by_id", Duration::from_millis(100), async {
            self.repo.fetch_by_id(stock_id).await
        })
        .await
        .map_err(|e| {
            error!(error = %e, "stock lookup failed");
            StockError::Storage(e)
        })?;

        let Some(stock) = stock else {
            warn!("stock lookup returned no results");
            return Err(StockError::NotFound(stock_id));
        };

        let series = warn_if_slow("db_fetch_stock_history", Duration::from_millis(200), async {
            self.repo.fetch_history(stock_id, range).await
        })
        .await
        .map_err(|e| {
            error!(error = %e, "stock history lookup failed");
            StockError::Storage(e)
        })?;

        let history = index_by_timestamp(&series);

        info!(
            rows = series.len(),
            keys = history.len(),
            "fetched company profile"
        );

        Ok(CompanyDetails {
            stock,
            history,
            series,
        })
    }
}

/// Later rows overwrite earlier ones on equal `created_at`.
fn index_by_timestamp(series: &[StockHistory]) -> BTreeMap<String, StockHistory> {
    let mut index = BTreeMap::new();
    for row in series {
        index.insert(row.created_at.clone(), row.clone());
    }
    index
}
