use thiserror::Error;

#[derive(Error, Debug)]
pub enum StockError {
    #[error("stock not found: {0}")]
    NotFound(u32),

    /// Any failure reported by the persistent store, passed through as-is.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

