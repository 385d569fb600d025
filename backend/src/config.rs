use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Database connection string. Queries use SQLite `?` placeholders,
    /// so only `sqlite:` URLs are supported.
    pub database_url: String,

    /// Upper bound on pooled database connections.
    pub db_max_connections: u32,

    /// Emit JSON logs instead of pretty output.
    pub log_json: bool,

    // =========================
    // Company details
    // =========================
    /// Default cap on history rows returned with a company profile.
    ///
    /// `None` keeps the unbounded behavior: every history row for the
    /// stock is loaded on each call.
    pub history_default_limit: Option<usize>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Missing or malformed
    /// numeric values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://bourse_dev.db".to_string());

        let log_json = lookup("APP_ENV").as_deref() == Some("production");

        Self {
            database_url,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"))
                .unwrap_or(16),
            log_json,
            history_default_limit: parse_var(
                "HISTORY_DEFAULT_LIMIT",
                lookup("HISTORY_DEFAULT_LIMIT"),
            ),
        }
    }
}

/// Parses a raw config value. Unset yields `None`; unparsable values are
/// logged and also yield `None` so the caller's default applies.
fn parse_var<T: FromStr>(key: &'static str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring malformed config value");
            None
        }
    }
}
