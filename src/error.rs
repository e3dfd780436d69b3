//! Unified error types for the scanner.

use rust_decimal::Decimal;
use thiserror::Error;

/// Unified error type for the scanner.
#[derive(Error, Debug)]
pub enum ScannerError {
    /// Configuration error, fatal at startup.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Market discovery or data retrieval error.
    #[error("market error: {0}")]
    Market(#[from] MarketError),

    /// Alert delivery error.
    #[error("alert error: {0}")]
    Alert(#[from] AlertError),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Startup configuration errors. Any of these aborts before the first round.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable loading failed.
    #[error("environment error: {0}")]
    Env(#[from] envy::Error),

    /// Polling interval must leave the external APIs breathing room.
    #[error("polling interval must be at least 1 second")]
    IntervalTooShort,

    /// Watch trigger price outside the valid (0, 1] price range.
    #[error("trigger price must be in (0, 1], got {0}")]
    InvalidTriggerPrice(Decimal),

    /// Sum alert threshold must be positive.
    #[error("alert sum threshold must be positive, got {0}")]
    InvalidSumThreshold(Decimal),

    /// Watch index outside the discovered market list.
    #[error("watch index {index} out of range, {count} markets discovered (run list-markets)")]
    InvalidWatchIndex {
        /// The requested index.
        index: usize,
        /// Number of markets discovered.
        count: usize,
    },
}

/// Market discovery and book retrieval errors.
#[derive(Error, Debug)]
pub enum MarketError {
    /// Discovery returned no usable markets.
    #[error("no open markets discovered")]
    NoMarketsFound,

    /// A fetch completed with a non-success status.
    #[error("failed to fetch {what}: {reason}")]
    FetchFailed {
        /// What was being fetched.
        what: String,
        /// Reason for failure.
        reason: String,
    },

    /// The book API asked us to back off.
    #[error("rate limited fetching book for token {token_id}")]
    RateLimited {
        /// Token whose fetch was throttled.
        token_id: String,
    },

    /// Failed to parse an API payload.
    #[error("failed to parse market data: {0}")]
    ParseError(String),

    /// HTTP request failed.
    #[error("http request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl MarketError {
    /// Whether a retry might succeed (throttling and transport failures).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MarketError::RateLimited { .. } | MarketError::HttpError(_)
        )
    }
}

/// Alert delivery errors. Logged and swallowed, never fatal to a round.
#[derive(Error, Debug)]
pub enum AlertError {
    /// Telegram rejected the message.
    #[error("telegram returned HTTP {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        body: String,
    },

    /// HTTP request failed.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ScannerError>;
