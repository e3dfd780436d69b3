//! Order-book retrieval from the Probable Markets book API.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::MarketError;
use crate::orderbook::{PriceLevel, RawBook};

/// Book endpoint.
const ORDERBOOK_API_BASE: &str = "https://api.probable.markets/public/api/v1/book";

/// Attempts per book fetch before giving up.
const MAX_FETCH_ATTEMPTS: u32 = 3;

/// First retry delay; doubles on each subsequent attempt.
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Probable Markets book API client.
#[derive(Debug, Clone)]
pub struct BookClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Book endpoint base URL.
    base_url: String,
}

/// Order book response from the API.
#[derive(Debug, Clone, Deserialize)]
pub struct BookResponse {
    /// Bid levels.
    pub bids: Option<Vec<RawLevel>>,
    /// Ask levels.
    pub asks: Option<Vec<RawLevel>>,
}

/// Single price level as returned by the API (string-encoded decimals).
#[derive(Debug, Clone, Deserialize)]
pub struct RawLevel {
    /// Price at this level.
    pub price: String,
    /// Size available at this level.
    pub size: String,
}

impl BookClient {
    /// Create a new client with connection reuse tuned for polling.
    pub fn new() -> Self {
        Self::with_base_url(ORDERBOOK_API_BASE)
    }

    /// Create a client against a specific book endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Get the HTTP client reference (shared with discovery).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Fetch the raw order book for a token, retrying transient failures.
    ///
    /// Rate limiting (HTTP 429) and transport errors back off and retry up
    /// to [`MAX_FETCH_ATTEMPTS`]; other HTTP failures return immediately.
    #[instrument(skip(self), fields(token_id = %token_id))]
    pub async fn get_order_book(&self, token_id: &str) -> Result<RawBook, MarketError> {
        let mut backoff = INITIAL_BACKOFF;

        for attempt in 1..MAX_FETCH_ATTEMPTS {
            match self.fetch_once(token_id).await {
                Ok(book) => return Ok(book),
                Err(err) if err.is_retryable() => {
                    debug!(
                        attempt,
                        error = %err,
                        backoff_ms = backoff.as_millis() as u64,
                        "book fetch failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(err) => return Err(err),
            }
        }

        self.fetch_once(token_id).await.map_err(|err| {
            warn!(error = %err, "book fetch failed after {} attempts", MAX_FETCH_ATTEMPTS);
            err
        })
    }

    async fn fetch_once(&self, token_id: &str) -> Result<RawBook, MarketError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("token_id", token_id)])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketError::RateLimited {
                token_id: token_id.to_string(),
            });
        }

        if !response.status().is_success() {
            return Err(MarketError::FetchFailed {
                what: format!("book for token {}", token_id),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let book: BookResponse = response
            .json()
            .await
            .map_err(|e| MarketError::ParseError(format!("failed to parse order book: {}", e)))?;

        Ok(convert_book(book))
    }
}

impl Default for BookClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert an API response into a [`RawBook`].
///
/// Levels whose price or size does not parse as a decimal are dropped;
/// non-positive entries survive here and are filtered during aggregation.
fn convert_book(response: BookResponse) -> RawBook {
    let parse_levels = |levels: Option<Vec<RawLevel>>| -> Vec<PriceLevel> {
        levels
            .unwrap_or_default()
            .into_iter()
            .filter_map(|level| {
                let price: Decimal = level.price.parse().ok()?;
                let size: Decimal = level.size.parse().ok()?;
                Some(PriceLevel::new(price, size))
            })
            .collect()
    };

    RawBook {
        bids: parse_levels(response.bids),
        asks: parse_levels(response.asks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw(price: &str, size: &str) -> RawLevel {
        RawLevel {
            price: price.to_string(),
            size: size.to_string(),
        }
    }

    #[test]
    fn convert_book_parses_levels() {
        let response = BookResponse {
            bids: Some(vec![raw("0.48", "50"), raw("0.47", "100")]),
            asks: Some(vec![raw("0.52", "25")]),
        };

        let book = convert_book(response);

        assert_eq!(
            book.bids,
            vec![
                PriceLevel::new(dec!(0.48), dec!(50)),
                PriceLevel::new(dec!(0.47), dec!(100)),
            ]
        );
        assert_eq!(book.asks, vec![PriceLevel::new(dec!(0.52), dec!(25))]);
    }

    #[test]
    fn convert_book_drops_unparseable_levels() {
        let response = BookResponse {
            bids: Some(vec![raw("garbage", "50"), raw("0.40", "oops")]),
            asks: None,
        };

        let book = convert_book(response);

        assert!(book.bids.is_empty());
        assert!(book.asks.is_empty());
    }
}
