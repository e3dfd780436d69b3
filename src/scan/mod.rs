//! Full-scan mode: per-market signals and best-opportunity selection.
//!
//! This module handles:
//! - Fetching and aggregating both books of each market
//! - Signal computation (sum of best asks, notionals, executable USD)
//! - Reducing a round's signals to the single best opportunity

pub mod selector;
pub mod signal;

use futures::stream::{self, StreamExt};
use tracing::warn;

use crate::error::MarketError;
use crate::market::{BookClient, Market};
use crate::orderbook::aggregate_asks;

pub use selector::select_best;
pub use signal::{classify_sum, MarketSignal, SumState};

/// In-flight book fetches per round.
const MAX_CONCURRENT_FETCHES: usize = 10;

/// Fetch both books for one market and compute its signal.
pub async fn scan_market(
    client: &BookClient,
    market: &Market,
) -> Result<MarketSignal, MarketError> {
    let (yes_book, no_book) = tokio::join!(
        client.get_order_book(&market.yes_token_id),
        client.get_order_book(&market.no_token_id),
    );
    let yes_book = yes_book?;
    let no_book = no_book?;

    Ok(MarketSignal::compute(
        market.clone(),
        aggregate_asks(&yes_book.asks).best(),
        aggregate_asks(&no_book.asks).best(),
    ))
}

/// Scan every market in the list, skipping those whose fetch fails.
///
/// Fetches run with bounded concurrency but results come back in scan
/// order, which keeps the selector's tie-break deterministic. A failed
/// market is logged and dropped from the round, never turned into an
/// NA signal.
pub async fn scan_markets(client: &BookClient, markets: &[Market]) -> Vec<MarketSignal> {
    stream::iter(markets)
        .map(|market| async move {
            match scan_market(client, market).await {
                Ok(signal) => Some(signal),
                Err(err) => {
                    warn!(
                        market = %market.market_slug,
                        error = %err,
                        "skipping market for this round"
                    );
                    None
                }
            }
        })
        .buffered(MAX_CONCURRENT_FETCHES)
        .filter_map(|signal| async move { signal })
        .collect()
        .await
}
