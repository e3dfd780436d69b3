//! Integration tests against the live Probable Markets API.
//!
//! Run with: cargo test --test live_api -- --ignored
//!
//! Note: these tests hit the real discovery and book endpoints.

use probable_book::market::{self, BookClient};

#[tokio::test]
#[ignore = "requires network access"]
async fn discover_markets_returns_yes_no_pairs() {
    let client = BookClient::new();

    let markets = market::discover_markets(client.http(), Some(5))
        .await
        .expect("discovery should succeed");

    assert!(!markets.is_empty(), "expected at least one open market");
    for m in &markets {
        assert!(!m.yes_token_id.is_empty());
        assert!(!m.no_token_id.is_empty());
        assert_ne!(m.yes_token_id, m.no_token_id);
        println!("{} ({})", m.title, m.market_slug);
    }
}

#[tokio::test]
#[ignore = "requires network access"]
async fn fetch_book_for_a_discovered_market() {
    let client = BookClient::new();

    let markets = market::discover_markets(client.http(), Some(1))
        .await
        .expect("discovery should succeed");
    let Some(target) = markets.first() else {
        println!("no open markets to fetch a book for");
        return;
    };

    // The market may have gone quiet between discovery and fetch; the
    // call should still complete without a transport error.
    match client.get_order_book(&target.yes_token_id).await {
        Ok(book) => {
            println!("bids: {} levels, asks: {} levels", book.bids.len(), book.asks.len());
        }
        Err(err) => {
            println!("book fetch returned error: {}", err);
        }
    }
}
