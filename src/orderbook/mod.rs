//! Order book module for market depth data.
//!
//! This module handles:
//! - Order book types and data structures
//! - Aggregation of raw price levels into best-price/depth views

pub mod aggregator;
pub mod types;

pub use aggregator::{aggregate, aggregate_asks, aggregate_bids};
pub use types::{AggregatedSide, BestQuote, BookSide, PriceLevel, RawBook};
