//! Market module for Probable Markets discovery and data retrieval.
//!
//! This module handles:
//! - Market types and data structures
//! - Market discovery (paging the events API)
//! - Order-book retrieval with retry

pub mod client;
pub mod discovery;
pub mod types;

pub use client::BookClient;
pub use discovery::{discover_markets, sort_markets};
pub use types::{Market, Side};
