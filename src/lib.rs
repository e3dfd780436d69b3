//! Probable Markets order-book scanner.
//!
//! Polls the public Probable Markets API for open Yes/No markets, rebuilds
//! each market's order books, and surfaces the market whose Yes+No best
//! asks sum lowest:
//!
//! ```text
//! Yes best ask: $0.48
//! No best ask:  $0.49
//! ─────────────────────
//! Sum:          $0.97 < $1.00 (LT1)
//! ```
//!
//! A sum below 1 means both legs can be bought for less than the eventual
//! payout. The scanner only observes and alerts; it never places orders.
//!
//! Watch mode instead tracks one market's best bid against a threshold
//! and raises a cooldown-gated Telegram alert when the comparison holds.
//!
//! # Modules
//!
//! - [`config`]: Runtime configuration from CLI flags and environment
//! - [`error`]: Unified error types
//! - [`market`]: Market discovery and order-book retrieval
//! - [`orderbook`]: Order-book aggregation and best-quote extraction
//! - [`scan`]: Per-market signals and best-opportunity selection
//! - [`watch`]: Cooldown-gated bid-threshold monitoring
//! - [`alert`]: Telegram alert delivery
//! - [`output`]: Console and JSONL rendering

pub mod alert;
pub mod config;
pub mod error;
pub mod market;
pub mod orderbook;
pub mod output;
pub mod scan;
pub mod watch;

pub use config::{ScanConfig, TelegramConfig, WatchConfig};
pub use error::{Result, ScannerError};
