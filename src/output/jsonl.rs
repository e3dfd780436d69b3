//! Append-only JSONL output, one JSON object per line.
//!
//! Each round appends one record per scanned market followed by a single
//! round summary carrying the best opportunity (or null). The field set
//! is stable across rounds so consumers can tail the file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::Result;
use crate::scan::{MarketSignal, SumState};

/// Per-market record, one line per scanned market per round.
#[derive(Debug, Serialize)]
pub struct MarketRow<'a> {
    /// Round sequence number, starting at 1.
    pub round: u64,
    /// When the signal was computed (RFC 3339).
    pub timestamp: String,
    /// Event title.
    pub title: &'a str,
    /// Event page URL.
    pub url: &'a str,
    /// Market slug.
    pub market_slug: &'a str,
    /// Yes outcome label.
    pub yes_outcome: &'a str,
    /// No outcome label.
    pub no_outcome: &'a str,
    /// Best Yes ask price.
    pub yes_ask: Option<Decimal>,
    /// Best No ask price.
    pub no_ask: Option<Decimal>,
    /// Depth at the best Yes ask.
    pub yes_ask_size: Decimal,
    /// Depth at the best No ask.
    pub no_ask_size: Decimal,
    /// Yes + No best asks.
    pub sum: Option<Decimal>,
    /// Sum classification.
    pub sum_state: SumState,
    /// Dollar liquidity at the Yes best ask.
    pub yes_ask_notional_usd: Decimal,
    /// Dollar liquidity at the No best ask.
    pub no_ask_notional_usd: Decimal,
    /// USD fillable on both legs simultaneously.
    pub executable_usd: Decimal,
}

impl<'a> MarketRow<'a> {
    fn from_signal(round: u64, signal: &'a MarketSignal) -> Self {
        Self {
            round,
            timestamp: rfc3339(signal.observed_at),
            title: &signal.market.title,
            url: &signal.market.url,
            market_slug: &signal.market.market_slug,
            yes_outcome: &signal.market.yes_outcome,
            no_outcome: &signal.market.no_outcome,
            yes_ask: signal.yes_ask.price,
            no_ask: signal.no_ask.price,
            yes_ask_size: signal.yes_ask.depth,
            no_ask_size: signal.no_ask.depth,
            sum: signal.sum,
            sum_state: signal.sum_state,
            yes_ask_notional_usd: signal.yes_notional_usd,
            no_ask_notional_usd: signal.no_notional_usd,
            executable_usd: signal.executable_usd,
        }
    }
}

/// Round summary closing each round's block of records.
#[derive(Debug, Serialize)]
pub struct RoundSummaryRow<'a> {
    /// Record discriminator, always `"best_market"`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Round sequence number, starting at 1.
    pub round: u64,
    /// When the round was written (RFC 3339).
    pub timestamp: String,
    /// Best-opportunity fields, or null when no market had a sum.
    pub best: Option<BestFields<'a>>,
}

/// Best-opportunity fields inside a round summary.
#[derive(Debug, Serialize)]
pub struct BestFields<'a> {
    /// Market slug.
    pub market_slug: &'a str,
    /// Event page URL.
    pub url: &'a str,
    /// Yes outcome label.
    pub label_yes: &'a str,
    /// No outcome label.
    pub label_no: &'a str,
    /// Best Yes ask price.
    pub yes_ask: Option<Decimal>,
    /// Best No ask price.
    pub no_ask: Option<Decimal>,
    /// Yes + No best asks.
    pub sum: Option<Decimal>,
    /// Sum classification.
    pub sum_state: SumState,
    /// Dollar liquidity at the Yes best ask.
    pub yes_ask_notional_usd: Decimal,
    /// Dollar liquidity at the No best ask.
    pub no_ask_notional_usd: Decimal,
    /// USD fillable on both legs simultaneously.
    pub executable_usd: Decimal,
}

impl<'a> BestFields<'a> {
    /// Project the summary fields out of a signal.
    pub fn from_signal(signal: &'a MarketSignal) -> Self {
        Self {
            market_slug: &signal.market.market_slug,
            url: &signal.market.url,
            label_yes: &signal.market.yes_outcome,
            label_no: &signal.market.no_outcome,
            yes_ask: signal.yes_ask.price,
            no_ask: signal.no_ask.price,
            sum: signal.sum,
            sum_state: signal.sum_state,
            yes_ask_notional_usd: signal.yes_notional_usd,
            no_ask_notional_usd: signal.no_notional_usd,
            executable_usd: signal.executable_usd,
        }
    }
}

/// Append-only writer for one JSONL output file.
#[derive(Debug, Clone)]
pub struct JsonlWriter {
    path: PathBuf,
}

impl JsonlWriter {
    /// Create a writer; the file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one round: every market record, then the round summary.
    pub fn append_round(
        &self,
        round: u64,
        signals: &[MarketSignal],
        best: Option<&MarketSignal>,
    ) -> Result<usize> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        for signal in signals {
            let row = MarketRow::from_signal(round, signal);
            writeln!(file, "{}", serde_json::to_string(&row)?)?;
        }

        let summary = RoundSummaryRow {
            kind: "best_market",
            round,
            timestamp: rfc3339(OffsetDateTime::now_utc()),
            best: best.map(BestFields::from_signal),
        };
        writeln!(file, "{}", serde_json::to_string(&summary)?)?;

        Ok(signals.len() + 1)
    }
}

fn rfc3339(timestamp: OffsetDateTime) -> String {
    timestamp.format(&Rfc3339).unwrap_or_default()
}
