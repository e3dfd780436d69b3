//! Console rendering for market lists, scan summaries, and watch rows.

use colored::Colorize;
use rust_decimal::Decimal;

use crate::market::Market;
use crate::scan::MarketSignal;
use crate::watch::{WatchObservation, WatchOutcome};

/// Print the numbered market list used to pick a watch index.
pub fn print_market_list(markets: &[Market]) {
    println!("\nDiscovered {} markets:\n", markets.len());
    println!("{:<5} | {:<50} | SLUG", "IDX", "TITLE");
    println!("{}", "-".repeat(100));
    for (idx, market) in markets.iter().enumerate() {
        let title: String = market.title.chars().take(48).collect();
        println!("{:<5} | {:<50} | {}", idx, title, market.market_slug);
    }
    println!();
}

/// Print the best-opportunity block for one round.
///
/// Callers skip this entirely when the round had no opportunity; there is
/// deliberately no zero-valued rendering of "nothing found".
pub fn print_best_opportunity(best: &MarketSignal) {
    let fmt_price = |price: Option<Decimal>| {
        price
            .map(|p| format!("{:.4}", p))
            .unwrap_or_else(|| "N/A".to_string())
    };

    println!("\n---------------- Best Opportunity ----------------");
    println!("Market: {}", best.market.market_slug);
    println!("URL: {}", best.market.url);
    println!(
        "Yes: {} @ {} | ${:.2}",
        best.market.yes_outcome,
        fmt_price(best.yes_ask.price),
        best.yes_notional_usd,
    );
    println!(
        "No:  {}  @ {}  | ${:.2}",
        best.market.no_outcome,
        fmt_price(best.no_ask.price),
        best.no_notional_usd,
    );
    println!("Sum: {} ({})", fmt_price(best.sum), best.sum_state);
    println!("Executable USD: ${:.2}", best.executable_usd);
    println!("--------------------------------------------------\n");
}

/// Render one watch-mode row.
pub fn format_watch_row(
    timestamp: &str,
    observation: &WatchObservation,
    threshold: Decimal,
) -> String {
    let status = observation.status_label();
    let status = match observation.outcome {
        _ if observation.bid.is_empty() => status.dimmed(),
        WatchOutcome::Triggered => status.red(),
        WatchOutcome::Suppressed => status.yellow(),
        WatchOutcome::NotTriggered => status.green(),
    };

    let price = observation
        .bid
        .price
        .map(|p| format!("{:.4}", p))
        .unwrap_or_else(|| "N/A".to_string());
    let diff = observation
        .diff(threshold)
        .map(|d| {
            let sign = if d.is_sign_negative() { "" } else { "+" };
            format!("{}{:.4}", sign, d)
        })
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "[{}] {:<10} | Price: {} | Diff: {} | Notional: ${:.2}",
        timestamp,
        status,
        price,
        diff,
        observation.notional_usd(),
    )
}
