//! Telegram alert delivery.
//!
//! Delivery is fire-and-forget: a failed send is logged and the round
//! carries on. There is no retry and no queueing.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::TelegramConfig;
use crate::error::AlertError;
use crate::market::{Market, Side};
use crate::scan::MarketSignal;
use crate::watch::CompareOp;

/// Telegram Bot API base URL.
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// `sendMessage` request payload.
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Telegram Bot API client for a single chat.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    http: reqwest::Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Build a notifier from config; `None` when credentials are missing.
    pub fn from_config(config: &TelegramConfig) -> Option<Self> {
        let (bot_token, chat_id) = match (&config.tg_bot_token, &config.tg_chat_id) {
            (Some(token), Some(chat_id)) => (token.clone(), chat_id.clone()),
            _ => return None,
        };

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to create HTTP client");

        Some(Self {
            http,
            bot_token,
            chat_id,
        })
    }

    /// Send a message, logging and swallowing any delivery failure.
    #[instrument(skip(self, text))]
    pub async fn send(&self, text: &str) {
        match self.try_send(text).await {
            Ok(()) => info!("telegram alert sent"),
            Err(err) => warn!(error = %err, "failed to send telegram alert"),
        }
    }

    /// Send a message, surfacing delivery failures to the caller.
    pub async fn try_send(&self, text: &str) -> Result<(), AlertError> {
        let url = format!("{}/bot{}/sendMessage", TELEGRAM_API_BASE, self.bot_token);
        let payload = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
        };

        let response = self.http.post(&url).json(&payload).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AlertError::Rejected { status, body });
        }

        Ok(())
    }
}

/// Format the full-scan alert fired when the best sum drops below the
/// configured threshold.
pub fn format_scan_alert(best: &MarketSignal) -> String {
    let fmt_price = |price: Option<Decimal>| {
        price
            .map(|p| format!("{:.4}", p))
            .unwrap_or_else(|| "N/A".to_string())
    };
    let sum = fmt_price(best.sum);

    let mut msg = String::from("\u{1F6A8} *Probable Market Alert*\n");
    msg.push_str(&format!("Market: {}\n", best.market.market_slug));
    msg.push_str(&format!("Sum: {} ({})\n", sum, best.sum_state));
    msg.push_str(&format!("Executable USD: ${:.2}\n\n", best.executable_usd));
    msg.push_str(&format!(
        "Yes: {} @ {} | ${:.2}\n",
        best.market.yes_outcome,
        fmt_price(best.yes_ask.price),
        best.yes_notional_usd,
    ));
    msg.push_str(&format!(
        "No:  {}  @ {}  | ${:.2}\n\n",
        best.market.no_outcome,
        fmt_price(best.no_ask.price),
        best.no_notional_usd,
    ));
    msg.push_str(&format!("URL:\n{}", best.market.url));
    msg
}

/// Format the watch-mode alert fired when the trigger condition holds.
pub fn format_watch_alert(
    market: &Market,
    side: Side,
    bid: Decimal,
    op: CompareOp,
    threshold: Decimal,
    notional_usd: Decimal,
) -> String {
    let mut msg = String::from("\u{1F6A8} *Probable Market Watch*\n");
    msg.push_str(&format!("Market: {}\n", market.title));
    msg.push_str(&format!("Side: {}\n", side));
    msg.push_str(&format!("Trigger: {:.4} {} {}\n", bid, op, threshold));
    msg.push_str(&format!("Notional: ${:.2}\n", notional_usd));
    msg.push_str(&format!("URL: {}", market.url));
    msg
}
