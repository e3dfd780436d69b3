//! Runtime configuration assembled from CLI flags and the environment.
//!
//! Anything wrong here is fatal at startup, before the first round runs.

use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::market::Side;
use crate::watch::CompareOp;

/// Telegram credentials from the environment (`TG_BOT_TOKEN`, `TG_CHAT_ID`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramConfig {
    /// Bot token.
    #[serde(default)]
    pub tg_bot_token: Option<String>,
    /// Destination chat ID.
    #[serde(default)]
    pub tg_chat_id: Option<String>,
}

impl TelegramConfig {
    /// Load from the environment, reading `.env` first.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Apply CLI overrides; flags win over environment variables.
    pub fn with_overrides(self, token: Option<String>, chat_id: Option<String>) -> Self {
        Self {
            tg_bot_token: token.or(self.tg_bot_token),
            tg_chat_id: chat_id.or(self.tg_chat_id),
        }
    }

    /// Whether both credentials are present.
    pub fn is_configured(&self) -> bool {
        self.tg_bot_token.is_some() && self.tg_chat_id.is_some()
    }
}

/// Full-scan mode settings.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Seconds between rounds.
    pub interval: Duration,
    /// Run a single round and exit.
    pub once: bool,
    /// Print a human-readable summary each round.
    pub pretty: bool,
    /// Append per-round records to this JSONL file.
    pub out: Option<PathBuf>,
    /// Cap on the number of markets scanned.
    pub max_markets: Option<usize>,
    /// Fire a Telegram alert when the best sum drops below this value.
    pub alert_sum_threshold: Option<Decimal>,
    /// Telegram credentials.
    pub telegram: TelegramConfig,
}

impl ScanConfig {
    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval < Duration::from_secs(1) {
            return Err(ConfigError::IntervalTooShort);
        }
        if let Some(threshold) = self.alert_sum_threshold {
            if threshold <= Decimal::ZERO {
                return Err(ConfigError::InvalidSumThreshold(threshold));
            }
        }
        Ok(())
    }
}

/// Watch mode settings.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Market index from `list-markets`.
    pub index: usize,
    /// Side whose bid book is watched.
    pub side: Side,
    /// Bid price threshold.
    pub trigger_price: Decimal,
    /// Comparison applied to the best bid.
    pub op: CompareOp,
    /// Seconds between alerts; zero alerts on every qualifying round.
    pub cooldown: Duration,
    /// Seconds between rounds.
    pub interval: Duration,
    /// Run a single round and exit.
    pub once: bool,
    /// Print colorized rows instead of log lines.
    pub pretty: bool,
    /// Cap on the number of markets discovered (affects indexing).
    pub max_markets: Option<usize>,
    /// Telegram credentials.
    pub telegram: TelegramConfig,
}

impl WatchConfig {
    /// Check the configuration is usable. The index is validated later,
    /// once the discovered market count is known.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval < Duration::from_secs(1) {
            return Err(ConfigError::IntervalTooShort);
        }
        if self.trigger_price <= Decimal::ZERO || self.trigger_price > Decimal::ONE {
            return Err(ConfigError::InvalidTriggerPrice(self.trigger_price));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn scan_config() -> ScanConfig {
        ScanConfig {
            interval: Duration::from_secs(60),
            once: false,
            pretty: false,
            out: None,
            max_markets: None,
            alert_sum_threshold: None,
            telegram: TelegramConfig::default(),
        }
    }

    fn watch_config() -> WatchConfig {
        WatchConfig {
            index: 0,
            side: Side::Yes,
            trigger_price: dec!(0.976),
            op: CompareOp::Ge,
            cooldown: Duration::from_secs(300),
            interval: Duration::from_secs(60),
            once: false,
            pretty: false,
            max_markets: None,
            telegram: TelegramConfig::default(),
        }
    }

    #[test]
    fn cli_overrides_win_over_environment() {
        let env = TelegramConfig {
            tg_bot_token: Some("env-token".to_string()),
            tg_chat_id: Some("env-chat".to_string()),
        };

        let merged = env.with_overrides(Some("cli-token".to_string()), None);

        assert_eq!(merged.tg_bot_token.as_deref(), Some("cli-token"));
        assert_eq!(merged.tg_chat_id.as_deref(), Some("env-chat"));
        assert!(merged.is_configured());
    }

    #[test]
    fn scan_config_rejects_subsecond_interval() {
        let config = ScanConfig {
            interval: Duration::from_millis(100),
            ..scan_config()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::IntervalTooShort)
        ));
    }

    #[test]
    fn scan_config_rejects_non_positive_threshold() {
        let config = ScanConfig {
            alert_sum_threshold: Some(dec!(0)),
            ..scan_config()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSumThreshold(_))
        ));

        assert!(scan_config().validate().is_ok());
    }

    #[test]
    fn watch_config_rejects_out_of_range_trigger_price() {
        for bad in [dec!(0), dec!(-0.5), dec!(1.5)] {
            let config = WatchConfig {
                trigger_price: bad,
                ..watch_config()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidTriggerPrice(_))
            ));
        }

        assert!(watch_config().validate().is_ok());
    }

    #[test]
    fn zero_cooldown_is_a_valid_configuration() {
        let config = WatchConfig {
            cooldown: Duration::ZERO,
            ..watch_config()
        };
        assert!(config.validate().is_ok());
    }
}
