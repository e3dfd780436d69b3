//! Per-market pricing signal derived from the Yes/No best asks.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::Serialize;
use strum::Display;
use time::OffsetDateTime;

use crate::market::Market;
use crate::orderbook::BestQuote;

/// Classification of the Yes+No best-ask sum against exactly 1.
///
/// Comparison is done in decimal, so a sum of exactly 1 is [`SumState::Eq1`]
/// with no epsilon band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "UPPERCASE")]
pub enum SumState {
    /// Sum below 1: both legs can be bought for less than the payout.
    #[strum(serialize = "LT1")]
    Lt1,
    /// Sum exactly 1.
    #[strum(serialize = "EQ1")]
    Eq1,
    /// Sum above 1.
    #[strum(serialize = "GT1")]
    Gt1,
    /// No sum: at least one side has no ask liquidity.
    #[strum(serialize = "NA")]
    Na,
}

/// Classify a sum against exactly 1 using decimal comparison.
pub fn classify_sum(sum: Option<Decimal>) -> SumState {
    match sum {
        None => SumState::Na,
        Some(s) => match s.cmp(&Decimal::ONE) {
            Ordering::Less => SumState::Lt1,
            Ordering::Equal => SumState::Eq1,
            Ordering::Greater => SumState::Gt1,
        },
    }
}

/// Pricing signal for one market, computed fresh each round.
///
/// Immutable once built; discarded at the end of the round unless it is
/// selected as the best opportunity.
#[derive(Debug, Clone)]
pub struct MarketSignal {
    /// The market this signal describes.
    pub market: Market,
    /// Best ask on the Yes book.
    pub yes_ask: BestQuote,
    /// Best ask on the No book.
    pub no_ask: BestQuote,
    /// Yes + No best-ask prices; absent when either side is empty.
    pub sum: Option<Decimal>,
    /// Classification of `sum` against 1.
    pub sum_state: SumState,
    /// Dollar liquidity at the Yes best ask.
    pub yes_notional_usd: Decimal,
    /// Dollar liquidity at the No best ask.
    pub no_notional_usd: Decimal,
    /// USD simultaneously fillable on both legs at their best-ask depth.
    pub executable_usd: Decimal,
    /// When the signal was computed.
    pub observed_at: OffsetDateTime,
}

impl MarketSignal {
    /// Compute the signal for one market from its two best-ask quotes.
    pub fn compute(market: Market, yes_ask: BestQuote, no_ask: BestQuote) -> Self {
        let sum = match (yes_ask.price, no_ask.price) {
            (Some(yes), Some(no)) => Some(yes + no),
            _ => None,
        };
        let yes_notional_usd = yes_ask.notional_usd();
        let no_notional_usd = no_ask.notional_usd();

        Self {
            market,
            yes_ask,
            no_ask,
            sum,
            sum_state: classify_sum(sum),
            yes_notional_usd,
            no_notional_usd,
            executable_usd: yes_notional_usd.min(no_notional_usd),
            observed_at: OffsetDateTime::now_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn test_market() -> Market {
        Market {
            title: "Will it rain?".to_string(),
            event_slug: "will-it-rain".to_string(),
            market_slug: "will-it-rain-tomorrow".to_string(),
            url: "https://probable.markets/event/will-it-rain".to_string(),
            yes_token_id: "yes-token".to_string(),
            no_token_id: "no-token".to_string(),
            yes_outcome: "Yes".to_string(),
            no_outcome: "No".to_string(),
        }
    }

    #[test]
    fn signal_with_both_sides_quoted() {
        let signal = MarketSignal::compute(
            test_market(),
            BestQuote::new(dec!(0.52), dec!(100)),
            BestQuote::new(dec!(0.49), dec!(200)),
        );

        assert_eq!(signal.sum, Some(dec!(1.01)));
        assert_eq!(signal.sum_state, SumState::Gt1);
        assert_eq!(signal.yes_notional_usd, dec!(52));
        assert_eq!(signal.no_notional_usd, dec!(98));
        assert_eq!(signal.executable_usd, dec!(52));
    }

    #[test]
    fn signal_with_empty_yes_book_is_na() {
        let signal = MarketSignal::compute(
            test_market(),
            BestQuote::empty(),
            BestQuote::new(dec!(0.40), dec!(50)),
        );

        assert_eq!(signal.sum, None);
        assert_eq!(signal.sum_state, SumState::Na);
        assert_eq!(signal.yes_notional_usd, Decimal::ZERO);
        assert_eq!(signal.no_notional_usd, dec!(20));
        assert_eq!(signal.executable_usd, Decimal::ZERO);
    }

    #[test]
    fn sum_of_exactly_one_is_eq1() {
        let signal = MarketSignal::compute(
            test_market(),
            BestQuote::new(dec!(0.60), dec!(10)),
            BestQuote::new(dec!(0.40), dec!(10)),
        );

        assert_eq!(signal.sum, Some(dec!(1.00)));
        assert_eq!(signal.sum_state, SumState::Eq1);
    }

    #[test]
    fn classification_covers_every_case() {
        assert_eq!(classify_sum(None), SumState::Na);
        assert_eq!(classify_sum(Some(dec!(0.97))), SumState::Lt1);
        assert_eq!(classify_sum(Some(dec!(1))), SumState::Eq1);
        assert_eq!(classify_sum(Some(dec!(1.0000001))), SumState::Gt1);
    }

    #[test]
    fn executable_never_exceeds_either_leg() {
        let signal = MarketSignal::compute(
            test_market(),
            BestQuote::new(dec!(0.52), dec!(100)),
            BestQuote::new(dec!(0.49), dec!(200)),
        );

        assert!(signal.executable_usd <= signal.yes_notional_usd);
        assert!(signal.executable_usd <= signal.no_notional_usd);
        assert_eq!(
            signal.executable_usd,
            signal.yes_notional_usd.min(signal.no_notional_usd)
        );
    }

    #[test]
    fn sum_state_display_labels() {
        assert_eq!(SumState::Lt1.to_string(), "LT1");
        assert_eq!(SumState::Eq1.to_string(), "EQ1");
        assert_eq!(SumState::Gt1.to_string(), "GT1");
        assert_eq!(SumState::Na.to_string(), "NA");
    }
}
