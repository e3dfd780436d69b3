//! Single-market bid-threshold monitoring with cooldown-gated alerts.
//!
//! Unlike the full-scan alert (which fires on every qualifying round by
//! design), watch mode remembers when it last alerted and withholds
//! repeat alerts until the cooldown elapses. The two policies are kept
//! structurally separate.

use rust_decimal::Decimal;
use strum::{Display, EnumString};
use time::{Duration, OffsetDateTime};

use crate::orderbook::BestQuote;

/// Comparison operator for the watch trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum CompareOp {
    /// Trigger when the bid is at or above the threshold.
    #[strum(serialize = ">=")]
    Ge,
    /// Trigger when the bid is strictly above the threshold.
    #[strum(serialize = ">")]
    Gt,
    /// Trigger when the bid is at or below the threshold.
    #[strum(serialize = "<=")]
    Le,
    /// Trigger when the bid is strictly below the threshold.
    #[strum(serialize = "<")]
    Lt,
}

impl CompareOp {
    /// Apply the operator to `lhs` against `rhs`.
    pub fn eval(self, lhs: Decimal, rhs: Decimal) -> bool {
        match self {
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Lt => lhs < rhs,
        }
    }
}

/// Alert memory for one watched market.
///
/// Owned by the caller and threaded through each evaluation, so the state
/// machine can be tested without a running scheduler. One instance per
/// watched market; never shared.
#[derive(Debug, Clone, Copy, Default)]
pub struct WatchState {
    last_alert: Option<OffsetDateTime>,
}

impl WatchState {
    /// Fresh state with no prior alert (armed).
    pub fn new() -> Self {
        Self::default()
    }

    /// When the last alert fired, if any.
    pub fn last_alert(&self) -> Option<OffsetDateTime> {
        self.last_alert
    }
}

/// Result of one watch evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// Condition is false, or there was no bid liquidity to evaluate.
    NotTriggered,
    /// Condition holds and an alert fires this round.
    Triggered,
    /// Condition holds but the cooldown window is still open.
    Suppressed,
}

impl WatchOutcome {
    /// Whether the watched condition held this round.
    pub fn condition_held(&self) -> bool {
        matches!(self, WatchOutcome::Triggered | WatchOutcome::Suppressed)
    }

    /// Whether an alert should be delivered this round.
    pub fn should_alert(&self) -> bool {
        matches!(self, WatchOutcome::Triggered)
    }
}

/// Cooldown-gated threshold comparator.
#[derive(Debug, Clone, Copy)]
pub struct WatchTrigger {
    /// Comparison applied to the current best bid.
    pub op: CompareOp,
    /// Bid price threshold.
    pub threshold: Decimal,
    /// Minimum gap between alerts; zero disables the cooldown entirely.
    pub cooldown: Duration,
}

impl WatchTrigger {
    /// Create a trigger.
    pub fn new(op: CompareOp, threshold: Decimal, cooldown: Duration) -> Self {
        Self {
            op,
            threshold,
            cooldown,
        }
    }

    /// Evaluate one round against the current best bid.
    ///
    /// An absent bid (no liquidity on the watched side) is condition-false
    /// regardless of operator. `state` advances only when the alert fires;
    /// a suppressed round leaves the cooldown clock untouched. With a zero
    /// cooldown every qualifying round triggers, which is a supported
    /// configuration rather than a degenerate case.
    pub fn evaluate(
        &self,
        state: &mut WatchState,
        best_bid: Option<Decimal>,
        now: OffsetDateTime,
    ) -> WatchOutcome {
        let Some(bid) = best_bid else {
            return WatchOutcome::NotTriggered;
        };
        if !self.op.eval(bid, self.threshold) {
            return WatchOutcome::NotTriggered;
        }

        if self.cooldown.is_zero() {
            return WatchOutcome::Triggered;
        }

        match state.last_alert {
            None => {
                state.last_alert = Some(now);
                WatchOutcome::Triggered
            }
            Some(last) => {
                if now - last >= self.cooldown {
                    state.last_alert = Some(now);
                    WatchOutcome::Triggered
                } else {
                    WatchOutcome::Suppressed
                }
            }
        }
    }
}

/// Snapshot of one watch evaluation, ready for rendering.
#[derive(Debug, Clone, Copy)]
pub struct WatchObservation {
    /// Best bid on the watched side.
    pub bid: BestQuote,
    /// How the trigger evaluated this round.
    pub outcome: WatchOutcome,
}

impl WatchObservation {
    /// Dollar liquidity at the best bid.
    pub fn notional_usd(&self) -> Decimal {
        self.bid.notional_usd()
    }

    /// Signed distance of the bid from the threshold.
    pub fn diff(&self, threshold: Decimal) -> Option<Decimal> {
        self.bid.price.map(|p| p - threshold)
    }

    /// Status label for console rows.
    pub fn status_label(&self) -> &'static str {
        if self.bid.is_empty() {
            return "NA";
        }
        match self.outcome {
            WatchOutcome::Triggered => "TRIGGERED",
            WatchOutcome::Suppressed => "SUPPRESSED",
            WatchOutcome::NotTriggered => "OK",
        }
    }
}
