//! Reducing a round's signals to the single best opportunity.

use super::signal::MarketSignal;

/// Pick the signal with the lowest Yes+No sum.
///
/// Signals without a sum are ignored. Exact ties keep the first signal in
/// scan order (`min_by_key` returns the first of equal elements), so the
/// result is stable for a given input ordering. Returns `None` when no
/// signal has a sum; callers render that as an omitted block, never as a
/// zero-valued one.
pub fn select_best(signals: &[MarketSignal]) -> Option<&MarketSignal> {
    signals
        .iter()
        .filter(|signal| signal.sum.is_some())
        .min_by_key(|signal| signal.sum)
}
