//! Order book types and data structures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Single price level in an order book.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceLevel {
    /// Price at this level.
    pub price: Decimal,
    /// Total size available at this price.
    pub size: Decimal,
}

impl PriceLevel {
    /// Create a new price level.
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }
}

/// Which side of the book a sequence of levels belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookSide {
    /// Sell side; best = lowest price.
    Asks,
    /// Buy side; best = highest price.
    Bids,
}

/// Raw order book for one token, both sides unaggregated.
#[derive(Debug, Clone, Default)]
pub struct RawBook {
    /// Bid entries as returned by the API, in no particular order.
    pub bids: Vec<PriceLevel>,
    /// Ask entries as returned by the API, in no particular order.
    pub asks: Vec<PriceLevel>,
}

/// One side of a book after aggregation.
///
/// Holds one level per distinct price, sizes at equal prices summed,
/// ordered best-first (lowest ask / highest bid). Only
/// [`aggregate`](super::aggregator::aggregate) constructs these, which is
/// what upholds the ordering and distinct-price invariants.
#[derive(Debug, Clone)]
pub struct AggregatedSide {
    side: BookSide,
    levels: Vec<PriceLevel>,
}

impl AggregatedSide {
    pub(super) fn from_sorted(side: BookSide, levels: Vec<PriceLevel>) -> Self {
        Self { side, levels }
    }

    /// Which side this aggregate represents.
    pub fn side(&self) -> BookSide {
        self.side
    }

    /// Aggregated levels, best price first.
    pub fn levels(&self) -> &[PriceLevel] {
        &self.levels
    }

    /// Whether the side has no liquidity at all.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of distinct price levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Best price and the depth available at it.
    pub fn best(&self) -> BestQuote {
        match self.levels.first() {
            Some(level) => BestQuote::new(level.price, level.size),
            None => BestQuote::empty(),
        }
    }
}

/// Best price on one side of a book, with the depth quoted at it.
///
/// `price` is `None` when the side has no liquidity; that is a distinct
/// state from a zero price, and `depth` is zero whenever `price` is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestQuote {
    /// Best price, absent when the side is empty.
    pub price: Option<Decimal>,
    /// Depth available at the best price.
    pub depth: Decimal,
}

impl BestQuote {
    /// Quote at a known price and depth.
    pub fn new(price: Decimal, depth: Decimal) -> Self {
        Self {
            price: Some(price),
            depth,
        }
    }

    /// The no-liquidity quote.
    pub fn empty() -> Self {
        Self {
            price: None,
            depth: Decimal::ZERO,
        }
    }

    /// Whether the side had no liquidity.
    pub fn is_empty(&self) -> bool {
        self.price.is_none()
    }

    /// Dollar value quoted at the best price (price x depth), zero when absent.
    pub fn notional_usd(&self) -> Decimal {
        self.price.map(|p| p * self.depth).unwrap_or(Decimal::ZERO)
    }
}

impl Default for BestQuote {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn price_level_creation() {
        let level = PriceLevel::new(dec!(0.50), dec!(100));
        assert_eq!(level.price, dec!(0.50));
        assert_eq!(level.size, dec!(100));
    }

    #[test]
    fn best_quote_notional() {
        let quote = BestQuote::new(dec!(0.52), dec!(100));
        assert_eq!(quote.notional_usd(), dec!(52));
        assert!(!quote.is_empty());
    }

    #[test]
    fn empty_quote_has_zero_depth_and_notional() {
        let quote = BestQuote::empty();
        assert_eq!(quote.price, None);
        assert_eq!(quote.depth, Decimal::ZERO);
        assert_eq!(quote.notional_usd(), Decimal::ZERO);
        assert!(quote.is_empty());
    }
}
