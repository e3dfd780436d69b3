//! Order book aggregation: collapsing raw entries into per-price depth.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::types::{AggregatedSide, BookSide, PriceLevel};

/// Aggregate raw entries for one side of a book.
///
/// Entries sharing a price are merged by summing their sizes; entries with
/// a non-positive price or size are dropped as malformed. The result is
/// ordered best-first: ascending by price for asks, descending for bids.
/// Pure function of its input.
pub fn aggregate(side: BookSide, entries: &[PriceLevel]) -> AggregatedSide {
    let mut depth_by_price: BTreeMap<Decimal, Decimal> = BTreeMap::new();

    for entry in entries {
        if entry.price <= Decimal::ZERO || entry.size <= Decimal::ZERO {
            continue;
        }
        *depth_by_price.entry(entry.price).or_insert(Decimal::ZERO) += entry.size;
    }

    let to_level = |(price, size)| PriceLevel::new(price, size);
    let levels: Vec<PriceLevel> = match side {
        BookSide::Asks => depth_by_price.into_iter().map(to_level).collect(),
        BookSide::Bids => depth_by_price.into_iter().rev().map(to_level).collect(),
    };

    AggregatedSide::from_sorted(side, levels)
}

/// Aggregate the ask side; best = lowest price.
pub fn aggregate_asks(entries: &[PriceLevel]) -> AggregatedSide {
    aggregate(BookSide::Asks, entries)
}

/// Aggregate the bid side; best = highest price.
pub fn aggregate_bids(entries: &[PriceLevel]) -> AggregatedSide {
    aggregate(BookSide::Bids, entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn levels(raw: &[(Decimal, Decimal)]) -> Vec<PriceLevel> {
        raw.iter().map(|&(p, s)| PriceLevel::new(p, s)).collect()
    }

    #[test]
    fn duplicate_prices_are_summed() {
        let entries = levels(&[
            (dec!(0.50), dec!(10)),
            (dec!(0.52), dec!(5)),
            (dec!(0.50), dec!(30)),
            (dec!(0.50), dec!(2.5)),
        ]);

        let asks = aggregate_asks(&entries);

        assert_eq!(
            asks.levels(),
            &[
                PriceLevel::new(dec!(0.50), dec!(42.5)),
                PriceLevel::new(dec!(0.52), dec!(5)),
            ]
        );
    }

    #[test]
    fn aggregated_prices_are_distinct() {
        let entries = levels(&[
            (dec!(0.40), dec!(1)),
            (dec!(0.40), dec!(1)),
            (dec!(0.41), dec!(1)),
            (dec!(0.41), dec!(1)),
        ]);

        let asks = aggregate_asks(&entries);

        let mut prices: Vec<Decimal> = asks.levels().iter().map(|l| l.price).collect();
        prices.dedup();
        assert_eq!(prices.len(), asks.len());
    }

    #[test]
    fn asks_sorted_ascending_bids_descending() {
        let entries = levels(&[
            (dec!(0.55), dec!(1)),
            (dec!(0.48), dec!(1)),
            (dec!(0.51), dec!(1)),
        ]);

        let asks = aggregate_asks(&entries);
        let ask_prices: Vec<Decimal> = asks.levels().iter().map(|l| l.price).collect();
        assert_eq!(ask_prices, vec![dec!(0.48), dec!(0.51), dec!(0.55)]);

        let bids = aggregate_bids(&entries);
        let bid_prices: Vec<Decimal> = bids.levels().iter().map(|l| l.price).collect();
        assert_eq!(bid_prices, vec![dec!(0.55), dec!(0.51), dec!(0.48)]);
    }

    #[test]
    fn non_positive_entries_are_dropped() {
        let entries = levels(&[
            (dec!(0.50), dec!(0)),
            (dec!(0.50), dec!(-3)),
            (dec!(0), dec!(10)),
            (dec!(-0.10), dec!(10)),
            (dec!(0.50), dec!(7)),
        ]);

        let asks = aggregate_asks(&entries);

        assert_eq!(asks.levels(), &[PriceLevel::new(dec!(0.50), dec!(7))]);
    }

    #[test]
    fn best_quote_is_first_level() {
        let entries = levels(&[(dec!(0.52), dec!(100)), (dec!(0.53), dec!(50))]);

        let best = aggregate_asks(&entries).best();
        assert_eq!(best.price, Some(dec!(0.52)));
        assert_eq!(best.depth, dec!(100));

        let best_bid = aggregate_bids(&entries).best();
        assert_eq!(best_bid.price, Some(dec!(0.53)));
        assert_eq!(best_bid.depth, dec!(50));
    }

    #[test]
    fn empty_input_yields_empty_quote() {
        let asks = aggregate_asks(&[]);
        assert!(asks.is_empty());

        let best = asks.best();
        assert_eq!(best.price, None);
        assert_eq!(best.depth, Decimal::ZERO);
    }

    #[test]
    fn aggregation_is_deterministic() {
        let entries = levels(&[
            (dec!(0.50), dec!(10)),
            (dec!(0.49), dec!(20)),
            (dec!(0.50), dec!(5)),
        ]);

        let first = aggregate_asks(&entries);
        let second = aggregate_asks(&entries);
        assert_eq!(first.levels(), second.levels());
    }
}
