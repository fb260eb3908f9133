//! Single-instrument order book built from aggregated price levels.
//!
//! - Asks: ascending by price (best = lowest, index 0).
//! - Bids: descending by price (best = highest, index 0).
//! - One entry per price; same-price volume is summed, so individual
//!   orders lose their identity once they rest here.
//! - Entries always hold strictly positive volume; a depleted level is
//!   removed, never retained.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One aggregated resting price level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Sum of all resting volume at this price.
    #[serde(with = "rust_decimal::serde::float")]
    pub volume: Decimal,
}

/// Both sides of the book.
///
/// Serializes to the wire shape
/// `{ "asks": [{"price": .., "volume": ..}, ..], "bids": [..] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Ascending by price.
    pub asks: Vec<BookEntry>,

    /// Descending by price.
    pub bids: Vec<BookEntry>,
}

impl OrderBook {
    /// Create an empty book.
    pub fn new() -> Self {
        OrderBook::default()
    }

    /// Lowest-priced ask, if any.
    pub fn best_ask(&self) -> Option<&BookEntry> {
        self.asks.first()
    }

    /// Highest-priced bid, if any.
    pub fn best_bid(&self) -> Option<&BookEntry> {
        self.bids.first()
    }

    /// A crossed book (best ask at or below best bid) means matching
    /// stopped early; it must never be observable after processing.
    pub fn is_crossed(&self) -> bool {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => ask.price <= bid.price,
            _ => false,
        }
    }

    /// Total resting volume on one side.
    pub fn side_volume(entries: &[BookEntry]) -> Decimal {
        entries.iter().map(|entry| entry.volume).sum()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn entry(price: Decimal, volume: Decimal) -> BookEntry {
        BookEntry { price, volume }
    }

    #[test]
    fn best_prices_come_from_index_zero() {
        let book = OrderBook {
            asks: vec![entry(dec!(60100), dec!(0.05)), entry(dec!(61500), dec!(0.02))],
            bids: vec![entry(dec!(59000), dec!(0.01)), entry(dec!(58500), dec!(0.04))],
        };

        assert_eq!(book.best_ask().unwrap().price, dec!(60100));
        assert_eq!(book.best_bid().unwrap().price, dec!(59000));
    }

    #[test]
    fn empty_sides_never_cross() {
        assert!(!OrderBook::new().is_crossed());

        let one_sided = OrderBook {
            asks: vec![entry(dec!(60100), dec!(0.05))],
            bids: Vec::new(),
        };
        assert!(!one_sided.is_crossed());
    }

    #[test]
    fn crossed_book_is_detected() {
        let crossed = OrderBook {
            asks: vec![entry(dec!(59000), dec!(0.05))],
            bids: vec![entry(dec!(59000), dec!(0.01))],
        };
        assert!(crossed.is_crossed());
    }

    #[test]
    fn serializes_to_plain_numbers() {
        let book = OrderBook {
            asks: vec![entry(dec!(60100), dec!(0.05))],
            bids: Vec::new(),
        };

        let json = serde_json::to_string(&book).unwrap();
        assert_eq!(json, r#"{"asks":[{"price":60100.0,"volume":0.05}],"bids":[]}"#);
    }
}
