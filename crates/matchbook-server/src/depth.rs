//! Host-side book truncation.
//!
//! The engine always reports the full book; how much of it a client
//! sees is a presentation concern, so the slicing lives here.

use matchbook_core::OrderBook;

/// Copy at most `limit` entries per side, best prices first.
pub fn book_with_limit(book: &OrderBook, limit: usize) -> OrderBook {
    OrderBook {
        asks: book.asks.iter().take(limit).copied().collect(),
        bids: book.bids.iter().take(limit).copied().collect(),
    }
}
