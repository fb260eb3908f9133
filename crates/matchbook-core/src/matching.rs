//! Matching and insertion over one side of the book.
//!
//! Both operations assume their input sequence is already sorted for
//! its side (asks ascending, bids descending); that is a precondition
//! maintained by the engine facade, not re-validated here.

use rust_decimal::Decimal;

use crate::book::BookEntry;
use crate::numeric::round_volume;
use crate::order::Order;
use crate::side::Side;

/// Whether `order` can trade against `entry`.
///
/// An exhausted order never matches. An Ask hits any bid priced at or
/// above its limit; a Bid hits any ask priced at or below its limit.
pub fn is_match(order: &Order, entry: &BookEntry) -> bool {
    if order.volume <= Decimal::ZERO {
        return false;
    }

    match order.side {
        Side::Ask => order.price <= entry.price,
        Side::Bid => order.price >= entry.price,
    }
}

/// Consume opposite-side liquidity against `order`, best price first.
///
/// Walks the sequence from index 0, depleting entries until the order
/// is exhausted or the next entry no longer matches. A partially
/// depleted entry keeps its shrunken volume; a fully depleted entry is
/// removed, which shifts the next candidate into position 0. Every
/// volume written back is rounded to the fixed precision.
///
/// Returns the order's leftover volume (>= 0).
pub fn consume(entries: &mut Vec<BookEntry>, order: &mut Order) -> Decimal {
    while let Some(entry) = entries.first_mut() {
        if !is_match(order, entry) {
            break;
        }

        let delta = round_volume(entry.volume - order.volume);

        if delta > Decimal::ZERO {
            // Order fully filled; the entry survives with the rest.
            entry.volume = delta;
            order.volume = Decimal::ZERO;
            break;
        }

        // Entry fully depleted; keep matching from the same index.
        entries.remove(0);
        order.volume = round_volume(-delta);
    }

    order.volume
}

/// Insert an order's residual volume into its own side.
///
/// Binary search with a comparator oriented by side: on an exact price
/// hit the volumes aggregate (depth order is unchanged), otherwise the
/// search converges on the index that keeps the sequence sorted and a
/// new entry is spliced in there.
///
/// Callers must not pass an exhausted order; residual volume of zero is
/// guarded by the facade.
pub fn insert(entries: &mut Vec<BookEntry>, order: &Order) {
    let position = match order.side {
        Side::Ask => entries.binary_search_by(|entry| entry.price.cmp(&order.price)),
        Side::Bid => entries.binary_search_by(|entry| order.price.cmp(&entry.price)),
    };

    match position {
        Ok(found) => entries[found].volume = round_volume(entries[found].volume + order.volume),
        Err(slot) => entries.insert(
            slot,
            BookEntry {
                price: order.price,
                volume: order.volume,
            },
        ),
    }
}
