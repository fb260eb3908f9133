//! Engine facade.
//!
//! Owns the one [`OrderBook`] for its instrument and exposes the three
//! operations the host is allowed to drive:
//! - [`MatchingEngine::process_order`]: the single invariant-preserving
//!   transition (match, then insert any residual, then notify),
//! - [`MatchingEngine::snapshot`]: pure value-copy read,
//! - [`MatchingEngine::subscribe`] / [`unsubscribe`](MatchingEngine::unsubscribe):
//!   change notifications keyed by an explicit handle.
//!
//! The book is never handed out by live reference. Subscribers are
//! called with a fresh value snapshot per change, so no observer can
//! see a partially-updated book or be affected by later mutation.
//!
//! The engine is synchronous and non-suspending; callers that need
//! isolation run it on a dedicated task and talk to it over channels.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::book::OrderBook;
use crate::matching;
use crate::order::Order;
use crate::side::Side;

/// Handle returned by [`MatchingEngine::subscribe`]; pass it back to
/// [`MatchingEngine::unsubscribe`] to stop receiving notifications.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&OrderBook) + Send>;

/// Matching engine for a single instrument.
#[derive(Default)]
pub struct MatchingEngine {
    book: OrderBook,
    subscribers: HashMap<SubscriptionId, Subscriber>,
    next_subscription: u64,
}

impl MatchingEngine {
    /// Create an engine with an empty book and no subscribers.
    pub fn new() -> Self {
        MatchingEngine::default()
    }

    /// Process one validated order to completion.
    ///
    /// Matches against the opposite side first; only a residual that
    /// survives matching is inserted on the order's own side, so a
    /// crossing price is consumed rather than inserted. Every
    /// registered subscriber is then notified exactly once.
    pub fn process_order(&mut self, mut order: Order) {
        let leftover = match order.side {
            Side::Ask => {
                let leftover = matching::consume(&mut self.book.bids, &mut order);
                if leftover > Decimal::ZERO {
                    matching::insert(&mut self.book.asks, &order);
                }
                leftover
            }
            Side::Bid => {
                let leftover = matching::consume(&mut self.book.asks, &mut order);
                if leftover > Decimal::ZERO {
                    matching::insert(&mut self.book.bids, &order);
                }
                leftover
            }
        };

        debug_assert!(!self.book.is_crossed());

        debug!(
            side = ?order.side,
            price = %order.price,
            resting = %leftover,
            "order processed"
        );

        self.notify();
    }

    /// Independent value copy of the book. Pure; safe to call at any
    /// time, including from inside a subscriber.
    pub fn snapshot(&self) -> OrderBook {
        self.book.clone()
    }

    /// Register `subscriber` to be called with the book after every
    /// future [`process_order`](MatchingEngine::process_order).
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&OrderBook) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.insert(id, Box::new(subscriber));
        id
    }

    /// Remove a subscription. Returns `false` when the handle was
    /// already removed; unsubscribing twice is a no-op, not an error.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    /// Fan the current book out to all subscribers as one shared value
    /// snapshot. A panicking subscriber is isolated so the remaining
    /// subscribers still get notified and the book stays intact.
    fn notify(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }

        let book = self.book.clone();

        for (id, subscriber) in self.subscribers.iter_mut() {
            if catch_unwind(AssertUnwindSafe(|| subscriber(&book))).is_err() {
                warn!(subscription = id.0, "subscriber panicked during notification");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::book::BookEntry;
    use crate::symbol::TradeSymbol;

    fn order(side: Side, price: Decimal, volume: Decimal) -> Order {
        Order::new(price, volume, TradeSymbol::Btc, side).unwrap()
    }

    fn entry(price: Decimal, volume: Decimal) -> BookEntry {
        BookEntry { price, volume }
    }

    #[test]
    fn first_bid_rests_on_an_empty_book() {
        let mut engine = MatchingEngine::new();

        engine.process_order(order(Side::Bid, dec!(59000), dec!(0.01)));

        let book = engine.snapshot();
        assert!(book.asks.is_empty());
        assert_eq!(book.bids, vec![entry(dec!(59000), dec!(0.01))]);
    }

    #[test]
    fn non_crossing_ask_rests_on_its_own_side() {
        let mut engine = MatchingEngine::new();
        engine.process_order(order(Side::Bid, dec!(59000), dec!(0.01)));

        engine.process_order(order(Side::Ask, dec!(60100), dec!(0.01)));

        let book = engine.snapshot();
        assert_eq!(book.asks, vec![entry(dec!(60100), dec!(0.01))]);
        assert_eq!(book.bids, vec![entry(dec!(59000), dec!(0.01))]);
    }

    #[test]
    fn same_price_orders_aggregate_into_one_level() {
        let mut engine = MatchingEngine::new();
        engine.process_order(order(Side::Bid, dec!(59000), dec!(0.01)));
        engine.process_order(order(Side::Ask, dec!(60100), dec!(0.01)));

        engine.process_order(order(Side::Ask, dec!(60100), dec!(0.04)));

        let book = engine.snapshot();
        assert_eq!(book.asks, vec![entry(dec!(60100), dec!(0.05))]);
        assert_eq!(book.bids, vec![entry(dec!(59000), dec!(0.01))]);
    }

    #[test]
    fn crossing_bid_partially_depletes_the_resting_ask() {
        let mut engine = MatchingEngine::new();
        engine.process_order(order(Side::Bid, dec!(59000), dec!(0.01)));
        engine.process_order(order(Side::Ask, dec!(60100), dec!(0.05)));

        engine.process_order(order(Side::Bid, dec!(60100), dec!(0.02)));

        let book = engine.snapshot();
        assert_eq!(book.asks, vec![entry(dec!(60100), dec!(0.03))]);
        assert_eq!(book.bids, vec![entry(dec!(59000), dec!(0.01))]);
    }

    #[test]
    fn aggressive_ask_fills_from_the_best_bid_down() {
        let mut engine = MatchingEngine::new();
        engine.process_order(order(Side::Bid, dec!(58500), dec!(0.08)));
        engine.process_order(order(Side::Bid, dec!(57600), dec!(0.02)));

        engine.process_order(order(Side::Ask, dec!(40000), dec!(0.06)));

        let book = engine.snapshot();
        assert!(book.asks.is_empty());
        assert_eq!(
            book.bids,
            vec![entry(dec!(58500), dec!(0.02)), entry(dec!(57600), dec!(0.02))]
        );
    }

    #[test]
    fn bid_sweeping_every_ask_rests_with_its_residual() {
        let mut engine = MatchingEngine::new();
        engine.process_order(order(Side::Ask, dec!(60010), dec!(0.02)));
        engine.process_order(order(Side::Ask, dec!(60100), dec!(0.03)));
        engine.process_order(order(Side::Ask, dec!(61500), dec!(0.05)));

        engine.process_order(order(Side::Bid, dec!(69420), dec!(0.169)));

        let book = engine.snapshot();
        assert!(book.asks.is_empty());
        assert_eq!(book.bids, vec![entry(dec!(69420), dec!(0.069))]);
    }

    #[test]
    fn snapshot_is_an_independent_copy() {
        let mut engine = MatchingEngine::new();
        engine.process_order(order(Side::Bid, dec!(59000), dec!(0.01)));

        let before = engine.snapshot();
        engine.process_order(order(Side::Ask, dec!(59000), dec!(0.01)));

        assert_eq!(before.bids, vec![entry(dec!(59000), dec!(0.01))]);
        assert!(engine.snapshot().bids.is_empty());
    }

    #[test]
    fn consecutive_snapshots_are_equal() {
        let mut engine = MatchingEngine::new();
        engine.process_order(order(Side::Bid, dec!(59000), dec!(0.01)));

        assert_eq!(engine.snapshot(), engine.snapshot());
    }

    #[test]
    fn subscribers_see_every_change() {
        let mut engine = MatchingEngine::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        engine.subscribe(move |book| sink.lock().unwrap().push(book.clone()));

        engine.process_order(order(Side::Bid, dec!(59000), dec!(0.01)));
        engine.process_order(order(Side::Ask, dec!(60100), dec!(0.01)));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].bids, vec![entry(dec!(59000), dec!(0.01))]);
        assert_eq!(seen[1].asks, vec![entry(dec!(60100), dec!(0.01))]);
    }

    #[test]
    fn unsubscribe_stops_delivery_and_is_idempotent() {
        let mut engine = MatchingEngine::new();
        let count = Arc::new(AtomicUsize::new(0));

        let counter = count.clone();
        let id = engine.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        engine.process_order(order(Side::Bid, dec!(59000), dec!(0.01)));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        assert!(engine.unsubscribe(id));
        assert!(!engine.unsubscribe(id));

        engine.process_order(order(Side::Bid, dec!(58000), dec!(0.01)));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_subscriber_does_not_block_the_rest() {
        let mut engine = MatchingEngine::new();
        let count = Arc::new(AtomicUsize::new(0));

        engine.subscribe(|_| panic!("boom"));
        let counter = count.clone();
        engine.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        engine.process_order(order(Side::Bid, dec!(59000), dec!(0.01)));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(
            engine.snapshot().bids,
            vec![entry(dec!(59000), dec!(0.01))]
        );
    }
}
