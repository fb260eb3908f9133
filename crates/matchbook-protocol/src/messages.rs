//! Logical messages crossing the host boundary.
//!
//! Inbound ([`ClientRequest`]):
//!
//! - `{"type": "PROCESS_ORDER", "payload": {"price": 59000, "volume": 0.01, "symbol": "BTC", "side": "BID"}}`
//! - `{"type": "GET_SNAPSHOT", "payload": {"limit": 20}}` (empty payload
//!   object falls back to [`DEFAULT_BOOK_DEPTH`])
//! - `{"type": "SUBSCRIBE", "payload": {"limit": 20}}`
//!
//! Outbound ([`ServerMessage`]):
//!
//! - `{"type": "ORDER_ACCEPTED", "payload": {"id": <uuid>, "order": {..}}}`
//! - `{"type": "SNAPSHOT", "payload": {"asks": [..], "bids": [..]}}`
//! - `{"type": "ORDER_BOOK_CHANGE", "payload": {"asks": [..], "bids": [..]}}`
//! - `{"type": "ERROR", "payload": {"message": ..}}`
//!
//! Prices and volumes travel as plain JSON numbers; conversion into a
//! core [`Order`] runs the core validator, so nothing unvalidated ever
//! reaches the engine.

use matchbook_core::{Order, OrderBook, OrderError, Side, TradeSymbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Book entries sent per side when a request names no limit.
pub const DEFAULT_BOOK_DEPTH: usize = 20;

/// A request from a connected client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientRequest {
    /// Submit an order for matching. Fire-and-forget from the engine's
    /// point of view; the host acks with `ORDER_ACCEPTED`.
    ProcessOrder(NewOrderRequest),

    /// Ask for a point-in-time book, truncated to `limit` per side.
    GetSnapshot(SnapshotRequest),

    /// Start receiving `ORDER_BOOK_CHANGE` events, truncated to
    /// `limit` per side.
    Subscribe(SubscribeRequest),
}

/// A message from the host to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// The submitted order passed validation and was handed to the
    /// engine.
    OrderAccepted(OrderAccepted),

    /// Reply to `GET_SNAPSHOT`.
    Snapshot(OrderBook),

    /// Broadcast after every processed order.
    OrderBookChange(OrderBook),

    /// Validation failure or host-side error (e.g. snapshot timeout).
    Error(ErrorMessage),
}

/// Raw order fields as they arrive on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub volume: Decimal,

    pub symbol: TradeSymbol,

    pub side: Side,
}

impl NewOrderRequest {
    /// Validate into a core [`Order`].
    pub fn to_order(&self) -> Result<Order, OrderError> {
        Order::new(self.price, self.volume, self.symbol, self.side)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRequest {
    #[serde(default = "default_depth")]
    pub limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default = "default_depth")]
    pub limit: usize,
}

fn default_depth() -> usize {
    DEFAULT_BOOK_DEPTH
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAccepted {
    /// Fresh id assigned by the host; the engine itself keeps no order
    /// identity.
    pub id: Uuid,

    /// The validated order as submitted.
    pub order: NewOrderRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ErrorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorMessage {
            message: message.into(),
        }
    }
}
