//! Side (Ask / Bid) of an order.

use serde::{Deserialize, Serialize};

/// Order side: Ask (sell) or Bid (buy).
///
/// Serialized as `"ASK"` / `"BID"` on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Ask,
    Bid,
}
