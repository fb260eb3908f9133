//! Traded instrument identifiers.

use serde::{Deserialize, Serialize};

/// Closed set of tradable instruments.
///
/// A single engine instance serves exactly one instrument; the enum is
/// what keeps the inbound schema closed. Serialized as `"BTC"`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSymbol {
    Btc,
}
