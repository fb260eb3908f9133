//! Incoming order representation.
//!
//! An [`Order`] can only be built through [`Order::new`], which enforces
//! the engine's precondition (positive price and volume within the
//! fixed precision limits). The engine mutates `volume` in place while
//! matching; it tracks the remaining unfilled volume and the order is
//! discarded once processed.

use rust_decimal::Decimal;

use crate::error::OrderError;
use crate::numeric::{fits_scale, PRICE_DP, VOLUME_DP};
use crate::side::Side;
use crate::symbol::TradeSymbol;

/// A validated instruction to buy (`Bid`) or sell (`Ask`) at a limit
/// price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub(crate) price: Decimal,
    pub(crate) volume: Decimal,
    pub(crate) symbol: TradeSymbol,
    pub(crate) side: Side,
}

impl Order {
    /// Build an order, rejecting values the engine is not defined for.
    pub fn new(
        price: Decimal,
        volume: Decimal,
        symbol: TradeSymbol,
        side: Side,
    ) -> Result<Self, OrderError> {
        if price <= Decimal::ZERO {
            return Err(OrderError::NonPositivePrice);
        }
        if !fits_scale(price, PRICE_DP) {
            return Err(OrderError::PricePrecision);
        }
        if volume <= Decimal::ZERO {
            return Err(OrderError::NonPositiveVolume);
        }
        if !fits_scale(volume, VOLUME_DP) {
            return Err(OrderError::VolumePrecision);
        }

        Ok(Order {
            price,
            volume,
            symbol,
            side,
        })
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Remaining unfilled volume. Starts at the submitted volume and
    /// decreases as the order matches resting liquidity.
    pub fn volume(&self) -> Decimal {
        self.volume
    }

    pub fn symbol(&self) -> TradeSymbol {
        self.symbol
    }

    pub fn side(&self) -> Side {
        self.side
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn accepts_conforming_orders() {
        let order = Order::new(dec!(59000.50), dec!(0.00000001), TradeSymbol::Btc, Side::Bid);
        assert!(order.is_ok());
    }

    #[test]
    fn accepts_trailing_zero_precision() {
        let order = Order::new(dec!(10.100), dec!(1.000000000), TradeSymbol::Btc, Side::Ask);
        assert!(order.is_ok());
    }

    #[test]
    fn rejects_non_positive_price() {
        assert_eq!(
            Order::new(dec!(0), dec!(1), TradeSymbol::Btc, Side::Ask),
            Err(OrderError::NonPositivePrice)
        );
        assert_eq!(
            Order::new(dec!(-1), dec!(1), TradeSymbol::Btc, Side::Ask),
            Err(OrderError::NonPositivePrice)
        );
    }

    #[test]
    fn rejects_excess_price_precision() {
        assert_eq!(
            Order::new(dec!(59000.505), dec!(1), TradeSymbol::Btc, Side::Bid),
            Err(OrderError::PricePrecision)
        );
    }

    #[test]
    fn rejects_non_positive_volume() {
        assert_eq!(
            Order::new(dec!(100), dec!(0), TradeSymbol::Btc, Side::Bid),
            Err(OrderError::NonPositiveVolume)
        );
    }

    #[test]
    fn rejects_excess_volume_precision() {
        assert_eq!(
            Order::new(dec!(100), dec!(0.000000001), TradeSymbol::Btc, Side::Bid),
            Err(OrderError::VolumePrecision)
        );
    }
}
