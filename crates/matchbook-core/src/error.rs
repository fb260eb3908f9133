//! Error types for the core crate.
//!
//! The only fallible surface is order construction; matching and
//! insertion are infallible by construction (they operate on orders
//! that already passed validation).

use thiserror::Error;

/// Rejection reasons for an incoming order.
///
/// These mirror the host-side schema: price > 0 with at most 2 decimal
/// places, volume > 0 with at most 8 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("price must be greater than zero")]
    NonPositivePrice,

    #[error("price must have at most 2 decimal places")]
    PricePrecision,

    #[error("volume must be greater than zero")]
    NonPositiveVolume,

    #[error("volume must have at most 8 decimal places")]
    VolumePrecision,
}
