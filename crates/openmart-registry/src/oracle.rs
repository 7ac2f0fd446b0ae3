//! Reference-currency price oracle seam.
//!
//! Stable-coin purchases tender an amount in reference currency; the
//! oracle converts it into the engine's pricing unit before the
//! tolerance check. The engine treats the conversion as opaque.

use openmart_types::ContractId;
use rust_decimal::Decimal;

/// Converts a reference-currency amount into the pricing unit used by
/// listings.
///
/// The `Debug` bound lets the engine store boxed oracles inside its own
/// `Debug`-derived state.
pub trait PriceOracle: std::fmt::Debug {
    fn quote(&self, reference_amount: Decimal) -> Decimal;

    /// The stable contract this oracle prices. Purely informational.
    fn reference_asset(&self) -> ContractId;
}

/// Oracle with a constant linear rate: `quote = amount * rate`.
#[derive(Debug, Clone, Copy)]
pub struct FixedRateOracle {
    reference_asset: ContractId,
    rate: Decimal,
}

impl FixedRateOracle {
    #[must_use]
    pub fn new(reference_asset: ContractId, rate: Decimal) -> Self {
        Self {
            reference_asset,
            rate,
        }
    }

    /// One-to-one oracle: the reference currency is the pricing unit.
    #[must_use]
    pub fn par(reference_asset: ContractId) -> Self {
        Self::new(reference_asset, Decimal::ONE)
    }
}

impl PriceOracle for FixedRateOracle {
    fn quote(&self, reference_amount: Decimal) -> Decimal {
        reference_amount * self.rate
    }

    fn reference_asset(&self) -> ContractId {
        self.reference_asset
    }
}
