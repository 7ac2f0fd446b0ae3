//! Fee schedule: service fee and price tolerance in basis points.
//!
//! Both knobs are injected into the engine at construction and read on
//! every operation, so changes apply to subsequent settlements only.
//! All arithmetic is exact [`Decimal`] math; the denominators are powers
//! of ten so the divisions terminate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    BPS_DENOMINATOR, DEFAULT_SERVICE_FEE_BPS, DEFAULT_SLIPPAGE_BPS, MAX_FEE_BPS,
};
use crate::{MarketError, Result};

/// The engine's pricing parameters.
///
/// - `service_fee_bps`: share of every settlement price retained by
///   the treasury.
/// - `slippage_bps`: how far below the listed price a tendered amount
///   (or its oracle quote) may fall and still settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    service_fee_bps: u32,
    slippage_bps: u32,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            service_fee_bps: DEFAULT_SERVICE_FEE_BPS,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
        }
    }
}

impl FeeSchedule {
    /// # Errors
    /// [`MarketError::InvalidParameter`] when either knob exceeds
    /// [`MAX_FEE_BPS`].
    pub fn new(service_fee_bps: u32, slippage_bps: u32) -> Result<Self> {
        let mut schedule = Self::default();
        schedule.set_service_fee(service_fee_bps)?;
        schedule.set_slippage(slippage_bps)?;
        Ok(schedule)
    }

    #[must_use]
    pub fn service_fee_bps(&self) -> u32 {
        self.service_fee_bps
    }

    #[must_use]
    pub fn slippage_bps(&self) -> u32 {
        self.slippage_bps
    }

    /// # Errors
    /// [`MarketError::InvalidParameter`] when `bps > MAX_FEE_BPS`.
    pub fn set_service_fee(&mut self, bps: u32) -> Result<()> {
        Self::check_bps(bps)?;
        self.service_fee_bps = bps;
        Ok(())
    }

    /// # Errors
    /// [`MarketError::InvalidParameter`] when `bps > MAX_FEE_BPS`.
    pub fn set_slippage(&mut self, bps: u32) -> Result<()> {
        Self::check_bps(bps)?;
        self.slippage_bps = bps;
        Ok(())
    }

    fn check_bps(bps: u32) -> Result<()> {
        if bps > MAX_FEE_BPS {
            return Err(MarketError::InvalidParameter {
                reason: format!("basis points {bps} exceed maximum {MAX_FEE_BPS}"),
            });
        }
        Ok(())
    }

    /// Fee on a settlement price: `price * service_fee_bps / 10_000`.
    /// Always computed on the settlement price, never on a tendered
    /// amount.
    #[must_use]
    pub fn service_fee(&self, price: Decimal) -> Decimal {
        price * Decimal::from(self.service_fee_bps) / Decimal::from(BPS_DENOMINATOR)
    }

    /// Split a settlement price into (seller proceeds, treasury fee).
    /// The two always sum back to `price` exactly.
    #[must_use]
    pub fn split(&self, price: Decimal) -> (Decimal, Decimal) {
        let fee = self.service_fee(price);
        (price - fee, fee)
    }

    /// Lowest acceptable tender against a listed price:
    /// `price * (10_000 - slippage_bps) / 10_000`.
    #[must_use]
    pub fn tolerance_floor(&self, price: Decimal) -> Decimal {
        price * Decimal::from(BPS_DENOMINATOR - self.slippage_bps)
            / Decimal::from(BPS_DENOMINATOR)
    }

    /// One-sided tolerance check: over-tender is always acceptable.
    #[must_use]
    pub fn within_tolerance(&self, price: Decimal, tendered: Decimal) -> bool {
        tendered >= self.tolerance_floor(price)
    }
}
