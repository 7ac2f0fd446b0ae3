//! Accrued-fee ledger for the exchange.
//!
//! Every settlement deposits its service fee here, keyed by the payment
//! contract it was collected in. The treasury only tracks what the engine
//! has earned; the funds themselves sit on the engine's account inside the
//! fungible-asset registry until the exchange owner withdraws them.

use std::collections::HashMap;

use openmart_types::{ContractId, MarketError, Result};
use rust_decimal::Decimal;

/// Per-contract fee balances accrued by the exchange.
#[derive(Debug, Clone, Default)]
pub struct Treasury {
    balances: HashMap<ContractId, Decimal>,
}

impl Treasury {
    /// Creates an empty treasury.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a collected fee in the given payment contract.
    pub fn credit(&mut self, asset: ContractId, amount: Decimal) {
        *self.balances.entry(asset).or_insert(Decimal::ZERO) += amount;
    }

    /// Removes `amount` from the accrued balance of `asset`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::InsufficientTreasury`] if the accrued balance
    /// is below the requested amount.
    pub fn debit(&mut self, asset: ContractId, amount: Decimal) -> Result<()> {
        let held = self.balance(asset);
        if held < amount {
            return Err(MarketError::InsufficientTreasury {
                requested: amount,
                held,
            });
        }
        self.balances.insert(asset, held - amount);
        Ok(())
    }

    /// Accrued balance for a payment contract (zero when never credited).
    #[must_use]
    pub fn balance(&self, asset: ContractId) -> Decimal {
        self.balances.get(&asset).copied().unwrap_or(Decimal::ZERO)
    }

    /// Payment contracts with a non-zero accrued balance.
    #[must_use]
    pub fn funded_assets(&self) -> Vec<ContractId> {
        self.balances
            .iter()
            .filter(|(_, amount)| **amount > Decimal::ZERO)
            .map(|(asset, _)| *asset)
            .collect()
    }
}
