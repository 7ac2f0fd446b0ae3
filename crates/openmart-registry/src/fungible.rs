//! The fungible-token ledger seam.
//!
//! Payments, offers, and bids are all backed by allowances on this
//! ledger: funds stay in the buyer's account until settlement pulls
//! them via `transfer_from`. [`MemoryTokens`] is the in-process
//! reference implementation used by tests.

use std::collections::HashMap;

use openmart_types::{AccountId, ContractId, MarketError, Result};
use rust_decimal::Decimal;

/// Balance, allowance, and transfer capability over fungible tokens.
/// One implementation serves any number of token contracts.
pub trait FungibleAssets {
    fn balance_of(&self, asset: ContractId, account: AccountId) -> Decimal;

    /// How much of `owner`'s balance `spender` may currently pull.
    fn allowance(&self, asset: ContractId, owner: AccountId, spender: AccountId) -> Decimal;

    /// Direct transfer out of `from`'s own balance.
    fn transfer(
        &mut self,
        asset: ContractId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()>;

    /// Allowance-backed transfer: `spender` pulls from `from`'s balance.
    /// Consumes allowance.
    fn transfer_from(
        &mut self,
        asset: ContractId,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()>;
}

/// In-memory fungible-token ledger.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokens {
    /// (asset, account) -> balance.
    balances: HashMap<(ContractId, AccountId), Decimal>,
    /// (asset, owner, spender) -> remaining allowance.
    allowances: HashMap<(ContractId, AccountId, AccountId), Decimal>,
}

impl MemoryTokens {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit freshly issued tokens to an account.
    ///
    /// # Errors
    /// [`MarketError::InvalidParameter`] on a negative amount.
    pub fn mint(&mut self, asset: ContractId, account: AccountId, amount: Decimal) -> Result<()> {
        Self::check_amount(amount)?;
        *self.balances.entry((asset, account)).or_insert(Decimal::ZERO) += amount;
        Ok(())
    }

    /// Set (not add to) the allowance `owner -> spender`.
    ///
    /// # Errors
    /// [`MarketError::InvalidParameter`] on a negative amount.
    pub fn approve(
        &mut self,
        asset: ContractId,
        owner: AccountId,
        spender: AccountId,
        amount: Decimal,
    ) -> Result<()> {
        Self::check_amount(amount)?;
        self.allowances.insert((asset, owner, spender), amount);
        Ok(())
    }

    fn check_amount(amount: Decimal) -> Result<()> {
        if amount < Decimal::ZERO {
            return Err(MarketError::InvalidParameter {
                reason: format!("negative amount {amount}"),
            });
        }
        Ok(())
    }

    fn debit(&mut self, asset: ContractId, from: AccountId, amount: Decimal) -> Result<()> {
        let available = self.balance_of(asset, from);
        if available < amount {
            return Err(MarketError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        *self.balances.entry((asset, from)).or_insert(Decimal::ZERO) -= amount;
        Ok(())
    }

    fn credit(&mut self, asset: ContractId, to: AccountId, amount: Decimal) {
        *self.balances.entry((asset, to)).or_insert(Decimal::ZERO) += amount;
    }
}

impl FungibleAssets for MemoryTokens {
    fn balance_of(&self, asset: ContractId, account: AccountId) -> Decimal {
        self.balances
            .get(&(asset, account))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    fn allowance(&self, asset: ContractId, owner: AccountId, spender: AccountId) -> Decimal {
        self.allowances
            .get(&(asset, owner, spender))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    fn transfer(
        &mut self,
        asset: ContractId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()> {
        Self::check_amount(amount)?;
        self.debit(asset, from, amount)?;
        self.credit(asset, to, amount);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        asset: ContractId,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()> {
        Self::check_amount(amount)?;
        let allowed = self.allowance(asset, from, spender);
        if allowed < amount {
            return Err(MarketError::NotApproved {
                reason: format!("allowance {allowed} below transfer amount {amount}"),
            });
        }
        self.debit(asset, from, amount)?;
        self.credit(asset, to, amount);
        self.allowances.insert((asset, from, spender), allowed - amount);
        Ok(())
    }
}
