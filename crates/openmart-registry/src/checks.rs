//! Shared verification gates.
//!
//! Every state-changing operation re-validates against the live
//! registries immediately before acting: recorded owners go stale the
//! moment an asset moves outside the engine, and approvals can be
//! revoked at any time. These gates are the single place that
//! staleness is caught.

use openmart_types::{AccountId, AssetKey, ContractId, MarketError, Result};
use rust_decimal::Decimal;

use crate::{FungibleAssets, UniqueAssets};

/// The claimed account is the asset's current registry owner.
///
/// # Errors
/// [`MarketError::NotOwner`] when the asset is missing or owned by
/// someone else.
pub fn ensure_live_owner<R: UniqueAssets>(
    nft: &R,
    asset: AssetKey,
    claimed: AccountId,
) -> Result<()> {
    match nft.owner_of(asset) {
        Some(owner) if owner == claimed => Ok(()),
        _ => Err(MarketError::NotOwner { asset }),
    }
}

/// The engine still holds transfer approval for the asset.
///
/// # Errors
/// [`MarketError::NotApproved`] when approval is absent or was revoked.
pub fn ensure_exchange_approved<R: UniqueAssets>(
    nft: &R,
    asset: AssetKey,
    engine: AccountId,
) -> Result<()> {
    if !nft.is_transfer_approved(asset, engine) {
        return Err(MarketError::NotApproved {
            reason: format!("engine holds no transfer approval for asset {asset}"),
        });
    }
    Ok(())
}

/// `spender` may pull at least `amount` of `owner`'s tokens.
///
/// # Errors
/// [`MarketError::NotApproved`] when the allowance falls short.
pub fn ensure_spending_authorized<L: FungibleAssets>(
    tokens: &L,
    asset: ContractId,
    owner: AccountId,
    spender: AccountId,
    amount: Decimal,
) -> Result<()> {
    let allowed = tokens.allowance(asset, owner, spender);
    if allowed < amount {
        return Err(MarketError::NotApproved {
            reason: format!("allowance {allowed} below required {amount}"),
        });
    }
    Ok(())
}

/// `account` holds at least `amount`. Run before settlement so the
/// transfer phase cannot fail halfway.
///
/// # Errors
/// [`MarketError::InsufficientBalance`] when the balance falls short.
pub fn ensure_funds<L: FungibleAssets>(
    tokens: &L,
    asset: ContractId,
    account: AccountId,
    amount: Decimal,
) -> Result<()> {
    let available = tokens.balance_of(asset, account);
    if available < amount {
        return Err(MarketError::InsufficientBalance {
            needed: amount,
            available,
        });
    }
    Ok(())
}
