//! The unique-asset registry seam.
//!
//! The engine never holds listed assets. It reads ownership, checks its
//! transfer approval, and moves a token only at the moment of
//! settlement, all through [`UniqueAssets`]. Production deployments
//! implement the trait against a real registry; [`MemoryNft`] is the
//! in-process reference used by tests.

use std::collections::HashMap;

use openmart_types::{AccountId, AssetKey, MarketError, Result};

/// Read and transfer capability over unique assets.
pub trait UniqueAssets {
    /// Current owner of the asset, or `None` if it does not exist.
    fn owner_of(&self, asset: AssetKey) -> Option<AccountId>;

    /// Whether `spender` currently holds transfer approval for the
    /// asset. Owners move their own assets without an approval entry.
    fn is_transfer_approved(&self, asset: AssetKey, spender: AccountId) -> bool;

    /// Move the asset `from -> to`, authorized by `spender` (the owner
    /// or the approved account). Clears any standing approval.
    fn transfer_from(
        &mut self,
        spender: AccountId,
        asset: AssetKey,
        from: AccountId,
        to: AccountId,
    ) -> Result<()>;
}

/// In-memory unique-asset registry.
#[derive(Debug, Clone, Default)]
pub struct MemoryNft {
    owners: HashMap<AssetKey, AccountId>,
    approvals: HashMap<AssetKey, AccountId>,
}

impl MemoryNft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new asset owned by `owner`.
    ///
    /// # Errors
    /// [`MarketError::InvalidState`] when the asset already exists.
    pub fn mint(&mut self, owner: AccountId, asset: AssetKey) -> Result<()> {
        if self.owners.contains_key(&asset) {
            return Err(MarketError::InvalidState {
                reason: format!("asset {asset} already minted"),
            });
        }
        self.owners.insert(asset, owner);
        Ok(())
    }

    /// Grant `spender` transfer approval. Only the current owner may
    /// grant it; a later grant replaces an earlier one.
    ///
    /// # Errors
    /// [`MarketError::NotOwner`] when `caller` does not own the asset.
    pub fn approve(&mut self, caller: AccountId, asset: AssetKey, spender: AccountId) -> Result<()> {
        match self.owners.get(&asset) {
            Some(owner) if *owner == caller => {
                self.approvals.insert(asset, spender);
                Ok(())
            }
            _ => Err(MarketError::NotOwner { asset }),
        }
    }

    /// Withdraw an outstanding approval. Owner-only, like granting.
    ///
    /// # Errors
    /// [`MarketError::NotOwner`] when `caller` does not own the asset.
    pub fn revoke_approval(&mut self, caller: AccountId, asset: AssetKey) -> Result<()> {
        match self.owners.get(&asset) {
            Some(owner) if *owner == caller => {
                self.approvals.remove(&asset);
                Ok(())
            }
            _ => Err(MarketError::NotOwner { asset }),
        }
    }

    #[must_use]
    pub fn asset_count(&self) -> usize {
        self.owners.len()
    }
}

impl UniqueAssets for MemoryNft {
    fn owner_of(&self, asset: AssetKey) -> Option<AccountId> {
        self.owners.get(&asset).copied()
    }

    fn is_transfer_approved(&self, asset: AssetKey, spender: AccountId) -> bool {
        self.approvals.get(&asset) == Some(&spender)
    }

    fn transfer_from(
        &mut self,
        spender: AccountId,
        asset: AssetKey,
        from: AccountId,
        to: AccountId,
    ) -> Result<()> {
        let owner = self
            .owners
            .get(&asset)
            .copied()
            .ok_or(MarketError::NotOwner { asset })?;
        if owner != from {
            return Err(MarketError::NotOwner { asset });
        }
        if spender != owner && !self.is_transfer_approved(asset, spender) {
            return Err(MarketError::NotApproved {
                reason: format!("{spender} may not transfer asset {asset}"),
            });
        }
        self.owners.insert(asset, to);
        self.approvals.remove(&asset);
        Ok(())
    }
}
