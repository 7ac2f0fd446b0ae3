//! The bid book: standing bids on active auctions.
//!
//! Unlike offers, bids require a live auction listing and must clear
//! its floor price. Keyed by [`BidKey`]; several bidders can be in
//! play on the same asset at once, and the seller settles against
//! exactly one of them. Losing bids stay until cancelled.

use std::collections::HashMap;

use openmart_registry::{
    FungibleAssets, UniqueAssets, ensure_live_owner, ensure_spending_authorized,
};
use openmart_types::{AccountId, AssetKey, Bid, BidKey, ContractId, MarketError, Result};
use rust_decimal::Decimal;

use crate::ListingBook;

/// All standing bids.
#[derive(Debug, Default)]
pub struct BidBook {
    bids: HashMap<BidKey, Bid>,
}

impl BidBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =================================================================
    // Placement
    // =================================================================

    /// Bid `amount` in `payment_asset` on the auction for `asset`.
    ///
    /// # Errors
    /// `InvalidState` when the asset is unlisted, not an auction, or
    /// this bidder already has a bid; `NotOwner` when `target_owner`
    /// drifted from the live owner or the listing's seller;
    /// `InvalidParameter` for self-bids; `PriceOutOfRange` below the
    /// floor; `NotApproved` when the allowance falls short.
    pub fn place<R: UniqueAssets, L: FungibleAssets>(
        &mut self,
        listings: &ListingBook,
        nft: &R,
        tokens: &L,
        engine: AccountId,
        bidder: AccountId,
        target_owner: AccountId,
        asset: AssetKey,
        payment_asset: ContractId,
        amount: Decimal,
    ) -> Result<()> {
        let listing = listings.require(asset)?;
        if !listing.is_auction() {
            return Err(MarketError::InvalidState {
                reason: format!("asset {asset} is not listed for auction"),
            });
        }
        ensure_live_owner(nft, asset, target_owner)?;
        if listing.seller != target_owner {
            return Err(MarketError::NotOwner { asset });
        }
        if bidder == target_owner {
            return Err(MarketError::InvalidParameter {
                reason: "cannot bid on an owned asset".to_string(),
            });
        }
        if amount < listing.bid_floor() {
            return Err(MarketError::PriceOutOfRange {
                tendered: amount,
                floor: listing.bid_floor(),
            });
        }
        ensure_spending_authorized(tokens, payment_asset, bidder, engine, amount)?;

        let bid = Bid::new(bidder, target_owner, asset, payment_asset, amount);
        if self.bids.contains_key(&bid.key()) {
            return Err(MarketError::InvalidState {
                reason: format!("bid on asset {asset} already exists"),
            });
        }
        self.bids.insert(bid.key(), bid);
        Ok(())
    }

    // =================================================================
    // Cancellation
    // =================================================================

    /// Withdraw a bid. The auction listing must still exist; once it is
    /// consumed or cancelled, leftover bid records become unreachable
    /// here and only the bidder's own ledger allowance still matters.
    ///
    /// # Errors
    /// `InvalidState` when the asset is unlisted or no bid matches;
    /// `NotOwner` when `target_owner` is stale.
    pub fn cancel<R: UniqueAssets>(
        &mut self,
        listings: &ListingBook,
        nft: &R,
        bidder: AccountId,
        target_owner: AccountId,
        asset: AssetKey,
        payment_asset: ContractId,
    ) -> Result<Bid> {
        listings.require(asset)?;
        ensure_live_owner(nft, asset, target_owner)?;
        let key = BidKey {
            bidder,
            seller: target_owner,
            asset,
        };
        let Some(bid) = self.bids.remove(&key) else {
            return Err(MarketError::InvalidState {
                reason: format!("no matching bid on asset {asset}"),
            });
        };
        if bid.payment_asset != payment_asset {
            self.bids.insert(key, bid);
            return Err(MarketError::InvalidState {
                reason: format!("no matching bid on asset {asset}"),
            });
        }
        Ok(bid)
    }

    // =================================================================
    // Queries
    // =================================================================

    #[must_use]
    pub fn get(&self, key: BidKey) -> Option<&Bid> {
        self.bids.get(&key)
    }

    /// The bid for `key`, required to exist and to name `payment_asset`.
    pub fn matching(&self, key: BidKey, payment_asset: ContractId) -> Result<&Bid> {
        match self.bids.get(&key) {
            Some(bid) if bid.payment_asset == payment_asset => Ok(bid),
            _ => Err(MarketError::InvalidState {
                reason: format!("no matching bid on asset {}", key.asset),
            }),
        }
    }

    /// All standing bids on one asset, any bidder.
    #[must_use]
    pub fn bids_for(&self, asset: AssetKey) -> Vec<&Bid> {
        self.bids.values().filter(|b| b.asset == asset).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty()
    }

    // =================================================================
    // Consumption
    // =================================================================

    /// Remove a bid without validation, after the engine's check pass.
    pub fn take(&mut self, key: BidKey) -> Option<Bid> {
        self.bids.remove(&key)
    }
}
