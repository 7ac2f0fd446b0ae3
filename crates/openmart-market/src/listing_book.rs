//! The listing book: every asset currently up for sale.
//!
//! Keyed by [`AssetKey`], so an asset is listed at most once. Creation
//! and cancellation validate against the live registry; consumption
//! (`take`) is left to the settlement engine, which runs its own check
//! pass first.

use std::collections::HashMap;

use openmart_registry::{UniqueAssets, ensure_exchange_approved, ensure_live_owner};
use openmart_types::{
    AccountId, AssetKey, Listing, ListingRequest, MarketError, Result, SaleTerms,
};
use rust_decimal::Decimal;

/// All active listings.
#[derive(Debug, Default)]
pub struct ListingBook {
    listings: HashMap<AssetKey, Listing>,
}

impl ListingBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =================================================================
    // Creation
    // =================================================================

    /// List an asset for sale.
    ///
    /// The caller must be the live owner and must already have approved
    /// `engine` for transfer; the terms are validated per sale mode.
    ///
    /// # Errors
    /// `NotOwner`, `NotApproved`, `InvalidState` (already listed), or
    /// `InvalidParameter` (zero price, bad mode combination).
    pub fn create<R: UniqueAssets>(
        &mut self,
        nft: &R,
        engine: AccountId,
        caller: AccountId,
        request: ListingRequest,
    ) -> Result<()> {
        ensure_live_owner(nft, request.asset, caller)?;
        ensure_exchange_approved(nft, request.asset, engine)?;
        if self.listings.contains_key(&request.asset) {
            return Err(MarketError::InvalidState {
                reason: format!("asset {} is already listed", request.asset),
            });
        }
        if request.price <= Decimal::ZERO {
            return Err(MarketError::InvalidParameter {
                reason: "listing price must be positive".to_string(),
            });
        }
        let terms = SaleTerms::from_parts(
            request.mode,
            request.stable_coin_accepted,
            request.accepted_assets,
            request.auction_end,
        )?;

        self.listings.insert(
            request.asset,
            Listing::new(caller, request.asset, request.price, terms),
        );
        Ok(())
    }

    // =================================================================
    // Cancellation
    // =================================================================

    /// Cancel a listing. Only the live owner may cancel. Returns the
    /// removed listing.
    ///
    /// # Errors
    /// `NotOwner` or `InvalidState` (not listed).
    pub fn cancel<R: UniqueAssets>(
        &mut self,
        nft: &R,
        caller: AccountId,
        asset: AssetKey,
    ) -> Result<Listing> {
        ensure_live_owner(nft, asset, caller)?;
        self.listings
            .remove(&asset)
            .ok_or_else(|| MarketError::InvalidState {
                reason: format!("asset {asset} is not listed"),
            })
    }

    // =================================================================
    // Queries
    // =================================================================

    #[must_use]
    pub fn get(&self, asset: AssetKey) -> Option<&Listing> {
        self.listings.get(&asset)
    }

    /// Like [`ListingBook::get`], but missing listings are an error.
    pub fn require(&self, asset: AssetKey) -> Result<&Listing> {
        self.listings
            .get(&asset)
            .ok_or_else(|| MarketError::InvalidState {
                reason: format!("asset {asset} is not listed"),
            })
    }

    #[must_use]
    pub fn contains(&self, asset: AssetKey) -> bool {
        self.listings.contains_key(&asset)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    // =================================================================
    // Consumption
    // =================================================================

    /// Remove a listing without validation. The settlement engine calls
    /// this after its check pass, marking the record consumed before
    /// any transfer runs.
    pub fn take(&mut self, asset: AssetKey) -> Option<Listing> {
        self.listings.remove(&asset)
    }
}

#[cfg(test)]
mod tests {
    use openmart_registry::MemoryNft;
    use openmart_types::{ContractId, SaleMode};

    use super::*;

    fn request(asset: AssetKey, price: Decimal) -> ListingRequest {
        ListingRequest {
            asset,
            price,
            stable_coin_accepted: true,
            accepted_assets: vec![ContractId::new()],
            mode: SaleMode::Fixed,
            auction_end: None,
        }
    }

    /// Registry with one minted asset approved to the engine.
    fn ready_registry() -> (MemoryNft, AccountId, AccountId, AssetKey) {
        let mut nft = MemoryNft::new();
        let engine = AccountId::new();
        let alice = AccountId::new();
        let asset = AssetKey::dummy();
        nft.mint(alice, asset).unwrap();
        nft.approve(alice, asset, engine).unwrap();
        (nft, engine, alice, asset)
    }

    #[test]
    fn create_and_query() {
        let (nft, engine, alice, asset) = ready_registry();
        let mut book = ListingBook::new();

        book.create(&nft, engine, alice, request(asset, Decimal::new(100, 0)))
            .unwrap();
        let listing = book.get(asset).unwrap();
        assert_eq!(listing.seller, alice);
        assert_eq!(listing.price, Decimal::new(100, 0));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn non_owner_cannot_list() {
        let (nft, engine, _alice, asset) = ready_registry();
        let mut book = ListingBook::new();

        let result = book.create(&nft, engine, AccountId::new(), request(asset, Decimal::ONE));
        assert!(matches!(result, Err(MarketError::NotOwner { .. })));
        assert!(book.is_empty());
    }

    #[test]
    fn unapproved_asset_cannot_be_listed() {
        let mut nft = MemoryNft::new();
        let alice = AccountId::new();
        let asset = AssetKey::dummy();
        nft.mint(alice, asset).unwrap();
        let mut book = ListingBook::new();

        let result = book.create(&nft, AccountId::new(), alice, request(asset, Decimal::ONE));
        assert!(matches!(result, Err(MarketError::NotApproved { .. })));
    }

    #[test]
    fn duplicate_listing_rejected() {
        let (nft, engine, alice, asset) = ready_registry();
        let mut book = ListingBook::new();
        book.create(&nft, engine, alice, request(asset, Decimal::new(10, 0)))
            .unwrap();

        let result = book.create(&nft, engine, alice, request(asset, Decimal::new(20, 0)));
        assert!(matches!(result, Err(MarketError::InvalidState { .. })));
    }

    #[test]
    fn zero_price_rejected() {
        let (nft, engine, alice, asset) = ready_registry();
        let mut book = ListingBook::new();

        let result = book.create(&nft, engine, alice, request(asset, Decimal::ZERO));
        assert!(matches!(result, Err(MarketError::InvalidParameter { .. })));
    }

    #[test]
    fn invalid_auction_terms_rejected() {
        let (nft, engine, alice, asset) = ready_registry();
        let mut book = ListingBook::new();
        let mut req = request(asset, Decimal::ONE);
        req.mode = SaleMode::Auction;
        req.stable_coin_accepted = false;
        req.auction_end = None;

        let result = book.create(&nft, engine, alice, req);
        assert!(matches!(result, Err(MarketError::InvalidParameter { .. })));
    }

    #[test]
    fn cancel_removes_listing() {
        let (nft, engine, alice, asset) = ready_registry();
        let mut book = ListingBook::new();
        book.create(&nft, engine, alice, request(asset, Decimal::ONE))
            .unwrap();

        let removed = book.cancel(&nft, alice, asset).unwrap();
        assert_eq!(removed.seller, alice);
        assert!(!book.contains(asset));
    }

    #[test]
    fn cancel_unlisted_fails() {
        let (nft, _engine, alice, asset) = ready_registry();
        let mut book = ListingBook::new();

        let result = book.cancel(&nft, alice, asset);
        assert!(matches!(result, Err(MarketError::InvalidState { .. })));
    }

    #[test]
    fn cancel_by_non_owner_fails() {
        let (nft, engine, alice, asset) = ready_registry();
        let mut book = ListingBook::new();
        book.create(&nft, engine, alice, request(asset, Decimal::ONE))
            .unwrap();

        let result = book.cancel(&nft, AccountId::new(), asset);
        assert!(matches!(result, Err(MarketError::NotOwner { .. })));
        assert!(book.contains(asset));
    }

    #[test]
    fn stale_seller_cannot_cancel_after_transfer() {
        let (mut nft, engine, alice, asset) = ready_registry();
        let bob = AccountId::new();
        let mut book = ListingBook::new();
        book.create(&nft, engine, alice, request(asset, Decimal::ONE))
            .unwrap();

        // Asset moves outside the engine; alice's record is stale.
        nft.transfer_from(alice, asset, alice, bob).unwrap();
        let result = book.cancel(&nft, alice, asset);
        assert!(matches!(result, Err(MarketError::NotOwner { .. })));
        // The new owner can clear the stale record.
        book.cancel(&nft, bob, asset).unwrap();
    }

    #[test]
    fn require_reports_missing() {
        let book = ListingBook::new();
        assert!(matches!(
            book.require(AssetKey::dummy()),
            Err(MarketError::InvalidState { .. })
        ));
    }

    #[test]
    fn take_is_unconditional() {
        let (nft, engine, alice, asset) = ready_registry();
        let mut book = ListingBook::new();
        book.create(&nft, engine, alice, request(asset, Decimal::ONE))
            .unwrap();

        assert!(book.take(asset).is_some());
        assert!(book.take(asset).is_none());
    }
}
