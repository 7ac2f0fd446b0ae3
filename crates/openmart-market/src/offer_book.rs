//! The offer book: standing offers addressed to asset owners.
//!
//! Offers are independent of listings: any asset with a live owner
//! can receive one. Keyed by [`OfferKey`], so a buyer holds at most one
//! offer per asset per owner. Funds are backed by allowance only; the
//! ledger is untouched until acceptance settles.

use std::collections::HashMap;

use openmart_registry::{
    FungibleAssets, UniqueAssets, ensure_live_owner, ensure_spending_authorized,
};
use openmart_types::{AccountId, AssetKey, ContractId, MarketError, Offer, OfferKey, Result};
use rust_decimal::Decimal;

/// All standing offers.
#[derive(Debug, Default)]
pub struct OfferBook {
    offers: HashMap<OfferKey, Offer>,
}

impl OfferBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =================================================================
    // Placement
    // =================================================================

    /// Place an offer of `amount` in `payment_asset` for `asset`,
    /// addressed to `target_owner`.
    ///
    /// # Errors
    /// `NotOwner` when `target_owner` is not the live owner;
    /// `InvalidParameter` for self-offers or a non-positive amount;
    /// `NotApproved` when the buyer's allowance to `engine` falls short;
    /// `InvalidState` when an offer for this key already exists.
    pub fn place<R: UniqueAssets, L: FungibleAssets>(
        &mut self,
        nft: &R,
        tokens: &L,
        engine: AccountId,
        buyer: AccountId,
        target_owner: AccountId,
        asset: AssetKey,
        payment_asset: ContractId,
        amount: Decimal,
    ) -> Result<()> {
        ensure_live_owner(nft, asset, target_owner)?;
        if buyer == target_owner {
            return Err(MarketError::InvalidParameter {
                reason: "cannot offer on an owned asset".to_string(),
            });
        }
        if amount <= Decimal::ZERO {
            return Err(MarketError::InvalidParameter {
                reason: "offer amount must be positive".to_string(),
            });
        }
        ensure_spending_authorized(tokens, payment_asset, buyer, engine, amount)?;

        let offer = Offer::new(buyer, target_owner, asset, payment_asset, amount);
        if self.offers.contains_key(&offer.key()) {
            return Err(MarketError::InvalidState {
                reason: format!("offer on asset {asset} already exists"),
            });
        }
        self.offers.insert(offer.key(), offer);
        Ok(())
    }

    // =================================================================
    // Cancellation
    // =================================================================

    /// Withdraw a standing offer. Returns the removed offer.
    ///
    /// # Errors
    /// `NotOwner` when `target_owner` is stale; `InvalidState` when no
    /// offer matches the key and payment contract.
    pub fn cancel<R: UniqueAssets>(
        &mut self,
        nft: &R,
        buyer: AccountId,
        target_owner: AccountId,
        asset: AssetKey,
        payment_asset: ContractId,
    ) -> Result<Offer> {
        ensure_live_owner(nft, asset, target_owner)?;
        let key = OfferKey {
            buyer,
            seller: target_owner,
            asset,
        };
        let Some(offer) = self.offers.remove(&key) else {
            return Err(MarketError::InvalidState {
                reason: format!("no matching offer on asset {asset}"),
            });
        };
        if offer.payment_asset != payment_asset {
            self.offers.insert(key, offer);
            return Err(MarketError::InvalidState {
                reason: format!("no matching offer on asset {asset}"),
            });
        }
        Ok(offer)
    }

    // =================================================================
    // Queries
    // =================================================================

    #[must_use]
    pub fn get(&self, key: OfferKey) -> Option<&Offer> {
        self.offers.get(&key)
    }

    /// The offer for `key`, required to exist and to name
    /// `payment_asset`.
    pub fn matching(&self, key: OfferKey, payment_asset: ContractId) -> Result<&Offer> {
        match self.offers.get(&key) {
            Some(offer) if offer.payment_asset == payment_asset => Ok(offer),
            _ => Err(MarketError::InvalidState {
                reason: format!("no matching offer on asset {}", key.asset),
            }),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    // =================================================================
    // Consumption
    // =================================================================

    /// Remove an offer without validation, after the engine's check
    /// pass.
    pub fn take(&mut self, key: OfferKey) -> Option<Offer> {
        self.offers.remove(&key)
    }
}

#[cfg(test)]
mod tests {
    use openmart_registry::{MemoryNft, MemoryTokens};

    use super::*;

    struct Fixture {
        nft: MemoryNft,
        tokens: MemoryTokens,
        engine: AccountId,
        alice: AccountId,
        bob: AccountId,
        cash: ContractId,
        asset: AssetKey,
    }

    /// Alice owns the asset; Bob holds 1000 cash, 100 approved to the
    /// engine.
    fn fixture() -> Fixture {
        let mut nft = MemoryNft::new();
        let mut tokens = MemoryTokens::new();
        let engine = AccountId::new();
        let alice = AccountId::new();
        let bob = AccountId::new();
        let cash = ContractId::new();
        let asset = AssetKey::dummy();
        nft.mint(alice, asset).unwrap();
        tokens.mint(cash, bob, Decimal::new(1000, 0)).unwrap();
        tokens.approve(cash, bob, engine, Decimal::new(100, 0)).unwrap();
        Fixture {
            nft,
            tokens,
            engine,
            alice,
            bob,
            cash,
            asset,
        }
    }

    #[test]
    fn place_and_query() {
        let f = fixture();
        let mut book = OfferBook::new();
        book.place(
            &f.nft,
            &f.tokens,
            f.engine,
            f.bob,
            f.alice,
            f.asset,
            f.cash,
            Decimal::new(50, 0),
        )
        .unwrap();

        let key = OfferKey {
            buyer: f.bob,
            seller: f.alice,
            asset: f.asset,
        };
        let offer = book.get(key).unwrap();
        assert_eq!(offer.amount, Decimal::new(50, 0));
        assert_eq!(offer.payment_asset, f.cash);
    }

    #[test]
    fn offer_to_non_owner_fails() {
        let f = fixture();
        let mut book = OfferBook::new();
        let result = book.place(
            &f.nft,
            &f.tokens,
            f.engine,
            f.bob,
            AccountId::new(),
            f.asset,
            f.cash,
            Decimal::ONE,
        );
        assert!(matches!(result, Err(MarketError::NotOwner { .. })));
    }

    #[test]
    fn self_offer_rejected() {
        let f = fixture();
        let mut book = OfferBook::new();
        let result = book.place(
            &f.nft,
            &f.tokens,
            f.engine,
            f.alice,
            f.alice,
            f.asset,
            f.cash,
            Decimal::ONE,
        );
        assert!(matches!(result, Err(MarketError::InvalidParameter { .. })));
    }

    #[test]
    fn unapproved_amount_rejected() {
        let f = fixture();
        let mut book = OfferBook::new();
        let result = book.place(
            &f.nft,
            &f.tokens,
            f.engine,
            f.bob,
            f.alice,
            f.asset,
            f.cash,
            Decimal::new(101, 0),
        );
        assert!(matches!(result, Err(MarketError::NotApproved { .. })));
    }

    #[test]
    fn duplicate_offer_rejected() {
        let f = fixture();
        let mut book = OfferBook::new();
        book.place(
            &f.nft, &f.tokens, f.engine, f.bob, f.alice, f.asset, f.cash,
            Decimal::new(40, 0),
        )
        .unwrap();

        let result = book.place(
            &f.nft, &f.tokens, f.engine, f.bob, f.alice, f.asset, f.cash,
            Decimal::new(60, 0),
        );
        assert!(matches!(result, Err(MarketError::InvalidState { .. })));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn cancel_requires_live_owner_first() {
        let f = fixture();
        let mut book = OfferBook::new();
        // No offer placed at all: the stale-owner gate still fires first.
        let result = book.cancel(&f.nft, f.bob, AccountId::new(), f.asset, f.cash);
        assert!(matches!(result, Err(MarketError::NotOwner { .. })));
    }

    #[test]
    fn cancel_missing_offer_fails() {
        let f = fixture();
        let mut book = OfferBook::new();
        let result = book.cancel(&f.nft, f.bob, f.alice, f.asset, f.cash);
        assert!(matches!(result, Err(MarketError::InvalidState { .. })));
    }

    #[test]
    fn cancel_wrong_payment_asset_fails() {
        let f = fixture();
        let mut book = OfferBook::new();
        book.place(
            &f.nft, &f.tokens, f.engine, f.bob, f.alice, f.asset, f.cash,
            Decimal::new(40, 0),
        )
        .unwrap();

        let result = book.cancel(&f.nft, f.bob, f.alice, f.asset, ContractId::new());
        assert!(matches!(result, Err(MarketError::InvalidState { .. })));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn cancel_removes_offer() {
        let f = fixture();
        let mut book = OfferBook::new();
        book.place(
            &f.nft, &f.tokens, f.engine, f.bob, f.alice, f.asset, f.cash,
            Decimal::new(40, 0),
        )
        .unwrap();

        let removed = book.cancel(&f.nft, f.bob, f.alice, f.asset, f.cash).unwrap();
        assert_eq!(removed.amount, Decimal::new(40, 0));
        assert!(book.is_empty());
    }

    #[test]
    fn distinct_buyers_may_offer_on_same_asset() {
        let mut f = fixture();
        let carol = AccountId::new();
        f.tokens.mint(f.cash, carol, Decimal::new(100, 0)).unwrap();
        f.tokens.approve(f.cash, carol, f.engine, Decimal::new(100, 0)).unwrap();

        let mut book = OfferBook::new();
        book.place(
            &f.nft, &f.tokens, f.engine, f.bob, f.alice, f.asset, f.cash,
            Decimal::new(40, 0),
        )
        .unwrap();
        book.place(
            &f.nft, &f.tokens, f.engine, carol, f.alice, f.asset, f.cash,
            Decimal::new(45, 0),
        )
        .unwrap();
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn matching_validates_payment_contract() {
        let f = fixture();
        let mut book = OfferBook::new();
        book.place(
            &f.nft, &f.tokens, f.engine, f.bob, f.alice, f.asset, f.cash,
            Decimal::new(40, 0),
        )
        .unwrap();
        let key = OfferKey {
            buyer: f.bob,
            seller: f.alice,
            asset: f.asset,
        };

        assert!(book.matching(key, f.cash).is_ok());
        assert!(matches!(
            book.matching(key, ContractId::new()),
            Err(MarketError::InvalidState { .. })
        ));
    }
}
