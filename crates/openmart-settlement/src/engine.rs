//! The exchange engine: listing, offer, and bid intake plus atomic
//! settlement of agreed sales.
//!
//! The engine never holds assets. Sellers keep their collectibles and
//! grant the engine's account a transfer approval; buyers keep their
//! funds and grant a spending allowance. A settlement call re-validates
//! every precondition against the live registries and only then moves
//! payment and collectible in one pass, so a sale either completes in
//! full or leaves every balance untouched.

use openmart_market::{BidBook, ListingBook, OfferBook};
use openmart_registry::{
    FungibleAssets, PriceOracle, UniqueAssets, ensure_exchange_approved, ensure_funds,
    ensure_live_owner, ensure_spending_authorized,
};
use openmart_types::{
    AccountId, AssetKey, Bid, BidKey, ContractId, FeeSchedule, Listing, ListingRequest,
    MarketError, Offer, OfferKey, Result, SaleKind, SaleReceipt,
};
use rust_decimal::Decimal;

use crate::treasury::Treasury;

/// A non-custodial marketplace over one unique-asset registry and one
/// fungible-asset ledger.
///
/// All mutating calls take the registries as explicit arguments so the
/// engine itself stays a pure state machine over listings, offers, bids,
/// and accrued fees.
#[derive(Debug)]
pub struct Exchange {
    /// Administrator: the only account allowed to tune fees and withdraw.
    owner: AccountId,
    /// The engine's own account. Sellers approve it for collectible
    /// transfers, buyers grant it spending allowances, and collected
    /// fees accumulate on it.
    account: AccountId,
    /// Payment contract used by stable-coin purchases.
    stable_asset: ContractId,
    fees: FeeSchedule,
    oracle: Option<Box<dyn PriceOracle>>,
    listings: ListingBook,
    offers: OfferBook,
    bids: BidBook,
    treasury: Treasury,
}

impl Exchange {
    /// Creates an exchange owned by `owner` with default fees and no
    /// price oracle.
    #[must_use]
    pub fn new(owner: AccountId, stable_asset: ContractId) -> Self {
        Self::with_fees(owner, stable_asset, FeeSchedule::default())
    }

    /// Creates an exchange with an explicit fee schedule.
    #[must_use]
    pub fn with_fees(owner: AccountId, stable_asset: ContractId, fees: FeeSchedule) -> Self {
        Self {
            owner,
            account: AccountId::new(),
            stable_asset,
            fees,
            oracle: None,
            listings: ListingBook::new(),
            offers: OfferBook::new(),
            bids: BidBook::new(),
            treasury: Treasury::new(),
        }
    }

    // ========================================================================
    // Market surface
    // ========================================================================

    /// Lists `caller`'s asset for sale.
    ///
    /// # Errors
    ///
    /// Propagates the listing-book checks: ownership, engine approval,
    /// duplicate listing, price and term validation.
    pub fn list<R: UniqueAssets>(
        &mut self,
        nft: &R,
        caller: AccountId,
        request: ListingRequest,
    ) -> Result<()> {
        self.listings.create(nft, self.account, caller, request)
    }

    /// Removes `caller`'s listing for `asset`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::NotOwner`] if `caller` no longer owns the
    /// asset and [`MarketError::InvalidState`] if it is not listed.
    pub fn cancel_listing<R: UniqueAssets>(
        &mut self,
        nft: &R,
        caller: AccountId,
        asset: AssetKey,
    ) -> Result<()> {
        self.listings.cancel(nft, caller, asset)?;
        Ok(())
    }

    /// Places `caller`'s direct offer on an asset held by `target_owner`.
    ///
    /// # Errors
    ///
    /// Propagates the offer-book checks: live ownership of the target,
    /// self-dealing, amount validation, spending allowance, duplicates.
    pub fn place_offer<R: UniqueAssets, L: FungibleAssets>(
        &mut self,
        nft: &R,
        tokens: &L,
        caller: AccountId,
        target_owner: AccountId,
        asset: AssetKey,
        payment_asset: ContractId,
        amount: Decimal,
    ) -> Result<()> {
        self.offers.place(
            nft,
            tokens,
            self.account,
            caller,
            target_owner,
            asset,
            payment_asset,
            amount,
        )
    }

    /// Withdraws `caller`'s offer on an asset held by `target_owner`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::NotOwner`] if `target_owner` is stale and
    /// [`MarketError::InvalidState`] if no matching offer exists.
    pub fn cancel_offer<R: UniqueAssets>(
        &mut self,
        nft: &R,
        caller: AccountId,
        target_owner: AccountId,
        asset: AssetKey,
        payment_asset: ContractId,
    ) -> Result<()> {
        self.offers
            .cancel(nft, caller, target_owner, asset, payment_asset)?;
        Ok(())
    }

    /// Places `caller`'s bid on an auction listing held by `target_owner`.
    ///
    /// # Errors
    ///
    /// Propagates the bid-book checks: auction listing present, live
    /// ownership, self-dealing, the bid floor, spending allowance,
    /// duplicates.
    pub fn place_bid<R: UniqueAssets, L: FungibleAssets>(
        &mut self,
        nft: &R,
        tokens: &L,
        caller: AccountId,
        target_owner: AccountId,
        asset: AssetKey,
        payment_asset: ContractId,
        amount: Decimal,
    ) -> Result<()> {
        self.bids.place(
            &self.listings,
            nft,
            tokens,
            self.account,
            caller,
            target_owner,
            asset,
            payment_asset,
            amount,
        )
    }

    /// Withdraws `caller`'s bid on an auction held by `target_owner`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::InvalidState`] if the auction listing or a
    /// matching bid is missing and [`MarketError::NotOwner`] on a stale
    /// `target_owner`.
    pub fn cancel_bid<R: UniqueAssets>(
        &mut self,
        nft: &R,
        caller: AccountId,
        target_owner: AccountId,
        asset: AssetKey,
        payment_asset: ContractId,
    ) -> Result<()> {
        self.bids
            .cancel(&self.listings, nft, caller, target_owner, asset, payment_asset)?;
        Ok(())
    }

    // ========================================================================
    // Settlement
    // ========================================================================

    /// Buys a fixed-price listing outright with a fungible payment.
    ///
    /// `amount` is what the buyer tenders; it must clear the slippage
    /// floor of the listed price. The buyer is always debited the listed
    /// price, never the tendered amount.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::InvalidState`] for a missing listing, an
    /// auction listing, or an unaccepted payment contract;
    /// [`MarketError::NotOwner`] when `target_owner` is stale;
    /// [`MarketError::InvalidParameter`] on self-purchase;
    /// [`MarketError::NotApproved`] when the engine lacks transfer
    /// approval or the buyer's allowance is short;
    /// [`MarketError::PriceOutOfRange`] below the slippage floor;
    /// [`MarketError::InsufficientBalance`] when the buyer cannot cover
    /// the listed price.
    pub fn buy<R: UniqueAssets, L: FungibleAssets>(
        &mut self,
        nft: &mut R,
        tokens: &mut L,
        caller: AccountId,
        target_owner: AccountId,
        asset: AssetKey,
        payment_asset: ContractId,
        amount: Decimal,
    ) -> Result<SaleReceipt> {
        // 1. The asset must carry a fixed-price listing that takes this
        //    payment contract.
        let listing = self.listings.require(asset)?;
        if listing.is_auction() {
            return Err(MarketError::InvalidState {
                reason: format!("asset {asset} is listed for auction"),
            });
        }
        if !listing.terms.accepts_payment(payment_asset) {
            return Err(MarketError::InvalidState {
                reason: format!("payment contract {payment_asset} not accepted for asset {asset}"),
            });
        }

        // 2. The named owner must still hold the asset and must be the
        //    account that listed it.
        ensure_live_owner(nft, asset, target_owner)?;
        if listing.seller != target_owner {
            return Err(MarketError::NotOwner { asset });
        }
        if caller == target_owner {
            return Err(MarketError::InvalidParameter {
                reason: "cannot buy an owned asset".to_string(),
            });
        }
        ensure_exchange_approved(nft, asset, self.account)?;

        // 3. The tendered amount must be authorized and clear the
        //    slippage floor of the listed price.
        ensure_spending_authorized(tokens, payment_asset, caller, self.account, amount)?;
        let price = listing.price;
        let floor = self.fees.tolerance_floor(price);
        if amount < floor {
            return Err(MarketError::PriceOutOfRange {
                tendered: amount,
                floor,
            });
        }

        // 4. Settlement debits the listed price, so allowance and balance
        //    must cover it even when the tender was lower.
        ensure_spending_authorized(tokens, payment_asset, caller, self.account, price)?;
        ensure_funds(tokens, payment_asset, caller, price)?;

        // 5. Mark the listing consumed, then move assets.
        let seller = listing.seller;
        self.listings.take(asset);
        self.execute_settlement(
            nft,
            tokens,
            SaleKind::FixedPrice,
            asset,
            seller,
            caller,
            payment_asset,
            price,
        )
    }

    /// Buys a fixed-price listing with the exchange's stable coin.
    ///
    /// `tendered` is denominated in the stable coin; the configured
    /// oracle converts it into the listing's reference terms before the
    /// slippage check. The buyer is debited the listed price in stable
    /// coin.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::InvalidState`] for a missing listing, a
    /// listing that does not take stable coin (auctions never do), or a
    /// missing oracle; otherwise the same failures as [`Exchange::buy`].
    pub fn buy_with_stable_coin<R: UniqueAssets, L: FungibleAssets>(
        &mut self,
        nft: &mut R,
        tokens: &mut L,
        caller: AccountId,
        target_owner: AccountId,
        asset: AssetKey,
        tendered: Decimal,
    ) -> Result<SaleReceipt> {
        // 1. The listing must opt in to stable-coin payment.
        let listing = self.listings.require(asset)?;
        if !listing.terms.stable_coin_accepted() {
            return Err(MarketError::InvalidState {
                reason: format!("stable coin not accepted for asset {asset}"),
            });
        }

        // 2. Live ownership, seller identity, self-purchase, approval.
        ensure_live_owner(nft, asset, target_owner)?;
        if listing.seller != target_owner {
            return Err(MarketError::NotOwner { asset });
        }
        if caller == target_owner {
            return Err(MarketError::InvalidParameter {
                reason: "cannot buy an owned asset".to_string(),
            });
        }
        ensure_exchange_approved(nft, asset, self.account)?;

        // 3. Convert the tender through the oracle and check the floor
        //    in reference terms.
        let oracle = self.oracle.as_deref().ok_or_else(|| MarketError::InvalidState {
            reason: "no price oracle configured".to_string(),
        })?;
        let quoted = oracle.quote(tendered);
        let price = listing.price;
        let floor = self.fees.tolerance_floor(price);
        if quoted < floor {
            return Err(MarketError::PriceOutOfRange {
                tendered: quoted,
                floor,
            });
        }

        // 4. The stable-coin debit is the listed price.
        let stable = self.stable_asset;
        ensure_spending_authorized(tokens, stable, caller, self.account, price)?;
        ensure_funds(tokens, stable, caller, price)?;

        // 5. Consume the listing and settle in stable coin.
        let seller = listing.seller;
        self.listings.take(asset);
        self.execute_settlement(
            nft,
            tokens,
            SaleKind::StableCoin,
            asset,
            seller,
            caller,
            stable,
            price,
        )
    }

    /// Accepts a direct offer on `caller`'s asset at the offered amount.
    ///
    /// Works whether or not the asset is listed; any listing is removed
    /// as part of the sale. `payment_asset` and `amount` must match the
    /// stored offer exactly.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::NotOwner`] when `caller` does not hold the
    /// asset; [`MarketError::NotApproved`] when the engine lacks transfer
    /// approval or the buyer's allowance lapsed;
    /// [`MarketError::InvalidState`] when no offer matches; and
    /// [`MarketError::InsufficientBalance`] when the buyer cannot pay.
    pub fn accept_offer<R: UniqueAssets, L: FungibleAssets>(
        &mut self,
        nft: &mut R,
        tokens: &mut L,
        caller: AccountId,
        asset: AssetKey,
        buyer: AccountId,
        payment_asset: ContractId,
        amount: Decimal,
    ) -> Result<SaleReceipt> {
        // 1. Seller-side checks: live ownership and engine approval.
        ensure_live_owner(nft, asset, caller)?;
        ensure_exchange_approved(nft, asset, self.account)?;

        // 2. Buyer-side checks: allowance still live, offer still stored
        //    with the exact terms being accepted.
        ensure_spending_authorized(tokens, payment_asset, buyer, self.account, amount)?;
        let key = OfferKey {
            buyer,
            seller: caller,
            asset,
        };
        let offer = self.offers.matching(key, payment_asset)?;
        if offer.amount != amount {
            return Err(MarketError::InvalidState {
                reason: format!("no matching offer on asset {asset}"),
            });
        }
        let price = offer.amount;
        ensure_funds(tokens, payment_asset, buyer, price)?;

        // 3. Consume the offer, drop any listing for the sold asset,
        //    and settle at the offered amount.
        self.offers.take(key);
        self.listings.take(asset);
        self.execute_settlement(
            nft,
            tokens,
            SaleKind::DirectOffer,
            asset,
            caller,
            buyer,
            payment_asset,
            price,
        )
    }

    /// Settles an auction by selling `caller`'s asset to `bidder` at the
    /// stored bid amount.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::InvalidState`] when the asset is not listed
    /// for auction or no matching bid exists; [`MarketError::NotOwner`]
    /// when `caller` does not hold the asset or did not list it;
    /// [`MarketError::NotApproved`] when approvals lapsed; and
    /// [`MarketError::InsufficientBalance`] when the bidder cannot pay.
    pub fn settle_auction<R: UniqueAssets, L: FungibleAssets>(
        &mut self,
        nft: &mut R,
        tokens: &mut L,
        caller: AccountId,
        asset: AssetKey,
        bidder: AccountId,
        payment_asset: ContractId,
    ) -> Result<SaleReceipt> {
        // 1. The asset must be under auction and the caller must be the
        //    live owner who listed it.
        let listing = self.listings.require(asset)?;
        if !listing.is_auction() {
            return Err(MarketError::InvalidState {
                reason: format!("asset {asset} is not listed for auction"),
            });
        }
        ensure_live_owner(nft, asset, caller)?;
        if listing.seller != caller {
            return Err(MarketError::NotOwner { asset });
        }
        ensure_exchange_approved(nft, asset, self.account)?;

        // 2. The accepted bid fixes the settlement price.
        let key = BidKey {
            bidder,
            seller: caller,
            asset,
        };
        let bid = self.bids.matching(key, payment_asset)?;
        let price = bid.amount;
        ensure_spending_authorized(tokens, payment_asset, bidder, self.account, price)?;
        ensure_funds(tokens, payment_asset, bidder, price)?;

        // 3. Consume listing and bid, then settle. Losing bids on the
        //    asset stay in the book for their owners to cancel.
        self.listings.take(asset);
        self.bids.take(key);
        self.execute_settlement(
            nft,
            tokens,
            SaleKind::Auction,
            asset,
            caller,
            bidder,
            payment_asset,
            price,
        )
    }

    /// Moves payment and collectible for a fully validated sale.
    ///
    /// Call order matters: both fungible pulls draw on the buyer's
    /// allowance checked by the caller, and the collectible moves last so
    /// a seller never parts with the asset before being paid.
    fn execute_settlement<R: UniqueAssets, L: FungibleAssets>(
        &mut self,
        nft: &mut R,
        tokens: &mut L,
        kind: SaleKind,
        asset: AssetKey,
        seller: AccountId,
        buyer: AccountId,
        payment_asset: ContractId,
        price: Decimal,
    ) -> Result<SaleReceipt> {
        let (proceeds, fee) = self.fees.split(price);

        tokens.transfer_from(payment_asset, self.account, buyer, seller, proceeds)?;
        tokens.transfer_from(payment_asset, self.account, buyer, self.account, fee)?;
        nft.transfer_from(self.account, asset, seller, buyer)?;
        self.treasury.credit(payment_asset, fee);

        let receipt = SaleReceipt::new(kind, asset, seller, buyer, payment_asset, price, fee);
        tracing::info!(
            kind = %receipt.kind,
            asset = %asset,
            seller = %seller,
            buyer = %buyer,
            price = %price,
            fee = %fee,
            digest = %receipt.digest_hex(),
            "sale settled"
        );
        Ok(receipt)
    }

    // ========================================================================
    // Administration
    // ========================================================================

    fn ensure_engine_owner(&self, caller: AccountId) -> Result<()> {
        if caller != self.owner {
            return Err(MarketError::Unauthorized);
        }
        Ok(())
    }

    /// Sets the service fee taken from every settlement.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Unauthorized`] for non-owner callers and
    /// [`MarketError::InvalidParameter`] above the basis-point maximum.
    pub fn set_service_fee(&mut self, caller: AccountId, bps: u32) -> Result<()> {
        self.ensure_engine_owner(caller)?;
        self.fees.set_service_fee(bps)?;
        tracing::debug!(bps, "service fee updated");
        Ok(())
    }

    /// Sets the slippage tolerance applied to tendered amounts.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Unauthorized`] for non-owner callers and
    /// [`MarketError::InvalidParameter`] above the basis-point maximum.
    pub fn set_slippage(&mut self, caller: AccountId, bps: u32) -> Result<()> {
        self.ensure_engine_owner(caller)?;
        self.fees.set_slippage(bps)?;
        tracing::debug!(bps, "slippage tolerance updated");
        Ok(())
    }

    /// Installs the oracle that prices stable-coin tenders.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Unauthorized`] for non-owner callers.
    pub fn set_price_oracle(
        &mut self,
        caller: AccountId,
        oracle: Box<dyn PriceOracle>,
    ) -> Result<()> {
        self.ensure_engine_owner(caller)?;
        self.oracle = Some(oracle);
        Ok(())
    }

    /// Pays out accrued fees from the engine's account to the owner.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Unauthorized`] for non-owner callers,
    /// [`MarketError::InvalidParameter`] for a non-positive amount, and
    /// [`MarketError::InsufficientTreasury`] when the accrued balance is
    /// below the request.
    pub fn withdraw<L: FungibleAssets>(
        &mut self,
        tokens: &mut L,
        caller: AccountId,
        asset: ContractId,
        amount: Decimal,
    ) -> Result<()> {
        self.ensure_engine_owner(caller)?;
        if amount <= Decimal::ZERO {
            return Err(MarketError::InvalidParameter {
                reason: "withdrawal amount must be positive".to_string(),
            });
        }
        // The accrued balance never exceeds the engine's ledger balance,
        // so the transfer cannot fail after the debit succeeds.
        self.treasury.debit(asset, amount)?;
        tokens.transfer(asset, self.account, self.owner, amount)?;
        tracing::info!(asset = %asset, amount = %amount, "treasury withdrawal");
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The exchange administrator.
    #[must_use]
    pub fn owner(&self) -> AccountId {
        self.owner
    }

    /// The engine's own account to approve transfers and allowances for.
    #[must_use]
    pub fn account(&self) -> AccountId {
        self.account
    }

    /// Payment contract used by stable-coin purchases.
    #[must_use]
    pub fn stable_asset(&self) -> ContractId {
        self.stable_asset
    }

    /// Current service fee in basis points.
    #[must_use]
    pub fn service_fee_bps(&self) -> u32 {
        self.fees.service_fee_bps()
    }

    /// Current slippage tolerance in basis points.
    #[must_use]
    pub fn slippage_bps(&self) -> u32 {
        self.fees.slippage_bps()
    }

    /// Fees accrued and not yet withdrawn in a payment contract.
    #[must_use]
    pub fn treasury_balance(&self, asset: ContractId) -> Decimal {
        self.treasury.balance(asset)
    }

    /// The active listing for an asset, if any.
    #[must_use]
    pub fn listing(&self, asset: AssetKey) -> Option<&Listing> {
        self.listings.get(asset)
    }

    /// A stored offer, if any.
    #[must_use]
    pub fn offer(&self, key: OfferKey) -> Option<&Offer> {
        self.offers.get(key)
    }

    /// A stored bid, if any.
    #[must_use]
    pub fn bid(&self, key: BidKey) -> Option<&Bid> {
        self.bids.get(key)
    }

    /// All live bids on an asset.
    #[must_use]
    pub fn bids_for(&self, asset: AssetKey) -> Vec<&Bid> {
        self.bids.bids_for(asset)
    }

    /// Number of active listings.
    #[must_use]
    pub fn listing_count(&self) -> usize {
        self.listings.len()
    }

    /// Number of stored offers.
    #[must_use]
    pub fn offer_count(&self) -> usize {
        self.offers.len()
    }

    /// Number of stored bids.
    #[must_use]
    pub fn bid_count(&self) -> usize {
        self.bids.len()
    }
}
