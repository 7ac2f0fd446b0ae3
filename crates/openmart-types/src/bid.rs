//! Auction bids.
//!
//! A bid targets an active auction listing and must clear the listed
//! price. Multiple bidders may hold simultaneous bids on the same
//! asset; the seller picks the one to settle against. Like offers,
//! bids are backed by an allowance, not by moved funds.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, AssetKey, ContractId};

/// Uniqueness key for bids: one standing bid per bidder per owner per
/// asset. The payment contract is payload, validated on use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct BidKey {
    pub bidder: AccountId,
    pub seller: AccountId,
    pub asset: AssetKey,
}

/// A bid of `amount` in `payment_asset` on the auction for `asset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    pub bidder: AccountId,
    /// The auction's owner, captured at creation time.
    pub seller: AccountId,
    pub asset: AssetKey,
    pub payment_asset: ContractId,
    pub amount: Decimal,
    pub made_at: DateTime<Utc>,
}

impl Bid {
    #[must_use]
    pub fn new(
        bidder: AccountId,
        seller: AccountId,
        asset: AssetKey,
        payment_asset: ContractId,
        amount: Decimal,
    ) -> Self {
        Self {
            bidder,
            seller,
            asset,
            payment_asset,
            amount,
            made_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn key(&self) -> BidKey {
        BidKey {
            bidder: self.bidder,
            seller: self.seller,
            asset: self.asset,
        }
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Bid {
    pub fn dummy(bidder: AccountId, seller: AccountId, asset: AssetKey, amount: Decimal) -> Self {
        Self::new(bidder, seller, asset, ContractId::new(), amount)
    }
}
