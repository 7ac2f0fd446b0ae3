//! Standing offers on unique assets.
//!
//! An offer is addressed to a specific owner and does not require the
//! asset to be listed. The offered funds stay in the buyer's ledger
//! account; only an allowance backs the offer until it is accepted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, AssetKey, ContractId};

/// Uniqueness key for offers: one standing offer per buyer per owner
/// per asset. The payment contract is payload, validated on use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OfferKey {
    pub buyer: AccountId,
    pub seller: AccountId,
    pub asset: AssetKey,
}

/// A standing offer to buy `asset` from `seller` for `amount` of
/// `payment_asset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub buyer: AccountId,
    /// The owner this offer is addressed to, captured at creation time.
    pub seller: AccountId,
    pub asset: AssetKey,
    pub payment_asset: ContractId,
    pub amount: Decimal,
    pub made_at: DateTime<Utc>,
}

impl Offer {
    #[must_use]
    pub fn new(
        buyer: AccountId,
        seller: AccountId,
        asset: AssetKey,
        payment_asset: ContractId,
        amount: Decimal,
    ) -> Self {
        Self {
            buyer,
            seller,
            asset,
            payment_asset,
            amount,
            made_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn key(&self) -> OfferKey {
        OfferKey {
            buyer: self.buyer,
            seller: self.seller,
            asset: self.asset,
        }
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Offer {
    pub fn dummy(buyer: AccountId, seller: AccountId, asset: AssetKey, amount: Decimal) -> Self {
        Self::new(buyer, seller, asset, ContractId::new(), amount)
    }
}
