//! Sale receipts for the OpenMart audit trail.
//!
//! Every settlement produces a [`SaleReceipt`] recording the parties,
//! the settlement price, and the fee split. The digest is a SHA-256
//! hash over the receipt fields so external systems can reference a
//! settlement without storing the full payload.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AccountId, AssetKey, ContractId};

/// Which settlement path produced the receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaleKind {
    /// Direct purchase of a fixed-price listing.
    FixedPrice,
    /// Purchase of a fixed-price listing paid in reference currency.
    StableCoin,
    /// Seller accepted an auction bid.
    Auction,
    /// Seller accepted a standing offer.
    DirectOffer,
}

impl std::fmt::Display for SaleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FixedPrice => write!(f, "FIXED_PRICE"),
            Self::StableCoin => write!(f, "STABLE_COIN"),
            Self::Auction => write!(f, "AUCTION"),
            Self::DirectOffer => write!(f, "DIRECT_OFFER"),
        }
    }
}

/// Proof that a settlement occurred: who sold what to whom, in which
/// payment contract, and how the price was split.
///
/// `price = seller_proceeds + fee` always holds; the constructor
/// derives the split rather than accepting it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleReceipt {
    pub kind: SaleKind,
    pub asset: AssetKey,
    pub seller: AccountId,
    pub buyer: AccountId,
    pub payment_asset: ContractId,
    /// The settlement price: listed price, offer amount, or bid amount.
    pub price: Decimal,
    pub fee: Decimal,
    pub seller_proceeds: Decimal,
    pub settled_at: DateTime<Utc>,
}

impl SaleReceipt {
    #[must_use]
    pub fn new(
        kind: SaleKind,
        asset: AssetKey,
        seller: AccountId,
        buyer: AccountId,
        payment_asset: ContractId,
        price: Decimal,
        fee: Decimal,
    ) -> Self {
        Self {
            kind,
            asset,
            seller,
            buyer,
            payment_asset,
            price,
            fee,
            seller_proceeds: price - fee,
            settled_at: Utc::now(),
        }
    }

    /// Deterministic SHA-256 digest over the receipt fields.
    ///
    /// Decimals are hashed through their canonical string form, the
    /// same convention other components use for digesting amounts.
    #[must_use]
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"openmart:sale_receipt:v1:");
        hasher.update(self.kind.to_string().as_bytes());
        hasher.update(self.asset.contract.0.as_bytes());
        hasher.update(self.asset.token.0.to_le_bytes());
        hasher.update(self.seller.0.as_bytes());
        hasher.update(self.buyer.0.as_bytes());
        hasher.update(self.payment_asset.0.as_bytes());
        hasher.update(self.price.to_string().as_bytes());
        hasher.update(self.fee.to_string().as_bytes());
        hasher.update(self.settled_at.timestamp_millis().to_le_bytes());

        let result = hasher.finalize();
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&result);
        digest
    }

    /// Hex form of [`SaleReceipt::digest`] for logs and references.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}
