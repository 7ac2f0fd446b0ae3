//! Listing types for the OpenMart settlement engine.
//!
//! A listing puts one unique asset up for sale without moving it: the
//! seller keeps ownership and only grants the engine transfer approval.
//! Sale terms are tagged by mode so that invalid combinations (an
//! auction that accepts stable coin, an auction without a closing time)
//! are unrepresentable once constructed.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, AssetKey, ContractId, MarketError, Result};

/// Flat mode selector, as supplied by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum SaleMode {
    Fixed,
    Auction,
}

impl std::fmt::Display for SaleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed => write!(f, "FIXED"),
            Self::Auction => write!(f, "AUCTION"),
        }
    }
}

/// Validated sale terms. Constructed only through [`SaleTerms::from_parts`],
/// which rejects mode/flag combinations the engine cannot honor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleTerms {
    /// Direct sale at the listed price. Buyers pay with any contract in
    /// `accepted_assets`, or in reference currency when
    /// `stable_coin_accepted` is set.
    Fixed {
        stable_coin_accepted: bool,
        accepted_assets: BTreeSet<ContractId>,
    },
    /// Auction closed by the seller accepting a bid. Never payable in
    /// reference currency; bids name their own payment contract.
    Auction { end_time: DateTime<Utc> },
}

impl SaleTerms {
    /// Build terms from the flat caller input.
    ///
    /// # Errors
    /// [`MarketError::InvalidParameter`] when `Auction` is combined with
    /// stable-coin acceptance or lacks a closing time. `auction_end` is
    /// ignored for fixed-price sales.
    pub fn from_parts(
        mode: SaleMode,
        stable_coin_accepted: bool,
        accepted_assets: Vec<ContractId>,
        auction_end: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        match mode {
            SaleMode::Fixed => Ok(Self::Fixed {
                stable_coin_accepted,
                accepted_assets: accepted_assets.into_iter().collect(),
            }),
            SaleMode::Auction => match (stable_coin_accepted, auction_end) {
                (false, Some(end_time)) => Ok(Self::Auction { end_time }),
                _ => Err(MarketError::InvalidParameter {
                    reason: "auction requires a closing time and cannot accept stable coin"
                        .to_string(),
                }),
            },
        }
    }

    #[must_use]
    pub fn mode(&self) -> SaleMode {
        match self {
            Self::Fixed { .. } => SaleMode::Fixed,
            Self::Auction { .. } => SaleMode::Auction,
        }
    }

    /// Whether a direct purchase may pay with the given contract.
    /// Always `false` for auctions; bids are the only path there.
    #[must_use]
    pub fn accepts_payment(&self, asset: ContractId) -> bool {
        match self {
            Self::Fixed {
                accepted_assets, ..
            } => accepted_assets.contains(&asset),
            Self::Auction { .. } => false,
        }
    }

    #[must_use]
    pub fn stable_coin_accepted(&self) -> bool {
        match self {
            Self::Fixed {
                stable_coin_accepted,
                ..
            } => *stable_coin_accepted,
            Self::Auction { .. } => false,
        }
    }

    #[must_use]
    pub fn auction_end(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Fixed { .. } => None,
            Self::Auction { end_time } => Some(*end_time),
        }
    }
}

/// Flat caller input for creating a listing. Converted into validated
/// [`SaleTerms`] at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRequest {
    pub asset: AssetKey,
    pub price: Decimal,
    pub stable_coin_accepted: bool,
    pub accepted_assets: Vec<ContractId>,
    pub mode: SaleMode,
    pub auction_end: Option<DateTime<Utc>>,
}

/// An active listing. `seller` is the owner captured at listing time;
/// every later operation re-validates it against the live registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub seller: AccountId,
    pub asset: AssetKey,
    /// Sale price for fixed listings; bid floor for auctions.
    pub price: Decimal,
    pub terms: SaleTerms,
    pub listed_at: DateTime<Utc>,
}

impl Listing {
    #[must_use]
    pub fn new(seller: AccountId, asset: AssetKey, price: Decimal, terms: SaleTerms) -> Self {
        Self {
            seller,
            asset,
            price,
            terms,
            listed_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_auction(&self) -> bool {
        self.terms.mode() == SaleMode::Auction
    }

    /// Minimum acceptable bid: the listed price, inclusive.
    #[must_use]
    pub fn bid_floor(&self) -> Decimal {
        self.price
    }

    /// Whether the stored auction deadline has passed. Informational:
    /// the engine does not close auctions on its own.
    #[must_use]
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.terms.auction_end().is_some_and(|end| end <= now)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Listing {
    pub fn dummy_fixed(
        seller: AccountId,
        asset: AssetKey,
        price: Decimal,
        accepted_assets: Vec<ContractId>,
    ) -> Self {
        Self::new(
            seller,
            asset,
            price,
            SaleTerms::Fixed {
                stable_coin_accepted: true,
                accepted_assets: accepted_assets.into_iter().collect(),
            },
        )
    }

    pub fn dummy_auction(seller: AccountId, asset: AssetKey, price: Decimal) -> Self {
        Self::new(
            seller,
            asset,
            price,
            SaleTerms::Auction {
                end_time: Utc::now() + chrono::Duration::days(3),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_terms_accept_listed_contracts_only() {
        let cash = ContractId::new();
        let other = ContractId::new();
        let terms = SaleTerms::from_parts(SaleMode::Fixed, false, vec![cash], None).unwrap();
        assert!(terms.accepts_payment(cash));
        assert!(!terms.accepts_payment(other));
        assert!(!terms.stable_coin_accepted());
    }

    #[test]
    fn auction_requires_end_time() {
        let result = SaleTerms::from_parts(SaleMode::Auction, false, vec![], None);
        assert!(matches!(
            result,
            Err(MarketError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn auction_rejects_stable_coin() {
        let result = SaleTerms::from_parts(
            SaleMode::Auction,
            true,
            vec![],
            Some(Utc::now() + chrono::Duration::days(1)),
        );
        assert!(matches!(
            result,
            Err(MarketError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn auction_never_accepts_direct_payment() {
        let cash = ContractId::new();
        let terms = SaleTerms::from_parts(
            SaleMode::Auction,
            false,
            vec![cash],
            Some(Utc::now() + chrono::Duration::days(1)),
        )
        .unwrap();
        assert!(!terms.accepts_payment(cash));
        assert!(!terms.stable_coin_accepted());
        assert!(terms.auction_end().is_some());
    }

    #[test]
    fn fixed_listing_ignores_auction_end() {
        let terms =
            SaleTerms::from_parts(SaleMode::Fixed, true, vec![], Some(Utc::now())).unwrap();
        assert_eq!(terms.auction_end(), None);
    }

    #[test]
    fn bid_floor_is_listed_price() {
        let listing = Listing::dummy_auction(AccountId::new(), AssetKey::dummy(), Decimal::new(250, 0));
        assert!(listing.is_auction());
        assert_eq!(listing.bid_floor(), Decimal::new(250, 0));
    }

    #[test]
    fn has_ended_tracks_deadline() {
        let listing = Listing::new(
            AccountId::new(),
            AssetKey::dummy(),
            Decimal::ONE,
            SaleTerms::Auction {
                end_time: Utc::now() - chrono::Duration::hours(1),
            },
        );
        assert!(listing.has_ended(Utc::now()));

        let open = Listing::dummy_auction(AccountId::new(), AssetKey::dummy(), Decimal::ONE);
        assert!(!open.has_ended(Utc::now()));
    }
}
