//! # openmart-types
//!
//! Shared types, errors, and configuration for the **OpenMart**
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace; every other
//! crate depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`ContractId`], [`TokenId`], [`AssetKey`]
//! - **Listing model**: [`Listing`], [`ListingRequest`], [`SaleMode`], [`SaleTerms`]
//! - **Standing intents**: [`Offer`], [`OfferKey`], [`Bid`], [`BidKey`]
//! - **Pricing**: [`FeeSchedule`] (service fee + tolerance, basis points)
//! - **Receipts**: [`SaleReceipt`], [`SaleKind`]
//! - **Errors**: [`MarketError`] with `MKT_ERR_` prefix codes
//! - **Constants**: basis-point denominators and defaults

pub mod bid;
pub mod constants;
pub mod error;
pub mod fees;
pub mod ids;
pub mod listing;
pub mod offer;
pub mod receipt;

// Re-export all primary types at crate root for ergonomic imports:
//   use openmart_types::{Listing, Offer, Bid, MarketError, ...};

pub use bid::*;
pub use error::*;
pub use fees::*;
pub use ids::*;
pub use listing::*;
pub use offer::*;
pub use receipt::*;

// Constants are accessed via `openmart_types::constants::FOO`
// (not re-exported to avoid name collisions).
