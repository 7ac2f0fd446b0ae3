//! # openmart-settlement
//!
//! The exchange engine for OpenMart: takes listings, offers, and bids
//! through the book layer and settles agreed sales atomically against
//! the external asset registries.
//!
//! ## Architecture
//!
//! Every settlement path follows the same shape:
//!
//! 1. **Re-validate**: ownership, approvals, allowances, balances, and
//!    price bounds are checked against the live registries at call time,
//!    never trusted from the books.
//! 2. **Mark**: the consumed listing, offer, or bid is removed from its
//!    book so no later call can settle against it again.
//! 3. **Transfer**: seller proceeds, then the service fee, then the
//!    collectible. Pre-validation guarantees each transfer succeeds, so
//!    the sale is all-or-nothing.
//! 4. **Confirm**: the fee is credited to the [`Treasury`] and a
//!    [`openmart_types::SaleReceipt`] with a content digest is returned.
//!
//! The engine is non-custodial: assets and funds stay in their owners'
//! registry accounts until the moment of settlement, and the engine's
//! own account only ever accumulates earned fees.

pub mod engine;
pub mod treasury;

pub use engine::Exchange;
pub use treasury::Treasury;
