//! # openmart-market
//!
//! **Record managers for OpenMart**: the books that hold seller and
//! buyer intent between creation and settlement.
//!
//! ## Architecture
//!
//! Three independent maps, each validating against the live registries
//! before mutating:
//!
//! 1. **[`ListingBook`]**: assets up for sale, keyed by asset with at
//!    most one listing per asset
//! 2. **[`OfferBook`]**: standing offers addressed to owners, listed
//!    or not
//! 3. **[`BidBook`]**: bids against active auction listings
//!
//! Books never move funds or assets. They check that the intent they
//! record is currently honorable (live owner, engine approval,
//! allowance); the settlement engine re-checks everything at
//! execution time and consumes records via the `take` methods.

pub mod bid_book;
pub mod listing_book;
pub mod offer_book;

pub use bid_book::BidBook;
pub use listing_book::ListingBook;
pub use offer_book::OfferBook;
