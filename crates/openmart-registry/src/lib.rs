//! # openmart-registry
//!
//! **Registry seams for OpenMart**: the traits through which the engine
//! sees the outside world, their in-memory reference implementations,
//! and the shared verification gates.
//!
//! ## Architecture
//!
//! The engine is non-custodial, so it never stores asset state of its
//! own; it consults these seams on every operation:
//!
//! 1. **[`UniqueAssets`]**: who owns a token, is the engine approved,
//!    move it at settlement ([`MemoryNft`] in tests)
//! 2. **[`FungibleAssets`]**: balances, allowances, payment transfers
//!    ([`MemoryTokens`] in tests)
//! 3. **[`PriceOracle`]**: reference-currency conversion for
//!    stable-coin purchases ([`FixedRateOracle`] in tests)
//!
//! The [`checks`] module holds the re-validation gates every
//! state-changing operation runs against the live registries.

pub mod checks;
pub mod fungible;
pub mod oracle;
pub mod unique;

pub use checks::{
    ensure_exchange_approved, ensure_funds, ensure_live_owner, ensure_spending_authorized,
};
pub use fungible::{FungibleAssets, MemoryTokens};
pub use oracle::{FixedRateOracle, PriceOracle};
pub use unique::{MemoryNft, UniqueAssets};
