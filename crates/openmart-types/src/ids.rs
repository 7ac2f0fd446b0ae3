//! Globally unique identifiers used throughout OpenMart.
//!
//! Participant and contract IDs use UUIDv7 for time-ordered lexicographic
//! sorting. Tokens within a collection keep the registry's own `u64`
//! numbering, so an `AssetKey` is the pair (collection contract, token).

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Unique identifier for a participant: seller, buyer, bidder, or the
/// engine's own account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub Uuid);

impl AccountId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ContractId
// ---------------------------------------------------------------------------

/// Unique identifier for an asset contract: either a unique-asset
/// collection or a fungible payment token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ContractId(pub Uuid);

impl ContractId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for ContractId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TokenId
// ---------------------------------------------------------------------------

/// Identifier of a single token within a unique-asset collection.
/// The numbering is the registry's, not ours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TokenId(pub u64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AssetKey
// ---------------------------------------------------------------------------

/// Names exactly one unique asset: a token within a collection contract.
/// Primary key for listings and part of the offer/bid keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AssetKey {
    /// The collection contract the token belongs to.
    pub contract: ContractId,
    /// The token within that collection.
    pub token: TokenId,
}

impl AssetKey {
    #[must_use]
    pub fn new(contract: ContractId, token: TokenId) -> Self {
        Self { contract, token }
    }

    /// Random key for tests: fresh contract, random token number.
    #[cfg(any(test, feature = "test-helpers"))]
    #[must_use]
    pub fn dummy() -> Self {
        Self {
            contract: ContractId::new(),
            token: TokenId(u64::from(rand::random::<u32>())),
        }
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.contract, self.token)
    }
}
