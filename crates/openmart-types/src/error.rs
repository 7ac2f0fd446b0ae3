//! Error types for the OpenMart settlement engine.
//!
//! All errors use the `MKT_ERR_` prefix convention for easy grepping in
//! logs. Error codes are grouped by subsystem:
//! - 1xx: Ownership / authorization errors
//! - 2xx: Record state errors
//! - 3xx: Parameter errors
//! - 4xx: Pricing errors
//! - 5xx: Funds / treasury errors
//!
//! Callers and tests match on the variant; the rendered message carries
//! the context. Codes are stable across releases.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::AssetKey;

/// Central error enum for all OpenMart operations.
#[derive(Debug, Error)]
pub enum MarketError {
    // =================================================================
    // Ownership / Authorization Errors (1xx)
    // =================================================================
    /// The claimed or recorded owner is not the live registry owner of
    /// the asset (or the asset does not exist in the registry).
    #[error("MKT_ERR_100: Not the current owner of asset {asset}")]
    NotOwner { asset: AssetKey },

    /// The engine lacks transfer approval for a unique asset, or a
    /// spend allowance on the fungible ledger is too small.
    #[error("MKT_ERR_101: Transfer not approved: {reason}")]
    NotApproved { reason: String },

    /// An administrative operation was attempted by an account that is
    /// not the engine owner.
    #[error("MKT_ERR_102: Caller is not the engine owner")]
    Unauthorized,

    // =================================================================
    // Record State Errors (2xx)
    // =================================================================
    /// A listing/offer/bid record is missing, already present, or in the
    /// wrong mode for the requested operation.
    #[error("MKT_ERR_200: Invalid state: {reason}")]
    InvalidState { reason: String },

    // =================================================================
    // Parameter Errors (3xx)
    // =================================================================
    /// A parameter failed validation: zero price or amount, an invalid
    /// sale-mode combination, self-dealing, basis points out of range.
    #[error("MKT_ERR_300: Invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    // =================================================================
    // Pricing Errors (4xx)
    // =================================================================
    /// A tendered amount, oracle quote, or bid fell below the applicable
    /// floor (tolerance floor for purchases, listed price for bids).
    #[error("MKT_ERR_400: Amount {tendered} below floor {floor}")]
    PriceOutOfRange { tendered: Decimal, floor: Decimal },

    // =================================================================
    // Funds / Treasury Errors (5xx)
    // =================================================================
    /// A fungible-ledger balance is too small for the transfer.
    #[error("MKT_ERR_500: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    /// A withdrawal requested more than the treasury has accrued for
    /// that contract.
    #[error("MKT_ERR_501: Insufficient treasury: requested {requested}, held {held}")]
    InsufficientTreasury { requested: Decimal, held: Decimal },
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, MarketError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContractId, TokenId};

    #[test]
    fn error_display_contains_prefix() {
        let err = MarketError::NotOwner {
            asset: AssetKey::new(ContractId::new(), TokenId(1)),
        };
        let msg = format!("{err}");
        assert!(msg.starts_with("MKT_ERR_100"), "Got: {msg}");
    }

    #[test]
    fn price_out_of_range_display() {
        let err = MarketError::PriceOutOfRange {
            tendered: Decimal::new(98, 0),
            floor: Decimal::new(99, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("MKT_ERR_400"));
        assert!(msg.contains("98"));
        assert!(msg.contains("99"));
    }

    #[test]
    fn insufficient_treasury_display() {
        let err = MarketError::InsufficientTreasury {
            requested: Decimal::new(10, 0),
            held: Decimal::new(3, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("MKT_ERR_501"));
        assert!(msg.contains("10"));
        assert!(msg.contains("3"));
    }

    #[test]
    fn all_errors_have_mkt_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(MarketError::Unauthorized),
            Box::new(MarketError::NotApproved {
                reason: "test".into(),
            }),
            Box::new(MarketError::InvalidState {
                reason: "test".into(),
            }),
            Box::new(MarketError::InvalidParameter {
                reason: "test".into(),
            }),
            Box::new(MarketError::InsufficientBalance {
                needed: Decimal::ONE,
                available: Decimal::ZERO,
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("MKT_ERR_"),
                "Error missing MKT_ERR_ prefix: {msg}"
            );
        }
    }
}
