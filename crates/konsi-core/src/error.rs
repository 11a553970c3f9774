//! # Error Types
//!
//! Domain-specific error types for konsi-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  konsi-core errors (this file)                                      │
//! │  ├── LedgerError      - Ledger operation failures                   │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  konsi-db errors (separate crate)                                   │
//! │  └── StoreError       - Entity store failures                       │
//! │                                                                     │
//! │  Flow: ValidationError → LedgerError → StoreError → caller          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, quantities, ids)
//! 3. Errors are enum variants, never String
//! 4. Every variant is a locally-recoverable user error; the caller matches
//!    on the kind and renders its own display text

use thiserror::Error;

// =============================================================================
// Ledger Error
// =============================================================================

/// Ledger operation errors.
///
/// These represent business rule violations raised while planning one of the
/// five ledger operations (ship, deliver, sell, return, pay). A failed plan
/// produces no state change at all.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The warehouse does not hold enough stock for a shipment or direct
    /// sale.
    ///
    /// ## When This Occurs
    /// - Shipping more units than the warehouse holds
    /// - Direct-selling more units than the warehouse holds
    #[error("insufficient warehouse stock for {product}: available {available}, requested {requested}")]
    InsufficientWarehouseStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// A partner does not hold enough consigned inventory.
    ///
    /// ## When This Occurs
    /// - Selling through a partner more units than they hold
    /// - Returning more units than the partner holds
    #[error("insufficient partner stock at {partner} for {product}: available {available}, requested {requested}")]
    InsufficientPartnerStock {
        partner: String,
        product: String,
        available: i64,
        requested: i64,
    },

    /// A distribution was already confirmed as delivered.
    ///
    /// The `InTransit → Delivered` transition happens exactly once; a second
    /// confirmation must not double-increment partner inventory.
    #[error("distribution {0} has already been delivered")]
    AlreadyDelivered(String),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    EntityNotFound { entity: String, id: String },

    /// Input validation failure (wraps ValidationError).
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl LedgerError {
    /// Creates an EntityNotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        LedgerError::EntityNotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the pure predicates in [`crate::validation`] before any ledger
/// planning runs. Callable independently for boundary-value unit tests.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// An amount or quantity must be strictly positive.
    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },

    /// Requested quantity exceeds what is available.
    #[error("insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { requested: i64, available: i64 },

    /// Discount percentage outside the 0-100 range.
    #[error("discount must be between 0 and 100, got {percent}")]
    InvalidDiscount { percent: i64 },

    /// One or more required fields are missing or empty.
    ///
    /// Lists all missing fields at once, not just the first failure.
    #[error("missing required fields: {}", .fields.join(", "))]
    MissingRequiredFields { fields: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_error_messages() {
        let err = LedgerError::InsufficientWarehouseStock {
            product: "Kopi Arabika 250g".to_string(),
            available: 5,
            requested: 10,
        };
        assert_eq!(
            err.to_string(),
            "insufficient warehouse stock for Kopi Arabika 250g: available 5, requested 10"
        );

        let err = LedgerError::AlreadyDelivered("dist-1".to_string());
        assert_eq!(err.to_string(), "distribution dist-1 has already been delivered");
    }

    #[test]
    fn test_missing_fields_lists_all() {
        let err = ValidationError::MissingRequiredFields {
            fields: vec!["buyer_name".to_string(), "payment_method".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing required fields: buyer_name, payment_method"
        );
    }

    #[test]
    fn test_validation_converts_to_ledger_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "amount".to_string(),
        };
        let ledger_err: LedgerError = validation_err.into();
        assert!(matches!(ledger_err, LedgerError::Validation(_)));
    }
}
