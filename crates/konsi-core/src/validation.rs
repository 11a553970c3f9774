//! # Validation Module
//!
//! Pure, stateless predicates invoked before any ledger write.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Validation Layers                             │
//! │                                                                     │
//! │  Layer 1: THIS MODULE - pure business predicates                    │
//! │  ├── stock sufficiency, positive amounts, discount range            │
//! │  └── required-field completeness (all failures reported at once)    │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: Ledger planning (konsi-core::ledger)                      │
//! │  └── maps failures to operation-specific error kinds                │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  └── CHECK constraints as a last line of defense                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every predicate is callable independently so boundary values (0,
//! negative, exactly-at-limit) can be unit tested in isolation.

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Stock & Amount Validators
// =============================================================================

/// Validates stock availability for a requested quantity.
///
/// ## Rules
/// - `requested` must be positive (> 0)
/// - `requested` must not exceed `available` (exactly-at-limit succeeds)
///
/// ## Example
/// ```rust
/// use konsi_core::validation::validate_stock;
///
/// assert!(validate_stock(5, 5).is_ok());
/// assert!(validate_stock(6, 5).is_err());
/// assert!(validate_stock(0, 5).is_err());
/// ```
pub fn validate_stock(requested: i64, available: i64) -> ValidationResult<()> {
    if requested <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if requested > available {
        return Err(ValidationError::InsufficientStock {
            requested,
            available,
        });
    }

    Ok(())
}

/// Validates that an amount is strictly positive.
///
/// ## Rules
/// - Must be > 0; zero and negative amounts are rejected
pub fn validate_positive_amount(amount: i64, field: &str) -> ValidationResult<()> {
    if amount <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a discount percentage.
///
/// ## Rules
/// - Must be within `[0, 100]`; both endpoints are valid
pub fn validate_discount(percent: i64) -> ValidationResult<()> {
    if !(0..=100).contains(&percent) {
        return Err(ValidationError::InvalidDiscount { percent });
    }

    Ok(())
}

// =============================================================================
// Required-Field Validator
// =============================================================================

/// Validates that every listed field has a non-empty value.
///
/// Reports **all** missing fields in one error rather than stopping at the
/// first failure, so a form round-trip surfaces everything at once.
///
/// ## Example
/// ```rust
/// use konsi_core::validation::validate_required_fields;
///
/// assert!(validate_required_fields(&[("buyer_name", "Ibu Ani")]).is_ok());
///
/// let err = validate_required_fields(&[
///     ("buyer_name", ""),
///     ("reason", "  "),
/// ])
/// .unwrap_err();
/// assert_eq!(err.to_string(), "missing required fields: buyer_name, reason");
/// ```
pub fn validate_required_fields(fields: &[(&str, &str)]) -> ValidationResult<()> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(ValidationError::MissingRequiredFields { fields: missing });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_stock_boundaries() {
        // Exactly-at-limit succeeds
        assert!(validate_stock(5, 5).is_ok());
        assert!(validate_stock(1, 5).is_ok());

        // One over the limit fails with the shortfall detail
        let err = validate_stock(6, 5).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InsufficientStock {
                requested: 6,
                available: 5
            }
        ));
        assert_eq!(
            err.to_string(),
            "insufficient stock: available 5, requested 6"
        );

        // Quantity must be strictly positive
        assert!(validate_stock(0, 5).is_err());
        assert!(validate_stock(-1, 5).is_err());
    }

    #[test]
    fn test_validate_positive_amount() {
        assert!(validate_positive_amount(1, "amount").is_ok());
        assert!(validate_positive_amount(5_000_000, "amount").is_ok());

        assert!(validate_positive_amount(0, "amount").is_err());
        assert!(validate_positive_amount(-100, "amount").is_err());
    }

    #[test]
    fn test_validate_discount() {
        assert!(validate_discount(0).is_ok());
        assert!(validate_discount(50).is_ok());
        assert!(validate_discount(100).is_ok());

        assert!(validate_discount(-1).is_err());
        assert!(validate_discount(101).is_err());
    }

    #[test]
    fn test_validate_required_fields_reports_all() {
        assert!(validate_required_fields(&[("a", "x"), ("b", "y")]).is_ok());

        let err = validate_required_fields(&[("a", ""), ("b", "y"), ("c", "   ")]).unwrap_err();
        match err {
            ValidationError::MissingRequiredFields { fields } => {
                assert_eq!(fields, vec!["a".to_string(), "c".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
