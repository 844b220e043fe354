//! # Checkout Error Type
//!
//! Unified, serializable error type for checkout session operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Error Flow in Tally POS                         │
//! │                                                                     │
//! │  Frontend                    Rust Backend                           │
//! │  ────────                    ────────────                           │
//! │                                                                     │
//! │  addToCart(product, qty)                                            │
//! │         │                                                           │
//! │         ▼                                                           │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │  CheckoutSession operation                                    │  │
//! │  │  Result<CartSnapshot, CheckoutError>                          │  │
//! │  │         │                                                     │  │
//! │  │         ▼                                                     │  │
//! │  │  Validation Error? ── ValidationError ──┐                     │  │
//! │  │         │                               ▼                     │  │
//! │  │  Cart rule broken? ── CoreError ──── CheckoutError ─────────► │  │
//! │  │         │                                                     │  │
//! │  │         ▼                                                     │  │
//! │  │  Success ───────────────────────── fresh CartSnapshot ──────► │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! │                                                                     │
//! │  try {                                                              │
//! │    await addToCart(...)                                             │
//! │  } catch (e) {                                                      │
//! │    // e.message = "quantity must be positive"                       │
//! │    // e.code = "VALIDATION_ERROR"                                   │
//! │  }                                                                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No error here is fatal. A failed operation is a no-op on the cart and
//! the presentation layer decides how to surface the message.

use serde::Serialize;
use tally_core::{CoreError, ValidationError};

/// Error returned from checkout session operations.
///
/// ## Serialization
/// This is what the frontend receives when an operation fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Cart line not found: prod-1::mod-shot"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for checkout responses.
///
/// ## Usage in Frontend
/// ```typescript
/// try {
///   await addToCart(product, qty);
/// } catch (e) {
///   switch (e.code) {
///     case 'NOT_FOUND':
///       refreshCart();
///       break;
///     case 'VALIDATION_ERROR':
///       showQuantityHint(e.message);
///       break;
///     default:
///       showError('An error occurred');
///   }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Cart line not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Cart rule violation (size or quantity limits)
    CartError,
}

impl CheckoutError {
    /// Creates a new checkout error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CheckoutError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        CheckoutError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a cart rule error.
    pub fn cart(message: impl Into<String>) -> Self {
        CheckoutError::new(ErrorCode::CartError, message)
    }
}

/// Converts core errors to checkout errors.
impl From<CoreError> for CheckoutError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LineNotFound(_) => CheckoutError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::CartTooLarge { .. } | CoreError::QuantityTooLarge { .. } => {
                CheckoutError::cart(err.to_string())
            }
            CoreError::Validation(e) => CheckoutError::validation(e.to_string()),
        }
    }
}

/// Converts bare validation errors (e.g. from discount parsing).
impl From<ValidationError> for CheckoutError {
    fn from(err: ValidationError) -> Self {
        CheckoutError::validation(err.to_string())
    }
}

impl std::fmt::Display for CheckoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for CheckoutError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: CheckoutError = CoreError::LineNotFound("prod-1".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: CheckoutError = CoreError::CartTooLarge { max: 100 }.into();
        assert_eq!(err.code, ErrorCode::CartError);

        let err: CheckoutError = CoreError::Validation(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "quantity must be positive");
    }

    #[test]
    fn test_serialized_form() {
        let err = CheckoutError::validation("quantity must be positive");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "quantity must be positive");
    }
}
