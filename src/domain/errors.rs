//! # Validation Errors
//!
//! Errors raised for caller input that cannot be priced.
//!
//! These are the only errors the rate engine surfaces to callers. They are
//! never retried: the UI is expected to prompt the shopper for a correction.
//!
//! # Examples
//!
//! ```
//! use parcel_rates::domain::errors::ValidationError;
//!
//! let err = ValidationError::invalid_postal_code("123");
//! assert!(err.to_string().contains("123"));
//! ```

use thiserror::Error;

/// Input validation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Postal code is not a 5-digit ZIP (or ZIP+4).
    #[error("invalid postal code: '{value}' (expected 5 digits)")]
    InvalidPostalCode {
        /// The rejected input.
        value: String,
    },

    /// No weight given and no dimensional weight to fall back on.
    #[error("package weight is missing and no dimensions are available to derive it")]
    MissingWeight,

    /// Weight is negative, NaN or infinite.
    #[error("invalid package weight: {value} oz")]
    InvalidWeight {
        /// The rejected weight in ounces.
        value: f64,
    },

    /// Dimensions could not be parsed or are non-positive.
    #[error("invalid package dimensions '{value}': {reason}")]
    InvalidDimensions {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Actual weight exceeds the carrier maximum.
    #[error("package too heavy: {pounds:.2} lb exceeds the {max} lb limit")]
    Overweight {
        /// Actual weight in pounds.
        pounds: f64,
        /// Maximum accepted weight in pounds.
        max: u32,
    },

    /// A currency amount is negative.
    #[error("invalid amount: {value} (must not be negative)")]
    InvalidAmount {
        /// The rejected amount.
        value: String,
    },

    /// Money arithmetic overflowed while assembling a quote.
    #[error("rate computation overflowed")]
    Overflow,
}

impl ValidationError {
    /// Creates an invalid postal code error.
    #[must_use]
    pub fn invalid_postal_code(value: impl Into<String>) -> Self {
        Self::InvalidPostalCode {
            value: value.into(),
        }
    }

    /// Creates an invalid dimensions error.
    #[must_use]
    pub fn invalid_dimensions(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid amount error.
    #[must_use]
    pub fn invalid_amount(value: impl ToString) -> Self {
        Self::InvalidAmount {
            value: value.to_string(),
        }
    }

    /// Returns true if the error concerns the destination or origin address.
    #[must_use]
    pub fn is_address_error(&self) -> bool {
        matches!(self, Self::InvalidPostalCode { .. })
    }

    /// Returns true if the error concerns the package itself.
    #[must_use]
    pub fn is_package_error(&self) -> bool {
        matches!(
            self,
            Self::MissingWeight
                | Self::InvalidWeight { .. }
                | Self::InvalidDimensions { .. }
                | Self::Overweight { .. }
                | Self::InvalidAmount { .. }
        )
    }
}

/// Result type for validated operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postal_code_is_address_error() {
        let err = ValidationError::invalid_postal_code("12");
        assert!(err.is_address_error());
        assert!(!err.is_package_error());
    }

    #[test]
    fn weight_errors_are_package_errors() {
        assert!(ValidationError::MissingWeight.is_package_error());
        assert!(ValidationError::InvalidWeight { value: -1.0 }.is_package_error());
        assert!(
            ValidationError::Overweight {
                pounds: 80.0,
                max: 70
            }
            .is_package_error()
        );
    }

    #[test]
    fn display_format() {
        let err = ValidationError::invalid_dimensions("8x10", "expected three dimensions");
        let display = err.to_string();
        assert!(display.contains("8x10"));
        assert!(display.contains("three dimensions"));
    }
}
