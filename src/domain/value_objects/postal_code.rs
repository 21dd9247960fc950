//! # Postal Code
//!
//! Validated 5-digit US ZIP code.
//!
//! User-entered destinations are validated here rather than upstream, so
//! parsing is strict: surrounding whitespace is trimmed and a ZIP+4 suffix is
//! dropped, but anything else that is not exactly five digits is rejected.
//!
//! # Examples
//!
//! ```
//! use parcel_rates::domain::value_objects::postal_code::PostalCode;
//!
//! let zip: PostalCode = " 98101-1234 ".parse().unwrap();
//! assert_eq!(zip.as_str(), "98101");
//! assert_eq!(zip.prefix(), 981);
//!
//! assert!("981".parse::<PostalCode>().is_err());
//! ```

use crate::domain::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 5-digit ZIP code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Parses and normalizes a postal code.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPostalCode` unless the input is five
    /// ASCII digits, optionally followed by `-` and four more digits.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let (zip5, plus4) = match trimmed.split_once('-') {
            Some((head, tail)) => (head, Some(tail)),
            None => (trimmed, None),
        };

        let plus4_ok = plus4.is_none_or(|tail| is_digits(tail, 4));
        if !is_digits(zip5, 5) || !plus4_ok {
            return Err(ValidationError::invalid_postal_code(input));
        }

        Ok(Self(zip5.to_string()))
    }

    /// Returns the 5-digit code.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the 3-digit sectional center prefix as a number.
    #[must_use]
    pub fn prefix(&self) -> u16 {
        self.0
            .bytes()
            .take(3)
            .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'))
    }
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PostalCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PostalCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> Self {
        code.0
    }
}
