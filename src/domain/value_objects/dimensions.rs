//! # Package Dimensions
//!
//! Length, width and height in inches.
//!
//! Product records store dimensions as a single delimited string. Accepted
//! separators are `x`, `X`, `*`, `,` and `×`, with optional whitespace around
//! each value.
//!
//! # Examples
//!
//! ```
//! use parcel_rates::domain::value_objects::dimensions::Dimensions;
//!
//! let dims: Dimensions = "8 x 10 x 12".parse().unwrap();
//! assert_eq!(dims.longest_side(), 12.0);
//! assert_eq!(dims.girth(), 36.0);
//! assert_eq!(dims.length_plus_girth(), 48.0);
//! ```

use crate::domain::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SEPARATORS: [char; 5] = ['x', 'X', '*', ',', '×'];

/// Package dimensions in inches.
///
/// # Invariants
///
/// - Every side is finite and strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDimensions")]
pub struct Dimensions {
    length: f64,
    width: f64,
    height: f64,
}

/// Unchecked wire shape, validated through [`Dimensions::new`].
#[derive(Deserialize)]
struct RawDimensions {
    length: f64,
    width: f64,
    height: f64,
}

impl TryFrom<RawDimensions> for Dimensions {
    type Error = ValidationError;

    fn try_from(raw: RawDimensions) -> Result<Self, Self::Error> {
        Self::new(raw.length, raw.width, raw.height)
    }
}

impl Dimensions {
    /// Creates dimensions from three sides.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidDimensions` if any side is not a
    /// finite positive number.
    pub fn new(length: f64, width: f64, height: f64) -> Result<Self, ValidationError> {
        for side in [length, width, height] {
            if !side.is_finite() || side <= 0.0 {
                return Err(ValidationError::invalid_dimensions(
                    format!("{length}x{width}x{height}"),
                    "every side must be a positive number of inches",
                ));
            }
        }
        Ok(Self {
            length,
            width,
            height,
        })
    }

    /// Parses a delimited `LxWxH` string.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidDimensions` if the string does not
    /// contain exactly three positive numbers.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let parts: Vec<&str> = input
            .split(|c| SEPARATORS.contains(&c))
            .map(str::trim)
            .collect();

        let &[l, w, h] = parts.as_slice() else {
            return Err(ValidationError::invalid_dimensions(
                input,
                "expected three dimensions",
            ));
        };

        let side = |raw: &str| {
            raw.parse::<f64>().map_err(|_| {
                ValidationError::invalid_dimensions(input, format!("'{raw}' is not a number"))
            })
        };

        Self::new(side(l)?, side(w)?, side(h)?)
            .map_err(|_| ValidationError::invalid_dimensions(input, "every side must be positive"))
    }

    /// Parses a product-record dimension field that may be absent.
    ///
    /// Blank input, or input with a zero side, means "no dimensions on file"
    /// and yields `None`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidDimensions` for input that is present
    /// but malformed or negative.
    pub fn parse_optional(input: &str) -> Result<Option<Self>, ValidationError> {
        if input.trim().is_empty() {
            return Ok(None);
        }
        let has_zero_side = input
            .split(|c| SEPARATORS.contains(&c))
            .filter_map(|raw| raw.trim().parse::<f64>().ok())
            .any(|side| side == 0.0);
        if has_zero_side {
            return Ok(None);
        }
        Self::parse(input).map(Some)
    }

    /// Returns the length as given.
    #[inline]
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Returns the width as given.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the height as given.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the volume in cubic inches.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// Returns the longest side, which carriers treat as the length.
    #[must_use]
    pub fn longest_side(&self) -> f64 {
        self.length.max(self.width).max(self.height)
    }

    /// Returns the girth: twice the sum of the two shorter sides.
    #[must_use]
    pub fn girth(&self) -> f64 {
        let total = self.length + self.width + self.height;
        2.0 * (total - self.longest_side())
    }

    /// Returns longest side plus girth.
    #[must_use]
    pub fn length_plus_girth(&self) -> f64 {
        self.longest_side() + self.girth()
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{} in", self.length, self.width, self.height)
    }
}

impl FromStr for Dimensions {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
