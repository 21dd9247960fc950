//! # Package Entity
//!
//! The parcel being priced, as described by the product record.
//!
//! Weight is kept exactly as supplied (ounces, possibly missing); whether it
//! is usable is decided by the weight calculator, which knows whether a
//! dimensional fallback exists.
//!
//! # Examples
//!
//! ```
//! use parcel_rates::domain::entities::package::Package;
//! use parcel_rates::domain::value_objects::Dimensions;
//!
//! let book = Package::new(6.0).with_dimensions(Dimensions::new(7.5, 5.0, 0.8).unwrap());
//! assert_eq!(book.weight_oz(), Some(6.0));
//! assert!(book.is_calculated());
//! ```

use crate::domain::errors::ValidationResult;
use crate::domain::value_objects::{Dimensions, Money, ShippingOption};
use serde::{Deserialize, Serialize};

/// A package to be shipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Actual weight in ounces, if recorded.
    weight_oz: Option<f64>,
    /// Outer dimensions, if recorded.
    dimensions: Option<Dimensions>,
    /// How the product declares shipping.
    #[serde(default)]
    shipping_option: ShippingOption,
    /// Fixed amount for [`ShippingOption::Flat`] products.
    #[serde(default)]
    flat_rate: Option<Money>,
}

impl Package {
    /// Creates a calculated-shipping package with the given weight in ounces.
    #[must_use]
    pub fn new(weight_oz: f64) -> Self {
        Self {
            weight_oz: Some(weight_oz),
            dimensions: None,
            shipping_option: ShippingOption::Calculated,
            flat_rate: None,
        }
    }

    /// Creates a calculated-shipping package whose weight is not on file.
    #[must_use]
    pub fn without_weight() -> Self {
        Self {
            weight_oz: None,
            ..Self::new(0.0)
        }
    }

    /// Builds a package from raw product-record fields.
    ///
    /// `dimensions` is the delimited `LxWxH` field; blank or zero-sided values
    /// are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidDimensions` if the dimension field is
    /// present but malformed.
    pub fn from_record(
        weight_oz: Option<f64>,
        dimensions: Option<&str>,
        shipping_option: ShippingOption,
        flat_rate: Option<Money>,
    ) -> ValidationResult<Self> {
        let dimensions = match dimensions {
            Some(raw) => Dimensions::parse_optional(raw)?,
            None => None,
        };
        Ok(Self {
            weight_oz,
            dimensions,
            shipping_option,
            flat_rate,
        })
    }

    /// Sets the package dimensions.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Marks the package as shipping for a flat amount.
    #[must_use]
    pub fn flat(mut self, amount: Money) -> Self {
        self.shipping_option = ShippingOption::Flat;
        self.flat_rate = Some(amount);
        self
    }

    /// Marks the package as shipping free.
    #[must_use]
    pub fn free(mut self) -> Self {
        self.shipping_option = ShippingOption::Free;
        self.flat_rate = None;
        self
    }

    /// Returns the recorded weight in ounces.
    #[inline]
    #[must_use]
    pub fn weight_oz(&self) -> Option<f64> {
        self.weight_oz
    }

    /// Returns the recorded dimensions.
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> Option<&Dimensions> {
        self.dimensions.as_ref()
    }

    /// Returns the declared shipping option.
    #[inline]
    #[must_use]
    pub fn shipping_option(&self) -> ShippingOption {
        self.shipping_option
    }

    /// Returns the flat amount; zero when a flat package has none on file.
    #[must_use]
    pub fn flat_rate(&self) -> Money {
        self.flat_rate.unwrap_or(Money::ZERO)
    }

    /// Returns true if the package is priced by the rate engine.
    #[inline]
    #[must_use]
    pub fn is_calculated(&self) -> bool {
        self.shipping_option == ShippingOption::Calculated
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn from_record_parses_dimensions() {
        let pkg =
            Package::from_record(Some(160.0), Some("8x10x12"), ShippingOption::Calculated, None)
                .unwrap();
        assert_eq!(pkg.dimensions().unwrap().volume(), 960.0);
    }

    #[test]
    fn from_record_blank_dimensions_are_absent() {
        let pkg = Package::from_record(Some(4.0), Some(""), ShippingOption::Calculated, None)
            .unwrap();
        assert!(pkg.dimensions().is_none());
    }

    #[test]
    fn from_record_rejects_garbage_dimensions() {
        assert!(
            Package::from_record(Some(4.0), Some("big"), ShippingOption::Calculated, None).is_err()
        );
    }

    #[test]
    fn flat_and_free() {
        let flat = Package::new(10.0).flat(Money::from_cents(500));
        assert_eq!(flat.shipping_option(), ShippingOption::Flat);
        assert_eq!(flat.flat_rate(), Money::from_cents(500));
        assert!(!flat.is_calculated());

        let free = flat.free();
        assert_eq!(free.shipping_option(), ShippingOption::Free);
        assert_eq!(free.flat_rate(), Money::ZERO);
    }

    #[test]
    fn without_weight_has_none() {
        assert_eq!(Package::without_weight().weight_oz(), None);
    }

    mod from_json {
        use super::*;

        #[test]
        fn negative_flat_rate_rejected() {
            let result = serde_json::from_str::<Package>(
                r#"{"weight_oz": 10.0, "shipping_option": "flat", "flat_rate": "-5.00"}"#,
            );
            assert!(result.is_err());
        }

        #[test]
        fn flat_rate_rounded_to_cents() {
            let pkg: Package = serde_json::from_str(
                r#"{"weight_oz": 10.0, "shipping_option": "flat", "flat_rate": "4.999"}"#,
            )
            .unwrap();
            assert_eq!(pkg.flat_rate(), Money::from_cents(500));
        }

        #[test]
        fn negative_dimensions_rejected() {
            let result = serde_json::from_str::<Package>(
                r#"{"weight_oz": 1.0, "dimensions": {"length": -30.0, "width": 10.0, "height": 10.0}}"#,
            );
            assert!(result.is_err());
        }

        #[test]
        fn minimal_record_is_calculated() {
            let pkg: Package = serde_json::from_str(r#"{"weight_oz": 6.0}"#).unwrap();
            assert!(pkg.is_calculated());
            assert!(pkg.dimensions().is_none());
        }
    }
}
