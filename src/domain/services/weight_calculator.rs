//! # Weight Calculator
//!
//! Derives the billable weight of a package.
//!
//! # Formula
//!
//! ```text
//! actual      = ounces / 16
//! dimensional = (L x W x H) / 166        (only above 1728 cubic inches)
//! billable    = max(actual, dimensional)
//! ```
//!
//! Packages at or under one cubic foot are priced on actual weight alone, so
//! small light items are not penalized by volume. A package with no recorded
//! weight is priced on its dimensional weight when dimensions are on file,
//! and rejected otherwise.
//!
//! The carrier maximum applies to actual weight only. A dimensional weight
//! beyond it is priced in the open-ended bracket with per-pound overage.

use crate::domain::entities::Package;
use crate::domain::errors::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};

/// Ounces per pound.
pub const OUNCES_PER_POUND: f64 = 16.0;
/// Cubic inches per pound of dimensional weight.
pub const DIM_DIVISOR: f64 = 166.0;
/// Volume above which dimensional weight applies, in cubic inches.
pub const DIM_THRESHOLD_CUBIC_INCHES: f64 = 1728.0;
/// Smallest weight ever billed, in ounces.
pub const MIN_WEIGHT_OZ: f64 = 1.0;
/// Heaviest actual weight accepted, in pounds.
pub const MAX_WEIGHT_LBS: u32 = 70;

/// Which weight the price is based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightBasis {
    /// Scale weight.
    Actual,
    /// Volume-derived weight.
    Dimensional,
}

/// Result of a billable-weight calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BillableWeight {
    /// Weight used for pricing, in pounds.
    pub pounds: f64,
    /// Actual weight in pounds, if recorded.
    pub actual_lbs: Option<f64>,
    /// Dimensional weight in pounds, if it applies.
    pub dimensional_lbs: Option<f64>,
    /// Which of the two was used.
    pub basis: WeightBasis,
}

/// Stateless billable-weight calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightCalculator;

impl WeightCalculator {
    /// Creates a calculator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the billable weight in pounds.
    ///
    /// # Errors
    ///
    /// - `ValidationError::InvalidWeight` for negative or non-finite weight
    /// - `ValidationError::MissingWeight` when neither weight nor dimensions exist
    /// - `ValidationError::Overweight` for an actual weight above [`MAX_WEIGHT_LBS`]
    pub fn billable_weight(&self, package: &Package) -> ValidationResult<BillableWeight> {
        let actual_lbs = actual_pounds(package.weight_oz())?;
        if let Some(actual) = actual_lbs.filter(|lbs| *lbs > f64::from(MAX_WEIGHT_LBS)) {
            return Err(ValidationError::Overweight {
                pounds: actual,
                max: MAX_WEIGHT_LBS,
            });
        }
        let dims = package.dimensions();

        let billable = match (actual_lbs, dims) {
            (Some(actual), Some(dims)) if dims.volume() > DIM_THRESHOLD_CUBIC_INCHES => {
                let dimensional = dims.volume() / DIM_DIVISOR;
                if dimensional > actual {
                    BillableWeight {
                        pounds: dimensional,
                        actual_lbs: Some(actual),
                        dimensional_lbs: Some(dimensional),
                        basis: WeightBasis::Dimensional,
                    }
                } else {
                    BillableWeight {
                        pounds: actual,
                        actual_lbs: Some(actual),
                        dimensional_lbs: Some(dimensional),
                        basis: WeightBasis::Actual,
                    }
                }
            }
            (Some(actual), _) => BillableWeight {
                pounds: actual,
                actual_lbs: Some(actual),
                dimensional_lbs: None,
                basis: WeightBasis::Actual,
            },
            (None, Some(dims)) => {
                let dimensional = (dims.volume() / DIM_DIVISOR).max(MIN_WEIGHT_OZ / OUNCES_PER_POUND);
                BillableWeight {
                    pounds: dimensional,
                    actual_lbs: None,
                    dimensional_lbs: Some(dimensional),
                    basis: WeightBasis::Dimensional,
                }
            }
            (None, None) => return Err(ValidationError::MissingWeight),
        };

        Ok(billable)
    }
}

/// Converts recorded ounces to pounds; zero or missing weight yields `None`.
fn actual_pounds(weight_oz: Option<f64>) -> ValidationResult<Option<f64>> {
    match weight_oz {
        Some(oz) if !oz.is_finite() || oz < 0.0 => Err(ValidationError::InvalidWeight { value: oz }),
        Some(oz) if oz > 0.0 => Ok(Some(oz.max(MIN_WEIGHT_OZ) / OUNCES_PER_POUND)),
        _ => Ok(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Dimensions;

    fn calc() -> WeightCalculator {
        WeightCalculator::new()
    }

    mod actual_weight {
        use super::*;

        #[test]
        fn converts_ounces_to_pounds() {
            let w = calc().billable_weight(&Package::new(24.0)).unwrap();
            assert_eq!(w.pounds, 1.5);
            assert_eq!(w.basis, WeightBasis::Actual);
        }

        #[test]
        fn tiny_weight_raised_to_minimum() {
            let w = calc().billable_weight(&Package::new(0.2)).unwrap();
            assert_eq!(w.pounds, MIN_WEIGHT_OZ / OUNCES_PER_POUND);
        }

        #[test]
        fn negative_and_nan_rejected() {
            assert!(matches!(
                calc().billable_weight(&Package::new(-3.0)),
                Err(ValidationError::InvalidWeight { .. })
            ));
            assert!(calc().billable_weight(&Package::new(f64::NAN)).is_err());
        }

        #[test]
        fn overweight_rejected() {
            let err = calc().billable_weight(&Package::new(71.0 * 16.0)).unwrap_err();
            assert!(matches!(err, ValidationError::Overweight { max: 70, .. }));
        }
    }

    mod dimensional_weight {
        use super::*;

        #[test]
        fn small_box_ignores_volume() {
            // 960 cubic inches is under one cubic foot.
            let pkg = Package::new(16.0).with_dimensions(Dimensions::new(8.0, 10.0, 12.0).unwrap());
            let w = calc().billable_weight(&pkg).unwrap();
            assert_eq!(w.pounds, 1.0);
            assert_eq!(w.dimensional_lbs, None);
        }

        #[test]
        fn bulky_light_box_uses_volume() {
            // 20x20x20 = 8000 cubic inches -> 48.19 lb dimensional.
            let pkg = Package::new(32.0).with_dimensions(Dimensions::new(20.0, 20.0, 20.0).unwrap());
            let w = calc().billable_weight(&pkg).unwrap();
            assert_eq!(w.basis, WeightBasis::Dimensional);
            assert!((w.pounds - 8000.0 / 166.0).abs() < 1e-9);
            assert_eq!(w.actual_lbs, Some(2.0));
        }

        #[test]
        fn bulky_light_box_past_the_cap_is_priced() {
            // 30x30x20 = 18000 cubic inches -> 108.43 lb dimensional, 2 lb actual.
            let pkg = Package::new(32.0).with_dimensions(Dimensions::new(30.0, 30.0, 20.0).unwrap());
            let w = calc().billable_weight(&pkg).unwrap();
            assert_eq!(w.basis, WeightBasis::Dimensional);
            assert!(w.pounds > f64::from(MAX_WEIGHT_LBS));
            assert_eq!(w.actual_lbs, Some(2.0));
        }

        #[test]
        fn cap_checked_on_actual_even_with_dimensions() {
            let pkg =
                Package::new(75.0 * 16.0).with_dimensions(Dimensions::new(30.0, 30.0, 20.0).unwrap());
            let err = calc().billable_weight(&pkg).unwrap_err();
            assert!(matches!(err, ValidationError::Overweight { pounds, .. } if pounds == 75.0));
        }

        #[test]
        fn heavy_bulky_box_uses_actual() {
            let pkg =
                Package::new(40.0 * 16.0).with_dimensions(Dimensions::new(13.0, 13.0, 13.0).unwrap());
            let w = calc().billable_weight(&pkg).unwrap();
            assert_eq!(w.basis, WeightBasis::Actual);
            assert_eq!(w.pounds, 40.0);
        }
    }

    mod missing_weight {
        use super::*;

        #[test]
        fn no_weight_no_dimensions_fails() {
            assert_eq!(
                calc().billable_weight(&Package::without_weight()),
                Err(ValidationError::MissingWeight)
            );
            assert_eq!(
                calc().billable_weight(&Package::new(0.0)),
                Err(ValidationError::MissingWeight)
            );
        }

        #[test]
        fn no_weight_falls_back_to_dimensions() {
            let pkg = Package::without_weight().with_dimensions(Dimensions::new(12.0, 12.0, 12.0).unwrap());
            let w = calc().billable_weight(&pkg).unwrap();
            assert_eq!(w.basis, WeightBasis::Dimensional);
            assert!((w.pounds - 1728.0 / 166.0).abs() < 1e-9);
        }
    }
}
