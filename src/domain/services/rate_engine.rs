//! # Rate Engine
//!
//! Local, deterministic shipping estimates.
//!
//! The engine combines the [`WeightCalculator`], [`ZoneResolver`] and
//! [`ServiceCatalog`] into a [`ShippingQuote`] tagged
//! [`QuoteSource::Estimated`]. It holds no mutable state: the same inputs
//! always produce the same quote.
//!
//! # Algorithm
//!
//! ```text
//! 1. validate destination ZIP, compute billable weight
//! 2. resolve zone (unknown -> zone 9, with a warning)
//! 3. base + weight + zone components from the catalog matrix
//! 4. flat size surcharge if oversize
//! 5. rate = sum of the four components
//! ```
//!
//! # Examples
//!
//! ```
//! use parcel_rates::domain::entities::Package;
//! use parcel_rates::domain::services::rate_engine::RateEngine;
//! use parcel_rates::domain::value_objects::{Money, QuoteSource, ServiceTier};
//!
//! let engine = RateEngine::new("98101");
//! let quote = engine
//!     .estimate(&Package::new(6.0), "98115", ServiceTier::MediaMail)
//!     .unwrap();
//!
//! assert_eq!(quote.rate(), Money::from_cents(413));
//! assert_eq!(quote.source(), QuoteSource::Estimated);
//! ```

use crate::domain::entities::{Package, ShippingQuote};
use crate::domain::errors::ValidationResult;
use crate::domain::services::service_catalog::ServiceCatalog;
use crate::domain::services::weight_calculator::{BillableWeight, WeightCalculator};
use crate::domain::services::zone_resolver::{ZoneResolution, ZoneResolver};
use crate::domain::value_objects::{CostComponent, PostalCode, QuoteSource, ServiceTier};

/// Validated inputs shared by every tier of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingContext {
    /// Validated destination.
    pub destination: PostalCode,
    /// Billable weight of the package.
    pub weight: BillableWeight,
    /// Zone between the shop origin and the destination.
    pub zone: ZoneResolution,
}

/// Local rate estimator.
#[derive(Debug, Clone)]
pub struct RateEngine {
    origin_zip: String,
    catalog: &'static ServiceCatalog,
    weights: WeightCalculator,
    zones: ZoneResolver,
}

impl RateEngine {
    /// Creates an engine shipping from `origin_zip` with the standard catalog.
    ///
    /// The origin is not validated here: a malformed origin prices every
    /// quote at the worst-case zone and attaches a warning.
    #[must_use]
    pub fn new(origin_zip: impl Into<String>) -> Self {
        Self::with_catalog(origin_zip, ServiceCatalog::standard())
    }

    /// Creates an engine with an explicit catalog.
    #[must_use]
    pub fn with_catalog(origin_zip: impl Into<String>, catalog: &'static ServiceCatalog) -> Self {
        Self {
            origin_zip: origin_zip.into(),
            catalog,
            weights: WeightCalculator::new(),
            zones: ZoneResolver::new(),
        }
    }

    /// Returns the configured origin postal code.
    #[inline]
    #[must_use]
    pub fn origin_zip(&self) -> &str {
        &self.origin_zip
    }

    /// Returns the catalog in use.
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &'static ServiceCatalog {
        self.catalog
    }

    /// Validates a request and resolves the parts common to every tier.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for a malformed destination or an
    /// unusable package weight.
    pub fn prepare(&self, package: &Package, destination_zip: &str) -> ValidationResult<PricingContext> {
        let destination = PostalCode::parse(destination_zip)?;
        let weight = self.weights.billable_weight(package)?;
        let zone = self.zones.resolve(&self.origin_zip, destination.as_str());

        if let Some(warning) = &zone.warning {
            tracing::warn!(
                origin = %self.origin_zip,
                destination = %destination,
                "{}",
                warning
            );
        }

        Ok(PricingContext {
            destination,
            weight,
            zone,
        })
    }

    /// Estimates the cost of shipping a package with one service.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for a malformed destination or an
    /// unusable package weight.
    pub fn estimate(
        &self,
        package: &Package,
        destination_zip: &str,
        service: ServiceTier,
    ) -> ValidationResult<ShippingQuote> {
        let ctx = self.prepare(package, destination_zip)?;
        self.estimate_prepared(&ctx, package, service)
    }

    /// Estimates every service, cheapest first.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for a malformed destination or an
    /// unusable package weight.
    pub fn estimate_all(
        &self,
        package: &Package,
        destination_zip: &str,
    ) -> ValidationResult<Vec<ShippingQuote>> {
        let ctx = self.prepare(package, destination_zip)?;
        let mut quotes = ServiceTier::ALL
            .iter()
            .map(|service| self.estimate_prepared(&ctx, package, *service))
            .collect::<ValidationResult<Vec<_>>>()?;
        sort_by_rate(&mut quotes);
        Ok(quotes)
    }

    /// Prices one service from an already validated context.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Overflow` if the components cannot be summed.
    pub fn estimate_prepared(
        &self,
        ctx: &PricingContext,
        package: &Package,
        service: ServiceTier,
    ) -> ValidationResult<ShippingQuote> {
        let zone_number = ctx.zone.zone.pricing_zone();
        let parts = self
            .catalog
            .rate_breakdown(service, ctx.weight.pounds, zone_number);
        let size_surcharge = self.catalog.size_surcharge(service, package.dimensions());

        let mut builder = ShippingQuote::builder(service, QuoteSource::Estimated)
            .line(CostComponent::Base, parts.base)
            .line(CostComponent::WeightSurcharge, parts.weight_adjustment)
            .line(CostComponent::ZoneSurcharge, parts.zone_adjustment)
            .line(CostComponent::SizeSurcharge, size_surcharge)
            .transit_estimate(self.catalog.transit_estimate(service))
            .zone(ctx.zone.zone)
            .billable_weight_lbs(ctx.weight.pounds)
            .distance_miles(ctx.zone.distance_estimate_miles);

        if let Some(warning) = &ctx.zone.warning {
            builder = builder.warning(warning.to_string());
        }

        let quote = builder.build()?;
        tracing::debug!(
            service = %service,
            zone = %quote.zone(),
            weight_lbs = ctx.weight.pounds,
            rate = %quote.rate(),
            "estimated shipping rate"
        );
        Ok(quote)
    }
}

/// Sorts quotes by ascending rate, breaking ties by tier order.
pub fn sort_by_rate(quotes: &mut [ShippingQuote]) {
    quotes.sort_by(|a, b| {
        a.rate()
            .cmp(&b.rate())
            .then_with(|| a.service().cmp(&b.service()))
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::errors::ValidationError;
    use crate::domain::value_objects::{Dimensions, Money, Zone};

    const WEST_COAST: &str = "98101";

    fn engine() -> RateEngine {
        RateEngine::new(WEST_COAST)
    }

    fn book() -> Package {
        Package::new(6.0).with_dimensions(Dimensions::new(7.5, 5.0, 0.8).unwrap())
    }

    fn sum_of_lines(quote: &ShippingQuote) -> Money {
        quote.breakdown().iter().map(|l| l.amount).sum()
    }

    mod scenarios {
        use super::*;

        #[test]
        fn book_media_mail_near_and_far() {
            let near = engine()
                .estimate(&book(), "98115", ServiceTier::MediaMail)
                .unwrap();
            let far = engine()
                .estimate(&book(), "10001", ServiceTier::MediaMail)
                .unwrap();

            assert_eq!(near.zone(), Zone::Known(1));
            assert!(near.rate() < Money::from_cents(500));
            assert!(far.rate() > near.rate());
            assert!(far.rate() < Money::from_cents(500));
            // Same weight bracket: only the zone line differs.
            assert_eq!(
                near.component(CostComponent::WeightSurcharge),
                far.component(CostComponent::WeightSurcharge)
            );
            assert_eq!(near.component(CostComponent::ZoneSurcharge), Money::ZERO);
        }

        #[test]
        fn heavy_box_ground_advantage_stays_reasonable() {
            let pkg = Package::new(160.0).with_dimensions(Dimensions::new(8.0, 10.0, 12.0).unwrap());
            for destination in ["98115", "97001", "80202", "60601", "10001"] {
                let quote = engine()
                    .estimate(&pkg, destination, ServiceTier::GroundAdvantage)
                    .unwrap();
                assert!(quote.rate() < Money::from_cents(3000), "{quote}");
                assert!(
                    quote
                        .breakdown()
                        .iter()
                        .any(|l| l.component == CostComponent::SizeSurcharge)
                );
            }
        }

        #[test]
        fn short_destination_is_rejected() {
            let err = engine()
                .estimate(&book(), "981", ServiceTier::MediaMail)
                .unwrap_err();
            assert!(matches!(err, ValidationError::InvalidPostalCode { .. }));
        }

        #[test]
        fn all_services_strictly_ascending() {
            let quotes = engine().estimate_all(&book(), "60601").unwrap();
            assert_eq!(quotes.len(), 4);
            for pair in quotes.windows(2) {
                if let [a, b] = pair {
                    assert!(a.rate() < b.rate());
                }
            }
        }
    }

    mod breakdown {
        use super::*;

        #[test]
        fn lines_sum_to_rate() {
            let pkg = Package::new(30.0 * 16.0).with_dimensions(Dimensions::new(30.0, 10.0, 10.0).unwrap());
            let quote = engine()
                .estimate(&pkg, "33101", ServiceTier::PriorityMail)
                .unwrap();
            assert_eq!(sum_of_lines(&quote), quote.rate());
            assert_eq!(quote.component(CostComponent::SizeSurcharge), Money::from_cents(700));
        }

        #[test]
        fn bulky_light_box_prices_with_overage() {
            // 2 lb actual, 108.43 lb dimensional.
            let pkg = Package::new(32.0).with_dimensions(Dimensions::new(30.0, 30.0, 20.0).unwrap());
            let quote = engine()
                .estimate(&pkg, "98115", ServiceTier::GroundAdvantage)
                .unwrap();
            let at_cap = engine()
                .estimate(&Package::new(70.0 * 16.0), "98115", ServiceTier::GroundAdvantage)
                .unwrap();
            assert!(quote.billable_weight_lbs() > 100.0);
            assert!(quote.component(CostComponent::WeightSurcharge) > at_cap.component(CostComponent::WeightSurcharge));
            assert_eq!(sum_of_lines(&quote), quote.rate());
        }

        #[test]
        fn oversize_is_flat_increment() {
            let small = Package::new(48.0).with_dimensions(Dimensions::new(10.0, 6.0, 4.0).unwrap());
            let long = Package::new(48.0).with_dimensions(Dimensions::new(30.0, 6.0, 4.0).unwrap());
            let a = engine().estimate(&small, "30301", ServiceTier::GroundAdvantage).unwrap();
            let b = engine().estimate(&long, "30301", ServiceTier::GroundAdvantage).unwrap();
            assert_eq!(b.rate(), a.rate().checked_add(Money::from_cents(450)).unwrap());
        }
    }

    mod zone_fallback {
        use super::*;

        #[test]
        fn malformed_origin_prices_worst_case_with_warning() {
            let engine = RateEngine::new("WA");
            let quote = engine
                .estimate(&book(), "98115", ServiceTier::MediaMail)
                .unwrap();
            let worst = RateEngine::new("98101")
                .estimate(&book(), "02134", ServiceTier::MediaMail)
                .unwrap();

            assert_eq!(quote.zone(), Zone::Unknown);
            assert_eq!(quote.rate(), worst.rate());
            assert_eq!(quote.warnings().len(), 1);
            assert!(quote.warnings()[0].contains("origin"));
        }
    }

    #[test]
    fn estimate_is_idempotent() {
        let a = engine().estimate(&book(), "75201", ServiceTier::Express).unwrap();
        let b = engine().estimate(&book(), "75201", ServiceTier::Express).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_weight_without_dimensions_fails() {
        let err = engine()
            .estimate(&Package::without_weight(), "75201", ServiceTier::Express)
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingWeight);
    }
}
