//! # Shipping Quote Entity
//!
//! The priced result handed back to checkout and the AJAX quote endpoint.
//!
//! A [`ShippingQuote`] is immutable once built. Its rate is never supplied
//! directly: it is the sum of the breakdown lines, so the breakdown always
//! accounts for the full price. Every [`CostComponent`] appears in the
//! breakdown, in declaration order, even when its amount is zero.
//!
//! # Examples
//!
//! ```
//! use parcel_rates::domain::entities::quote::ShippingQuoteBuilder;
//! use parcel_rates::domain::value_objects::{CostComponent, Money, QuoteSource, ServiceTier, Zone};
//!
//! let quote = ShippingQuoteBuilder::new(ServiceTier::MediaMail, QuoteSource::Estimated)
//!     .line(CostComponent::Base, Money::from_cents(413))
//!     .line(CostComponent::ZoneSurcharge, Money::from_cents(20))
//!     .zone(Zone::new(5))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(quote.rate(), Money::from_cents(433));
//! assert_eq!(quote.breakdown().len(), 4);
//! ```

use crate::domain::errors::{ValidationError, ValidationResult};
use crate::domain::value_objects::{CostComponent, Money, QuoteSource, ServiceTier, Zone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nominal delivery window in business days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitEstimate {
    /// Fastest expected delivery.
    pub min_days: u8,
    /// Slowest expected delivery.
    pub max_days: u8,
}

impl TransitEstimate {
    /// Creates a transit window, ordering the bounds.
    #[must_use]
    pub const fn new(min_days: u8, max_days: u8) -> Self {
        if min_days <= max_days {
            Self { min_days, max_days }
        } else {
            Self {
                min_days: max_days,
                max_days: min_days,
            }
        }
    }
}

impl fmt::Display for TransitEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min_days, self.max_days) {
            (1, 1) => write!(f, "1 day"),
            (min, max) if min == max => write!(f, "{min} days"),
            (min, max) => write!(f, "{min}-{max} days"),
        }
    }
}

/// One named component of a quote's price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownLine {
    /// Which component this is.
    pub component: CostComponent,
    /// Its amount.
    pub amount: Money,
}

/// A priced shipping option.
///
/// Serialize-only: quotes are constructed through [`ShippingQuoteBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingQuote {
    service: ServiceTier,
    service_name: String,
    rate: Money,
    transit_estimate: TransitEstimate,
    source: QuoteSource,
    breakdown: Vec<BreakdownLine>,
    zone: Zone,
    billable_weight_lbs: f64,
    distance_miles: Option<u32>,
    warnings: Vec<String>,
}

impl ShippingQuote {
    /// Starts building a quote.
    #[must_use]
    pub fn builder(service: ServiceTier, source: QuoteSource) -> ShippingQuoteBuilder {
        ShippingQuoteBuilder::new(service, source)
    }

    /// Returns the service tier.
    #[inline]
    #[must_use]
    pub fn service(&self) -> ServiceTier {
        self.service
    }

    /// Returns the customer-facing service name.
    #[inline]
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns the total price.
    #[inline]
    #[must_use]
    pub fn rate(&self) -> Money {
        self.rate
    }

    /// Returns the delivery window.
    #[inline]
    #[must_use]
    pub fn transit_estimate(&self) -> TransitEstimate {
        self.transit_estimate
    }

    /// Returns where the price came from.
    #[inline]
    #[must_use]
    pub fn source(&self) -> QuoteSource {
        self.source
    }

    /// Returns every breakdown line in order.
    #[inline]
    #[must_use]
    pub fn breakdown(&self) -> &[BreakdownLine] {
        &self.breakdown
    }

    /// Returns the amount of one breakdown component.
    #[must_use]
    pub fn component(&self, component: CostComponent) -> Money {
        self.breakdown
            .iter()
            .find(|line| line.component == component)
            .map_or(Money::ZERO, |line| line.amount)
    }

    /// Returns the zone the quote was priced for.
    #[inline]
    #[must_use]
    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Returns the billable weight in pounds.
    #[inline]
    #[must_use]
    pub fn billable_weight_lbs(&self) -> f64 {
        self.billable_weight_lbs
    }

    /// Returns the approximate shipping distance, when known.
    #[inline]
    #[must_use]
    pub fn distance_miles(&self) -> Option<u32> {
        self.distance_miles
    }

    /// Returns non-fatal warnings raised while pricing.
    #[inline]
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl fmt::Display for ShippingQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}, {})",
            self.service_name, self.rate, self.transit_estimate, self.source
        )
    }
}

/// Builder for [`ShippingQuote`].
#[derive(Debug, Clone)]
#[must_use]
pub struct ShippingQuoteBuilder {
    service: ServiceTier,
    source: QuoteSource,
    amounts: [Money; 4],
    transit_estimate: Option<TransitEstimate>,
    zone: Zone,
    billable_weight_lbs: f64,
    distance_miles: Option<u32>,
    warnings: Vec<String>,
}

impl ShippingQuoteBuilder {
    /// Creates a builder with every component at zero.
    pub fn new(service: ServiceTier, source: QuoteSource) -> Self {
        Self {
            service,
            source,
            amounts: [Money::ZERO; 4],
            transit_estimate: None,
            zone: Zone::Unknown,
            billable_weight_lbs: 0.0,
            distance_miles: None,
            warnings: Vec::new(),
        }
    }

    /// Sets the amount of a breakdown component, replacing any earlier value.
    pub fn line(mut self, component: CostComponent, amount: Money) -> Self {
        let slot = CostComponent::ALL
            .iter()
            .position(|c| *c == component)
            .and_then(|idx| self.amounts.get_mut(idx));
        if let Some(slot) = slot {
            *slot = amount;
        }
        self
    }

    /// Sets the delivery window.
    pub fn transit_estimate(mut self, estimate: TransitEstimate) -> Self {
        self.transit_estimate = Some(estimate);
        self
    }

    /// Sets the priced zone.
    pub fn zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    /// Sets the billable weight.
    pub fn billable_weight_lbs(mut self, pounds: f64) -> Self {
        self.billable_weight_lbs = pounds;
        self
    }

    /// Sets the approximate distance.
    pub fn distance_miles(mut self, miles: Option<u32>) -> Self {
        self.distance_miles = miles;
        self
    }

    /// Appends a warning.
    pub fn warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Builds the quote, summing the breakdown into the rate.
    ///
    /// Without an explicit transit window the tier's nominal one is used.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Overflow` if the components cannot be summed.
    pub fn build(self) -> ValidationResult<ShippingQuote> {
        let rate = self
            .amounts
            .iter()
            .try_fold(Money::ZERO, |acc, amount| acc.checked_add(*amount))
            .ok_or(ValidationError::Overflow)?;

        let breakdown = CostComponent::ALL
            .iter()
            .zip(self.amounts.iter())
            .map(|(component, amount)| BreakdownLine {
                component: *component,
                amount: *amount,
            })
            .collect();

        Ok(ShippingQuote {
            service: self.service,
            service_name: self.service.display_name().to_string(),
            rate,
            transit_estimate: self
                .transit_estimate
                .unwrap_or_else(|| nominal_transit(self.service)),
            source: self.source,
            breakdown,
            zone: self.zone,
            billable_weight_lbs: self.billable_weight_lbs,
            distance_miles: self.distance_miles,
            warnings: self.warnings,
        })
    }
}

/// Returns the advertised delivery window for a tier.
#[must_use]
pub const fn nominal_transit(service: ServiceTier) -> TransitEstimate {
    match service {
        ServiceTier::MediaMail => TransitEstimate::new(2, 8),
        ServiceTier::GroundAdvantage => TransitEstimate::new(2, 5),
        ServiceTier::PriorityMail => TransitEstimate::new(1, 3),
        ServiceTier::Express => TransitEstimate::new(1, 2),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod builder {
        use super::*;

        #[test]
        fn rate_is_sum_of_lines() {
            let quote = ShippingQuote::builder(ServiceTier::PriorityMail, QuoteSource::Estimated)
                .line(CostComponent::Base, Money::from_cents(905))
                .line(CostComponent::WeightSurcharge, Money::from_cents(335))
                .line(CostComponent::ZoneSurcharge, Money::from_cents(120))
                .line(CostComponent::SizeSurcharge, Money::from_cents(700))
                .build()
                .unwrap();
            assert_eq!(quote.rate(), Money::from_cents(2060));
            let total: Money = quote.breakdown().iter().map(|l| l.amount).sum();
            assert_eq!(total, quote.rate());
        }

        #[test]
        fn every_component_present_in_order() {
            let quote = ShippingQuote::builder(ServiceTier::MediaMail, QuoteSource::Estimated)
                .line(CostComponent::SizeSurcharge, Money::from_cents(400))
                .build()
                .unwrap();
            let components: Vec<CostComponent> =
                quote.breakdown().iter().map(|l| l.component).collect();
            assert_eq!(components, CostComponent::ALL.to_vec());
            assert_eq!(quote.component(CostComponent::Base), Money::ZERO);
            assert_eq!(quote.component(CostComponent::SizeSurcharge), Money::from_cents(400));
        }

        #[test]
        fn line_replaces_previous_value() {
            let quote = ShippingQuote::builder(ServiceTier::MediaMail, QuoteSource::Estimated)
                .line(CostComponent::Base, Money::from_cents(100))
                .line(CostComponent::Base, Money::from_cents(200))
                .build()
                .unwrap();
            assert_eq!(quote.rate(), Money::from_cents(200));
        }

        #[test]
        fn default_transit_is_nominal() {
            let quote = ShippingQuote::builder(ServiceTier::MediaMail, QuoteSource::Estimated)
                .build()
                .unwrap();
            assert_eq!(quote.transit_estimate().to_string(), "2-8 days");
            assert_eq!(quote.service_name(), "USPS Media Mail");
        }
    }

    mod transit {
        use super::*;

        #[test]
        fn display() {
            assert_eq!(TransitEstimate::new(1, 1).to_string(), "1 day");
            assert_eq!(TransitEstimate::new(3, 3).to_string(), "3 days");
            assert_eq!(TransitEstimate::new(5, 2).to_string(), "2-5 days");
        }
    }

    #[test]
    fn serializes_for_ajax_consumers() {
        let quote = ShippingQuote::builder(ServiceTier::GroundAdvantage, QuoteSource::LiveApi)
            .line(CostComponent::Base, Money::from_cents(1234))
            .zone(Zone::new(4))
            .build()
            .unwrap();
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["service_name"], "USPS Ground Advantage");
        assert_eq!(json["source"], "LIVE_API");
        assert_eq!(json["rate"], "12.34");
        assert_eq!(json["breakdown"].as_array().unwrap().len(), 4);
    }
}
