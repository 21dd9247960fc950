//! # Domain Enums
//!
//! Enumeration types for shipping concepts.
//!
//! - [`ServiceTier`] - Carrier products that can be quoted
//! - [`ShippingOption`] - How a product declares its shipping cost
//! - [`QuoteSource`] - Where a quote's price came from
//! - [`CostComponent`] - Named lines of a quote breakdown
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display` and Serde traits; those read from text also implement `FromStr`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an enum from text fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEnumError {
    /// The value is not a recognized variant.
    #[error("invalid {0} value: '{1}'")]
    InvalidValue(&'static str, String),
}

/// Carrier service tier.
///
/// Tiers are listed cheapest-first, which is also their declaration order.
///
/// # Examples
///
/// ```
/// use parcel_rates::domain::value_objects::enums::ServiceTier;
///
/// let tier: ServiceTier = "ground_advantage".parse().unwrap();
/// assert_eq!(tier, ServiceTier::GroundAdvantage);
/// assert_eq!(tier.mail_class(), "USPS_GROUND_ADVANTAGE");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceTier {
    /// Economy rate restricted to books and media.
    MediaMail,
    /// Standard ground parcel service.
    GroundAdvantage,
    /// Expedited 1-3 day service.
    PriorityMail,
    /// Overnight to 2-day guaranteed service.
    Express,
}

impl ServiceTier {
    /// Every tier, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::MediaMail,
        Self::GroundAdvantage,
        Self::PriorityMail,
        Self::Express,
    ];

    /// Returns the customer-facing service name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::MediaMail => "USPS Media Mail",
            Self::GroundAdvantage => "USPS Ground Advantage",
            Self::PriorityMail => "USPS Priority Mail",
            Self::Express => "USPS Priority Mail Express",
        }
    }

    /// Returns the carrier API `mailClass` code.
    #[must_use]
    pub const fn mail_class(self) -> &'static str {
        match self {
            Self::MediaMail => "MEDIA_MAIL",
            Self::GroundAdvantage => "USPS_GROUND_ADVANTAGE",
            Self::PriorityMail => "PRIORITY_MAIL",
            Self::Express => "PRIORITY_MAIL_EXPRESS",
        }
    }
}

impl fmt::Display for ServiceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ServiceTier {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_uppercase();
        match normalized.as_str() {
            "MEDIAMAIL" | "MEDIA" => Ok(Self::MediaMail),
            "GROUNDADVANTAGE" | "GROUND" | "USPSGROUNDADVANTAGE" => Ok(Self::GroundAdvantage),
            "PRIORITYMAIL" | "PRIORITY" => Ok(Self::PriorityMail),
            "EXPRESS" | "PRIORITYMAILEXPRESS" => Ok(Self::Express),
            _ => Err(ParseEnumError::InvalidValue("ServiceTier", s.to_string())),
        }
    }
}

/// How a product declares its shipping cost.
///
/// Only [`ShippingOption::Calculated`] invokes the rate engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingOption {
    /// Priced by the rate engine or live API.
    #[default]
    Calculated,
    /// A fixed amount stored with the product.
    Flat,
    /// Ships at no charge.
    Free,
}

impl fmt::Display for ShippingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Calculated => write!(f, "calculated"),
            Self::Flat => write!(f, "flat"),
            Self::Free => write!(f, "free"),
        }
    }
}

impl FromStr for ShippingOption {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "calculated" => Ok(Self::Calculated),
            "flat" => Ok(Self::Flat),
            "free" => Ok(Self::Free),
            _ => Err(ParseEnumError::InvalidValue("ShippingOption", s.to_string())),
        }
    }
}

/// Origin of a quote's price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteSource {
    /// Computed locally from the rate tables.
    Estimated,
    /// Returned by the carrier's rate API.
    #[serde(rename = "LIVE_API")]
    LiveApi,
    /// Declared flat or free by the product; no pricing was performed.
    Fixed,
}

impl QuoteSource {
    /// Returns true if the price is authoritative carrier pricing.
    #[inline]
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::LiveApi)
    }
}

impl fmt::Display for QuoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Estimated => write!(f, "ESTIMATED"),
            Self::LiveApi => write!(f, "LIVE_API"),
            Self::Fixed => write!(f, "FIXED"),
        }
    }
}

/// A named line of a quote breakdown.
///
/// Declaration order is breakdown order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostComponent {
    /// Lightest-bracket, nearest-zone rate.
    Base,
    /// Extra cost for a heavier weight bracket, including overage.
    WeightSurcharge,
    /// Extra cost for distance.
    ZoneSurcharge,
    /// Flat oversize increment.
    SizeSurcharge,
}

impl CostComponent {
    /// Every component, in breakdown order.
    pub const ALL: [Self; 4] = [
        Self::Base,
        Self::WeightSurcharge,
        Self::ZoneSurcharge,
        Self::SizeSurcharge,
    ];
}

impl fmt::Display for CostComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::WeightSurcharge => write!(f, "weight_surcharge"),
            Self::ZoneSurcharge => write!(f, "zone_surcharge"),
            Self::SizeSurcharge => write!(f, "size_surcharge"),
        }
    }
}
