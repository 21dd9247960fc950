//! # Zone Resolver
//!
//! Maps an origin/destination ZIP pair to a shipping zone.
//!
//! Zones are banded by the absolute distance between the two 3-digit
//! sectional-center prefixes. The prefix numbering runs roughly east to west
//! across the country, so the delta is a coarse but monotonic proxy for
//! distance, and the result is symmetric in its arguments.
//!
//! Either code failing to parse yields [`Zone::Unknown`] together with a
//! [`ZoneResolutionWarning`]; it is the engine's job to price that
//! conservatively.
//!
//! # Examples
//!
//! ```
//! use parcel_rates::domain::services::zone_resolver::ZoneResolver;
//! use parcel_rates::domain::value_objects::Zone;
//!
//! let resolver = ZoneResolver::new();
//! assert_eq!(resolver.resolve("98101", "98115").zone, Zone::Known(1));
//! assert_eq!(resolver.resolve("98101", "10001").zone, Zone::Known(9));
//! assert_eq!(resolver.resolve("98101", "1000").zone, Zone::Unknown);
//! ```

use crate::domain::value_objects::{PostalCode, Zone};
use serde::Serialize;
use std::fmt;

/// One row of the zone table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ZoneBand {
    max_prefix_delta: u16,
    zone: u8,
    max_miles: Option<u32>,
}

const fn band(max_prefix_delta: u16, zone: u8, max_miles: Option<u32>) -> ZoneBand {
    ZoneBand {
        max_prefix_delta,
        zone,
        max_miles,
    }
}

/// Distance bands, nearest first. The last band is open-ended.
const ZONE_TABLE: [ZoneBand; 9] = [
    band(0, 1, Some(50)),
    band(10, 2, Some(150)),
    band(50, 3, Some(300)),
    band(100, 4, Some(600)),
    band(200, 5, Some(1000)),
    band(350, 6, Some(1400)),
    band(550, 7, Some(1800)),
    band(800, 8, Some(2600)),
    band(u16::MAX, 9, None),
];

/// Raised when a postal code cannot be resolved and the worst-case zone is
/// assumed instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneResolutionWarning {
    /// Which side failed: `"origin"` or `"destination"`.
    pub field: &'static str,
    /// The input that failed to parse.
    pub value: String,
}

impl fmt::Display for ZoneResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} postal code '{}' could not be resolved; priced at worst-case zone {}",
            self.field,
            self.value,
            Zone::WORST_CASE
        )
    }
}

/// Outcome of a zone lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneResolution {
    /// The resolved zone, or `Unknown`.
    pub zone: Zone,
    /// Upper bound of the band's distance in miles, when bounded.
    pub distance_estimate_miles: Option<u32>,
    /// Set when resolution failed.
    pub warning: Option<ZoneResolutionWarning>,
}

/// Stateless zone lookup over the static band table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneResolver;

impl ZoneResolver {
    /// Creates a resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolves the zone between two raw postal codes.
    #[must_use]
    pub fn resolve(&self, origin: &str, destination: &str) -> ZoneResolution {
        let origin_code = match PostalCode::parse(origin) {
            Ok(code) => code,
            Err(_) => return unresolved("origin", origin),
        };
        let destination_code = match PostalCode::parse(destination) {
            Ok(code) => code,
            Err(_) => return unresolved("destination", destination),
        };
        self.resolve_codes(&origin_code, &destination_code)
    }

    /// Resolves the zone between two validated postal codes.
    #[must_use]
    pub fn resolve_codes(&self, origin: &PostalCode, destination: &PostalCode) -> ZoneResolution {
        let delta = origin.prefix().abs_diff(destination.prefix());
        let matched = ZONE_TABLE
            .iter()
            .find(|row| delta <= row.max_prefix_delta)
            .copied()
            .unwrap_or(band(u16::MAX, Zone::WORST_CASE, None));

        ZoneResolution {
            zone: Zone::new(matched.zone),
            distance_estimate_miles: matched.max_miles,
            warning: None,
        }
    }
}

fn unresolved(field: &'static str, value: &str) -> ZoneResolution {
    ZoneResolution {
        zone: Zone::Unknown,
        distance_estimate_miles: None,
        warning: Some(ZoneResolutionWarning {
            field,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn zone_of(origin: &str, destination: &str) -> Zone {
        ZoneResolver::new().resolve(origin, destination).zone
    }

    #[test]
    fn same_prefix_is_local() {
        assert_eq!(zone_of("94107", "94110"), Zone::Known(1));
    }

    #[test]
    fn band_edges() {
        // 981 vs 971 is a delta of exactly 10.
        assert_eq!(zone_of("98101", "97101"), Zone::Known(2));
        assert_eq!(zone_of("98101", "97001"), Zone::Known(3));
        assert_eq!(zone_of("98101", "88101"), Zone::Known(4));
        assert_eq!(zone_of("98101", "10001"), Zone::Known(9));
    }

    #[test]
    fn symmetric() {
        let pairs = [("98101", "30301"), ("02134", "60601"), ("75201", "75202")];
        for (a, b) in pairs {
            assert_eq!(zone_of(a, b), zone_of(b, a));
        }
    }

    #[test]
    fn monotonic_in_prefix_distance() {
        let resolver = ZoneResolver::new();
        let mut last = 0;
        for prefix in (0..=999u16).rev() {
            let dest = format!("{prefix:03}01");
            let zone = resolver.resolve("99901", &dest).zone.pricing_zone();
            assert!(zone >= last, "zone decreased at prefix {prefix}");
            last = zone;
        }
    }

    #[test]
    fn malformed_code_is_unknown_with_warning() {
        let res = ZoneResolver::new().resolve("9810", "10001");
        assert_eq!(res.zone, Zone::Unknown);
        let warning = res.warning.unwrap();
        assert_eq!(warning.field, "origin");
        assert!(warning.to_string().contains("worst-case zone 9"));
    }

    #[test]
    fn distance_estimate_follows_band() {
        let res = ZoneResolver::new().resolve("98101", "98199");
        assert_eq!(res.distance_estimate_miles, Some(50));
        let far = ZoneResolver::new().resolve("98101", "02134");
        assert_eq!(far.distance_estimate_miles, None);
    }
}
