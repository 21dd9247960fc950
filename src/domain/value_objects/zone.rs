//! # Shipping Zone
//!
//! Discrete distance tier between origin and destination.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A shipping zone: 1 (local) through 9 (farthest), or unknown.
///
/// `Unknown` is a sentinel for unresolvable addresses. Pricing treats it as
/// [`Zone::WORST_CASE`] via [`Zone::pricing_zone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// A resolved zone number in `1..=9`.
    Known(u8),
    /// The zone could not be determined.
    Unknown,
}

impl Zone {
    /// Nearest zone.
    pub const MIN: u8 = 1;
    /// Farthest zone.
    pub const MAX: u8 = 9;
    /// Zone used for conservative pricing when resolution fails.
    pub const WORST_CASE: u8 = Self::MAX;

    /// Creates a known zone, clamping into `1..=9`.
    #[must_use]
    pub fn new(number: u8) -> Self {
        Self::Known(number.clamp(Self::MIN, Self::MAX))
    }

    /// Returns the zone number used for rate lookup.
    #[inline]
    #[must_use]
    pub fn pricing_zone(&self) -> u8 {
        match self {
            Self::Known(n) => *n,
            Self::Unknown => Self::WORST_CASE,
        }
    }

    /// Returns true if the zone was resolved.
    #[inline]
    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Iterates every known zone, nearest first.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self::Known)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(n) => write!(f, "zone {n}"),
            Self::Unknown => write!(f, "zone unknown"),
        }
    }
}
