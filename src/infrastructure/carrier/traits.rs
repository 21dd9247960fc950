//! # Carrier Adapter Trait
//!
//! Port definition for live carrier rate APIs.
//!
//! A [`CarrierAdapter`] turns a [`RateRequest`] into a [`LiveRate`]. It knows
//! nothing about fallback: any error it returns is handled by the caller,
//! which prices the package locally instead.
//!
//! # Examples
//!
//! ```ignore
//! use parcel_rates::infrastructure::carrier::traits::{CarrierAdapter, LiveRate, RateRequest};
//! use parcel_rates::infrastructure::carrier::error::CarrierResult;
//!
//! #[derive(Debug)]
//! struct MyCarrier;
//!
//! #[async_trait::async_trait]
//! impl CarrierAdapter for MyCarrier {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::value_objects::{Dimensions, Money, PostalCode, ServiceTier};
use crate::infrastructure::carrier::error::CarrierResult;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Everything a carrier needs to price one service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateRequest {
    /// Shop origin as configured.
    pub origin_zip: String,
    /// Validated destination.
    pub destination: PostalCode,
    /// Billable weight in pounds.
    pub weight_lbs: f64,
    /// Package dimensions in inches, if known.
    pub dimensions: Option<Dimensions>,
    /// Requested tier.
    pub service: ServiceTier,
}

/// A price returned by a carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveRate {
    /// Tier that was priced.
    pub service: ServiceTier,
    /// Total price charged by the carrier.
    pub total: Money,
    /// Carrier's own description of the rate, if any.
    pub description: Option<String>,
}

/// Trait for live carrier integrations.
#[async_trait]
pub trait CarrierAdapter: Send + Sync + fmt::Debug {
    /// Returns a short carrier name for logs.
    fn carrier_name(&self) -> &str;

    /// Returns the timeout in milliseconds applied to carrier calls.
    fn timeout_ms(&self) -> u64;

    /// Fetches a live rate.
    ///
    /// Implementations handle their own credentials, including one
    /// re-authentication when a cached token is rejected.
    ///
    /// # Errors
    ///
    /// - `CarrierError::Timeout` - Request timed out
    /// - `CarrierError::Authentication` - Credentials rejected
    /// - `CarrierError::InvalidRequest` - Carrier refused the parameters
    /// - `CarrierError::Protocol` - Response could not be understood
    async fn fetch_rate(&self, request: &RateRequest) -> CarrierResult<LiveRate>;

    /// Performs a fresh credential exchange without pricing anything.
    ///
    /// # Errors
    ///
    /// Returns the error from the exchange.
    async fn authenticate(&self) -> CarrierResult<()>;
}
