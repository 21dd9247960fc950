//! # parcel-rates
//!
//! Shipping-rate estimation for small e-commerce shops.
//!
//! Given a package, a destination postal code and a service tier, the crate
//! returns a [`ShippingQuote`] with a four-line cost breakdown. Quotes come
//! from a live carrier API when credentials are configured and from a local
//! zone and weight based estimator otherwise, or whenever the carrier fails.
//!
//! # Layers
//!
//! - [`domain`]: value objects, entities and the pure rate engine
//! - [`infrastructure`]: carrier adapters (HTTP, OAuth token cache, USPS)
//! - [`application`]: [`ShippingService`] and the live/fallback client
//! - [`config`]: file and environment configuration
//! - [`telemetry`]: `tracing` subscriber setup
//!
//! # Examples
//!
//! ```
//! use parcel_rates::{Package, RateEngine, ServiceTier};
//!
//! let engine = RateEngine::new("98101");
//! let quotes = engine.estimate_all(&Package::new(24.0), "60601").unwrap();
//! assert_eq!(quotes.len(), ServiceTier::ALL.len());
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;

pub use application::services::{ConnectionStatus, LiveRateClient, ShippingService};
pub use crate::config::{ConfigError, LiveApiConfig, ShippingConfig};
pub use domain::entities::{Package, ShippingQuote};
pub use domain::errors::ValidationError;
pub use domain::services::RateEngine;
pub use domain::value_objects::{Dimensions, Money, QuoteSource, ServiceTier, ShippingOption};
pub use infrastructure::carrier::{CarrierAdapter, CarrierError};
