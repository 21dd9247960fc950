//! # Domain Services
//!
//! Pure pricing logic with no I/O.
//!
//! - [`WeightCalculator`]: billable weight from actual and dimensional weight
//! - [`ZoneResolver`]: origin/destination ZIP pair to shipping zone
//! - [`ServiceCatalog`]: static per-tier rate tables
//! - [`RateEngine`]: local estimates for one or all tiers

pub mod rate_engine;
pub mod service_catalog;
pub mod weight_calculator;
pub mod zone_resolver;

pub use rate_engine::{PricingContext, RateEngine, sort_by_rate};
pub use service_catalog::{RateComponents, ServiceCatalog, ServiceRates, SizeThreshold};
pub use weight_calculator::{BillableWeight, WeightBasis, WeightCalculator};
pub use zone_resolver::{ZoneResolution, ZoneResolutionWarning, ZoneResolver};
