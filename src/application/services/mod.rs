//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! - [`ShippingService`]: options, single quotes and connection tests
//! - [`LiveRateClient`]: carrier quotes with local fallback

pub mod live_rate_client;
pub mod shipping_service;

pub use live_rate_client::{ConnectionStatus, LiveRateClient};
pub use shipping_service::{FIXED_RATE_SERVICE, ShippingService};
