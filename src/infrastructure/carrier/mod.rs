//! # Carrier Integrations
//!
//! Live rate APIs behind the [`CarrierAdapter`] port.

pub mod error;
pub mod http_client;
pub mod token_cache;
pub mod traits;
pub mod usps;

pub use error::{CarrierError, CarrierResult};
pub use http_client::HttpClient;
pub use token_cache::{AccessToken, DEFAULT_SAFETY_MARGIN_SECS, TokenCache};
pub use traits::{CarrierAdapter, LiveRate, RateRequest};
pub use usps::UspsAdapter;
