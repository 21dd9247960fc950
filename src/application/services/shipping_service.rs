//! # Shipping Service
//!
//! The entry point used by checkout and the rates endpoint.
//!
//! Packages declared [`ShippingOption::Flat`] or [`ShippingOption::Free`]
//! never reach the rate engine: they get a single quote for the declared
//! amount, tagged [`QuoteSource::Fixed`]. Calculated packages are priced
//! through the [`LiveRateClient`], every tier concurrently.
//!
//! # Examples
//!
//! ```
//! use parcel_rates::application::services::ShippingService;
//! use parcel_rates::config::ShippingConfig;
//! use parcel_rates::domain::entities::Package;
//!
//! # tokio_test::block_on(async {
//! let service = ShippingService::from_config(&ShippingConfig::new("98101")).unwrap();
//! let options = service
//!     .get_shipping_options(&Package::new(6.0), "10001")
//!     .await
//!     .unwrap();
//! assert_eq!(options.len(), 4);
//! # });
//! ```

use crate::application::services::live_rate_client::{ConnectionStatus, LiveRateClient};
use crate::config::ShippingConfig;
use crate::domain::entities::{Package, ShippingQuote};
use crate::domain::errors::ValidationResult;
use crate::domain::services::{RateEngine, sort_by_rate};
use crate::domain::value_objects::{
    CostComponent, Money, PostalCode, QuoteSource, ServiceTier, ShippingOption,
};
use crate::infrastructure::carrier::{CarrierResult, UspsAdapter};
use futures::future::join_all;
use std::sync::Arc;

/// Tier reported for flat and free shipping.
pub const FIXED_RATE_SERVICE: ServiceTier = ServiceTier::GroundAdvantage;

/// Shipping quotes for checkout.
#[derive(Debug, Clone)]
pub struct ShippingService {
    client: LiveRateClient,
}

impl ShippingService {
    /// Wraps an existing client.
    #[must_use]
    pub fn new(client: LiveRateClient) -> Self {
        Self { client }
    }

    /// Builds the service described by `config`.
    ///
    /// Without a `live_api` section the service runs estimate-only.
    ///
    /// # Errors
    ///
    /// Returns `CarrierError::Internal` if the HTTP client cannot be built.
    pub fn from_config(config: &ShippingConfig) -> CarrierResult<Self> {
        let engine = RateEngine::new(config.origin_zip.clone());
        let client = match &config.live_api {
            Some(live) => {
                tracing::info!(base_url = %live.base_url, "live carrier rates enabled");
                LiveRateClient::new(engine, Arc::new(UspsAdapter::new(live)?))
            }
            None => {
                tracing::info!("no carrier credentials, estimate-only mode");
                LiveRateClient::estimate_only(engine)
            }
        };
        Ok(Self::new(client))
    }

    /// Returns the underlying client.
    #[inline]
    #[must_use]
    pub fn client(&self) -> &LiveRateClient {
        &self.client
    }

    /// Returns every available option, cheapest first.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for a malformed destination or an
    /// unusable package weight.
    pub async fn get_shipping_options(
        &self,
        package: &Package,
        destination_zip: &str,
    ) -> ValidationResult<Vec<ShippingQuote>> {
        if !package.is_calculated() {
            return fixed_quote(package, destination_zip, FIXED_RATE_SERVICE).map(|q| vec![q]);
        }

        let ctx = self.client.engine().prepare(package, destination_zip)?;
        let quotes = join_all(
            ServiceTier::ALL
                .iter()
                .map(|service| self.client.quote_prepared(&ctx, package, *service)),
        )
        .await;

        let mut quotes = quotes.into_iter().collect::<ValidationResult<Vec<_>>>()?;
        sort_by_rate(&mut quotes);
        Ok(quotes)
    }

    /// Quotes a single service.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for a malformed destination or an
    /// unusable package weight.
    pub async fn calculate_shipping(
        &self,
        package: &Package,
        destination_zip: &str,
        service: ServiceTier,
    ) -> ValidationResult<ShippingQuote> {
        if !package.is_calculated() {
            return fixed_quote(package, destination_zip, service);
        }
        self.client.quote(package, destination_zip, service).await
    }

    /// Checks the carrier credentials.
    pub async fn test_connection(&self) -> ConnectionStatus {
        self.client.test_connection().await
    }
}

/// Declared flat or free shipping; the destination is still validated.
fn fixed_quote(
    package: &Package,
    destination_zip: &str,
    service: ServiceTier,
) -> ValidationResult<ShippingQuote> {
    PostalCode::parse(destination_zip)?;
    let amount = match package.shipping_option() {
        ShippingOption::Free => Money::ZERO,
        _ => package.flat_rate(),
    };
    ShippingQuote::builder(service, QuoteSource::Fixed)
        .line(CostComponent::Base, amount)
        .build()
}
