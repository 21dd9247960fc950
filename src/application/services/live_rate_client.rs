//! # Live Rate Client
//!
//! Carrier-backed quotes with a local safety net.
//!
//! Input is validated by the [`RateEngine`] before any network call, so a
//! malformed destination or unusable weight is reported to the caller
//! exactly as it would be without a carrier. After that point nothing is
//! surfaced: a timeout, rejected credentials, a bad response or a missing
//! carrier all end in the local estimate, tagged [`QuoteSource::Estimated`].

use crate::domain::entities::{Package, ShippingQuote};
use crate::domain::errors::ValidationResult;
use crate::domain::services::{PricingContext, RateEngine};
use crate::domain::value_objects::{CostComponent, QuoteSource, ServiceTier};
use crate::infrastructure::carrier::{CarrierAdapter, CarrierError, CarrierResult, LiveRate, RateRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Outbound calls one live attempt may make: token, search, re-auth, search.
const MAX_CALLS_PER_ATTEMPT: u64 = 4;

/// Outcome of a connection test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    /// Whether the carrier accepted the credentials.
    pub ok: bool,
    /// Human-readable detail.
    pub message: String,
}

impl ConnectionStatus {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Quotes from a live carrier, falling back to the local engine.
#[derive(Debug, Clone)]
pub struct LiveRateClient {
    engine: RateEngine,
    adapter: Option<Arc<dyn CarrierAdapter>>,
}

impl LiveRateClient {
    /// Creates a client backed by `adapter`.
    #[must_use]
    pub fn new(engine: RateEngine, adapter: Arc<dyn CarrierAdapter>) -> Self {
        Self {
            engine,
            adapter: Some(adapter),
        }
    }

    /// Creates a client that never calls a carrier.
    #[must_use]
    pub fn estimate_only(engine: RateEngine) -> Self {
        Self {
            engine,
            adapter: None,
        }
    }

    /// Returns the local engine.
    #[inline]
    #[must_use]
    pub fn engine(&self) -> &RateEngine {
        &self.engine
    }

    /// Returns true when a carrier is configured.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.adapter.is_some()
    }

    /// Quotes one service.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for bad input. Carrier failures are never
    /// returned.
    pub async fn quote(
        &self,
        package: &Package,
        destination_zip: &str,
        service: ServiceTier,
    ) -> ValidationResult<ShippingQuote> {
        let ctx = self.engine.prepare(package, destination_zip)?;
        self.quote_prepared(&ctx, package, service).await
    }

    /// Quotes one service from an already validated context.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Overflow` if a quote cannot be assembled.
    pub async fn quote_prepared(
        &self,
        ctx: &PricingContext,
        package: &Package,
        service: ServiceTier,
    ) -> ValidationResult<ShippingQuote> {
        let Some(adapter) = &self.adapter else {
            return self.engine.estimate_prepared(ctx, package, service);
        };

        let request = RateRequest {
            origin_zip: self.engine.origin_zip().to_string(),
            destination: ctx.destination.clone(),
            weight_lbs: ctx.weight.pounds,
            dimensions: package.dimensions().copied(),
            service,
        };

        match fetch_with_deadline(adapter.as_ref(), &request).await {
            Ok(rate) => {
                tracing::debug!(
                    carrier = adapter.carrier_name(),
                    service = %service,
                    rate = %rate.total,
                    "live rate received"
                );
                self.live_quote(ctx, rate)
            }
            Err(e) => {
                tracing::warn!(
                    carrier = adapter.carrier_name(),
                    service = %service,
                    error = %e,
                    "live rate unavailable, falling back to estimate"
                );
                self.engine.estimate_prepared(ctx, package, service)
            }
        }
    }

    /// Forces a fresh credential exchange and reports the outcome.
    pub async fn test_connection(&self) -> ConnectionStatus {
        let Some(adapter) = &self.adapter else {
            return ConnectionStatus::failure(CarrierError::NotConfigured.to_string());
        };

        let deadline = Duration::from_millis(adapter.timeout_ms());
        let outcome = match timeout(deadline, adapter.authenticate()).await {
            Ok(result) => result,
            Err(_) => Err(CarrierError::timeout_with_duration(
                "authentication timed out",
                adapter.timeout_ms(),
            )),
        };

        match outcome {
            Ok(()) => {
                tracing::info!(carrier = adapter.carrier_name(), "carrier connection ok");
                ConnectionStatus::success(format!("authenticated with {}", adapter.carrier_name()))
            }
            Err(e) => {
                tracing::warn!(carrier = adapter.carrier_name(), error = %e, "carrier connection failed");
                ConnectionStatus::failure(e.to_string())
            }
        }
    }

    fn live_quote(&self, ctx: &PricingContext, rate: LiveRate) -> ValidationResult<ShippingQuote> {
        let mut builder = ShippingQuote::builder(rate.service, QuoteSource::LiveApi)
            .line(CostComponent::Base, rate.total)
            .transit_estimate(self.engine.catalog().transit_estimate(rate.service))
            .zone(ctx.zone.zone)
            .billable_weight_lbs(ctx.weight.pounds)
            .distance_miles(ctx.zone.distance_estimate_miles);
        if let Some(warning) = &ctx.zone.warning {
            builder = builder.warning(warning.to_string());
        }
        builder.build()
    }
}

async fn fetch_with_deadline(
    adapter: &dyn CarrierAdapter,
    request: &RateRequest,
) -> CarrierResult<LiveRate> {
    let budget_ms = adapter.timeout_ms().saturating_mul(MAX_CALLS_PER_ATTEMPT);
    match timeout(Duration::from_millis(budget_ms), adapter.fetch_rate(request)).await {
        Ok(result) => result,
        Err(_) => Err(CarrierError::timeout_with_duration("live rate attempt timed out", budget_ms)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::errors::ValidationError;
    use crate::domain::value_objects::Money;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct StubCarrier {
        result: Result<Money, CarrierError>,
        delay_ms: u64,
        calls: AtomicUsize,
    }

    impl StubCarrier {
        fn priced(cents: i64) -> Self {
            Self {
                result: Ok(Money::from_cents(cents)),
                delay_ms: 0,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(error: CarrierError) -> Self {
            Self {
                result: Err(error),
                delay_ms: 0,
                calls: AtomicUsize::new(0),
            }
        }

        fn slow(delay_ms: u64) -> Self {
            Self {
                delay_ms,
                ..Self::priced(999)
            }
        }
    }

    #[async_trait]
    impl CarrierAdapter for StubCarrier {
        fn carrier_name(&self) -> &str {
            "stub"
        }

        fn timeout_ms(&self) -> u64 {
            20
        }

        async fn fetch_rate(&self, request: &RateRequest) -> CarrierResult<LiveRate> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            self.result.clone().map(|total| LiveRate {
                service: request.service,
                total,
                description: None,
            })
        }

        async fn authenticate(&self) -> CarrierResult<()> {
            self.result.clone().map(|_| ())
        }
    }

    fn engine() -> RateEngine {
        RateEngine::new("98101")
    }

    fn book() -> Package {
        Package::new(6.0)
    }

    #[tokio::test]
    async fn live_rate_is_tagged_live_with_base_only_breakdown() {
        let client = LiveRateClient::new(engine(), Arc::new(StubCarrier::priced(1234)));
        let quote = client
            .quote(&book(), "10001", ServiceTier::PriorityMail)
            .await
            .unwrap();

        assert_eq!(quote.source(), QuoteSource::LiveApi);
        assert_eq!(quote.rate(), Money::from_cents(1234));
        assert_eq!(quote.component(CostComponent::Base), Money::from_cents(1234));
        assert_eq!(quote.component(CostComponent::ZoneSurcharge), Money::ZERO);
        assert_eq!(quote.breakdown().len(), 4);
    }

    #[tokio::test]
    async fn carrier_error_falls_back_to_estimate() {
        let client = LiveRateClient::new(
            engine(),
            Arc::new(StubCarrier::failing(CarrierError::connection("refused"))),
        );
        let quote = client
            .quote(&book(), "10001", ServiceTier::MediaMail)
            .await
            .unwrap();
        let local = engine()
            .estimate(&book(), "10001", ServiceTier::MediaMail)
            .unwrap();

        assert_eq!(quote, local);
        assert_eq!(quote.source(), QuoteSource::Estimated);
    }

    #[tokio::test]
    async fn slow_carrier_falls_back_to_estimate() {
        let client = LiveRateClient::new(engine(), Arc::new(StubCarrier::slow(500)));
        let quote = client
            .quote(&book(), "10001", ServiceTier::GroundAdvantage)
            .await
            .unwrap();
        assert_eq!(quote.source(), QuoteSource::Estimated);
    }

    #[tokio::test]
    async fn validation_error_skips_carrier() {
        let carrier = Arc::new(StubCarrier::priced(100));
        let client = LiveRateClient::new(engine(), carrier.clone());

        let err = client
            .quote(&book(), "100", ServiceTier::MediaMail)
            .await
            .unwrap_err();

        assert!(matches!(err, ValidationError::InvalidPostalCode { .. }));
        assert_eq!(carrier.calls.load(Ordering::SeqCst), 0);
    }

    mod connection {
        use super::*;

        #[tokio::test]
        async fn estimate_only_reports_not_configured() {
            let status = LiveRateClient::estimate_only(engine()).test_connection().await;
            assert!(!status.ok);
            assert_eq!(status.message, CarrierError::NotConfigured.to_string());
        }

        #[tokio::test]
        async fn rejected_credentials_reported() {
            let client = LiveRateClient::new(
                engine(),
                Arc::new(StubCarrier::failing(CarrierError::authentication("bad secret"))),
            );
            let status = client.test_connection().await;
            assert!(!status.ok);
            assert!(status.message.contains("bad secret"));
        }

        #[tokio::test]
        async fn accepted_credentials_reported() {
            let client = LiveRateClient::new(engine(), Arc::new(StubCarrier::priced(1)));
            let status = client.test_connection().await;
            assert!(status.ok);
            assert_eq!(status.message, "authenticated with stub");
        }
    }
}
