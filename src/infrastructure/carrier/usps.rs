//! # USPS Adapter
//!
//! Live rates from the USPS v3 REST APIs.
//!
//! Authentication uses the OAuth2 client-credentials grant; the resulting
//! bearer token is cached in a [`TokenCache`] and reused until shortly
//! before it expires. A rate search rejected with 401/403 invalidates the
//! token, re-authenticates once and retries once.
//!
//! # Endpoints
//!
//! ```text
//! POST {base}/oauth2/v3/token               client_credentials -> access_token
//! POST {base}/prices/v3/base-rates/search   bearer             -> totalBasePrice
//! ```

use crate::config::LiveApiConfig;
use crate::domain::value_objects::Money;
use crate::infrastructure::carrier::error::{CarrierError, CarrierResult};
use crate::infrastructure::carrier::http_client::HttpClient;
use crate::infrastructure::carrier::token_cache::{AccessToken, TokenCache};
use crate::infrastructure::carrier::traits::{CarrierAdapter, LiveRate, RateRequest};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

const TOKEN_PATH: &str = "/oauth2/v3/token";
const BASE_RATES_PATH: &str = "/prices/v3/base-rates/search";

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BaseRateRequest<'a> {
    #[serde(rename = "originZIPCode")]
    origin_zip_code: &'a str,
    #[serde(rename = "destinationZIPCode")]
    destination_zip_code: &'a str,
    weight: f64,
    length: f64,
    width: f64,
    height: f64,
    mail_class: &'a str,
    processing_category: &'a str,
    rate_indicator: &'a str,
    destination_entry_facility_type: &'a str,
    price_type: &'a str,
}

impl<'a> BaseRateRequest<'a> {
    fn from_request(request: &'a RateRequest) -> Self {
        let (length, width, height) = request
            .dimensions
            .as_ref()
            .map_or((0.0, 0.0, 0.0), |d| (d.length(), d.width(), d.height()));

        Self {
            origin_zip_code: &request.origin_zip,
            destination_zip_code: request.destination.as_str(),
            weight: request.weight_lbs,
            length,
            width,
            height,
            mail_class: request.service.mail_class(),
            processing_category: "MACHINABLE",
            rate_indicator: "SP",
            destination_entry_facility_type: "NONE",
            price_type: "RETAIL",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BaseRateResponse {
    total_base_price: Option<Decimal>,
    #[serde(default)]
    rates: Vec<RateEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RateEntry {
    #[serde(default)]
    description: Option<String>,
    price: Option<Decimal>,
}

impl BaseRateResponse {
    /// Total price, preferring `totalBasePrice` over the first rate entry.
    fn total(&self) -> CarrierResult<Money> {
        let amount = self
            .total_base_price
            .or_else(|| self.rates.first().and_then(|r| r.price))
            .ok_or_else(|| CarrierError::protocol("response carries no price"))?;
        Money::from_decimal(amount)
            .ok_or_else(|| CarrierError::protocol(format!("negative price {}", amount)))
    }

    fn description(&self) -> Option<String> {
        self.rates.first().and_then(|r| r.description.clone())
    }
}

/// USPS carrier adapter.
pub struct UspsAdapter {
    http: HttpClient,
    base_url: String,
    client_id: String,
    client_secret: String,
    tokens: TokenCache,
}

impl UspsAdapter {
    /// Creates an adapter from live API settings.
    ///
    /// # Errors
    ///
    /// Returns `CarrierError::Internal` if the HTTP client cannot be built.
    pub fn new(config: &LiveApiConfig) -> CarrierResult<Self> {
        Ok(Self {
            http: HttpClient::new(config.timeout_ms)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            tokens: TokenCache::new(config.token_safety_margin_secs),
        })
    }

    /// Returns the token cache.
    #[inline]
    #[must_use]
    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    async fn exchange(&self) -> CarrierResult<AccessToken> {
        let body = TokenRequest {
            grant_type: "client_credentials",
            client_id: &self.client_id,
            client_secret: &self.client_secret,
        };
        let url = format!("{}{}", self.base_url, TOKEN_PATH);
        let response: TokenResponse = self.http.post(&url, &body).await?;

        if response.access_token.is_empty() {
            return Err(CarrierError::authentication("empty access token"));
        }
        Ok(AccessToken::new(response.access_token, response.expires_in))
    }

    async fn token(&self) -> CarrierResult<String> {
        self.tokens.get_or_refresh(|| self.exchange()).await
    }

    async fn search(&self, body: &BaseRateRequest<'_>, token: &str) -> CarrierResult<BaseRateResponse> {
        let url = format!("{}{}", self.base_url, BASE_RATES_PATH);
        self.http.post_with_bearer(&url, body, token).await
    }
}

impl fmt::Debug for UspsAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UspsAdapter")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("timeout_ms", &self.http.timeout_ms())
            .finish()
    }
}

#[async_trait]
impl CarrierAdapter for UspsAdapter {
    fn carrier_name(&self) -> &str {
        "usps"
    }

    fn timeout_ms(&self) -> u64 {
        self.http.timeout_ms()
    }

    async fn fetch_rate(&self, request: &RateRequest) -> CarrierResult<LiveRate> {
        let body = BaseRateRequest::from_request(request);
        let token = self.token().await?;

        let response = match self.search(&body, &token).await {
            Err(e) if e.is_auth_failure() => {
                tracing::warn!(error = %e, "usps token rejected, re-authenticating");
                self.tokens.invalidate(&token);
                let token = self.token().await?;
                self.search(&body, &token).await?
            }
            other => other?,
        };

        Ok(LiveRate {
            service: request.service,
            total: response.total()?,
            description: response.description(),
        })
    }

    async fn authenticate(&self) -> CarrierResult<()> {
        self.tokens.force_refresh(|| self.exchange()).await.map(|_| ())
    }
}
