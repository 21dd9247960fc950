//! # HTTP Client
//!
//! Thin JSON-over-HTTP wrapper shared by carrier adapters.
//!
//! Every request carries the client-wide timeout. Transport failures and
//! non-success statuses are mapped onto [`CarrierError`] so adapters never
//! deal with `reqwest` errors directly.
//!
//! # Examples
//!
//! ```ignore
//! use parcel_rates::infrastructure::carrier::http_client::HttpClient;
//!
//! let client = HttpClient::new(5000)?;
//! let token: TokenResponse = client.post(&token_url, &request).await?;
//! ```

use crate::infrastructure::carrier::error::{CarrierError, CarrierResult};
use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client wrapper for carrier adapters.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Errors
    ///
    /// Returns `CarrierError::Internal` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> CarrierResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| CarrierError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a POST request with a JSON body and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `CarrierError::Timeout` or `CarrierError::Connection` if the
    /// request fails, a status-specific error for non-2xx responses, and
    /// `CarrierError::Protocol` if the response cannot be parsed.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> CarrierResult<T> {
        self.post_with_headers(url, body, HeaderMap::new()).await
    }

    /// Makes a POST request authorized with a bearer token.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::post`]; a 401 or 403 maps to
    /// `CarrierError::Authentication`.
    pub async fn post_with_bearer<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        token: &str,
    ) -> CarrierResult<T> {
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Makes a POST request with a JSON body and custom headers.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::post`].
    pub async fn post_with_headers<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        headers: HeaderMap,
    ) -> CarrierResult<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .headers(headers)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> CarrierResult<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| CarrierError::protocol(format!("Failed to parse response: {}", e)))
        } else {
            let error_body = response.text().await.unwrap_or_default();
            Err(map_status_error(status, &error_body))
        }
    }

    fn map_reqwest_error(&self, error: reqwest::Error) -> CarrierError {
        if error.is_timeout() {
            CarrierError::timeout_with_duration("Request timed out", self.timeout_ms)
        } else if error.is_connect() {
            CarrierError::connection(format!("Connection failed: {}", error))
        } else if error.is_decode() {
            CarrierError::protocol(format!("Failed to decode response: {}", error))
        } else {
            CarrierError::connection(format!("HTTP request failed: {}", error))
        }
    }
}

/// Maps an HTTP status code to a `CarrierError`.
fn map_status_error(status: StatusCode, body: &str) -> CarrierError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            CarrierError::invalid_request(format!("Bad request: {}", body))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CarrierError::authentication(format!("Authentication failed ({}): {}", status, body))
        }
        StatusCode::TOO_MANY_REQUESTS => CarrierError::rate_limited("Rate limit exceeded"),
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            CarrierError::connection(format!("Server error ({}): {}", status, body))
        }
        _ => CarrierError::protocol(format!("HTTP error ({}): {}", status, body)),
    }
}
