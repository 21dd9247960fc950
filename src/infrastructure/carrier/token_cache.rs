//! # Token Cache
//!
//! Holds the carrier's OAuth access token between requests.
//!
//! ```text
//! Unauthenticated --exchange--> Authenticated
//! Authenticated   --now >= expires_at - margin--> refresh
//! Authenticated   --401/403--> invalidate --> refresh (once)
//! ```
//!
//! Reads go through a `parking_lot::RwLock`. Refreshes are serialized by a
//! `tokio::sync::Mutex`, and a waiter re-checks the cache after acquiring
//! it, so concurrent callers that all find the token stale trigger exactly
//! one exchange.

use crate::domain::value_objects::Timestamp;
use crate::infrastructure::carrier::error::CarrierResult;
use parking_lot::RwLock;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Default seconds before expiry at which a token is no longer used.
pub const DEFAULT_SAFETY_MARGIN_SECS: u64 = 60;

/// A bearer token and the moment it expires.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    expires_at: Timestamp,
}

impl AccessToken {
    /// Creates a token valid for `expires_in_secs` from now.
    #[must_use]
    pub fn new(value: impl Into<String>, expires_in_secs: u64) -> Self {
        let secs = i64::try_from(expires_in_secs).unwrap_or(i64::MAX);
        Self::with_expiry(value, Timestamp::now().add_secs(secs))
    }

    /// Creates a token with an explicit expiry.
    #[must_use]
    pub fn with_expiry(value: impl Into<String>, expires_at: Timestamp) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Returns the raw token.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the expiry time.
    #[inline]
    #[must_use]
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Returns true while the token is at least `margin_secs` from expiry.
    #[must_use]
    pub fn is_usable(&self, margin_secs: u64) -> bool {
        let margin = i64::try_from(margin_secs).unwrap_or(i64::MAX);
        Timestamp::now().is_before(&self.expires_at.sub_secs(margin))
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Shared, refresh-serializing token store.
#[derive(Debug)]
pub struct TokenCache {
    current: RwLock<Option<AccessToken>>,
    refresh: Mutex<()>,
    safety_margin_secs: u64,
    exchanges: AtomicU64,
}

impl TokenCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(safety_margin_secs: u64) -> Self {
        Self {
            current: RwLock::new(None),
            refresh: Mutex::new(()),
            safety_margin_secs,
            exchanges: AtomicU64::new(0),
        }
    }

    /// Returns the cached token if it is still usable.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.current
            .read()
            .as_ref()
            .filter(|token| token.is_usable(self.safety_margin_secs))
            .map(|token| token.value().to_string())
    }

    /// Number of successful exchanges performed through this cache.
    #[must_use]
    pub fn exchange_count(&self) -> u64 {
        self.exchanges.load(Ordering::Relaxed)
    }

    /// Returns a usable token, running `exchange` only if none is cached.
    ///
    /// # Errors
    ///
    /// Propagates the error from `exchange`; the cache is left unchanged.
    pub async fn get_or_refresh<F, Fut>(&self, exchange: F) -> CarrierResult<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CarrierResult<AccessToken>>,
    {
        if let Some(token) = self.current() {
            return Ok(token);
        }

        let _guard = self.refresh.lock().await;
        if let Some(token) = self.current() {
            return Ok(token);
        }

        self.exchange_locked(exchange).await
    }

    /// Always runs `exchange` and replaces the cached token once it succeeds.
    ///
    /// # Errors
    ///
    /// Propagates the error from `exchange`; a still-valid cached token is kept.
    pub async fn force_refresh<F, Fut>(&self, exchange: F) -> CarrierResult<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CarrierResult<AccessToken>>,
    {
        let _guard = self.refresh.lock().await;
        self.exchange_locked(exchange).await
    }

    /// Drops the cached token if it is still `stale`.
    ///
    /// A token already replaced by another caller is left alone.
    pub fn invalidate(&self, stale: &str) {
        let mut current = self.current.write();
        if current.as_ref().is_some_and(|token| token.value() == stale) {
            *current = None;
            tracing::debug!("access token invalidated");
        }
    }

    async fn exchange_locked<F, Fut>(&self, exchange: F) -> CarrierResult<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CarrierResult<AccessToken>>,
    {
        let token = exchange().await?;
        let value = token.value().to_string();

        tracing::info!(expires_at = %token.expires_at(), "access token refreshed");
        *self.current.write() = Some(token);
        self.exchanges.fetch_add(1, Ordering::Relaxed);
        Ok(value)
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(DEFAULT_SAFETY_MARGIN_SECS)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::carrier::error::CarrierError;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    mod access_token {
        use super::*;

        #[test]
        fn fresh_token_is_usable() {
            assert!(AccessToken::new("t", 3600).is_usable(60));
        }

        #[test]
        fn token_inside_margin_is_not_usable() {
            assert!(!AccessToken::new("t", 30).is_usable(60));
        }

        #[test]
        fn debug_redacts_value() {
            let debug = format!("{:?}", AccessToken::new("secret-token", 60));
            assert!(!debug.contains("secret-token"));
        }
    }

    #[tokio::test]
    async fn reuses_cached_token() {
        let cache = TokenCache::default();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let token = cache
                .get_or_refresh(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(AccessToken::new("abc", 3600))
                })
                .await
                .unwrap();
            assert_eq!(token, "abc");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.exchange_count(), 1);
    }

    #[tokio::test]
    async fn expired_token_is_refreshed() {
        let cache = TokenCache::new(60);
        cache
            .get_or_refresh(|| async { Ok(AccessToken::new("short", 10)) })
            .await
            .unwrap();

        let token = cache
            .get_or_refresh(|| async { Ok(AccessToken::new("long", 3600)) })
            .await
            .unwrap();
        assert_eq!(token, "long");
        assert_eq!(cache.exchange_count(), 2);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_exchange() {
        let cache = Arc::new(TokenCache::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks = (0..16).map(|_| {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                cache
                    .get_or_refresh(|| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                        Ok(AccessToken::new("shared", 3600))
                    })
                    .await
            })
        });

        for result in futures::future::join_all(tasks).await {
            assert_eq!(result.unwrap().unwrap(), "shared");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_exchange_leaves_cache_empty() {
        let cache = TokenCache::default();
        let result = cache
            .get_or_refresh(|| async { Err(CarrierError::authentication("bad secret")) })
            .await;
        assert!(result.unwrap_err().is_auth_failure());
        assert!(cache.current().is_none());
    }

    #[tokio::test]
    async fn invalidate_only_drops_matching_token() {
        let cache = TokenCache::default();
        cache
            .get_or_refresh(|| async { Ok(AccessToken::new("new", 3600)) })
            .await
            .unwrap();

        cache.invalidate("old");
        assert_eq!(cache.current().as_deref(), Some("new"));

        cache.invalidate("new");
        assert!(cache.current().is_none());
    }

    #[tokio::test]
    async fn force_refresh_replaces_valid_token() {
        let cache = TokenCache::default();
        cache
            .get_or_refresh(|| async { Ok(AccessToken::new("first", 3600)) })
            .await
            .unwrap();
        let token = cache
            .force_refresh(|| async { Ok(AccessToken::new("second", 3600)) })
            .await
            .unwrap();
        assert_eq!(token, "second");
    }

    #[tokio::test]
    async fn failed_force_refresh_keeps_valid_token() {
        let cache = TokenCache::default();
        cache
            .get_or_refresh(|| async { Ok(AccessToken::new("working", 3600)) })
            .await
            .unwrap();

        let result = cache
            .force_refresh(|| async { Err(CarrierError::connection("refused")) })
            .await;
        assert!(result.is_err());
        assert_eq!(cache.current().as_deref(), Some("working"));
        assert_eq!(cache.exchange_count(), 1);
    }
}
