//! Bank suggestion client.
//!
//! Wraps the DaData-style `suggest/bank` endpoint with an in-memory response
//! cache and coalescing of identical in-flight requests.
//!
//! ### Specification
//!
//! - **Endpoint**: `POST <base_url>/suggest/bank`
//! - **Authentication**: `Authorization: Token <api key>` header.
//! - **Short queries**: fewer than `min_query_len` characters after trimming
//!   return an empty response without touching cache or network.
//! - **Caching**: responses keyed by lowercased query + canonical options,
//!   5 minute TTL, 100 entries, FIFO eviction.
//! - **Coalescing**: at most one request per key is outstanding; concurrent
//!   callers share its outcome.
//! - **Deadline**: 10s per request, no automatic retries.

pub mod request;
pub mod response;
pub mod transport;

pub use request::SuggestRequest;
pub use response::{BankAddress, BankData, BankName, BankOpf, BankState, BankSuggestion, SuggestionResponse};
pub use transport::{HttpTransport, RawResponse, Transport};

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};

use banksuggest_core::cache::compute_cache_key;
use banksuggest_core::{AppConfig, CacheStats, ConfigError, Error, MemoryCache, SearchOptions};
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};

/// Outcome shared by every caller coalesced onto one request.
type SharedResult = Result<Arc<SuggestionResponse>, Error>;

type PendingSearch = Shared<BoxFuture<'static, SharedResult>>;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct SuggestConfig {
    /// API key; `None` constructs a disabled client.
    pub api_key: Option<String>,
    /// Base URL (default: https://suggestions.dadata.ru/suggestions/api/4_1/rs).
    pub base_url: String,
    /// Hard deadline per request (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: bank-suggest/0.x).
    pub user_agent: String,
    /// Cache entry lifetime (default: 5 minutes).
    pub cache_ttl: Duration,
    /// Cache capacity (default: 100).
    pub cache_max_entries: usize,
    /// Minimum trimmed query length in characters (default: 3).
    pub min_query_len: usize,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for SuggestConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.api_key().map(str::to_string),
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            cache_ttl: config.cache_ttl(),
            cache_max_entries: config.cache_max_entries,
            min_query_len: config.min_query_len,
        }
    }
}

impl SuggestConfig {
    /// Load configuration from the layered config sources.
    pub fn from_env() -> Result<Self, ConfigError> {
        AppConfig::load().map(|config| Self::from(&config))
    }

    /// Use an explicit API key, taking precedence over configured sources.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into()).filter(|key: &String| !key.trim().is_empty());
        self
    }
}

struct Inner {
    transport: Option<Arc<dyn Transport>>,
    timeout: Duration,
    min_query_len: usize,
    cache: Mutex<MemoryCache<Arc<SuggestionResponse>>>,
    in_flight: Mutex<HashMap<String, PendingSearch>>,
}

impl Inner {
    fn cache(&self) -> MutexGuard<'_, MemoryCache<Arc<SuggestionResponse>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn in_flight(&self) -> MutexGuard<'_, HashMap<String, PendingSearch>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Bank suggestion client.
///
/// Cheap to clone; clones share the cache and in-flight map. Independent
/// instances never share state.
#[derive(Clone)]
pub struct SuggestClient {
    inner: Arc<Inner>,
}

impl fmt::Debug for SuggestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuggestClient")
            .field("enabled", &self.is_enabled())
            .field("timeout", &self.inner.timeout)
            .field("cache", &self.cache_stats())
            .finish()
    }
}

impl SuggestClient {
    /// Create a client with the reqwest transport.
    ///
    /// Without an API key the client is disabled: every search fails with
    /// [`Error::MissingApiKey`] and no request is ever sent.
    pub fn new(config: SuggestConfig) -> Result<Self, Error> {
        let transport: Option<Arc<dyn Transport>> = match config.api_key.as_deref() {
            Some(key) => {
                Some(Arc::new(HttpTransport::new(key, &config.base_url, config.timeout, &config.user_agent)?))
            }
            None => {
                tracing::warn!("no API key configured; bank suggestions are disabled");
                None
            }
        };

        Ok(Self::build(&config, transport))
    }

    /// Create a client from the layered config sources.
    pub fn from_env() -> Result<Self, Error> {
        let config = SuggestConfig::from_env().map_err(|e| Error::InvalidInput(e.to_string()))?;
        Self::new(config)
    }

    /// Create an enabled client over a custom transport.
    ///
    /// The configured API key is not consulted; authentication is the
    /// transport's concern.
    pub fn with_transport(config: &SuggestConfig, transport: Arc<dyn Transport>) -> Self {
        Self::build(config, Some(transport))
    }

    fn build(config: &SuggestConfig, transport: Option<Arc<dyn Transport>>) -> Self {
        let inner = Inner {
            transport,
            timeout: config.timeout,
            min_query_len: config.min_query_len,
            cache: Mutex::new(MemoryCache::new(config.cache_ttl, config.cache_max_entries)),
            in_flight: Mutex::new(HashMap::new()),
        };
        Self { inner: Arc::new(inner) }
    }

    /// Whether the client has a credential and will issue requests.
    pub fn is_enabled(&self) -> bool {
        self.inner.transport.is_some()
    }

    /// Search for banks matching `query`.
    ///
    /// Served from cache when possible; otherwise joins an identical request
    /// already in flight, or issues a new one. A successful response is cached
    /// before it is returned. Failures are never cached.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<Arc<SuggestionResponse>, Error> {
        let query = query.trim();
        if query.chars().count() < self.inner.min_query_len {
            return Ok(Arc::new(SuggestionResponse::empty()));
        }

        let Some(transport) = self.inner.transport.clone() else {
            return Err(Error::MissingApiKey);
        };

        options.validate()?;

        let key = compute_cache_key(query, options);

        if let Some(hit) = self.inner.cache().get(&key).cloned() {
            tracing::debug!("cache hit for suggestion query: {}", query);
            return Ok(hit);
        }

        let pending = {
            let mut in_flight = self.inner.in_flight();

            // a request for this key may have completed since the check above
            if let Some(hit) = self.inner.cache().get(&key).cloned() {
                return Ok(hit);
            }

            match in_flight.get(&key) {
                Some(pending) => {
                    tracing::debug!("joining in-flight request for query: {}", query);
                    pending.clone()
                }
                None => {
                    let request = SuggestRequest::new(query, options.clone());
                    let pending = self.start(key.clone(), transport, request);
                    in_flight.insert(key, pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    /// Spawn the network request and return a shared handle to its outcome.
    ///
    /// The request runs as its own task, so the cache store and in-flight
    /// removal happen even if every caller awaiting it is dropped. Must be
    /// called with the in-flight lock held; the task cannot remove its entry
    /// before the caller has inserted it.
    fn start(&self, key: String, transport: Arc<dyn Transport>, request: SuggestRequest) -> PendingSearch {
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        let deadline = self.inner.timeout;

        let task = tokio::spawn(async move {
            let result = fetch(transport.as_ref(), &request, deadline).await.map(Arc::new);

            if let Some(inner) = inner.upgrade() {
                if let Ok(response) = &result {
                    inner.cache().insert(key.clone(), Arc::clone(response));
                }
                inner.in_flight().remove(&key);
            }

            if let Err(e) = &result {
                tracing::warn!("suggestion request failed: query={} kind={} error={}", request.query, e.info().kind, e);
            }

            result
        });

        async move {
            task.await
                .unwrap_or_else(|e| Err(Error::Transport(format!("suggestion request task failed: {e}"))))
        }
        .boxed()
        .shared()
    }

    /// Drop every cached response. In-flight requests are unaffected.
    pub fn clear_cache(&self) {
        self.inner.cache().clear();
        tracing::debug!("suggestion cache cleared");
    }

    /// Cache occupancy, capacity and TTL.
    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache().stats()
    }

    /// Number of distinct requests currently in flight.
    pub fn in_flight_count(&self) -> usize {
        self.inner.in_flight().len()
    }
}

/// Send one request under a hard deadline and validate the response.
async fn fetch(transport: &dyn Transport, request: &SuggestRequest, deadline: Duration) -> Result<SuggestionResponse, Error> {
    let start = Instant::now();

    let raw = tokio::time::timeout(deadline, transport.send(request))
        .await
        .map_err(|_| Error::Timeout(deadline))??;

    tracing::debug!("suggestion service response status: {}", raw.status);

    if !raw.is_success() {
        return Err(Error::Http { status: raw.status, body: raw.text() });
    }

    let response = SuggestionResponse::from_slice(&raw.body)?;

    tracing::debug!("search completed in {:?}, {} suggestions", start.elapsed(), response.len());

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use banksuggest_core::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Transport returning a fixed status/body and counting calls.
    struct FixedTransport {
        status: u16,
        body: &'static str,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl FixedTransport {
        fn new(status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self { status, body, delay: Duration::ZERO, calls: AtomicUsize::new(0) })
        }

        fn slow(status: u16, body: &'static str, delay: Duration) -> Arc<Self> {
            Arc::new(Self { status, body, delay, calls: AtomicUsize::new(0) })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn send(&self, _request: &SuggestRequest) -> Result<RawResponse, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(RawResponse::new(self.status, self.body))
        }
    }

    const ONE_BANK: &str = r#"{"suggestions":[{"value":"ПАО Сбербанк","data":{"bic":"044525225"}}]}"#;

    fn client_with(transport: Arc<FixedTransport>) -> SuggestClient {
        SuggestClient::with_transport(&SuggestConfig::default(), transport)
    }

    #[test]
    fn test_config_defaults() {
        let config = SuggestConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.cache_max_entries, 100);
        assert_eq!(config.min_query_len, 3);
    }

    #[test]
    fn test_with_api_key_ignores_blank() {
        assert!(SuggestConfig::default().with_api_key("  ").api_key.is_none());
        assert_eq!(SuggestConfig::default().with_api_key("k").api_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_new_without_key_is_disabled() {
        let client = SuggestClient::new(SuggestConfig::default()).unwrap();
        assert!(!client.is_enabled());

        let client = SuggestClient::new(SuggestConfig::default().with_api_key("k")).unwrap();
        assert!(client.is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_client_fails_with_auth() {
        let client = SuggestClient::new(SuggestConfig::default()).unwrap();
        let err = client.search("сбербанк", &SearchOptions::default()).await.unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
        assert_eq!(err.info().kind, ErrorKind::Auth);
        assert_eq!(client.cache_stats().size, 0);
    }

    #[tokio::test]
    async fn test_disabled_client_short_query_is_empty() {
        let client = SuggestClient::new(SuggestConfig::default()).unwrap();
        let response = client.search("сб", &SearchOptions::default()).await.unwrap();
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_short_query_skips_network() {
        let transport = FixedTransport::new(200, ONE_BANK);
        let client = client_with(transport.clone());

        for query in ["", "  ", "ab", " ab ", "сб"] {
            let response = client.search(query, &SearchOptions::default()).await.unwrap();
            assert!(response.is_empty());
        }
        assert_eq!(transport.calls(), 0);
        assert_eq!(client.cache_stats().size, 0);
    }

    #[tokio::test]
    async fn test_invalid_options_rejected_before_network() {
        let transport = FixedTransport::new(200, ONE_BANK);
        let client = client_with(transport.clone());

        let err = client.search("сбербанк", &SearchOptions::with_count(0)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_success_is_cached() {
        let transport = FixedTransport::new(200, ONE_BANK);
        let client = client_with(transport.clone());

        let first = client.search("Sberbank", &SearchOptions::default()).await.unwrap();
        let second = client.search("sberbank", &SearchOptions::default()).await.unwrap();

        assert_eq!(transport.calls(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(client.cache_stats().size, 1);
        assert_eq!(client.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let transport = FixedTransport::new(503, "unavailable");
        let client = client_with(transport.clone());

        for _ in 0..2 {
            let err = client.search("сбербанк", &SearchOptions::default()).await.unwrap_err();
            assert_eq!(err.info().kind, ErrorKind::ServerError);
            assert!(matches!(err, Error::Http { status: 503, ref body } if body == "unavailable"));
        }
        assert_eq!(transport.calls(), 2);
        assert_eq!(client.cache_stats().size, 0);
        assert_eq!(client.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_response_is_unknown() {
        let transport = FixedTransport::new(200, r#"{"suggestions": "nope"}"#);
        let client = client_with(transport);

        let err = client.search("сбербанк", &SearchOptions::default()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
        assert_eq!(err.info().kind, ErrorKind::Unknown);
        assert_eq!(client.cache_stats().size, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_is_timeout() {
        let transport = FixedTransport::slow(200, ONE_BANK, Duration::from_secs(30));
        let client = client_with(transport.clone());

        let err = client.search("сбербанк", &SearchOptions::default()).await.unwrap_err();
        assert!(matches!(err, Error::Timeout(d) if d == Duration::from_secs(10)));
        let info = err.info();
        assert_eq!(info.kind, ErrorKind::Timeout);
        assert!(info.retryable);
        assert_eq!(client.in_flight_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_calls_are_coalesced() {
        let transport = FixedTransport::slow(200, ONE_BANK, Duration::from_millis(200));
        let client = client_with(transport.clone());
        let options = SearchOptions::default();

        let (a, b, c) = tokio::join!(
            client.search("сбербанк", &options),
            client.search("СБЕРБАНК", &options),
            client.search("  сбербанк ", &options),
        );

        assert_eq!(transport.calls(), 1);
        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &c));
        assert_eq!(client.in_flight_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_coalesced_failure_is_shared() {
        let transport = FixedTransport::slow(401, "bad token", Duration::from_millis(50));
        let client = client_with(transport.clone());
        let options = SearchOptions::default();

        let (a, b) = tokio::join!(client.search("сбербанк", &options), client.search("сбербанк", &options));

        assert_eq!(transport.calls(), 1);
        for err in [a.unwrap_err(), b.unwrap_err()] {
            let info = err.info();
            assert_eq!(info.kind, ErrorKind::Auth);
            assert!(!info.retryable);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_requests_leave_no_in_flight_entries() {
        let transport = FixedTransport::slow(200, ONE_BANK, Duration::from_secs(30));
        let client = client_with(transport.clone());
        let options = SearchOptions::default();

        for i in 0..50 {
            let query = format!("bank-{i:02}");
            let abandoned = tokio::time::timeout(Duration::from_millis(10), client.search(&query, &options)).await;
            assert!(abandoned.is_err());
        }
        assert_eq!(client.in_flight_count(), 50);

        tokio::time::sleep(Duration::from_secs(11)).await;

        assert_eq!(client.in_flight_count(), 0);
        assert_eq!(client.cache_stats().size, 0);
        assert_eq!(transport.calls(), 50);

        // a later call starts a fresh request instead of joining a dead one
        let _ = tokio::time::timeout(Duration::from_millis(10), client.search("bank-00", &options)).await;
        assert_eq!(transport.calls(), 51);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_request_still_caches_its_result() {
        let transport = FixedTransport::slow(200, ONE_BANK, Duration::from_secs(1));
        let client = client_with(transport.clone());
        let options = SearchOptions::default();

        let abandoned = tokio::time::timeout(Duration::from_millis(10), client.search("сбербанк", &options)).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(client.in_flight_count(), 0);
        assert_eq!(client.cache_stats().size, 1);

        let response = client.search("сбербанк", &options).await.unwrap();
        assert_eq!(response.len(), 1);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_keys_are_independent() {
        let transport = FixedTransport::slow(200, ONE_BANK, Duration::from_millis(50));
        let client = client_with(transport.clone());

        let default_options = SearchOptions::default();
        let single_options = SearchOptions::with_count(1);
        let (a, b) = tokio::join!(
            client.search("сбербанк", &default_options),
            client.search("сбербанк", &single_options),
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(transport.calls(), 2);
        assert_eq!(client.cache_stats().size, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiry_refetches() {
        let transport = FixedTransport::new(200, ONE_BANK);
        let client = client_with(transport.clone());
        let options = SearchOptions::default();

        client.search("сбербанк", &options).await.unwrap();
        tokio::time::advance(Duration::from_secs(299)).await;
        client.search("сбербанк", &options).await.unwrap();
        assert_eq!(transport.calls(), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        client.search("сбербанк", &options).await.unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let transport = FixedTransport::new(200, ONE_BANK);
        let client = client_with(transport.clone());

        client.search("сбербанк", &SearchOptions::default()).await.unwrap();
        client.clear_cache();
        assert_eq!(client.cache_stats().size, 0);

        client.search("сбербанк", &SearchOptions::default()).await.unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_instances_do_not_share_state() {
        let transport = FixedTransport::new(200, ONE_BANK);
        let first = client_with(transport.clone());
        let second = client_with(transport.clone());

        first.search("сбербанк", &SearchOptions::default()).await.unwrap();
        second.search("сбербанк", &SearchOptions::default()).await.unwrap();

        assert_eq!(transport.calls(), 2);
        assert_eq!(first.clone().cache_stats().size, 1);
    }

    #[test]
    fn test_cache_stats_reports_config() {
        let config = SuggestConfig { cache_ttl: Duration::from_secs(60), cache_max_entries: 7, ..Default::default() };
        let client = SuggestClient::with_transport(&config, FixedTransport::new(200, ONE_BANK));
        assert_eq!(client.cache_stats(), CacheStats { size: 0, max_size: 7, timeout: 60_000 });
    }
}
