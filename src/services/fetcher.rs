// src/services/fetcher.rs

//! Cache-aside resource fetcher.
//!
//! Every network read goes through [`ResourceFetcher::fetch_or_load`]. A key
//! already in the cache is served from it; otherwise the fetch function runs
//! and its value is stored. Failed fetches are never cached, so the next call
//! for the same key tries the network again.

use std::future::Future;

use crate::error::Result;
use crate::storage::{Namespace, Pages, PersistentCache};
use crate::utils::http::HttpSource;

/// Network access mediated by the persistent cache.
pub struct ResourceFetcher<'a> {
    cache: &'a mut PersistentCache,
    http: &'a dyn HttpSource,
}

impl<'a> ResourceFetcher<'a> {
    pub fn new(cache: &'a mut PersistentCache, http: &'a dyn HttpSource) -> Self {
        Self { cache, http }
    }

    /// The HTTP source, for building fetch functions.
    pub fn http(&self) -> &'a dyn HttpSource {
        self.http
    }

    pub fn cache(&self) -> &PersistentCache {
        &*self.cache
    }

    /// Return the cached value for `key` in namespace `N`, or run `fetch`,
    /// store its value under `key` and return it.
    ///
    /// Errors from `fetch` propagate unchanged and leave `key` unwritten. A
    /// fetched value is returned even if persisting it fails; the cache keeps
    /// it pending for the next flush.
    pub async fn fetch_or_load<N, F, Fut>(&mut self, key: &str, fetch: F) -> Result<N::Value>
    where
        N: Namespace,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<N::Value>>,
    {
        if let Some(value) = self.cache.get::<N>(key) {
            log::info!("Using cache for {} {}", N::LABEL, key);
            return Ok(value.clone());
        }

        log::info!("Fetching {} {}", N::LABEL, key);
        let value = fetch().await?;
        self.cache.put::<N>(key, value.clone());
        Ok(value)
    }

    /// Raw markup of the page at `url`.
    pub async fn page(&mut self, url: &str) -> Result<String> {
        let http = self.http;
        self.fetch_or_load::<Pages, _, _>(url, || http.get_text(url, &[]))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::error::AppError;
    use crate::models::{FlushPolicy, NearbyPlaces};
    use crate::storage::Places;
    use crate::storage::cache::load as load_document;

    /// Serves `<p>{url}</p>` and counts requests.
    #[derive(Default)]
    struct EchoSource {
        requests: AtomicUsize,
    }

    #[async_trait]
    impl HttpSource for EchoSource {
        async fn get_text(&self, url: &str, _query: &[(&str, String)]) -> Result<String> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(format!("<p>{url}</p>"))
        }
    }

    fn open(tmp: &TempDir) -> PersistentCache {
        PersistentCache::open_at(tmp.path().join("cache.json"), FlushPolicy::Always)
    }

    #[tokio::test]
    async fn test_miss_fetches_once_and_stores() {
        let tmp = TempDir::new().unwrap();
        let mut cache = open(&tmp);
        let http = EchoSource::default();
        let mut fetcher = ResourceFetcher::new(&mut cache, &http);

        let mut calls = 0;
        let value = fetcher
            .fetch_or_load::<Places, _, _>("49931", || {
                calls += 1;
                async { Ok(NearbyPlaces::ranked(["A (B): C, D"])) }
            })
            .await
            .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(value.get(1), Some("A (B): C, D"));
        assert_eq!(fetcher.cache().get::<Places>("49931"), Some(&value));
        assert_eq!(
            load_document(&tmp.path().join("cache.json")).places.get("49931"),
            Some(&value)
        );
    }

    #[tokio::test]
    async fn test_hit_never_calls_fetch() {
        let tmp = TempDir::new().unwrap();
        let mut cache = open(&tmp);
        cache
            .put::<Pages>("https://example.test/", "<p>cached</p>".to_string());
        let http = EchoSource::default();
        let mut fetcher = ResourceFetcher::new(&mut cache, &http);

        let mut calls = 0;
        let value = fetcher
            .fetch_or_load::<Pages, _, _>("https://example.test/", || {
                calls += 1;
                async { Ok("<p>fresh</p>".to_string()) }
            })
            .await
            .unwrap();

        assert_eq!(calls, 0);
        assert_eq!(value, "<p>cached</p>");
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_key_unwritten() {
        let tmp = TempDir::new().unwrap();
        let mut cache = open(&tmp);
        let http = EchoSource::default();
        let mut fetcher = ResourceFetcher::new(&mut cache, &http);

        let result = fetcher
            .fetch_or_load::<Pages, _, _>("https://example.test/down", || async {
                Err(AppError::validation("simulated outage"))
            })
            .await;

        assert!(result.is_err());
        assert!(!fetcher.cache().contains::<Pages>("https://example.test/down"));

        let retried = fetcher.page("https://example.test/down").await.unwrap();
        assert_eq!(retried, "<p>https://example.test/down</p>");
        assert_eq!(http.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_page_is_fetched_once_across_calls() {
        let tmp = TempDir::new().unwrap();
        let mut cache = open(&tmp);
        let http = EchoSource::default();
        let mut fetcher = ResourceFetcher::new(&mut cache, &http);

        let first = fetcher.page("https://example.test/a").await.unwrap();
        let second = fetcher.page("https://example.test/a").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(http.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_keys_match_exactly() {
        let tmp = TempDir::new().unwrap();
        let mut cache = open(&tmp);
        let http = EchoSource::default();
        let mut fetcher = ResourceFetcher::new(&mut cache, &http);

        fetcher.page("https://example.test/a").await.unwrap();
        fetcher.page("https://example.test/a/").await.unwrap();

        assert_eq!(http.requests.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unwritable_cache_still_returns_fetched_value() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let mut cache =
            PersistentCache::open_at(blocker.join("cache.json"), FlushPolicy::Always);
        let http = EchoSource::default();
        let mut fetcher = ResourceFetcher::new(&mut cache, &http);

        let first = fetcher.page("https://example.test/a").await.unwrap();
        assert_eq!(first, "<p>https://example.test/a</p>");
        assert_eq!(fetcher.cache().pending(), 1);

        let second = fetcher.page("https://example.test/a").await.unwrap();
        assert_eq!(second, first);
        assert_eq!(http.requests.load(Ordering::SeqCst), 1);
    }
}
