//! An in-memory fetcher over a fixed link graph
//!
//! Useful for demos and tests: pages are looked up in a map, unknown
//! addresses fail with `FetchError::NotFound`, and every call is counted.

use crate::crawler::fetcher::{FetchedPage, Fetcher};
use crate::{FetchError, FetchResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Serves canned pages from a map
#[derive(Debug, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, FetchedPage>,
    latency: Option<Duration>,
    calls: Mutex<HashMap<String, usize>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page with its content and outbound links
    pub fn with_page<I, S>(mut self, address: &str, content: &str, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let links = links.into_iter().map(Into::into).collect();
        self.pages
            .insert(address.to_string(), FetchedPage::new(content, links));
        self
    }

    /// Sleeps this long inside every fetch, to widen race windows in tests
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// A four-page site with cycles and one dangling link
    pub fn sample_site() -> Self {
        Self::new()
            .with_page(
                "https://golang.org/",
                "The Go Programming Language",
                ["https://golang.org/pkg/", "https://golang.org/cmd/"],
            )
            .with_page(
                "https://golang.org/pkg/",
                "Packages",
                [
                    "https://golang.org/",
                    "https://golang.org/cmd/",
                    "https://golang.org/pkg/fmt/",
                    "https://golang.org/pkg/os/",
                ],
            )
            .with_page(
                "https://golang.org/pkg/fmt/",
                "Package fmt",
                ["https://golang.org/", "https://golang.org/pkg/"],
            )
            .with_page(
                "https://golang.org/pkg/os/",
                "Package os",
                ["https://golang.org/", "https://golang.org/pkg/"],
            )
    }

    /// Number of times `address` has been fetched
    pub fn fetch_count(&self, address: &str) -> usize {
        self.lock_calls().get(address).copied().unwrap_or(0)
    }

    /// Total number of fetches across all addresses
    pub fn total_fetches(&self) -> usize {
        self.lock_calls().values().sum()
    }

    /// Addresses that have been fetched at least once, sorted
    pub fn fetched_addresses(&self) -> Vec<String> {
        let mut addresses: Vec<String> = self.lock_calls().keys().cloned().collect();
        addresses.sort();
        addresses
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, HashMap<String, usize>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, address: &str) -> FetchResult<FetchedPage> {
        *self.lock_calls().entry(address.to_string()).or_insert(0) += 1;

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.pages
            .get(address)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(address.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_page() {
        let fetcher = StaticFetcher::new().with_page("a", "Page A", ["b", "c"]);

        let page = fetcher.fetch("a").await.unwrap();
        assert_eq!(page.content, "Page A");
        assert_eq!(page.links, vec!["b".to_string(), "c".to_string()]);
        assert_eq!(fetcher.fetch_count("a"), 1);
    }

    #[tokio::test]
    async fn test_unknown_page_is_not_found() {
        let fetcher = StaticFetcher::new();

        let result = fetcher.fetch("missing").await;
        assert_eq!(result, Err(FetchError::NotFound("missing".to_string())));
        assert_eq!(fetcher.fetch_count("missing"), 1);
        assert_eq!(fetcher.total_fetches(), 1);
    }

    #[tokio::test]
    async fn test_sample_site_links_back_to_root() {
        let fetcher = StaticFetcher::sample_site();
        let page = fetcher.fetch("https://golang.org/pkg/fmt/").await.unwrap();
        assert!(page.links.contains(&"https://golang.org/".to_string()));

        // The root links to /cmd/, which the site does not serve
        let result = fetcher.fetch("https://golang.org/cmd/").await;
        assert!(matches!(result, Err(FetchError::NotFound(_))));
    }
}
