//! The fetch capability the crawler is built on
//!
//! The scheduler never talks to the network itself. It hands each address to
//! a `Fetcher` and gets back the page content plus the addresses it links to.

use crate::FetchResult;
use async_trait::async_trait;
use std::sync::Arc;

/// What a successful fetch produces
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedPage {
    /// Content reported for the page
    pub content: String,

    /// Outbound addresses, in the order they were found
    pub links: Vec<String>,
}

impl FetchedPage {
    pub fn new(content: impl Into<String>, links: Vec<String>) -> Self {
        Self {
            content: content.into(),
            links,
        }
    }
}

/// Retrieves one address
///
/// The crawler calls `fetch` from many tasks at once. Timeouts and
/// cancellation of an in-flight request are the implementation's business;
/// the crawler simply waits for the result.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, address: &str) -> FetchResult<FetchedPage>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
    async fn fetch(&self, address: &str) -> FetchResult<FetchedPage> {
        (**self).fetch(address).await
    }
}
