//! HTTP fetcher implementation
//!
//! This module fetches pages over HTTP(S):
//! - Building HTTP clients with proper user agent strings
//! - GET requests with a per-request timeout
//! - Error classification into `FetchError`
//! - Link extraction from HTML bodies
//!
//! There is no retry: a failed request ends its branch of the crawl.

use crate::config::{Config, UserAgentConfig};
use crate::crawler::fetcher::{FetchedPage, Fetcher};
use crate::crawler::parser::parse_html;
use crate::{FetchError, FetchResult};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Overall per-request timeout
///
/// # Example
///
/// ```no_run
/// use ripple_crawl::config::UserAgentConfig;
/// use ripple_crawl::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches HTML pages with `reqwest` and extracts their links
///
/// By default the reported content is the page title (empty when the page
/// has none); `keep_body` switches it to the full response body.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    keep_body: bool,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            keep_body: false,
        }
    }

    /// Builds a fetcher from the user agent and timeout settings of `config`
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.crawler.request_timeout);
        Ok(Self::new(build_http_client(&config.user_agent, timeout)?))
    }

    /// Report the full response body as page content
    pub fn keep_body(mut self) -> Self {
        self.keep_body = true;
        self
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// # Request Flow
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Unparseable address | `Network` |
    /// | Timeout | `Timeout` |
    /// | Connection / other transport error | `Network` |
    /// | Non-2xx status | `Status` |
    /// | Content-Type not HTML | `ContentMismatch` |
    /// | Body read error | `Network` |
    async fn fetch(&self, address: &str) -> FetchResult<FetchedPage> {
        Url::parse(address).map_err(|e| FetchError::Network {
            url: address.to_string(),
            message: format!("invalid URL: {}", e),
        })?;

        let response = self
            .client
            .get(address)
            .send()
            .await
            .map_err(|e| classify_error(address, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: address.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.contains("text/html") {
            return Err(FetchError::ContentMismatch {
                url: address.to_string(),
                content_type,
            });
        }

        // Relative links resolve against where redirects actually landed
        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| classify_error(address, e))?;

        let parsed = parse_html(&body, &final_url);
        let content = if self.keep_body {
            body
        } else {
            parsed.title.unwrap_or_default()
        };

        Ok(FetchedPage::new(content, parsed.links))
    }
}

fn classify_error(address: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout(address.to_string())
    } else if error.is_connect() {
        FetchError::Network {
            url: address.to_string(),
            message: "connection refused".to_string(),
        }
    } else {
        FetchError::Network {
            url: address.to_string(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        let config = UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        };
        assert_eq!(
            config.header_value(),
            "TestCrawler/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    #[tokio::test]
    async fn test_invalid_address_fails_without_request() {
        let fetcher = HttpFetcher::from_config(&Config::for_seed("https://example.com/", 1))
            .unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(FetchError::Network { .. })));
    }

    // Response handling is covered against a mock server in the integration tests
}
