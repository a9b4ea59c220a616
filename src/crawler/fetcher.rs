//! HTTP fetching and anchor extraction
//!
//! The fetcher is the engine's fetch-and-parse collaborator: it GETs a URL
//! with the configured timeout and user agent, and returns the raw markup
//! together with every anchor href found in it. Hrefs come back exactly as
//! written in the document; resolution against the page URL is the engine's
//! job.

use crate::config::CrawlerConfig;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;

/// Errors from fetching a single page. All of them are recovered locally by
/// the engine: the URL is skipped and the crawl continues.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed")]
    Connect,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The page's own URL, after redirects.
    pub url: String,
    /// Raw serialized markup as received.
    pub markup: String,
    /// Every `a[href]` value, unresolved.
    pub hrefs: Vec<String>,
}

/// HTTP fetch collaborator backed by a reqwest client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher from the crawler configuration.
    pub fn new(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Fetches `url` and extracts its anchors.
    ///
    /// Non-2xx responses are errors; the engine treats any [`FetchError`] as
    /// "skip this URL".
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let markup = response.text().await.map_err(classify)?;
        let hrefs = extract_hrefs(&markup);

        Ok(FetchedPage {
            url: final_url,
            markup,
            hrefs,
        })
    }
}

fn classify(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::Connect
    } else {
        FetchError::Http(error)
    }
}

/// Extracts every `a[href]` attribute value from `html`, unresolved.
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut hrefs = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                hrefs.push(href.to_string());
            }
        }
    }

    hrefs
}
