//! Fetching category listing pages.

use std::time::Duration;

use dealreel_core::CategoryConfig;
use dealreel_extract::{CategoryBatch, RawRecord};
use reqwest::Client;

use crate::cards::parse_cards;
use crate::error::SourceError;
use crate::http::{build_client, check_status};

/// Fetches listing pages with browser-like request headers.
pub struct PageClient {
    client: Client,
    delay: Duration,
}

impl PageClient {
    /// `delay_ms` is the pause [`pause`](Self::pause) inserts between
    /// consecutive page fetches.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str, delay_ms: u64) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            delay: Duration::from_millis(delay_ms),
        })
    }

    /// Fetches one page and returns its HTML.
    ///
    /// # Errors
    ///
    /// - [`SourceError::RateLimited`] on HTTP 429.
    /// - [`SourceError::NotFound`] on HTTP 404.
    /// - [`SourceError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`SourceError::Http`] on network or TLS failure.
    pub async fn fetch_page(&self, url: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let response = check_status(response, url)?;
        Ok(response.text().await?)
    }

    /// Fetches a category page and parses its product cards into a batch
    /// tagged with the category name.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`fetch_page`](Self::fetch_page).
    pub async fn fetch_category(
        &self,
        category: &CategoryConfig,
    ) -> Result<CategoryBatch, SourceError> {
        let html = self.fetch_page(&category.url).await?;
        let cards = parse_cards(&html, &category.url);
        tracing::info!(category = %category.name, cards = cards.len(), "category page parsed");

        Ok(CategoryBatch {
            name: category.name.clone(),
            records: cards.into_iter().map(RawRecord::from).collect(),
        })
    }

    /// Sleeps for the configured inter-request delay.
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
