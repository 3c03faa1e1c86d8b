//! HTTP client for the product catalog search endpoint.

use dealreel_extract::{ApiItem, RawRecord};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::error::SourceError;
use crate::http::{build_client, check_status};

/// Body of `GET {base}/search`.
///
/// Items stay untyped here so one oddly shaped item cannot fail the whole
/// response; see [`into_record`].
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<Value>,
}

/// Types one search item, falling back to the raw mapping when a field has
/// an unexpected type (e.g. a string `amount`).
fn into_record(item: Value) -> RawRecord {
    match serde_json::from_value::<ApiItem>(item.clone()) {
        Ok(typed) => RawRecord::Item(typed),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "catalog item does not match the typed schema; reading it as a mapping"
            );
            RawRecord::Mapping(item)
        }
    }
}

/// Client for the catalog search endpoint.
///
/// Each search is a single best-effort request; 404, 429 and other non-2xx
/// responses come back as typed errors and are not retried.
pub struct CatalogClient {
    client: Client,
    api_key: Option<String>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        api_key: Option<String>,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            api_key,
        })
    }

    /// Searches the catalog for `keywords` and returns up to `item_count`
    /// raw records in response order.
    ///
    /// Items that match the catalog schema come back as
    /// [`RawRecord::Item`]; anything else is passed through as a
    /// [`RawRecord::Mapping`] for the extractor to read or reject.
    ///
    /// # Errors
    ///
    /// - [`SourceError::InvalidUrl`] if `base_url` is not a valid URL.
    /// - [`SourceError::RateLimited`] on HTTP 429.
    /// - [`SourceError::NotFound`] on HTTP 404.
    /// - [`SourceError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`SourceError::Http`] on network or TLS failure.
    /// - [`SourceError::Deserialize`] if the body is not a search response.
    pub async fn search_items(
        &self,
        base_url: &str,
        keywords: &str,
        item_count: u32,
        partner_tag: Option<&str>,
    ) -> Result<Vec<RawRecord>, SourceError> {
        let url = Self::search_url(base_url, keywords, item_count, partner_tag)?;

        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = check_status(request.send().await?, &url)?;
        let body = response.text().await?;
        let parsed = serde_json::from_str::<SearchResponse>(&body).map_err(|e| {
            SourceError::Deserialize {
                context: format!("catalog search from {base_url}"),
                source: e,
            }
        })?;

        let records: Vec<RawRecord> = parsed
            .items
            .into_iter()
            .take(item_count as usize)
            .map(into_record)
            .collect();
        tracing::debug!(keywords, count = records.len(), "catalog search returned items");
        Ok(records)
    }

    fn search_url(
        base_url: &str,
        keywords: &str,
        item_count: u32,
        partner_tag: Option<&str>,
    ) -> Result<String, SourceError> {
        let base = format!("{}/search", base_url.trim_end_matches('/'));
        let mut url = reqwest::Url::parse(&base).map_err(|e| SourceError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        url.query_pairs_mut()
            .append_pair("keywords", keywords)
            .append_pair("item_count", &item_count.to_string());
        if let Some(tag) = partner_tag {
            url.query_pairs_mut().append_pair("partner_tag", tag);
        }

        Ok(url.to_string())
    }
}
