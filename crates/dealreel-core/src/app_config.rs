use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Affiliate/partner tag appended to product URLs. `None` leaves URLs untouched.
    pub partner_tag: Option<String>,
    /// ISO 4217 code used when a record carries no currency of its own.
    pub default_currency: String,
    /// Maximum number of accepted deals per run. Always greater than zero.
    pub max_deals: usize,
    pub snapshot_path: PathBuf,
    pub categories_path: PathBuf,
    pub catalog_api_url: Option<String>,
    pub catalog_api_key: Option<String>,
    pub search_keywords: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Pause between category page fetches in scrape mode.
    pub inter_request_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("partner_tag", &self.partner_tag)
            .field("default_currency", &self.default_currency)
            .field("max_deals", &self.max_deals)
            .field("snapshot_path", &self.snapshot_path)
            .field("categories_path", &self.categories_path)
            .field("catalog_api_url", &self.catalog_api_url)
            .field(
                "catalog_api_key",
                &self.catalog_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("search_keywords", &self.search_keywords)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .finish()
    }
}
