//! Fetch command handlers.
//!
//! Each handler pulls raw records from one source, runs them through the
//! collector, and hands the snapshot to [`write_snapshot`]. In scrape mode a
//! failing category is logged and skipped; the run only fails when every
//! category does.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Subcommand, ValueEnum};
use dealreel_core::{AppConfig, CategoryConfig, DealSnapshot};
use dealreel_extract::{collect, CategoryCollector, ExtractConfig, ExtractionPolicy};
use dealreel_source::{
    load_raw_records, sample_records, CatalogClient, PageClient, SAMPLE_CAPACITY,
};

const SAMPLE_NOTE: &str =
    "Sample deals data for testing. Replace with real data from the catalog API or web scraper.";
const SCRAPE_NOTE: &str = "Scraped from Amazon category listing pages";

/// Options shared by every `fetch` source.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Maximum number of deals to keep (defaults to DEALREEL_MAX_DEALS)
    #[arg(long)]
    pub max: Option<usize>,

    /// Snapshot file to write (defaults to DEALREEL_SNAPSHOT_PATH)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Collect and summarize without writing the snapshot
    #[arg(long)]
    pub dry_run: bool,
}

impl FetchArgs {
    fn cap(&self, config: &AppConfig) -> usize {
        self.max.unwrap_or(config.max_deals)
    }

    fn output_path<'a>(&'a self, config: &'a AppConfig) -> &'a Path {
        self.output.as_deref().unwrap_or(&config.snapshot_path)
    }
}

/// Which records to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Only items with savings or promotions
    Strict,
    /// Any item with an ASIN and a title
    Catalog,
    /// Scraped page cards with a link and a price or discount badge
    Scrape,
}

impl From<PolicyArg> for ExtractionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Strict => ExtractionPolicy::StrictDeal,
            PolicyArg::Catalog => ExtractionPolicy::Catalog,
            PolicyArg::Scrape => ExtractionPolicy::Scrape,
        }
    }
}

/// Sub-commands available under `fetch`.
#[derive(Debug, Subcommand)]
pub enum FetchCommands {
    /// Search the catalog API (requires DEALREEL_CATALOG_API_URL)
    Api {
        /// Search keywords (defaults to DEALREEL_SEARCH_KEYWORDS)
        #[arg(long)]
        keywords: Option<String>,

        #[arg(long, value_enum, default_value_t = PolicyArg::Strict)]
        policy: PolicyArg,

        #[command(flatten)]
        common: FetchArgs,
    },
    /// Scrape the configured category listing pages
    Scrape {
        /// Scrape only this category (by name)
        #[arg(long)]
        category: Option<String>,

        #[command(flatten)]
        common: FetchArgs,
    },
    /// Generate synthetic deals without network access
    Sample {
        #[arg(long, default_value_t = 10)]
        count: usize,

        #[command(flatten)]
        common: FetchArgs,
    },
    /// Extract deals from a JSON file of raw records
    File {
        path: PathBuf,

        #[arg(long, value_enum, default_value_t = PolicyArg::Catalog)]
        policy: PolicyArg,

        #[command(flatten)]
        common: FetchArgs,
    },
}

pub(crate) async fn run_fetch(config: &AppConfig, command: FetchCommands) -> anyhow::Result<()> {
    let extract_config = ExtractConfig::from_app_config(config);

    let (snapshot, common) = match command {
        FetchCommands::Api {
            keywords,
            policy,
            common,
        } => {
            let keywords = keywords.as_deref().unwrap_or(&config.search_keywords);
            let cap = common.cap(config);
            let snapshot = fetch_api(config, &extract_config, keywords, policy, cap).await?;
            (snapshot, common)
        }
        FetchCommands::Scrape { category, common } => {
            let cap = common.cap(config);
            let snapshot = fetch_scrape(config, &extract_config, category.as_deref(), cap).await?;
            (snapshot, common)
        }
        FetchCommands::Sample { count, common } => {
            if count > SAMPLE_CAPACITY {
                tracing::warn!(
                    requested = count,
                    available = SAMPLE_CAPACITY,
                    "sample count exceeds available products"
                );
            }
            let snapshot = collect(
                sample_records(count),
                ExtractionPolicy::Catalog,
                common.cap(config),
                "sample_data",
                &extract_config,
            )?
            .with_note(SAMPLE_NOTE);
            (snapshot, common)
        }
        FetchCommands::File {
            path,
            policy,
            common,
        } => {
            let records = load_raw_records(&path)?;
            tracing::info!(path = %path.display(), records = records.len(), "raw records loaded");
            let snapshot = collect(
                records,
                policy.into(),
                common.cap(config),
                "file",
                &extract_config,
            )?;
            (snapshot, common)
        }
    };

    write_snapshot(&snapshot, common.output_path(config), common.dry_run)
}

async fn fetch_api(
    config: &AppConfig,
    extract_config: &ExtractConfig,
    keywords: &str,
    policy: PolicyArg,
    cap: usize,
) -> anyhow::Result<DealSnapshot> {
    if policy == PolicyArg::Scrape {
        anyhow::bail!("the scrape policy reads page cards; use `fetch scrape` instead");
    }
    let base_url = config
        .catalog_api_url
        .as_deref()
        .context("DEALREEL_CATALOG_API_URL must be set to fetch from the catalog API")?;

    let client = CatalogClient::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.catalog_api_key.clone(),
    )?;
    let item_count = u32::try_from(cap).unwrap_or(u32::MAX);
    let records = client
        .search_items(base_url, keywords, item_count, config.partner_tag.as_deref())
        .await?;
    tracing::info!(keywords, items = records.len(), "catalog search complete");

    Ok(collect(
        records,
        policy.into(),
        cap,
        "amazon_api",
        extract_config,
    )?)
}

async fn fetch_scrape(
    config: &AppConfig,
    extract_config: &ExtractConfig,
    category: Option<&str>,
    cap: usize,
) -> anyhow::Result<DealSnapshot> {
    let file = dealreel_core::load_categories(&config.categories_path)?;
    let categories: Vec<&CategoryConfig> = match category {
        Some(name) => vec![file.find(name).with_context(|| {
            format!(
                "category '{name}' not found in {}",
                config.categories_path.display()
            )
        })?],
        None => file.categories.iter().collect(),
    };

    let client = PageClient::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.inter_request_delay_ms,
    )?;
    let mut collector =
        CategoryCollector::new(ExtractionPolicy::Scrape, cap, categories.len(), extract_config)?;

    let mut failed = 0usize;
    for (i, category) in categories.iter().enumerate() {
        if collector.is_full() {
            tracing::info!(
                remaining = categories.len() - i,
                "deal cap reached; skipping remaining categories"
            );
            break;
        }
        if i > 0 {
            client.pause().await;
        }
        match client.fetch_category(category).await {
            Ok(batch) => {
                collector.add_batch(batch);
            }
            Err(e) => {
                tracing::warn!(category = %category.name, error = %e, "category fetch failed");
                failed += 1;
            }
        }
    }

    if failed == categories.len() {
        anyhow::bail!("all {failed} categories failed to fetch");
    }

    Ok(collector.finish("web_scraper").with_note(SCRAPE_NOTE))
}

/// Writes the snapshot unless the run came up empty or `dry_run` is set.
///
/// An empty run never overwrites the previous snapshot, so downstream
/// renderers keep working from the last good data.
fn write_snapshot(snapshot: &DealSnapshot, path: &Path, dry_run: bool) -> anyhow::Result<()> {
    if snapshot.is_empty() {
        tracing::warn!(path = %path.display(), "no deals collected; snapshot not written");
        println!("no deals collected; {} left untouched", path.display());
        return Ok(());
    }

    if dry_run {
        println!(
            "dry-run: would write {} deals to {}",
            snapshot.total_deals,
            path.display()
        );
        crate::show::print_deals(snapshot);
        return Ok(());
    }

    dealreel_core::save_snapshot(path, snapshot)?;
    println!("wrote {} deals to {}", snapshot.total_deals, path.display());
    Ok(())
}
