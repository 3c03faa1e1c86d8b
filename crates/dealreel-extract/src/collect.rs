//! The Deal Collector: drives the extractor over a run's raw records and
//! assembles the capped, ordered [`DealSnapshot`].

use dealreel_core::{Deal, DealSnapshot};

use crate::error::CollectError;
use crate::extract::{extract, ExtractConfig, ExtractionPolicy};
use crate::record::RawRecord;

/// Per-run tallies, logged once the run completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub examined: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// Extracts records in order until `limit` deals are accepted. Records past
/// that point are never pulled from the iterator.
fn extract_until<I>(
    records: I,
    policy: ExtractionPolicy,
    config: &ExtractConfig,
    limit: usize,
    stats: &mut RunStats,
) -> Vec<Deal>
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut deals = Vec::new();
    if limit == 0 {
        return deals;
    }
    for (index, record) in records.into_iter().enumerate() {
        stats.examined += 1;
        match extract(&record, policy, config) {
            Ok(deal) => {
                stats.accepted += 1;
                deals.push(deal);
                if deals.len() >= limit {
                    break;
                }
            }
            Err(reason) => {
                stats.rejected += 1;
                tracing::debug!(index, %reason, "record rejected");
            }
        }
    }
    deals
}

fn log_summary(stats: RunStats, source_tag: &str) {
    if stats.accepted == 0 {
        tracing::warn!(
            source = source_tag,
            examined = stats.examined,
            "run produced no deals"
        );
    } else {
        tracing::info!(
            source = source_tag,
            examined = stats.examined,
            accepted = stats.accepted,
            rejected = stats.rejected,
            "collection complete"
        );
    }
}

/// Collects at most `cap` deals from `records` into a snapshot.
///
/// Rejected and malformed records are skipped; an empty result is returned
/// as an empty snapshot so callers can decide whether to continue.
///
/// # Errors
///
/// Returns [`CollectError::InvalidCap`] if `cap` is zero.
pub fn collect<I>(
    records: I,
    policy: ExtractionPolicy,
    cap: usize,
    source_tag: &str,
    config: &ExtractConfig,
) -> Result<DealSnapshot, CollectError>
where
    I: IntoIterator<Item = RawRecord>,
{
    if cap == 0 {
        return Err(CollectError::InvalidCap);
    }

    let mut stats = RunStats::default();
    let deals = extract_until(records, policy, config, cap, &mut stats);
    log_summary(stats, source_tag);

    Ok(DealSnapshot::new(deals, Some(source_tag.to_string())))
}

/// Raw records fetched for one named category.
#[derive(Debug, Clone)]
pub struct CategoryBatch {
    pub name: String,
    pub records: Vec<RawRecord>,
}

/// Collects across several categories into one combined sequence.
///
/// Each category contributes at most `cap / categories` deals (at least one),
/// and the combined total never exceeds `cap`. Batches can be added as they
/// are fetched; [`is_full`](Self::is_full) tells the caller when further
/// fetching is pointless.
#[derive(Debug)]
pub struct CategoryCollector<'a> {
    policy: ExtractionPolicy,
    cap: usize,
    per_category: usize,
    config: &'a ExtractConfig,
    deals: Vec<Deal>,
    stats: RunStats,
}

impl<'a> CategoryCollector<'a> {
    /// # Errors
    ///
    /// Returns [`CollectError::InvalidCap`] if `cap` is zero and
    /// [`CollectError::NoCategories`] if `categories` is zero.
    pub fn new(
        policy: ExtractionPolicy,
        cap: usize,
        categories: usize,
        config: &'a ExtractConfig,
    ) -> Result<Self, CollectError> {
        if cap == 0 {
            return Err(CollectError::InvalidCap);
        }
        if categories == 0 {
            return Err(CollectError::NoCategories);
        }
        Ok(Self {
            policy,
            cap,
            per_category: (cap / categories).max(1),
            config,
            deals: Vec::with_capacity(cap),
            stats: RunStats::default(),
        })
    }

    #[must_use]
    pub fn per_category(&self) -> usize {
        self.per_category
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.deals.len() >= self.cap
    }

    #[must_use]
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Extracts one category's records, tags accepted deals with the category
    /// name, and returns how many were added.
    pub fn add_batch(&mut self, batch: CategoryBatch) -> usize {
        let remaining = self.cap.saturating_sub(self.deals.len());
        let limit = self.per_category.min(remaining);
        let mut accepted = extract_until(
            batch.records,
            self.policy,
            self.config,
            limit,
            &mut self.stats,
        );
        for deal in &mut accepted {
            deal.category = Some(batch.name.clone());
        }
        let added = accepted.len();
        tracing::info!(category = %batch.name, added, "category collected");
        self.deals.extend(accepted);
        added
    }

    #[must_use]
    pub fn finish(self, source_tag: &str) -> DealSnapshot {
        log_summary(self.stats, source_tag);
        DealSnapshot::new(self.deals, Some(source_tag.to_string()))
    }
}

/// Collects already-fetched category batches in order.
///
/// # Errors
///
/// Returns [`CollectError::InvalidCap`] if `cap` is zero and
/// [`CollectError::NoCategories`] if `batches` is empty.
pub fn collect_categories(
    batches: Vec<CategoryBatch>,
    policy: ExtractionPolicy,
    cap: usize,
    source_tag: &str,
    config: &ExtractConfig,
) -> Result<DealSnapshot, CollectError> {
    let mut collector = CategoryCollector::new(policy, cap, batches.len(), config)?;
    for batch in batches {
        if collector.is_full() {
            break;
        }
        collector.add_batch(batch);
    }
    Ok(collector.finish(source_tag))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(n: usize) -> RawRecord {
        RawRecord::from(json!({
            "asin": format!("B{n:09}"),
            "item_info": {"title": {"display_value": format!("Product {n}")}},
            "detail_page_url": format!("https://www.amazon.com/dp/B{n:09}"),
            "offers": {"listings": [{
                "price": {"amount": 80.0},
                "saving_basis": {"amount": 100.0}
            }]}
        }))
    }

    fn untitled() -> RawRecord {
        RawRecord::from(json!({"asin": "B000000000"}))
    }

    fn asins(snapshot: &DealSnapshot) -> Vec<String> {
        snapshot
            .products
            .iter()
            .map(|d| d.asin.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn cap_keeps_first_acceptable_records_in_order() {
        let records: Vec<RawRecord> = (0..50).map(record).collect();
        let snapshot = collect(
            records,
            ExtractionPolicy::StrictDeal,
            20,
            "catalog_api",
            &ExtractConfig::default(),
        )
        .unwrap();

        assert_eq!(snapshot.total_deals, 20);
        assert_eq!(snapshot.products.len(), 20);
        let expected: Vec<String> = (0..20).map(|n| format!("B{n:09}")).collect();
        assert_eq!(asins(&snapshot), expected);
        assert_eq!(snapshot.source.as_deref(), Some("catalog_api"));
    }

    #[test]
    fn stops_pulling_records_once_cap_reached() {
        let mut pulled = 0;
        let records = (0..50).map(|n| {
            pulled += 1;
            record(n)
        });
        let snapshot = collect(
            records,
            ExtractionPolicy::Catalog,
            5,
            "test",
            &ExtractConfig::default(),
        )
        .unwrap();
        assert_eq!(snapshot.total_deals, 5);
        assert_eq!(pulled, 5);
    }

    #[test]
    fn rejected_records_are_skipped() {
        let records = vec![
            untitled(),
            record(1),
            RawRecord::from(json!("garbage")),
            untitled(),
            record(2),
        ];
        let snapshot = collect(
            records,
            ExtractionPolicy::Catalog,
            10,
            "test",
            &ExtractConfig::default(),
        )
        .unwrap();
        assert_eq!(asins(&snapshot), vec!["B000000001", "B000000002"]);
    }

    #[test]
    fn empty_run_yields_empty_snapshot() {
        let snapshot = collect(
            vec![untitled(), untitled()],
            ExtractionPolicy::Catalog,
            10,
            "test",
            &ExtractConfig::default(),
        )
        .unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.total_deals, 0);
    }

    #[test]
    fn zero_cap_is_an_error() {
        let err = collect(
            vec![record(1)],
            ExtractionPolicy::Catalog,
            0,
            "test",
            &ExtractConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CollectError::InvalidCap));
    }

    fn batch(name: &str, range: std::ops::Range<usize>) -> CategoryBatch {
        CategoryBatch {
            name: name.to_string(),
            records: range.map(record).collect(),
        }
    }

    #[test]
    fn categories_share_cap_and_tag_deals() {
        let batches = vec![
            batch("Electronics", 0..10),
            batch("Home & Kitchen", 100..110),
            batch("Books", 200..210),
        ];
        let snapshot = collect_categories(
            batches,
            ExtractionPolicy::Catalog,
            9,
            "web_scraper",
            &ExtractConfig::default(),
        )
        .unwrap();

        assert_eq!(snapshot.total_deals, 9);
        let categories: Vec<&str> = snapshot
            .products
            .iter()
            .map(|d| d.category.as_deref().unwrap_or(""))
            .collect();
        assert_eq!(
            categories,
            vec![
                "Electronics",
                "Electronics",
                "Electronics",
                "Home & Kitchen",
                "Home & Kitchen",
                "Home & Kitchen",
                "Books",
                "Books",
                "Books",
            ]
        );
        assert_eq!(snapshot.products[3].asin.as_deref(), Some("B000000100"));
    }

    #[test]
    fn sub_cap_uses_floor_division() {
        let config = ExtractConfig::default();
        let collector = CategoryCollector::new(ExtractionPolicy::Catalog, 20, 3, &config).unwrap();
        assert_eq!(collector.per_category(), 6);
    }

    #[test]
    fn sub_cap_is_at_least_one() {
        let config = ExtractConfig::default();
        let collector = CategoryCollector::new(ExtractionPolicy::Catalog, 2, 3, &config).unwrap();
        assert_eq!(collector.per_category(), 1);
    }

    #[test]
    fn global_cap_applies_across_categories() {
        let config = ExtractConfig::default();
        let mut collector =
            CategoryCollector::new(ExtractionPolicy::Catalog, 2, 3, &config).unwrap();
        assert_eq!(collector.add_batch(batch("A", 0..5)), 1);
        assert_eq!(collector.add_batch(batch("B", 10..15)), 1);
        assert!(collector.is_full());
        assert_eq!(collector.add_batch(batch("C", 20..25)), 0);
        let snapshot = collector.finish("web_scraper");
        assert_eq!(snapshot.total_deals, 2);
    }

    #[test]
    fn short_category_does_not_borrow_from_others() {
        let batches = vec![batch("A", 0..1), batch("B", 10..20)];
        let snapshot = collect_categories(
            batches,
            ExtractionPolicy::Catalog,
            10,
            "web_scraper",
            &ExtractConfig::default(),
        )
        .unwrap();
        assert_eq!(snapshot.total_deals, 6);
    }

    #[test]
    fn collector_tracks_stats() {
        let config = ExtractConfig::default();
        let mut collector =
            CategoryCollector::new(ExtractionPolicy::Catalog, 10, 1, &config).unwrap();
        collector.add_batch(CategoryBatch {
            name: "A".to_string(),
            records: vec![untitled(), record(1), untitled()],
        });
        assert_eq!(
            collector.stats(),
            RunStats {
                examined: 3,
                accepted: 1,
                rejected: 2
            }
        );
    }

    #[test]
    fn no_categories_is_an_error() {
        let err = collect_categories(
            vec![],
            ExtractionPolicy::Scrape,
            10,
            "web_scraper",
            &ExtractConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CollectError::NoCategories));
    }
}
