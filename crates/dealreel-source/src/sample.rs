//! Synthetic catalog records for running the pipeline without network access.

use dealreel_extract::RawRecord;
use serde_json::json;

/// `(title, asin, current price, list price)`
const SAMPLE_PRODUCTS: &[(&str, &str, &str, &str)] = &[
    ("Echo Dot (5th Gen) Smart Speaker with Alexa", "B09B8V1LZ3", "$22.99", "$49.99"),
    ("Fire TV Stick 4K streaming device", "B0BP9SNVH9", "$24.99", "$49.99"),
    ("Kindle Paperwhite (16 GB) - Now with a 6.8\" display", "B08KTZ8249", "$99.99", "$149.99"),
    ("Apple AirPods Pro (2nd Generation)", "B0CHWRXH8B", "$189.99", "$249.00"),
    ("Samsung 65-Inch Class QLED 4K Q60C Series", "B0C1JT6SG9", "$697.99", "$1,099.99"),
    ("Sony WH-1000XM5 Wireless Noise Canceling Headphones", "B09XS7JWHH", "$328.00", "$399.99"),
    ("Instant Pot Duo 7-in-1 Electric Pressure Cooker", "B00FLYWNYQ", "$79.00", "$119.99"),
    ("Ninja AF101 Air Fryer, 4 Qt", "B07VH9HWC4", "$69.99", "$119.99"),
    ("Fitbit Charge 6 Fitness Tracker", "B0CC6DW6CT", "$129.95", "$159.95"),
    ("Bose QuietComfort Earbuds II", "B0B4PSKLZ4", "$199.00", "$299.00"),
    ("Dyson V8 Cordless Vacuum Cleaner", "B0B3YQNZ2K", "$349.99", "$469.99"),
    ("Keurig K-Mini Coffee Maker, Single Serve", "B07GV2S1GS", "$59.99", "$99.99"),
    ("Anker PowerCore 10000 Portable Charger", "B0194WDVHI", "$19.99", "$29.99"),
    ("Logitech MX Master 3S Wireless Mouse", "B09HM94VDS", "$79.99", "$99.99"),
    ("Philips Sonicare ProtectiveClean 4100 Electric Toothbrush", "B078GVMVRH", "$29.96", "$49.96"),
];

/// Number of distinct sample products available.
pub const SAMPLE_CAPACITY: usize = SAMPLE_PRODUCTS.len();

/// Returns up to `count` catalog-shaped mapping records.
///
/// Prime eligibility alternates, starting with eligible. Prices are given as
/// display strings only, so amounts are recovered by the extractor.
#[must_use]
pub fn sample_records(count: usize) -> Vec<RawRecord> {
    SAMPLE_PRODUCTS
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, (title, asin, price, basis))| {
            RawRecord::from(json!({
                "asin": asin,
                "item_info": {"title": {"display_value": title}},
                "images": {"primary": {"large": {
                    "url": format!("https://m.media-amazon.com/images/I/placeholder-{asin}.jpg")
                }}},
                "detail_page_url": format!("https://www.amazon.com/dp/{asin}"),
                "offers": {"listings": [{
                    "price": {"display_amount": price, "currency": "USD"},
                    "saving_basis": {"display_amount": basis},
                    "delivery_info": {"is_prime_eligible": i % 2 == 0},
                    "promotions": []
                }]}
            }))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use dealreel_extract::{extract, ExtractConfig, ExtractionPolicy};

    use super::*;

    #[test]
    fn count_is_capped_at_capacity() {
        assert_eq!(sample_records(5).len(), 5);
        assert_eq!(sample_records(100).len(), SAMPLE_CAPACITY);
        assert!(sample_records(0).is_empty());
    }

    #[test]
    fn every_sample_is_a_strict_deal() {
        let config = ExtractConfig::default();
        for record in sample_records(SAMPLE_CAPACITY) {
            let deal = extract(&record, ExtractionPolicy::StrictDeal, &config)
                .expect("sample should be accepted");
            assert!(deal.savings.is_some());
        }
    }

    #[test]
    fn prime_alternates() {
        let config = ExtractConfig::default();
        let prime: Vec<bool> = sample_records(4)
            .iter()
            .map(|r| extract(r, ExtractionPolicy::Catalog, &config).unwrap().is_prime_eligible)
            .collect();
        assert_eq!(prime, vec![true, false, true, false]);
    }

    #[test]
    fn first_sample_derives_expected_savings() {
        let config = ExtractConfig::default();
        let deal = extract(&sample_records(1)[0], ExtractionPolicy::StrictDeal, &config).unwrap();
        assert_eq!(deal.savings.as_deref(), Some("USD 27.00"));
        assert_eq!(deal.savings_percentage.as_deref(), Some("54%"));
    }
}
