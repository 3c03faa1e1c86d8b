//! The Deal Extractor: one raw record in, one canonical [`Deal`] or a
//! [`Rejection`] out.
//!
//! Every field is read through an independent `Option`-returning lookup, so
//! a missing branch anywhere in the record only blanks the fields beneath
//! it. Acceptance is decided once, at the end, by the [`ExtractionPolicy`].

use dealreel_core::{AppConfig, Deal, Promotion};
use rust_decimal::Decimal;

use crate::error::Rejection;
use crate::price::{
    derive_forward, derive_inverse, format_percent, format_price, format_savings, parse_percent,
    parse_price, Savings,
};
use crate::record::{get_path, Field, Lookup, RawRecord};
use crate::url::{extract_asin, normalize_product_url};

const DEFAULT_CURRENCY: &str = "USD";

/// Which records are kept, and which source shape they are read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionPolicy {
    /// Catalog-shaped records; keep only items with savings or promotions.
    StrictDeal,
    /// Catalog-shaped records; keep any item with an ASIN and a title.
    Catalog,
    /// Scraped cards; keep items with a title, a link, and a price or badge.
    Scrape,
}

/// Direction of savings derivation, named by which input is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Derivation {
    /// Current and basis prices are known; savings and percent follow.
    Forward,
    /// Current price and discount percent are known; the basis follows.
    Inverse,
}

impl ExtractionPolicy {
    /// Derivations attempted for this policy, highest priority first.
    /// The first one that yields a valid result wins.
    #[must_use]
    pub fn derivations(self) -> &'static [Derivation] {
        match self {
            ExtractionPolicy::StrictDeal | ExtractionPolicy::Catalog => &[Derivation::Forward],
            ExtractionPolicy::Scrape => &[Derivation::Forward, Derivation::Inverse],
        }
    }

    fn accept(self, deal: &Deal) -> Result<(), Rejection> {
        if deal.title.is_none() {
            return Err(Rejection::MissingTitle);
        }
        match self {
            ExtractionPolicy::StrictDeal => {
                if !deal.has_discount() {
                    return Err(Rejection::NoDiscount);
                }
            }
            ExtractionPolicy::Catalog => {
                if deal.asin.is_none() {
                    return Err(Rejection::MissingAsin);
                }
            }
            ExtractionPolicy::Scrape => {
                if deal.product_url.is_none() {
                    return Err(Rejection::MissingProductUrl);
                }
                if deal.current_price.is_none() && deal.savings_percentage.is_none() {
                    return Err(Rejection::NoPriceSignal);
                }
            }
        }
        Ok(())
    }
}

/// Run-level settings the extractor needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Affiliate tag appended to product URLs; `None` leaves URLs untouched.
    pub partner_tag: Option<String>,
    /// Currency assumed when the record does not state one.
    pub default_currency: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            partner_tag: None,
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl ExtractConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            partner_tag: config.partner_tag.clone(),
            default_currency: config.default_currency.clone(),
        }
    }
}

/// Extracts one canonical deal from `record`.
///
/// # Errors
///
/// Returns a [`Rejection`] when the record cannot be traversed at all or the
/// extracted deal does not satisfy `policy`.
pub fn extract(
    record: &RawRecord,
    policy: ExtractionPolicy,
    config: &ExtractConfig,
) -> Result<Deal, Rejection> {
    if let Some(defect) = record.structural_defect() {
        return Err(Rejection::Malformed(defect));
    }

    let view = record.view();
    let deal = match policy {
        ExtractionPolicy::StrictDeal | ExtractionPolicy::Catalog => {
            read_catalog_item(view, policy, config)
        }
        ExtractionPolicy::Scrape => read_scraped_card(view, policy, config),
    };

    policy.accept(&deal)?;
    Ok(deal)
}

fn text_at(root: &dyn Lookup, path: &str) -> Option<String> {
    get_path(root, path).and_then(|f| f.text())
}

fn number_at(root: &dyn Lookup, path: &str) -> Option<Decimal> {
    get_path(root, path).and_then(|f| f.number())
}

fn flag_at(root: &dyn Lookup, path: &str) -> Option<bool> {
    get_path(root, path).and_then(|f| f.flag())
}

/// Price pair and badge feeding [`derive`].
struct PriceSignals {
    price: Option<Decimal>,
    basis: Option<Decimal>,
    percent: Option<Decimal>,
}

fn derive(policy: ExtractionPolicy, signals: &PriceSignals) -> Option<(Derivation, Savings)> {
    policy
        .derivations()
        .iter()
        .find_map(|&direction| {
            let price = signals.price?;
            let savings = match direction {
                Derivation::Forward => derive_forward(price, signals.basis?),
                Derivation::Inverse => derive_inverse(price, signals.percent?),
            }?;
            Some((direction, savings))
        })
}

fn read_catalog_item(
    view: &dyn Lookup,
    policy: ExtractionPolicy,
    config: &ExtractConfig,
) -> Deal {
    let mut deal = Deal {
        asin: text_at(view, "asin")
            .or_else(|| text_at(view, "detail_page_url").and_then(|url| extract_asin(&url))),
        title: text_at(view, "item_info.title.display_value"),
        image_url: text_at(view, "images.primary.large.url"),
        product_url: text_at(view, "detail_page_url")
            .map(|url| normalize_product_url(&url, config.partner_tag.as_deref())),
        currency: Some(config.default_currency.clone()),
        ..Deal::default()
    };

    // Only the first offer listing carries pricing.
    let Some(Field::Node(listing)) = get_path(view, "offers.listings.0") else {
        return deal;
    };

    if let Some(currency) = text_at(listing, "price.currency") {
        deal.currency = Some(currency);
    }
    let currency = deal.currency.clone().unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let price_display = text_at(listing, "price.display_amount");
    let basis_display = text_at(listing, "saving_basis.display_amount");
    let signals = PriceSignals {
        price: number_at(listing, "price.amount")
            .or_else(|| price_display.as_deref().and_then(parse_price)),
        basis: number_at(listing, "saving_basis.amount")
            .or_else(|| basis_display.as_deref().and_then(parse_price)),
        percent: None,
    };

    deal.current_price = price_display.or_else(|| signals.price.map(|p| format_price(p, &currency)));
    deal.original_price = basis_display.or_else(|| signals.basis.map(|b| format_price(b, &currency)));

    match derive(policy, &signals) {
        Some((_, savings)) => {
            deal.savings = Some(format_savings(savings.amount, &currency));
            deal.savings_percentage = Some(format_percent(savings.percent));
        }
        None if signals.price.is_some() && signals.basis.is_some() => {
            tracing::trace!(asin = ?deal.asin, "basis does not exceed price; no savings derived");
        }
        None => {}
    }

    deal.is_prime_eligible = flag_at(listing, "delivery_info.is_prime_eligible").unwrap_or(false);
    deal.promotions = get_path(listing, "promotions")
        .map(Field::items)
        .unwrap_or_default()
        .into_iter()
        .map(read_promotion)
        .collect();

    deal
}

fn read_promotion(promo: &dyn Lookup) -> Promotion {
    Promotion {
        kind: text_at(promo, "type").unwrap_or_else(|| "Unknown".to_string()),
        discount: number_at(promo, "discount_percent").map(|pct| format!("{}%", pct.normalize())),
    }
}

/// Picks the card title: the first candidate that looks like a real product
/// name, else the first non-empty candidate.
fn choose_title(candidates: &[Option<String>]) -> Option<String> {
    let present = || candidates.iter().flatten();
    present()
        .find(|t| !t.contains("formats available") && t.chars().count() >= 5)
        .or_else(|| present().next())
        .cloned()
}

fn read_scraped_card(
    view: &dyn Lookup,
    policy: ExtractionPolicy,
    config: &ExtractConfig,
) -> Deal {
    let href = text_at(view, "href");
    let currency = config.default_currency.clone();
    let price_text = text_at(view, "price_text");
    let list_price_text = text_at(view, "list_price_text");
    let signals = PriceSignals {
        price: price_text.as_deref().and_then(parse_price),
        basis: list_price_text.as_deref().and_then(parse_price),
        percent: text_at(view, "badge_text").as_deref().and_then(parse_percent),
    };

    let mut deal = Deal {
        asin: href.as_deref().and_then(extract_asin),
        title: choose_title(&[text_at(view, "image.alt"), text_at(view, "title_text")]),
        current_price: price_text,
        // The badge is authoritative for the percentage unless a list price
        // yields a forward derivation below. Unparseable badges are dropped.
        savings_percentage: signals.percent.map(format_percent),
        is_prime_eligible: flag_at(view, "prime_badge").unwrap_or(false),
        image_url: text_at(view, "image.src"),
        product_url: href.map(|url| normalize_product_url(&url, config.partner_tag.as_deref())),
        ..Deal::default()
    };

    match derive(policy, &signals) {
        Some((Derivation::Forward, savings)) => {
            deal.original_price = list_price_text;
            deal.savings = Some(format_savings(savings.amount, &currency));
            deal.savings_percentage = Some(format_percent(savings.percent));
        }
        Some((Derivation::Inverse, savings)) => {
            deal.original_price = Some(format_price(savings.basis, &currency));
            deal.savings = Some(format_savings(savings.amount, &currency));
        }
        None => {
            deal.original_price = list_price_text;
        }
    }
    deal.currency = Some(currency);

    deal
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
