//! Product-card extraction from category listing pages.
//!
//! Listing pages (Best Sellers, New Releases) render products in one of a few
//! grid layouts. The grid selectors are tried in order and the first one that
//! matches anything wins; each matched element is then read as one card.
//! Nothing is parsed or validated here: cards carry raw rendered text and the
//! extractor decides what survives.

use dealreel_extract::url::absolutize;
use dealreel_extract::{CardImage, ScrapedCard};
use scraper::{ElementRef, Html, Selector};

/// Card container selectors, most specific first.
pub const GRID_SELECTORS: &[&str] = &[
    "div.zg-grid-general-faceout",
    "div[id*='p13n-asin-index']",
    "div[class*='_p13n-zg-list-grid-desktop_truncation_']",
    "div[class*='p13n-sc-uncoverable-faceout']",
    ".a-section.a-spacing-none.aok-relative",
];

const PRICE_SELECTORS: &[&str] = &[
    "span.p13n-sc-price, span._cDEzb_p13n-sc-price_3mJ9Z",
    "[data-testid='deal-price']",
    "span[class*='price']",
];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

struct CardSelectors {
    link: Selector,
    image: Selector,
    title: Selector,
    prices: Vec<Selector>,
    list_price: Selector,
    badge: Selector,
    prime: Selector,
}

impl CardSelectors {
    fn new() -> Self {
        Self {
            link: selector("a[href*='/dp/']"),
            image: selector("img"),
            title: selector("div[class*='_p13n-zg-list-grid-desktop_truncation_']"),
            prices: PRICE_SELECTORS.iter().map(|css| selector(css)).collect(),
            list_price: selector("span.a-text-price"),
            badge: selector("[data-testid='deal-badge-price'], span.savingsPercentage"),
            prime: selector("[aria-label*='Prime']"),
        }
    }
}

/// Parses every product card on a listing page.
///
/// Relative product links are resolved against `page_url`.
#[must_use]
pub fn parse_cards(html: &str, page_url: &str) -> Vec<ScrapedCard> {
    let document = Html::parse_document(html);
    let selectors = CardSelectors::new();

    for css in GRID_SELECTORS {
        let grid = selector(css);
        let cards: Vec<ScrapedCard> = document
            .select(&grid)
            .map(|element| read_card(element, &selectors, page_url))
            .collect();
        if !cards.is_empty() {
            tracing::debug!(selector = css, count = cards.len(), "matched product grid");
            return cards;
        }
    }

    tracing::debug!(page_url, "no product grid matched");
    Vec::new()
}

fn first<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// Rendered text with whitespace runs collapsed; `None` when blank.
fn text_of(element: ElementRef<'_>) -> Option<String> {
    let text = element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn read_card(element: ElementRef<'_>, selectors: &CardSelectors, page_url: &str) -> ScrapedCard {
    ScrapedCard {
        href: first(element, &selectors.link)
            .and_then(|link| attr(link, "href"))
            .map(|href| absolutize(&href, page_url)),
        image: first(element, &selectors.image).map(|img| CardImage {
            src: attr(img, "src"),
            alt: attr(img, "alt"),
        }),
        title_text: first(element, &selectors.title).and_then(text_of),
        price_text: selectors
            .prices
            .iter()
            .find_map(|sel| first(element, sel))
            .and_then(text_of),
        list_price_text: first(element, &selectors.list_price).and_then(text_of),
        badge_text: first(element, &selectors.badge).and_then(text_of),
        prime_badge: first(element, &selectors.prime).is_some(),
    }
}
