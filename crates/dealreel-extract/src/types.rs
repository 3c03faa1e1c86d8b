//! Typed raw records produced by the source adapters.
//!
//! These mirror the structures the adapters receive from the wire, not the
//! canonical [`dealreel_core::Deal`]. Every field is optional: catalog
//! responses routinely omit offers, images and titles for individual items,
//! and scraped cards are missing whatever the page layout did not render.
//!
//! Each type also implements [`Lookup`] under the same field names its JSON
//! form uses, so the extractor treats a typed record and a string-keyed
//! mapping identically.

use serde::Deserialize;

use crate::record::{AsField, Field, Lookup};

/// Implements [`Lookup`] and [`AsField`] for a struct, mapping lookup keys to
/// struct fields.
macro_rules! impl_lookup {
    ($ty:ty { $($key:literal => $field:ident),* $(,)? }) => {
        impl Lookup for $ty {
            fn field(&self, name: &str) -> Option<Field<'_>> {
                match name {
                    $($key => self.$field.as_field(),)*
                    _ => None,
                }
            }
        }

        impl AsField for $ty {
            fn as_field(&self) -> Option<Field<'_>> {
                Some(Field::Node(self))
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Catalog API item
// ---------------------------------------------------------------------------

/// One item from a catalog search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiItem {
    #[serde(default)]
    pub asin: Option<String>,
    #[serde(default)]
    pub item_info: Option<ItemInfo>,
    #[serde(default)]
    pub images: Option<Images>,
    #[serde(default)]
    pub detail_page_url: Option<String>,
    #[serde(default)]
    pub offers: Option<Offers>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemInfo {
    #[serde(default)]
    pub title: Option<TitleInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleInfo {
    #[serde(default)]
    pub display_value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Images {
    #[serde(default)]
    pub primary: Option<ImageSet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageSet {
    #[serde(default)]
    pub large: Option<ImageRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Offers {
    #[serde(default)]
    pub listings: Vec<Listing>,
}

/// One offer listing. Only the first listing of an item is ever read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub price: Option<ListingPrice>,
    /// The reference price the current price is discounted from.
    #[serde(default)]
    pub saving_basis: Option<ListingPrice>,
    #[serde(default)]
    pub delivery_info: Option<DeliveryInfo>,
    #[serde(default)]
    pub promotions: Vec<ListingPromotion>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingPrice {
    /// Pre-formatted price, e.g. `"$22.99"`.
    #[serde(default)]
    pub display_amount: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliveryInfo {
    #[serde(default)]
    pub is_prime_eligible: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingPromotion {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub discount_percent: Option<f64>,
}

impl_lookup!(ApiItem {
    "asin" => asin,
    "item_info" => item_info,
    "images" => images,
    "detail_page_url" => detail_page_url,
    "offers" => offers,
});
impl_lookup!(ItemInfo { "title" => title });
impl_lookup!(TitleInfo { "display_value" => display_value });
impl_lookup!(Images { "primary" => primary });
impl_lookup!(ImageSet { "large" => large });
impl_lookup!(ImageRef { "url" => url });
impl_lookup!(Offers { "listings" => listings });
impl_lookup!(Listing {
    "price" => price,
    "saving_basis" => saving_basis,
    "delivery_info" => delivery_info,
    "promotions" => promotions,
});
impl_lookup!(ListingPrice {
    "display_amount" => display_amount,
    "amount" => amount,
    "currency" => currency,
});
impl_lookup!(DeliveryInfo { "is_prime_eligible" => is_prime_eligible });
impl_lookup!(ListingPromotion {
    "type" => kind,
    "discount_percent" => discount_percent,
});

// ---------------------------------------------------------------------------
// Scraped listing-page card
// ---------------------------------------------------------------------------

/// One product card lifted from a category listing page.
///
/// Text fields hold the raw rendered text; nothing is parsed at scrape time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrapedCard {
    /// Absolute product link.
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub image: Option<CardImage>,
    #[serde(default)]
    pub title_text: Option<String>,
    /// e.g. `"$24.99"`.
    #[serde(default)]
    pub price_text: Option<String>,
    #[serde(default)]
    pub list_price_text: Option<String>,
    /// Discount badge, e.g. `"50% off"`.
    #[serde(default)]
    pub badge_text: Option<String>,
    #[serde(default)]
    pub prime_badge: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardImage {
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

impl_lookup!(ScrapedCard {
    "href" => href,
    "image" => image,
    "title_text" => title_text,
    "price_text" => price_text,
    "list_price_text" => list_price_text,
    "badge_text" => badge_text,
    "prime_badge" => prime_badge,
});
impl_lookup!(CardImage { "src" => src, "alt" => alt });

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::record::get_path;

    #[test]
    fn api_item_deserializes_full_shape() {
        let item: ApiItem = serde_json::from_value(json!({
            "asin": "B09B8V1LZ3",
            "item_info": {"title": {"display_value": "Echo Dot"}},
            "images": {"primary": {"large": {"url": "https://m.media-amazon.com/a.jpg"}}},
            "detail_page_url": "https://www.amazon.com/dp/B09B8V1LZ3",
            "offers": {"listings": [{
                "price": {"display_amount": "$22.99", "amount": 22.99, "currency": "USD"},
                "saving_basis": {"display_amount": "$49.99", "amount": 49.99},
                "delivery_info": {"is_prime_eligible": true},
                "promotions": [{"type": "Coupon", "discount_percent": 10}]
            }]}
        }))
        .unwrap();

        assert_eq!(item.asin.as_deref(), Some("B09B8V1LZ3"));
        let listing = &item.offers.as_ref().unwrap().listings[0];
        assert_eq!(listing.promotions[0].kind.as_deref(), Some("Coupon"));
        assert_eq!(listing.promotions[0].discount_percent, Some(10.0));
    }

    #[test]
    fn api_item_tolerates_empty_object() {
        let item: ApiItem = serde_json::from_value(json!({})).unwrap();
        assert!(item.asin.is_none());
        assert!(item.offers.is_none());
        assert!(get_path(&item, "offers.listings.0.price.amount").is_none());
    }

    #[test]
    fn promotion_kind_is_looked_up_as_type() {
        let promo = ListingPromotion {
            kind: Some("Lightning".to_string()),
            discount_percent: None,
        };
        let kind = promo.field("type").and_then(|f| f.text());
        assert_eq!(kind.as_deref(), Some("Lightning"));
        assert!(promo.field("kind").is_none());
    }

    #[test]
    fn card_lookup_reaches_nested_image() {
        let card = ScrapedCard {
            image: Some(CardImage {
                src: Some("https://img/x.jpg".to_string()),
                alt: Some("Wireless Earbuds".to_string()),
            }),
            prime_badge: true,
            ..ScrapedCard::default()
        };
        let alt = get_path(&card, "image.alt").and_then(|f| f.text());
        assert_eq!(alt.as_deref(), Some("Wireless Earbuds"));
        assert_eq!(card.field("prime_badge").and_then(|f| f.flag()), Some(true));
        assert!(get_path(&card, "price_text").is_none());
    }
}
