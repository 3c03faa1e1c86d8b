use serde::{Deserialize, Serialize};

/// The canonical deal record shared by every pipeline stage.
///
/// All price-like fields are pre-formatted display strings. Renderers format
/// them further but never re-derive them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    /// Catalog identifier (ASIN), e.g. `"B09B8V1LZ3"`.
    pub asin: Option<String>,
    pub title: Option<String>,
    /// Display price, e.g. `"$22.99"`.
    pub current_price: Option<String>,
    /// Pre-discount reference price, e.g. `"$49.99"`.
    pub original_price: Option<String>,
    /// Derived `"CURRENCY AMOUNT"` string, e.g. `"USD 27.00"`.
    pub savings: Option<String>,
    /// Derived or badge-sourced `"NN%"` string.
    pub savings_percentage: Option<String>,
    /// ISO 4217 code, e.g. `"USD"`.
    pub currency: Option<String>,
    #[serde(default)]
    pub is_prime_eligible: bool,
    /// Promotions in source order.
    #[serde(default)]
    pub promotions: Vec<Promotion>,
    pub image_url: Option<String>,
    /// Product page URL carrying the affiliate tag.
    pub product_url: Option<String>,
    /// Set only for deals collected in multi-category scrape mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Deal {
    /// Returns `true` if the deal carries derived savings or any promotion.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.savings.is_some() || !self.promotions.is_empty()
    }
}

/// A promotion attached to a listing, e.g. a coupon or lightning deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    /// Promotion kind as reported by the source; `"Unknown"` when absent.
    #[serde(rename = "type")]
    pub kind: String,
    /// Discount as `"NN%"`, when the source reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_deal() -> Deal {
        Deal {
            asin: Some("B09B8V1LZ3".to_string()),
            title: Some("Echo Dot (5th Gen)".to_string()),
            current_price: Some("$22.99".to_string()),
            original_price: Some("$49.99".to_string()),
            savings: Some("USD 27.00".to_string()),
            savings_percentage: Some("54%".to_string()),
            currency: Some("USD".to_string()),
            is_prime_eligible: true,
            promotions: vec![],
            image_url: Some("https://m.media-amazon.com/images/I/echo.jpg".to_string()),
            product_url: Some("https://www.amazon.com/dp/B09B8V1LZ3?tag=foo-20".to_string()),
            category: None,
        }
    }

    #[test]
    fn has_discount_true_with_savings() {
        assert!(make_deal().has_discount());
    }

    #[test]
    fn has_discount_true_with_promotion_only() {
        let mut deal = make_deal();
        deal.savings = None;
        deal.promotions.push(Promotion {
            kind: "Coupon".to_string(),
            discount: Some("10%".to_string()),
        });
        assert!(deal.has_discount());
    }

    #[test]
    fn has_discount_false_without_savings_or_promotions() {
        let mut deal = make_deal();
        deal.savings = None;
        assert!(!deal.has_discount());
    }

    #[test]
    fn category_is_omitted_when_absent() {
        let json = serde_json::to_value(make_deal()).unwrap();
        assert!(json.get("category").is_none());
        assert!(json.get("asin").is_some());
    }

    #[test]
    fn absent_fields_serialize_as_null() {
        let mut deal = make_deal();
        deal.original_price = None;
        let json = serde_json::to_value(deal).unwrap();
        assert!(json["original_price"].is_null());
    }

    #[test]
    fn promotion_uses_type_key() {
        let promo = Promotion {
            kind: "Lightning".to_string(),
            discount: None,
        };
        let json = serde_json::to_string(&promo).unwrap();
        assert_eq!(json, r#"{"type":"Lightning"}"#);
    }

    #[test]
    fn deserializes_minimal_record_with_defaults() {
        let deal: Deal = serde_json::from_str(r#"{"title": "Widget"}"#).unwrap();
        assert_eq!(deal.title.as_deref(), Some("Widget"));
        assert!(!deal.is_prime_eligible);
        assert!(deal.promotions.is_empty());
        assert!(deal.category.is_none());
    }
}
