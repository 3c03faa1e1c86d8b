//! Upload metadata for the daily deals video.

use chrono::NaiveDate;
use dealreel_core::DealSnapshot;
use serde::{Deserialize, Serialize};

const VIDEO_TAGS: [&str; 4] = ["amazon deals", "discounts", "shopping", "best buy"];

/// Title, description, and publishing fields handed to the uploader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    /// Video platform category; `"22"` is People & Blogs.
    pub category_id: String,
    pub privacy_status: String,
}

/// Builds metadata for the video published on `date`.
///
/// Deals without a product URL are left out of the description, but the
/// numbering keeps each deal's position in the snapshot so it matches the
/// slide order.
#[must_use]
pub fn build_metadata(snapshot: &DealSnapshot, date: NaiveDate) -> VideoMetadata {
    let day = date.format("%Y-%m-%d").to_string();

    let mut lines = vec![
        format!("Check out today's best Amazon deals! ({day})"),
        String::new(),
        "Prices and availability are subject to change.".to_string(),
        "As an Amazon Associate I earn from qualifying purchases.".to_string(),
        String::new(),
        "🔥 TODAY'S DEALS 🔥".to_string(),
        String::new(),
    ];

    for (i, deal) in snapshot.products.iter().enumerate() {
        let Some(link) = deal.product_url.as_deref().filter(|l| !l.is_empty()) else {
            continue;
        };
        let title = deal.title.as_deref().unwrap_or("Amazon Deal");
        lines.push(format!("{}. {title}", i + 1));
        lines.push(link.to_string());
        lines.push(String::new());
    }

    lines.push("#AmazonDeals #Shopping #Discounts".to_string());

    VideoMetadata {
        title: format!("Today Top Amazon Deals - {day} #Amazon #AmazonOffers"),
        description: lines.join("\n"),
        tags: VIDEO_TAGS.iter().map(ToString::to_string).collect(),
        category_id: "22".to_string(),
        privacy_status: "private".to_string(),
    }
}
