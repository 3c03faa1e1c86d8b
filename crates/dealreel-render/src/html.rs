//! Static HTML deals page.

use std::fmt::Write as _;

use chrono::Datelike;
use dealreel_core::{Deal, DealSnapshot};

const STYLE: &str = r"
        :root {
            --primary-color: #232f3e;
            --accent-color: #febd69;
            --text-color: #111;
            --bg-color: #f3f3f3;
            --card-bg: #fff;
        }
        body {
            font-family: 'Inter', -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background-color: var(--bg-color);
            color: var(--text-color);
            line-height: 1.6;
            margin: 0;
        }
        .container { max-width: 800px; margin: 0 auto; padding: 20px; }
        header {
            background-color: var(--primary-color);
            color: white;
            padding: 40px 20px;
            text-align: center;
            margin-bottom: 30px;
        }
        h1 { margin: 0; font-size: 2.5rem; color: var(--accent-color); }
        .timestamp { font-size: 0.9rem; opacity: 0.8; margin-top: 10px; }
        .product-card {
            background-color: var(--card-bg);
            border-radius: 8px;
            padding: 30px;
            margin-bottom: 30px;
            box-shadow: 0 4px 15px rgba(0,0,0,0.05);
        }
        .product-title { font-size: 1.5rem; margin: 0 0 20px; color: var(--primary-color); }
        .product-image { max-width: 100%; height: auto; display: block; margin: 0 auto 20px; }
        .price-section { margin: 20px 0; font-size: 1.2rem; }
        .current-price { font-weight: bold; color: #b12704; font-size: 1.5rem; }
        .savings { color: #565959; font-size: 0.9rem; margin-left: 10px; }
        .btn-container { text-align: center; margin-top: 30px; }
        .view-offer-btn {
            background-color: var(--accent-color);
            color: var(--text-color);
            padding: 12px 30px;
            text-decoration: none;
            border-radius: 50px;
            font-weight: bold;
            display: inline-block;
            border: 1px solid #a88734;
        }
        footer { text-align: center; padding: 40px 20px; color: #666; font-size: 0.9rem; }
";

/// Escapes text for use in element content and double-quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Renders the snapshot as a self-contained HTML page, one card per deal in
/// snapshot order.
#[must_use]
pub fn render_html(snapshot: &DealSnapshot) -> String {
    let updated = snapshot
        .fetch_timestamp
        .format("%B %d, %Y - %I:%M %p")
        .to_string();

    let mut page = String::new();
    // Writing to a String cannot fail.
    let _ = write!(
        page,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Amazon Deals Blog</title>
    <style>{STYLE}    </style>
</head>
<body>
    <header>
        <div class="container">
            <h1>Today's Best Amazon Deals</h1>
            <div class="timestamp">Last updated: {updated}</div>
        </div>
    </header>

    <div class="container">
"#
    );

    for deal in &snapshot.products {
        page.push_str(&render_card(deal));
    }

    let year = snapshot.fetch_timestamp.year();
    let _ = write!(
        page,
        r#"    </div>

    <footer>
        <div class="container">
            <p>&copy; {year} Amazon Deals Blog. All rights reserved.</p>
            <p>As an Amazon Associate I earn from qualifying purchases.</p>
        </div>
    </footer>
</body>
</html>
"#
    );

    page
}

fn render_card(deal: &Deal) -> String {
    let title = escape_html(deal.title.as_deref().unwrap_or("Amazon Product"));
    let image_url = escape_html(deal.image_url.as_deref().unwrap_or_default());
    let product_url = escape_html(deal.product_url.as_deref().unwrap_or("#"));
    let price = escape_html(
        deal.current_price
            .as_deref()
            .unwrap_or("Price not available"),
    );
    let savings = deal
        .savings_percentage
        .as_deref()
        .map(|pct| format!(r#"<span class="savings">({} OFF)</span>"#, escape_html(pct)))
        .unwrap_or_default();

    format!(
        r#"
        <article class="product-card">
            <h2 class="product-title">{title}</h2>
            <img src="{image_url}" alt="{title}" class="product-image">
            <div class="price-section">
                <span class="current-price">{price}</span>
                {savings}
            </div>
            <div class="btn-container">
                <a href="{product_url}" target="_blank" rel="noopener" class="view-offer-btn">View Offer on Amazon</a>
            </div>
        </article>
"#
    )
}
