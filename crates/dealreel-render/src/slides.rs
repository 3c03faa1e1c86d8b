//! Slide plan for the external video encoder.
//!
//! The plan is a fully resolved description of every slide: text, font size,
//! color, and pixel position. The encoder composites it as-is; nothing about
//! the deals is decided after this point.

use std::path::Path;

use dealreel_core::{Deal, DealSnapshot};
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

const TITLE_MAX_CHARS: usize = 60;
const TITLE_KEEP_CHARS: usize = 57;

/// Text colors and badge backgrounds, as `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: String,
    pub title: String,
    pub current_price: String,
    pub original_price: String,
    pub savings: String,
    pub badge_background: String,
    pub badge_text: String,
    pub prime_background: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#0F172A".to_string(),
            title: "#FFFFFF".to_string(),
            current_price: "#22C55E".to_string(),
            original_price: "#94A3B8".to_string(),
            savings: "#FBBF24".to_string(),
            badge_background: "#DC2626".to_string(),
            badge_text: "#FFFFFF".to_string(),
            prime_background: "#0F9D58".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizes {
    pub title: u32,
    pub current_price: u32,
    pub original_price: u32,
    pub savings: u32,
    pub badge: u32,
    pub link_text: u32,
    pub prime: u32,
    pub heading: u32,
    pub subheading: u32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            title: 45,
            current_price: 70,
            original_price: 40,
            savings: 30,
            badge: 60,
            link_text: 50,
            prime: 35,
            heading: 80,
            subheading: 50,
        }
    }
}

/// Vertical positions as fractions of the frame height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Positions {
    pub title: f64,
    pub current_price: f64,
    pub original_price: f64,
    pub savings: f64,
    pub badge: f64,
    pub link_text: f64,
    pub heading: f64,
    pub subheading: f64,
}

impl Default for Positions {
    fn default() -> Self {
        Self {
            title: 0.28,
            current_price: 0.52,
            original_price: 0.64,
            savings: 0.77,
            badge: 0.08,
            link_text: 0.92,
            heading: 0.35,
            subheading: 0.55,
        }
    }
}

/// Frame geometry, timing, and styling for the slideshow.
///
/// Every field has a built-in default, so a layout file only needs the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideLayout {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub slide_duration_secs: u32,
    pub intro_duration_secs: u32,
    pub outro_duration_secs: u32,
    pub colors: Palette,
    pub font_sizes: FontSizes,
    pub positions: Positions,
}

impl Default for SlideLayout {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 30,
            slide_duration_secs: 4,
            intro_duration_secs: 3,
            outro_duration_secs: 3,
            colors: Palette::default(),
            font_sizes: FontSizes::default(),
            positions: Positions::default(),
        }
    }
}

impl SlideLayout {
    /// Pixel offset for a fraction of the frame height, rounded down.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn y(&self, fraction: f64) -> u32 {
        (f64::from(self.height) * fraction.clamp(0.0, 1.0)).floor() as u32
    }

    fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::LayoutInvalid(
                "width and height must be greater than zero".to_string(),
            ));
        }
        if self.fps == 0 {
            return Err(RenderError::LayoutInvalid(
                "fps must be greater than zero".to_string(),
            ));
        }
        let p = &self.positions;
        let fractions = [
            p.title,
            p.current_price,
            p.original_price,
            p.savings,
            p.badge,
            p.link_text,
            p.heading,
            p.subheading,
        ];
        if fractions.iter().any(|f| !(0.0..=1.0).contains(f)) {
            return Err(RenderError::LayoutInvalid(
                "positions must be fractions between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads a layout override file; absent keys keep their defaults.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the file cannot be read,
/// [`RenderError::LayoutParse`] if it is not valid YAML, and
/// [`RenderError::LayoutInvalid`] if a value is out of range.
pub fn load_layout(path: &Path) -> Result<SlideLayout, RenderError> {
    let content = std::fs::read_to_string(path).map_err(|e| RenderError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_layout(&content)
}

fn parse_layout(content: &str) -> Result<SlideLayout, RenderError> {
    let layout: SlideLayout = serde_yaml::from_str(content).map_err(RenderError::LayoutParse)?;
    layout.validate()?;
    Ok(layout)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideKind {
    Intro,
    Product,
    Outro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementRole {
    Heading,
    Subheading,
    Title,
    CurrentPrice,
    OriginalPrice,
    Savings,
    Badge,
    Prime,
    LinkHint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "anchor", rename_all = "snake_case")]
pub enum Position {
    /// Horizontally centered, top edge at `y`.
    Centered { y: u32 },
    /// Top-left corner at `(x, y)`.
    Absolute { x: u32, y: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextElement {
    pub role: ElementRole,
    pub text: String,
    pub font_size: u32,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub kind: SlideKind,
    pub duration_secs: u32,
    pub background: String,
    pub elements: Vec<TextElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidePlan {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub total_duration_secs: u32,
    pub slides: Vec<Slide>,
}

/// Shortens titles longer than 60 characters to 57 plus `"..."`.
#[must_use]
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() > TITLE_MAX_CHARS {
        let kept: String = title.chars().take(TITLE_KEEP_CHARS).collect();
        format!("{kept}...")
    } else {
        title.to_string()
    }
}

/// Builds the slide plan: an intro, one slide per deal in snapshot order,
/// and an outro.
#[must_use]
pub fn plan_slides(snapshot: &DealSnapshot, layout: &SlideLayout) -> SlidePlan {
    let mut slides = Vec::with_capacity(snapshot.products.len() + 2);
    slides.push(bookend_slide(
        layout,
        SlideKind::Intro,
        "Amazon Deals",
        "Today's Best Offers",
    ));
    slides.extend(snapshot.products.iter().map(|deal| product_slide(deal, layout)));
    slides.push(bookend_slide(
        layout,
        SlideKind::Outro,
        "Thanks for Watching!",
        "Check description for links",
    ));

    let total_duration_secs = slides.iter().map(|s| s.duration_secs).sum();
    tracing::debug!(slides = slides.len(), total_duration_secs, "slide plan built");

    SlidePlan {
        width: layout.width,
        height: layout.height,
        fps: layout.fps,
        total_duration_secs,
        slides,
    }
}

fn bookend_slide(layout: &SlideLayout, kind: SlideKind, heading: &str, subheading: &str) -> Slide {
    let duration_secs = match kind {
        SlideKind::Outro => layout.outro_duration_secs,
        SlideKind::Intro | SlideKind::Product => layout.intro_duration_secs,
    };
    Slide {
        kind,
        duration_secs,
        background: layout.colors.background.clone(),
        elements: vec![
            centered(
                layout,
                ElementRole::Heading,
                heading.to_string(),
                layout.font_sizes.heading,
                &layout.colors.title,
                layout.positions.heading,
            ),
            centered(
                layout,
                ElementRole::Subheading,
                subheading.to_string(),
                layout.font_sizes.subheading,
                &layout.colors.title,
                layout.positions.subheading,
            ),
        ],
    }
}

fn centered(
    layout: &SlideLayout,
    role: ElementRole,
    text: String,
    font_size: u32,
    color: &str,
    fraction: f64,
) -> TextElement {
    TextElement {
        role,
        text,
        font_size,
        color: color.to_string(),
        background: None,
        position: Position::Centered {
            y: layout.y(fraction),
        },
    }
}

fn product_slide(deal: &Deal, layout: &SlideLayout) -> Slide {
    let colors = &layout.colors;
    let sizes = &layout.font_sizes;
    let pos = &layout.positions;
    let mut elements = Vec::new();

    if let Some(title) = &deal.title {
        elements.push(centered(
            layout,
            ElementRole::Title,
            truncate_title(title),
            sizes.title,
            &colors.title,
            pos.title,
        ));
    }

    if let Some(price) = &deal.current_price {
        elements.push(centered(
            layout,
            ElementRole::CurrentPrice,
            price.clone(),
            sizes.current_price,
            &colors.current_price,
            pos.current_price,
        ));
    }

    if let Some(original) = &deal.original_price {
        elements.push(centered(
            layout,
            ElementRole::OriginalPrice,
            format!("Was: {original}"),
            sizes.original_price,
            &colors.original_price,
            pos.original_price,
        ));
    }

    if let (Some(savings), Some(pct)) = (&deal.savings, &deal.savings_percentage) {
        elements.push(centered(
            layout,
            ElementRole::Savings,
            format!("Save {savings} ({pct})"),
            sizes.savings,
            &colors.savings,
            pos.savings,
        ));
    }

    if let Some(pct) = &deal.savings_percentage {
        let mut badge = centered(
            layout,
            ElementRole::Badge,
            format!("{pct} OFF"),
            sizes.badge,
            &colors.badge_text,
            pos.badge,
        );
        badge.background = Some(colors.badge_background.clone());
        elements.push(badge);
    }

    if deal.is_prime_eligible {
        elements.push(TextElement {
            role: ElementRole::Prime,
            text: "Prime Eligible".to_string(),
            font_size: sizes.prime,
            color: colors.title.clone(),
            background: Some(colors.prime_background.clone()),
            position: Position::Absolute {
                x: layout.width.saturating_sub(300),
                y: layout.height.saturating_sub(100),
            },
        });
    }

    elements.push(centered(
        layout,
        ElementRole::LinkHint,
        "Product Link in Description".to_string(),
        sizes.link_text,
        &colors.title,
        pos.link_text,
    ));

    Slide {
        kind: SlideKind::Product,
        duration_secs: layout.slide_duration_secs,
        background: colors.background.clone(),
        elements,
    }
}
