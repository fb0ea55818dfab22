use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder title for cards saved without one.
pub const DEFAULT_TITLE: &str = "New Idea";

/// The collection sentinel that disables tag filtering.
pub const ALL_COLLECTION: &str = "All";

/// What the user captured. Drives the enrichment prompt and the save policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Link,
    Image,
}

impl ContentKind {
    /// Parse a declared kind, treating anything unrecognized (or absent) as
    /// plain text.
    #[must_use]
    pub fn parse_or_text(value: Option<&str>) -> Self {
        match value {
            Some("link") => Self::Link,
            Some("image") => Self::Image,
            _ => Self::Text,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Link => "link",
            Self::Image => "image",
        }
    }
}

/// Perceptual center of interest of an image, in percent of width/height.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FocalPoint {
    pub x: f64,
    pub y: f64,
}

impl FocalPoint {
    pub const CENTER: Self = Self { x: 50.0, y: 50.0 };

    /// Clamp both coordinates into `0..=100`. Non-finite values fall back to
    /// the center.
    #[must_use]
    pub fn clamped(self) -> Self {
        let clamp = |v: f64| if v.is_finite() { v.clamp(0.0, 100.0) } else { 50.0 };
        Self {
            x: clamp(self.x),
            y: clamp(self.y),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub title: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_focal_point: Option<FocalPoint>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_secret: bool,
    pub created_at: DateTime<Utc>,
}

/// A card as submitted for saving: everything except the fields the store
/// assigns (`id`, `createdAt`, `isFavorite`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardDraft {
    pub title: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_focal_point: Option<FocalPoint>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_secret: bool,
}

impl CardDraft {
    /// A draft with the given title and summary and nothing else.
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            image_url: None,
            content_image_url: None,
            visual_focal_point: None,
            tags: Vec::new(),
            is_secret: false,
        }
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    #[must_use]
    pub fn secret(mut self) -> Self {
        self.is_secret = true;
        self
    }
}

/// Normalized output of the enrichment model. Only `summary` is required;
/// callers must tolerate every other field being absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_text_heavy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_focal_point: Option<FocalPoint>,
}

/// Page preview metadata. Each field may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkPreview {
    pub title: String,
    pub description: String,
    pub image: String,
}
