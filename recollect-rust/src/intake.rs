//! Turning a filled-in capture form into a card draft.
//!
//! The rules depend on what was captured:
//!
//! | kind  | required       | summary                       | cover                                   | content image  |
//! |-------|----------------|-------------------------------|-----------------------------------------|----------------|
//! | image | captured image | text, or `"Uploaded Image"`   | random cover if text-heavy, else image  | captured image |
//! | link  | URL            | text, or the URL              | preview image, or random cover          | preview image  |
//! | text  | non-empty text | the text                      | random cover                            | none           |

use crate::{CardDraft, ContentKind, FocalPoint, RecollectError, RecollectResult, DEFAULT_TITLE};
use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;

pub const UPLOADED_IMAGE_SUMMARY: &str = "Uploaded Image";

/// Soft pastel abstract covers for cards whose own image is missing or not
/// worth showing.
pub const COVER_IMAGES: [&str; 8] = [
    "https://images.unsplash.com/photo-1557683316-973673baf926?w=800&q=80",
    "https://images.unsplash.com/photo-1557683304-673a23048d34?w=800&q=80",
    "https://images.unsplash.com/photo-1557682250-33bd709cbe85?w=800&q=80",
    "https://images.unsplash.com/photo-1557682224-5b8590cd1413?w=800&q=80",
    "https://images.unsplash.com/photo-1557682260-96773eb01377?w=800&q=80",
    "https://images.unsplash.com/photo-1618005182384-a83a8bd57fbe?w=800&q=80",
    "https://images.unsplash.com/photo-1520121401995-928cd50d4e27?w=800&q=80",
    "https://images.unsplash.com/photo-1507608616759-54f48f0af0ee?w=800&q=80",
];

/// The capture form as the user left it, possibly prefilled by enrichment
/// and link preview.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaptureForm {
    #[serde(default)]
    pub title: String,
    /// Edited summary, or the raw text for text captures.
    #[serde(default)]
    pub text: String,
    /// Comma separated.
    #[serde(default)]
    pub tags: String,
    /// The captured image (data URL) for image captures.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Image found by the link preview.
    #[serde(default)]
    pub preview_image: Option<String>,
    #[serde(default)]
    pub is_text_heavy: bool,
    #[serde(default)]
    pub visual_focal_point: Option<FocalPoint>,
    #[serde(default)]
    pub is_secret: bool,
}

/// Apply the save policy for `kind` using the thread-local RNG for cover
/// selection.
pub fn build_draft(kind: ContentKind, form: CaptureForm) -> RecollectResult<CardDraft> {
    build_draft_with_rng(kind, form, &mut rand::thread_rng())
}

pub fn build_draft_with_rng<R: Rng + ?Sized>(
    kind: ContentKind,
    form: CaptureForm,
    rng: &mut R,
) -> RecollectResult<CardDraft> {
    let text = non_empty(Some(form.text));
    let (summary, image_url, content_image_url) = match kind {
        ContentKind::Image => {
            let image = non_empty(form.image).ok_or_else(|| {
                RecollectError::Validation("An image is required".to_string())
            })?;
            let cover = if form.is_text_heavy {
                random_cover(rng)
            } else {
                image.clone()
            };
            (
                text.unwrap_or_else(|| UPLOADED_IMAGE_SUMMARY.to_string()),
                Some(cover),
                Some(image),
            )
        }
        ContentKind::Link => {
            let url = non_empty(form.url)
                .ok_or_else(|| RecollectError::Validation("A URL is required".to_string()))?;
            let preview = non_empty(form.preview_image);
            let cover = preview.clone().unwrap_or_else(|| random_cover(rng));
            (text.unwrap_or(url), Some(cover), preview)
        }
        ContentKind::Text => {
            let text = text
                .ok_or_else(|| RecollectError::Validation("Text is required".to_string()))?;
            (text, Some(random_cover(rng)), None)
        }
    };

    Ok(CardDraft {
        title: non_empty(Some(form.title)).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        summary,
        image_url,
        content_image_url,
        visual_focal_point: form.visual_focal_point.map(FocalPoint::clamped),
        tags: parse_tags(&form.tags),
        is_secret: form.is_secret,
    })
}

/// Split a comma separated tag field, trimming and dropping empties.
#[must_use]
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn random_cover<R: Rng + ?Sized>(rng: &mut R) -> String {
    COVER_IMAGES
        .choose(rng)
        .copied()
        .unwrap_or(COVER_IMAGES[0])
        .to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
