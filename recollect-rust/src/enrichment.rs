use crate::{
    image_data::parse_inline_image, model_output, ContentKind, EnrichmentResult,
};
use recollect_genai::{GenerateRequest, LanguageModel, Part};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

pub const UNAVAILABLE_SUMMARY: &str = "AI Service Unavailable";
pub const IMAGE_FAILURE_SUMMARY: &str = "Image analysis failed";
/// The single tag attached to every fallback result.
pub const ERROR_TAG: &str = "AI_Error";
const FALLBACK_PREFIX_CHARS: usize = 50;

const IMAGE_PROMPT: &str = r#"You are a helpful assistant.
Analyze this image.

CRITICAL INSTRUCTION:
1. Analyze visual vs text balance:
   - "isTextHeavy": Set to TRUE only if the image is a plain document, a screenshot of text, code, or an article WITHOUT significant interesting visuals. (These will get an abstract cover.)
   - "isTextHeavy": Set to FALSE if the image contains photos, art, UI designs, or mixed content (even if it has a text header). (These keep their original image.)

2. Visual Focal Point (Smart Crop):
   - Identify the center of the MAIN VISUAL element (the photo, the art, the person).
   - Ignore header text, UI chrome, and surrounding whitespace.
   - Return "visualFocalPoint": { "x": percentage (0-100), "y": percentage (0-100) }.
   - Example: if the main photo sits at the bottom, y might be 75 or 80.
   - For a general photo use { "x": 50, "y": 50 }.

3. Summary & Title (OCR priority):
   - Extract the MAIN text content (sentences/paragraphs) in its ORIGINAL LANGUAGE.
   - "summary": strictly the main caption or body text.
     - EXCLUDE: trending searches, "Save", counters and other numbers, sign-up prompts, menus, buttons.
     - KEEP: the main message or article text.
   - "title": the headline of that text.
   - IF there is NO legible text (pure visual):
     - "summary": a creative description of the visual.
     - "title": a creative title.

4. Tags:
   - Generate 5-7 tags. When the text is not in English, give them in both English and the original language for better searchability.
   - Mix broad categories (e.g. "Design") with specific topics (e.g. "Minimalism").

Return ONLY a JSON object:
{
    "title": "...",
    "summary": "...",
    "tags": ["..."],
    "isTextHeavy": true/false,
    "visualFocalPoint": { "x": 50, "y": 50 }
}"#;

/// Produces titles, summaries and tags for captured content by prompting a
/// generative model. Never fails: every problem turns into a fallback result.
pub struct EnrichmentService {
    model: Option<Arc<dyn LanguageModel>>,
}

impl EnrichmentService {
    /// `model` is `None` when no credential is configured.
    pub fn new(model: Option<Arc<dyn LanguageModel>>) -> Self {
        Self { model }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    /// Enrich `content` of the declared `kind`. For images, `content` is
    /// base64 data, optionally as a data URL.
    ///
    /// One attempt, no retry. Transport errors, refusals and unparseable
    /// replies all yield [`fallback_result`].
    pub async fn analyze(&self, content: &str, kind: ContentKind) -> EnrichmentResult {
        let Some(model) = &self.model else {
            warn!("enrichment requested without a model credential");
            return EnrichmentResult::unavailable();
        };

        let request = build_request(content, kind);
        debug!(kind = kind.as_str(), model = %model.model_id(), "requesting enrichment");

        match model.generate(request).await {
            Ok(response) => match response.text() {
                Some(reply) => decode_enrichment(&reply, content, kind),
                None => {
                    warn!("enrichment reply contained no text");
                    fallback_result(content, kind)
                }
            },
            Err(error) => {
                warn!(%error, "enrichment request failed");
                fallback_result(content, kind)
            }
        }
    }
}

impl EnrichmentResult {
    /// Result returned when no model credential is configured.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            title: None,
            summary: UNAVAILABLE_SUMMARY.to_string(),
            tags: Vec::new(),
            is_text_heavy: None,
            visual_focal_point: None,
        }
    }
}

/// Decode a raw model reply, or fall back when it is not the requested
/// object. Focal points are clamped into range.
#[must_use]
pub fn decode_enrichment(reply: &str, content: &str, kind: ContentKind) -> EnrichmentResult {
    let mut result: EnrichmentResult =
        model_output::decode_or_else(reply, || fallback_result(content, kind));
    result.visual_focal_point = result.visual_focal_point.map(crate::FocalPoint::clamped);
    result
}

/// The deterministic result used whenever enrichment fails.
#[must_use]
pub fn fallback_result(content: &str, kind: ContentKind) -> EnrichmentResult {
    let summary = match kind {
        ContentKind::Image => IMAGE_FAILURE_SUMMARY.to_string(),
        ContentKind::Text | ContentKind::Link => {
            let prefix: String = content.chars().take(FALLBACK_PREFIX_CHARS).collect();
            format!("{prefix}...")
        }
    };
    EnrichmentResult {
        title: None,
        summary,
        tags: vec![ERROR_TAG.to_string()],
        is_text_heavy: None,
        visual_focal_point: None,
    }
}

fn build_request(content: &str, kind: ContentKind) -> GenerateRequest {
    let request = match kind {
        ContentKind::Image => {
            let image = parse_inline_image(content);
            GenerateRequest::new([
                Part::text(IMAGE_PROMPT),
                Part::image(image.data, image.mime_type),
            ])
        }
        ContentKind::Text | ContentKind::Link => {
            GenerateRequest::new([text_prompt(content, kind)])
        }
    };
    request.json_output(Some(response_schema(kind)))
}

fn text_prompt(content: &str, kind: ContentKind) -> String {
    format!(
        r#"You are a helpful assistant for a knowledge management app.
Analyze the following content and provide a concise summary (max 2 sentences) and 3-5 relevant tags.
Also provide a short, relevant title.

Context Type: {kind}
Content:
"""
{content}
"""

Return ONLY a JSON object:
{{
    "title": "...",
    "summary": "...",
    "tags": ["tag1", "tag2"]
}}"#,
        kind = kind.as_str(),
    )
}

fn response_schema(kind: ContentKind) -> serde_json::Value {
    let mut schema = json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "summary": { "type": "string" },
            "tags": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["title", "summary", "tags"]
    });
    if kind == ContentKind::Image {
        schema["properties"]["isTextHeavy"] = json!({ "type": "boolean" });
        schema["properties"]["visualFocalPoint"] = json!({
            "type": "object",
            "properties": {
                "x": { "type": "number", "minimum": 0, "maximum": 100 },
                "y": { "type": "number", "minimum": 0, "maximum": 100 }
            },
            "required": ["x", "y"]
        });
    }
    schema
}
