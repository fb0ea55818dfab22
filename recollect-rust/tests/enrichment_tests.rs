use recollect::{
    enrichment::{EnrichmentService, ERROR_TAG, IMAGE_FAILURE_SUMMARY, UNAVAILABLE_SUMMARY},
    ContentKind, EnrichmentResult, FocalPoint,
};
use recollect_genai::{
    genai_test::{MockGenerateResult, MockLanguageModel},
    LanguageModelError, OutputFormat, Part,
};
use std::sync::Arc;

fn service_with(model: &Arc<MockLanguageModel>) -> EnrichmentService {
    EnrichmentService::new(Some(model.clone()))
}

#[tokio::test]
async fn analyze_text_decodes_fenced_json_reply() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(MockGenerateResult::text(
        "```json\n{\"title\": \"Ship it\", \"summary\": \"Release early.\", \"tags\": [\"Work\", \"Startup\"]}\n```",
    ));

    let result = service_with(&model)
        .analyze("Release early, release often.", ContentKind::Text)
        .await;

    assert_eq!(
        result,
        EnrichmentResult {
            title: Some("Ship it".to_string()),
            summary: "Release early.".to_string(),
            tags: vec!["Work".to_string(), "Startup".to_string()],
            is_text_heavy: None,
            visual_focal_point: None,
        }
    );

    let requests = model.tracked_requests();
    assert_eq!(requests.len(), 1);
    assert!(matches!(
        requests[0].output,
        OutputFormat::Json { schema: Some(_) }
    ));
    let prompt = requests[0].prompt_text();
    assert!(prompt.contains("Context Type: text"));
    assert!(prompt.contains("Release early, release often."));
}

#[tokio::test]
async fn non_json_reply_yields_error_fallback() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(MockGenerateResult::text("not json"));

    let result = service_with(&model)
        .analyze("Some note about gardening", ContentKind::Text)
        .await;

    assert_eq!(result.summary, "Some note about gardening...");
    assert_eq!(result.tags, vec![ERROR_TAG]);
    assert_eq!(result.title, None);
}

#[tokio::test]
async fn model_error_yields_fallback() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(LanguageModelError::Refusal("blocked".to_string()));

    let result = service_with(&model)
        .analyze("https://example.com/article", ContentKind::Link)
        .await;

    assert_eq!(result.summary, "https://example.com/article...");
    assert_eq!(result.tags, vec![ERROR_TAG]);
}

#[tokio::test]
async fn failed_image_analysis_uses_image_marker() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(MockGenerateResult::text("[]"));

    let result = service_with(&model)
        .analyze("data:image/png;base64,iVBORw0KGgo=", ContentKind::Image)
        .await;

    assert_eq!(result.summary, IMAGE_FAILURE_SUMMARY);
    assert_eq!(result.tags, vec![ERROR_TAG]);
}

#[tokio::test]
async fn image_analysis_sends_inline_image_and_reads_visual_fields() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(MockGenerateResult::text(
        r#"{"title": "Poster", "summary": "A bold poster.", "tags": ["Design"], "isTextHeavy": false, "visualFocalPoint": {"x": 30, "y": 75}}"#,
    ));

    let result = service_with(&model)
        .analyze("data:image/webp;base64,UklGRh4AAABXRUJQ", ContentKind::Image)
        .await;

    assert_eq!(result.is_text_heavy, Some(false));
    assert_eq!(result.visual_focal_point, Some(FocalPoint { x: 30.0, y: 75.0 }));

    let requests = model.tracked_requests();
    assert_eq!(
        requests[0].parts[1],
        Part::image("UklGRh4AAABXRUJQ", "image/webp")
    );
}

#[tokio::test]
async fn bare_base64_image_is_sniffed() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(MockGenerateResult::text(r#"{"summary": "s"}"#));

    service_with(&model)
        .analyze("iVBORw0KGgoAAAANSUhEUg==", ContentKind::Image)
        .await;

    let requests = model.tracked_requests();
    assert_eq!(
        requests[0].parts[1],
        Part::image("iVBORw0KGgoAAAANSUhEUg==", "image/png")
    );
}

#[tokio::test]
async fn missing_credential_returns_unavailable_without_calling_a_model() {
    let service = EnrichmentService::new(None);
    assert!(!service.is_available());

    let result = service.analyze("anything", ContentKind::Text).await;

    assert_eq!(result.summary, UNAVAILABLE_SUMMARY);
    assert!(result.tags.is_empty());
    assert_eq!(result, EnrichmentResult::unavailable());
}
