use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    response::Html,
    routing::get,
    Router,
};
use recollect::{
    intake::COVER_IMAGES,
    server::{router, AppState},
    storage::{MemoryStorage, PersistedState},
    store::CardStore,
    unlock::UnlockGate,
    CardDraft,
};
use recollect_genai::genai_test::{MockGenerateResult, MockLanguageModel};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn store_with(drafts: Vec<CardDraft>) -> CardStore {
    let mut store =
        CardStore::with_state(Box::new(MemoryStorage::new()), PersistedState::empty());
    for draft in drafts.into_iter().rev() {
        store.add_card(draft).expect("add succeeds");
    }
    store
}

fn app(store: CardStore, model: Option<Arc<MockLanguageModel>>) -> Router {
    let gate = UnlockGate::new("1234").expect("valid passcode");
    let model = model.map(|m| m as Arc<dyn recollect_genai::LanguageModel>);
    router(AppState::new(store, gate, model))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

fn ids(value: &Value) -> Vec<&str> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn analyze_requires_content() {
    let app = app(store_with(vec![]), Some(Arc::new(MockLanguageModel::new())));

    let (status, body) = send(&app, Method::POST, "/api/analyze", Some(json!({ "type": "text" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Content is required" }));
}

#[tokio::test]
async fn analyze_without_credential_explains_how_to_fix_it() {
    let app = app(store_with(vec![]), None);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/analyze",
        Some(json!({ "content": "hello", "type": "text" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "error": "API Key missing",
            "details": "Please add GEMINI_API_KEY to your .env file"
        })
    );
}

#[tokio::test]
async fn analyze_returns_enrichment_and_treats_unknown_type_as_text() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(MockGenerateResult::text(
        r#"{"title": "Hello", "summary": "A greeting.", "tags": ["Life"]}"#,
    ));
    let app = app(store_with(vec![]), Some(model.clone()));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/analyze",
        Some(json!({ "content": "hello there", "type": "video" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "title": "Hello", "summary": "A greeting.", "tags": ["Life"] })
    );
    let requests = model.tracked_requests();
    assert!(requests[0].prompt_text().contains("Context Type: text"));
}

#[tokio::test]
async fn link_preview_requires_url() {
    let app = app(store_with(vec![]), None);

    let (status, body) = send(&app, Method::GET, "/api/link-preview", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "URL is required" }));
}

#[tokio::test]
async fn link_preview_passes_upstream_status_through() {
    let site = Router::new()
        .route("/ok", get(|| async { Html(r#"<title>Hi</title>"#) }))
        .route("/gone", get(|| async { (StatusCode::GONE, "gone") }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, site).await.unwrap();
    });
    let app = app(store_with(vec![]), None);

    let ok_url = urlencoding::encode(&format!("http://{addr}/ok")).into_owned();
    let (status, body) = send(&app, Method::GET, &format!("/api/link-preview?url={ok_url}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "title": "Hi", "description": "", "image": "" }));

    let gone_url = urlencoding::encode(&format!("http://{addr}/gone")).into_owned();
    let (status, body) = send(&app, Method::GET, &format!("/api/link-preview?url={gone_url}"), None).await;
    assert_eq!(status, StatusCode::GONE);
    assert!(body["error"].as_str().unwrap().starts_with("Failed to fetch URL"));
}

#[tokio::test]
async fn created_text_card_is_listed_first_with_a_cover() {
    let app = app(store_with(vec![CardDraft::new("Older", "o")]), None);

    let (status, card) = send(
        &app,
        Method::POST,
        "/api/cards",
        Some(json!({ "type": "text", "text": "Buy oat milk", "tags": "Life, Errands" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(card["title"], "New Idea");
    assert_eq!(card["summary"], "Buy oat milk");
    assert_eq!(card["tags"], json!(["Life", "Errands"]));
    assert_eq!(card["isFavorite"], false);
    assert!(COVER_IMAGES.contains(&card["imageUrl"].as_str().unwrap()));

    let (_, listed) = send(&app, Method::GET, "/api/cards", None).await;
    assert_eq!(listed[0]["id"], card["id"]);
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn invalid_capture_is_rejected() {
    let app = app(store_with(vec![]), None);

    let (status, body) = send(&app, Method::POST, "/api/cards", Some(json!({ "type": "link" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    let (_, listed) = send(&app, Method::GET, "/api/cards", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn listing_filters_by_collection_and_query() {
    let app = app(
        store_with(vec![
            CardDraft::new("Color theory", "hue").with_tags(["Design"]),
            CardDraft::new("Async Rust", "tasks").with_tags(["Development"]),
            CardDraft::new("Color in terminals", "ansi").with_tags(["Development"]),
        ]),
        None,
    );

    let (_, dev) = send(&app, Method::GET, "/api/cards?collection=development", None).await;
    assert_eq!(dev.as_array().unwrap().len(), 2);

    let (_, color_dev) = send(&app, Method::GET, "/api/cards?collection=Development&q=COLOR", None).await;
    let titles: Vec<_> = color_dev
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Color in terminals"]);
}

#[tokio::test]
async fn secret_cards_stay_obscured_until_unlocked() {
    let app = app(
        store_with(vec![CardDraft::new("Diary", "private").with_tags(["Life"]).secret()]),
        None,
    );
    let (_, listed) = send(&app, Method::GET, "/api/cards", None).await;
    let id = listed[0]["id"].as_str().unwrap().to_string();
    assert_eq!(listed[0]["locked"], true);
    assert!(listed[0].get("title").is_none());

    let (status, _) = send(&app, Method::GET, &format!("/api/cards/{id}"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/cards/{id}/unlock"),
        Some(json!({ "code": "0000" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Incorrect code");

    let (status, card) = send(
        &app,
        Method::POST,
        &format!("/api/cards/{id}/unlock"),
        Some(json!({ "code": "1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["title"], "Diary");

    let (status, card) = send(&app, Method::GET, &format!("/api/cards/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["summary"], "private");

    let (_, listed) = send(&app, Method::GET, "/api/cards", None).await;
    assert_eq!(listed[0]["title"], "Diary");
}

#[tokio::test]
async fn unlocking_unknown_card_is_not_found() {
    let app = app(store_with(vec![]), None);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/cards/card-404/unlock",
        Some(json!({ "code": "1234" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Card not found" }));
}

#[tokio::test]
async fn favorite_and_delete_round_trip() {
    let app = app(store_with(vec![CardDraft::new("Idea", "s")]), None);
    let (_, listed) = send(&app, Method::GET, "/api/cards", None).await;
    let id = listed[0]["id"].as_str().unwrap().to_string();

    let (status, card) = send(&app, Method::POST, &format!("/api/cards/{id}/favorite"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["isFavorite"], true);

    let (status, _) = send(&app, Method::POST, "/api/cards/missing/favorite", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, deleted) = send(&app, Method::DELETE, &format!("/api/cards/{id}"), None).await;
    assert_eq!(deleted, json!({ "deleted": true }));
    let (_, deleted) = send(&app, Method::DELETE, &format!("/api/cards/{id}"), None).await;
    assert_eq!(deleted, json!({ "deleted": false }));

    let (_, listed) = send(&app, Method::GET, "/api/cards", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn similar_endpoint_excludes_secret_and_same_title_cards() {
    let app = app(
        store_with(vec![
            CardDraft::new("Grid systems", "focal").with_tags(["Design"]),
            CardDraft::new("Grid systems", "copy").with_tags(["Design"]),
            CardDraft::new("Moodboard", "hidden").with_tags(["Design"]).secret(),
            CardDraft::new("Typography", "type").with_tags(["Design"]),
        ]),
        None,
    );
    let (_, listed) = send(&app, Method::GET, "/api/cards", None).await;
    let focal = listed[0]["id"].as_str().unwrap().to_string();
    let typography = listed[3]["id"].as_str().unwrap().to_string();

    let (status, similar) = send(&app, Method::GET, &format!("/api/cards/{focal}/similar"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&similar), vec![typography.as_str()]);
}

#[tokio::test]
async fn collections_can_be_replaced_and_derived() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(MockGenerateResult::text(r#"["Design", "All", "Made Up"]"#));
    let app = app(
        store_with(vec![
            CardDraft::new("Palette", "p").with_tags(["Design"]).with_image_url("https://example.com/p.png"),
            CardDraft::new("Crate", "c").with_tags(["Rust"]),
        ]),
        Some(model),
    );

    let (status, collections) = send(
        &app,
        Method::PUT,
        "/api/collections",
        Some(json!(["Rust", "All", "Design"])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(collections, json!(["All", "Rust", "Design"]));

    let (status, derived) = send(&app, Method::POST, "/api/collections/derive", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(derived, json!(["All", "Design"]));

    let (_, current) = send(&app, Method::GET, "/api/collections", None).await;
    assert_eq!(current, derived);

    let (_, stats) = send(&app, Method::GET, "/api/collections/stats", None).await;
    assert_eq!(
        stats,
        json!([{ "name": "Design", "count": 1, "previewImages": ["https://example.com/p.png"] }])
    );
}
