//! HTTP surface: the two model-backed endpoints plus a JSON API over the
//! card store.

use crate::{
    collections::{CardSummary, CollectionDeriver},
    enrichment::EnrichmentService,
    fetcher::LinkPreviewFetcher,
    intake::{self, CaptureForm},
    similarity,
    store::CardStore,
    unlock::{CardView, UnlockGate},
    Card, ContentKind, EnrichmentResult, LinkPreview, RecollectError, RecollectResult,
};
use axum::{
    extract::{Path, Query, State},
    http::{header::CONTENT_TYPE, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use recollect_genai::LanguageModel;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

/// Shared handler state. The store lock is never held across a model or
/// network call.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<CardStore>>,
    gate: Arc<Mutex<UnlockGate>>,
    enrichment: Arc<EnrichmentService>,
    deriver: Arc<CollectionDeriver>,
    fetcher: Arc<LinkPreviewFetcher>,
}

impl AppState {
    /// `model` is `None` when no credential is configured; enrichment then
    /// answers with a configuration error and derivation uses its fallback.
    pub fn new(store: CardStore, gate: UnlockGate, model: Option<Arc<dyn LanguageModel>>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            gate: Arc::new(Mutex::new(gate)),
            enrichment: Arc::new(EnrichmentService::new(model.clone())),
            deriver: Arc::new(CollectionDeriver::new(model)),
            fetcher: Arc::new(LinkPreviewFetcher::default()),
        }
    }

    #[must_use]
    pub fn with_fetcher(mut self, fetcher: LinkPreviewFetcher) -> Self {
        self.fetcher = Arc::new(fetcher);
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/link-preview", get(link_preview_handler))
        .route("/api/cards", get(list_cards_handler).post(create_card_handler))
        .route(
            "/api/cards/{id}",
            get(get_card_handler).delete(delete_card_handler),
        )
        .route("/api/cards/{id}/favorite", post(toggle_favorite_handler))
        .route("/api/cards/{id}/unlock", post(unlock_handler))
        .route("/api/cards/{id}/similar", get(similar_handler))
        .route(
            "/api/collections",
            get(get_collections_handler).put(set_collections_handler),
        )
        .route("/api/collections/derive", post(derive_collections_handler))
        .route("/api/collections/stats", get(collection_stats_handler))
        .with_state(state)
}

/// CORS for the web client served from `app_url`.
pub fn cors_layer(app_url: &str) -> RecollectResult<CorsLayer> {
    let origin = app_url
        .parse::<HeaderValue>()
        .map_err(|_| RecollectError::Config(format!("invalid APP_URL: {app_url}")))?;
    Ok(CorsLayer::new()
        .allow_origin([origin])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true))
}

/// Error body: `{ "error": ..., "details"?: ... }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: String,
    details: Option<String>,
}

impl ApiError {
    fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Card not found")
    }

    fn locked() -> Self {
        Self::new(StatusCode::FORBIDDEN, "Card is locked")
    }
}

impl From<RecollectError> for ApiError {
    fn from(err: RecollectError) -> Self {
        match err {
            RecollectError::Validation(message) => Self::new(StatusCode::BAD_REQUEST, message),
            RecollectError::Fetch { status } => {
                Self::new(status, format!("Failed to fetch URL (Status {status})"))
            }
            RecollectError::Transport(err) => {
                Self::new(StatusCode::BAD_GATEWAY, "Upstream request failed")
                    .with_details(err.to_string())
            }
            err @ (RecollectError::Storage(_)
            | RecollectError::Serialization(_)
            | RecollectError::Config(_)) => {
                error!(error = %err, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                    .with_details(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "error": self.error });
        if let Some(details) = self.details {
            body["details"] = json!(details);
        }
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

async fn home_handler() -> &'static str {
    "Welcome to the Recollect server!"
}

#[derive(Deserialize)]
struct AnalyzeBody {
    content: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

async fn analyze_handler(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeBody>,
) -> ApiResult<Json<EnrichmentResult>> {
    let content = body
        .content
        .filter(|content| !content.is_empty())
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "Content is required"))?;

    if !state.enrichment.is_available() {
        return Err(
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "API Key missing")
                .with_details("Please add GEMINI_API_KEY to your .env file"),
        );
    }

    let kind = ContentKind::parse_or_text(body.kind.as_deref());
    Ok(Json(state.enrichment.analyze(&content, kind).await))
}

#[derive(Deserialize)]
struct LinkPreviewQuery {
    url: Option<String>,
}

async fn link_preview_handler(
    State(state): State<AppState>,
    Query(query): Query<LinkPreviewQuery>,
) -> ApiResult<Json<LinkPreview>> {
    let url = query
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "URL is required"))?;

    match state.fetcher.fetch_preview(&url).await {
        Ok(preview) => Ok(Json(preview)),
        Err(err @ (RecollectError::Fetch { .. } | RecollectError::Validation(_))) => {
            Err(err.into())
        }
        Err(err) => {
            warn!(%url, error = %err, "link preview failed");
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to parse URL",
            ))
        }
    }
}

#[derive(Deserialize)]
struct CardsQuery {
    collection: Option<String>,
    q: Option<String>,
}

async fn list_cards_handler(
    State(state): State<AppState>,
    Query(query): Query<CardsQuery>,
) -> Json<Vec<CardView>> {
    let collection = query
        .collection
        .unwrap_or_else(|| crate::ALL_COLLECTION.to_string());
    let search = query.q.unwrap_or_default();

    let store = state.store.lock().await;
    let gate = state.gate.lock().await;
    let views = similarity::filter_cards(store.cards(), &collection, &search)
        .into_iter()
        .map(|card| gate.present(card))
        .collect();
    Json(views)
}

#[derive(Deserialize)]
struct CreateCardBody {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(flatten)]
    form: CaptureForm,
}

async fn create_card_handler(
    State(state): State<AppState>,
    Json(body): Json<CreateCardBody>,
) -> ApiResult<(StatusCode, Json<Card>)> {
    let kind = ContentKind::parse_or_text(body.kind.as_deref());
    let draft = intake::build_draft(kind, body.form)?;
    let card = state.store.lock().await.add_card(draft)?;
    info!(id = %card.id, kind = kind.as_str(), "card saved");
    Ok((StatusCode::CREATED, Json(card)))
}

async fn get_card_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Card>> {
    let store = state.store.lock().await;
    let card = store.get(&id).ok_or_else(ApiError::not_found)?;
    if state.gate.lock().await.needs_challenge(card) {
        return Err(ApiError::locked());
    }
    Ok(Json(card.clone()))
}

#[derive(Serialize)]
struct DeleteResponse {
    deleted: bool,
}

async fn delete_card_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = state.store.lock().await.delete_card(&id)?;
    Ok(Json(DeleteResponse { deleted }))
}

async fn toggle_favorite_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CardView>> {
    let card = state
        .store
        .lock()
        .await
        .toggle_favorite(&id)?
        .ok_or_else(ApiError::not_found)?;
    let view = state.gate.lock().await.present(&card);
    Ok(Json(view))
}

#[derive(Deserialize)]
struct UnlockBody {
    code: String,
}

async fn unlock_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UnlockBody>,
) -> ApiResult<Json<Card>> {
    let store = state.store.lock().await;
    let card = store.get(&id).ok_or_else(ApiError::not_found)?;
    if state.gate.lock().await.attempt(&id, &body.code) {
        Ok(Json(card.clone()))
    } else {
        Err(ApiError::new(StatusCode::FORBIDDEN, "Incorrect code"))
    }
}

async fn similar_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Card>>> {
    let store = state.store.lock().await;
    let focal = store.get(&id).ok_or_else(ApiError::not_found)?;
    if state.gate.lock().await.needs_challenge(focal) {
        return Err(ApiError::locked());
    }
    let similar = similarity::similar_cards(focal, store.cards())
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(similar))
}

async fn get_collections_handler(State(state): State<AppState>) -> Json<Vec<String>> {
    let collections = state.store.lock().await.collections().to_vec();
    Json(collections)
}

async fn set_collections_handler(
    State(state): State<AppState>,
    Json(collections): Json<Vec<String>>,
) -> ApiResult<Json<Vec<String>>> {
    let mut store = state.store.lock().await;
    let collections = store.set_collections(collections)?.to_vec();
    Ok(Json(collections))
}

async fn derive_collections_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<String>>> {
    let summaries: Vec<CardSummary> = {
        let store = state.store.lock().await;
        store.cards().iter().map(CardSummary::from).collect()
    };

    let derived = state.deriver.derive(&summaries).await;

    let mut store = state.store.lock().await;
    let collections = store.set_collections(derived)?.to_vec();
    Ok(Json(collections))
}

async fn collection_stats_handler(
    State(state): State<AppState>,
) -> Json<Vec<similarity::CollectionStat>> {
    let store = state.store.lock().await;
    let stats = similarity::collection_stats(store.collections(), store.cards());
    Json(stats)
}
