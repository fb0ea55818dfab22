use axum::{
    http::{
        header::{ACCEPT, USER_AGENT},
        HeaderMap, HeaderName, StatusCode,
    },
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use recollect::{fetcher::LinkPreviewFetcher, LinkPreview, RecollectError};

const PAGE: &str = r#"<!doctype html>
<html>
  <head>
    <title>Fallback title</title>
    <meta property="og:title" content="A Post About Gardens">
    <meta name="description" content="Growing tomatoes on a balcony.">
    <meta property="og:image" content="https://example.com/tomatoes.jpg">
  </head>
  <body><h1>Gardens</h1></body>
</html>"#;

// Answers like a site that turns away anything not looking like a browser.
async fn browser_only(headers: HeaderMap) -> impl IntoResponse {
    let header_contains = |name: HeaderName, needle: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains(needle))
    };
    if header_contains(USER_AGENT, "Mozilla/5.0") && header_contains(ACCEPT, "text/html") {
        Html(PAGE).into_response()
    } else {
        (StatusCode::FORBIDDEN, "bots not welcome").into_response()
    }
}

async fn spawn_site() -> String {
    let app = Router::new()
        .route("/post", get(|| async { Html(PAGE) }))
        .route("/bare", get(|| async { Html("<p>no head</p>") }))
        .route("/browser-only", get(browser_only))
        .route(
            "/gone",
            get(|| async { (StatusCode::NOT_FOUND, "not here") }),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn fetch_preview_reads_page_metadata() {
    let base = spawn_site().await;

    let preview = LinkPreviewFetcher::default()
        .fetch_preview(&format!("{base}/post"))
        .await
        .expect("preview succeeds");

    assert_eq!(
        preview,
        LinkPreview {
            title: "A Post About Gardens".to_string(),
            description: "Growing tomatoes on a balcony.".to_string(),
            image: "https://example.com/tomatoes.jpg".to_string(),
        }
    );
}

#[tokio::test]
async fn fetch_preview_sends_browser_headers() {
    let base = spawn_site().await;

    let preview = LinkPreviewFetcher::default()
        .fetch_preview(&format!("{base}/browser-only"))
        .await
        .expect("browser-like request is accepted");

    assert_eq!(preview.title, "A Post About Gardens");

    let plain = reqwest::get(format!("{base}/browser-only")).await.unwrap();
    assert_eq!(plain.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn page_without_metadata_yields_empty_fields() {
    let base = spawn_site().await;

    let preview = LinkPreviewFetcher::default()
        .fetch_preview(&format!("{base}/bare"))
        .await
        .expect("preview succeeds");

    assert_eq!(preview, LinkPreview::default());
}

#[tokio::test]
async fn upstream_status_is_reported_as_fetch_error() {
    let base = spawn_site().await;

    let err = LinkPreviewFetcher::default()
        .fetch_preview(&format!("{base}/gone"))
        .await
        .expect_err("404 is an error");

    assert!(matches!(
        err,
        RecollectError::Fetch { status } if status == StatusCode::NOT_FOUND
    ));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = LinkPreviewFetcher::default()
        .fetch_preview(&format!("http://{addr}/"))
        .await
        .expect_err("connection refused");

    assert!(matches!(err, RecollectError::Transport(_)));
}

#[tokio::test]
async fn empty_url_fails_before_any_request() {
    let err = LinkPreviewFetcher::default()
        .fetch_preview("   ")
        .await
        .expect_err("empty url");

    assert!(matches!(err, RecollectError::Validation(_)));
}
