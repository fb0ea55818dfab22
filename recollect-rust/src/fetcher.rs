//! Link preview: fetch a page and read its title, description and image from
//! the markup.

use crate::{LinkPreview, RecollectError, RecollectResult};
use reqwest::{
    header::{ACCEPT, USER_AGENT},
    Client,
};
use scraper::{Html, Selector};
use tracing::{debug, warn};

// Many sites refuse requests that do not look like a browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";

pub struct LinkPreviewFetcher {
    client: Client,
}

impl Default for LinkPreviewFetcher {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl LinkPreviewFetcher {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch `url` once and extract its preview metadata.
    ///
    /// A non-success status is returned as [`RecollectError::Fetch`] so the
    /// caller can show a retryable failure. Missing metadata is not an error.
    pub async fn fetch_preview(&self, url: &str) -> RecollectResult<LinkPreview> {
        let url = normalize_url(url)?;
        debug!(%url, "fetching link preview");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(ACCEPT, BROWSER_ACCEPT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "link preview fetch failed");
            return Err(RecollectError::Fetch { status });
        }

        let html = response.text().await?;
        Ok(parse_preview(&html))
    }
}

/// Prepend `https://` when `url` has no http(s) scheme.
pub fn normalize_url(url: &str) -> RecollectResult<String> {
    let url = url.trim();
    if url.is_empty() {
        return Err(RecollectError::Validation("URL is required".to_string()));
    }
    let has_scheme = ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    });
    if has_scheme {
        Ok(url.to_string())
    } else {
        Ok(format!("https://{url}"))
    }
}

/// Read preview fields from `html`:
/// `og:title` then `<title>`; `og:description` then `meta[name=description]`;
/// `og:image`.
#[must_use]
pub fn parse_preview(html: &str) -> LinkPreview {
    let document = Html::parse_document(html);

    let title = meta_content(&document, r#"meta[property="og:title"]"#)
        .or_else(|| element_text(&document, "title"))
        .unwrap_or_default();
    let description = meta_content(&document, r#"meta[property="og:description"]"#)
        .or_else(|| meta_content(&document, r#"meta[name="description"]"#))
        .unwrap_or_default();
    let image = meta_content(&document, r#"meta[property="og:image"]"#).unwrap_or_default();

    LinkPreview {
        title,
        description,
        image,
    }
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(ToString::to_string)
}

fn element_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let text = document
        .select(&selector)
        .next()?
        .text()
        .collect::<String>()
        .trim()
        .to_string();
    (!text.is_empty()).then_some(text)
}
