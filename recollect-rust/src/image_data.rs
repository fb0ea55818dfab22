use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// A base64 image ready to be sent inline to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage<'a> {
    pub mime_type: String,
    pub data: &'a str,
}

/// Split an optional `data:image/<x>;base64,` prefix off `content`.
///
/// The mime type comes from the prefix when there is one, otherwise from the
/// magic bytes of the decoded payload, otherwise `image/jpeg`.
#[must_use]
pub fn parse_inline_image(content: &str) -> InlineImage<'_> {
    let content = content.trim();
    if let Some((mime_type, data)) = split_data_url(content) {
        return InlineImage {
            mime_type: mime_type.to_string(),
            data,
        };
    }
    InlineImage {
        mime_type: sniff_mime_type(content)
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string(),
        data: content,
    }
}

fn split_data_url(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("data:")?;
    let (mime_type, data) = rest.split_once(";base64,")?;
    mime_type.starts_with("image/").then_some((mime_type, data))
}

fn sniff_mime_type(data: &str) -> Option<&'static str> {
    // 16 base64 chars decode to the 12 bytes needed to recognise WebP.
    let head: String = data.chars().take(16).collect();
    if !head.is_ascii() {
        return None;
    }
    let usable = head.len() - head.len() % 4;
    let bytes = BASE64_STANDARD.decode(&head[..usable]).ok()?;

    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF8") {
        Some("image/gif")
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}
