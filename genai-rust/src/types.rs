use serde_json::Value;

/// One piece of prompt or reply content.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    /// Base64 image data sent inline, without any `data:` URL prefix.
    Image { mime_type: String, data: String },
}

/// What shape the reply text must take.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    /// A JSON document, optionally constrained by a JSON Schema.
    Json { schema: Option<Value> },
}

/// A single-turn generation request: one user prompt made of text and
/// images.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateRequest {
    pub system_instruction: Option<String>,
    pub parts: Vec<Part>,
    pub output: OutputFormat,
    /// Sampling temperature, 0.0 to 2.0 for Gemini models.
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateResponse {
    pub content: Vec<Part>,
    pub usage: Option<TokenUsage>,
    /// Provider-reported stop reason, e.g. `STOP` or `MAX_TOKENS`.
    pub finish_reason: Option<String>,
}
