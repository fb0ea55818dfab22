use super::api::{
    Content, GenerateContentBody, GenerateContentReply, GenerationConfig, InlineData, WirePart,
};
use crate::{
    client_utils, opentelemetry::trace_generate, GenerateRequest, GenerateResponse,
    LanguageModel, LanguageModelError, LanguageModelResult, OutputFormat, Part, TokenUsage,
};
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};

const PROVIDER: &str = "google";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini through the Generative Language REST API.
pub struct GoogleModel {
    model_id: String,
    api_key: String,
    base_url: String,
    client: Client,
}

#[derive(Clone, Default)]
pub struct GoogleModelOptions {
    pub api_key: String,
    /// Defaults to the public `v1beta` endpoint.
    pub base_url: Option<String>,
    pub client: Option<Client>,
}

impl GoogleModel {
    #[must_use]
    pub fn new(model_id: impl Into<String>, options: GoogleModelOptions) -> Self {
        let base_url = options
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Self {
            model_id: model_id.into(),
            api_key: options.api_key,
            base_url,
            client: options.client.unwrap_or_default(),
        }
    }

    // The key goes in a header: transport errors embed the URL in their
    // message and would otherwise leak it into logs.
    fn headers(&self) -> LanguageModelResult<HeaderMap> {
        let mut key = HeaderValue::from_str(&self.api_key).map_err(|_| {
            LanguageModelError::InvalidInput("Gemini API key is not a valid header value".into())
        })?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);
        Ok(headers)
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model_id)
    }
}

#[async_trait::async_trait]
impl LanguageModel for GoogleModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(&self, request: GenerateRequest) -> LanguageModelResult<GenerateResponse> {
        trace_generate(PROVIDER, &self.model_id, request, |request| async move {
            let headers = self.headers()?;
            let body = to_request_body(request);
            let reply: GenerateContentReply =
                client_utils::post_json(&self.client, &self.endpoint(), headers, &body).await?;
            from_reply(reply)
        })
        .await
    }
}

fn to_request_body(request: GenerateRequest) -> GenerateContentBody {
    let (response_mime_type, response_json_schema) = match request.output {
        OutputFormat::Text => (None, None),
        OutputFormat::Json { schema } => (Some("application/json".to_string()), schema),
    };

    GenerateContentBody {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: request.parts.into_iter().map(to_wire_part).collect(),
        }],
        system_instruction: request.system_instruction.map(|text| Content {
            role: None,
            parts: vec![WirePart {
                text: Some(text),
                ..Default::default()
            }],
        }),
        generation_config: Some(GenerationConfig {
            temperature: request.temperature,
            response_mime_type,
            response_json_schema,
        }),
    }
}

fn to_wire_part(part: Part) -> WirePart {
    match part {
        Part::Text(text) => WirePart {
            text: Some(text),
            ..Default::default()
        },
        Part::Image { mime_type, data } => WirePart {
            inline_data: Some(InlineData { mime_type, data }),
            ..Default::default()
        },
    }
}

fn from_reply(reply: GenerateContentReply) -> LanguageModelResult<GenerateResponse> {
    let usage = reply.usage_metadata.map(|usage| TokenUsage {
        input_tokens: usage.prompt_token_count,
        output_tokens: usage.candidates_token_count,
    });

    let Some(candidate) = reply.candidates.into_iter().next() else {
        let blocked = reply.prompt_feedback.and_then(|feedback| feedback.block_reason);
        return Err(match blocked {
            Some(reason) => LanguageModelError::Refusal(format!("Prompt blocked: {reason}")),
            None => LanguageModelError::Invariant(PROVIDER, "no candidate in reply".into()),
        });
    };

    let content: Vec<Part> = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|part| part.thought != Some(true))
        .filter_map(from_wire_part)
        .collect();

    if content.is_empty() && candidate.finish_reason.as_deref() == Some("SAFETY") {
        return Err(LanguageModelError::Refusal(
            "Candidate blocked for safety reasons".into(),
        ));
    }

    Ok(GenerateResponse {
        content,
        usage,
        finish_reason: candidate.finish_reason,
    })
}

fn from_wire_part(part: WirePart) -> Option<Part> {
    part.text.map(Part::Text)
}
