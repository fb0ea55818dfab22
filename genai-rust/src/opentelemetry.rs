use crate::{GenerateRequest, GenerateResponse, LanguageModelResult, OutputFormat};
use opentelemetry::trace::Status;
use std::{future::Future, time::Instant};
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Run one `generate` call inside a `recollect_genai.generate` span carrying
/// OpenTelemetry `gen_ai.*` attributes.
pub async fn trace_generate<F, Fut>(
    provider: &'static str,
    model_id: &str,
    request: GenerateRequest,
    generate: F,
) -> LanguageModelResult<GenerateResponse>
where
    F: FnOnce(GenerateRequest) -> Fut,
    Fut: Future<Output = LanguageModelResult<GenerateResponse>>,
{
    let span = info_span!("recollect_genai.generate");
    record_request(&span, provider, model_id, &request);

    let started = Instant::now();
    let result = generate(request).instrument(span.clone()).await;

    match &result {
        Ok(response) => record_response(&span, response),
        Err(error) => {
            span.set_attribute("error.type", error_type(error));
            span.set_status(Status::error(error.to_string()));
        }
    }
    span.set_attribute(
        "recollect_genai.duration_seconds",
        started.elapsed().as_secs_f64(),
    );
    result
}

fn record_request(span: &Span, provider: &'static str, model_id: &str, request: &GenerateRequest) {
    span.set_attribute("gen_ai.operation.name", "generate_content");
    span.set_attribute("gen_ai.provider.name", provider);
    span.set_attribute("gen_ai.request.model", model_id.to_string());
    span.set_attribute(
        "gen_ai.output.type",
        match request.output {
            OutputFormat::Text => "text",
            OutputFormat::Json { .. } => "json",
        },
    );
    if let Ok(images) = i64::try_from(request.image_count()) {
        span.set_attribute("recollect_genai.request.images", images);
    }
    if let Some(temperature) = request.temperature {
        span.set_attribute("gen_ai.request.temperature", temperature);
    }
}

fn record_response(span: &Span, response: &GenerateResponse) {
    if let Some(usage) = response.usage {
        span.set_attribute("gen_ai.usage.input_tokens", i64::from(usage.input_tokens));
        span.set_attribute("gen_ai.usage.output_tokens", i64::from(usage.output_tokens));
    }
    if let Some(reason) = &response.finish_reason {
        span.set_attribute("gen_ai.response.finish_reasons", reason.clone());
    }
}

fn error_type(error: &crate::LanguageModelError) -> &'static str {
    use crate::LanguageModelError as E;
    match error {
        E::InvalidInput(_) => "invalid_input",
        E::Transport(_) => "transport",
        E::StatusCode(..) => "status_code",
        E::Invariant(..) => "invariant",
        E::Refusal(_) => "refusal",
    }
}
