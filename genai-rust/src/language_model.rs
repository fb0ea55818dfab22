use crate::{GenerateRequest, GenerateResponse, LanguageModelResult};

/// A generative model answering single-turn prompts.
///
/// Shared as `Arc<dyn LanguageModel>` between every caller.
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    fn provider(&self) -> &'static str;
    fn model_id(&self) -> String;
    async fn generate(&self, request: GenerateRequest) -> LanguageModelResult<GenerateResponse>;
}
