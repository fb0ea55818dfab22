use crate::{
    GenerateRequest, GenerateResponse, LanguageModel, LanguageModelError, LanguageModelResult,
};
use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// What the mock answers to one `generate` call.
pub enum MockGenerateResult {
    Response(GenerateResponse),
    Error(LanguageModelError),
}

impl MockGenerateResult {
    /// A reply consisting of a single text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Response(GenerateResponse::from_text(text))
    }
}

impl From<GenerateResponse> for MockGenerateResult {
    fn from(response: GenerateResponse) -> Self {
        Self::Response(response)
    }
}

impl From<LanguageModelError> for MockGenerateResult {
    fn from(error: LanguageModelError) -> Self {
        Self::Error(error)
    }
}

#[derive(Default)]
struct MockState {
    queued: VecDeque<MockGenerateResult>,
    requests: Vec<GenerateRequest>,
}

/// A [`LanguageModel`] that replays queued results in order and records
/// every request it receives. Generating with an empty queue is an
/// [`LanguageModelError::Invariant`] error.
#[derive(Default)]
pub struct MockLanguageModel {
    state: Mutex<MockState>,
}

impl MockLanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue_generate(&self, result: impl Into<MockGenerateResult>) -> &Self {
        self.state().queued.push_back(result.into());
        self
    }

    /// Every request received so far, oldest first.
    pub fn tracked_requests(&self) -> Vec<GenerateRequest> {
        self.state().requests.clone()
    }

    // Poisoning only means another test panicked mid-call.
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl LanguageModel for MockLanguageModel {
    fn provider(&self) -> &'static str {
        "mock"
    }

    fn model_id(&self) -> String {
        "mock-model".to_string()
    }

    async fn generate(&self, request: GenerateRequest) -> LanguageModelResult<GenerateResponse> {
        let mut state = self.state();
        state.requests.push(request);
        match state.queued.pop_front() {
            Some(MockGenerateResult::Response(response)) => Ok(response),
            Some(MockGenerateResult::Error(error)) => Err(error),
            None => Err(LanguageModelError::Invariant(
                "mock",
                "no queued generate result".to_string(),
            )),
        }
    }
}
