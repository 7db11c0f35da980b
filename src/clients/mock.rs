use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use crate::core::{GenerationParams, LowLevelClient};
use crate::error::{AIError, GeminiError};

/// One scripted reply from the mock.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(String),
    Blocked(String),
    RateLimit,
    Failure(String),
}

impl MockResponse {
    fn into_result(self) -> Result<String, AIError> {
        match self {
            MockResponse::Success(text) => Ok(text),
            MockResponse::Blocked(reason) => Err(GeminiError::Blocked(reason).into()),
            MockResponse::RateLimit => Err(GeminiError::RateLimit.into()),
            MockResponse::Failure(message) => Err(AIError::Mock(message)),
        }
    }
}

/// A prompt as the mock received it.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub params: GenerationParams,
}

/// Control side of a [`MockClient`]: queue replies and inspect calls.
#[derive(Debug, Default)]
pub struct MockHandle {
    responses: Mutex<VecDeque<MockResponse>>,
    fallback: Mutex<Option<MockResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockHandle {
    pub fn add_response(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Reply used once the queue is drained.
    pub fn set_fallback(&self, response: MockResponse) {
        *self.fallback.lock().unwrap() = Some(response);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.calls.lock().unwrap().last().map(|call| call.prompt.clone())
    }

    fn next(&self, call: RecordedCall) -> MockResponse {
        self.calls.lock().unwrap().push(call);
        let queued = self.responses.lock().unwrap().pop_front();
        queued
            .or_else(|| self.fallback.lock().unwrap().clone())
            .unwrap_or_else(|| MockResponse::Failure("no mock response queued".to_string()))
    }
}

/// Mock client for tests and offline runs
#[derive(Debug, Clone)]
pub struct MockClient {
    handle: Arc<MockHandle>,
}

impl MockClient {
    pub fn new() -> (Self, Arc<MockHandle>) {
        let handle = Arc::new(MockHandle::default());
        (Self { handle: handle.clone() }, handle)
    }

    pub fn with_responses(responses: Vec<MockResponse>) -> (Self, Arc<MockHandle>) {
        let (client, handle) = Self::new();
        for response in responses {
            handle.add_response(response);
        }
        (client, handle)
    }
}

#[async_trait]
impl LowLevelClient for MockClient {
    async fn ask_raw(&self, prompt: String, params: &GenerationParams) -> Result<String, AIError> {
        debug!(prompt_len = prompt.len(), "Mock client answering");
        let response = self.handle.next(RecordedCall {
            prompt,
            params: params.clone(),
        });
        response.into_result()
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}
