//! Sends the quiz prompt to a model client and turns the reply into a raw
//! question list, classifying every failure on the way.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::core::{GenerationParams, LowLevelClient};
use crate::error::FetchError;
use crate::interceptors::Interceptor;
use crate::json_utils::{mcq_list, parse_model_json};
use crate::prompt::{build_prompt, Difficulty, REQUESTED_QUESTIONS};

/// Result of one fetch: the questions (empty on failure) and the message to
/// show the user when something went wrong.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    pub questions: Vec<Value>,
    pub notice: Option<String>,
}

impl FetchOutcome {
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct QuizFetcher<C: LowLevelClient> {
    client: C,
    params: GenerationParams,
    interceptor: Option<Arc<dyn Interceptor>>,
}

impl<C: LowLevelClient> QuizFetcher<C> {
    pub fn new(client: C) -> Self {
        info!("Creating new QuizFetcher");
        Self {
            client,
            params: GenerationParams::default(),
            interceptor: None,
        }
    }

    /// Record every prompt and raw reply through `interceptor`.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Fetch a quiz, never failing: errors become an empty list plus a notice.
    pub async fn fetch(&self, text: &str, level: Difficulty) -> FetchOutcome {
        match self.try_fetch(text, level).await {
            Ok(questions) => FetchOutcome { questions, notice: None },
            Err(e) => FetchOutcome {
                questions: Vec::new(),
                notice: Some(e.user_message()),
            },
        }
    }

    /// Fetch a quiz, returning the non-empty `mcqs` array or the classified failure.
    #[instrument(target = "quiz_forge::fetcher", skip(self, text, level), fields(text_len = text.len(), level = level.as_str()))]
    pub async fn try_fetch(&self, text: &str, level: Difficulty) -> Result<Vec<Value>, FetchError> {
        let prompt = build_prompt(text, level);
        debug!(prompt_len = prompt.len(), "Built quiz prompt");

        let raw = match self.client.ask_raw(prompt.clone(), &self.params).await {
            Ok(raw) => raw,
            Err(e) if e.is_rate_limit() => {
                warn!(error = %e, "Rate limit hit while generating quiz");
                return Err(e.into());
            }
            Err(e) if e.block_reason().is_some() => {
                warn!(error = %e, "Quiz generation was blocked");
                return Err(e.into());
            }
            Err(e) => {
                error!(error = %e, "Unexpected error while generating quiz");
                return Err(e.into());
            }
        };

        if let Some(interceptor) = &self.interceptor {
            if let Err(e) = interceptor.save(&prompt, &raw).await {
                warn!(error = %e, "Failed to record model response");
            }
        }

        let payload = parse_model_json(&raw).map_err(|e| {
            error!(error = %e, raw = %raw, "Failed to parse model response as JSON");
            FetchError::Parse(e, raw.clone())
        })?;

        let questions = mcq_list(&payload).cloned().ok_or_else(|| {
            error!(raw = %raw, "Model response has no usable mcqs list");
            FetchError::Structure
        })?;

        if questions.len() != REQUESTED_QUESTIONS {
            warn!(
                count = questions.len(),
                requested = REQUESTED_QUESTIONS,
                "Model returned a different number of questions than requested"
            );
        }
        info!(count = questions.len(), "Fetched quiz questions");
        Ok(questions)
    }
}
