//! Model client abstraction shared by the real Gemini client, the mock and
//! the runtime-selectable wrapper.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AIError;

/// Generation settings sent alongside every prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_output_tokens: 1500,
            response_mime_type: "application/json".to_string(),
        }
    }
}

/// Low-level model client abstraction.
///
/// Implementors execute a prompt and return the raw model text. A response
/// without usable content is reported as an error carrying the block reason,
/// so callers only ever see text or a classified failure.
#[async_trait]
pub trait LowLevelClient: Send + Sync + Debug {
    /// The only method that implementations must provide
    async fn ask_raw(&self, prompt: String, params: &GenerationParams) -> Result<String, AIError>;

    /// Clone this client into a boxed trait object
    fn clone_box(&self) -> Box<dyn LowLevelClient>;
}

impl Clone for Box<dyn LowLevelClient> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
impl LowLevelClient for Box<dyn LowLevelClient> {
    async fn ask_raw(&self, prompt: String, params: &GenerationParams) -> Result<String, AIError> {
        self.as_ref().ask_raw(prompt, params).await
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        self.as_ref().clone_box()
    }
}
