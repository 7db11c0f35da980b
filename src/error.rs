use thiserror::Error;

#[derive(Error, Debug)]
pub enum AIError {
    #[error("Gemini API error: {0}")]
    Gemini(#[from] GeminiError),
    #[error("Mock client error: {0}")]
    Mock(String),
}

impl AIError {
    /// True when the service refused the call because of quota or rate limits.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, AIError::Gemini(GeminiError::RateLimit))
    }

    /// The block reason when the service returned no usable content.
    pub fn block_reason(&self) -> Option<&str> {
        match self {
            AIError::Gemini(GeminiError::Blocked(reason)) => Some(reason.as_str()),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed")]
    Authentication,
    #[error("Response was empty or blocked. Reason: {0}")]
    Blocked(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} not found. Please set the {0} in your .env file.")]
    MissingKey(&'static str),
}

/// Strict validation failures for a single generated question.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("question {index}: missing field '{field}'")]
    MissingField { index: usize, field: &'static str },
    #[error("question {index}: missing option '{letter}'")]
    MissingOption { index: usize, letter: char },
    #[error("question {index}: correct answer '{value}' is not one of a, b, c, d")]
    InvalidCorrect { index: usize, value: String },
    #[error("question {index}: expected an object")]
    NotAnObject { index: usize },
    #[error("no questions to build a quiz from")]
    Empty,
}

/// Everything that can go wrong between sending the prompt and holding a question list.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("AI error: {0}")]
    Ai(#[from] AIError),
    #[error("JSON parse error: {0}. Raw response: {1}")]
    Parse(#[source] serde_json::Error, String),
    #[error("unexpected JSON structure or empty MCQs list")]
    Structure,
}

impl FetchError {
    /// The single message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Ai(e) if e.is_rate_limit() => {
                "Rate limit exceeded. The API is busy. Please wait a minute and try again.".to_string()
            }
            FetchError::Ai(e) => match e.block_reason() {
                Some(reason) => format!(
                    "Failed to generate quiz. Response was empty or blocked. Reason: {}",
                    reason
                ),
                None => format!("An unexpected error occurred: {}", e),
            },
            FetchError::Parse(..) => {
                "Failed to parse the API response as JSON. Check console log for raw response.".to_string()
            }
            FetchError::Structure => {
                "API returned unexpected JSON structure or empty MCQs list.".to_string()
            }
        }
    }
}
