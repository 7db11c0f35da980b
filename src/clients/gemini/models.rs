#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GeminiModel {
    #[default]
    Pro25,       // "gemini-2.5-pro"
    Flash25,     // "gemini-2.5-flash"
    Override(String),
}

impl GeminiModel {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Pro25 => "gemini-2.5-pro",
            Self::Flash25 => "gemini-2.5-flash",
            Self::Override(s) => s.as_str(),
        }
    }

    /// Map a model name to a known variant, keeping unknown names verbatim.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "gemini-2.5-pro" => Self::Pro25,
            "gemini-2.5-flash" => Self::Flash25,
            other => Self::Override(other.to_string()),
        }
    }
}

impl std::fmt::Display for GeminiModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
