use std::env;

use crate::error::ConfigError;

/// Trait for types that can retrieve their configuration key from environment variables
pub trait KeyFromEnv {
    /// The environment variable name for this client's API key
    const KEY_NAME: &'static str;

    /// Find the API key by checking environment variables first, then .env file
    fn find_key() -> Option<String> {
        // First try to load .env file (silently fail if not found)
        let _ = dotenvy::dotenv();

        env::var(Self::KEY_NAME)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// Like `find_key`, but a missing key is a configuration error.
    fn require_key() -> Result<String, ConfigError> {
        Self::find_key().ok_or(ConfigError::MissingKey(Self::KEY_NAME))
    }
}

/// Read an optional setting, treating blank values as unset.
pub fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unset;

    impl KeyFromEnv for Unset {
        const KEY_NAME: &'static str = "QUIZ_FORGE_TEST_KEY_THAT_IS_NEVER_SET";
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = Unset::require_key().unwrap_err();
        assert_eq!(
            err.to_string(),
            "QUIZ_FORGE_TEST_KEY_THAT_IS_NEVER_SET not found. Please set the QUIZ_FORGE_TEST_KEY_THAT_IS_NEVER_SET in your .env file."
        );
    }

    #[test]
    fn blank_optional_var_is_unset() {
        env::set_var("QUIZ_FORGE_TEST_BLANK", "   ");
        assert_eq!(optional_var("QUIZ_FORGE_TEST_BLANK"), None);
        env::set_var("QUIZ_FORGE_TEST_SET", "gemini-2.5-flash");
        assert_eq!(optional_var("QUIZ_FORGE_TEST_SET").as_deref(), Some("gemini-2.5-flash"));
    }
}
