use serde_json::Value;
use tracing::{debug, instrument};

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Remove a ```` ```json ```` / ```` ``` ```` wrapper if present.
///
/// Surrounding whitespace is trimmed before and after stripping. Text without
/// the wrapper comes back trimmed but otherwise untouched.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed.strip_prefix(FENCE_OPEN).unwrap_or(trimmed);
    let without_close = without_open.strip_suffix(FENCE_CLOSE).unwrap_or(without_open);
    without_close.trim()
}

/// Strip an optional code fence and parse what is left as JSON.
#[instrument(target = "quiz_forge::json", skip(text), fields(text_len = text.len()))]
pub fn parse_model_json(text: &str) -> Result<Value, serde_json::Error> {
    let cleaned = strip_code_fence(text);
    debug!(target: "quiz_forge::json", cleaned_len = cleaned.len(), "parsing model payload");
    serde_json::from_str(cleaned)
}

/// The non-empty `mcqs` array of a parsed payload, if the payload has one.
pub fn mcq_list(payload: &Value) -> Option<&Vec<Value>> {
    payload
        .get("mcqs")
        .and_then(Value::as_array)
        .filter(|list| !list.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        assert_eq!(strip_code_fence("  ```json\n{\"a\":1}\n```  "), "{\"a\":1}");
    }

    #[test]
    fn leaves_plain_json_alone() {
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn bare_fence_without_language_keeps_opening_marker() {
        // Only the literal ```json prefix is recognised.
        assert_eq!(strip_code_fence("```\n{}\n```"), "```\n{}");
    }

    #[test]
    fn mcq_list_requires_non_empty_array() {
        let ok: Value = serde_json::json!({ "mcqs": [{ "mcq": "q" }] });
        assert_eq!(mcq_list(&ok).map(Vec::len), Some(1));
        assert!(mcq_list(&serde_json::json!({ "mcqs": [] })).is_none());
        assert!(mcq_list(&serde_json::json!({ "mcqs": "three" })).is_none());
        assert!(mcq_list(&serde_json::json!({ "questions": [1] })).is_none());
        assert!(mcq_list(&serde_json::json!([1, 2])).is_none());
    }
}
