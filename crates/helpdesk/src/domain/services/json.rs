//! Helpers for reading structured answers out of free-form LLM output

use serde_json::Value;

use crate::domain::errors::DomainError;

const JSON_FENCE_OPEN: &str = "```json\n";
const JSON_FENCE_CLOSE: &str = "\n```";

/// Extract a JSON value from an LLM response.
///
/// Tried in order: the whole text, the first ```json fenced block, and the
/// span from the first `{` to the last `}`.
pub fn extract_json_object(text: &str) -> Result<Value, DomainError> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }

    if let Some(start) = text.find(JSON_FENCE_OPEN) {
        let body_start = start + JSON_FENCE_OPEN.len();
        if let Some(len) = text[body_start..].find(JSON_FENCE_CLOSE) {
            if let Ok(value) = serde_json::from_str::<Value>(&text[body_start..body_start + len]) {
                return Ok(value);
            }
        }
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start {
            if let Ok(value) = serde_json::from_str::<Value>(&text[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(DomainError::Parse(
        "Could not extract valid JSON from the response".to_string(),
    ))
}

/// Interpret a yes/no answer to "is this a support request?"
pub fn parse_support_verdict(text: &str) -> bool {
    let answer = text.trim().to_lowercase();
    let head: String = answer.chars().take(3).collect();
    answer.contains("yes") && !head.contains("no")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_plain_json() {
        let value = extract_json_object(r#"{"department": "Billing"}"#).unwrap();
        assert_eq!(value, json!({"department": "Billing"}));
    }

    #[test]
    fn test_extract_fenced_json() {
        let text = "Here is the routing:\n```json\n{\"priority\": \"High\"}\n```\nThanks";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["priority"], "High");
    }

    #[test]
    fn test_extract_embedded_braces() {
        let text = "Sure! {\"category\": \"Technical\", \"tags\": {\"a\": 1}} Let me know.";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["category"], "Technical");
        assert_eq!(value["tags"]["a"], 1);
    }

    #[test]
    fn test_extract_fails_without_json() {
        let err = extract_json_object("I could not decide.").unwrap_err();
        assert!(err
            .to_string()
            .contains("Could not extract valid JSON from the response"));
    }

    #[test]
    fn test_extract_fails_on_broken_braces() {
        assert!(extract_json_object("} nope {").is_err());
        assert!(extract_json_object("{ not json }").is_err());
    }

    #[test]
    fn test_support_verdict() {
        assert!(parse_support_verdict("Yes"));
        assert!(parse_support_verdict("  yes, this is a support request\n"));
        assert!(!parse_support_verdict("No"));
        assert!(!parse_support_verdict("No, but yes it mentions a product"));
        assert!(!parse_support_verdict("Maybe"));
        // "not" starts with "no"
        assert!(!parse_support_verdict("not really, yes"));
    }
}
