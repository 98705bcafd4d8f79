//! Recover a JSON object from free model text.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::NormalizeError;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("valid regex")
});

/// Try, in order: the whole trimmed text, the first fenced code block, the
/// span from the first `{` to the last `}`. First object wins.
pub fn extract_json(text: &str) -> Result<Value, NormalizeError> {
    let cleaned = text.trim();
    if cleaned.is_empty() {
        return Err(NormalizeError::Empty);
    }

    if let Some(value) = parse_object(cleaned) {
        return Ok(value);
    }

    if let Some(value) = FENCED_BLOCK
        .captures(cleaned)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_object(m.as_str().trim()))
    {
        return Ok(value);
    }

    if let (Some(first), Some(last)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if last > first {
            if let Some(value) = parse_object(&cleaned[first..=last]) {
                return Ok(value);
            }
        }
    }

    tracing::debug!(
        preview = %cleaned.chars().take(200).collect::<String>(),
        "No JSON object in model output"
    );
    Err(NormalizeError::NoJson)
}

fn parse_object(candidate: &str) -> Option<Value> {
    serde_json::from_str::<Value>(candidate)
        .ok()
        .filter(Value::is_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_json() {
        let value = extract_json("  {\"a\": 1}\n").expect("object");
        assert_eq!(value, json!({ "a": 1 }));
    }

    #[test]
    fn test_fenced_json_with_prose() {
        let text = "Here is your audit:\n```json\n{\"a\": {\"b\": [1, 2]}}\n```\nLet me know!";
        assert_eq!(extract_json(text).expect("object"), json!({ "a": { "b": [1, 2] } }));
    }

    #[test]
    fn test_untagged_fence() {
        let text = "```\n{\"ok\": true}\n```";
        assert_eq!(extract_json(text).expect("object"), json!({ "ok": true }));
    }

    #[test]
    fn test_brace_span_fallback() {
        let text = "Sure! {\"score\": 42} Hope this helps.";
        assert_eq!(extract_json(text).expect("object"), json!({ "score": 42 }));
    }

    #[test]
    fn test_broken_fence_falls_through_to_braces() {
        let text = "```json\nnot json\n``` trailing {\"x\": 1}";
        assert_eq!(extract_json(text).expect("object"), json!({ "x": 1 }));
    }

    #[test]
    fn test_no_json_at_all() {
        assert!(matches!(
            extract_json("I cannot help with that."),
            Err(NormalizeError::NoJson)
        ));
    }

    #[test]
    fn test_empty_text() {
        assert!(matches!(extract_json("   \n"), Err(NormalizeError::Empty)));
    }

    #[test]
    fn test_bare_array_is_not_an_object() {
        assert!(matches!(extract_json("[1, 2, 3]"), Err(NormalizeError::NoJson)));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let inputs = [
            "prefix {\"a\": {\"b\": \"}\"}} suffix",
            "```json\n{\"list\": [1, {\"c\": null}]}\n```",
            "{\"plain\": \"text\"}",
        ];
        for input in inputs {
            let first = extract_json(input).expect("first pass");
            let second = extract_json(&first.to_string()).expect("second pass");
            assert_eq!(first, second);
        }
    }
}
