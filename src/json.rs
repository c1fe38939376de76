//! Recovery of JSON values from loosely formatted model output.
//!
//! Models asked for JSON still wrap it in markdown fences or surround it
//! with prose. The parser tries, in order: the raw text, the text with
//! fence markers removed, and the span from the first `{` to the last `}`.
//! The first attempt that parses wins; if none do the result is `None`.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parse `text` as JSON, tolerating fences and surrounding prose.
pub fn tolerant_json_parse(text: &str) -> Option<Value> {
    tolerant_json_parse_as(text)
}

/// Same recovery pipeline as [`tolerant_json_parse`], decoding into `T`.
pub fn tolerant_json_parse_as<T: DeserializeOwned>(text: &str) -> Option<T> {
    if text.is_empty() {
        return None;
    }

    match serde_json::from_str(text) {
        Ok(value) => return Some(value),
        Err(e) => tracing::debug!("Direct JSON parse failed: {}", e),
    }

    let unfenced = strip_fences(text);
    match serde_json::from_str(unfenced.trim()) {
        Ok(value) => return Some(value),
        Err(e) => tracing::debug!("Unfenced JSON parse failed: {}", e),
    }

    let candidate = brace_span(text)?;
    match serde_json::from_str(candidate) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("Brace-span JSON parse failed: {}", e);
            None
        }
    }
}

/// Removes every ```` ```json ```` (any case) and ```` ``` ```` marker.
fn strip_fences(text: &str) -> String {
    const FENCE: &str = "```";
    const LANG: &str = "json";

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(idx) = rest.find(FENCE) {
        out.push_str(&rest[..idx]);
        rest = &rest[idx + FENCE.len()..];

        if rest
            .get(..LANG.len())
            .is_some_and(|tag| tag.eq_ignore_ascii_case(LANG))
        {
            rest = &rest[LANG.len()..];
        }
    }

    out.push_str(rest);
    out
}

/// Slice from the first `{` through the last `}`, inclusive.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start <= end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_parses_plain_json() {
        assert_eq!(
            tolerant_json_parse(r#"{"title": "Dune", "year": 1965}"#),
            Some(json!({"title": "Dune", "year": 1965}))
        );
    }

    #[test]
    fn test_parses_plain_array() {
        assert_eq!(tolerant_json_parse("[1, 2, 3]"), Some(json!([1, 2, 3])));
    }

    #[test]
    fn test_strips_json_fence() {
        let text = "```json\n{\"ok\": true}\n```";
        assert_eq!(tolerant_json_parse(text), Some(json!({"ok": true})));
    }

    #[test]
    fn test_strips_uppercase_fence_tag() {
        let text = "```JSON\n{\"ok\": true}\n```";
        assert_eq!(tolerant_json_parse(text), Some(json!({"ok": true})));
    }

    #[test]
    fn test_strips_bare_fence_around_array() {
        let text = "```\n[\"a\", \"b\"]\n```";
        assert_eq!(tolerant_json_parse(text), Some(json!(["a", "b"])));
    }

    #[test]
    fn test_extracts_object_from_prose() {
        let text = "Sure! Here is the data you asked for:\n{\"name\": \"Ada\", \"tags\": [\"x\"]}\nLet me know if you need more.";
        assert_eq!(
            tolerant_json_parse(text),
            Some(json!({"name": "Ada", "tags": ["x"]}))
        );
    }

    #[test]
    fn test_extracts_nested_object_using_outermost_braces() {
        let text = "result: {\"a\": {\"b\": 1}} done";
        assert_eq!(tolerant_json_parse(text), Some(json!({"a": {"b": 1}})));
    }

    #[test]
    fn test_all_shapes_agree() {
        let minimal = r#"{"score": 7, "notes": ["fast", "clean"]}"#;
        let expected: Value = serde_json::from_str(minimal).unwrap();

        let fenced = format!("```json\n{}\n```", minimal);
        let prose = format!("Here you go: {} Hope that helps.", minimal);

        assert_eq!(tolerant_json_parse(minimal), Some(expected.clone()));
        assert_eq!(tolerant_json_parse(&fenced), Some(expected.clone()));
        assert_eq!(tolerant_json_parse(&prose), Some(expected));
    }

    #[test]
    fn test_empty_input_is_none() {
        assert_eq!(tolerant_json_parse(""), None);
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(tolerant_json_parse("not json at all"), None);
    }

    #[test]
    fn test_unbalanced_braces_are_none() {
        assert_eq!(tolerant_json_parse("} backwards {"), None);
        assert_eq!(tolerant_json_parse("{ never closed"), None);
    }

    #[test]
    fn test_broken_brace_span_is_none() {
        assert_eq!(tolerant_json_parse("prefix {\"a\": } suffix"), None);
    }

    #[test]
    fn test_whitespace_only_is_none() {
        assert_eq!(tolerant_json_parse("   \n\t"), None);
    }

    #[test]
    fn test_typed_parse() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Verdict {
            passed: bool,
            reason: String,
        }

        let text = "```json\n{\"passed\": false, \"reason\": \"too long\"}\n```";
        assert_eq!(
            tolerant_json_parse_as::<Verdict>(text),
            Some(Verdict {
                passed: false,
                reason: "too long".to_string(),
            })
        );
    }

    #[test]
    fn test_typed_parse_shape_mismatch_is_none() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Verdict {
            passed: bool,
        }

        assert!(tolerant_json_parse_as::<Verdict>(r#"{"other": 1}"#).is_none());
    }

    #[test]
    fn test_strip_fences_keeps_inner_text() {
        assert_eq!(strip_fences("a```jsonb```c"), "abc");
        assert_eq!(strip_fences("no fences"), "no fences");
    }
}
