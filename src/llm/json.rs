//! Pull JSON documents out of free-form model replies.

use crate::error::{IdeacrewError, Result};
use serde::de::DeserializeOwned;

/// Extract the JSON part of a model reply.
///
/// Handles fenced code blocks and leading/trailing prose by taking the span
/// from the first `{` or `[` to the matching last `}` or `]`.
pub fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    let body = match trimmed.find("```") {
        Some(fence) => {
            let after = &trimmed[fence + 3..];
            // Skip a language tag such as ```json, unless the JSON starts on the fence line
            let after = match after.find('\n') {
                Some(nl) if !after[..nl].contains(['{', '[']) => &after[nl + 1..],
                _ => after,
            };
            match after.find("```") {
                Some(end) => &after[..end],
                None => after,
            }
        }
        None => trimmed,
    };

    let start = body.find(['{', '[']);
    let end = body.rfind(['}', ']']);

    match (start, end) {
        (Some(start), Some(end)) if end > start => &body[start..=end],
        _ => body.trim(),
    }
}

/// Parse a model reply into `T`, reporting failures against `stage`.
pub fn parse_json_response<T: DeserializeOwned>(stage: &str, response: &str) -> Result<T> {
    let json_str = extract_json(response);
    serde_json::from_str(json_str).map_err(|e| {
        IdeacrewError::malformed(
            stage,
            format!(
                "{}. Response was: {}",
                e,
                response.chars().take(500).collect::<String>()
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Ids {
        comment_ids: Vec<String>,
    }

    #[test]
    fn test_extract_plain_object() {
        assert_eq!(extract_json(r#"{"a": 1}"#), r#"{"a": 1}"#);
    }

    #[test]
    fn test_extract_from_fence_with_prose() {
        let reply = "Here you go:\n```json\n{\"comment_ids\": [\"c2\"]}\n```\nLet me know!";
        assert_eq!(extract_json(reply), "{\"comment_ids\": [\"c2\"]}");
    }

    #[test]
    fn test_extract_from_single_line_fence() {
        let reply = "```{\"comment_ids\":[\"c2\"]}```\nHope this helps.";
        assert_eq!(extract_json(reply), r#"{"comment_ids":["c2"]}"#);

        let reply = "```json {\"comment_ids\": []}\n```";
        assert_eq!(extract_json(reply), "{\"comment_ids\": []}");
    }

    #[test]
    fn test_extract_array() {
        let reply = "Sections: [1, 2, 3] done";
        assert_eq!(extract_json(reply), "[1, 2, 3]");
    }

    #[test]
    fn test_parse_reports_stage_on_failure() {
        let err = parse_json_response::<Ids>("filter_comments", "I could not decide.").unwrap_err();
        assert!(err.is_capability_failure());
        assert!(err.to_string().contains("filter_comments"));

        let ids: Ids = parse_json_response("filter_comments", "```\n{\"comment_ids\": []}\n```").unwrap();
        assert!(ids.comment_ids.is_empty());
    }
}
