//! Turns raw model text into a validated [`Story`].

use super::StoryError;
use super::types::Story;

/// Locates the JSON object in model output.
///
/// Accepts a bare object, an object inside a Markdown code fence, or an object
/// surrounded by prose. Returns the outermost `{ ... }` span.
pub fn extract_json(text: &str) -> Option<&str> {
    let body = strip_code_fence(text.trim());
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    (end > start).then(|| &body[start..=end])
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening fence line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Parses and validates model output against the story schema.
pub fn parse_story(text: &str) -> Result<Story, StoryError> {
    if text.trim().is_empty() {
        return Err(StoryError::EmptyOutput);
    }

    let json = extract_json(text)
        .ok_or_else(|| StoryError::InvalidOutput("no JSON object in model output".to_string()))?;

    // Any JSON number is a valid wordCount; serde_json never yields NaN or infinity.
    serde_json::from_str(json).map_err(|err| StoryError::InvalidOutput(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORY: &str = r#"{"title":"Starfall","genre":"sci-fi","story":"It began with a light.","wordCount":5,"themes":["hope"]}"#;

    #[test]
    fn test_extract_bare_object() {
        assert_eq!(extract_json(STORY), Some(STORY));
    }

    #[test]
    fn test_extract_from_code_fence() {
        let fenced = format!("```json\n{}\n```", STORY);
        assert_eq!(extract_json(&fenced), Some(STORY));

        let plain_fence = format!("```\n{}\n```\n", STORY);
        assert_eq!(extract_json(&plain_fence), Some(STORY));
    }

    #[test]
    fn test_extract_from_surrounding_prose() {
        let chatty = format!("Here is your story:\n{}\nEnjoy!", STORY);
        assert_eq!(extract_json(&chatty), Some(STORY));
    }

    #[test]
    fn test_extract_without_object() {
        assert_eq!(extract_json("no json here"), None);
        assert_eq!(extract_json("} backwards {"), None);
    }

    #[test]
    fn test_parse_valid_story() {
        let story = parse_story(STORY).unwrap();
        assert_eq!(story.title, "Starfall");
        assert_eq!(story.genre, "sci-fi");
        assert_eq!(story.word_count(), 5);
        assert_eq!(story.themes, vec!["hope".to_string()]);
    }

    #[test]
    fn test_parse_blank_output_is_empty_error() {
        let err = parse_story("  \n ").unwrap_err();
        assert!(matches!(err, StoryError::EmptyOutput));
        assert_eq!(err.to_string(), "Failed to generate story");
    }

    #[test]
    fn test_parse_missing_field() {
        let err = parse_story(r#"{"title":"t","genre":"g","story":"s","themes":[]}"#).unwrap_err();
        match err {
            StoryError::InvalidOutput(msg) => assert!(msg.contains("wordCount"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_wrong_type() {
        let err = parse_story(
            r#"{"title":"t","genre":"g","story":"s","wordCount":3,"themes":"hope"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, StoryError::InvalidOutput(_)));
    }

    #[test]
    fn test_parse_accepts_any_number_as_word_count() {
        let story = parse_story(
            r#"{"title":"t","genre":"g","story":"s","wordCount":-4,"themes":[]}"#,
        )
        .unwrap();
        assert_eq!(story.word_count, -4.0);
        assert_eq!(
            serde_json::to_value(&story).unwrap()["wordCount"],
            serde_json::json!(-4)
        );

        let err = parse_story(
            r#"{"title":"t","genre":"g","story":"s","wordCount":1e999,"themes":[]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, StoryError::InvalidOutput(_)));
    }
}
