//--------------------------------------------------------------------------------------------------
// STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name                 | Description                               | Key Methods         |
// |----------------------|-------------------------------------------|---------------------|
// | StoryRequest         | Raw request body, every field optional    | from_body, into_input|
// | StoryResponse        | Success envelope carrying the story       | ok                  |
// | ErrorResponse        | Failure envelope carrying the message     | new                 |
//--------------------------------------------------------------------------------------------------

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;

use crate::story::{Story, StoryError, StoryInput, StoryLength};

/// Topic used when the request names none.
pub const DEFAULT_TOPIC: &str = "a brave explorer on an alien planet";

/// Style used when the request names none.
pub const DEFAULT_STYLE: &str = "adventure";

/// Request body for story generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryRequest {
    /// Main topic or theme for the story
    #[serde(deserialize_with = "falsy_as_none")]
    pub topic: Option<String>,
    /// Writing style (adventure, mystery, sci-fi, ...)
    #[serde(deserialize_with = "falsy_as_none")]
    pub style: Option<String>,
    /// One of "short", "medium" or "long"
    #[serde(deserialize_with = "falsy_as_none")]
    pub length: Option<String>,
}

impl StoryRequest {
    /// Parses a request body; a zero-length body is an empty request.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
    }

    /// Fills missing or empty fields with defaults and validates the length.
    pub fn into_input(self) -> Result<StoryInput, StoryError> {
        let topic = present(self.topic).unwrap_or_else(|| DEFAULT_TOPIC.to_string());
        let style = present(self.style).unwrap_or_else(|| DEFAULT_STYLE.to_string());
        let length = match present(self.length) {
            Some(raw) => raw.parse()?,
            None => StoryLength::default(),
        };

        Ok(StoryInput::new(topic, Some(style), length))
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `null`, `false`, `0` and `""` read as an absent field; any other
/// non-string value is rejected.
fn falsy_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Number(n) if n.as_f64() == Some(0.0) => Ok(None),
        other => Err(D::Error::custom(format!(
            "invalid type: {other}, expected a string"
        ))),
    }
}

/// Successful response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryResponse {
    pub success: bool,
    pub data: Story,
}

impl StoryResponse {
    pub fn ok(story: Story) -> Self {
        Self {
            success: true,
            data: story,
        }
    }
}

/// Failure response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_uses_all_defaults() {
        let input = StoryRequest::from_body(b"").unwrap().into_input().unwrap();

        assert_eq!(input.topic, DEFAULT_TOPIC);
        assert_eq!(input.style.as_deref(), Some(DEFAULT_STYLE));
        assert_eq!(input.length, StoryLength::Medium);
    }

    #[test]
    fn test_empty_strings_and_nulls_use_defaults() {
        let body = br#"{"topic": "", "style": null, "length": ""}"#;
        let input = StoryRequest::from_body(body).unwrap().into_input().unwrap();

        assert_eq!(input.topic, DEFAULT_TOPIC);
        assert_eq!(input.style.as_deref(), Some(DEFAULT_STYLE));
        assert_eq!(input.length, StoryLength::Medium);
    }

    #[test]
    fn test_provided_fields_are_kept() {
        let body = br#"{"topic": "a clockwork city", "style": "steampunk", "length": "short", "extra": 1}"#;
        let input = StoryRequest::from_body(body).unwrap().into_input().unwrap();

        assert_eq!(input.topic, "a clockwork city");
        assert_eq!(input.style.as_deref(), Some("steampunk"));
        assert_eq!(input.length, StoryLength::Short);
    }

    #[test]
    fn test_unknown_length_is_rejected() {
        let body = br#"{"length": "novel"}"#;
        let err = StoryRequest::from_body(body).unwrap().into_input().unwrap_err();
        assert!(matches!(err, StoryError::InvalidLength(ref l) if l == "novel"));
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(StoryRequest::from_body(b"{not json").is_err());
        assert!(StoryRequest::from_body(br#"{"topic": 42}"#).is_err());
        assert!(StoryRequest::from_body(br#"{"style": true}"#).is_err());
        assert!(StoryRequest::from_body(br#"{"length": ["short"]}"#).is_err());
    }

    #[test]
    fn test_whitespace_body_is_not_empty() {
        assert!(StoryRequest::from_body(b"   ").is_err());
        assert!(StoryRequest::from_body(b"\n").is_err());
    }

    #[test]
    fn test_falsy_fields_use_defaults() {
        let body = br#"{"topic": 0, "style": false, "length": 0.0}"#;
        let input = StoryRequest::from_body(body).unwrap().into_input().unwrap();

        assert_eq!(input.topic, DEFAULT_TOPIC);
        assert_eq!(input.style.as_deref(), Some(DEFAULT_STYLE));
        assert_eq!(input.length, StoryLength::Medium);
    }

    #[test]
    fn test_error_response_shape() {
        let value = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert_eq!(value, serde_json::json!({"success": false, "error": "boom"}));
    }
}
