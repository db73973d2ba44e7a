//--------------------------------------------------------------------------------------------------
// STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name           | Description                                       | Key Methods       |
// |----------------|---------------------------------------------------|-------------------|
// | StoryInput     | Validated request for one story                   | new               |
// | Story          | Structured story returned by the model            | word_count        |
//--------------------------------------------------------------------------------------------------
// ENUMS
//--------------------------------------------------------------------------------------------------
// | Name           | Description                                       | Key Methods       |
// |----------------|---------------------------------------------------|-------------------|
// | StoryLength    | Requested length bucket                           | word_range        |
//--------------------------------------------------------------------------------------------------

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use super::StoryError;

/// Length bucket for a story; each maps to a target word range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl StoryLength {
    /// Target word range handed to the model.
    pub fn word_range(self) -> &'static str {
        match self {
            Self::Short => "200-300",
            Self::Medium => "500-700",
            Self::Long => "1000-1500",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for StoryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryLength {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            other => Err(StoryError::InvalidLength(other.to_string())),
        }
    }
}

/// Input to the story flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryInput {
    /// Main topic or theme of the story.
    pub topic: String,
    /// Writing style such as adventure, mystery or sci-fi.
    pub style: Option<String>,
    #[serde(default)]
    pub length: StoryLength,
}

impl StoryInput {
    pub fn new(topic: impl Into<String>, style: Option<String>, length: StoryLength) -> Self {
        Self {
            topic: topic.into(),
            style,
            length,
        }
    }
}

/// Structured story produced by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub title: String,
    pub genre: String,
    pub story: String,
    #[serde(serialize_with = "serialize_word_count")]
    pub word_count: f64,
    pub themes: Vec<String>,
}

impl Story {
    /// Word count rounded to a whole number.
    pub fn word_count(&self) -> u64 {
        self.word_count.max(0.0).round() as u64
    }
}

// Whole counts go out as JSON integers, anything else as a float.
fn serialize_word_count<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract() != 0.0 {
        serializer.serialize_f64(*value)
    } else if *value >= 0.0 && *value <= u64::MAX as f64 {
        serializer.serialize_u64(*value as u64)
    } else if *value >= i64::MIN as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
