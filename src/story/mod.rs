//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The story flow: build a prompt from the request, invoke the model, validate
// its structured output.
//
// | Component      | Description                                                |
// |----------------|------------------------------------------------------------|
// | types          | Input/output records and the length buckets                |
// | prompt         | Prompt templating and schema instructions                  |
// | schema         | JSON extraction and validation of model output             |
// | generator      | StoryGenerator tying prompt, model and schema together     |
//--------------------------------------------------------------------------------------------------

pub mod generator;
pub mod prompt;
pub mod schema;
pub mod types;

use thiserror::Error;

use crate::llm::LlmError;

pub use generator::StoryGenerator;
pub use types::{Story, StoryInput, StoryLength};

/// Errors raised by the story flow.
#[derive(Debug, Error)]
pub enum StoryError {
    /// Requested length is not one of the known buckets.
    #[error("Invalid length '{0}': expected one of short, medium, long")]
    InvalidLength(String),

    /// The model call failed.
    #[error(transparent)]
    Model(#[from] LlmError),

    /// The model returned nothing.
    #[error("Failed to generate story")]
    EmptyOutput,

    /// The model output does not match the story schema.
    #[error("Model output does not match the story schema: {0}")]
    InvalidOutput(String),
}
