use std::sync::Arc;

use tracing::{debug, info};

use super::StoryError;
use super::prompt;
use super::schema::parse_story;
use super::types::{Story, StoryInput};
use crate::llm::Llm;

/// The story flow: prompt the model once and validate what comes back.
#[derive(Clone)]
pub struct StoryGenerator {
    llm: Arc<dyn Llm>,
}

impl StoryGenerator {
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }

    /// Name of the provider behind this generator.
    pub fn provider(&self) -> &'static str {
        self.llm.name()
    }

    /// Generates one story for `input`.
    pub async fn generate(&self, input: &StoryInput) -> Result<Story, StoryError> {
        let prompt = prompt::render(input);
        debug!(provider = self.provider(), prompt_len = prompt.len(), "invoking model");

        let output = self.llm.complete(&prompt).await?;
        let story = parse_story(&output)?;

        info!(
            provider = self.provider(),
            length = %input.length,
            title = %story.title,
            word_count = story.word_count(),
            "story generated"
        );
        Ok(story)
    }
}
