use super::types::StoryInput;

/// Style used when the input names none.
pub const FALLBACK_STYLE: &str = "fictional";

/// Builds the creative brief sent to the model.
pub fn build_prompt(input: &StoryInput) -> String {
    let style = input
        .style
        .as_deref()
        .filter(|style| !style.is_empty())
        .unwrap_or(FALLBACK_STYLE);

    format!(
        "Create a creative {style} story with the following requirements:\n\
         \x20 Topic: {topic}\n\
         \x20 Length: {words} words\n\
         \n\
         \x20 Please provide a captivating story with a clear beginning, middle, and end.\n\
         \x20 Include rich descriptions and engaging characters.",
        style = style,
        topic = input.topic,
        words = input.length.word_range(),
    )
}

/// Instructions that pin the reply to the story schema.
pub fn format_instructions() -> &'static str {
    concat!(
        "Respond with a single JSON object and nothing else. ",
        "Do not wrap it in Markdown. The object must have exactly these fields:\n",
        "  \"title\": string, the story title\n",
        "  \"genre\": string, the story genre\n",
        "  \"story\": string, the full story text\n",
        "  \"wordCount\": number, the number of words in \"story\"\n",
        "  \"themes\": array of strings, the main themes of the story",
    )
}

/// Brief plus schema instructions, as sent to the provider.
pub fn render(input: &StoryInput) -> String {
    format!("{}\n\n{}", build_prompt(input), format_instructions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::types::StoryLength;

    #[test]
    fn test_prompt_includes_topic_style_and_range() {
        let input = StoryInput::new(
            "a lighthouse keeper",
            Some("mystery".to_string()),
            StoryLength::Long,
        );
        let prompt = build_prompt(&input);

        assert!(prompt.starts_with("Create a creative mystery story"));
        assert!(prompt.contains("Topic: a lighthouse keeper"));
        assert!(prompt.contains("Length: 1000-1500 words"));
        assert!(prompt.contains("clear beginning, middle, and end"));
    }

    #[test]
    fn test_missing_or_empty_style_falls_back() {
        let none = StoryInput::new("x", None, StoryLength::Short);
        assert!(build_prompt(&none).starts_with("Create a creative fictional story"));

        let empty = StoryInput::new("x", Some(String::new()), StoryLength::Short);
        assert!(build_prompt(&empty).starts_with("Create a creative fictional story"));
        assert!(build_prompt(&empty).contains("Length: 200-300 words"));
    }

    #[test]
    fn test_whitespace_style_is_kept_verbatim() {
        let blank = StoryInput::new("x", Some("  ".to_string()), StoryLength::Short);
        assert!(build_prompt(&blank).starts_with("Create a creative    story"));
    }

    #[test]
    fn test_render_appends_every_schema_field() {
        let rendered = render(&StoryInput::new("x", None, StoryLength::Medium));
        for field in ["\"title\"", "\"genre\"", "\"story\"", "\"wordCount\"", "\"themes\""] {
            assert!(rendered.contains(field), "missing {field}");
        }
        assert!(rendered.contains("JSON"));
    }
}
