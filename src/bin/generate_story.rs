//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Runs the story flow once from the command line and prints the story as JSON.
//--------------------------------------------------------------------------------------------------

use anyhow::Context;
use clap::Parser;
use tracing::info;

use story_generator::{
    LlmConfig, StoryGenerator, StoryInput, StoryLength, api::DEFAULT_TOPIC, build_llm,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "generate-story", version, about = "Generate one story and print it as JSON")]
struct Args {
    /// Main topic or theme for the story
    #[arg(long, default_value = DEFAULT_TOPIC)]
    topic: String,

    /// Writing style (adventure, mystery, sci-fi, ...)
    #[arg(long)]
    style: Option<String>,

    /// short, medium or long
    #[arg(long, default_value = "medium")]
    length: StoryLength,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout carries only the story.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    dotenv::dotenv().ok();
    let config = LlmConfig::from_lookup(|name| std::env::var(name).ok())
        .context("invalid model configuration")?;
    let generator = StoryGenerator::new(build_llm(&config).await?);

    let input = StoryInput::new(args.topic, args.style, args.length);
    info!(topic = %input.topic, length = %input.length, "generating story");

    let story = generator.generate(&input).await?;
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&story)?
    } else {
        serde_json::to_string(&story)?
    };
    println!("{rendered}");

    Ok(())
}
