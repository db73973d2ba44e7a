//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// AWS Lambda entry point. Serves the same router as the HTTP server behind
// API Gateway or a function URL; the Lambda runtime owns the event loop.
//--------------------------------------------------------------------------------------------------

use lambda_http::{Error, run};
use tracing::info;
use tracing_subscriber::EnvFilter;

use story_generator::{LlmConfig, StoryGenerator, app, build_llm};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // CloudWatch stamps each line, and colour codes only add noise there.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .without_time()
        .init();

    let config = LlmConfig::from_lookup(|name| std::env::var(name).ok())?;
    let llm = build_llm(&config).await?;
    info!(provider = %config.provider, model = %config.model, "starting Lambda handler");

    run(app(StoryGenerator::new(llm))).await
}
