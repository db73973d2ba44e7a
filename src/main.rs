//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This is the main entry point for the story API server.
// It loads configuration, builds the model client, and starts listening for requests.
//--------------------------------------------------------------------------------------------------

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use story_generator::{Api, Config, StoryGenerator, build_llm, init_tracing};

/// Serve the story generation endpoint
#[derive(Parser, Debug)]
#[command(name = "story-server", version, about)]
struct Args {
    /// Address to bind, overriding BIND_ADDR
    #[arg(long)]
    addr: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_tracing();

    info!("Starting story generator API server");

    let config = Config::try_from_env().context("invalid configuration")?;
    let llm = build_llm(&config.llm)
        .await
        .context("failed to build model client")?;

    let addr = args.addr.unwrap_or(config.bind_addr);
    let api = Api::new(addr, StoryGenerator::new(llm));
    api.serve().await?;

    Ok(())
}
