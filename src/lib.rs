// Expose the modules
pub mod api;
pub mod config;
pub mod llm;
pub mod story;

// Re-export key types for easier usage
pub use api::{Api, ApiError, AppState, app};
pub use config::{Config, ConfigError, LlmConfig, LlmProvider};
pub use llm::{Llm, LlmError, build_llm};
pub use story::{Story, StoryError, StoryGenerator, StoryInput, StoryLength};

use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber, honouring `RUST_LOG` and defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
