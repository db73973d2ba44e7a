//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Clients for the hosted model inference APIs used to write stories.
//
// | Component      | Description                                                |
// |----------------|------------------------------------------------------------|
// | Llm            | Text completion interface implemented by every provider    |
// | Anthropic      | Anthropic Messages API client                              |
// | OpenAi         | OpenAI (or compatible) Chat Completions client             |
// | Bedrock        | Amazon Bedrock Converse client (AWS SDK)                   |
// | transport      | Shared HTTP client construction and retry loop             |
//--------------------------------------------------------------------------------------------------

mod anthropic;
mod bedrock;
mod openai;
mod transport;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::{LlmConfig, LlmProvider};

pub use anthropic::Anthropic;
pub use bedrock::Bedrock;
pub use openai::OpenAi;
pub use transport::RetryPolicy;

/// Errors returned by model provider clients.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The request could not be sent or the response body could not be read.
    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("model API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The AWS SDK call to Bedrock failed.
    #[error("bedrock request failed: {0}")]
    Bedrock(String),
}

/// Client for large language model text completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Llm: Send + Sync {
    /// Provider name used in logs.
    fn name(&self) -> &'static str;

    /// Sends `prompt` as a single user message and returns the generated text.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Builds the client for the configured provider.
pub async fn build_llm(config: &LlmConfig) -> Result<Arc<dyn Llm>, LlmError> {
    let client: Arc<dyn Llm> = match config.provider {
        LlmProvider::Anthropic => Arc::new(Anthropic::from_config(config)?),
        LlmProvider::OpenAi => Arc::new(OpenAi::from_config(config)?),
        LlmProvider::Bedrock => Arc::new(Bedrock::from_config(config).await),
    };

    info!(
        provider = client.name(),
        model = %config.model,
        base_url = %config.base_url,
        "LLM client initialized"
    );
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_llm_selects_provider() {
        let anthropic = build_llm(&LlmConfig::new(LlmProvider::Anthropic, "key"))
            .await
            .unwrap();
        assert_eq!(anthropic.name(), "anthropic");

        let openai = build_llm(&LlmConfig::new(LlmProvider::OpenAi, "key"))
            .await
            .unwrap();
        assert_eq!(openai.name(), "openai");
    }

    #[test]
    fn test_bedrock_error_display() {
        let err = LlmError::Bedrock("ValidationException: bad model".to_string());
        assert_eq!(
            err.to_string(),
            "bedrock request failed: ValidationException: bad model"
        );
    }

    #[test]
    fn test_status_error_display() {
        let err = LlmError::Status {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "model API returned status 429: rate limited");
    }
}
