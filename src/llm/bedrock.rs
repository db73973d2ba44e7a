use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::config::{
    Builder as SdkConfigBuilder, retry::RetryConfig, timeout::TimeoutConfig,
};
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message,
};

use super::{Llm, LlmError};
use crate::config::LlmConfig;

/// Amazon Bedrock client using the model-agnostic Converse API.
///
/// Region and credentials come from the standard AWS chain (`AWS_REGION`,
/// `AWS_PROFILE`, instance or Lambda role, ...).
pub struct Bedrock {
    client: Client,
    model: String,
    max_tokens: i32,
    temperature: f32,
}

impl Bedrock {
    /// Loads the shared AWS configuration from the environment.
    pub async fn from_config(config: &LlmConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self::from_builder(SdkConfigBuilder::from(&sdk_config), config)
    }

    fn from_builder(builder: SdkConfigBuilder, config: &LlmConfig) -> Self {
        let mut builder = builder
            .retry_config(RetryConfig::standard().with_max_attempts(config.max_retries.saturating_add(1)))
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(config.timeout)
                    .build(),
            );
        if !config.base_url.is_empty() {
            builder = builder.endpoint_url(&config.base_url);
        }

        Self {
            client: Client::from_conf(builder.build()),
            model: config.model.clone(),
            max_tokens: i32::try_from(config.max_tokens).unwrap_or(i32::MAX),
            temperature: config.temperature as f32,
        }
    }
}

#[async_trait]
impl Llm for Bedrock {
    fn name(&self) -> &'static str {
        "bedrock"
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt.to_string()))
            .build()
            .map_err(|err| LlmError::Bedrock(err.to_string()))?;

        let output = self
            .client
            .converse()
            .model_id(&self.model)
            .messages(message)
            .inference_config(
                InferenceConfiguration::builder()
                    .max_tokens(self.max_tokens)
                    .temperature(self.temperature)
                    .build(),
            )
            .send()
            .await
            .map_err(|err| LlmError::Bedrock(DisplayErrorContext(&err).to_string()))?;

        // Non-message outputs and non-text blocks carry no story text.
        Ok(output
            .output()
            .and_then(|output| output.as_message().ok())
            .map(|message| {
                message
                    .content()
                    .iter()
                    .filter_map(|block| block.as_text().ok())
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default())
    }
}
