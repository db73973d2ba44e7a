use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::transport::{RetryPolicy, build_client, send_with_retry};
use super::{Llm, LlmError};
use crate::config::LlmConfig;

/// Messages API path, relative to the configured base URL.
const MESSAGES_PATH: &str = "/v1/messages";

/// API version header value.
const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API client.
pub struct Anthropic {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    max_tokens: usize,
    temperature: f64,
    retry: RetryPolicy,
}

impl Anthropic {
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        Ok(Self {
            client: build_client(config)?,
            api_key: config.api_key.clone(),
            endpoint: format!("{}{}", config.base_url, MESSAGES_PATH),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            retry: RetryPolicy::new(config.max_retries),
        })
    }

    /// Replaces the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[derive(Serialize)]
struct Request<'a> {
    model: &'a str,
    max_tokens: usize,
    temperature: f64,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct Response {
    content: Vec<ContentBlock>,
}

/// Only text blocks carry output; other block kinds deserialize without text.
#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[async_trait]
impl Llm for Anthropic {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = Request {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = send_with_retry(self.name(), self.retry, || {
            self.client
                .post(&self.endpoint)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", API_VERSION)
                .json(&request)
        })
        .await?
        .json::<Response>()
        .await?;

        Ok(response
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join(""))
    }
}
