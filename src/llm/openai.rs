use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::transport::{RetryPolicy, build_client, send_with_retry};
use super::{Llm, LlmError};
use crate::config::LlmConfig;

/// Chat Completions API path, relative to the configured base URL.
const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// OpenAI Chat Completions client. Any provider exposing the same API can be
/// reached by pointing the base URL at it.
pub struct OpenAi {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    max_tokens: usize,
    temperature: f64,
    retry: RetryPolicy,
}

impl OpenAi {
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        Ok(Self {
            client: build_client(config)?,
            api_key: config.api_key.clone(),
            endpoint: format!("{}{}", config.base_url, COMPLETIONS_PATH),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            retry: RetryPolicy::new(config.max_retries),
        })
    }

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
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct Response {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl Llm for OpenAi {
    fn name(&self) -> &'static str {
        "openai"
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
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = send_with_retry(self.name(), self.retry, || {
            self.client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request)
        })
        .await?
        .json::<Response>()
        .await?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmProvider;
    use crate::llm::transport::test_server;
    use axum::http::StatusCode;

    fn config_for(base_url: &str) -> LlmConfig {
        let mut config = LlmConfig::new(LlmProvider::OpenAi, "sk-test");
        config.base_url = base_url.to_string();
        config.max_retries = 0;
        config
    }

    #[test]
    fn test_request_asks_for_json_object() {
        let request = Request {
            model: "gpt-4o-mini",
            max_tokens: 100,
            temperature: 0.5,
            messages: vec![Message {
                role: "user",
                content: "hi",
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_response_with_null_content() {
        let json = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":null}}]}"#;
        let response: Response = serde_json::from_str(json).unwrap();
        assert!(response.choices[0].message.content.is_none());
    }

    #[tokio::test]
    async fn test_complete_against_local_server() {
        let reply = r#"{"choices":[{"message":{"role":"assistant","content":"story json"}}]}"#;
        let (base, script) = test_server::spawn(
            "/v1/chat/completions",
            vec![(StatusCode::OK, reply.to_string())],
        )
        .await;
        let client = OpenAi::from_config(&config_for(&base)).unwrap();

        let text = client.complete("prompt").await.unwrap();

        assert_eq!(text, "story json");
        assert_eq!(
            script.header("authorization").await.as_deref(),
            Some("Bearer sk-test")
        );
    }

    #[tokio::test]
    async fn test_complete_with_no_choices_is_empty() {
        let (base, _script) = test_server::spawn(
            "/v1/chat/completions",
            vec![(StatusCode::OK, r#"{"choices":[]}"#.to_string())],
        )
        .await;
        let client = OpenAi::from_config(&config_for(&base)).unwrap();

        assert_eq!(client.complete("prompt").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_unauthorized_is_reported() {
        let (base, _script) = test_server::spawn(
            "/v1/chat/completions",
            vec![(StatusCode::UNAUTHORIZED, "invalid api key".to_string())],
        )
        .await;
        let client = OpenAi::from_config(&config_for(&base)).unwrap();

        let err = client.complete("prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::Status { status: 401, .. }));
    }
}
