use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::warn;

use super::LlmError;
use crate::config::LlmConfig;

/// Bounded exponential backoff for provider calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Attempts made after the first one.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each following retry.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_millis(500),
        }
    }

    /// Delay before retry number `attempt` (zero based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

pub(crate) fn build_client(config: &LlmConfig) -> Result<Client, LlmError> {
    let client = Client::builder()
        .pool_idle_timeout(Some(Duration::from_secs(30)))
        .tcp_keepalive(Some(Duration::from_secs(30)))
        .timeout(config.timeout)
        .build()?;
    Ok(client)
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

/// Sends the request produced by `build`, retrying throttling, server errors
/// and transport failures according to `policy`.
pub(crate) async fn send_with_retry<F>(
    provider: &'static str,
    policy: RetryPolicy,
    build: F,
) -> Result<Response, LlmError>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 0;
    loop {
        let can_retry = attempt < policy.max_retries;
        match build().send().await {
            Ok(response) if response.status().is_success() => return Ok(response),
            Ok(response) => {
                let status = response.status();
                if can_retry && is_retryable_status(status) {
                    warn!(provider, %status, attempt, "retrying model request");
                } else {
                    let body = response.text().await.unwrap_or_default();
                    return Err(LlmError::Status {
                        status: status.as_u16(),
                        body,
                    });
                }
            }
            Err(err) => {
                if can_retry && is_retryable_error(&err) {
                    warn!(provider, error = %err, attempt, "retrying model request");
                } else {
                    return Err(LlmError::Http(err));
                }
            }
        }
        tokio::time::sleep(policy.backoff(attempt)).await;
        attempt += 1;
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LlmConfig, LlmProvider};
    use axum::http::StatusCode as ServerStatus;

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::new(3);
        assert_eq!(policy.backoff(0), Duration::from_millis(500));
        assert_eq!(policy.backoff(1), Duration::from_millis(1000));
        assert_eq!(policy.backoff(2), Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn test_retries_server_errors_then_succeeds() {
        let (base, script) = test_server::spawn(
            "/ok",
            vec![
                (ServerStatus::SERVICE_UNAVAILABLE, "busy".to_string()),
                (ServerStatus::TOO_MANY_REQUESTS, "slow down".to_string()),
                (ServerStatus::OK, "done".to_string()),
            ],
        )
        .await;
        let client = build_client(&LlmConfig::new(LlmProvider::OpenAi, "key")).unwrap();
        let url = format!("{}/ok", base);

        let response = send_with_retry("test", fast_policy(2), || client.post(&url))
            .await
            .unwrap();

        assert_eq!(response.text().await.unwrap(), "done");
        assert_eq!(script.hit_count(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let (base, script) = test_server::spawn(
            "/down",
            vec![(ServerStatus::BAD_GATEWAY, "upstream down".to_string())],
        )
        .await;
        let client = build_client(&LlmConfig::new(LlmProvider::OpenAi, "key")).unwrap();
        let url = format!("{}/down", base);

        let err = send_with_retry("test", fast_policy(1), || client.post(&url))
            .await
            .unwrap_err();

        match err {
            LlmError::Status { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "upstream down");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(script.hit_count(), 2);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let (base, script) = test_server::spawn(
            "/bad",
            vec![(ServerStatus::UNAUTHORIZED, "bad key".to_string())],
        )
        .await;
        let client = build_client(&LlmConfig::new(LlmProvider::OpenAi, "key")).unwrap();
        let url = format!("{}/bad", base);

        let err = send_with_retry("test", fast_policy(3), || client.post(&url))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Status { status: 401, .. }));
        assert_eq!(script.hit_count(), 1);
    }
}
