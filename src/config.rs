//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Environment driven configuration for the story service.
//
// | Name           | Description                                       | Key Methods       |
// |----------------|---------------------------------------------------|-------------------|
// | Config         | Top level service configuration                   | try_from_env      |
// | LlmConfig      | Model provider connection settings                | from_lookup       |
// | LlmProvider    | Supported hosted model APIs                       | from_str          |
// | ConfigError    | Missing or malformed configuration values         |                   |
//--------------------------------------------------------------------------------------------------

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use dotenv::dotenv;
use thiserror::Error;
use tracing::info;

const BIND_ADDR: &str = "BIND_ADDR";
const LLM_PROVIDER: &str = "LLM_PROVIDER";
const LLM_MODEL: &str = "LLM_MODEL";
const LLM_API_KEY: &str = "LLM_API_KEY";
const LLM_BASE_URL: &str = "LLM_BASE_URL";
const LLM_MAX_TOKENS: &str = "LLM_MAX_TOKENS";
const LLM_TEMPERATURE: &str = "LLM_TEMPERATURE";
const LLM_TIMEOUT_SECS: &str = "LLM_TIMEOUT_SECS";
const LLM_MAX_RETRIES: &str = "LLM_MAX_RETRIES";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_TOKENS: usize = 4096;
const DEFAULT_TEMPERATURE: f64 = 0.8;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("failed to load environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Hosted model APIs the service can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    /// Anthropic Messages API.
    #[default]
    Anthropic,
    /// OpenAI Chat Completions API, or any compatible endpoint.
    OpenAi,
    /// Amazon Bedrock Converse API, authenticated through the AWS credential chain.
    Bedrock,
}

impl LlmProvider {
    /// Model used when `LLM_MODEL` is not set.
    pub fn default_model(self) -> &'static str {
        match self {
            Self::Anthropic => "claude-sonnet-4-5",
            Self::OpenAi => "gpt-4o-mini",
            Self::Bedrock => "amazon.nova-pro-v1:0",
        }
    }

    /// Base URL used when `LLM_BASE_URL` is not set. Empty for Bedrock, whose
    /// endpoint the AWS SDK resolves from the region.
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Anthropic => "https://api.anthropic.com",
            Self::OpenAi => "https://api.openai.com",
            Self::Bedrock => "",
        }
    }

    /// Provider specific variable consulted when `LLM_API_KEY` is not set.
    /// `None` when the provider signs requests with AWS credentials instead.
    pub fn api_key_var(self) -> Option<&'static str> {
        match self {
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::OpenAi => Some("OPENAI_API_KEY"),
            Self::Bedrock => None,
        }
    }

    /// Highest sampling temperature the provider accepts.
    pub fn max_temperature(self) -> f64 {
        match self {
            Self::Anthropic | Self::Bedrock => 1.0,
            Self::OpenAi => 2.0,
        }
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "openai" | "open-ai" => Ok(Self::OpenAi),
            "bedrock" | "aws-bedrock" => Ok(Self::Bedrock),
            other => Err(ConfigError::Invalid {
                name: LLM_PROVIDER,
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anthropic => write!(f, "anthropic"),
            Self::OpenAi => write!(f, "openai"),
            Self::Bedrock => write!(f, "bedrock"),
        }
    }
}

/// Connection settings for the model provider.
#[derive(Clone)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub max_tokens: usize,
    pub temperature: f64,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl fmt::Debug for LlmConfig {
    // The API key stays out of logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl LlmConfig {
    /// Settings for `provider` with every optional value at its default.
    pub fn new(provider: LlmProvider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            api_key: api_key.into(),
            base_url: provider.default_base_url().to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Reads the settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match non_empty(&lookup, LLM_PROVIDER) {
            Some(raw) => raw.parse()?,
            None => LlmProvider::default(),
        };

        let api_key = match provider.api_key_var() {
            Some(var) => non_empty(&lookup, LLM_API_KEY)
                .or_else(|| non_empty(&lookup, var))
                .ok_or(ConfigError::Missing(var))?,
            None => String::new(),
        };

        let mut config = Self::new(provider, api_key);
        if let Some(model) = non_empty(&lookup, LLM_MODEL) {
            config.model = model;
        }
        if let Some(base_url) = non_empty(&lookup, LLM_BASE_URL) {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(max_tokens) = parsed(&lookup, LLM_MAX_TOKENS)? {
            config.max_tokens = max_tokens;
        }
        if let Some(temperature) = parsed::<f64, _>(&lookup, LLM_TEMPERATURE)? {
            if !(0.0..=provider.max_temperature()).contains(&temperature) {
                return Err(ConfigError::Invalid {
                    name: LLM_TEMPERATURE,
                    value: temperature.to_string(),
                });
            }
            config.temperature = temperature;
        }
        if let Some(secs) = parsed(&lookup, LLM_TIMEOUT_SECS)? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(max_retries) = parsed(&lookup, LLM_MAX_RETRIES)? {
            config.max_retries = max_retries;
        }

        Ok(config)
    }
}

/// Top level service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub llm: LlmConfig,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn try_from_env() -> Result<Config, ConfigError> {
        dotenv().ok();
        let config = Self::from_lookup(|name| env::var(name).ok())?;
        info!(
            bind_addr = %config.bind_addr,
            provider = %config.llm.provider,
            model = %config.llm.model,
            "configuration loaded"
        );
        Ok(config)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = non_empty(&lookup, BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.parse().map_err(|_| ConfigError::Invalid {
            name: BIND_ADDR,
            value: raw_addr.clone(),
        })?;

        Ok(Config {
            bind_addr,
            llm: LlmConfig::from_lookup(lookup)?,
        })
    }
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parsed<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, name) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(None),
    }
}
