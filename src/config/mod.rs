use std::net::SocketAddr;

use crate::catalog::{DEFAULT_TEMPERATURE, ProviderProfile, builtin_profile};
use crate::core::error::ConfigError;
use crate::core::types::ProviderId;

pub const PROVIDER_ENV: &str = "TRANSLATOR_PROVIDER";
pub const BASE_URL_ENV: &str = "TRANSLATOR_BASE_URL";
pub const MODEL_ENV: &str = "TRANSLATOR_MODEL";
pub const MAX_TOKENS_ENV: &str = "TRANSLATOR_MAX_TOKENS";
pub const TIMEOUT_MS_ENV: &str = "TRANSLATOR_TIMEOUT_MS";
pub const BIND_ADDR_ENV: &str = "TRANSLATOR_BIND_ADDR";

pub const DEFAULT_PROVIDER: ProviderId = ProviderId::Deepseek;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

const MAX_TEMPERATURE: f32 = 0.3;

/// Everything the handler needs to reach one provider. Built once at startup
/// and injected; nothing reads the environment per request.
#[derive(Clone, PartialEq)]
pub struct TranslatorConfig {
    pub provider: ProviderId,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_ms: u64,
}

impl TranslatorConfig {
    pub fn for_provider(provider: ProviderId) -> Self {
        let profile = builtin_profile(provider);

        Self {
            provider,
            api_key: None,
            base_url: profile.base_url.to_string(),
            model: profile.model.to_string(),
            max_tokens: profile.max_tokens,
            temperature: DEFAULT_TEMPERATURE,
            timeout_ms: profile.timeout_ms,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn profile(&self) -> &'static ProviderProfile {
        builtin_profile(self.provider)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Resolves configuration from a variable lookup. The provider's API key
    /// is read from the variable named by its profile; a blank value counts
    /// as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match non_empty(&lookup, PROVIDER_ENV) {
            Some(value) => {
                ProviderId::parse(&value).ok_or(ConfigError::UnknownProvider { value })?
            }
            None => DEFAULT_PROVIDER,
        };

        let mut config = Self::for_provider(provider);
        config.api_key = non_empty(&lookup, config.profile().api_key_env);

        if let Some(base_url) = non_empty(&lookup, BASE_URL_ENV) {
            config.base_url = base_url;
        }
        if let Some(model) = non_empty(&lookup, MODEL_ENV) {
            config.model = model;
        }
        if let Some(max_tokens) = parse_number::<u32, _>(&lookup, MAX_TOKENS_ENV)? {
            config.max_tokens = max_tokens;
        }
        if let Some(timeout_ms) = parse_number::<u64, _>(&lookup, TIMEOUT_MS_ENV)? {
            config.timeout_ms = timeout_ms;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout {
                timeout_ms: self.timeout_ms,
            });
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens {
                max_tokens: self.max_tokens,
            });
        }
        if !(0.0..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(ConfigError::InvalidTemperature {
                temperature: self.temperature,
            });
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyField { field: "model" });
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyField { field: "base_url" });
        }
        Ok(())
    }
}

impl std::fmt::Debug for TranslatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatorConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = non_empty(&lookup, BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        Ok(Self {
            bind_addr: parse_bind_addr(&raw)?,
        })
    }
}

pub fn parse_bind_addr(value: &str) -> Result<SocketAddr, ConfigError> {
    value
        .trim()
        .parse::<SocketAddr>()
        .map_err(|error| ConfigError::InvalidValue {
            key: BIND_ADDR_ENV.to_string(),
            value: value.to_string(),
            reason: error.to_string(),
        })
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_number<T, F>(lookup: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = non_empty(lookup, name) else {
        return Ok(None);
    };

    raw.parse::<T>()
        .map(Some)
        .map_err(|error| ConfigError::InvalidValue {
            key: name.to_string(),
            value: raw,
            reason: error.to_string(),
        })
}
