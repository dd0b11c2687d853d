use serde::Serialize;

use crate::core::error::ConfigError;
use crate::core::types::ProviderId;

pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Deployment defaults for one chat-completion vendor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderProfile {
    pub provider: ProviderId,
    /// Base URL without the trailing `/chat/completions` segment.
    pub base_url: &'static str,
    pub model: &'static str,
    pub max_tokens: u32,
    pub timeout_ms: u64,
    pub api_key_env: &'static str,
}

const DEEPSEEK: ProviderProfile = ProviderProfile {
    provider: ProviderId::Deepseek,
    base_url: "https://api.deepseek.com",
    model: "deepseek-chat",
    max_tokens: 8_000,
    timeout_ms: 60_000,
    api_key_env: "DEEPSEEK_API_KEY",
};

const TOGETHER: ProviderProfile = ProviderProfile {
    provider: ProviderId::Together,
    base_url: "https://api.together.xyz/v1",
    model: "meta-llama/Llama-3.3-70B-Instruct-Turbo",
    max_tokens: 16_000,
    timeout_ms: 120_000,
    api_key_env: "TOGETHER_API_KEY",
};

const VSEGPT: ProviderProfile = ProviderProfile {
    provider: ProviderId::Vsegpt,
    base_url: "https://api.vsegpt.ru/v1",
    model: "openai/gpt-4o-mini",
    max_tokens: 16_000,
    timeout_ms: 120_000,
    api_key_env: "VSEGPT_API_KEY",
};

pub fn builtin_profile(provider: ProviderId) -> &'static ProviderProfile {
    match provider {
        ProviderId::Deepseek => &DEEPSEEK,
        ProviderId::Together => &TOGETHER,
        ProviderId::Vsegpt => &VSEGPT,
    }
}

pub fn builtin_profiles() -> Vec<&'static ProviderProfile> {
    ProviderId::ALL
        .iter()
        .map(|provider| builtin_profile(*provider))
        .collect()
}

pub fn export_catalog_json() -> Result<String, ConfigError> {
    serde_json::to_string_pretty(&builtin_profiles()).map_err(|error| ConfigError::InvalidValue {
        key: "catalog".to_string(),
        value: String::new(),
        reason: error.to_string(),
    })
}
