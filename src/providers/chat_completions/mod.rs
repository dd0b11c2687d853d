use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::catalog::builtin_profile;
use crate::config::TranslatorConfig;
use crate::core::error::{ConfigError, ProviderError};
use crate::core::traits::TranslationProvider;
use crate::core::types::{ProviderId, TranslationPrompt};
use crate::providers::chat_completions_translate::ChatCompletionsTranslator;
use crate::providers::translator_contract::ProviderTranslator;
use crate::transport::http::HttpTransport;

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Adapter for any vendor speaking the OpenAI-compatible chat-completions
/// protocol. One instance serves every request; nothing is mutated per call.
pub struct ChatCompletionsAdapter {
    transport: HttpTransport,
    translator: ChatCompletionsTranslator,
    base_url: String,
    api_key: Option<String>,
    api_key_env: &'static str,
}

impl ChatCompletionsAdapter {
    pub fn from_config(config: &TranslatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport = HttpTransport::new(config.timeout_ms)?;
        Ok(Self::with_transport(config, transport))
    }

    pub(crate) fn with_transport(config: &TranslatorConfig, transport: HttpTransport) -> Self {
        let profile = builtin_profile(config.provider);

        Self {
            transport,
            translator: ChatCompletionsTranslator {
                provider: config.provider,
                model: config.model.clone(),
                temperature: config.temperature,
                max_tokens: config.max_tokens,
            },
            base_url: normalize_base_url(&config.base_url, profile.base_url),
            api_key: sanitize_api_key(config.api_key.clone()),
            api_key_env: profile.api_key_env,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}{CHAT_COMPLETIONS_PATH}", self.base_url)
    }

    fn missing_api_key_error(&self) -> ProviderError {
        ProviderError::CredentialMissing {
            provider: self.translator.provider,
            env_var: self.api_key_env.to_string(),
        }
    }
}

#[async_trait]
impl TranslationProvider for ChatCompletionsAdapter {
    fn id(&self) -> ProviderId {
        self.translator.provider
    }

    fn model(&self) -> &str {
        &self.translator.model
    }

    async fn translate(&self, prompt: &TranslationPrompt) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| self.missing_api_key_error())?;

        let encoded = self.translator.encode_request(prompt)?;

        info!(
            provider = %self.id(),
            model = %self.translator.model,
            text_chars = prompt.user_text.chars().count(),
            "sending translation request"
        );

        let response_body: Value = self
            .transport
            .post_json(
                self.id(),
                Some(self.translator.model.as_str()),
                &self.completions_url(),
                Some(api_key),
                &encoded,
            )
            .await?;

        let text = self.translator.decode_response(&response_body)?;
        debug!(provider = %self.id(), reply_chars = text.chars().count(), "decoded completion");
        Ok(text)
    }
}

fn normalize_base_url(base_url: &str, fallback: &str) -> String {
    let trimmed = base_url.trim();
    let value = if trimmed.is_empty() { fallback } else { trimmed };
    let value = value.trim_end_matches('/');

    value
        .strip_suffix(CHAT_COMPLETIONS_PATH)
        .unwrap_or(value)
        .to_string()
}

fn sanitize_api_key(api_key: Option<String>) -> Option<String> {
    api_key.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
