pub mod chat_completions;
pub(crate) mod chat_completions_translate;
pub(crate) mod translator_contract;

use std::sync::Arc;

use crate::config::TranslatorConfig;
use crate::core::error::ConfigError;
use crate::core::traits::TranslationProvider;

/// Builds the provider selected by `config.provider`. Every built-in vendor
/// speaks the chat-completions protocol, so they share one adapter.
pub fn build_provider(
    config: &TranslatorConfig,
) -> Result<Arc<dyn TranslationProvider>, ConfigError> {
    let adapter = chat_completions::ChatCompletionsAdapter::from_config(config)?;
    Ok(Arc::new(adapter))
}
