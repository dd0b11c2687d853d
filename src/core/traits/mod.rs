use async_trait::async_trait;

use crate::core::error::ProviderError;
use crate::core::types::{ProviderId, TranslationPrompt};

/// Chat-completion backend able to turn a prompt into translated text.
///
/// Implementations perform at most one upstream call per invocation and must
/// report a missing credential before any network activity.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Stable provider identifier for diagnostics and error messages.
    fn id(&self) -> ProviderId;

    /// Model identifier sent upstream.
    fn model(&self) -> &str;

    /// Executes a single non-streaming completion and returns the reply text.
    async fn translate(&self, prompt: &TranslationPrompt) -> Result<String, ProviderError>;
}
