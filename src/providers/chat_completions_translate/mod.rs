use serde_json::Value;

use crate::core::error::ProviderError;
use crate::core::types::{ChatCompletionRequest, ProviderId, TranslationPrompt};
use crate::providers::translator_contract::ProviderTranslator;

/// Maps prompts to the OpenAI-compatible chat-completions protocol shared by
/// every supported vendor.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ChatCompletionsTranslator {
    pub provider: ProviderId,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ProviderTranslator for ChatCompletionsTranslator {
    type RequestPayload = ChatCompletionRequest;
    type ResponsePayload = Value;

    fn encode_request(
        &self,
        prompt: &TranslationPrompt,
    ) -> Result<Self::RequestPayload, ProviderError> {
        if prompt.user_text.is_empty() {
            return Err(self.protocol_error("user text must not be empty"));
        }

        Ok(ChatCompletionRequest {
            model: self.model.clone(),
            messages: prompt.messages(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        })
    }

    fn decode_response(&self, payload: &Self::ResponsePayload) -> Result<String, ProviderError> {
        let Some(choices) = payload.get("choices").and_then(Value::as_array) else {
            return Err(self.protocol_error("response has no choices array"));
        };

        let Some(first) = choices.first() else {
            return Err(self.protocol_error("response choices array is empty"));
        };

        first
            .get("message")
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| self.protocol_error("choices[0].message.content is missing"))
    }
}

impl ChatCompletionsTranslator {
    fn protocol_error(&self, message: &str) -> ProviderError {
        ProviderError::Protocol {
            provider: self.provider,
            model: Some(self.model.clone()),
            message: message.to_string(),
        }
    }
}
