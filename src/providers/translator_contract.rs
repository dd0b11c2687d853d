use crate::core::error::ProviderError;
use crate::core::types::TranslationPrompt;

/// Internal provider-layer translation contract.
///
/// `TranslationProvider` remains the handler-facing extension point (auth,
/// transport, identity). This contract is crate-private and used by provider
/// modules to turn a prompt into a protocol payload and a protocol reply back
/// into completion text.
pub(crate) trait ProviderTranslator {
    /// Provider protocol payload used for outbound request encoding.
    type RequestPayload;

    /// Provider protocol payload used for inbound response decoding.
    type ResponsePayload;

    fn encode_request(
        &self,
        prompt: &TranslationPrompt,
    ) -> Result<Self::RequestPayload, ProviderError>;

    fn decode_response(&self, payload: &Self::ResponsePayload) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::ProviderTranslator;
    use crate::core::error::ProviderError;
    use crate::core::types::{ProviderId, TranslationPrompt};

    struct MockTranslator;

    impl ProviderTranslator for MockTranslator {
        type RequestPayload = Value;
        type ResponsePayload = Value;

        fn encode_request(
            &self,
            prompt: &TranslationPrompt,
        ) -> Result<Self::RequestPayload, ProviderError> {
            Ok(json!({
                "message_count": prompt.messages().len(),
                "text": prompt.user_text,
            }))
        }

        fn decode_response(
            &self,
            payload: &Self::ResponsePayload,
        ) -> Result<String, ProviderError> {
            payload
                .get("text")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| ProviderError::Protocol {
                    provider: ProviderId::Deepseek,
                    model: None,
                    message: "missing text".to_string(),
                })
        }
    }

    #[test]
    fn test_provider_translator_trait_shape_encode_decode() {
        let translator = MockTranslator;
        let prompt = TranslationPrompt {
            system_instruction: "rules",
            user_text: "Solitude".to_string(),
        };

        let encoded = translator
            .encode_request(&prompt)
            .expect("encode should succeed");
        assert_eq!(encoded.get("message_count"), Some(&json!(2)));

        let decoded = translator
            .decode_response(&json!({ "text": "Солитьюд" }))
            .expect("decode should succeed");
        assert_eq!(decoded, "Солитьюд");

        assert!(translator.decode_response(&json!({})).is_err());
    }
}
