use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::TranslatorConfig;
use crate::core::error::{ConfigError, HandlerError, ProviderError};
use crate::core::traits::TranslationProvider;
use crate::core::types::{HandlerResponse, InboundRequest, TranslatePayload, TranslationOutput};
use crate::prompt::build_prompt;
use crate::providers::build_provider;

const METHOD_OPTIONS: &str = "OPTIONS";
const METHOD_POST: &str = "POST";

/// Validates an inbound request, dispatches one provider call and maps the
/// outcome to a normalized response. Holds no per-request state, so a single
/// instance can serve concurrent invocations.
#[derive(Clone)]
pub struct TranslationHandler {
    provider: Arc<dyn TranslationProvider>,
}

impl TranslationHandler {
    pub fn new(provider: Arc<dyn TranslationProvider>) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &TranslatorConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(build_provider(config)?))
    }

    pub fn provider(&self) -> &dyn TranslationProvider {
        self.provider.as_ref()
    }

    pub async fn handle(&self, request: InboundRequest) -> HandlerResponse {
        if request.method == METHOD_OPTIONS {
            debug!("answering CORS preflight");
            return HandlerResponse::preflight();
        }

        match self.translate(request).await {
            Ok(output) => render_output(&output),
            Err(error) => render_error(&error),
        }
    }

    async fn translate(&self, request: InboundRequest) -> Result<TranslationOutput, HandlerError> {
        if request.method != METHOD_POST {
            debug!(method = %request.method, "rejecting unsupported method");
            return Err(HandlerError::MethodNotAllowed {
                method: request.method,
            });
        }

        let payload = parse_payload(request.body.as_deref())?;
        let Some(text) = payload.text() else {
            debug!("rejecting request without text");
            return Err(HandlerError::MissingText);
        };

        let prompt = build_prompt(text);
        let translated = self.provider.translate(&prompt).await?;

        let output = TranslationOutput::new(text, translated);
        info!(
            provider = %self.provider.id(),
            original_chars = output.original_length,
            translated_chars = output.translated_length,
            "translation completed"
        );
        Ok(output)
    }
}

fn parse_payload(body: Option<&str>) -> Result<TranslatePayload, HandlerError> {
    let body = body.map(str::trim).unwrap_or_default();
    if body.is_empty() {
        return Ok(TranslatePayload::default());
    }

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|error| HandlerError::MalformedBody {
            message: error.to_string(),
        })?;
    if !value.is_object() {
        return Err(HandlerError::MalformedBody {
            message: "expected a JSON object".to_string(),
        });
    }

    serde_json::from_value(value).map_err(|error| HandlerError::MalformedBody {
        message: error.to_string(),
    })
}

fn render_output(output: &TranslationOutput) -> HandlerResponse {
    match serde_json::to_string(output) {
        Ok(body) => HandlerResponse::json(200, body),
        Err(error) => render_error(&HandlerError::Internal {
            message: error.to_string(),
        }),
    }
}

fn render_error(error: &HandlerError) -> HandlerResponse {
    match error {
        HandlerError::Provider(provider_error) => log_provider_failure(provider_error),
        HandlerError::Internal { message } => warn!(%message, "internal failure"),
        _ => {}
    }

    HandlerResponse::error(error.status_code(), error.public_message())
}

fn log_provider_failure(error: &ProviderError) {
    match error {
        ProviderError::CredentialMissing { env_var, .. } => {
            warn!(%env_var, "provider credential is not configured");
        }
        other => warn!(error = %other, "provider call failed"),
    }
}
