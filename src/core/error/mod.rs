use crate::core::types::ProviderId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown provider: {value} (expected one of {expected})", expected = format_known_providers())]
    UnknownProvider { value: String },
    #[error("invalid value for {key}: {value:?}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[error("invalid timeout: {timeout_ms} ms")]
    InvalidTimeout { timeout_ms: u64 },
    #[error("invalid max_tokens: {max_tokens}")]
    InvalidMaxTokens { max_tokens: u32 },
    #[error("invalid temperature: {temperature} (must be within 0.0..=0.3)")]
    InvalidTemperature { temperature: f32 },
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("failed to build http client: {message}")]
    HttpClient { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("credential missing [provider={provider}, env={env_var}]")]
    CredentialMissing {
        provider: ProviderId,
        env_var: String,
    },
    #[error(
        "provider transport error{context}: {message}",
        context = format_context(*.provider, None, None)
    )]
    Transport {
        provider: ProviderId,
        message: String,
    },
    #[error(
        "provider timed out{context}: no response within {timeout_ms} ms",
        context = format_context(*.provider, None, None)
    )]
    Timeout {
        provider: ProviderId,
        timeout_ms: u64,
    },
    #[error(
        "provider status error{context}: {message}",
        context = format_context(*.provider, .model.as_deref(), Some(*.status_code))
    )]
    Status {
        provider: ProviderId,
        model: Option<String>,
        status_code: u16,
        message: String,
    },
    #[error(
        "provider protocol error{context}: {message}",
        context = format_context(*.provider, .model.as_deref(), None)
    )]
    Protocol {
        provider: ProviderId,
        model: Option<String>,
        message: String,
    },
    #[error(
        "provider serialization error{context}: {message}",
        context = format_context(*.provider, .model.as_deref(), None)
    )]
    Serialization {
        provider: ProviderId,
        model: Option<String>,
        message: String,
    },
}

/// Every way a single invocation can fail. Each variant maps to exactly one
/// HTTP status and one caller-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("method not allowed: {method}")]
    MethodNotAllowed { method: String },
    #[error("request body has no translatable text")]
    MissingText,
    #[error("request body is not a JSON object: {message}")]
    MalformedBody { message: String },
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl HandlerError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MethodNotAllowed { .. } => 405,
            Self::MissingText | Self::MalformedBody { .. } => 400,
            Self::Provider(_) | Self::Internal { .. } => 500,
        }
    }

    pub fn public_message(&self) -> String {
        match self {
            Self::MethodNotAllowed { .. } => "Метод не поддерживается".to_string(),
            Self::MissingText => "Текст не предоставлен".to_string(),
            Self::MalformedBody { .. } => "Некорректный JSON в теле запроса".to_string(),
            Self::Provider(ProviderError::CredentialMissing { provider, env_var }) => format!(
                "API ключ {} не настроен. Добавьте {env_var} в секреты.",
                provider.display_name()
            ),
            Self::Provider(ProviderError::Status {
                provider,
                status_code,
                message,
                ..
            }) => format!(
                "Ошибка API {}: {status_code} - {message}",
                provider.display_name()
            ),
            Self::Provider(ProviderError::Timeout { timeout_ms, .. }) => {
                format!("Ошибка перевода: превышено время ожидания ответа ({timeout_ms} мс)")
            }
            Self::Provider(
                ProviderError::Transport { message, .. }
                | ProviderError::Protocol { message, .. }
                | ProviderError::Serialization { message, .. },
            ) => format!("Ошибка перевода: {message}"),
            Self::Internal { .. } => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

pub const INTERNAL_ERROR_MESSAGE: &str = "Внутренняя ошибка сервера";

fn format_known_providers() -> String {
    ProviderId::ALL
        .iter()
        .map(|provider| provider.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_context(provider: ProviderId, model: Option<&str>, status_code: Option<u16>) -> String {
    let mut context = vec![format!("provider={provider}")];

    if let Some(model) = model {
        context.push(format!("model={model}"));
    }
    if let Some(status_code) = status_code {
        context.push(format!("status_code={status_code}"));
    }

    format!(" [{}]", context.join(", "))
}
