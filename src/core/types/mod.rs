use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const HEADER_ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const HEADER_ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const HEADER_MAX_AGE: &str = "Access-Control-Max-Age";

const CONTENT_TYPE_JSON: &str = "application/json";

/// Raw invocation as delivered by whatever HTTP runtime fronts the handler.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InboundRequest {
    pub method: String,
    pub body: Option<String>,
}

impl InboundRequest {
    pub fn new(method: impl Into<String>, body: Option<String>) -> Self {
        Self {
            method: method.into(),
            body,
        }
    }

    pub fn post_json(body: impl Into<String>) -> Self {
        Self::new("POST", Some(body.into()))
    }
}

/// Inbound JSON payload. `text` stays loosely typed so a non-string value is
/// rejected as missing text rather than as malformed JSON.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TranslatePayload {
    #[serde(default)]
    pub text: Option<serde_json::Value>,
}

impl TranslatePayload {
    pub fn text(&self) -> Option<&str> {
        self.text
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationPrompt {
    pub system_instruction: &'static str,
    pub user_text: String,
}

impl TranslationPrompt {
    /// Ordered `[system, user]` exchange sent upstream.
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: MessageRole::System,
                content: self.system_instruction.to_string(),
            },
            ChatMessage {
                role: MessageRole::User,
                content: self.user_text.clone(),
            },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

/// Wire body of an OpenAI-compatible `/chat/completions` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationOutput {
    pub translated_text: String,
    pub original_length: usize,
    pub translated_length: usize,
}

impl TranslationOutput {
    pub fn new(original: &str, translated: String) -> Self {
        Self {
            original_length: original.chars().count(),
            translated_length: translated.chars().count(),
            translated_text: translated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerResponse {
    pub status_code: u16,
    pub headers: IndexMap<String, String>,
    pub body: String,
}

impl HandlerResponse {
    pub fn preflight() -> Self {
        let mut headers = IndexMap::new();
        headers.insert(HEADER_ALLOW_ORIGIN.to_string(), "*".to_string());
        headers.insert(HEADER_ALLOW_METHODS.to_string(), "POST, OPTIONS".to_string());
        headers.insert(HEADER_ALLOW_HEADERS.to_string(), "Content-Type".to_string());
        headers.insert(HEADER_MAX_AGE.to_string(), "86400".to_string());

        Self {
            status_code: 200,
            headers,
            body: String::new(),
        }
    }

    pub fn json(status_code: u16, body: String) -> Self {
        let mut headers = IndexMap::new();
        headers.insert(HEADER_CONTENT_TYPE.to_string(), CONTENT_TYPE_JSON.to_string());
        headers.insert(HEADER_ALLOW_ORIGIN.to_string(), "*".to_string());

        Self {
            status_code,
            headers,
            body,
        }
    }

    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        let body = ErrorBody {
            error: message.into(),
        };
        // A struct holding one String always serializes.
        let rendered = serde_json::to_string(&body).unwrap_or_else(|_| String::from("{}"));
        Self::json(status_code, rendered)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    Deepseek,
    Together,
    Vsegpt,
}

impl ProviderId {
    pub const ALL: &'static [Self] = &[Self::Deepseek, Self::Together, Self::Vsegpt];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deepseek => "deepseek",
            Self::Together => "together",
            Self::Vsegpt => "vsegpt",
        }
    }

    /// Vendor name as shown to callers in error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Deepseek => "DeepSeek",
            Self::Together => "Together",
            Self::Vsegpt => "VseGPT",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "deepseek" => Some(Self::Deepseek),
            "together" | "togetherai" => Some(Self::Together),
            "vsegpt" => Some(Self::Vsegpt),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
