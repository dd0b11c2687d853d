use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::error::{ConfigError, ProviderError};
use crate::core::types::ProviderId;

/// Single-shot JSON transport. Every call issues exactly one HTTP request
/// bounded by `timeout_ms`; anything but `200 OK` is a status error.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout_ms: u64,
}

impl HttpTransport {
    /// Idle connections are never pooled, so every call opens its own
    /// upstream connection.
    pub fn new(timeout_ms: u64) -> Result<Self, ConfigError> {
        Self::validate_timeout(timeout_ms)?;

        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|error| ConfigError::HttpClient {
                message: error.to_string(),
            })?;

        Ok(Self { client, timeout_ms })
    }

    pub async fn post_json<TReq, TResp>(
        &self,
        provider: ProviderId,
        model: Option<&str>,
        url: &str,
        bearer_token: Option<&str>,
        body: &TReq,
    ) -> Result<TResp, ProviderError>
    where
        TReq: Serialize + ?Sized,
        TResp: DeserializeOwned,
    {
        let model_owned = model.map(str::to_string);
        let payload = serde_json::to_vec(body).map_err(|error| ProviderError::Serialization {
            provider,
            model: model_owned.clone(),
            message: error.to_string(),
        })?;

        let mut request_builder = self
            .client
            .post(url)
            .timeout(Duration::from_millis(self.timeout_ms))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(payload);

        if let Some(token) = bearer_token {
            let auth_value =
                HeaderValue::from_str(&format!("Bearer {token}")).map_err(|error| {
                    ProviderError::Protocol {
                        provider,
                        model: model_owned.clone(),
                        message: format!("invalid bearer token header value: {error}"),
                    }
                })?;
            request_builder = request_builder.header(AUTHORIZATION, auth_value);
        }

        let response = request_builder
            .send()
            .await
            .map_err(|error| self.map_send_error(provider, &error))?;

        let status_code = response.status().as_u16();
        debug!(%provider, status_code, "provider responded");

        if response.status() != StatusCode::OK {
            return Err(build_status_error(provider, model_owned, status_code, response).await);
        }

        response.json::<TResp>().await.map_err(|error| {
            if error.is_timeout() {
                ProviderError::Timeout {
                    provider,
                    timeout_ms: self.timeout_ms,
                }
            } else {
                ProviderError::Serialization {
                    provider,
                    model: model_owned,
                    message: error.to_string(),
                }
            }
        })
    }

    fn map_send_error(&self, provider: ProviderId, error: &reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout {
                provider,
                timeout_ms: self.timeout_ms,
            }
        } else {
            ProviderError::Transport {
                provider,
                message: error.to_string(),
            }
        }
    }

    fn validate_timeout(timeout_ms: u64) -> Result<(), ConfigError> {
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout { timeout_ms });
        }
        Ok(())
    }
}

async fn build_status_error(
    provider: ProviderId,
    model: Option<String>,
    status_code: u16,
    response: Response,
) -> ProviderError {
    let message = match response.text().await {
        Ok(body) if !body.trim().is_empty() => body,
        Ok(_) => format!("http status {status_code}"),
        Err(error) => {
            format!("http status {status_code}; failed to read response body: {error}")
        }
    };

    ProviderError::Status {
        provider,
        model,
        status_code,
        message,
    }
}
