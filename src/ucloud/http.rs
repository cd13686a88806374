//! HTTP utilities for UCloud API calls

use crate::error::TransportError;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|&i| body.is_char_boundary(i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Common envelope of every UCloud API response
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "RetCode", default)]
    ret_code: i64,
    #[serde(rename = "Message", default)]
    message: String,
}

/// HTTP client wrapper for UCloud API calls
#[derive(Clone)]
pub struct UCloudHttpClient {
    client: Client,
    base_url: String,
}

impl UCloudHttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, TransportError> {
        let client = Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a signed, form-encoded action to the API endpoint
    pub async fn post_form(
        &self,
        action: &str,
        form: &[(String, String)],
        timeout: Duration,
    ) -> Result<Value, TransportError> {
        tracing::debug!("POST {} action={}", self.base_url, action);

        let response = self
            .client
            .post(format!("{}/", self.base_url))
            .timeout(timeout)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let value: Value =
            serde_json::from_str(&body).map_err(|e| TransportError::decode(action, e))?;
        let envelope: Envelope =
            serde_json::from_value(value.clone()).map_err(|e| TransportError::decode(action, e))?;

        if envelope.ret_code != 0 {
            tracing::error!(
                "{} failed: RetCode {} - {}",
                action,
                envelope.ret_code,
                sanitize_for_log(&envelope.message)
            );
            return Err(TransportError::Api {
                action: action.to_string(),
                code: envelope.ret_code,
                message: envelope.message,
            });
        }

        Ok(value)
    }
}
