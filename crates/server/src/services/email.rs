//! Transactional email delivery via the Resend HTTP API.
//!
//! # API Reference
//!
//! - Endpoint: `POST https://api.resend.com/emails`
//! - Authentication: `Authorization: Bearer <RESEND_API_KEY>`
//! - Body: `{ "from", "to", "subject", "html" }`
//! - Success: `200` with `{ "id": "<message id>" }`

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;

/// Default Resend endpoint for sending a single email.
pub const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Errors that can occur when handing an email to the provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The provider's success body was not JSON.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The API key cannot be used as a header value.
    #[error("Invalid API key format")]
    InvalidApiKey,
}

/// A rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Something that can deliver a rendered email.
///
/// Returns the provider's JSON response body on success.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<serde_json::Value, ProviderError>;
}

/// Resend API client.
#[derive(Clone)]
pub struct ResendClient {
    inner: Arc<ResendClientInner>,
}

struct ResendClientInner {
    client: reqwest::Client,
    api_url: String,
}

impl ResendClient {
    /// Create a new Resend client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(api_key: &SecretString, api_url: impl Into<String>) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();

        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|_| ProviderError::InvalidApiKey)?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ResendClientInner {
                client,
                api_url: api_url.into(),
            }),
        })
    }

    /// The endpoint this client posts to.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.inner.api_url
    }

    /// Turn a non-success response into a [`ProviderError::Rejected`].
    ///
    /// Resend error bodies look like `{"statusCode":422,"message":"...","name":"..."}`;
    /// the `message` field is used when present, the raw body otherwise.
    async fn parse_error(response: reqwest::Response) -> ProviderError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| value.get("message")?.as_str().map(str::to_owned))
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| {
                if body.is_empty() {
                    format!("email provider returned status {status}")
                } else {
                    body
                }
            });

        ProviderError::Rejected { status, message }
    }
}

#[async_trait]
impl EmailProvider for ResendClient {
    async fn send(&self, email: &OutgoingEmail) -> Result<serde_json::Value, ProviderError> {
        let response = self
            .inner
            .client
            .post(&self.inner.api_url)
            .json(email)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }

        let body = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("Failed to parse response: {e}")))?;

        tracing::info!(to = ?email.to, subject = %email.subject, "Email accepted by provider");
        Ok(body)
    }
}

impl std::fmt::Debug for ResendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendClient")
            .field("api_url", &self.inner.api_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_constants() {
        assert_eq!(RESEND_API_URL, "https://api.resend.com/emails");
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let client = ResendClient::new(&SecretString::from("re_live_9fK2xQ"), RESEND_API_URL).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("re_live_9fK2xQ"));
        assert!(debug.contains("api.resend.com"));
    }

    #[test]
    fn test_key_with_newline_is_rejected() {
        let result = ResendClient::new(&SecretString::from("bad\nkey"), RESEND_API_URL);
        assert!(matches!(result, Err(ProviderError::InvalidApiKey)));
    }

    #[test]
    fn test_outgoing_email_wire_shape() {
        let email = OutgoingEmail {
            from: "StoreDesk <convites@storedesk.app>".to_owned(),
            to: vec!["ana@example.com".to_owned()],
            subject: "Hello".to_owned(),
            html: "<p>Hi</p>".to_owned(),
        };
        let value = serde_json::to_value(&email).unwrap();
        assert_eq!(value["to"][0], "ana@example.com");
        assert_eq!(value["html"], "<p>Hi</p>");
    }
}
