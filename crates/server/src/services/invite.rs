//! Team invitation emails.
//!
//! Renders the invitation template for an [`InviteRequest`] and hands it to
//! the configured [`EmailProvider`]. One attempt per request: no retries, no
//! idempotency key, no delivery tracking.

use std::sync::Arc;

use askama::Template;
use thiserror::Error;
use url::Url;

use storedesk_core::InviteRequest;

use super::email::{EmailProvider, OutgoingEmail, ProviderError, ResendClient};
use crate::config::EmailConfig;

/// HTML template for the team invitation email.
#[derive(Template)]
#[template(path = "email/team_invite.html")]
struct TeamInviteEmailHtml<'a> {
    name: &'a str,
    owner_name: &'a str,
    store_name: &'a str,
    link: &'a str,
}

/// Errors that can occur while sending an invitation.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// No provider API key was available at startup.
    #[error("email provider is not configured (RESEND_API_KEY missing)")]
    NotConfigured,

    /// The request body is not a valid invitation.
    #[error("invalid invite request: {0}")]
    InvalidRequest(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// The provider failed or refused the email.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Sends team invitation emails.
#[derive(Clone)]
pub struct InviteNotifier {
    provider: Option<Arc<dyn EmailProvider>>,
    from_address: String,
}

impl InviteNotifier {
    /// Create a notifier over an explicit provider.
    ///
    /// `None` builds a notifier that fails every request with
    /// [`NotifierError::NotConfigured`].
    #[must_use]
    pub fn new(provider: Option<Arc<dyn EmailProvider>>, from_address: impl Into<String>) -> Self {
        Self {
            provider,
            from_address: from_address.into(),
        }
    }

    /// Create a notifier backed by Resend, if an API key is configured.
    ///
    /// A missing or unusable key is logged and leaves the notifier
    /// unconfigured; it never aborts startup.
    #[must_use]
    pub fn from_config(config: &EmailConfig) -> Self {
        let provider = match &config.resend_api_key {
            Some(api_key) => match ResendClient::new(api_key, config.api_url.as_str()) {
                Ok(client) => Some(Arc::new(client) as Arc<dyn EmailProvider>),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to build Resend client, invitations disabled");
                    None
                }
            },
            None => {
                tracing::warn!("RESEND_API_KEY not set, invitation emails will fail");
                None
            }
        };

        Self::new(provider, config.from_address.clone())
    }

    /// Returns true if a provider is available.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Handle a raw request body: check configuration, parse, send.
    ///
    /// # Errors
    ///
    /// Returns `NotifierError::NotConfigured` before looking at the body if no
    /// provider is available, `NotifierError::InvalidRequest` if the body is not
    /// a valid invitation, and any error from [`Self::notify`].
    pub async fn handle(&self, body: &[u8]) -> Result<serde_json::Value, NotifierError> {
        if !self.is_configured() {
            return Err(NotifierError::NotConfigured);
        }

        let request: InviteRequest = serde_json::from_slice(body)
            .map_err(|e| NotifierError::InvalidRequest(e.to_string()))?;

        self.notify(&request).await
    }

    /// Render and send one invitation.
    ///
    /// Returns the provider's response body unchanged.
    ///
    /// # Errors
    ///
    /// Returns error if the notifier is unconfigured, the request is invalid,
    /// rendering fails, or the provider rejects the email.
    pub async fn notify(&self, request: &InviteRequest) -> Result<serde_json::Value, NotifierError> {
        let provider = self.provider.as_deref().ok_or(NotifierError::NotConfigured)?;

        validate(request)?;
        let email = render_invite(request, &self.from_address)?;

        let response = provider.send(&email).await?;
        tracing::info!(store = %request.store_name, "Team invitation sent");
        Ok(response)
    }
}

impl std::fmt::Debug for InviteNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InviteNotifier")
            .field("configured", &self.is_configured())
            .field("from_address", &self.from_address)
            .finish()
    }
}

fn validate(request: &InviteRequest) -> Result<(), NotifierError> {
    let email = request.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(NotifierError::InvalidRequest(format!(
            "invalid email address: {}",
            request.email
        )));
    }

    let link = Url::parse(&request.link)
        .map_err(|e| NotifierError::InvalidRequest(format!("invalid activation link: {e}")))?;
    if !matches!(link.scheme(), "http" | "https") {
        return Err(NotifierError::InvalidRequest(
            "activation link must be http or https".to_owned(),
        ));
    }

    Ok(())
}

/// Render the invitation email for a request.
///
/// # Errors
///
/// Returns error if the template fails to render.
pub fn render_invite(
    request: &InviteRequest,
    from_address: &str,
) -> Result<OutgoingEmail, NotifierError> {
    let html = TeamInviteEmailHtml {
        name: &request.name,
        owner_name: &request.owner_name,
        store_name: &request.store_name,
        link: &request.link,
    }
    .render()?;

    Ok(OutgoingEmail {
        from: from_address.to_owned(),
        to: vec![request.email.trim().to_owned()],
        subject: format!("You've been invited to join {} on StoreDesk", request.store_name),
        html,
    })
}
