//! Team invitation command.
//!
//! Sends one invitation through the same notifier the server uses.
//!
//! # Environment Variables
//!
//! - `RESEND_API_KEY` - Resend API key (required)
//! - `RESEND_API_URL` - Override the Resend endpoint
//! - `INVITE_FROM_ADDRESS` - Sender address

use thiserror::Error;

use storedesk_core::InviteRequest;
use storedesk_server::config::{ConfigError, ServerConfig};
use storedesk_server::services::{InviteNotifier, NotifierError};

/// Errors that can occur while sending an invitation.
#[derive(Debug, Error)]
pub enum InviteError {
    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The notifier failed.
    #[error(transparent)]
    Notifier(#[from] NotifierError),

    /// The provider response could not be printed.
    #[error("Failed to format provider response: {0}")]
    Format(#[from] serde_json::Error),
}

/// Send one invitation and print the provider's response.
///
/// # Errors
///
/// Returns error if configuration is invalid or the send fails.
#[allow(clippy::print_stdout)]
pub async fn send(request: &InviteRequest) -> Result<(), InviteError> {
    let config = ServerConfig::from_env()?;
    let notifier = InviteNotifier::from_config(config.email());

    tracing::info!("Sending invitation to {} for {}", request.email, request.store_name);
    let response = notifier.notify(request).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
