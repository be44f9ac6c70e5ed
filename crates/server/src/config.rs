//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional (features degrade when absent)
//! - `STOREDESK_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`). Without it expense reads return nothing and writes fail.
//! - `RESEND_API_KEY` - Resend API key. Without it every invitation request
//!   answers 500.
//!
//! ## Optional
//! - `STOREDESK_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREDESK_PORT` - Listen port (default: 3000)
//! - `RESEND_API_URL` - Resend endpoint (default: <https://api.resend.com/emails>)
//! - `INVITE_FROM_ADDRESS` - Sender of invitation emails
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::services::email::RESEND_API_URL;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;
const DEFAULT_FROM_ADDRESS: &str = "StoreDesk <convites@storedesk.app>";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` connection URL (contains password). `None` disables storage.
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Invitation email configuration
    pub email: EmailConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Email provider configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct EmailConfig {
    /// Resend API key. `None` leaves invitations unconfigured.
    pub resend_api_key: Option<SecretString>,
    /// Resend endpoint
    pub api_url: Url,
    /// Email sender (From header)
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field(
                "resend_api_key",
                &self.resend_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("api_url", &self.api_url.as_str())
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl EmailConfig {
    fn from_source(env: &Env<'_>) -> Result<Self, ConfigError> {
        let resend_api_key = env.optional("RESEND_API_KEY").map(|key| {
            // Warn only: a bad key surfaces as provider rejections per request
            if let Err(e) = validate_secret_strength(&key, "RESEND_API_KEY") {
                tracing::warn!("RESEND_API_KEY validation warning: {e}");
            }
            SecretString::from(key)
        });

        let api_url = env
            .or_default("RESEND_API_URL", RESEND_API_URL)
            .parse::<Url>()
            .map_err(|e| ConfigError::InvalidEnvVar("RESEND_API_URL".to_string(), e.to_string()))?;

        Ok(Self {
            resend_api_key,
            api_url,
            from_address: env.or_default("INVITE_FROM_ADDRESS", DEFAULT_FROM_ADDRESS),
        })
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let lookup = |key: &str| std::env::var(key).ok();
        Self::from_source(&Env(&lookup))
    }

    /// Load configuration from an explicit key/value map.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let lookup = |key: &str| vars.get(key).cloned();
        Self::from_source(&Env(&lookup))
    }

    fn from_source(env: &Env<'_>) -> Result<Self, ConfigError> {
        let database_url = env
            .optional("STOREDESK_DATABASE_URL")
            .or_else(|| env.optional("DATABASE_URL"))
            .map(SecretString::from);
        let host = env
            .or_default("STOREDESK_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREDESK_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("STOREDESK_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREDESK_PORT".to_string(), e.to_string()))?;

        let email = EmailConfig::from_source(env)?;

        Ok(Self {
            database_url,
            host,
            port,
            email,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.sample_rate("SENTRY_SAMPLE_RATE")?,
            sentry_traces_sample_rate: env.sample_rate("SENTRY_TRACES_SAMPLE_RATE")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns a reference to the email configuration.
    #[must_use]
    pub const fn email(&self) -> &EmailConfig {
        &self.email
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup; empty values count as unset.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn sample_rate(&self, key: &str) -> Result<f32, ConfigError> {
        let Some(raw) = self.optional(key) else {
            return Ok(1.0);
        };
        let rate = raw
            .parse::<f32>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("must be between 0.0 and 1.0 (got {rate})"),
            ));
        }
        Ok(rate)
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Check that a secret is not a placeholder and has reasonable entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("entropy too low ({entropy:.2} bits/char)"),
        ));
    }

    Ok(())
}
