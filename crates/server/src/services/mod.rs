//! Business logic services.
//!
//! # Services
//!
//! - `email` - Email delivery via the Resend HTTP API
//! - `invite` - Team invitation rendering and dispatch

pub mod email;
pub mod invite;

pub use email::{EmailProvider, OutgoingEmail, ProviderError, RESEND_API_URL, ResendClient};
pub use invite::{InviteNotifier, NotifierError, render_invite};
