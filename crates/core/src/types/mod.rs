//! Core types for StoreDesk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod date;
pub mod expense;
pub mod id;
pub mod invite;
pub mod plan;

pub use date::{CANONICAL_DATE_FORMAT, DateError, normalize_date};
pub use expense::StoreExpense;
pub use id::*;
pub use invite::InviteRequest;
pub use plan::{PlanLimits, PlanType, SupportPriority};
