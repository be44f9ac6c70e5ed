//! StoreDesk Core - Shared types library.
//!
//! This crate provides common types used across all StoreDesk components:
//! - `server` - HTTP backend (expense storage, team invitations)
//! - `cli` - Command-line tools for migrations and operations
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, expenses, invitations, plan limits and dates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
