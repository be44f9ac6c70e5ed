//! StoreDesk server library.
//!
//! Store expense bookkeeping over `PostgreSQL` and the team invitation
//! function, exposed as an Axum router so it can be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
