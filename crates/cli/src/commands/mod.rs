//! CLI subcommands.

pub mod invite;
pub mod migrate;
pub mod plans;
