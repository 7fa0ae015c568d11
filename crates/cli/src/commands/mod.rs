//! CLI command implementations.

pub mod login;
pub mod orders;
