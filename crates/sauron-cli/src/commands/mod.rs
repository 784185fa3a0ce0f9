//! CLI commands module.

pub mod auth;
pub mod health;
pub mod query;
