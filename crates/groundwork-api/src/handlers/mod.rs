//! HTTP handlers, grouped by domain.

pub mod auth;
pub mod health;
pub mod issue;
