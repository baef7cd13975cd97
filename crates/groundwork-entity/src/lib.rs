//! # groundwork-entity
//!
//! Domain entity models for Groundwork. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities derive `sqlx::FromRow`.

pub mod issue;
pub mod project;
pub mod token;
pub mod user;
