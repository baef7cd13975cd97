//! # groundwork-service
//!
//! Business logic service layer for Groundwork. Services own their
//! transactions and call repositories with the open transactional handle.

pub mod issue;

pub use issue::{IssueService, next_key};
