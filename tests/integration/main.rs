//! Integration tests for Groundwork.
//!
//! Tests marked `#[ignore]` need a PostgreSQL server reachable through
//! `DATABASE_URL`; `#[sqlx::test]` creates a fresh database for each one.
//! Run them with `cargo test --test integration -- --ignored`.

mod auth_test;
mod helpers;
mod router_test;
