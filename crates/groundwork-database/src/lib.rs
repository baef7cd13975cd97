//! # groundwork-database
//!
//! PostgreSQL connection management, migrations, default-data seeding and
//! repositories for all Groundwork entities.
//!
//! Repository functions take an explicit `&mut PgConnection`, normally the
//! caller's open transaction, so that every logical operation runs inside a
//! single transaction that commits or rolls back as a unit.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod seed;

pub use connection::{connect, ping};
