//! # groundwork-api
//!
//! HTTP API layer for Groundwork built on Axum.
//!
//! Controllers stay thin: they validate input, call into the auth core or a
//! service, and map the result. All credential logic lives in
//! `groundwork-auth`, all sequencing in `groundwork-service`.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
