//! Session lifecycle: login, refresh, logout and password reset.

pub mod manager;

pub use manager::{AuthenticatedUser, LoginResult, RefreshResult, SessionManager};
