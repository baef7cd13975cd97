//! Repository implementations for all Groundwork entities.
//!
//! Repositories are stateless: every function receives the connection (or
//! open transaction) it must run on.

pub mod issue;
pub mod password_reset;
pub mod project;
pub mod refresh_token;
pub mod role;
pub mod user;

pub use issue::IssueRepository;
pub use password_reset::PasswordResetTokenRepository;
pub use project::ProjectRepository;
pub use refresh_token::RefreshTokenRepository;
pub use role::RoleRepository;
pub use user::UserRepository;
