//! # groundwork-auth
//!
//! Authentication and authorization core for Groundwork.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing of passwords and other bearer secrets, password policy
//! - `jwt`: signed access/refresh token encoding and decoding
//! - `reset`: selector/validator password-reset tokens
//! - `rbac`: role permission evaluation and the superuser bypass
//! - `provider`: pluggable credential backends
//! - `session`: login, refresh, logout and password-reset flows

pub mod jwt;
pub mod password;
pub mod provider;
pub mod random;
pub mod rbac;
pub mod reset;
pub mod session;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenType};
pub use password::{PasswordHasher, PasswordValidator};
pub use provider::{AuthProvider, CreateUser, LocalAuthProvider};
pub use rbac::RbacEnforcer;
pub use reset::ResetToken;
pub use session::{AuthenticatedUser, LoginResult, RefreshResult, SessionManager};
