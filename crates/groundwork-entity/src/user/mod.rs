//! User, role, and permission entities.

pub mod model;
pub mod role;

pub use model::{NewUser, User};
pub use role::{Permission, Role};
