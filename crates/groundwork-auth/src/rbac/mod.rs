//! Role-based access control.

pub mod enforcer;

pub use enforcer::{RbacEnforcer, role_has_permission};
