//! Request guards and layers.

pub mod cors;
pub mod rbac;

pub use cors::build_cors_layer;
pub use rbac::require_permission;
