//! Selector/validator password-reset tokens.
//!
//! The selector is a public lookup key stored in clear; the validator is the
//! secret half and is only ever stored as a hash.

pub mod token;

pub use token::{ResetToken, SELECTOR_LENGTH, SEPARATOR, VALIDATOR_BYTES};
