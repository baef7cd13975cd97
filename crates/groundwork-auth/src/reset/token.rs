//! Generation and parsing of the combined `selector.validator` string.

use std::fmt;

use crate::random;

/// Number of characters in a selector.
pub const SELECTOR_LENGTH: usize = 16;

/// Number of random bytes behind a validator.
pub const VALIDATOR_BYTES: usize = 32;

/// Joins selector and validator. Absent from both alphabets.
pub const SEPARATOR: char = '.';

/// A password-reset token split into its two halves.
#[derive(Clone, PartialEq, Eq)]
pub struct ResetToken {
    selector: String,
    validator: String,
}

impl ResetToken {
    /// Generates a fresh token: an alphanumeric selector and a base64url validator.
    pub fn generate() -> Self {
        Self {
            selector: random::alphanumeric(SELECTOR_LENGTH),
            validator: random::url_safe_token(VALIDATOR_BYTES),
        }
    }

    /// Splits a combined token string.
    ///
    /// Returns `None` for anything that could not have been produced by
    /// [`generate`](Self::generate), so malformed input is rejected before
    /// any lookup happens.
    pub fn parse(combined: &str) -> Option<Self> {
        let (selector, validator) = combined.split_once(SEPARATOR)?;

        if selector.len() != SELECTOR_LENGTH || !selector.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return None;
        }
        if validator.is_empty()
            || !validator
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return None;
        }

        Some(Self {
            selector: selector.to_string(),
            validator: validator.to_string(),
        })
    }

    /// The public lookup half.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// The secret half.
    pub fn validator(&self) -> &str {
        &self.validator
    }
}

impl fmt::Display for ResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.selector, SEPARATOR, self.validator)
    }
}

impl fmt::Debug for ResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetToken")
            .field("selector", &self.selector)
            .field("validator", &"****")
            .finish()
    }
}
