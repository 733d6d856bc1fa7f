//! Register codes for suppliers and drivers.
//!
//! Suppliers and drivers are identified by a code assigned by the factory
//! office (printed on the supplier passbook), not by a generated ID.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest register code accepted.
pub const MAX_CODE_LEN: usize = 32;

/// Invalid register code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterCodeError {
    /// Code is empty after trimming.
    #[error("register code is required")]
    Empty,

    /// Code exceeds [`MAX_CODE_LEN`].
    #[error("register code must be at most {MAX_CODE_LEN} characters")]
    TooLong,

    /// Code contains characters other than ASCII letters, digits or `-`.
    #[error("register code may only contain letters, digits and '-'")]
    InvalidCharacter,
}

/// A validated supplier or driver register code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegisterCode(String);

impl RegisterCode {
    /// Parses and validates a register code. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, RegisterCodeError> {
        let code = raw.trim();
        if code.is_empty() {
            return Err(RegisterCodeError::Empty);
        }
        if code.len() > MAX_CODE_LEN {
            return Err(RegisterCodeError::TooLong);
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(RegisterCodeError::InvalidCharacter);
        }
        Ok(Self(code.to_string()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RegisterCode {
    type Error = RegisterCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RegisterCode> for String {
    fn from(code: RegisterCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for RegisterCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
