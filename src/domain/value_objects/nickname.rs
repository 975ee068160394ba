//! Validated account nickname.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum nickname length accepted on login.
pub const MAX_NICKNAME_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NicknameError {
    #[error("nickname must not be empty")]
    Empty,
    #[error("nickname exceeds {MAX_NICKNAME_LEN} characters")]
    TooLong,
}

/// Account nickname, non-empty and at most [`MAX_NICKNAME_LEN`] characters.
///
/// Validation happens at the deserialization edge, so a malformed login
/// payload is rejected as a bad request before it reaches a handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nickname(String);

impl Nickname {
    pub fn new(value: &str) -> Result<Self, NicknameError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(NicknameError::Empty);
        }
        if trimmed.chars().count() > MAX_NICKNAME_LEN {
            return Err(NicknameError::TooLong);
        }
        Ok(Nickname(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Nickname {
    type Error = NicknameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Nickname::new(&value)
    }
}

impl From<Nickname> for String {
    fn from(nickname: Nickname) -> Self {
        nickname.0
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
