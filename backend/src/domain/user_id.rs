//! Opaque identifier for the owner of measurements and forecasts.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest identifier accepted from the route.
pub const USER_ID_MAX_LEN: usize = 128;

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserIdValidationError {
    /// Identifier is empty.
    #[error("user id must not be empty")]
    Empty,
    /// Identifier has leading or trailing whitespace.
    #[error("user id must not contain surrounding whitespace")]
    SurroundingWhitespace,
    /// Identifier exceeds [`USER_ID_MAX_LEN`] characters.
    #[error("user id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// User identifier as stored in the `userId` field of both collections.
///
/// Identifiers are compared as exact strings; no case folding or trimming is
/// applied after validation.
///
/// # Examples
/// ```
/// use range_forecast::domain::UserId;
///
/// let id = UserId::new("64f1c0ffee").expect("valid id");
/// assert_eq!(id.as_ref(), "64f1c0ffee");
/// assert!(UserId::new(" padded ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct an identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserIdValidationError> {
        let id = raw.into();
        if id.is_empty() {
            return Err(UserIdValidationError::Empty);
        }
        if id.trim() != id {
            return Err(UserIdValidationError::SurroundingWhitespace);
        }
        if id.chars().count() > USER_ID_MAX_LEN {
            return Err(UserIdValidationError::TooLong {
                max: USER_ID_MAX_LEN,
            });
        }
        Ok(Self(id))
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether a raw stored `userId` value refers to this user.
    #[must_use]
    pub fn matches(&self, raw: &str) -> bool {
        self.0 == raw
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}
