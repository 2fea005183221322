//! Mod version newtype.
//!
//! The version string is copied verbatim from the manifest into both the
//! archive file name and its top-level folder, so it must be non-empty,
//! free of surrounding whitespace, and must not contain path separators.

use super::error::{NamingError, Result};
use std::fmt;

/// A validated mod version string (e.g. `1.2.3`).
///
/// # Examples
///
/// ```
/// use modpack::release::version::ModVersion;
///
/// let version: ModVersion = "1.2.3".try_into().expect("valid version");
/// assert_eq!(version.as_str(), "1.2.3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModVersion(String);

impl ModVersion {
    /// Return the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn invalid(value: &str, reason: impl Into<String>) -> NamingError {
    NamingError::InvalidVersion {
        value: value.to_owned(),
        reason: reason.into(),
    }
}

impl TryFrom<&str> for ModVersion {
    type Error = NamingError;

    fn try_from(value: &str) -> Result<Self> {
        if value.trim().is_empty() {
            return Err(invalid(value, "version must not be empty"));
        }
        if value.trim() != value {
            return Err(invalid(
                value,
                "version must not have leading or trailing whitespace",
            ));
        }
        if let Some(bad) = value
            .chars()
            .find(|c| matches!(c, '/' | '\\') || c.is_control())
        {
            return Err(invalid(
                value,
                format!("character {bad:?} is not allowed in a file name"),
            ));
        }
        if value == "." || value == ".." {
            return Err(invalid(value, "version must not be a relative path"));
        }
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for ModVersion {
    type Error = NamingError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str()).map(|_| Self(value))
    }
}

impl fmt::Display for ModVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
