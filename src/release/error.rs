//! Error types for release naming.
//!
//! Each variant identifies the rejected value and the constraint it broke.

use thiserror::Error;

/// Errors arising from invalid release name components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    /// A mod version is empty or cannot be used in a file name.
    #[error("invalid mod version \"{value}\": {reason}")]
    InvalidVersion {
        /// The rejected version string.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A module name is empty or cannot be used in a file name.
    #[error("invalid module name \"{value}\": {reason}")]
    InvalidModuleName {
        /// The rejected module name.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },
}

/// Result type alias using [`NamingError`].
pub type Result<T> = std::result::Result<T, NamingError>;
