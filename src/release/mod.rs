//! Release naming, manifest reading, and ZIP packaging for mod releases.
//!
//! # Sub-modules
//!
//! - [`error`] - Validation errors for release name components.
//! - [`manifest`] - Reading the version (and name) from `info.json`.
//! - [`naming`] - Module name and `<module>_<version>` release naming.
//! - [`packaging`] - Archive creation.
//! - [`packaging_error`] - Error types for packaging operations.
//! - [`path_list`] - Declared payload paths and their expansion.
//! - [`version`] - Mod version newtype (`ModVersion`).

pub mod error;
pub mod manifest;
pub mod naming;
pub mod packaging;
pub mod packaging_error;
pub mod path_list;
pub mod version;
