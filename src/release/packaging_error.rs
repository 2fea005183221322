//! Error types for release packaging.
//!
//! Covers manifest problems, declared paths that are missing or unusable,
//! and failures while writing or finalizing the ZIP archive.

use super::manifest::ManifestError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Low-level failures while producing the archive file.
#[derive(Debug, Error)]
pub enum ArchiveWriteError {
    /// Reading a payload file or writing the archive failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The ZIP encoder rejected an entry or failed to finalize.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Errors arising from packaging a release.
#[derive(Debug, Error)]
pub enum PackagingError {
    /// The manifest is missing, malformed, or has no usable version.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The module directory cannot name a release.
    #[error("invalid module directory {path}: {reason}")]
    InvalidModuleDir {
        /// The module directory as given.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// A declared payload path does not exist.
    #[error("declared path not found: {path}")]
    PathNotFound {
        /// The declared path, relative to the module directory.
        path: Utf8PathBuf,
    },

    /// A declared or discovered payload path cannot be archived.
    #[error("invalid payload path {path}: {reason}")]
    InvalidPath {
        /// The offending path.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// Walking a declared directory failed.
    #[error("cannot walk directory {path}: {source}")]
    DirectoryWalk {
        /// The declared directory, relative to the module directory.
        path: Utf8PathBuf,
        /// The underlying walk error.
        #[source]
        source: walkdir::Error,
    },

    /// Writing or finalizing the archive failed.
    #[error("cannot write archive {archive}: {source}")]
    ArchiveWrite {
        /// Final path of the archive being produced.
        archive: Utf8PathBuf,
        /// The underlying failure.
        #[source]
        source: ArchiveWriteError,
    },
}
