//! Mod manifest (`info.json`) reading.
//!
//! The packager only needs the `version` field. `name` is read when present
//! so that a mismatch with the directory-derived module name can be
//! reported; every other key is ignored.

use super::error::NamingError;
use super::version::ModVersion;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Default manifest location relative to the module directory.
pub const DEFAULT_MANIFEST: &str = "info.json";

/// Errors arising from reading the mod manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("cannot read manifest {path}: {source}")]
    Read {
        /// Path to the manifest.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not a JSON object of the expected shape.
    #[error("cannot parse manifest {path}: {source}")]
    Parse {
        /// Path to the manifest.
        path: Utf8PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The manifest has no `version` field.
    #[error("manifest {path} has no \"version\" field")]
    MissingVersion {
        /// Path to the manifest.
        path: Utf8PathBuf,
    },

    /// The `version` field cannot be used to name the release.
    #[error("manifest {path} has an unusable \"version\": {source}")]
    InvalidVersion {
        /// Path to the manifest.
        path: Utf8PathBuf,
        /// The validation failure.
        #[source]
        source: NamingError,
    },
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    version: Option<String>,
    #[serde(default)]
    name: Option<Value>,
}

/// The subset of a mod manifest the packager relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModManifest {
    version: ModVersion,
    name: Option<String>,
}

impl ModManifest {
    /// The release version.
    #[must_use]
    pub fn version(&self) -> &ModVersion {
        &self.version
    }

    /// The `name` declared in the manifest, when it is a string.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Parse manifest JSON read from `path`.
///
/// `path` is only used in error messages.
///
/// # Errors
///
/// Returns [`ManifestError::Parse`] for malformed JSON, a top-level value
/// that is not an object, or a non-string `version`, [`ManifestError::MissingVersion`] when the field is absent,
/// and [`ManifestError::InvalidVersion`] when it cannot name a release.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use modpack::release::manifest::parse_manifest;
///
/// let json = r#"{"name":"examplemod","version":"1.0.0","title":"Example"}"#;
/// let manifest = parse_manifest(json, Utf8Path::new("info.json")).expect("valid manifest");
/// assert_eq!(manifest.version().as_str(), "1.0.0");
/// assert_eq!(manifest.name(), Some("examplemod"));
/// ```
pub fn parse_manifest(json: &str, path: &Utf8Path) -> Result<ModManifest, ManifestError> {
    let parse_error = |source| ManifestError::Parse {
        path: path.to_owned(),
        source,
    };
    // A derived struct also deserializes from a JSON array; only an object
    // is a manifest.
    let object: Map<String, Value> = serde_json::from_str(json).map_err(parse_error)?;
    let raw: RawManifest = serde_json::from_value(Value::Object(object)).map_err(parse_error)?;
    let version = raw.version.ok_or_else(|| ManifestError::MissingVersion {
        path: path.to_owned(),
    })?;
    let version = ModVersion::try_from(version).map_err(|source| ManifestError::InvalidVersion {
        path: path.to_owned(),
        source,
    })?;
    let name = raw
        .name
        .and_then(|value| value.as_str().map(str::to_owned));
    Ok(ModManifest { version, name })
}

/// Read and parse the manifest at `path`.
///
/// # Errors
///
/// Returns [`ManifestError::Read`] if the file cannot be read, otherwise
/// any error from [`parse_manifest`].
pub fn read_manifest(path: &Utf8Path) -> Result<ModManifest, ManifestError> {
    let json = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_owned(),
        source,
    })?;
    parse_manifest(&json, path)
}
