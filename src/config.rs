//! Packaging target configuration loaded from `modpack.toml`.
//!
//! A module directory may carry a `modpack.toml` declaring which manifest
//! to read and which files and directories make up the release. When the
//! file is absent the built-in defaults describe the stock mod layout, so
//! running the packager with no arguments in a conventional mod directory
//! just works.

use crate::release::manifest::DEFAULT_MANIFEST;
use crate::release::path_list::PathList;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::io::ErrorKind;
use thiserror::Error;

/// File name of the per-module configuration.
pub const CONFIG_FILE: &str = "modpack.toml";

/// Payload shipped when no configuration overrides it.
pub const DEFAULT_PATHS: &[&str] = &[
    "code/debug.lua",
    "code/gameplay.lua",
    "code/ui.lua",
    "prototypes/input.lua",
    "prototypes/styles.lua",
    "constants.lua",
    "control.lua",
    "data.lua",
    "data-updates.lua",
    "info.json",
    "LICENSE",
    "README.md",
    "thumbnail.png",
];

/// Errors arising from loading `modpack.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML of the expected shape.
    #[error("invalid {path}: {source}")]
    Parse {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// The configuration declares no payload paths.
    #[error("{path} declares no payload paths")]
    EmptyPaths {
        /// Path to the configuration file.
        path: Utf8PathBuf,
    },
}

/// What to package for one module.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Manifest location relative to the module directory.
    pub manifest: Utf8PathBuf,
    /// Payload files and directory roots, relative to the module directory,
    /// in the order they are written to the archive.
    pub paths: Vec<String>,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            manifest: Utf8PathBuf::from(DEFAULT_MANIFEST),
            paths: DEFAULT_PATHS.iter().map(|&path| path.to_owned()).collect(),
        }
    }
}

impl PackConfig {
    /// Parse configuration text read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys
    /// and [`ConfigError::EmptyPaths`] when `paths` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use modpack::config::PackConfig;
    ///
    /// let config = PackConfig::from_toml(
    ///     "paths = [\"code\", \"info.json\"]\n",
    ///     Utf8Path::new("modpack.toml"),
    /// )
    /// .expect("valid configuration");
    /// assert_eq!(config.manifest, "info.json");
    /// assert_eq!(config.paths, ["code", "info.json"]);
    /// ```
    pub fn from_toml(source: &str, path: &Utf8Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        if config.paths.is_empty() {
            return Err(ConfigError::EmptyPaths {
                path: path.to_owned(),
            });
        }
        Ok(config)
    }

    /// Load the configuration at `path`, which must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise
    /// any error from [`Self::from_toml`].
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml(&source, path)
    }

    /// Load the configuration at `path`, falling back to the defaults when
    /// the file does not exist.
    ///
    /// # Errors
    ///
    /// As [`Self::load`], except that a missing file is not an error.
    pub fn load_or_default(path: &Utf8Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// The manifest path resolved against `module_dir`.
    #[must_use]
    pub fn manifest_path(&self, module_dir: &Utf8Path) -> Utf8PathBuf {
        module_dir.join(&self.manifest)
    }

    /// The configured paths in declaration order, each classified as a file
    /// or directory when the list is resolved.
    #[must_use]
    pub fn path_list(&self) -> PathList {
        PathList::detect(&self.paths)
    }
}
