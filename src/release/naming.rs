//! Release naming policy for packaged mods.
//!
//! A release is identified by its module name and version. Both the archive
//! file and the single top-level folder inside it are named
//! `<module>_<version>`, with the archive carrying a `.zip` extension.

use super::error::{NamingError, Result};
use super::version::ModVersion;
use camino::Utf8Path;
use std::fmt;

/// The fixed file extension for release archives.
const ARCHIVE_EXTENSION: &str = ".zip";

/// The name of a module, taken from its directory's base name.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use modpack::release::naming::ModuleName;
///
/// let name = ModuleName::from_dir(Utf8Path::new("/src/mods/examplemod"))
///     .expect("directory has a base name");
/// assert_eq!(name.as_str(), "examplemod");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleName(String);

impl ModuleName {
    /// Derive the module name from the last component of `dir`.
    ///
    /// `dir` should already be canonical; a trailing `.` or `..` is not
    /// resolved here.
    ///
    /// # Errors
    ///
    /// Returns [`NamingError::InvalidModuleName`] when `dir` has no final
    /// component (for example `/`) or that component is unusable.
    pub fn from_dir(dir: &Utf8Path) -> Result<Self> {
        let base = dir
            .file_name()
            .ok_or_else(|| NamingError::InvalidModuleName {
                value: dir.to_string(),
                reason: "directory has no base name".to_owned(),
            })?;
        Self::try_from(base)
    }

    /// Return the module name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ModuleName {
    type Error = NamingError;

    fn try_from(value: &str) -> Result<Self> {
        let reason = if value.is_empty() {
            Some("module name must not be empty")
        } else if value == "." || value == ".." {
            Some("module name must not be a relative path")
        } else if value.contains(['/', '\\']) {
            Some("module name must not contain path separators")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(NamingError::InvalidModuleName {
                value: value.to_owned(),
                reason: reason.to_owned(),
            }),
            None => Ok(Self(value.to_owned())),
        }
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The `<module>_<version>` identity of a packaged release.
///
/// # Examples
///
/// ```
/// use modpack::release::naming::{ModuleName, ReleaseName};
/// use modpack::release::version::ModVersion;
///
/// let module = ModuleName::try_from("examplemod").expect("valid module name");
/// let version = ModVersion::try_from("1.0.0").expect("valid version");
/// let release = ReleaseName::new(module, version);
///
/// assert_eq!(release.folder_name(), "examplemod_1.0.0");
/// assert_eq!(release.archive_filename(), "examplemod_1.0.0.zip");
/// assert_eq!(
///     release.member_name("code/a.lua"),
///     "examplemod_1.0.0/code/a.lua"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseName {
    module: ModuleName,
    version: ModVersion,
}

impl ReleaseName {
    /// Create a release name from validated components.
    #[must_use]
    pub fn new(module: ModuleName, version: ModVersion) -> Self {
        Self { module, version }
    }

    /// Return the version component.
    #[must_use]
    pub fn version(&self) -> &ModVersion {
        &self.version
    }

    /// Name of the single top-level folder inside the archive.
    #[must_use]
    pub fn folder_name(&self) -> String {
        format!("{}_{}", self.module, self.version)
    }

    /// File name of the archive on disk.
    #[must_use]
    pub fn archive_filename(&self) -> String {
        format!("{}{ARCHIVE_EXTENSION}", self.folder_name())
    }

    /// Archive member name for a payload path given with `/` separators.
    #[must_use]
    pub fn member_name(&self, relative: &str) -> String {
        format!("{}/{relative}", self.folder_name())
    }
}

impl fmt::Display for ReleaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.folder_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn release() -> ReleaseName {
        ReleaseName::new(
            ModuleName::try_from("examplemod").expect("valid module name"),
            ModVersion::try_from("1.0.0").expect("valid version"),
        )
    }

    #[rstest]
    fn archive_filename_joins_module_and_version(release: ReleaseName) {
        assert_eq!(release.archive_filename(), "examplemod_1.0.0.zip");
    }

    #[rstest]
    fn member_name_nests_under_folder(release: ReleaseName) {
        assert_eq!(
            release.member_name("code/sub/b.lua"),
            "examplemod_1.0.0/code/sub/b.lua"
        );
    }

    #[rstest]
    fn display_matches_folder_name(release: ReleaseName) {
        assert_eq!(release.to_string(), release.folder_name());
    }

    #[rstest]
    #[case::plain("/home/dev/mods/examplemod", "examplemod")]
    #[case::relative("mods/other-mod", "other-mod")]
    #[case::trailing_slash("mods/examplemod/", "examplemod")]
    fn module_name_uses_last_component(#[case] dir: &str, #[case] expected: &str) {
        let name = ModuleName::from_dir(Utf8Path::new(dir)).expect("has base name");
        assert_eq!(name.as_str(), expected);
    }

    #[rstest]
    #[case::root("/")]
    #[case::dot_dot("mods/..")]
    fn module_name_rejects_directories_without_base_name(#[case] dir: &str) {
        let result = ModuleName::from_dir(Utf8Path::new(dir));
        assert!(matches!(
            result,
            Err(NamingError::InvalidModuleName { .. })
        ));
    }

    #[rstest]
    #[case::empty("")]
    #[case::dot(".")]
    #[case::separator("a/b")]
    fn module_name_rejects_unusable_values(#[case] raw: &str) {
        assert!(ModuleName::try_from(raw).is_err());
    }
}
