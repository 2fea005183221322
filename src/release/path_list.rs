//! Declared payload paths and their expansion into archive members.
//!
//! A [`PathList`] is the ordered, hand-maintained list of files and
//! directory roots that make up a release. Resolving it against the module
//! directory yields every payload file exactly once, in a stable order:
//! declaration order across entries, and file-name order inside each
//! walked directory.

use super::packaging_error::PackagingError;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use log::debug;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use walkdir::WalkDir;

/// Whether a declared path names a single file or a directory root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A single regular file.
    File,
    /// A directory whose files are included recursively.
    Directory,
}

impl EntryKind {
    const fn describe(self) -> &'static str {
        match self {
            Self::File => "a file",
            Self::Directory => "a directory",
        }
    }
}

/// One declared payload path, relative to the module directory.
///
/// The kind is either stated up front or left open, in which case it is
/// read from the file system when the list is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    path: Utf8PathBuf,
    kind: Option<EntryKind>,
}

impl PathEntry {
    /// Declare a single file.
    #[must_use]
    pub fn file(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: Some(EntryKind::File),
        }
    }

    /// Declare a directory root to include recursively.
    #[must_use]
    pub fn directory(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: Some(EntryKind::Directory),
        }
    }

    /// Declare a path whose kind is decided by what is on disk at resolve
    /// time.
    #[must_use]
    pub fn detect(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: None,
        }
    }

    /// The declared path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// The declared kind, if one was stated.
    #[must_use]
    pub const fn kind(&self) -> Option<EntryKind> {
        self.kind
    }
}

/// An ordered list of declared payload paths.
///
/// Building a list never touches the file system. Paths are validated and
/// inspected by [`PathList::resolve`].
///
/// # Examples
///
/// ```
/// use modpack::release::path_list::{EntryKind, PathEntry, PathList};
///
/// let list = PathList::new(vec![
///     PathEntry::directory("code"),
///     PathEntry::file("info.json"),
/// ]);
/// assert_eq!(list.entries().len(), 2);
/// assert_eq!(list.entries()[0].kind(), Some(EntryKind::Directory));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathList(Vec<PathEntry>);

impl PathList {
    /// Create a list from explicitly typed entries.
    #[must_use]
    pub fn new(entries: Vec<PathEntry>) -> Self {
        Self(entries)
    }

    /// Declare `paths` in order, leaving each kind to be detected on disk.
    #[must_use]
    pub fn detect<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            paths
                .into_iter()
                .map(|raw| PathEntry::detect(raw.as_ref()))
                .collect(),
        )
    }

    /// The declared entries in order.
    #[must_use]
    pub fn entries(&self) -> &[PathEntry] {
        &self.0
    }

    /// Expand the list into payload files relative to `root`.
    ///
    /// Directory entries are walked recursively, following symbolic links,
    /// with siblings visited in file-name order. A file reachable through
    /// more than one entry is returned once, at its first position.
    ///
    /// # Errors
    ///
    /// Returns [`PackagingError::PathNotFound`] when a declared path is
    /// missing, [`PackagingError::InvalidPath`] when it is absolute,
    /// escapes `root`, has the wrong kind, or contains a non-UTF-8 name,
    /// and [`PackagingError::DirectoryWalk`] when a directory cannot be
    /// read.
    pub fn resolve(&self, root: &Utf8Path) -> Result<Vec<Utf8PathBuf>, PackagingError> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for entry in &self.0 {
            let relative = normalise(&entry.path)?;
            let actual = inspect(root, &entry.path, &relative)?;
            if let Some(declared) = entry.kind.filter(|declared| *declared != actual) {
                return Err(PackagingError::InvalidPath {
                    path: entry.path.clone(),
                    reason: format!(
                        "declared as {} but is {}",
                        declared.describe(),
                        actual.describe()
                    ),
                });
            }

            let found = match actual {
                EntryKind::File => vec![relative],
                EntryKind::Directory => walk_directory(root, &entry.path, &relative)?,
            };
            for file in found {
                if seen.insert(file.clone()) {
                    files.push(file);
                } else {
                    debug!("skipping {file}: already included by an earlier entry");
                }
            }
        }

        Ok(files)
    }
}

/// Strip `.` components and reject anything that could leave the module
/// directory. The module root itself normalises to an empty path.
fn normalise(declared: &Utf8Path) -> Result<Utf8PathBuf, PackagingError> {
    let invalid = |reason: &str| PackagingError::InvalidPath {
        path: declared.to_owned(),
        reason: reason.to_owned(),
    };
    if declared.as_str().is_empty() {
        return Err(invalid("path must not be empty"));
    }

    let mut relative = Utf8PathBuf::new();
    for component in declared.components() {
        match component {
            Utf8Component::Normal(part) => relative.push(part),
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                return Err(invalid("path must not contain \"..\" components"));
            }
            Utf8Component::RootDir | Utf8Component::Prefix(_) => {
                return Err(invalid("path must be relative to the module directory"));
            }
        }
    }
    Ok(relative)
}

/// Determine what `relative` is on disk under `root`.
fn inspect(
    root: &Utf8Path,
    declared: &Utf8Path,
    relative: &Utf8Path,
) -> Result<EntryKind, PackagingError> {
    let metadata = fs::metadata(root.join(relative)).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            PackagingError::PathNotFound {
                path: declared.to_owned(),
            }
        } else {
            PackagingError::InvalidPath {
                path: declared.to_owned(),
                reason: err.to_string(),
            }
        }
    })?;

    if metadata.is_dir() {
        Ok(EntryKind::Directory)
    } else if metadata.is_file() {
        Ok(EntryKind::File)
    } else {
        Err(PackagingError::InvalidPath {
            path: declared.to_owned(),
            reason: "not a regular file or directory".to_owned(),
        })
    }
}

/// Collect every regular file below `root/relative`, relative to `root`.
fn walk_directory(
    root: &Utf8Path,
    declared: &Utf8Path,
    relative: &Utf8Path,
) -> Result<Vec<Utf8PathBuf>, PackagingError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root.join(relative))
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|source| PackagingError::DirectoryWalk {
            path: declared.to_owned(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let below_root = entry
            .path()
            .strip_prefix(root.as_std_path())
            .map_err(|_| PackagingError::InvalidPath {
                path: declared.to_owned(),
                reason: format!("{} is outside the module directory", entry.path().display()),
            })?;
        let file = Utf8PathBuf::from_path_buf(below_root.to_path_buf()).map_err(|path| {
            PackagingError::InvalidPath {
                path: declared.to_owned(),
                reason: format!("{} is not valid UTF-8", path.display()),
            }
        })?;
        files.push(file);
    }

    Ok(files)
}
