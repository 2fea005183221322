//! Release packaging.
//!
//! Reads the mod version from its manifest, resolves the declared payload
//! paths, and writes them into `<module>_<version>.zip` inside the module
//! directory, every member nested under a `<module>_<version>/` folder.
//!
//! The archive is staged in a temporary file next to its destination and
//! only renamed into place once it has been finalized and flushed, so a
//! failed run never leaves a truncated archive behind and never disturbs an
//! existing one.

use super::manifest::read_manifest;
use super::naming::{ModuleName, ReleaseName};
use super::packaging_error::{ArchiveWriteError, PackagingError};
use super::path_list::PathList;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info, warn};
use std::fs::File;
use std::io;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Deflate level used for every member.
const COMPRESSION_LEVEL: i64 = 9;

/// Mode of a newly created archive. Staging files start out owner-only.
#[cfg(unix)]
const ARCHIVE_MODE: u32 = 0o644;

/// One payload file and the name it is stored under in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path of the payload file, relative to the module directory.
    pub source: Utf8PathBuf,
    /// Member name inside the archive, using `/` separators.
    pub member: String,
}

/// Output produced by [`package`].
#[derive(Debug)]
pub struct PackageOutput {
    /// Path to the created archive.
    pub archive_path: Utf8PathBuf,
    /// The release the archive was named after.
    pub release: ReleaseName,
    /// Archive entries in the order they were written.
    pub entries: Vec<ArchiveEntry>,
}

/// Package the payload declared by `paths` into a versioned ZIP archive.
///
/// `manifest_path` is read for the release version. `module_dir` names the
/// module (its base name after canonicalisation), anchors every path in
/// `paths`, and receives the archive.
///
/// # Errors
///
/// Returns [`PackagingError::Manifest`] for an unreadable manifest or one
/// without a usable `version`, [`PackagingError::InvalidModuleDir`] when
/// the module directory cannot name a release, the path errors described
/// on [`PathList::resolve`], and [`PackagingError::ArchiveWrite`] when the
/// archive cannot be written. No archive is created on error.
pub fn package(
    manifest_path: &Utf8Path,
    module_dir: &Utf8Path,
    paths: &PathList,
) -> Result<PackageOutput, PackagingError> {
    let manifest = read_manifest(manifest_path)?;

    let module_dir =
        module_dir
            .canonicalize_utf8()
            .map_err(|err| PackagingError::InvalidModuleDir {
                path: module_dir.to_owned(),
                reason: err.to_string(),
            })?;
    let module = ModuleName::from_dir(&module_dir).map_err(|err| {
        PackagingError::InvalidModuleDir {
            path: module_dir.clone(),
            reason: err.to_string(),
        }
    })?;

    if let Some(declared) = manifest.name().filter(|name| *name != module.as_str()) {
        warn!(
            "manifest {manifest_path} declares name \"{declared}\" but the module directory is \"{module}\"; using \"{module}\""
        );
    }

    let release = ReleaseName::new(module, manifest.version().clone());
    let archive_filename = release.archive_filename();
    let archive_path = module_dir.join(&archive_filename);
    info!("packaging {release} from {module_dir}");

    let files = paths.resolve(&module_dir)?;
    let entries = build_archive_entries(&release, files, Utf8Path::new(&archive_filename));

    create_archive(&archive_path, &module_dir, &entries)?;
    info!("created {archive_path} with {} file(s)", entries.len());

    Ok(PackageOutput {
        archive_path,
        release,
        entries,
    })
}

/// Map resolved payload files to archive members under the release folder.
///
/// `archive` is skipped so that a directory entry covering the module root
/// never packs a previous archive of the same release into the new one.
fn build_archive_entries(
    release: &ReleaseName,
    files: Vec<Utf8PathBuf>,
    archive: &Utf8Path,
) -> Vec<ArchiveEntry> {
    files
        .into_iter()
        .filter(|file| file != archive)
        .map(|source| {
            let relative = source
                .components()
                .map(|component| component.as_str())
                .collect::<Vec<_>>()
                .join("/");
            ArchiveEntry {
                member: release.member_name(&relative),
                source,
            }
        })
        .collect()
}

/// Options applied to every member: maximum Deflate and ZIP64 enabled
/// regardless of member size.
fn member_options(source: &File) -> io::Result<SimpleFileOptions> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL))
        .large_file(true);

    #[cfg(unix)]
    let options = {
        use std::os::unix::fs::PermissionsExt;
        options.unix_permissions(source.metadata()?.permissions().mode())
    };
    #[cfg(not(unix))]
    let _ = source;

    Ok(options)
}

/// Write `entries` into a new ZIP archive at `archive_path`.
///
/// Source paths are resolved against `root`. The archive is assembled in a
/// temporary file in the same directory and atomically renamed over
/// `archive_path` once complete; on error the temporary file is removed.
/// A replaced archive keeps its permissions.
///
/// # Errors
///
/// Returns [`PackagingError::ArchiveWrite`] if a payload file cannot be
/// read or the archive cannot be written, finalized, or moved into place.
pub fn create_archive(
    archive_path: &Utf8Path,
    root: &Utf8Path,
    entries: &[ArchiveEntry],
) -> Result<(), PackagingError> {
    let write_error = |source: ArchiveWriteError| PackagingError::ArchiveWrite {
        archive: archive_path.to_owned(),
        source,
    };

    let staging_dir = archive_path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let mut staged = tempfile::Builder::new()
        .prefix(".modpack-")
        .suffix(".zip.part")
        .tempfile_in(staging_dir)
        .map_err(|err| write_error(err.into()))?;
    #[cfg(unix)]
    staged
        .as_file()
        .set_permissions(archive_permissions(archive_path))
        .map_err(|err| write_error(err.into()))?;

    write_entries(staged.as_file_mut(), root, entries).map_err(write_error)?;

    staged
        .persist(archive_path)
        .map_err(|err| write_error(err.error.into()))?;
    Ok(())
}

/// Permissions of the archive being replaced, or [`ARCHIVE_MODE`] when
/// there is none.
#[cfg(unix)]
fn archive_permissions(archive_path: &Utf8Path) -> std::fs::Permissions {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(archive_path).map_or_else(
        |_| std::fs::Permissions::from_mode(ARCHIVE_MODE),
        |existing| existing.permissions(),
    )
}

fn write_entries(
    file: &mut File,
    root: &Utf8Path,
    entries: &[ArchiveEntry],
) -> Result<(), ArchiveWriteError> {
    let mut zip = ZipWriter::new(file);

    for entry in entries {
        debug!("adding {} as {}", entry.source, entry.member);
        let mut source = File::open(root.join(&entry.source))?;
        zip.start_file(entry.member.as_str(), member_options(&source)?)?;
        io::copy(&mut source, &mut zip)?;
    }

    let file = zip.finish()?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
#[path = "packaging_tests.rs"]
mod tests;
