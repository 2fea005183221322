//! Behaviour-driven tests for mod release packaging.
//!
//! These scenarios drive `release::packaging::package` against real module
//! directories in a temp dir and inspect the produced ZIP archives. Tests
//! use the rstest-bdd mutable world pattern.

use camino::{Utf8Path, Utf8PathBuf};
use modpack::release::packaging::{PackageOutput, package};
use modpack::release::packaging_error::PackagingError;
use modpack::release::path_list::PathList;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::fs;
use std::io::Read;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// World types
// ---------------------------------------------------------------------------

#[derive(Default)]
struct PackagingWorld {
    temp_dir: Option<TempDir>,
    module_dir: Option<Utf8PathBuf>,
    declared: Vec<String>,
    outputs: Vec<PackageOutput>,
    snapshots: Vec<Vec<(String, Vec<u8>)>>,
    packaging_error: Option<PackagingError>,
}

#[fixture]
fn world() -> PackagingWorld {
    PackagingWorld {
        temp_dir: Some(TempDir::new().expect("temp dir")),
        ..PackagingWorld::default()
    }
}

/// Return the module directory set up by a `Given` step.
fn module_dir(world: &PackagingWorld) -> Utf8PathBuf {
    world.module_dir.clone().expect("module directory set")
}

/// Create the module directory with the given manifest text.
fn create_module(world: &mut PackagingWorld, name: &str, manifest: &str) {
    let temp = world.temp_dir.as_ref().expect("temp_dir set").path();
    let dir = Utf8PathBuf::from_path_buf(temp.join(name)).expect("utf8 temp dir");
    fs::create_dir_all(&dir).expect("mkdir module");
    fs::write(dir.join("info.json"), manifest).expect("write manifest");
    world.module_dir = Some(dir);
}

/// Run the packager once and store the result in the world.
fn run_packaging(world: &mut PackagingWorld) {
    let dir = module_dir(world);
    let paths = PathList::detect(&world.declared);
    let outcome = package(&dir.join("info.json"), &dir, &paths);
    match outcome {
        Ok(output) => {
            world.snapshots.push(read_members(&output.archive_path));
            world.outputs.push(output);
        }
        Err(e) => world.packaging_error = Some(e),
    }
}

/// Read every member of an archive as `(name, bytes)` in stored order.
fn read_members(archive: &Utf8Path) -> Vec<(String, Vec<u8>)> {
    let file = fs::File::open(archive).expect("open archive");
    let mut zip = zip::ZipArchive::new(file).expect("valid zip");
    (0..zip.len())
        .map(|i| {
            let mut member = zip.by_index(i).expect("member");
            let mut bytes = Vec::new();
            member.read_to_end(&mut bytes).expect("read member");
            (member.name().to_owned(), bytes)
        })
        .collect()
}

fn last_output(world: &PackagingWorld) -> &PackageOutput {
    world.outputs.last().expect("packaging output set")
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("a module directory \"{name}\" with version \"{version}\"")]
fn given_module_with_version(world: &mut PackagingWorld, name: String, version: String) {
    let manifest = format!(r#"{{"name":"{name}","version":"{version}"}}"#);
    create_module(world, &name, &manifest);
}

#[given("a module directory \"{name}\" with manifest \"{manifest}\"")]
fn given_module_with_manifest(world: &mut PackagingWorld, name: String, manifest: String) {
    create_module(world, &name, &manifest);
}

#[given("a payload file \"{path}\"")]
fn given_payload_file(world: &mut PackagingWorld, path: String) {
    let target = module_dir(world).join(&path);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).expect("mkdir payload parent");
    }
    if !target.exists() {
        fs::write(&target, format!("-- contents of {path}\n")).expect("write payload");
    }
}

#[given("the declared paths \"{paths}\"")]
fn given_declared_paths(world: &mut PackagingWorld, paths: String) {
    world.declared = paths.split(',').map(str::to_owned).collect();
}

#[when("the module is packaged")]
fn when_packaged(world: &mut PackagingWorld) {
    run_packaging(world);
    assert!(
        world.packaging_error.is_none(),
        "packaging failed: {:?}",
        world.packaging_error
    );
}

#[when("the module is packaged twice")]
fn when_packaged_twice(world: &mut PackagingWorld) {
    when_packaged(world);
    when_packaged(world);
}

#[when("packaging is attempted")]
fn when_packaging_attempted(world: &mut PackagingWorld) {
    run_packaging(world);
}

#[then("the archive \"{filename}\" exists")]
fn then_archive_exists(world: &mut PackagingWorld, filename: String) {
    let output = last_output(world);
    assert_eq!(output.archive_path.file_name(), Some(filename.as_str()));
    assert!(output.archive_path.is_file(), "archive file must exist");
    let canonical = module_dir(world)
        .canonicalize_utf8()
        .expect("canonical module dir");
    assert_eq!(output.archive_path.parent(), Some(canonical.as_path()));
}

#[then("the archive contains \"{member}\"")]
fn then_archive_contains(world: &mut PackagingWorld, member: String) {
    let members = read_members(&last_output(world).archive_path);
    assert!(
        members.iter().any(|(name, _)| *name == member),
        "archive is missing {member}"
    );
}

#[then("the archive contains {count} members")]
fn then_archive_member_count(world: &mut PackagingWorld, count: usize) {
    let members = read_members(&last_output(world).archive_path);
    assert_eq!(members.len(), count, "unexpected member count");
}

#[then("every member matches its source file")]
fn then_members_match_sources(world: &mut PackagingWorld) {
    let output = last_output(world);
    let prefix = format!("{}/", output.release.folder_name());
    let members = read_members(&output.archive_path);
    assert_eq!(members.len(), output.entries.len());
    for (name, bytes) in members {
        let relative = name.strip_prefix(&prefix).expect("member under release folder");
        let source = fs::read(module_dir(world).join(relative)).expect("read source");
        assert_eq!(bytes, source, "content mismatch for {name}");
    }
}

#[then("both runs produced identical members")]
fn then_runs_identical(world: &mut PackagingWorld) {
    let [first, second] = world.outputs.as_slice() else {
        panic!("expected exactly two packaging runs");
    };
    assert_eq!(first.archive_path, second.archive_path);
    assert_eq!(first.entries, second.entries);
    let [first_members, second_members] = world.snapshots.as_slice() else {
        panic!("expected two archive snapshots");
    };
    assert!(!first_members.is_empty());
    assert_eq!(first_members, second_members);
}

#[then("a manifest error is returned")]
fn then_manifest_error(world: &mut PackagingWorld) {
    assert!(
        matches!(world.packaging_error, Some(PackagingError::Manifest(_))),
        "expected a manifest error, got {:?}",
        world.packaging_error
    );
}

#[then("a path-not-found error is returned")]
fn then_path_not_found(world: &mut PackagingWorld) {
    assert!(
        matches!(
            world.packaging_error,
            Some(PackagingError::PathNotFound { ref path }) if path == "does-not-exist.lua"
        ),
        "expected PathNotFound, got {:?}",
        world.packaging_error
    );
}

#[then("no archive is left in the module directory")]
fn then_no_archive(world: &mut PackagingWorld) {
    let leftovers: Vec<String> = fs::read_dir(module_dir(world))
        .expect("read module dir")
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.contains(".zip"))
        .collect();
    assert!(leftovers.is_empty(), "unexpected archives: {leftovers:?}");
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Archive is named after the module directory and manifest version"
)]
fn scenario_archive_name(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Declared directories are expanded recursively"
)]
fn scenario_directory_expansion(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Extracted members match the source tree"
)]
fn scenario_round_trip(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Packaging twice yields identical members"
)]
fn scenario_idempotence(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "A manifest without a version is rejected"
)]
fn scenario_missing_version(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "A missing declared path is rejected"
)]
fn scenario_missing_path(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "A broken manifest is reported before missing paths"
)]
fn scenario_manifest_checked_first(world: PackagingWorld) {
    let _ = world;
}
