//! Integration tests for registering discovered compilers in scopes.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use compiler_scout::compilers::{discover, CompilerSpec, DiscoveryOptions, Toolchain};
use compiler_scout::config::{RemoveSelector, ScopeLayout, ScopeName, ScopeStore};
use compiler_scout::platform::Platform;
use tempfile::TempDir;

fn mock_compiler_dir(version: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let script = format!(
        "#!/bin/sh\nfor arg in \"$@\"; do\n    if [ \"$arg\" = -dumpversion ]; then\n        echo '{}'\n    fi\ndone\n",
        version
    );
    for name in ["gcc", "g++", "gfortran"] {
        let path = temp.path().join(name);
        fs::write(&path, &script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o700)).unwrap();
    }
    temp
}

fn find(dir: &Path) -> Vec<Toolchain> {
    discover(&[dir.to_path_buf()], &DiscoveryOptions::default())
}

fn linux() -> Platform {
    Platform::new("ubuntu22.04", "x86_64")
}

#[test]
fn discovered_compiler_is_registered() {
    let compilers = mock_compiler_dir("4.5.3");
    let root = TempDir::new().unwrap();
    let store = ScopeStore::new(ScopeLayout::rooted(root.path()));

    let added = store
        .add_toolchains(ScopeName::User, &find(compilers.path()), &linux())
        .unwrap();

    let gcc = CompilerSpec::new("gcc", "4.5.3");
    assert_eq!(added, vec![gcc.clone()]);
    assert!(store.all_compiler_specs(None).unwrap().contains(&gcc));

    let records = store.records(Some(ScopeName::User)).unwrap();
    let record = &records[0].1;
    assert_eq!(record.paths.cxx, Some(compilers.path().join("g++")));
    assert_eq!(record.operating_system, "ubuntu22.04");
}

#[test]
fn registering_twice_adds_nothing() {
    let compilers = mock_compiler_dir("4.5.3");
    let root = TempDir::new().unwrap();
    let store = ScopeStore::new(ScopeLayout::rooted(root.path()));
    let toolchains = find(compilers.path());

    store
        .add_toolchains(ScopeName::Site, &toolchains, &linux())
        .unwrap();
    let file = store.layout().compilers_file(ScopeName::Site);
    let first = fs::read_to_string(&file).unwrap();

    let added = store
        .add_toolchains(ScopeName::Site, &toolchains, &linux())
        .unwrap();

    assert!(added.is_empty());
    assert_eq!(fs::read_to_string(&file).unwrap(), first);
}

#[test]
fn remove_all_empties_every_scope() {
    let old = mock_compiler_dir("4.5.3");
    let new = mock_compiler_dir("9.3.0");
    let root = TempDir::new().unwrap();
    let store = ScopeStore::new(ScopeLayout::rooted(root.path()));
    store
        .add_toolchains(ScopeName::Site, &find(old.path()), &linux())
        .unwrap();
    store
        .add_toolchains(ScopeName::User, &find(new.path()), &linux())
        .unwrap();

    let outcome = store.remove(None, &RemoveSelector::All).unwrap();

    assert_eq!(outcome.removed.len(), 2);
    assert!(store.all_compiler_specs(None).unwrap().is_empty());
}

#[test]
fn remove_by_spec_keeps_other_versions() {
    let old = mock_compiler_dir("4.5.3");
    let new = mock_compiler_dir("9.3.0");
    let root = TempDir::new().unwrap();
    let store = ScopeStore::new(ScopeLayout::rooted(root.path()));
    let mut toolchains = find(old.path());
    toolchains.extend(find(new.path()));
    store
        .add_toolchains(ScopeName::User, &toolchains, &linux())
        .unwrap();

    let selector = RemoveSelector::Spec("gcc@4.5.3".parse().unwrap());
    store.remove(Some(ScopeName::User), &selector).unwrap();

    assert_eq!(
        store.all_compiler_specs(None).unwrap(),
        vec![CompilerSpec::new("gcc", "9.3.0")]
    );
}

#[test]
fn user_scope_shadows_identical_site_record() {
    let compilers = mock_compiler_dir("4.5.3");
    let root = TempDir::new().unwrap();
    let store = ScopeStore::new(ScopeLayout::rooted(root.path()));
    let toolchains = find(compilers.path());
    store
        .add_toolchains(ScopeName::Site, &toolchains, &linux())
        .unwrap();
    store
        .add_toolchains(ScopeName::User, &toolchains, &linux())
        .unwrap();

    let records = store.records(None).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].0, ScopeName::User);
}
