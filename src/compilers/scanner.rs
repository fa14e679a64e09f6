//! Candidate scanner.
//!
//! Walks search directories and turns every executable whose name one of
//! the families recognizes into a [`CompilerCandidate`]. Nothing is executed
//! here; probing happens in the matcher.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::candidate::{classify, CompilerCandidate};

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// A classified executable before duplicate elimination.
struct Found {
    candidate: CompilerCandidate,
    canonical: PathBuf,
    is_symlink: bool,
}

/// Scan `paths` for compiler candidates.
///
/// Each entry is either a directory, whose executables are enumerated in
/// name order, or an executable file, which is classified on its own.
/// Missing or unreadable entries are skipped. Entries that resolve to the
/// same file under the same classification are collapsed, keeping the
/// unsuffixed name (`gcc` over `gcc-12`), then a non-symlink entry, then the
/// earlier one.
pub fn scan(paths: &[PathBuf]) -> Vec<CompilerCandidate> {
    let mut found = Vec::new();

    for (search_index, path) in paths.iter().enumerate() {
        if path.is_dir() {
            for file in list_executables(path) {
                collect(&file, search_index, &mut found);
            }
        } else if is_executable(path) {
            collect(path, search_index, &mut found);
        } else {
            debug!("Skipping search path entry {}", path.display());
        }
    }

    let candidates = dedupe(found);
    debug!("Scanned {} path(s), {} candidate(s)", paths.len(), candidates.len());
    candidates
}

fn list_executables(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_executable(path))
        .collect();
    files.sort();
    files
}

fn collect(path: &Path, search_index: usize, found: &mut Vec<Found>) {
    let Some(basename) = path.file_name().and_then(|n| n.to_str()) else {
        return;
    };

    let parsed = classify(basename);
    if parsed.is_empty() {
        return;
    }

    let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let is_symlink = fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);

    for parsed in parsed {
        found.push(Found {
            candidate: CompilerCandidate {
                path: path.to_path_buf(),
                basename: basename.to_string(),
                parsed,
                search_index,
            },
            canonical: canonical.clone(),
            is_symlink,
        });
    }
}

impl Found {
    /// Lower is better: the unsuffixed name, then the real file.
    fn preference(&self) -> (bool, bool) {
        (!self.candidate.parsed.suffix.is_empty(), self.is_symlink)
    }
}

fn dedupe(found: Vec<Found>) -> Vec<CompilerCandidate> {
    // Index of the preferred entry for each (file, family, base name).
    let mut winners: HashMap<(&Path, &str, &str), usize> = HashMap::new();
    for (i, f) in found.iter().enumerate() {
        let key = (
            f.canonical.as_path(),
            f.candidate.parsed.family.as_str(),
            f.candidate.parsed.name,
        );
        winners
            .entry(key)
            .and_modify(|best| {
                if f.preference() < found[*best].preference() {
                    *best = i;
                }
            })
            .or_insert(i);
    }

    let mut keep = vec![false; found.len()];
    for i in winners.values() {
        keep[*i] = true;
    }

    found
        .into_iter()
        .zip(keep)
        .filter_map(|(f, keep)| {
            if !keep {
                debug!("Dropping duplicate {}", f.candidate.path.display());
            }
            keep.then_some(f.candidate)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compilers::{Family, Role};
    use tempfile::TempDir;

    /// Create a fake binary at a path (creates parent dirs as needed).
    fn create_fake_binary(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[cfg(unix)]
    fn create_non_executable_file(path: &Path) {
        fs::write(path, "not executable").unwrap();
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o644)).unwrap();
    }

    fn basenames(candidates: &[CompilerCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.basename.as_str()).collect()
    }

    #[test]
    fn finds_recognized_executables_in_name_order() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("g++"));
        create_fake_binary(&temp.path().join("gcc"));
        create_fake_binary(&temp.path().join("python3"));

        let candidates = scan(&[temp.path().to_path_buf()]);

        assert_eq!(basenames(&candidates), vec!["g++", "gcc"]);
        assert!(candidates[1].parsed.fills(Role::Cc));
        assert_eq!(candidates[1].path, temp.path().join("gcc"));
    }

    #[cfg(unix)]
    #[test]
    fn skips_non_executable_files() {
        let temp = TempDir::new().unwrap();
        create_non_executable_file(&temp.path().join("gcc"));
        create_fake_binary(&temp.path().join("clang"));

        let candidates = scan(&[temp.path().to_path_buf()]);

        assert_eq!(basenames(&candidates), vec!["clang"]);
    }

    #[test]
    fn missing_directories_are_skipped() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("gcc"));

        let candidates = scan(&[
            PathBuf::from("/nonexistent/compiler/dir"),
            temp.path().to_path_buf(),
        ]);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].search_index, 1);
    }

    #[test]
    fn explicit_files_are_classified() {
        let temp = TempDir::new().unwrap();
        let gfortran = temp.path().join("gfortran-8");
        create_fake_binary(&gfortran);

        let candidates = scan(std::slice::from_ref(&gfortran));

        let families: Vec<Family> = candidates.iter().map(|c| c.parsed.family).collect();
        assert_eq!(families, vec![Family::Gnu, Family::Clang]);
        assert!(candidates.iter().all(|c| c.path == gfortran));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_duplicates_keep_unsuffixed_name() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("gcc-12"));
        std::os::unix::fs::symlink("gcc-12", temp.path().join("gcc")).unwrap();

        let candidates = scan(&[temp.path().to_path_buf()]);

        assert_eq!(basenames(&candidates), vec!["gcc"]);
        assert_eq!(candidates[0].parsed.suffix, "");
    }

    #[cfg(unix)]
    #[test]
    fn symlink_duplicates_with_same_suffix_keep_real_file() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("real");
        create_fake_binary(&real.join("gcc-12"));
        std::os::unix::fs::symlink(real.join("gcc-12"), temp.path().join("gcc-12")).unwrap();

        let candidates = scan(&[temp.path().to_path_buf(), real.clone()]);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].path, real.join("gcc-12"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_with_different_roles_are_kept() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("clang-14"));
        std::os::unix::fs::symlink("clang-14", temp.path().join("clang++")).unwrap();

        let candidates = scan(&[temp.path().to_path_buf()]);

        assert_eq!(basenames(&candidates), vec!["clang++", "clang-14"]);
    }

    #[test]
    fn same_directory_listed_twice_yields_one_set() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("gcc"));

        let dir = temp.path().to_path_buf();
        let candidates = scan(&[dir.clone(), dir]);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].search_index, 0);
    }

    #[test]
    fn parse_system_path_splits_entries() {
        let entries = parse_system_path();
        if let Some(path) = std::env::var_os("PATH") {
            assert_eq!(entries.len(), std::env::split_paths(&path).count());
        }
    }
}
