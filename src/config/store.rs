//! On-disk scope storage.
//!
//! Every change is a locked read-modify-write: an exclusive advisory lock
//! on `compilers.yaml.lock` is held while the scope is loaded, changed and
//! saved. Saving writes `compilers.yaml.tmp` and renames it over the real
//! file, so readers never see a half-written scope even without the lock.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, info};

use crate::compilers::{CompilerSpec, Toolchain};
use crate::error::{Result, ScoutError};
use crate::platform::Platform;

use super::merger::{self, merge_toolchains, RemoveOutcome, RemoveSelector};
use super::schema::{CompilerRecord, CompilersFile};
use super::scope::{ConfigScope, ScopeLayout, ScopeName};

/// Reads and writes scopes laid out by a [`ScopeLayout`].
#[derive(Debug, Clone, Default)]
pub struct ScopeStore {
    layout: ScopeLayout,
}

impl ScopeStore {
    pub fn new(layout: ScopeLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ScopeLayout {
        &self.layout
    }

    /// Load a scope. A missing or empty file is an empty scope.
    pub fn load(&self, name: ScopeName) -> Result<ConfigScope> {
        let path = self.layout.compilers_file(name);
        if !path.exists() {
            return Ok(ConfigScope::new(name));
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(ConfigScope::new(name));
        }

        let file: CompilersFile =
            serde_yaml::from_str(&content).map_err(|e| ScoutError::ConfigParseError {
                path: path.clone(),
                message: e.to_string(),
            })?;

        Ok(ConfigScope::with_records(name, file.records()))
    }

    /// Atomically replace the scope's file with `scope`.
    ///
    /// On failure the temp file is removed and the previous file is left
    /// untouched.
    pub fn save(&self, scope: &ConfigScope) -> Result<()> {
        let path = self.layout.compilers_file(scope.name);
        let write_failure = |message: String| ScoutError::ConfigWriteFailure {
            path: path.clone(),
            message,
        };

        fs::create_dir_all(self.layout.dir(scope.name)).map_err(|e| write_failure(e.to_string()))?;

        let content = serde_yaml::to_string(&CompilersFile::from_records(&scope.records))
            .map_err(|e| write_failure(format!("Failed to serialize compilers: {}", e)))?;

        let temp_path = temp_file(&self.layout, scope.name);
        if let Err(e) = write_synced(&temp_path, &content).and_then(|_| fs::rename(&temp_path, &path))
        {
            let _ = fs::remove_file(&temp_path);
            return Err(write_failure(e.to_string()));
        }

        info!(
            "Wrote {} compiler(s) to {}",
            scope.records.len(),
            path.display()
        );
        Ok(())
    }

    /// Lock, load, apply `update_fn`, and save if the records changed.
    pub fn update<T, F>(&self, name: ScopeName, update_fn: F) -> Result<T>
    where
        F: FnOnce(&mut ConfigScope) -> T,
    {
        let _lock = self.lock(name)?;

        let mut scope = self.load(name)?;
        let before = scope.records.clone();
        let result = update_fn(&mut scope);

        if scope.records != before {
            self.save(&scope)?;
        } else {
            debug!("{} scope unchanged, not rewriting", name);
        }
        Ok(result)
    }

    /// Merge `toolchains` into `scope`. Returns the specs that were added.
    pub fn add_toolchains(
        &self,
        scope: ScopeName,
        toolchains: &[Toolchain],
        platform: &Platform,
    ) -> Result<Vec<CompilerSpec>> {
        self.update(scope, |config| merge_toolchains(config, toolchains, platform))
    }

    /// Remove matching records from `scope`, or from every scope that has a
    /// compilers file when `scope` is `None`.
    pub fn remove(
        &self,
        scope: Option<ScopeName>,
        selector: &RemoveSelector,
    ) -> Result<RemoveOutcome> {
        let mut outcome = RemoveOutcome::default();
        for name in Self::selected(scope) {
            if scope.is_none() && !self.layout.compilers_file(name).exists() {
                continue;
            }
            outcome.extend(self.update(name, |config| merger::remove(config, selector))?);
        }
        Ok(outcome)
    }

    /// Records of one scope, or of the layered view when `scope` is `None`.
    ///
    /// The layered view lists higher-precedence scopes first and hides
    /// records shadowed by an identical `(spec, operating_system, target)`
    /// above them.
    pub fn records(&self, scope: Option<ScopeName>) -> Result<Vec<(ScopeName, CompilerRecord)>> {
        let mut seen = HashSet::new();
        let mut records = Vec::new();

        for name in Self::selected(scope).into_iter().rev() {
            for record in self.load(name)?.records {
                let key = (
                    record.spec.clone(),
                    record.operating_system.clone(),
                    record.target.clone(),
                );
                if seen.insert(key) {
                    records.push((name, record));
                }
            }
        }
        Ok(records)
    }

    /// Every registered spec, without duplicates.
    pub fn all_compiler_specs(&self, scope: Option<ScopeName>) -> Result<Vec<CompilerSpec>> {
        let mut seen = HashSet::new();
        Ok(self
            .records(scope)?
            .into_iter()
            .map(|(_, record)| record.spec)
            .filter(|spec| seen.insert(spec.clone()))
            .collect())
    }

    /// Scopes in precedence order, lowest first.
    fn selected(scope: Option<ScopeName>) -> Vec<ScopeName> {
        match scope {
            Some(name) => vec![name],
            None => ScopeName::ALL.to_vec(),
        }
    }

    fn lock(&self, name: ScopeName) -> Result<File> {
        let lock_path = self.layout.compilers_file(name).with_extension("yaml.lock");
        let lock_failed = |e: std::io::Error| ScoutError::ConfigLockFailed {
            path: lock_path.clone(),
            message: e.to_string(),
        };

        fs::create_dir_all(self.layout.dir(name)).map_err(&lock_failed)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(&lock_failed)?;
        file.lock_exclusive().map_err(&lock_failed)?;

        debug!("Locked {}", lock_path.display());
        Ok(file)
    }
}

fn write_synced(path: &Path, content: &str) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()
}

/// Path of the temporary file used while saving `scope`.
pub fn temp_file(layout: &ScopeLayout, scope: ScopeName) -> PathBuf {
    layout.compilers_file(scope).with_extension("yaml.tmp")
}
