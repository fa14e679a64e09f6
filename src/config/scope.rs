//! Configuration scopes.
//!
//! Scopes are layered `system < site < user`; a record in a higher scope
//! shadows an identical one below it. Scopes are passed around explicitly,
//! there is no process-wide configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ScoutError;

use super::schema::CompilerRecord;

/// File holding a scope's compiler records.
pub const COMPILERS_FILE: &str = "compilers.yaml";

/// A named configuration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeName {
    System,
    Site,
    User,
}

impl ScopeName {
    /// All scopes, lowest precedence first.
    pub const ALL: [ScopeName; 3] = [ScopeName::System, ScopeName::Site, ScopeName::User];

    /// Scope written to when none is given.
    pub const DEFAULT_WRITE: ScopeName = ScopeName::User;

    pub fn as_str(self) -> &'static str {
        match self {
            ScopeName::System => "system",
            ScopeName::Site => "site",
            ScopeName::User => "user",
        }
    }
}

impl fmt::Display for ScopeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeName {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "system" => Ok(ScopeName::System),
            "site" => Ok(ScopeName::Site),
            "user" => Ok(ScopeName::User),
            _ => Err(ScoutError::UnknownScope {
                name: s.to_string(),
            }),
        }
    }
}

/// One scope's records, held in memory between load and save.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigScope {
    pub name: ScopeName,
    /// Records in file order.
    pub records: Vec<CompilerRecord>,
}

impl ConfigScope {
    pub fn new(name: ScopeName) -> Self {
        Self {
            name,
            records: Vec::new(),
        }
    }

    pub fn with_records(name: ScopeName, records: Vec<CompilerRecord>) -> Self {
        Self { name, records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Where each scope lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeLayout {
    system: PathBuf,
    site: PathBuf,
    user: PathBuf,
}

impl Default for ScopeLayout {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_default();
        Self {
            system: PathBuf::from("/etc/compiler-scout"),
            site: PathBuf::from("/usr/local/etc/compiler-scout"),
            user: home.join(".compiler-scout"),
        }
    }
}

impl ScopeLayout {
    /// Every scope under `root/<scope>/`.
    pub fn rooted(root: &Path) -> Self {
        Self {
            system: root.join(ScopeName::System.as_str()),
            site: root.join(ScopeName::Site.as_str()),
            user: root.join(ScopeName::User.as_str()),
        }
    }

    /// Directory of `scope`.
    pub fn dir(&self, scope: ScopeName) -> &Path {
        match scope {
            ScopeName::System => &self.system,
            ScopeName::Site => &self.site,
            ScopeName::User => &self.user,
        }
    }

    /// Path of `scope`'s `compilers.yaml`.
    pub fn compilers_file(&self, scope: ScopeName) -> PathBuf {
        self.dir(scope).join(COMPILERS_FILE)
    }
}
