//! Persisted compiler record format.
//!
//! Each scope stores one `compilers.yaml`:
//!
//! ```yaml
//! compilers:
//! - compiler:
//!     spec: apple-clang@11.0.0
//!     paths:
//!       cc: /usr/bin/clang
//!       cxx: /usr/bin/clang++
//!       f77: /usr/local/bin/gfortran-8
//!       fc: /usr/local/bin/gfortran-8
//!     operating_system: macos
//!     target: x86_64
//!     modules: []
//! ```
//!
//! Keys this crate does not know about (`flags`, `environment`, ...) are kept
//! as-is when the file is rewritten.

use serde::{Deserialize, Serialize};

use crate::compilers::{CompilerSpec, RolePaths, Toolchain};
use crate::platform::Platform;

/// Top-level content of `compilers.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilersFile {
    #[serde(default)]
    pub compilers: Vec<CompilerEntry>,
}

/// One list item; the record sits under a `compiler:` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerEntry {
    pub compiler: CompilerRecord,
}

/// A registered toolchain plus the platform it was found on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerRecord {
    pub spec: CompilerSpec,

    pub paths: RolePaths,

    pub operating_system: String,

    pub target: String,

    /// Environment modules to load before use.
    #[serde(default)]
    pub modules: Vec<String>,

    /// Unrecognized keys, preserved on rewrite.
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

impl CompilerRecord {
    /// Record a discovered toolchain for `platform`.
    pub fn from_toolchain(toolchain: &Toolchain, platform: &Platform) -> Self {
        Self {
            spec: toolchain.spec.clone(),
            paths: toolchain.paths.clone(),
            operating_system: platform.operating_system.clone(),
            target: platform.target.clone(),
            modules: Vec::new(),
            extra: serde_yaml::Mapping::new(),
        }
    }

    /// Deduplication key: `(spec, operating_system, target)`.
    pub fn key(&self) -> (&CompilerSpec, &str, &str) {
        (&self.spec, &self.operating_system, &self.target)
    }

    pub fn platform(&self) -> Platform {
        Platform::new(&self.operating_system, &self.target)
    }
}

impl From<CompilerRecord> for CompilerEntry {
    fn from(compiler: CompilerRecord) -> Self {
        Self { compiler }
    }
}

impl CompilersFile {
    pub fn records(self) -> Vec<CompilerRecord> {
        self.compilers.into_iter().map(|e| e.compiler).collect()
    }

    pub fn from_records(records: &[CompilerRecord]) -> Self {
        Self {
            compilers: records.iter().cloned().map(CompilerEntry::from).collect(),
        }
    }
}
