//! Toolchain identity: roles, spec strings, and assembled toolchains.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::family::Family;
use crate::error::ScoutError;

/// A language-facing binary a toolchain may provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// C compiler.
    Cc,
    /// C++ compiler.
    Cxx,
    /// Fortran 77 compiler.
    F77,
    /// Modern Fortran compiler.
    Fc,
}

impl Role {
    /// Every role, in canonical order. The first role present decides a
    /// toolchain's version.
    pub const ALL: [Role; 4] = [Role::Cc, Role::Cxx, Role::F77, Role::Fc];

    /// Key used in config files (`cc`, `cxx`, `f77`, `fc`).
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Cc => "cc",
            Role::Cxx => "cxx",
            Role::F77 => "f77",
            Role::Fc => "fc",
        }
    }

    /// Human-readable language name.
    pub fn language(self) -> &'static str {
        match self {
            Role::Cc => "C",
            Role::Cxx => "C++",
            Role::F77 => "Fortran 77",
            Role::Fc => "Fortran",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role → path mapping. Absent roles serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePaths {
    pub cc: Option<PathBuf>,
    pub cxx: Option<PathBuf>,
    pub f77: Option<PathBuf>,
    pub fc: Option<PathBuf>,
}

impl RolePaths {
    /// Path registered for `role`, if any.
    pub fn get(&self, role: Role) -> Option<&Path> {
        self.slot(role).as_deref()
    }

    /// Set the path for `role`.
    pub fn set(&mut self, role: Role, path: PathBuf) {
        *self.slot_mut(role) = Some(path);
    }

    /// True when no role has a path.
    pub fn is_empty(&self) -> bool {
        Role::ALL.iter().all(|r| self.get(*r).is_none())
    }

    /// Populated roles in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &Path)> + '_ {
        Role::ALL
            .into_iter()
            .filter_map(move |role| self.get(role).map(|p| (role, p)))
    }

    fn slot(&self, role: Role) -> &Option<PathBuf> {
        match role {
            Role::Cc => &self.cc,
            Role::Cxx => &self.cxx,
            Role::F77 => &self.f77,
            Role::Fc => &self.fc,
        }
    }

    fn slot_mut(&mut self, role: Role) -> &mut Option<PathBuf> {
        match role {
            Role::Cc => &mut self.cc,
            Role::Cxx => &mut self.cxx,
            Role::F77 => &mut self.f77,
            Role::Fc => &mut self.fc,
        }
    }
}

/// Canonical `vendor@version` identity, or a bare `vendor` selector.
///
/// As a selector, a version matches any record version it is a
/// dot-component prefix of: `gcc@4.5` matches `gcc@4.5.0` but not
/// `gcc@4.50`.
///
/// ```
/// use compiler_scout::compilers::CompilerSpec;
///
/// let installed: CompilerSpec = "gcc@4.5.3".parse().unwrap();
/// assert!(installed.satisfies(&"gcc".parse().unwrap()));
/// assert!(installed.satisfies(&"gcc@4.5".parse().unwrap()));
/// assert!(!installed.satisfies(&"clang@4.5.3".parse().unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompilerSpec {
    name: String,
    version: Option<String>,
}

impl CompilerSpec {
    /// Build a fully versioned spec.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
        }
    }

    /// Vendor name (e.g. `gcc`, `apple-clang`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version, absent for bare-name selectors.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Whether this spec matches `constraint` (used as a selector).
    pub fn satisfies(&self, constraint: &CompilerSpec) -> bool {
        if self.name != constraint.name {
            return false;
        }
        match (&self.version, &constraint.version) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(have), Some(want)) => {
                have == want
                    || have
                        .strip_prefix(want.as_str())
                        .is_some_and(|rest| rest.starts_with('.'))
            }
        }
    }
}

impl fmt::Display for CompilerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.name, version),
            None => f.write_str(&self.name),
        }
    }
}

impl FromStr for CompilerSpec {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = |message: &str| ScoutError::InvalidSpec {
            spec: s.to_string(),
            message: message.to_string(),
        };

        let (name, version) = match s.split_once('@') {
            Some((name, version)) => (name, Some(version)),
            None => (s, None),
        };

        if name.is_empty() {
            return Err(invalid("missing compiler name"));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'))
        {
            return Err(invalid("compiler name contains invalid characters"));
        }
        if let Some(version) = version {
            if version.is_empty() {
                return Err(invalid("missing version after '@'"));
            }
            if version.contains(|c: char| c.is_whitespace() || c == '@') {
                return Err(invalid("version contains invalid characters"));
            }
        }

        Ok(Self {
            name: name.to_string(),
            version: version.map(String::from),
        })
    }
}

impl TryFrom<String> for CompilerSpec {
    type Error = ScoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CompilerSpec> for String {
    fn from(spec: CompilerSpec) -> Self {
        spec.to_string()
    }
}

impl PartialOrd for CompilerSpec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CompilerSpec {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name).then_with(|| {
            match (&self.version, &other.version) {
                (Some(a), Some(b)) => compare_versions(a, b),
                (a, b) => a.cmp(b),
            }
        })
    }
}

/// Compare dotted versions component-wise, numerically where possible.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split(['.', '-']);
    let mut right = b.split(['.', '-']);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(l), Ok(r)) => l.cmp(&r),
                    _ => l.cmp(r),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// An assembled, installable toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// `vendor@version`, taken from the canonical role's probe.
    pub spec: CompilerSpec,
    /// Family whose name patterns matched the primary group.
    pub family: Family,
    /// Paths for each role this toolchain provides.
    pub paths: RolePaths,
    /// Suffix shared by the primary group (may be empty).
    pub suffix: String,
}
