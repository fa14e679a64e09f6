//! Role/path table for one registered compiler.

use std::fmt;

use crate::compilers::{Role, RolePaths};

/// Renders every role of a toolchain with its path, `none` when empty.
///
/// ```text
///   cc   /usr/bin/gcc-9
///   cxx  /usr/bin/g++-9
///   f77  none
///   fc   none
/// ```
#[derive(Debug)]
pub struct RoleTable<'a> {
    paths: &'a RolePaths,
}

impl<'a> RoleTable<'a> {
    pub fn new(paths: &'a RolePaths) -> Self {
        Self { paths }
    }
}

impl fmt::Display for RoleTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = Role::ALL.iter().map(|r| r.as_str().len()).max().unwrap_or(0);
        for (i, role) in Role::ALL.into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match self.paths.get(role) {
                Some(path) => write!(f, "  {:width$}  {}", role.as_str(), path.display())?,
                None => write!(f, "  {:width$}  none", role.as_str())?,
            }
        }
        Ok(())
    }
}
