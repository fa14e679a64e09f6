//! Compiler family definitions.
//!
//! Each family is one immutable [`FamilyDef`] row: the executable names it
//! recognizes per role, the argument that makes its compilers report a
//! version, and the vendor regexes that turn that report into a
//! `vendor@version` identity. The scanner and the matcher only ever consult
//! this table; there is no per-vendor code path.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use super::toolchain::Role;

/// A compiler vendor lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    Gnu,
    Clang,
    Intel,
}

impl Family {
    /// Lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Family::Gnu => "gnu",
            Family::Clang => "clang",
            Family::Intel => "intel",
        }
    }

    /// Table row for this family.
    pub fn def(self) -> &'static FamilyDef {
        match self {
            Family::Gnu => &FAMILY_DEFS[0],
            Family::Clang => &FAMILY_DEFS[1],
            Family::Intel => &FAMILY_DEFS[2],
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An executable base name and the roles it can fill.
#[derive(Debug)]
pub struct NamePattern {
    pub name: &'static str,
    pub roles: &'static [Role],
}

/// Maps version output to a normalized vendor name.
pub struct VendorRule {
    /// Normalized vendor (`apple-clang`, not "Apple clang").
    pub vendor: &'static str,
    /// First capture group is the version.
    regex: &'static LazyLock<Regex>,
}

impl VendorRule {
    /// Extract this vendor's version from probe output.
    pub fn version_in(&self, output: &str) -> Option<String> {
        self.regex
            .captures(output)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

impl fmt::Debug for VendorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VendorRule")
            .field("vendor", &self.vendor)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

/// One family's detection strategy.
#[derive(Debug)]
pub struct FamilyDef {
    pub family: Family,
    /// Recognized base names. Suffixed variants are `<name>-<suffix>`.
    pub names: &'static [NamePattern],
    /// Argument that prints the version.
    pub version_arg: &'static str,
    /// Argument that prints the full version when `version_arg` only
    /// reports a major number.
    pub full_version_arg: Option<&'static str>,
    /// Vendor rules, most specific first.
    pub vendors: &'static [VendorRule],
    /// Suffixes that name companion tools rather than compilers.
    pub ignored_suffixes: &'static [&'static str],
}

impl FamilyDef {
    /// Identify vendor and version from probe output.
    pub fn identify(&self, output: &str) -> Option<(&'static str, String)> {
        self.vendors
            .iter()
            .find_map(|rule| rule.version_in(output).map(|v| (rule.vendor, v)))
    }

    /// Whether `version` is a bare major number that `full_version_arg`
    /// can refine. GCC 7 and later print only the major from `-dumpversion`.
    pub fn wants_full_version(&self, version: &str) -> Option<&'static str> {
        let arg = self.full_version_arg?;
        let major: u32 = version.parse().ok()?;
        (major >= 7).then_some(arg)
    }

    /// Roles the given base name fills in this family.
    pub fn roles_for(&self, name: &str) -> Option<&'static [Role]> {
        self.names.iter().find(|p| p.name == name).map(|p| p.roles)
    }
}

macro_rules! lazy_regex {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($pattern).unwrap());
    };
}

lazy_regex!(RE_GNU_DUMPVERSION, r"(?m)^\s*(\d\S*)\s*$");
lazy_regex!(RE_APPLE_CLANG, r"(?m)^Apple (?:LLVM|clang) version (\d[^\s)]*)");
lazy_regex!(RE_CLANG, r"(?m)(?:^|\s)(?:clang|LLVM) version (\d[^\s)]*)");
lazy_regex!(RE_INTEL, r"\((?:IFORT|ICC)\) (\d[^\s]*)");

const FORTRAN: &[Role] = &[Role::F77, Role::Fc];

/// Every known family.
pub static FAMILY_DEFS: &[FamilyDef] = &[
    FamilyDef {
        family: Family::Gnu,
        names: &[
            NamePattern {
                name: "gcc",
                roles: &[Role::Cc],
            },
            NamePattern {
                name: "g++",
                roles: &[Role::Cxx],
            },
            NamePattern {
                name: "gfortran",
                roles: FORTRAN,
            },
        ],
        version_arg: "-dumpversion",
        full_version_arg: Some("-dumpfullversion"),
        vendors: &[VendorRule {
            vendor: "gcc",
            regex: &RE_GNU_DUMPVERSION,
        }],
        ignored_suffixes: &["ar", "nm", "ranlib"],
    },
    FamilyDef {
        family: Family::Clang,
        names: &[
            NamePattern {
                name: "clang",
                roles: &[Role::Cc],
            },
            NamePattern {
                name: "clang++",
                roles: &[Role::Cxx],
            },
            NamePattern {
                name: "flang",
                roles: FORTRAN,
            },
            // Clang has no Fortran front end of its own on most hosts.
            NamePattern {
                name: "gfortran",
                roles: FORTRAN,
            },
        ],
        version_arg: "--version",
        full_version_arg: None,
        vendors: &[
            VendorRule {
                vendor: "apple-clang",
                regex: &RE_APPLE_CLANG,
            },
            VendorRule {
                vendor: "clang",
                regex: &RE_CLANG,
            },
        ],
        ignored_suffixes: &[
            "check", "cl", "cpp", "doc", "format", "import", "linker", "offload", "query",
            "refactor", "rename", "repl", "tblgen", "tidy",
        ],
    },
    FamilyDef {
        family: Family::Intel,
        names: &[
            NamePattern {
                name: "icc",
                roles: &[Role::Cc],
            },
            NamePattern {
                name: "icpc",
                roles: &[Role::Cxx],
            },
            NamePattern {
                name: "ifort",
                roles: FORTRAN,
            },
        ],
        version_arg: "--version",
        full_version_arg: None,
        vendors: &[VendorRule {
            vendor: "intel",
            regex: &RE_INTEL,
        }],
        ignored_suffixes: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    const APPLE_CLANG_OUTPUT: &str = "Apple clang version 11.0.0 (clang-1100.0.33.16)\n\
        Target: x86_64-apple-darwin18.7.0\n\
        Thread model: posix\n\
        InstalledDir: /dummy\n";

    const UBUNTU_CLANG_OUTPUT: &str = "Ubuntu clang version 14.0.0-1ubuntu1.1\n\
        Target: x86_64-pc-linux-gnu\n";

    const GNU_FORTRAN_OUTPUT: &str = "GNU Fortran (GCC) 8.4.0 20120313 (Red Hat 8.4.0-1)\n\
        Copyright (C) 2010 Free Software Foundation, Inc.\n";

    #[test]
    fn every_family_has_a_row() {
        for family in [Family::Gnu, Family::Clang, Family::Intel] {
            assert_eq!(family.def().family, family);
        }
    }

    #[test]
    fn every_regex_compiles() {
        for def in FAMILY_DEFS {
            for rule in def.vendors {
                // Forces the LazyLock; a bad pattern panics here.
                assert!(!rule.regex.as_str().is_empty());
            }
        }
    }

    #[test]
    fn apple_clang_is_normalized() {
        let id = Family::Clang.def().identify(APPLE_CLANG_OUTPUT);
        assert_eq!(id, Some(("apple-clang", "11.0.0".to_string())));
    }

    #[test]
    fn distribution_clang_is_plain_clang() {
        let id = Family::Clang.def().identify(UBUNTU_CLANG_OUTPUT);
        assert_eq!(id, Some(("clang", "14.0.0-1ubuntu1.1".to_string())));
    }

    #[test]
    fn clang_rules_reject_gnu_fortran_output() {
        assert!(Family::Clang.def().identify(GNU_FORTRAN_OUTPUT).is_none());
    }

    #[test]
    fn clang_rules_reject_companion_tools() {
        let output = "Ubuntu clang-format version 14.0.0-1ubuntu1\n";
        assert!(Family::Clang.def().identify(output).is_none());
    }

    #[test]
    fn gnu_reads_dumpversion() {
        let def = Family::Gnu.def();
        assert_eq!(def.identify("4.5.3\n"), Some(("gcc", "4.5.3".to_string())));
        assert_eq!(def.identify("0.0.0\n"), Some(("gcc", "0.0.0".to_string())));
    }

    #[test]
    fn gnu_keeps_version_qualifiers() {
        let def = Family::Gnu.def();
        for version in ["8.3.0-rc1", "4.5.3a", "10.2.1-custom"] {
            let output = format!("{}\n", version);
            assert_eq!(def.identify(&output), Some(("gcc", version.to_string())));
        }
        assert_eq!(def.wants_full_version("8.3.0-rc1"), None);
    }

    #[test]
    fn gnu_rejects_error_text() {
        let output = "gfortran-8: fatal error: no input files\ncompilation terminated.\n";
        assert!(Family::Gnu.def().identify(output).is_none());
    }

    #[test]
    fn gnu_asks_for_full_version_of_bare_major() {
        let def = Family::Gnu.def();
        assert_eq!(def.wants_full_version("9"), Some("-dumpfullversion"));
        assert_eq!(def.wants_full_version("6"), None);
        assert_eq!(def.wants_full_version("9.3.0"), None);
        assert_eq!(Family::Clang.def().wants_full_version("14"), None);
    }

    #[test]
    fn intel_reads_product_version() {
        let output = "icc (ICC) 19.1.0.166 20191121\nCopyright (C) 1985-2019 Intel Corporation.\n";
        let id = Family::Intel.def().identify(output);
        assert_eq!(id, Some(("intel", "19.1.0.166".to_string())));
    }

    #[test]
    fn gfortran_fills_both_fortran_roles() {
        let roles = Family::Gnu.def().roles_for("gfortran").unwrap();
        assert_eq!(roles, &[Role::F77, Role::Fc]);
        assert!(Family::Clang.def().roles_for("gfortran").is_some());
        assert!(Family::Intel.def().roles_for("gfortran").is_none());
    }
}
