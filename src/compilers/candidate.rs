//! Executable name classification.

use std::path::PathBuf;

use super::family::{Family, FamilyDef, FAMILY_DEFS};
use super::toolchain::Role;

/// Family, roles and suffix derived from an executable's base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub family: Family,
    /// The recognized base name (`clang++` for `clang++-gpu`).
    pub name: &'static str,
    pub roles: &'static [Role],
    /// Token after the base name's `-`, empty when there is none.
    pub suffix: String,
}

impl ParsedName {
    /// Whether this name can fill `role`.
    pub fn fills(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// One executable found on the search path, classified under one family.
///
/// A file recognized by several families (e.g. `gfortran-8`, which is both a
/// GNU compiler and a Fortran companion for Clang) yields one candidate per
/// family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerCandidate {
    /// Path as found, not resolved through symlinks.
    pub path: PathBuf,
    pub basename: String,
    pub parsed: ParsedName,
    /// Position of the originating directory in the search list.
    pub search_index: usize,
}

/// Classify `basename` against every family.
///
/// ```
/// use compiler_scout::compilers::{classify, Family, Role};
///
/// let parsed = classify("clang++-gpu");
/// assert_eq!(parsed.len(), 1);
/// assert_eq!(parsed[0].family, Family::Clang);
/// assert!(parsed[0].fills(Role::Cxx));
/// assert_eq!(parsed[0].suffix, "gpu");
///
/// assert!(classify("ls").is_empty());
/// ```
pub fn classify(basename: &str) -> Vec<ParsedName> {
    let name = strip_exe_suffix(basename);
    FAMILY_DEFS
        .iter()
        .filter_map(|def| classify_in(def, name))
        .collect()
}

fn classify_in(def: &FamilyDef, basename: &str) -> Option<ParsedName> {
    // Longest names first, so `clang++-gpu` is never read as `clang` + `++-gpu`.
    let mut patterns: Vec<_> = def.names.iter().collect();
    patterns.sort_by_key(|p| std::cmp::Reverse(p.name.len()));

    patterns.into_iter().find_map(|pattern| {
        let rest = basename.strip_prefix(pattern.name)?;
        let suffix = if rest.is_empty() {
            ""
        } else {
            let token = rest.strip_prefix('-')?;
            if !is_valid_suffix(token) || def.ignored_suffixes.contains(&token) {
                return None;
            }
            token
        };
        Some(ParsedName {
            family: def.family,
            name: pattern.name,
            roles: pattern.roles,
            suffix: suffix.to_string(),
        })
    })
}

/// A single non-empty token: no further `-`, no path or shell characters.
fn is_valid_suffix(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+'))
}

fn strip_exe_suffix(basename: &str) -> &str {
    let exe = std::env::consts::EXE_SUFFIX;
    if exe.is_empty() {
        basename
    } else {
        basename.strip_suffix(exe).unwrap_or(basename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(basename: &str) -> ParsedName {
        let mut parsed = classify(basename);
        assert_eq!(parsed.len(), 1, "expected one family for {}", basename);
        parsed.remove(0)
    }

    #[test]
    fn exact_names_have_empty_suffix() {
        let gcc = only("gcc");
        assert_eq!(gcc.family, Family::Gnu);
        assert!(gcc.fills(Role::Cc));
        assert_eq!(gcc.suffix, "");

        let clangxx = only("clang++");
        assert_eq!(clangxx.family, Family::Clang);
        assert!(clangxx.fills(Role::Cxx));
    }

    #[test]
    fn numeric_suffix_is_split_off() {
        let gxx = only("g++-8");
        assert_eq!(gxx.name, "g++");
        assert_eq!(gxx.suffix, "8");
    }

    #[test]
    fn flavor_suffix_is_split_off() {
        let clang = only("clang-gpu");
        assert_eq!(clang.name, "clang");
        assert!(clang.fills(Role::Cc));
        assert_eq!(clang.suffix, "gpu");
    }

    #[test]
    fn gfortran_is_claimed_by_gnu_and_clang() {
        let parsed = classify("gfortran-8");
        let families: Vec<Family> = parsed.iter().map(|p| p.family).collect();
        assert_eq!(families, vec![Family::Gnu, Family::Clang]);
        for p in &parsed {
            assert!(p.fills(Role::F77));
            assert!(p.fills(Role::Fc));
            assert_eq!(p.suffix, "8");
        }
    }

    #[test]
    fn companion_tools_are_not_compilers() {
        assert!(classify("gcc-ar").is_empty());
        assert!(classify("gcc-ranlib").is_empty());
        assert!(classify("clang-format").is_empty());
        assert!(classify("clang-tidy").is_empty());
    }

    #[test]
    fn multi_token_suffixes_are_rejected() {
        assert!(classify("clang-scan-deps").is_empty());
        assert!(classify("gcc-11-custom").is_empty());
    }

    #[test]
    fn names_without_separator_are_rejected() {
        assert!(classify("gcc8").is_empty());
        assert!(classify("clangd").is_empty());
        assert!(classify("gcc-").is_empty());
    }

    #[test]
    fn unrelated_names_are_dropped() {
        assert!(classify("python3").is_empty());
        assert!(classify("cc").is_empty());
    }

    #[test]
    fn dotted_suffix_is_accepted() {
        assert_eq!(only("gcc-4.9").suffix, "4.9");
    }
}
