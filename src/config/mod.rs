//! Layered compiler configuration.
//!
//! - Record format in [`schema`]
//! - Scope names and on-disk locations in [`scope`]
//! - Pure merge and remove in [`merger`]
//! - Locked, atomic persistence and layered queries in [`store`]
//!
//! # Example
//!
//! ```
//! use compiler_scout::compilers::{CompilerSpec, Family, RolePaths, Toolchain};
//! use compiler_scout::config::{ScopeLayout, ScopeName, ScopeStore};
//! use compiler_scout::platform::Platform;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let store = ScopeStore::new(ScopeLayout::rooted(temp.path()));
//!
//! let gcc = Toolchain {
//!     spec: CompilerSpec::new("gcc", "4.5.3"),
//!     family: Family::Gnu,
//!     paths: RolePaths { cc: Some("/usr/bin/gcc".into()), ..Default::default() },
//!     suffix: String::new(),
//! };
//! let platform = Platform::new("linux", "x86_64");
//! store.add_toolchains(ScopeName::Site, &[gcc], &platform).unwrap();
//!
//! let specs = store.all_compiler_specs(Some(ScopeName::Site)).unwrap();
//! assert_eq!(specs, vec![CompilerSpec::new("gcc", "4.5.3")]);
//! ```
//!
//! # Scope Locations
//!
//! Lowest precedence first:
//! 1. `system`: `/etc/compiler-scout`
//! 2. `site`: `/usr/local/etc/compiler-scout`
//! 3. `user`: `~/.compiler-scout`

pub mod merger;
pub mod schema;
pub mod scope;
pub mod store;

pub use merger::{merge_toolchains, remove, RemoveOutcome, RemoveSelector};
pub use schema::{CompilerEntry, CompilerRecord, CompilersFile};
pub use scope::{ConfigScope, ScopeLayout, ScopeName, COMPILERS_FILE};
pub use store::ScopeStore;
