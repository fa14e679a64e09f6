//! compiler-scout - compiler discovery and toolchain registration.
//!
//! Finds C, C++ and Fortran compilers on a search path, asks each one for
//! its version, assembles them into `vendor@version` toolchains and merges
//! those into layered YAML configuration scopes.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`compilers`] - Scanning, version probing and toolchain assembly
//! - [`config`] - Scopes, record format, merge/remove and atomic persistence
//! - [`error`] - Error types and result aliases
//! - [`platform`] - Host operating system and target detection
//! - [`shell`] - Bounded-time subprocess execution
//! - [`ui`] - Terminal output, spinners and tables
//!
//! # Example
//!
//! ```
//! use compiler_scout::compilers::{discover, DiscoveryOptions};
//! use tempfile::TempDir;
//!
//! // An empty directory holds no compilers; that is not an error.
//! let temp = TempDir::new().unwrap();
//! let found = discover(&[temp.path().to_path_buf()], &DiscoveryOptions::default());
//! assert!(found.is_empty());
//! ```
//!
//! For discovery against real executables, see the integration tests.

pub mod cli;
pub mod compilers;
pub mod config;
pub mod error;
pub mod platform;
pub mod shell;
pub mod ui;

pub use error::{Result, ScoutError};
