//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Every command gets its scopes and
//! discovery options from the dispatcher, never from global state.

pub mod completions;
pub mod dispatcher;
pub mod find;
pub mod info;
pub mod list;
pub mod remove;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
