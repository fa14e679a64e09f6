//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::compilers::CompilerSpec;
use crate::config::ScopeName;

/// Discover compiler toolchains and register them in layered config scopes.
#[derive(Debug, Parser)]
#[command(name = "compiler-scout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Keep every scope under this directory instead of the system locations
    #[arg(long, global = true, env = "COMPILER_SCOUT_CONFIG_ROOT", value_name = "DIR")]
    pub config_root: Option<PathBuf>,

    /// Seconds to wait for a compiler to report its version
    #[arg(
        long,
        global = true,
        env = "COMPILER_SCOUT_PROBE_TIMEOUT",
        default_value_t = 5,
        value_name = "SECS"
    )]
    pub probe_timeout: u64,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search for compilers and add new ones to a scope
    #[command(visible_alias = "add")]
    Find(FindArgs),

    /// Remove compilers from one or all scopes
    #[command(visible_alias = "rm")]
    Remove(RemoveArgs),

    /// List registered compilers
    List(ListArgs),

    /// Show details of registered compilers
    Info(InfoArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `find` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FindArgs {
    /// Scope to add compilers to [default: user]
    #[arg(long)]
    pub scope: Option<ScopeName>,

    /// Directories or executables to search (default: PATH)
    pub paths: Vec<PathBuf>,
}

/// Arguments for the `remove` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RemoveArgs {
    /// Remove every compiler
    #[arg(short, long, conflicts_with = "spec", required_unless_present = "spec")]
    pub all: bool,

    /// Compiler to remove (`gcc` or `gcc@4.5.3`)
    pub spec: Option<CompilerSpec>,

    /// Scope to remove from (default: every scope)
    #[arg(long)]
    pub scope: Option<ScopeName>,

    /// Exit with an error when nothing matches
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Scope to list (default: every scope)
    #[arg(long)]
    pub scope: Option<ScopeName>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InfoArgs {
    /// Compiler to show (`gcc` or `gcc@4.5.3`)
    pub spec: CompilerSpec,

    /// Scope to search (default: every scope)
    #[arg(long)]
    pub scope: Option<ScopeName>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_find_with_scope_and_paths() {
        let cli = Cli::parse_from(["compiler-scout", "find", "--scope=site", "/opt/bin"]);
        match cli.command {
            Commands::Find(args) => {
                assert_eq!(args.scope, Some(ScopeName::Site));
                assert_eq!(args.paths, vec![PathBuf::from("/opt/bin")]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn add_is_an_alias_of_find() {
        let cli = Cli::parse_from(["compiler-scout", "add", "/opt/bin"]);
        assert!(matches!(cli.command, Commands::Find(_)));
    }

    #[test]
    fn remove_requires_spec_or_all() {
        assert!(Cli::try_parse_from(["compiler-scout", "remove"]).is_err());
        assert!(Cli::try_parse_from(["compiler-scout", "rm", "--all", "gcc"]).is_err());

        let cli = Cli::parse_from(["compiler-scout", "rm", "gcc@4.5.3"]);
        match cli.command {
            Commands::Remove(args) => {
                assert!(!args.all);
                assert_eq!(args.spec.unwrap().to_string(), "gcc@4.5.3");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn unknown_scope_is_rejected() {
        let err = Cli::try_parse_from(["compiler-scout", "list", "--scope", "project"]).unwrap_err();
        assert!(err.to_string().contains("Unknown scope"));
    }

    #[test]
    fn invalid_spec_is_rejected() {
        assert!(Cli::try_parse_from(["compiler-scout", "info", "@1.0"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "compiler-scout",
            "list",
            "--config-root",
            "/tmp/scopes",
            "--probe-timeout",
            "2",
        ]);
        assert_eq!(cli.config_root, Some(PathBuf::from("/tmp/scopes")));
        assert_eq!(cli.probe_timeout, 2);
    }
}
