//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{Cli, Commands};
use crate::compilers::DiscoveryOptions;
use crate::config::ScopeStore;
use crate::error::Result;
use crate::platform::Platform;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    store: ScopeStore,
    discovery: DiscoveryOptions,
    platform: Platform,
}

impl CommandDispatcher {
    /// Create a dispatcher over the given scopes.
    pub fn new(store: ScopeStore, discovery: DiscoveryOptions, platform: Platform) -> Self {
        Self {
            store,
            discovery,
            platform,
        }
    }

    pub fn store(&self) -> &ScopeStore {
        &self.store
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Find(args) => {
                let cmd = super::find::FindCommand::new(
                    self.store.clone(),
                    self.discovery.clone(),
                    self.platform.clone(),
                    args.clone(),
                );
                cmd.execute(ui)
            }
            Commands::Remove(args) => {
                let cmd = super::remove::RemoveCommand::new(self.store.clone(), args.clone());
                cmd.execute(ui)
            }
            Commands::List(args) => {
                let cmd = super::list::ListCommand::new(self.store.clone(), args.clone());
                cmd.execute(ui)
            }
            Commands::Info(args) => {
                let cmd = super::info::InfoCommand::new(self.store.clone(), args.clone());
                cmd.execute(ui)
            }
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
        }
    }
}
