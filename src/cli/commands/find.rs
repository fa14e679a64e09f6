//! The `find` (alias `add`) command.

use crate::cli::args::FindArgs;
use crate::compilers::{discover, parse_system_path, DiscoveryOptions, Toolchain};
use crate::config::{ScopeName, ScopeStore};
use crate::error::Result;
use crate::platform::Platform;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Discovers toolchains and merges them into a scope.
pub struct FindCommand {
    store: ScopeStore,
    discovery: DiscoveryOptions,
    platform: Platform,
    args: FindArgs,
}

impl FindCommand {
    pub fn new(
        store: ScopeStore,
        discovery: DiscoveryOptions,
        platform: Platform,
        args: FindArgs,
    ) -> Self {
        Self {
            store,
            discovery,
            platform,
            args,
        }
    }

    fn scope(&self) -> ScopeName {
        self.args.scope.unwrap_or(ScopeName::DEFAULT_WRITE)
    }
}

impl Command for FindCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let paths = if self.args.paths.is_empty() {
            parse_system_path()
        } else {
            self.args.paths.clone()
        };

        let mut search = ui.start_search(paths.len());
        let toolchains = discover(&paths, &self.discovery);
        search.finish(toolchains.len());

        if toolchains.is_empty() {
            ui.warning(&format!(
                "No compilers found in {} search path(s)",
                paths.len()
            ));
        } else if ui.output_mode().shows_detail() {
            for toolchain in &toolchains {
                ui.message(&describe(toolchain));
            }
        }

        let scope = self.scope();
        let added = self
            .store
            .add_toolchains(scope, &toolchains, &self.platform)?;

        if added.is_empty() {
            ui.message("Found no new compilers");
        } else {
            let noun = if added.len() == 1 { "compiler" } else { "compilers" };
            ui.success(&format!(
                "Added {} new {} to {}",
                added.len(),
                noun,
                self.store.layout().compilers_file(scope).display()
            ));
            for spec in &added {
                ui.message(&format!("    {}", spec));
            }
        }

        Ok(CommandResult::success())
    }
}

/// One line per toolchain: spec and the roles it fills.
fn describe(toolchain: &Toolchain) -> String {
    let roles: Vec<String> = toolchain
        .paths
        .iter()
        .map(|(role, path)| format!("{}={}", role, path.display()))
        .collect();
    format!("  {} {}", toolchain.spec, roles.join(" "))
}
