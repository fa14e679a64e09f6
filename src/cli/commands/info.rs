//! The `info` command.

use crate::cli::args::InfoArgs;
use crate::config::ScopeStore;
use crate::error::Result;
use crate::ui::{RoleTable, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Shows paths and platform of matching compilers.
pub struct InfoCommand {
    store: ScopeStore,
    args: InfoArgs,
}

impl InfoCommand {
    pub fn new(store: ScopeStore, args: InfoArgs) -> Self {
        Self { store, args }
    }
}

impl Command for InfoCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let matches: Vec<_> = self
            .store
            .records(self.args.scope)?
            .into_iter()
            .filter(|(_, record)| record.spec.satisfies(&self.args.spec))
            .collect();

        if matches.is_empty() {
            ui.error(&format!("No compilers match {}", self.args.spec));
            return Ok(CommandResult::failure(1));
        }

        for (scope, record) in &matches {
            ui.show_header(&record.spec.to_string());
            ui.message(&RoleTable::new(&record.paths).to_string());
            ui.message(&format!("  scope: {}", scope));
            ui.message(&format!("  operating system: {}", record.operating_system));
            ui.message(&format!("  target: {}", record.target));
            if !record.modules.is_empty() {
                ui.message(&format!("  modules: {}", record.modules.join(", ")));
            }
        }

        Ok(CommandResult::success())
    }
}
