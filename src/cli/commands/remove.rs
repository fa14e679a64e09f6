//! The `remove` (alias `rm`) command.

use crate::cli::args::RemoveArgs;
use crate::config::{RemoveSelector, ScopeStore};
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Removes compilers by spec, or all of them.
pub struct RemoveCommand {
    store: ScopeStore,
    args: RemoveArgs,
}

impl RemoveCommand {
    pub fn new(store: ScopeStore, args: RemoveArgs) -> Self {
        Self { store, args }
    }

    fn selector(&self) -> Option<RemoveSelector> {
        if self.args.all {
            Some(RemoveSelector::All)
        } else {
            self.args.spec.clone().map(RemoveSelector::Spec)
        }
    }
}

impl Command for RemoveCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(selector) = self.selector() else {
            ui.error("Specify a compiler spec or --all");
            return Ok(CommandResult::failure(2));
        };

        let outcome = self.store.remove(self.args.scope, &selector)?;

        if outcome.is_empty() {
            let location = match self.args.scope {
                Some(scope) => format!(" in {} scope", scope),
                None => String::new(),
            };
            ui.warning(&format!("No compilers match {}{}", selector, location));
            return Ok(if self.args.strict {
                CommandResult::failure(1)
            } else {
                CommandResult::success()
            });
        }

        let noun = if outcome.removed.len() == 1 {
            "compiler"
        } else {
            "compilers"
        };
        ui.success(&format!("Removed {} {}", outcome.removed.len(), noun));
        for record in &outcome.removed {
            ui.message(&format!("    {}", record.spec));
        }

        Ok(CommandResult::success())
    }
}
