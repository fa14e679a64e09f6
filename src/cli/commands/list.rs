//! The `list` command.

use std::collections::BTreeMap;

use anyhow::Context;
use serde::Serialize;

use crate::cli::args::ListArgs;
use crate::compilers::{CompilerSpec, RolePaths};
use crate::config::{CompilerRecord, ScopeName, ScopeStore};
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Lists registered compilers, grouped by vendor.
pub struct ListCommand {
    store: ScopeStore,
    args: ListArgs,
}

/// JSON shape of one listed record.
#[derive(Debug, Serialize)]
struct ListedCompiler<'a> {
    spec: String,
    scope: &'static str,
    operating_system: &'a str,
    target: &'a str,
    paths: &'a RolePaths,
}

impl ListCommand {
    pub fn new(store: ScopeStore, args: ListArgs) -> Self {
        Self { store, args }
    }

    fn render_json(&self, records: &[(ScopeName, CompilerRecord)]) -> anyhow::Result<String> {
        let listed: Vec<ListedCompiler> = records
            .iter()
            .map(|(scope, record)| ListedCompiler {
                spec: record.spec.to_string(),
                scope: scope.as_str(),
                operating_system: &record.operating_system,
                target: &record.target,
                paths: &record.paths,
            })
            .collect();
        serde_json::to_string_pretty(&listed)
            .context("Failed to render compiler list as JSON")
    }
}

/// Specs grouped by vendor name, newest version first.
fn group_by_vendor(records: &[(ScopeName, CompilerRecord)]) -> BTreeMap<&str, Vec<&CompilerSpec>> {
    let mut groups: BTreeMap<&str, Vec<&CompilerSpec>> = BTreeMap::new();
    for (_, record) in records {
        let specs = groups.entry(record.spec.name()).or_default();
        if !specs.contains(&&record.spec) {
            specs.push(&record.spec);
        }
    }
    for specs in groups.values_mut() {
        specs.sort_by(|a, b| b.cmp(a));
    }
    groups
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let records = self.store.records(self.args.scope)?;

        if self.args.json {
            ui.message(&self.render_json(&records)?);
            return Ok(CommandResult::success());
        }

        if records.is_empty() {
            ui.message("No compilers registered");
            return Ok(CommandResult::success());
        }

        let count = records.len();
        let noun = if count == 1 { "compiler" } else { "compilers" };
        ui.message(&format!("{} {} available", count, noun));
        for (vendor, specs) in group_by_vendor(&records) {
            ui.show_header(vendor);
            let line: Vec<String> = specs.iter().map(|s| s.to_string()).collect();
            ui.message(&line.join("  "));
        }

        Ok(CommandResult::success())
    }
}
