//! Merging discovered toolchains into a scope, and removing records.
//!
//! Both operations work on an in-memory [`ConfigScope`]; persistence is the
//! store's job.
//!
//! # Merge Rules
//!
//! - A record is identified by `(spec, operating_system, target)`
//! - New records are appended; existing records keep their order
//! - A toolchain whose key is already present is skipped

use std::fmt;

use tracing::debug;

use crate::compilers::{CompilerSpec, Toolchain};
use crate::platform::Platform;

use super::schema::CompilerRecord;
use super::scope::ConfigScope;

/// Append every toolchain not yet in `scope`.
///
/// Returns the specs that were added, in order.
pub fn merge_toolchains(
    scope: &mut ConfigScope,
    toolchains: &[Toolchain],
    platform: &Platform,
) -> Vec<CompilerSpec> {
    let mut added = Vec::new();

    for toolchain in toolchains {
        let record = CompilerRecord::from_toolchain(toolchain, platform);
        if scope.records.iter().any(|r| r.key() == record.key()) {
            debug!("{} already registered in {} scope", record.spec, scope.name);
            continue;
        }
        added.push(record.spec.clone());
        scope.records.push(record);
    }

    added
}

/// Which records to remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveSelector {
    /// Every record.
    All,
    /// Records whose spec satisfies this one (`gcc` or `gcc@4.5.3`).
    Spec(CompilerSpec),
}

impl RemoveSelector {
    pub fn matches(&self, record: &CompilerRecord) -> bool {
        match self {
            RemoveSelector::All => true,
            RemoveSelector::Spec(spec) => record.spec.satisfies(spec),
        }
    }
}

impl fmt::Display for RemoveSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoveSelector::All => f.write_str("all compilers"),
            RemoveSelector::Spec(spec) => write!(f, "{}", spec),
        }
    }
}

/// Records removed by one [`remove`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoveOutcome {
    pub removed: Vec<CompilerRecord>,
}

impl RemoveOutcome {
    /// True when the selector matched nothing.
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }

    pub fn extend(&mut self, other: RemoveOutcome) {
        self.removed.extend(other.removed);
    }
}

/// Remove matching records from `scope`, keeping the order of the rest.
///
/// A selector that matches nothing leaves the scope untouched.
pub fn remove(scope: &mut ConfigScope, selector: &RemoveSelector) -> RemoveOutcome {
    let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut scope.records)
        .into_iter()
        .partition(|record| selector.matches(record));
    scope.records = kept;

    if !removed.is_empty() {
        debug!(
            "Removed {} record(s) matching {} from {} scope",
            removed.len(),
            selector,
            scope.name
        );
    }
    RemoveOutcome { removed }
}
