//! Compiler discovery.
//!
//! The pipeline is [`scan`] (find and classify executables), then
//! [`ToolchainMatcher`] (probe versions and assemble toolchains). Use
//! [`discover`] for the whole thing.

pub mod candidate;
pub mod family;
pub mod matcher;
pub mod probe;
pub mod scanner;
pub mod toolchain;

pub use candidate::{classify, CompilerCandidate, ParsedName};
pub use family::{Family, FamilyDef, FAMILY_DEFS};
pub use matcher::{assemble, ToolchainBuilder, ToolchainMatcher};
pub use probe::{
    probe_all, CommandProber, ProbeFailure, VersionProbe, VersionProber, DEFAULT_PROBE_TIMEOUT,
};
pub use scanner::{is_executable, parse_system_path, scan};
pub use toolchain::{compare_versions, CompilerSpec, Role, RolePaths, Toolchain};

use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

/// Options for a discovery run.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Upper bound for a single version probe.
    pub probe_timeout: Duration,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// Discover toolchains under `paths`, probing real executables.
///
/// An empty result means nothing was found; it is not an error.
pub fn discover(paths: &[PathBuf], options: &DiscoveryOptions) -> Vec<Toolchain> {
    let prober = CommandProber::new(options.probe_timeout);
    discover_with(&prober, paths)
}

/// Discover toolchains under `paths` with a caller-supplied prober.
pub fn discover_with<P: VersionProber + ?Sized>(prober: &P, paths: &[PathBuf]) -> Vec<Toolchain> {
    let candidates = scan(paths);
    let toolchains = ToolchainMatcher::new(prober).match_candidates(&candidates);
    debug!(
        "Discovered {} toolchain(s) from {} candidate(s)",
        toolchains.len(),
        candidates.len()
    );
    toolchains
}
