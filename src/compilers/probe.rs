//! Version probing.
//!
//! A probe runs a candidate with its family's version argument and reads a
//! `vendor@version` identity out of whatever it prints. Probing arbitrary
//! executables is expected to fail often; a failure only means the
//! candidate has no known version.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use super::candidate::CompilerCandidate;
use crate::error::ScoutError;
use crate::shell::{execute, CommandOptions};

/// Default time budget for one version probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on probes running at the same time.
const MAX_PARALLEL_PROBES: usize = 16;

/// Why a probe produced no version.
#[derive(Debug, Clone, Error)]
pub enum ProbeFailure {
    /// The executable could not be started.
    #[error("could not start: {0}")]
    Spawn(String),

    /// The executable did not finish in time and was killed.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    /// The executable exited unsuccessfully.
    #[error("exited with code {code:?}")]
    NonZeroExit { code: Option<i32>, output: String },

    /// The output contained no version this family recognizes.
    #[error("no recognizable version in output")]
    Unparseable { output: String },
}

/// Runs an executable with a single argument and returns what it printed.
///
/// The matcher only talks to this trait, so tests can substitute canned
/// output for real subprocesses.
pub trait VersionProber: Sync {
    fn run(&self, program: &Path, arg: &str) -> Result<String, ProbeFailure>;
}

/// Probes by executing the candidate under a timeout.
#[derive(Debug, Clone)]
pub struct CommandProber {
    timeout: Duration,
}

impl CommandProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for CommandProber {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

impl VersionProber for CommandProber {
    fn run(&self, program: &Path, arg: &str) -> Result<String, ProbeFailure> {
        let options = CommandOptions::with_timeout(self.timeout);
        match execute(program, &[arg], &options) {
            Ok(result) if result.success => Ok(result.combined_output()),
            Ok(result) => Err(ProbeFailure::NonZeroExit {
                code: result.exit_code,
                output: result.combined_output(),
            }),
            Err(ScoutError::CommandTimedOut { timeout, .. }) => Err(ProbeFailure::TimedOut(timeout)),
            Err(e) => Err(ProbeFailure::Spawn(e.to_string())),
        }
    }
}

/// Outcome of probing one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionProbe {
    /// Captured output (stdout, then stderr) of the last invocation.
    pub raw_output: String,
    /// Normalized vendor, when the version was recognized.
    pub vendor: Option<&'static str>,
    /// Parsed version, absent when probing failed.
    pub version: Option<String>,
}

impl VersionProbe {
    /// Whether the probe produced a version.
    pub fn is_known(&self) -> bool {
        self.version.is_some()
    }

    fn failed(raw_output: String) -> Self {
        Self {
            raw_output,
            vendor: None,
            version: None,
        }
    }
}

/// Probe every candidate, returning results in candidate order.
///
/// Each distinct `(path, argument)` pair is executed once, in parallel
/// batches; results are joined before being attributed back to candidates.
pub fn probe_all<P>(prober: &P, candidates: &[CompilerCandidate]) -> Vec<VersionProbe>
where
    P: VersionProber + ?Sized,
{
    let mut outputs = OutputCache::default();

    let first_round: Vec<(PathBuf, &'static str)> = candidates
        .iter()
        .map(|c| (c.path.clone(), c.parsed.family.def().version_arg))
        .collect();
    outputs.fill(prober, &first_round);

    let mut probes: Vec<VersionProbe> = candidates
        .iter()
        .map(|c| interpret(c, c.parsed.family.def().version_arg, &outputs))
        .collect();

    // GCC 7+ answers -dumpversion with a bare major; ask again for the rest.
    let refinements: Vec<(usize, &'static str)> = candidates
        .iter()
        .zip(&probes)
        .enumerate()
        .filter_map(|(i, (c, probe))| {
            let version = probe.version.as_deref()?;
            c.parsed
                .family
                .def()
                .wants_full_version(version)
                .map(|arg| (i, arg))
        })
        .collect();

    if !refinements.is_empty() {
        let second_round: Vec<(PathBuf, &'static str)> = refinements
            .iter()
            .map(|(i, arg)| (candidates[*i].path.clone(), *arg))
            .collect();
        outputs.fill(prober, &second_round);

        for (i, arg) in refinements {
            let refined = interpret(&candidates[i], arg, &outputs);
            if refined.is_known() {
                probes[i] = refined;
            }
        }
    }

    probes
}

#[derive(Default)]
struct OutputCache {
    results: HashMap<(PathBuf, &'static str), Result<String, ProbeFailure>>,
}

impl OutputCache {
    fn fill<P>(&mut self, prober: &P, requests: &[(PathBuf, &'static str)])
    where
        P: VersionProber + ?Sized,
    {
        let mut pending: Vec<&(PathBuf, &'static str)> = Vec::new();
        for request in requests {
            if !self.results.contains_key(request) && !pending.contains(&request) {
                pending.push(request);
            }
        }

        for batch in pending.chunks(MAX_PARALLEL_PROBES) {
            let results: Vec<Result<String, ProbeFailure>> = thread::scope(|s| {
                let handles: Vec<_> = batch
                    .iter()
                    .map(|(path, arg)| s.spawn(move || prober.run(path, arg)))
                    .collect();
                handles
                    .into_iter()
                    .map(|h| {
                        h.join().unwrap_or_else(|_| {
                            Err(ProbeFailure::Spawn("probe thread panicked".to_string()))
                        })
                    })
                    .collect()
            });

            for (request, result) in batch.iter().zip(results) {
                self.results.insert((*request).clone(), result);
            }
        }
    }

    fn get(&self, path: &Path, arg: &'static str) -> Option<&Result<String, ProbeFailure>> {
        self.results.get(&(path.to_path_buf(), arg))
    }
}

fn interpret(candidate: &CompilerCandidate, arg: &'static str, outputs: &OutputCache) -> VersionProbe {
    let def = candidate.parsed.family.def();
    let result = match outputs.get(&candidate.path, arg) {
        Some(Ok(output)) => match def.identify(output) {
            Some((vendor, version)) => {
                debug!(
                    "{} [{}] {} -> {}@{}",
                    candidate.path.display(),
                    def.family,
                    arg,
                    vendor,
                    version
                );
                return VersionProbe {
                    raw_output: output.clone(),
                    vendor: Some(vendor),
                    version: Some(version),
                };
            }
            None => ProbeFailure::Unparseable {
                output: output.clone(),
            },
        },
        Some(Err(failure)) => failure.clone(),
        None => ProbeFailure::Spawn("not probed".to_string()),
    };

    debug!(
        "{} [{}] {}: {}",
        candidate.path.display(),
        def.family,
        arg,
        result
    );
    let raw_output = match result {
        ProbeFailure::NonZeroExit { output, .. } | ProbeFailure::Unparseable { output } => output,
        _ => String::new(),
    };
    VersionProbe::failed(raw_output)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::compilers::candidate::classify;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned probe output keyed by (file name, argument).
    #[derive(Default)]
    pub(crate) struct FakeProber {
        outputs: HashMap<(String, String), Result<String, ProbeFailure>>,
        pub(crate) calls: AtomicUsize,
    }

    impl FakeProber {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn answer(mut self, basename: &str, arg: &str, output: &str) -> Self {
            self.outputs.insert(
                (basename.to_string(), arg.to_string()),
                Ok(output.to_string()),
            );
            self
        }

        pub(crate) fn fail(mut self, basename: &str, arg: &str, failure: ProbeFailure) -> Self {
            self.outputs
                .insert((basename.to_string(), arg.to_string()), Err(failure));
            self
        }
    }

    impl VersionProber for FakeProber {
        fn run(&self, program: &Path, arg: &str) -> Result<String, ProbeFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let name = program
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            self.outputs
                .get(&(name, arg.to_string()))
                .cloned()
                .unwrap_or_else(|| Err(ProbeFailure::NonZeroExit {
                    code: Some(1),
                    output: String::new(),
                }))
        }
    }

    /// Candidates for `names` in one directory, in the given order.
    pub(crate) fn candidates(dir: &str, names: &[&str]) -> Vec<CompilerCandidate> {
        names
            .iter()
            .flat_map(|name| {
                classify(name).into_iter().map(move |parsed| CompilerCandidate {
                    path: Path::new(dir).join(name),
                    basename: name.to_string(),
                    parsed,
                    search_index: 0,
                })
            })
            .collect()
    }

    #[test]
    fn recognized_output_yields_vendor_and_version() {
        let prober = FakeProber::new().answer("gcc", "-dumpversion", "4.5.3\n");
        let probes = probe_all(&prober, &candidates("/bin", &["gcc"]));

        assert_eq!(probes.len(), 1);
        assert_eq!(probes[0].vendor, Some("gcc"));
        assert_eq!(probes[0].version.as_deref(), Some("4.5.3"));
    }

    #[test]
    fn failed_probe_has_no_version() {
        let prober = FakeProber::new().fail(
            "clang",
            "--version",
            ProbeFailure::TimedOut(Duration::from_secs(5)),
        );
        let probes = probe_all(&prober, &candidates("/bin", &["clang"]));

        assert!(!probes[0].is_known());
        assert!(probes[0].raw_output.is_empty());
    }

    #[test]
    fn unparseable_output_is_kept_for_inspection() {
        let prober = FakeProber::new().answer("gcc", "-dumpversion", "gcc: fatal error\n");
        let probes = probe_all(&prober, &candidates("/bin", &["gcc"]));

        assert!(!probes[0].is_known());
        assert!(probes[0].raw_output.contains("fatal error"));
    }

    #[test]
    fn each_family_reads_its_own_argument() {
        let prober = FakeProber::new()
            .answer("gfortran", "-dumpversion", "4.8.5\n")
            .answer("gfortran", "--version", "GNU Fortran (GCC) 4.8.5\n");
        // gfortran is a GNU compiler and a Clang Fortran companion.
        let probes = probe_all(&prober, &candidates("/bin", &["gfortran"]));

        assert_eq!(probes.len(), 2);
        assert_eq!(probes[0].version.as_deref(), Some("4.8.5"));
        assert!(!probes[1].is_known());
    }

    #[test]
    fn bare_major_is_refined_with_full_version() {
        let prober = FakeProber::new()
            .answer("gcc", "-dumpversion", "9\n")
            .answer("gcc", "-dumpfullversion", "9.3.0\n");
        let probes = probe_all(&prober, &candidates("/bin", &["gcc"]));

        assert_eq!(probes[0].version.as_deref(), Some("9.3.0"));
    }

    #[test]
    fn bare_major_survives_failed_refinement() {
        let prober = FakeProber::new().answer("gcc", "-dumpversion", "9\n");
        let probes = probe_all(&prober, &candidates("/bin", &["gcc"]));

        assert_eq!(probes[0].version.as_deref(), Some("9"));
    }

    #[test]
    fn identical_requests_run_once() {
        let prober = FakeProber::new().answer("gcc", "-dumpversion", "4.5.3\n");
        let mut twice = candidates("/bin", &["gcc"]);
        twice.extend(candidates("/bin", &["gcc"]));

        let probes = probe_all(&prober, &twice);

        assert_eq!(probes.len(), 2);
        assert_eq!(prober.calls.load(Ordering::SeqCst), 1);
    }

    #[cfg(unix)]
    #[test]
    fn command_prober_reports_timeout() {
        use std::os::unix::fs::PermissionsExt;
        let temp = tempfile::TempDir::new().unwrap();
        let script = temp.path().join("gcc");
        std::fs::write(&script, "#!/bin/sh\nsleep 10\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let prober = CommandProber::new(Duration::from_millis(200));
        let err = prober.run(&script, "-dumpversion").unwrap_err();

        assert!(matches!(err, ProbeFailure::TimedOut(_)));
    }

    #[cfg(unix)]
    #[test]
    fn command_prober_reports_nonzero_exit() {
        use std::os::unix::fs::PermissionsExt;
        let temp = tempfile::TempDir::new().unwrap();
        let script = temp.path().join("gcc");
        std::fs::write(&script, "#!/bin/sh\necho 1.2.3\nexit 2\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let err = CommandProber::default()
            .run(&script, "-dumpversion")
            .unwrap_err();

        assert!(matches!(err, ProbeFailure::NonZeroExit { code: Some(2), .. }));
    }
}
