//! Bounded-time subprocess execution.
//!
//! Version probes invoke arbitrary executables found on a search path, some
//! of which are not compilers at all. Every invocation runs with stdin
//! closed, captures both output streams, and can be given a deadline after
//! which the whole process group is killed.

use crate::error::{Result, ScoutError};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How often a running child is polled while a timeout is pending.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Spawn attempts made when the kernel reports the executable as busy.
const SPAWN_RETRIES: u32 = 5;

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Standard output followed by standard error.
    pub fn combined_output(&self) -> String {
        let mut combined = self.stdout.clone();
        if !combined.is_empty() && !combined.ends_with('\n') && !self.stderr.is_empty() {
            combined.push('\n');
        }
        combined.push_str(&self.stderr);
        combined
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Kill the process if it runs longer than this (None = no timeout).
    pub timeout: Option<Duration>,
}

impl CommandOptions {
    /// Options with only a timeout set.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Default::default()
        }
    }
}

/// Execute `program` with `args`, capturing stdout and stderr.
///
/// A non-zero exit is reported through [`CommandResult::success`], not as an
/// error. Errors are returned only when the program cannot be started or
/// when it exceeds `options.timeout`.
pub fn execute(program: &Path, args: &[&str], options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    let rendered = display_command(program, args);

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    // Own process group, so a timeout can take down anything the child forked.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let mut child = spawn(&mut cmd).map_err(|e| {
        tracing::debug!("Failed to start {}: {}", rendered, e);
        ScoutError::CommandFailed {
            command: rendered.clone(),
            code: None,
        }
    })?;

    let stdout_handle = child.stdout.take().map(read_to_string_in_background);
    let stderr_handle = child.stderr.take().map(read_to_string_in_background);

    let status = match options.timeout {
        Some(timeout) => wait_with_timeout(&mut child, timeout)?,
        None => Some(child.wait()?),
    };

    let Some(status) = status else {
        terminate(&mut child);
        // Reader threads are left detached: a grandchild that escaped the
        // kill may still hold the pipes open.
        return Err(ScoutError::CommandTimedOut {
            command: rendered,
            timeout: options.timeout.unwrap_or_default(),
        });
    };

    let stdout = stdout_handle
        .map(|h| h.join().unwrap_or_default())
        .unwrap_or_default();
    let stderr = stderr_handle
        .map(|h| h.join().unwrap_or_default())
        .unwrap_or_default();

    let duration = start.elapsed();

    if status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(status.code(), stdout, stderr, duration))
    }
}

/// Render a program and its arguments for messages and logs.
pub fn display_command(program: &Path, args: &[&str]) -> String {
    let mut rendered = program.display().to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

fn spawn(cmd: &mut Command) -> std::io::Result<Child> {
    let mut attempts = 0;
    loop {
        match cmd.spawn() {
            Err(e) if is_text_busy(&e) && attempts < SPAWN_RETRIES => {
                attempts += 1;
                thread::sleep(POLL_INTERVAL * attempts);
            }
            other => return other,
        }
    }
}

/// A script that was just written may still be open for writing in a
/// concurrently forked process.
#[cfg(unix)]
fn is_text_busy(err: &std::io::Error) -> bool {
    err.raw_os_error() == Some(libc::ETXTBSY)
}

#[cfg(not(unix))]
fn is_text_busy(_err: &std::io::Error) -> bool {
    false
}

fn read_to_string_in_background<R>(mut reader: R) -> JoinHandle<String>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pid) = libc::pid_t::try_from(child.id()) {
            // SAFETY: kill(2) with a negative pid signals the process group
            // created for this child in `execute`; no memory is touched.
            unsafe {
                libc::kill(-pid, libc::SIGKILL);
            }
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn sh(script: &str, options: &CommandOptions) -> Result<CommandResult> {
        execute(Path::new("/bin/sh"), &["-c", script], options)
    }

    #[cfg(unix)]
    #[test]
    fn execute_successful_command() {
        let result = sh("echo hello", &CommandOptions::default()).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn execute_failing_command() {
        let result = sh("exit 3", &CommandOptions::default()).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn execute_captures_stderr() {
        let result = sh("echo oops >&2", &CommandOptions::default()).unwrap();

        assert!(result.stderr.contains("oops"));
        assert!(result.stdout.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn execute_with_env() {
        let mut options = CommandOptions::default();
        options
            .env
            .insert("MY_VAR".to_string(), "my_value".to_string());

        let result = sh("echo $MY_VAR", &options).unwrap();

        assert!(result.stdout.contains("my_value"));
    }

    #[cfg(unix)]
    #[test]
    fn execute_kills_command_after_timeout() {
        let options = CommandOptions::with_timeout(Duration::from_millis(200));
        let start = Instant::now();

        let err = sh("sleep 10", &options).unwrap_err();

        assert!(matches!(err, ScoutError::CommandTimedOut { .. }));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn execute_finishes_before_timeout() {
        let options = CommandOptions::with_timeout(Duration::from_secs(5));
        let result = sh("echo quick", &options).unwrap();
        assert!(result.success);
        assert!(result.duration < Duration::from_secs(5));
    }

    #[test]
    fn execute_missing_program_fails() {
        let err = execute(
            Path::new("/nonexistent/path/to/compiler"),
            &["--version"],
            &CommandOptions::default(),
        )
        .unwrap_err();

        match err {
            ScoutError::CommandFailed { command, code } => {
                assert_eq!(command, "/nonexistent/path/to/compiler --version");
                assert_eq!(code, None);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn combined_output_joins_streams() {
        let result = CommandResult::success(
            "out".to_string(),
            "err\n".to_string(),
            Duration::from_millis(1),
        );
        assert_eq!(result.combined_output(), "out\nerr\n");
    }

    #[test]
    fn display_command_includes_args() {
        let rendered = display_command(Path::new("/usr/bin/gcc"), &["-dumpversion"]);
        assert_eq!(rendered, "/usr/bin/gcc -dumpversion");
    }
}
