//! Process runner for the xlaude executable
//!
//! Resolves the binary, runs it with an augmented `PATH`, and folds the
//! outcome into a [`CommandResult`].

use crate::best_effort::BestEffort;
use crate::debug;
use anyhow::{Context, Result, anyhow};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

#[cfg(test)]
use mockall::automock;

/// Bare executable name, resolved through `PATH`
pub const XLAUDE_BIN: &str = "xlaude";

/// Directories searched ahead of the inherited `PATH`
const SYSTEM_BIN_DIRS: [&str; 4] = ["/bin", "/usr/bin", "/usr/local/bin", "/opt/homebrew/bin"];
const HOME_BIN_DIRS: [&str; 3] = [".cargo/bin", ".local/bin", ".nix-profile/bin"];

/// Uniform outcome of an external-tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    /// Trimmed stdout on success, best-effort error text on failure
    pub message: String,
}

impl CommandResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// A fully described process invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_directory: Option<PathBuf>,
    pub extra_env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: Option<&Path>) -> Self {
        self.working_directory = dir.map(Path::to_path_buf);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.extra_env.push((key.to_string(), value.to_string()));
        self
    }
}

/// Captured output of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Trait for running processes (allows mocking)
#[cfg_attr(test, automock)]
pub trait Executor {
    /// Run to completion; `Err` only when the process could not be spawned
    fn execute(&self, invocation: &Invocation) -> Result<ProcessOutput>;
}

/// Real executor using `std::process::Command`
#[derive(Debug, Clone, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn execute(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .env("PATH", extended_path(dirs::home_dir().as_deref(), std::env::var_os("PATH")));

        for (key, value) in &invocation.extra_env {
            cmd.env(key, value);
        }
        if let Some(ref dir) = invocation.working_directory {
            cmd.current_dir(dir);
        }

        let output = cmd
            .output()
            .with_context(|| format!("Failed to execute {}", invocation.program.display()))?;

        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Run an invocation and classify the outcome
pub fn run<E: Executor + ?Sized>(executor: &E, invocation: &Invocation) -> CommandResult {
    let result = match executor.execute(invocation) {
        Ok(output) if output.success => CommandResult::ok(output.stdout.trim()),
        Ok(output) => {
            let description = match output.code {
                Some(code) => format!(
                    "{} exited with status {}",
                    invocation.program.display(),
                    code
                ),
                None => format!("{} was terminated by a signal", invocation.program.display()),
            };
            CommandResult::failed(failure_message(&output.stderr, &output.stdout, &description))
        }
        Err(e) => CommandResult::failed(failure_message("", "", &format!("{e:#}"))),
    };

    debug::log_command(
        &invocation.program,
        &invocation.args,
        invocation.working_directory.as_deref(),
        result.success,
    );
    result
}

/// Pick the most useful error text: stderr, then stdout, then the error description
pub fn failure_message(stderr: &str, stdout: &str, error: &str) -> String {
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    let stdout = stdout.trim();
    if !stdout.is_empty() {
        return stdout.to_string();
    }
    error.to_string()
}

/// `PATH` with common install locations prepended
pub fn extended_path(home: Option<&Path>, inherited: Option<OsString>) -> OsString {
    let mut dirs: Vec<PathBuf> = SYSTEM_BIN_DIRS.iter().map(PathBuf::from).collect();
    if let Some(home) = home {
        dirs.extend(HOME_BIN_DIRS.iter().map(|d| home.join(d)));
    }
    if let Some(ref inherited) = inherited {
        dirs.extend(std::env::split_paths(inherited));
    }

    std::env::join_paths(dirs).unwrap_or_else(|_| inherited.unwrap_or_default())
}

/// Resolve the xlaude executable
///
/// 1. explicitly configured path (unless it is just `xlaude`)
/// 2. `~/.cargo/bin/xlaude` when present and executable
/// 3. bare `xlaude`, resolved through the augmented `PATH`
pub fn resolve_executable(configured: Option<&Path>, home: Option<&Path>) -> PathBuf {
    if let Some(path) = configured {
        if !path.as_os_str().is_empty() && path != Path::new(XLAUDE_BIN) {
            return path.to_path_buf();
        }
    }

    if let Some(home) = home {
        let cargo_bin = home.join(".cargo").join("bin").join(XLAUDE_BIN);
        if is_executable(&cargo_bin) {
            return cargo_bin;
        }
    }

    PathBuf::from(XLAUDE_BIN)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Bring the repository up to date before create/checkout
///
/// Runs `git fetch origin` then `git pull --ff-only`. Failures (offline,
/// no upstream, detached HEAD) are swallowed: the primary operation can
/// still run from the local state.
pub fn sync_remote<E: Executor + ?Sized>(executor: &E, working_directory: &Path) -> BestEffort {
    let steps: [&[&str]; 2] = [&["fetch", "origin"], &["pull", "--ff-only"]];

    let outcome = steps.iter().try_for_each(|args| {
        let invocation = Invocation::new("git")
            .args(args.iter().copied())
            .current_dir(Some(working_directory));
        let result = run(executor, &invocation);
        if result.success {
            Ok(())
        } else {
            Err(anyhow!("git {}: {}", args.join(" "), result.message))
        }
    });

    BestEffort::from_result("SYNC", outcome)
}
