//! Command implementations

pub mod checkout;
pub mod create;
pub mod delete;
pub mod dir;
pub mod init;
pub mod list;
pub mod open;
pub mod status;

pub use checkout::run_checkout;
pub use create::{run_create, run_ticket};
pub use delete::{run_delete, run_delete_all};
pub use dir::run_dir;
pub use init::run_init;
pub use list::run_list;
pub use open::run_open;
pub use status::run_status;

use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use xlaunch::config::expand_path;
use xlaunch::parser::{known_names, worktree_name_from_path};
use xlaunch::terminal::Launcher;
use xlaunch::{
    BestEffort, Config, Executor, PlacementRequest, TerminalApp, XlaudeClient,
    extract_worktree_path,
};

/// Load the configuration and apply command-line overrides
pub fn load_config(repo: Option<PathBuf>, terminal: Option<TerminalApp>) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(repo) = repo {
        config.default_repo_path = Some(expand_path(&repo));
    }
    if let Some(terminal) = terminal {
        config.terminal = terminal;
    }
    Ok(config)
}

/// Start `xlaude open` for a worktree directory through `launcher`
///
/// `known_names` lets placement recognise tabs that already belong to
/// other worktrees.
pub fn launch_session<E: Executor, L: Launcher>(
    client: &XlaudeClient<E>,
    launcher: &L,
    directory: &Path,
    label: &str,
    known_names: &[String],
) -> BestEffort {
    let request = PlacementRequest::new(directory)
        .command(client.open_command())
        .label(label);
    BestEffort::from_result("TERMINAL", launcher.open(&request, known_names))
}

/// What happened to the terminal session after create/checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// `--no-open`
    NotRequested,
    /// xlaude succeeded but its output named no directory
    PathNotFound,
    Opened(String),
    /// The worktree exists; only the terminal step failed
    LaunchFailed(String),
}

/// Open the worktree named in xlaude's create/checkout output
///
/// The worktree exists either way, so nothing here is an error.
pub fn open_created<E: Executor, L: Launcher>(
    client: &XlaudeClient<E>,
    launcher: &L,
    output: &str,
    label: Option<&str>,
    fallback_name: Option<&str>,
) -> LaunchOutcome {
    let Some(path) = extract_worktree_path(output) else {
        println!("Worktree is ready but couldn't auto-open: path not found in xlaude output.");
        return LaunchOutcome::PathNotFound;
    };

    let label = tab_label(label, &path, fallback_name);
    let known = known_names(&client.list_worktrees());
    match launch_session(client, launcher, &path, &label, &known) {
        BestEffort::Failed(e) => {
            eprintln!("Warning: worktree is ready but couldn't open a terminal session: {e}");
            LaunchOutcome::LaunchFailed(e)
        }
        _ => {
            println!("Opened {label}");
            LaunchOutcome::Opened(label)
        }
    }
}

/// Explicit label, else the directory name, else the requested name
fn tab_label(label: Option<&str>, path: &Path, name: Option<&str>) -> String {
    label
        .map(str::to_string)
        .or_else(|| worktree_name_from_path(path))
        .or_else(|| name.map(str::to_string))
        .unwrap_or_else(|| "worktree".to_string())
}

/// Ask a yes/no question on stdin
pub fn confirm(prompt: &str) -> Result<bool> {
    confirm_from(prompt, io::stdin().lock(), io::stdout())
}

fn confirm_from<R: BufRead, W: Write>(prompt: &str, mut input: R, mut output: W) -> Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
