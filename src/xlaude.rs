//! Client for the xlaude command line tool

use crate::config::Config;
use crate::parser::{WorktreeRecord, parse_listing};
use crate::runner::{
    CommandResult, Executor, Invocation, SystemExecutor, resolve_executable, run, sync_remote,
};
use crate::terminal::script::shell_word;
use std::path::{Path, PathBuf};

/// Keeps xlaude from opening its own session after create/checkout
pub const ENV_NO_AUTO_OPEN: &str = "XLAUDE_NO_AUTO_OPEN";
/// Answers xlaude's confirmation prompts
pub const ENV_YES: &str = "XLAUDE_YES";

/// xlaude client
pub struct XlaudeClient<E: Executor = SystemExecutor> {
    executable: PathBuf,
    repo_path: Option<PathBuf>,
    executor: E,
}

impl XlaudeClient<SystemExecutor> {
    /// Client using the configured (or resolved) executable
    pub fn from_config(config: &Config) -> Self {
        Self::with_executor(
            resolve_executable(config.xlaude_path.as_deref(), dirs::home_dir().as_deref()),
            config.default_repo_path.clone(),
            SystemExecutor,
        )
    }
}

impl<E: Executor> XlaudeClient<E> {
    pub fn with_executor(executable: PathBuf, repo_path: Option<PathBuf>, executor: E) -> Self {
        Self {
            executable,
            repo_path,
            executor,
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    fn invocation(&self) -> Invocation {
        Invocation::new(&self.executable).current_dir(self.repo_path.as_deref())
    }

    /// Fetch and fast-forward the repository; failures are only logged
    fn sync(&self) {
        if let Some(ref repo) = self.repo_path {
            sync_remote(&self.executor, repo);
        }
    }

    /// All worktrees known to xlaude; empty when the call or parse fails
    pub fn list_worktrees(&self) -> Vec<WorktreeRecord> {
        let result = run(&self.executor, &self.invocation().args(["list", "--json"]));
        if !result.success {
            crate::debug::log_category("XLAUDE", &format!("list failed: {}", result.message));
            return Vec::new();
        }
        parse_listing(&result.message)
    }

    /// `xlaude create [name]`
    pub fn create(&self, name: Option<&str>) -> CommandResult {
        self.sync();
        let mut invocation = self.invocation().arg("create").env(ENV_NO_AUTO_OPEN, "1");
        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            invocation = invocation.arg(name);
        }
        run(&self.executor, &invocation)
    }

    /// `xlaude delete <name>`, confirming any prompt
    pub fn delete(&self, name: &str) -> CommandResult {
        let invocation = self.invocation().args(["delete", name]).env(ENV_YES, "1");
        run(&self.executor, &invocation)
    }

    /// `xlaude checkout <branch-or-pr>`
    pub fn checkout(&self, target: &str) -> CommandResult {
        self.sync();
        let invocation = self
            .invocation()
            .args(["checkout", target])
            .env(ENV_NO_AUTO_OPEN, "1");
        let result = run(&self.executor, &invocation);
        if result.success {
            result
        } else {
            CommandResult::failed(checkout_hint(&result.message))
        }
    }

    /// Directory of a worktree, via `xlaude dir <name>`
    pub fn dir(&self, name: &str) -> Option<PathBuf> {
        let result = run(&self.executor, &self.invocation().args(["dir", name]));
        let path = result.message.lines().next().unwrap_or("").trim();
        (result.success && !path.is_empty()).then(|| PathBuf::from(path))
    }

    /// Shell command that starts an agent session inside a worktree
    pub fn open_command(&self) -> String {
        format!("{} open", shell_word(&self.executable.to_string_lossy()))
    }
}

/// Rewrite known checkout failures into actionable messages
///
/// Known failures are replaced by a hint; the raw message goes to the debug log.
pub fn checkout_hint(message: &str) -> String {
    let hint = if message.contains("not on a base branch") {
        "Must run from a base branch (main/master). Set default_repo_path to your repo root."
    } else if message.contains("Failed to create worktree") {
        "Failed to create worktree. Ensure the branch exists and you're in a valid git repo."
    } else {
        return message.to_string();
    };
    crate::debug_log!("[XLAUDE] checkout failed: {message}");
    hint.to_string()
}
