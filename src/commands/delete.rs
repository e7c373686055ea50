//! Delete and delete-all command implementations

use super::confirm;
use anyhow::{Result, bail};
use xlaunch::terminal::{Launcher, TerminalLauncher};
use xlaunch::{BatchReport, BestEffort, CommandResult, Config, Executor, XlaudeClient, delete_all};

/// Run the delete command
pub fn run_delete(config: &Config, name: &str, yes: bool) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Worktree name is required");
    }
    if !yes && !confirm(&format!("Delete worktree '{name}'?"))? {
        println!("Cancelled");
        return Ok(());
    }

    let client = XlaudeClient::from_config(config);
    let result = delete_worktree(&client, &TerminalLauncher::new(config), name);
    if !result.success {
        bail!("Failed to delete '{name}': {}", result.message);
    }
    println!("Deleted {name}");
    Ok(())
}

/// Run the delete-all command
pub fn run_delete_all(config: &Config, yes: bool) -> Result<()> {
    let client = XlaudeClient::from_config(config);
    let worktrees = client.list_worktrees();
    if worktrees.is_empty() {
        println!("No worktrees to delete");
        return Ok(());
    }

    if !yes {
        for wt in &worktrees {
            println!("  {} ({})", wt.name, wt.repo_name);
        }
        if !confirm(&format!("Delete all {} worktrees?", worktrees.len()))? {
            println!("Cancelled");
            return Ok(());
        }
    }

    let report = delete_listed(&client, &TerminalLauncher::new(config), &worktrees);
    for (name, message) in &report.failed {
        eprintln!("  {name}: {message}");
    }
    if !report.is_success() {
        bail!("{}", report.summary());
    }
    println!("{}", report.summary());
    Ok(())
}

/// Close the worktree's terminal sessions, then `xlaude delete` it
fn delete_worktree<E: Executor, L: Launcher>(
    client: &XlaudeClient<E>,
    launcher: &L,
    name: &str,
) -> CommandResult {
    if let BestEffort::Failed(e) = launcher.close_sessions(name) {
        eprintln!("Warning: couldn't close terminal sessions for {name}: {e}");
    }
    client.delete(name)
}

fn delete_listed<E: Executor, L: Launcher>(
    client: &XlaudeClient<E>,
    launcher: &L,
    worktrees: &[xlaunch::WorktreeRecord],
) -> BatchReport {
    delete_all(
        worktrees,
        |wt| delete_worktree(client, launcher, &wt.name),
        |done, total| println!("{done}/{total}"),
    )
}
