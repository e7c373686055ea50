//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use xlaunch::TerminalApp;

#[derive(Parser)]
#[command(name = "xlaunch")]
#[command(author, version, about = "Open xlaude worktrees in terminal tabs and split panes")]
pub struct Cli {
    /// Repository to create worktrees in (overrides default_repo_path)
    #[arg(long, global = true)]
    pub repo: Option<PathBuf>,

    /// Terminal application to open sessions in
    #[arg(long, global = true, value_enum)]
    pub terminal: Option<TerminalApp>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List worktrees grouped by repository
    List {
        /// Print the raw records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Open a worktree in the terminal (interactive picker without a name)
    Open {
        name: Option<String>,
    },
    /// Create a worktree and open it
    Create {
        /// Worktree name (xlaude picks one when omitted)
        name: Option<String>,
        /// Only create, do not open a terminal session
        #[arg(long)]
        no_open: bool,
    },
    /// Create a worktree named after a ticket and open it
    Ticket {
        ticket_id: String,
    },
    /// Check out a branch or pull request into a worktree and open it
    Checkout {
        /// Branch name or PR number
        target: String,
        #[arg(long)]
        no_open: bool,
    },
    /// Close a worktree's terminal sessions and delete it
    Delete {
        name: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every worktree
    DeleteAll {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the directory of a worktree
    Dir {
        name: String,
    },
    /// Create the configuration file
    Init {
        /// Force overwrite existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Show configuration and environment status
    Status,
}
