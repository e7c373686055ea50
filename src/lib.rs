//! xlaunch - terminal launcher for xlaude worktrees
//!
//! Wraps the `xlaude` CLI and places each worktree's agent session in a
//! terminal tab, or as a split pane of a tab it already owns.
//!
//! # Modules
//!
//! - [`xlaude`] - xlaude CLI client
//! - [`runner`] - process execution and executable resolution
//! - [`parser`] - listing JSON and path scraping
//! - [`terminal`] - placement and teardown of terminal sessions
//! - [`batch`] - serial delete-all
//! - [`picker`] - interactive worktree picker
//! - [`config`] - TOML configuration

pub mod batch;
pub mod best_effort;
pub mod config;
pub mod debug;
pub mod parser;
pub mod picker;
pub mod runner;
pub mod terminal;
pub mod xlaude;

// Re-export commonly used types
pub use batch::{BatchReport, delete_all};
pub use best_effort::BestEffort;
pub use config::{Config, TerminalApp};
pub use parser::{WorktreeRecord, extract_worktree_path, parse_listing};
pub use picker::{PickerResult, WorktreePicker, run_picker};
pub use runner::{CommandResult, Executor, Invocation, SystemExecutor};
pub use terminal::{PlacementRequest, SessionMatcher, SubstringMatcher, TerminalBridge};
pub use xlaude::XlaudeClient;
