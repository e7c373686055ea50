//! Terminal automation
//!
//! - [`placement`] - decide between splitting an owned tab and a new tab
//! - [`teardown`] - close the tabs/panes of a worktree
//! - [`bridge`] - capability trait over the terminal's window tree
//! - [`iterm`] - iTerm2 bridge over AppleScript
//! - [`launch`] - dispatch on the configured terminal application

pub mod applescript;
pub mod bridge;
pub mod iterm;
pub mod launch;
pub mod matcher;
pub mod placement;
pub mod script;
pub mod teardown;

pub use bridge::{PaneSnapshot, TabSnapshot, TerminalBridge, TerminalDestination, WindowSnapshot};
pub use launch::{Launcher, TerminalLauncher, close_worktree_sessions, open_in_terminal};
pub use matcher::{SessionMatcher, SubstringMatcher};
pub use placement::{Placement, PlacementConfig, PlacementRequest};
