//! Session placement: split an owned tab or open a new one
//!
//! A tab is reused only when every pane in it belongs to a known worktree
//! and it still has room for another pane. Anything else gets a new tab,
//! so a user's own shells are never split.

use super::bridge::{TabSnapshot, TerminalBridge, TerminalDestination, WindowSnapshot};
use super::matcher::SessionMatcher;
use super::script::{combined_title, title_sequence, titled_command};
use crate::debug;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Label used when a split is requested without one
const DEFAULT_LABEL: &str = "worktree";

/// Split-pane settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementConfig {
    pub split_panes_enabled: bool,
    /// Panes allowed per tab (at least 1)
    pub max_panes_per_tab: usize,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            split_panes_enabled: false,
            max_panes_per_tab: 2,
        }
    }
}

/// What to open and how to title it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRequest {
    pub directory: PathBuf,
    pub command: Option<String>,
    pub label: Option<String>,
}

impl PlacementRequest {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            command: None,
            label: None,
        }
    }

    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Line typed into the new session
    pub fn shell_line(&self) -> String {
        titled_command(&self.directory, self.command.as_deref(), self.label.as_deref())
    }
}

/// Result of a placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// A fresh tab was opened
    NewTab { pane_id: String },
    /// An owned tab was split
    Split {
        destination: TerminalDestination,
        /// Pane that was split; its title now shows `combined_title`
        original_pane_id: String,
        combined_title: String,
    },
}

/// First tab of `window` that can take another pane
///
/// Candidates have `0 < panes < max_panes` and every pane name matches a
/// known worktree. Ties go to the earliest tab.
pub fn find_split_candidate<'a, M: SessionMatcher + ?Sized>(
    window: &'a WindowSnapshot,
    matcher: &M,
    known_names: &[String],
    max_panes: usize,
) -> Option<&'a TabSnapshot> {
    window.tabs.iter().find(|tab| {
        let count = tab.panes.len();
        count > 0
            && count < max_panes
            && tab
                .panes
                .iter()
                .all(|pane| matcher.matches_any(&pane.name, known_names))
    })
}

/// Open `request` in the terminal behind `bridge`
pub fn place<B, M>(
    bridge: &B,
    matcher: &M,
    request: &PlacementRequest,
    known_names: &[String],
    config: &PlacementConfig,
) -> Result<Placement>
where
    B: TerminalBridge + ?Sized,
    M: SessionMatcher + ?Sized,
{
    if !config.split_panes_enabled {
        return open_new_tab(bridge, request);
    }

    let windows = bridge.enumerate()?;
    let Some(current) = windows.first() else {
        return open_new_tab(bridge, request);
    };

    match find_split_candidate(current, matcher, known_names, config.max_panes_per_tab) {
        Some(tab) => split_tab(bridge, &current.id, tab, request),
        None => open_new_tab(bridge, request),
    }
}

fn open_new_tab<B: TerminalBridge + ?Sized>(
    bridge: &B,
    request: &PlacementRequest,
) -> Result<Placement> {
    let pane_id = bridge.create_tab()?;
    bridge
        .write_text(&pane_id, &request.shell_line())
        .context("Failed to send command to the new tab")?;
    bridge.focus_pane(&pane_id)?;
    debug::log_terminal("placed in new tab", &pane_id);
    Ok(Placement::NewTab { pane_id })
}

fn split_tab<B: TerminalBridge + ?Sized>(
    bridge: &B,
    window_id: &str,
    tab: &TabSnapshot,
    request: &PlacementRequest,
) -> Result<Placement> {
    let Some(original) = tab.first_pane() else {
        return open_new_tab(bridge, request);
    };
    let label = request.label.as_deref().unwrap_or(DEFAULT_LABEL);
    let line = titled_command(&request.directory, request.command.as_deref(), Some(label));

    bridge.select_tab(&original.id)?;
    let new_pane = bridge.split_vertically(&original.id)?;
    bridge
        .write_text(&new_pane, &line)
        .context("Failed to send command to the new pane")?;
    bridge.focus_pane(&new_pane)?;

    // The tab chrome follows the original pane's title.
    let combined = combined_title(&original.name, label);
    bridge.write_text(&original.id, &title_sequence(&combined))?;

    debug::log_terminal("placed in split", &combined);
    Ok(Placement::Split {
        destination: TerminalDestination {
            window_id: window_id.to_string(),
            tab_index: tab.index,
            pane_id: new_pane,
        },
        original_pane_id: original.id.clone(),
        combined_title: combined,
    })
}
