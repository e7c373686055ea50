//! Capability interface over a scriptable terminal application
//!
//! The terminal's window/tab/pane tree is live, external state. Callers
//! enumerate it right before acting and never cache a snapshot across
//! operations.

use anyhow::Result;

#[cfg(test)]
use mockall::automock;

/// One pane (iTerm "session") as seen at enumeration time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneSnapshot {
    /// Stable id assigned by the terminal
    pub id: String,
    /// Visible session name (set through the title escape sequence)
    pub name: String,
}

/// One tab of a window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSnapshot {
    /// 1-based position in the window
    pub index: usize,
    /// Displayed tab title (name of the tab's current session)
    pub title: String,
    pub panes: Vec<PaneSnapshot>,
}

impl TabSnapshot {
    /// Pane used to address the tab as a whole
    pub fn first_pane(&self) -> Option<&PaneSnapshot> {
        self.panes.first()
    }
}

/// One window, front to back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSnapshot {
    pub id: String,
    pub tabs: Vec<TabSnapshot>,
}

/// Where a session ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalDestination {
    pub window_id: String,
    pub tab_index: usize,
    pub pane_id: String,
}

/// Structural operations on a terminal application
///
/// Panes are addressed by their stable id; tabs through any pane they
/// host, so closing one element never invalidates another handle.
#[cfg_attr(test, automock)]
pub trait TerminalBridge {
    /// All windows, front window first
    fn enumerate(&self) -> Result<Vec<WindowSnapshot>>;

    /// Open a tab in the front window (a new window when none exists); returns its pane id
    fn create_tab(&self) -> Result<String>;

    /// Bring the tab hosting `pane_id` to the front
    fn select_tab(&self, pane_id: &str) -> Result<()>;

    /// Split `pane_id` vertically; returns the new pane id
    fn split_vertically(&self, pane_id: &str) -> Result<String>;

    /// Type a line of text into a pane, followed by return
    fn write_text(&self, pane_id: &str, text: &str) -> Result<()>;

    /// Give keyboard focus to a pane
    fn focus_pane(&self, pane_id: &str) -> Result<()>;

    /// Close a single pane
    fn close_pane(&self, pane_id: &str) -> Result<()>;

    /// Close the whole tab hosting `pane_id`
    fn close_tab(&self, pane_id: &str) -> Result<()>;
}
