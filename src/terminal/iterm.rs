//! iTerm2 implementation of [`TerminalBridge`]
//!
//! Each operation is one small AppleScript. Sessions are located by their
//! `id`, which stays valid while other tabs and panes come and go.

use super::applescript::{Osascript, ScriptRunner, applescript_string};
use super::bridge::{PaneSnapshot, TabSnapshot, TerminalBridge, WindowSnapshot};
use crate::debug;
use anyhow::{Context, Result, bail};
use std::thread;
use std::time::Duration;

/// Pause after each structural command so iTerm can materialise the new UI element
pub const SETTLE_DELAY: Duration = Duration::from_millis(200);

// ASCII unit/record separators: never present in titles
const FIELD_SEP: char = '\u{1f}';
const RECORD_SEP: char = '\u{1e}';

const ENUMERATE_SCRIPT: &str = r#"
if application "iTerm" is not running then return ""
set fieldSep to character id 31
set recordSep to character id 30
set output to ""
tell application "iTerm"
  -- current window first, then the others in their usual order
  set orderedWindows to {}
  set frontId to missing value
  try
    set frontId to id of current window
  end try
  repeat with w in windows
    if (id of w) is frontId then
      set beginning of orderedWindows to contents of w
    else
      set end of orderedWindows to contents of w
    end if
  end repeat
  repeat with w in orderedWindows
    set windowId to (id of w) as text
    set tabIndex to 0
    repeat with t in tabs of w
      set tabIndex to tabIndex + 1
      set tabTitle to ""
      try
        set tabTitle to name of current session of t
      end try
      repeat with s in sessions of t
        set output to output & windowId & fieldSep & tabIndex & fieldSep & (id of s) & fieldSep & tabTitle & fieldSep & (name of s) & recordSep
      end repeat
    end repeat
  end repeat
end tell
return output
"#;

const CREATE_TAB_SCRIPT: &str = r#"
tell application "iTerm"
  activate
  if (count of windows) = 0 then
    create window with default profile
  else
    tell current window
      create tab with default profile
    end tell
  end if
  return id of current session of current window
end tell
"#;

/// iTerm2 bridge
pub struct ITermBridge<R: ScriptRunner = Osascript> {
    runner: R,
    settle: Duration,
}

impl ITermBridge<Osascript> {
    pub fn new() -> Self {
        Self {
            runner: Osascript,
            settle: SETTLE_DELAY,
        }
    }
}

impl Default for ITermBridge<Osascript> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ScriptRunner> ITermBridge<R> {
    /// Create a bridge with a custom script runner and settle delay
    pub fn with_runner(runner: R, settle: Duration) -> Self {
        Self { runner, settle }
    }

    fn settle(&self) {
        if !self.settle.is_zero() {
            thread::sleep(self.settle);
        }
    }

    /// Run `body` with `w`, `t` and `s` bound to the window, tab and session of `pane_id`
    fn on_session(&self, operation: &str, pane_id: &str, body: &str) -> Result<String> {
        let script = session_script(pane_id, body);
        debug::log_terminal(operation, pane_id);
        self.runner
            .run(&script)
            .with_context(|| format!("iTerm {operation} failed for session {pane_id}"))
    }
}

impl<R: ScriptRunner> TerminalBridge for ITermBridge<R> {
    fn enumerate(&self) -> Result<Vec<WindowSnapshot>> {
        let raw = self
            .runner
            .run(ENUMERATE_SCRIPT)
            .context("Failed to enumerate iTerm sessions")?;
        parse_enumeration(&raw)
    }

    fn create_tab(&self) -> Result<String> {
        debug::log_terminal("create tab", "");
        let id = self
            .runner
            .run(CREATE_TAB_SCRIPT)
            .context("Failed to create iTerm tab")?;
        self.settle();
        if id.trim().is_empty() {
            bail!("iTerm did not report the new session");
        }
        Ok(id.trim().to_string())
    }

    fn select_tab(&self, pane_id: &str) -> Result<()> {
        self.on_session("select tab", pane_id, "select t")?;
        self.settle();
        Ok(())
    }

    fn split_vertically(&self, pane_id: &str) -> Result<String> {
        let id = self.on_session(
            "split",
            pane_id,
            "tell s\n          set newSession to (split vertically with default profile)\n        end tell\n        return id of newSession",
        )?;
        self.settle();
        if id.trim().is_empty() {
            bail!("iTerm did not report the split session of {pane_id}");
        }
        Ok(id.trim().to_string())
    }

    fn write_text(&self, pane_id: &str, text: &str) -> Result<()> {
        let body = format!("tell s to write text {}", applescript_string(text));
        self.on_session("write", pane_id, &body)?;
        self.settle();
        Ok(())
    }

    fn focus_pane(&self, pane_id: &str) -> Result<()> {
        self.on_session("focus", pane_id, "tell s to select")?;
        self.settle();
        Ok(())
    }

    fn close_pane(&self, pane_id: &str) -> Result<()> {
        self.on_session("close pane", pane_id, "tell s to close")?;
        Ok(())
    }

    fn close_tab(&self, pane_id: &str) -> Result<()> {
        self.on_session("close tab", pane_id, "tell t to close")?;
        Ok(())
    }
}

/// Script that locates a session by id and runs `body` on it
fn session_script(pane_id: &str, body: &str) -> String {
    let id = applescript_string(pane_id);
    format!(
        r#"
tell application "iTerm"
  repeat with w in windows
    repeat with t in tabs of w
      repeat with s in sessions of t
        if (id of s) is {id} then
        {body}
        return ""
        end if
      end repeat
    end repeat
  end repeat
  error "session not found: " & {id}
end tell
"#
    )
}

/// Parse the record stream produced by the enumeration script
///
/// Records are `window, tab index, session id, tab title, session name`.
/// Order of windows, tabs and sessions is preserved.
pub fn parse_enumeration(raw: &str) -> Result<Vec<WindowSnapshot>> {
    let mut windows: Vec<WindowSnapshot> = Vec::new();

    for record in raw.split(RECORD_SEP) {
        let record = record.trim_matches(|c| c == '\n' || c == '\r');
        if record.is_empty() {
            continue;
        }

        let fields: Vec<&str> = record.splitn(5, FIELD_SEP).collect();
        let [window_id, tab_index, pane_id, tab_title, pane_name] = fields[..] else {
            bail!("Malformed iTerm session record: {record:?}");
        };
        let tab_index: usize = tab_index
            .trim()
            .parse()
            .with_context(|| format!("Invalid tab index in record: {record:?}"))?;

        if windows.last().is_none_or(|w| w.id != window_id) {
            windows.push(WindowSnapshot {
                id: window_id.to_string(),
                tabs: Vec::new(),
            });
        }
        let Some(window) = windows.last_mut() else {
            continue;
        };

        if window.tabs.last().is_none_or(|t| t.index != tab_index) {
            window.tabs.push(TabSnapshot {
                index: tab_index,
                title: tab_title.to_string(),
                panes: Vec::new(),
            });
        }
        if let Some(tab) = window.tabs.last_mut() {
            tab.panes.push(PaneSnapshot {
                id: pane_id.to_string(),
                name: pane_name.to_string(),
            });
        }
    }

    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::super::applescript::MockScriptRunner;
    use super::*;
    use mockall::predicate::*;
    use std::time::Instant;

    fn record(fields: [&str; 5]) -> String {
        let mut s = fields.join(&FIELD_SEP.to_string());
        s.push(RECORD_SEP);
        s
    }

    #[test]
    fn test_parse_enumeration() {
        let raw = [
            record(["101", "1", "s-a", "alpha", "alpha"]),
            record(["101", "2", "s-b", "gamma", "alpha / beta"]),
            record(["101", "2", "s-c", "gamma", "gamma"]),
            record(["202", "1", "s-d", "zsh", "zsh"]),
        ]
        .concat();

        let windows = parse_enumeration(&raw).unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].id, "101");
        assert_eq!(windows[0].tabs.len(), 2);
        assert_eq!(windows[0].tabs[1].title, "gamma");
        assert_eq!(windows[0].tabs[1].panes.len(), 2);
        assert_eq!(windows[0].tabs[1].panes[0].name, "alpha / beta");
        assert_eq!(windows[1].tabs[0].panes[0].id, "s-d");
    }

    #[test]
    fn test_parse_enumeration_empty() {
        assert!(parse_enumeration("").unwrap().is_empty());
        assert!(parse_enumeration("\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_enumeration_malformed() {
        assert!(parse_enumeration("garbage\u{1e}").is_err());
        let bad_index = record(["1", "x", "s", "t", "n"]);
        assert!(parse_enumeration(&bad_index).is_err());
    }

    #[test]
    fn test_session_script_addresses_by_id() {
        let script = session_script("ABC-1", "tell s to close");
        assert!(script.contains(r#"if (id of s) is "ABC-1" then"#));
        assert!(script.contains("tell s to close"));
    }

    #[test]
    fn test_write_text_quotes_command() {
        let mut runner = MockScriptRunner::new();
        runner
            .expect_run()
            .with(function(|script: &str| {
                script.contains(r#"tell s to write text "cd '/w/a b' && \"quoted\"""#)
            }))
            .times(1)
            .returning(|_| Ok(String::new()));

        let bridge = ITermBridge::with_runner(runner, Duration::ZERO);
        bridge.write_text("s-1", r#"cd '/w/a b' && "quoted""#).unwrap();
    }

    #[test]
    fn test_create_tab_returns_session_id() {
        let mut runner = MockScriptRunner::new();
        runner
            .expect_run()
            .withf(|script| script.contains("create tab with default profile"))
            .returning(|_| Ok("NEW-SESSION\n".to_string()));

        let bridge = ITermBridge::with_runner(runner, Duration::ZERO);
        assert_eq!(bridge.create_tab().unwrap(), "NEW-SESSION");
    }

    #[test]
    fn test_split_returns_new_session_id() {
        let mut runner = MockScriptRunner::new();
        runner
            .expect_run()
            .withf(|script| script.contains("split vertically with default profile"))
            .returning(|_| Ok("SPLIT-1".to_string()));

        let bridge = ITermBridge::with_runner(runner, Duration::ZERO);
        assert_eq!(bridge.split_vertically("s-1").unwrap(), "SPLIT-1");
    }

    #[test]
    fn test_split_without_session_id_fails() {
        let mut runner = MockScriptRunner::new();
        runner.expect_run().returning(|_| Ok("\n".to_string()));

        let bridge = ITermBridge::with_runner(runner, Duration::ZERO);
        let err = bridge.split_vertically("s-1").unwrap_err();
        assert!(err.to_string().contains("did not report the split session"));
    }

    #[test]
    fn test_write_and_focus_wait_for_settle() {
        let settle = Duration::from_millis(40);
        let mut runner = MockScriptRunner::new();
        runner.expect_run().times(2).returning(|_| Ok(String::new()));
        let bridge = ITermBridge::with_runner(runner, settle);

        let started = Instant::now();
        bridge.write_text("s-1", "ls").unwrap();
        assert!(started.elapsed() >= settle);

        let started = Instant::now();
        bridge.focus_pane("s-1").unwrap();
        assert!(started.elapsed() >= settle);
    }

    #[test]
    fn test_enumeration_lists_current_window_first() {
        let current = ENUMERATE_SCRIPT.find("id of current window").unwrap();
        let scan = ENUMERATE_SCRIPT.find("repeat with w in orderedWindows").unwrap();
        assert!(current < scan);
        assert!(ENUMERATE_SCRIPT.contains("set beginning of orderedWindows"));
    }

    #[test]
    fn test_close_failure_is_reported() {
        let mut runner = MockScriptRunner::new();
        runner
            .expect_run()
            .returning(|_| Err(anyhow::anyhow!("session not found: s-9")));

        let bridge = ITermBridge::with_runner(runner, Duration::ZERO);
        assert!(bridge.close_pane("s-9").is_err());
    }
}
