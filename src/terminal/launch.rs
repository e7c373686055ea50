//! Opening and closing worktree sessions in the configured terminal

use super::applescript::{Osascript, ScriptRunner, applescript_string};
use super::bridge::TerminalBridge;
use super::iterm::ITermBridge;
use super::matcher::SubstringMatcher;
use super::placement::{Placement, PlacementRequest, place};
use super::script::cd_command;
use super::teardown::{TeardownReport, close_sessions_for_name};
use crate::best_effort::BestEffort;
use crate::config::{Config, TerminalApp};
use crate::debug;
use anyhow::{Context, Result};

/// Open `request` in the configured terminal
///
/// iTerm goes through the placement engine (split panes when enabled);
/// the other terminals always get a new tab.
pub fn open_in_terminal(
    config: &Config,
    request: &PlacementRequest,
    known_names: &[String],
) -> Result<()> {
    match config.terminal {
        TerminalApp::ITerm => {
            let placement = place(
                &ITermBridge::new(),
                &SubstringMatcher,
                request,
                known_names,
                &config.placement(),
            )?;
            if let Placement::Split { combined_title, .. } = placement {
                debug::log_terminal("split into", &combined_title);
            }
            Ok(())
        }
        other => open_with_script(&Osascript, other, request),
    }
}

/// Open a new tab in Terminal.app, Warp or kitty
pub fn open_with_script<R: ScriptRunner + ?Sized>(
    runner: &R,
    terminal: TerminalApp,
    request: &PlacementRequest,
) -> Result<()> {
    let script = match terminal {
        TerminalApp::AppleTerminal => apple_terminal_script(request),
        // Warp has no title support through keystrokes.
        TerminalApp::Warp => keystroke_script(
            terminal.application_name(),
            &cd_command(&request.directory, request.command.as_deref()),
        ),
        TerminalApp::Kitty | TerminalApp::ITerm => {
            keystroke_script(terminal.application_name(), &request.shell_line())
        }
    };

    runner
        .run(&script)
        .with_context(|| format!("Failed to open {}", terminal.application_name()))?;
    Ok(())
}

/// Terminal.app: run in a new window and set its custom title
pub fn apple_terminal_script(request: &PlacementRequest) -> String {
    let command = cd_command(&request.directory, request.command.as_deref());
    let set_title = request
        .label
        .as_deref()
        .filter(|l| !l.is_empty())
        .map(|l| format!("set custom title of front window to {}", applescript_string(l)))
        .unwrap_or_default();

    format!(
        r#"
tell application "Terminal"
  activate
  do script {command}
  {set_title}
end tell
"#,
        command = applescript_string(&command),
    )
}

/// ⌘T followed by typing the command, via System Events
pub fn keystroke_script(application: &str, command: &str) -> String {
    let app = applescript_string(application);
    format!(
        r#"
tell application {app}
  activate
  delay 0.3
  tell application "System Events"
    tell process {app}
      keystroke "t" using command down
      delay 0.2
      keystroke {command}
      keystroke return
    end tell
  end tell
end tell
"#,
        command = applescript_string(command),
    )
}

/// Close the terminal sessions of a worktree that is about to be deleted
///
/// Skipped for terminals without scripted teardown.
pub fn close_worktree_sessions(config: &Config, worktree_name: &str) -> BestEffort {
    if !config.terminal.supports_teardown() {
        return BestEffort::skipped(format!(
            "{} does not support closing sessions",
            config.terminal.application_name()
        ));
    }
    close_with_bridge(&ITermBridge::new(), worktree_name)
}

/// Teardown through `bridge`; `Failed` when any close did not go through
pub fn close_with_bridge<B: TerminalBridge + ?Sized>(bridge: &B, worktree_name: &str) -> BestEffort {
    let TeardownReport {
        closed_panes,
        closed_tabs,
        failures,
    } = close_sessions_for_name(bridge, &SubstringMatcher, worktree_name);
    let summary = format!("{closed_panes} panes, {closed_tabs} tabs, {failures} failures");
    debug::log_terminal("teardown result", &summary);

    if failures > 0 {
        BestEffort::Failed(summary)
    } else {
        BestEffort::Done
    }
}

/// Opens and closes worktree sessions in a terminal
pub trait Launcher {
    fn open(&self, request: &PlacementRequest, known_names: &[String]) -> Result<()>;

    fn close_sessions(&self, worktree_name: &str) -> BestEffort;
}

/// [`Launcher`] for the configured terminal application
pub struct TerminalLauncher<'a> {
    config: &'a Config,
}

impl<'a> TerminalLauncher<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl Launcher for TerminalLauncher<'_> {
    fn open(&self, request: &PlacementRequest, known_names: &[String]) -> Result<()> {
        open_in_terminal(self.config, request, known_names)
    }

    fn close_sessions(&self, worktree_name: &str) -> BestEffort {
        close_worktree_sessions(self.config, worktree_name)
    }
}
