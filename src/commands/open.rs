//! Open command implementation

use super::launch_session;
use anyhow::{Result, bail};
use xlaunch::parser::{known_names, sort_by_recency};
use xlaunch::terminal::TerminalLauncher;
use xlaunch::{BestEffort, Config, PickerResult, XlaudeClient, run_picker};

/// Run the open command
pub fn run_open(config: &Config, name: Option<String>) -> Result<()> {
    let client = XlaudeClient::from_config(config);
    let mut worktrees = client.list_worktrees();
    let known = known_names(&worktrees);

    let (name, directory) = match name {
        Some(name) => {
            let listed = worktrees
                .iter()
                .find(|w| w.name == name)
                .map(|w| w.path.clone());
            match listed.or_else(|| client.dir(&name)) {
                Some(dir) => (name, dir),
                None => bail!("Worktree '{name}' not found. Run 'xlaunch list' to see worktrees."),
            }
        }
        None => {
            if worktrees.is_empty() {
                bail!("No worktrees found. Create one with 'xlaunch create'.");
            }
            sort_by_recency(&mut worktrees);
            match run_picker(worktrees)? {
                PickerResult::Selected(wt) => (wt.name, wt.path),
                PickerResult::Cancel => return Ok(()),
            }
        }
    };

    let launcher = TerminalLauncher::new(config);
    match launch_session(&client, &launcher, &directory, &name, &known) {
        BestEffort::Failed(e) => bail!(
            "Failed to open '{name}' in {}: {e}",
            config.terminal.application_name()
        ),
        _ => {
            println!("Opened {name} ({})", directory.display());
            Ok(())
        }
    }
}
