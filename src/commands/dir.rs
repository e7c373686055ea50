//! Dir command implementation

use anyhow::{Result, bail};
use xlaunch::{Config, XlaudeClient};

/// Print the directory of a worktree
pub fn run_dir(config: &Config, name: &str) -> Result<()> {
    let client = XlaudeClient::from_config(config);

    let directory = client.dir(name).or_else(|| {
        client
            .list_worktrees()
            .into_iter()
            .find(|w| w.name == name)
            .map(|w| w.path)
    });

    match directory {
        Some(dir) => {
            println!("{}", dir.display());
            Ok(())
        }
        None => bail!("Worktree '{name}' not found"),
    }
}
