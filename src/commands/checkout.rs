//! Checkout command implementation

use super::{LaunchOutcome, open_created};
use anyhow::{Result, bail};
use xlaunch::terminal::{Launcher, TerminalLauncher};
use xlaunch::{Config, Executor, XlaudeClient};

/// Run the checkout command
pub fn run_checkout(config: &Config, target: &str, no_open: bool) -> Result<()> {
    let target = target.trim();
    if target.is_empty() {
        bail!("Branch name or PR number is required");
    }
    config.require_repo_path()?;

    checkout_and_open(
        &XlaudeClient::from_config(config),
        &TerminalLauncher::new(config),
        target,
        no_open,
    )?;
    Ok(())
}

fn checkout_and_open<E: Executor, L: Launcher>(
    client: &XlaudeClient<E>,
    launcher: &L,
    target: &str,
    no_open: bool,
) -> Result<LaunchOutcome> {
    println!("Checking out {target}...");
    let result = client.checkout(target);
    if !result.success {
        bail!("{}", result.message);
    }
    if !result.message.is_empty() {
        println!("{}", result.message);
    }
    if no_open {
        return Ok(LaunchOutcome::NotRequested);
    }

    Ok(open_created(client, launcher, &result.message, None, Some(target)))
}
