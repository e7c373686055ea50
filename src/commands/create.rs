//! Create and ticket command implementations

use super::{LaunchOutcome, open_created};
use anyhow::{Result, bail};
use xlaunch::terminal::{Launcher, TerminalLauncher};
use xlaunch::{Config, Executor, XlaudeClient};

/// Run the create command
pub fn run_create(config: &Config, name: Option<String>, no_open: bool) -> Result<()> {
    config.require_repo_path()?;
    let name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    create_and_open(
        &XlaudeClient::from_config(config),
        &TerminalLauncher::new(config),
        name.as_deref(),
        None,
        no_open,
    )?;
    Ok(())
}

/// Run the ticket command: a worktree named after the ticket, labelled with it
pub fn run_ticket(config: &Config, ticket_id: &str) -> Result<()> {
    let ticket_id = ticket_id.trim();
    if ticket_id.is_empty() {
        bail!("Ticket ID is required");
    }
    config.require_repo_path()?;
    create_and_open(
        &XlaudeClient::from_config(config),
        &TerminalLauncher::new(config),
        Some(ticket_id),
        Some(ticket_id),
        false,
    )?;
    Ok(())
}

fn create_and_open<E: Executor, L: Launcher>(
    client: &XlaudeClient<E>,
    launcher: &L,
    name: Option<&str>,
    label: Option<&str>,
    no_open: bool,
) -> Result<LaunchOutcome> {
    println!("Creating worktree...");
    let result = client.create(name);
    if !result.success {
        bail!("Failed to create worktree: {}", result.message);
    }
    if !result.message.is_empty() {
        println!("{}", result.message);
    }
    if no_open {
        return Ok(LaunchOutcome::NotRequested);
    }

    Ok(open_created(client, launcher, &result.message, label, name))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_ticket_id_required() {
        let err = run_ticket(&Config::default(), "   ").unwrap_err();
        assert_eq!(err.to_string(), "Ticket ID is required");
    }

    #[test]
    fn test_create_requires_repo_path() {
        let err = run_create(&Config::default(), None, true).unwrap_err();
        assert!(err.to_string().contains("Default repository path not set"));
    }

    #[test]
    fn test_launch_failure_still_succeeds() {
        let mut executor = MockExec::new();
        executor
            .expect_execute()
            .withf(|inv| inv.args == ["create", "beta"])
            .times(1)
            .returning(|_| Ok(ok("Created worktree at /w/app-beta")));
        executor
            .expect_execute()
            .withf(|inv| inv.args == ["list", "--json"])
            .returning(|_| Ok(ok(LISTING)));
        let mut launcher = MockLaunch::new();
        launcher
            .expect_open()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("iTerm is not running")));

        let outcome = create_and_open(&client(executor), &launcher, Some("beta"), None, false)
            .unwrap();
        match outcome {
            LaunchOutcome::LaunchFailed(e) => assert!(e.contains("iTerm is not running")),
            other => panic!("Expected LaunchFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_created_without_path_is_not_opened() {
        let mut executor = MockExec::new();
        executor
            .expect_execute()
            .withf(|inv| inv.args == ["create"])
            .times(1)
            .returning(|_| Ok(ok("Worktree ready")));
        let mut launcher = MockLaunch::new();
        launcher.expect_open().never();

        let outcome = create_and_open(&client(executor), &launcher, None, None, false).unwrap();
        assert_eq!(outcome, LaunchOutcome::PathNotFound);
    }

    #[test]
    fn test_ticket_label_is_ticket_id() {
        let mut executor = MockExec::new();
        executor
            .expect_execute()
            .withf(|inv| inv.args == ["create", "JIRA-7"])
            .returning(|_| Ok(ok("Created worktree at /w/app-jira-7")));
        executor
            .expect_execute()
            .withf(|inv| inv.args == ["list", "--json"])
            .returning(|_| Ok(ok(LISTING)));
        let mut launcher = MockLaunch::new();
        launcher
            .expect_open()
            .withf(|request, _| request.label.as_deref() == Some("JIRA-7"))
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = create_and_open(
            &client(executor),
            &launcher,
            Some("JIRA-7"),
            Some("JIRA-7"),
            false,
        )
        .unwrap();
        assert_eq!(outcome, LaunchOutcome::Opened("JIRA-7".to_string()));
    }

    #[test]
    fn test_create_failure_is_an_error() {
        let mut executor = MockExec::new();
        executor
            .expect_execute()
            .returning(|_| Ok(fail("branch 'beta' already exists")));
        let launcher = MockLaunch::new();

        let err = create_and_open(&client(executor), &launcher, Some("beta"), None, false)
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_no_open_skips_launch() {
        let mut executor = MockExec::new();
        executor
            .expect_execute()
            .times(1)
            .returning(|_| Ok(ok("Created worktree at /w/app-beta")));
        let mut launcher = MockLaunch::new();
        launcher.expect_open().never();

        let outcome = create_and_open(&client(executor), &launcher, None, None, true).unwrap();
        assert_eq!(outcome, LaunchOutcome::NotRequested);
    }
}
