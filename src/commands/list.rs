//! List command implementation

use anyhow::{Context, Result};
use std::fmt::Write;
use xlaunch::parser::{group_by_repo, sort_by_recency};
use xlaunch::{Config, WorktreeRecord, XlaudeClient};

const MESSAGE_PREVIEW_CHARS: usize = 60;

/// Run the list command
pub fn run_list(config: &Config, json: bool) -> Result<()> {
    let mut worktrees = XlaudeClient::from_config(config).list_worktrees();

    if json {
        let out = serde_json::to_string_pretty(&worktrees)
            .context("Failed to serialize worktrees")?;
        println!("{out}");
        return Ok(());
    }

    if worktrees.is_empty() {
        println!("No worktrees found");
        return Ok(());
    }

    sort_by_recency(&mut worktrees);
    print!("{}", format_listing(&worktrees));
    Ok(())
}

/// Worktrees grouped by repository, one block per worktree
fn format_listing(worktrees: &[WorktreeRecord]) -> String {
    let mut out = String::new();

    for (repo, members) in group_by_repo(worktrees) {
        let _ = writeln!(out, "{repo}");
        for wt in members {
            let _ = writeln!(out, "  {} [{}]", wt.name, wt.branch);
            let _ = writeln!(out, "    {}", wt.session_info());
            if let Some(msg) = wt.last_message(MESSAGE_PREVIEW_CHARS) {
                let _ = writeln!(out, "    \"{msg}\"");
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use xlaunch::parse_listing;

    #[test]
    fn test_format_listing() {
        let worktrees = parse_listing(
            r#"{"worktrees": [
              {"name": "alpha", "branch": "feat", "path": "/w/a", "repo_name": "app", "created_at": "",
               "sessions": [{"last_user_message": "add tests", "time_ago": "2 hours ago"}]},
              {"name": "beta", "branch": "beta", "path": "/w/b", "repo_name": "", "created_at": ""}
            ]}"#,
        );

        let out = format_listing(&worktrees);
        assert_eq!(
            out,
            "app\n  alpha [feat]\n    1 session • Last: 2 hours ago\n    \"add tests\"\n\
             Unknown\n  beta [beta]\n    No sessions\n"
        );
    }
}
