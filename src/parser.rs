//! Parsing of xlaude output
//!
//! `xlaude list --json` is parsed into [`WorktreeRecord`]s; the free-text
//! output of `create`/`checkout` is scraped for the new worktree path.
//! The scraping is heuristic: it follows the current wording of xlaude's
//! messages and fails soft when that wording changes.

use crate::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Summary of a Claude session inside a worktree
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct SessionSummary {
    #[serde(default)]
    pub last_user_message: Option<String>,
    /// Human readable recency, e.g. "5 minutes ago"
    #[serde(default)]
    pub time_ago: Option<String>,
}

/// Summary of a Codex session inside a worktree
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct CodexSessionSummary {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub last_user_message: Option<String>,
    #[serde(default)]
    pub time_ago: Option<String>,
}

/// One worktree as reported by xlaude
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorktreeRecord {
    pub name: String,
    pub branch: String,
    pub path: PathBuf,
    pub repo_name: String,
    pub created_at: String,
    /// Most recent first, as provided
    #[serde(default)]
    pub sessions: Vec<SessionSummary>,
    #[serde(default)]
    pub codex_sessions: Vec<CodexSessionSummary>,
}

#[derive(Debug, Deserialize)]
struct ListOutput {
    #[serde(default)]
    worktrees: Vec<WorktreeRecord>,
}

/// Parse `xlaude list --json` output; malformed input yields an empty list
pub fn parse_listing(raw: &str) -> Vec<WorktreeRecord> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<ListOutput>(raw) {
        Ok(output) => output.worktrees,
        Err(e) => {
            debug::log_category("PARSE", &format!("invalid listing JSON: {e}"));
            Vec::new()
        }
    }
}

static AT_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bat\s+(/\S+)").expect("valid regex"));
static CREATED_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)created.*?(/\S+)").expect("valid regex"));
static WORKTREE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(/\S*worktree\S*)").expect("valid regex"));
static HOME_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"((?:/Users|/home)/\S+)").expect("valid regex"));

/// Extract the worktree path from create/checkout output
///
/// Tried in order: `at <path>`, `created ... <path>`, any absolute path
/// mentioning "worktree", any path under a home directory.
pub fn extract_worktree_path(raw: &str) -> Option<PathBuf> {
    [&*AT_PATH, &*CREATED_PATH, &*WORKTREE_PATH, &*HOME_PATH]
        .iter()
        .find_map(|re| re.captures(raw))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Worktree name derived from its directory (last path component)
pub fn worktree_name_from_path(path: &Path) -> Option<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
}

impl WorktreeRecord {
    /// Claude and Codex sessions combined
    pub fn session_count(&self) -> usize {
        self.sessions.len() + self.codex_sessions.len()
    }

    /// Recency of the latest Claude session, if reported
    pub fn latest_time_ago(&self) -> Option<&str> {
        self.sessions.first().and_then(|s| s.time_ago.as_deref())
    }

    /// "No sessions", "2 sessions" or "2 sessions • Last: 5 minutes ago"
    pub fn session_info(&self) -> String {
        let total = self.session_count();
        if total == 0 {
            return "No sessions".to_string();
        }
        let count = format!("{} session{}", total, if total > 1 { "s" } else { "" });
        match self.latest_time_ago() {
            Some(time_ago) => format!("{count} • Last: {time_ago}"),
            None => count,
        }
    }

    /// Last user message of the latest session, truncated to `limit` characters
    pub fn last_message(&self, limit: usize) -> Option<String> {
        let msg = self.sessions.first()?.last_user_message.as_deref()?;
        if msg.chars().count() > limit {
            Some(format!("{}...", msg.chars().take(limit).collect::<String>()))
        } else {
            Some(msg.to_string())
        }
    }
}

/// Order worktrees with a reported session recency first
///
/// Only presence vs. absence of `time_ago` is compared; the sort is
/// stable so the listing order is otherwise kept.
pub fn sort_by_recency(worktrees: &mut [WorktreeRecord]) {
    worktrees.sort_by_key(|w| w.latest_time_ago().is_none_or(str::is_empty));
}

/// Group worktrees by repository, keeping first-seen repository order
pub fn group_by_repo(worktrees: &[WorktreeRecord]) -> Vec<(String, Vec<&WorktreeRecord>)> {
    let mut groups: Vec<(String, Vec<&WorktreeRecord>)> = Vec::new();
    for wt in worktrees {
        let repo = if wt.repo_name.is_empty() {
            "Unknown"
        } else {
            wt.repo_name.as_str()
        };
        match groups.iter_mut().find(|(name, _)| name == repo) {
            Some((_, members)) => members.push(wt),
            None => groups.push((repo.to_string(), vec![wt])),
        }
    }
    groups
}

/// Names of all worktrees, used to recognise tabs owned by xlaunch
pub fn known_names(worktrees: &[WorktreeRecord]) -> Vec<String> {
    worktrees.iter().map(|w| w.name.clone()).collect()
}
