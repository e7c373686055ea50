//! AppleScript execution through `osascript`

use crate::debug;
use anyhow::{Context, Result, bail};
use std::process::Command;

#[cfg(test)]
use mockall::automock;

/// Trait for running AppleScript (allows mocking)
#[cfg_attr(test, automock)]
pub trait ScriptRunner {
    /// Run a script and return its trimmed result
    fn run(&self, script: &str) -> Result<String>;
}

/// Real runner using `osascript -e`
#[derive(Debug, Clone, Copy, Default)]
pub struct Osascript;

impl ScriptRunner for Osascript {
    fn run(&self, script: &str) -> Result<String> {
        let output = Command::new("osascript")
            .arg("-e")
            .arg(script)
            .output()
            .context("Failed to execute osascript")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            debug::log_terminal("osascript error", &stderr);
            bail!("AppleScript error: {}", stderr);
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end_matches('\n').to_string())
    }
}

/// Quote a string as an AppleScript literal
pub fn applescript_string(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '\\' => quoted.push_str(r"\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str(r"\n"),
            '\r' => quoted.push_str(r"\r"),
            '\t' => quoted.push_str(r"\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
