//! Configuration file support for xlaunch
//!
//! Handles `.xlaunch.toml` (current directory) and
//! `~/.config/xlaunch/config.toml` loading and saving.

use crate::terminal::placement::PlacementConfig;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Project-local configuration file name
pub const CONFIG_FILE_NAME: &str = ".xlaunch.toml";

/// Bounds for `max_panes_per_tab`
pub const MIN_PANES_PER_TAB: u8 = 2;
pub const MAX_PANES_PER_TAB: u8 = 4;

/// Terminal application used to open worktrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum TerminalApp {
    /// iTerm2 (scripted tabs, split panes, teardown)
    #[default]
    #[serde(rename = "iterm")]
    #[value(name = "iterm")]
    ITerm,
    /// macOS Terminal.app
    #[serde(rename = "terminal")]
    #[value(name = "terminal")]
    AppleTerminal,
    /// Warp (keystroke automation)
    #[serde(rename = "warp")]
    #[value(name = "warp")]
    Warp,
    /// kitty (keystroke automation)
    #[serde(rename = "kitty")]
    #[value(name = "kitty")]
    Kitty,
}

impl TerminalApp {
    /// Application name as addressed by AppleScript
    pub fn application_name(&self) -> &'static str {
        match self {
            TerminalApp::ITerm => "iTerm",
            TerminalApp::AppleTerminal => "Terminal",
            TerminalApp::Warp => "Warp",
            TerminalApp::Kitty => "kitty",
        }
    }

    /// Whether the split-pane placement workflow is available
    pub fn supports_split_panes(&self) -> bool {
        matches!(self, TerminalApp::ITerm)
    }

    /// Whether tabs/panes can be closed by script on delete
    pub fn supports_teardown(&self) -> bool {
        matches!(self, TerminalApp::ITerm)
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the xlaude binary (unset: ~/.cargo/bin/xlaude, then PATH)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xlaude_path: Option<PathBuf>,

    /// Repository where worktrees are created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_repo_path: Option<PathBuf>,

    /// Terminal application: "iterm", "terminal", "warp", "kitty"
    #[serde(default)]
    pub terminal: TerminalApp,

    /// Open worktrees as split panes of an existing tab (iTerm only)
    #[serde(default)]
    pub use_split_panes: bool,

    /// Maximum number of split panes per tab (2-4)
    #[serde(default = "default_max_panes_per_tab")]
    pub max_panes_per_tab: u8,
}

fn default_max_panes_per_tab() -> u8 {
    MIN_PANES_PER_TAB
}

impl Default for Config {
    fn default() -> Self {
        Self {
            xlaude_path: None,
            default_repo_path: None,
            terminal: TerminalApp::default(),
            use_split_panes: false,
            max_panes_per_tab: default_max_panes_per_tab(),
        }
    }
}

impl Config {
    /// Load configuration (returns default if no file is found)
    ///
    /// Searches `.xlaunch.toml` in the current directory, then the
    /// global config file.
    pub fn load() -> Result<Self> {
        let local_path = PathBuf::from(CONFIG_FILE_NAME);
        if local_path.exists() {
            return Self::load_from(&local_path);
        }

        match Self::global_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from specified path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config.normalized())
    }

    /// Save configuration to specified path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default(path: &Path) -> Result<()> {
        Config::default().save_to(path)
    }

    /// Global configuration file (`~/.config/xlaunch/config.toml`)
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("xlaunch").join("config.toml"))
    }

    /// Expand `~/` prefixes and clamp out-of-range values
    fn normalized(mut self) -> Self {
        self.xlaude_path = self.xlaude_path.map(|p| expand_path(&p));
        self.default_repo_path = self.default_repo_path.map(|p| expand_path(&p));
        self.max_panes_per_tab = self
            .max_panes_per_tab
            .clamp(MIN_PANES_PER_TAB, MAX_PANES_PER_TAB);
        self
    }

    /// Default repository path, or a configuration error telling the user how to set it
    pub fn require_repo_path(&self) -> Result<&Path> {
        self.default_repo_path.as_deref().ok_or_else(|| {
            let location = Self::global_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| CONFIG_FILE_NAME.to_string());
            anyhow!(
                "Default repository path not set.\n\
                 Set `default_repo_path` in {location} (run `xlaunch init` to create it) \
                 or pass --repo <path>."
            )
        })
    }

    /// Placement settings for the split-pane engine
    pub fn placement(&self) -> PlacementConfig {
        PlacementConfig {
            split_panes_enabled: self.use_split_panes && self.terminal.supports_split_panes(),
            max_panes_per_tab: usize::from(
                self.max_panes_per_tab
                    .clamp(MIN_PANES_PER_TAB, MAX_PANES_PER_TAB),
            ),
        }
    }
}

/// Expand a leading `~/` to the home directory
pub fn expand_path(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.xlaude_path.is_none());
        assert!(config.default_repo_path.is_none());
        assert_eq!(config.terminal, TerminalApp::ITerm);
        assert!(!config.use_split_panes);
        assert_eq!(config.max_panes_per_tab, 2);
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
xlaude_path = "/opt/bin/xlaude"
default_repo_path = "/src/app"
terminal = "kitty"
use_split_panes = true
max_panes_per_tab = 3
"#
        )
        .unwrap();

        let config = Config::load_from(temp_file.path()).unwrap();

        assert_eq!(config.xlaude_path, Some(PathBuf::from("/opt/bin/xlaude")));
        assert_eq!(config.default_repo_path, Some(PathBuf::from("/src/app")));
        assert_eq!(config.terminal, TerminalApp::Kitty);
        assert!(config.use_split_panes);
        assert_eq!(config.max_panes_per_tab, 3);
    }

    #[test]
    fn test_partial_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, r#"terminal = "warp""#).unwrap();

        let config = Config::load_from(temp_file.path()).unwrap();

        assert_eq!(config.terminal, TerminalApp::Warp);
        assert!(config.default_repo_path.is_none());
        assert_eq!(config.max_panes_per_tab, 2);
    }

    #[test]
    fn test_max_panes_clamped() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "max_panes_per_tab = 9").unwrap();
        let config = Config::load_from(temp_file.path()).unwrap();
        assert_eq!(config.max_panes_per_tab, 4);

        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "max_panes_per_tab = 0").unwrap();
        let config = Config::load_from(temp_file.path()).unwrap();
        assert_eq!(config.max_panes_per_tab, 2);
    }

    #[test]
    fn test_unknown_terminal_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, r#"terminal = "alacritty""#).unwrap();

        assert!(Config::load_from(temp_file.path()).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            default_repo_path: Some(PathBuf::from("/work/repo")),
            terminal: TerminalApp::AppleTerminal,
            use_split_panes: true,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_repo_path, Some(PathBuf::from("/work/repo")));
        assert_eq!(loaded.terminal, TerminalApp::AppleTerminal);
        assert!(loaded.use_split_panes);
        assert!(loaded.xlaude_path.is_none());
    }

    #[test]
    fn test_generate_default() {
        let temp_file = NamedTempFile::new().unwrap();
        Config::generate_default(temp_file.path()).unwrap();

        let loaded = Config::load_from(temp_file.path()).unwrap();
        assert_eq!(loaded.terminal, TerminalApp::ITerm);
        assert_eq!(loaded.max_panes_per_tab, 2);
    }

    #[test]
    fn test_require_repo_path() {
        let mut config = Config::default();
        let err = config.require_repo_path().unwrap_err();
        assert!(err.to_string().contains("Default repository path not set"));

        config.default_repo_path = Some(PathBuf::from("/repo"));
        assert_eq!(config.require_repo_path().unwrap(), Path::new("/repo"));
    }

    #[test]
    fn test_placement_split_only_for_iterm() {
        let mut config = Config {
            use_split_panes: true,
            max_panes_per_tab: 3,
            ..Config::default()
        };
        let placement = config.placement();
        assert!(placement.split_panes_enabled);
        assert_eq!(placement.max_panes_per_tab, 3);

        config.terminal = TerminalApp::Warp;
        assert!(!config.placement().split_panes_enabled);
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path(Path::new("/abs/path")), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path(Path::new("~/repos/app")), home.join("repos/app"));
        }
    }

    #[test]
    fn test_terminal_capabilities() {
        assert!(TerminalApp::ITerm.supports_split_panes());
        assert!(TerminalApp::ITerm.supports_teardown());
        assert!(!TerminalApp::Kitty.supports_split_panes());
        assert!(!TerminalApp::AppleTerminal.supports_teardown());
        assert_eq!(TerminalApp::Kitty.application_name(), "kitty");
    }

    #[test]
    #[serial]
    fn test_load_prefers_local_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "terminal = \"kitty\"\nmax_panes_per_tab = 3\n",
        )
        .unwrap();

        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(temp_dir.path()).unwrap();
        let loaded = Config::load();
        std::env::set_current_dir(original_dir).unwrap();

        let config = loaded.unwrap();
        assert_eq!(config.terminal, TerminalApp::Kitty);
        assert_eq!(config.max_panes_per_tab, 3);
    }
}
