//! Status command implementation

use crate::commands::init::check_xlaude_cli;
use anyhow::Result;
use std::io::{self, Write};
use std::path::PathBuf;
use xlaunch::config::CONFIG_FILE_NAME;
use xlaunch::{Config, debug};

/// Run the status command
pub fn run_status(config: &Config) -> Result<()> {
    println!("xlaunch Environment Status\n");

    print!("⚙️  Configuration: ");
    io::stdout().flush().ok();
    let local = PathBuf::from(CONFIG_FILE_NAME);
    match Config::global_path() {
        _ if local.exists() => println!("✅ {}", local.display()),
        Some(global) if global.exists() => println!("✅ {}", global.display()),
        _ => println!("⚠️  Using defaults"),
    }

    print!("📂 Default repository: ");
    io::stdout().flush().ok();
    match config.default_repo_path {
        Some(ref repo) if repo.join(".git").exists() => println!("✅ {}", repo.display()),
        Some(ref repo) => println!("⚠️  {} (not a git repository)", repo.display()),
        None => println!("❌ Not set"),
    }

    println!("🖥  Terminal: {}", config.terminal.application_name());
    let placement = config.placement();
    if placement.split_panes_enabled {
        println!("   Split panes: up to {} per tab", placement.max_panes_per_tab);
    } else if config.use_split_panes {
        println!("   Split panes: not supported by this terminal");
    } else {
        println!("   Split panes: off");
    }

    println!();
    check_xlaude_cli(config);

    if cfg!(debug_assertions) {
        println!("\n📝 Debug log: {}", debug::log_path().display());
    }

    println!();
    println!("Run 'xlaunch init' to create the configuration file.");

    Ok(())
}
