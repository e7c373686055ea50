//! Init command implementation

use anyhow::Result;
use std::io::{self, Write};
use std::path::PathBuf;
use xlaunch::Config;
use xlaunch::config::CONFIG_FILE_NAME;
use xlaunch::runner::{Invocation, SystemExecutor, resolve_executable, run};

/// Run the init command
pub fn run_init(force: bool) -> Result<()> {
    println!("🚀 Initializing xlaunch...\n");

    let config_path = Config::global_path().unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    if !config_path.exists() || force {
        Config::generate_default(&config_path)?;
        println!("✅ Created configuration: {}", config_path.display());
    } else {
        println!(
            "📄 Configuration already exists: {} (use --force to overwrite)",
            config_path.display()
        );
    }

    println!("\n---\n");
    check_xlaude_cli(&Config::load().unwrap_or_default());

    println!("\n🎉 xlaunch initialization complete!");
    println!("\nNext steps:");
    println!("  1. Set default_repo_path in {}", config_path.display());
    println!("  2. Pick your terminal: iterm, terminal, warp or kitty");
    println!("  3. Run 'xlaunch create' to start a worktree");

    Ok(())
}

/// Check that the xlaude executable resolves and runs
pub fn check_xlaude_cli(config: &Config) {
    print!("🤖 xlaude CLI: ");
    io::stdout().flush().ok();

    let executable = resolve_executable(config.xlaude_path.as_deref(), dirs::home_dir().as_deref());
    let result = run(&SystemExecutor, &Invocation::new(&executable).arg("--version"));

    if result.success {
        println!("✅ {} ({})", result.message, executable.display());
    } else {
        println!("❌ Not found ({})", executable.display());
        println!("   Install xlaude: cargo install xlaude");
        println!("   or set xlaude_path in the configuration file");
    }
}
