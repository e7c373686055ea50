mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use xlaunch::debug;

fn main() -> Result<()> {
    debug::init();

    let Cli {
        repo,
        terminal,
        command,
    } = Cli::parse();
    let load = || commands::load_config(repo.clone(), terminal);

    match command {
        Commands::Init { force } => commands::run_init(force),
        Commands::Status => commands::run_status(&load()?),
        Commands::List { json } => commands::run_list(&load()?, json),
        Commands::Open { name } => commands::run_open(&load()?, name),
        Commands::Create { name, no_open } => commands::run_create(&load()?, name, no_open),
        Commands::Ticket { ticket_id } => commands::run_ticket(&load()?, &ticket_id),
        Commands::Checkout { target, no_open } => {
            commands::run_checkout(&load()?, &target, no_open)
        }
        Commands::Delete { name, yes } => commands::run_delete(&load()?, &name, yes),
        Commands::DeleteAll { yes } => commands::run_delete_all(&load()?, yes),
        Commands::Dir { name } => commands::run_dir(&load()?, &name),
    }
}
