//! timereg library root.
//! Exposes the CLI parser, the high-level run() function, and internal modules.

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::User { .. } => cli::commands::user::handle(&cli.command, cfg),
        Commands::Location { .. } => cli::commands::location::handle(&cli.command, cfg),
        Commands::Schedule { .. } => cli::commands::schedule::handle(&cli.command, cfg),
        Commands::Overtime { .. } => cli::commands::overtime::handle(&cli.command, cfg),
        Commands::Settings { .. } => cli::commands::settings::handle(&cli.command, cfg),
        Commands::ClockIn { .. } | Commands::ClockOut { .. } | Commands::Status { .. } => {
            cli::commands::clock::handle(&cli.command, cfg)
        }
        Commands::Add { .. }
        | Commands::Edit { .. }
        | Commands::Show { .. }
        | Commands::List { .. }
        | Commands::Team { .. }
        | Commands::Recent { .. }
        | Commands::Approve { .. }
        | Commands::Reject { .. }
        | Commands::Del { .. } => cli::commands::registration::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once per invocation
    let mut cfg = Config::load()?;

    // command line overrides
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(pid) = &cli.as_user {
        cfg.current_user = Some(pid.clone());
    }

    dispatch(&cli, &cfg)
}
