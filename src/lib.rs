//! EnviroSage library root.
//! Fleet core (status, store, search, session gate), local adapters and the
//! command-line front end.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod logging;
pub mod models;
pub mod ports;
pub mod storage;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::context::AppContext;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use utils::path::absolutize;

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, &cfg),
        command => {
            let ctx = AppContext::open(cfg)?;
            match command {
                Commands::Seed { .. } => cli::commands::seed::handle(command, &ctx).await,
                Commands::Register { .. } => cli::commands::register::handle(command, &ctx).await,
                Commands::Login { .. } => cli::commands::login::handle(command, &ctx).await,
                Commands::Logout => cli::commands::logout::handle(&ctx).await,
                Commands::Whoami => cli::commands::whoami::handle(&ctx).await,
                Commands::Bins { .. } => cli::commands::bins::handle(command, &ctx).await,
                Commands::Driver => cli::commands::driver::handle(&ctx).await,
                Commands::Export { .. } => cli::commands::export::handle(command, &ctx).await,
                Commands::Log { .. } => cli::commands::log::handle(command, &ctx).await,
                Commands::Init | Commands::Config { .. } => Ok(()),
            }
        }
    }
}

/// Entry point used by main.rs
pub async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    logging::init(logging::Verbosity::from_flags(cli.verbose, cli.quiet));
    ui::messages::set_quiet(cli.quiet);

    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = Config::resolve_db_path(Some(custom_db))
            .to_string_lossy()
            .to_string();
    }
    if let Some(session) = &cli.session {
        cfg.session_file = absolutize(session).to_string_lossy().to_string();
    }

    dispatch(&cli, cfg).await
}
