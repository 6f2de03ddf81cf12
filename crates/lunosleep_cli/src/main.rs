//! `lunosleep` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the local database.
//! - Read the clock once and hand it to command handlers.

mod cli;
mod commands;
mod error;
mod render;

use chrono::{Local, Utc};
use clap::Parser;
use cli::Cli;
use commands::Context;
use directories::ProjectDirs;
use error::CliError;
use log::{error, info};
use lunosleep_core::db::open_db;
use lunosleep_core::{core_version, init_logging_from_config, CoreConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let default_data_dir =
        ProjectDirs::from("", "", "lunosleep").map(|dirs| dirs.data_dir().to_path_buf());
    let config = CoreConfig::resolve(
        cli.data_dir.clone(),
        cli.log_level.as_deref(),
        default_data_dir,
    )?;

    // The journal still works without file logs.
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("warning: logging disabled: {err}");
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        core_version()
    );

    let conn = open_db(config.db_path())?;
    let ctx = Context {
        conn: &conn,
        today: Local::now().date_naive(),
        now: Utc::now(),
        working_dir: std::env::current_dir()?,
    };
    commands::execute(&cli.command, &ctx)
}
