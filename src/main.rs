mod adb;
mod cli;
mod cmdline;
mod completion;
mod config;
mod device;
mod editor;
mod error;
mod handlers;
mod platform;
mod router;
mod session;
mod signals;
mod utils;

use anyhow::Result;
use clap::Parser;
use colored::*;
use std::env;
use std::time::Duration;
use adb::Adb;
use cli::Cli;
use config::load_config;
use device::AdbRegistry;
use handlers::{repl, single};
use router::Router;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            error::exit_code_for(&e)
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let current_dir = env::current_dir()?;
    let config = load_config(&current_dir)?;

    // --adb names an executable; the configured value is a command line
    let adb = match &cli.adb {
        Some(path) => Adb::new(path.clone(), Vec::new()),
        None => Adb::from_command_line(&config.adb)?,
    }
    .resolve()?;

    signals::install()?;

    let registry = AdbRegistry::new(adb.clone(), Duration::from_secs(config.scan_timeout_secs));
    let router = Router::new(adb);

    if cli.args.is_empty() {
        repl::run_repl(&registry, &router, &config)
    } else {
        single::run_single(cli.args, &registry, &router)
    }
}
