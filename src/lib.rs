pub mod cli;
pub mod counts;
pub mod filter;
pub mod io_utils;
pub mod medals;
pub mod roles;
pub mod schema;
pub mod share;
pub mod table;
pub mod year;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("olympic_attendance", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Share(args) => share::execute(&args),
        Commands::Counts(args) => counts::execute(&args),
        Commands::Medals(args) => medals::execute(&args),
        Commands::Roles(args) => roles::execute(&args),
    }
}
