//! `ecopoint`: the discovery flow from a terminal.

mod cli;
mod commands;
mod output;

use crate::cli::{Cli, Command};
use clap::Parser;
use eco::catalog::HttpCatalog;
use eco::domain::config::EcoConfig;
use eco::kernel::config::load_config;
use eco_logger::Logger;

#[eco_runtime::main(interactive)]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config: EcoConfig = load_config(cli.config.as_deref())?;

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_owned();
    }
    let _logger = Logger::from_config(env!("CARGO_BIN_NAME"), &logging)?;

    match cli.command {
        Command::Regions => commands::regions(&HttpCatalog::from_config(&config)?).await,
        Command::Localities { region } => {
            commands::localities(&HttpCatalog::from_config(&config)?, &region).await
        },
        Command::Items => commands::items(&HttpCatalog::from_config(&config)?).await,
        Command::Points { region, locality, items, deny_location } => {
            commands::points(&config, &region, &locality, &items, deny_location).await
        },
        Command::Detail { id, email, chat } => commands::detail(&config, id, email, chat).await,
    }
}
