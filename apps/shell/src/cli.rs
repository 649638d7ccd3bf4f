use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Find waste collection points and contact them.
#[derive(Debug, Parser)]
#[command(name = "ecopoint", version, about)]
pub(crate) struct Cli {
    /// Configuration file (TOML, YAML or JSON). Defaults to `ecopoint.*` if present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug-level logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List regions.
    Regions,
    /// List the localities of a region.
    Localities { region: String },
    /// List material categories.
    Items,
    /// Show the collection points of a locality.
    Points {
        region: String,
        locality: String,
        /// Only points accepting this item category; repeat for more (any match).
        #[arg(long = "item", value_name = "ID")]
        items: Vec<u32>,
        /// Behave as if location permission was refused.
        #[arg(long)]
        deny_location: bool,
    },
    /// Show one collection point.
    Detail {
        id: u64,
        /// Open the mail composer for the point.
        #[arg(long)]
        email: bool,
        /// Open the chat deep-link for the point.
        #[arg(long)]
        chat: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn points_accepts_repeated_items() {
        let cli = Cli::try_parse_from([
            "ecopoint", "points", "CE", "Fortaleza", "--item", "3", "--item", "5", "--deny-location",
        ])
        .expect("valid arguments");

        let Command::Points { region, locality, items, deny_location } = cli.command else {
            panic!("expected points");
        };
        assert_eq!((region.as_str(), locality.as_str()), ("CE", "Fortaleza"));
        assert_eq!(items, [3, 5]);
        assert!(deny_location);
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from(["ecopoint", "detail", "7", "--chat", "--verbose", "--config", "dev.toml"])
            .expect("valid arguments");
        assert!(cli.verbose);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("dev.toml")));
        assert!(matches!(cli.command, Command::Detail { id: 7, email: false, chat: true }));
    }
}
