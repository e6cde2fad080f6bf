use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "filterstate", bin_name = "filterstate", version)]
#[command(about = "Inspect and rewrite filter query strings", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding filters.json
    #[arg(long, global = true, env = "FILTERSTATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered filters
    Keys,

    /// Print every parameter of a query as JSON
    Decode { query: String },

    /// Show the filter panel for a query
    Show { query: String },

    /// Set a filter and print the new query
    Set {
        query: String,
        key: String,
        /// Values to select (none clears the filter)
        values: Vec<String>,
    },

    /// Set a child field and print the new query
    Child {
        query: String,
        param: String,
        /// Value (omit to clear)
        value: Option<String>,
    },

    /// Print the page state, or move to a page / change the page size
    Page {
        query: String,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        size: Option<u32>,
    },

    /// Remove every filter and pagination parameter
    Clear { query: String },

    /// Print the data-fetch request for a query as JSON
    Submit { query: String },
}

/// Route `tracing` output to stderr. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("filterstate={level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_set_with_values() {
        let cli = Cli::parse_from(["filterstate", "set", "a=1", "status", "Pending", "Resolved"]);
        match cli.command {
            Commands::Set { query, key, values } => {
                assert_eq!(query, "a=1");
                assert_eq!(key, "status");
                assert_eq!(values, ["Pending", "Resolved"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["filterstate", "keys", "-vv", "--config", "/tmp/x"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn parses_page_flags() {
        let cli = Cli::parse_from(["filterstate", "page", "", "--size", "20"]);
        match cli.command {
            Commands::Page { page, size, .. } => {
                assert_eq!(page, None);
                assert_eq!(size, Some(20));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
