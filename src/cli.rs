use std::path::PathBuf;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct CLI {
    /// Without a subcommand nothing is done
    #[command(subcommand)]
    pub(crate) command: Option<DistshipCommand>,
    /// Path to the configuration file
    #[clap(long, global = true, default_value = distship::CONFIG_FILE, env = "DISTSHIP_CONFIG")]
    pub(crate) config: PathBuf,
    /// Set log level (error, warn, info, debug, trace). `RUST_LOG` takes precedence
    #[clap(long, global = true, value_name = "LEVEL", default_value = "warn")]
    pub(crate) log_level: String,
}

#[derive(Debug, Subcommand, Clone, PartialEq)]
pub enum DistshipCommand {
    /// Promotes the `next` builds to `latest` and assigns the next release name.
    /// Does nothing unless `--ship` is given
    Ship {
        /// Actually run the ship workflow
        #[clap(long)]
        ship: bool,
        /// Run every read and validation step, but do not tag, write or commit
        #[clap(long)]
        dry_run: bool,
    },
    /// Downloads the published tarball of the package in the current directory to `published/`
    Fetch,
}
