use std::time::Duration;
use anyhow::{Context, Result};
use colored::Colorize;
use distship::config::DistshipToml;
use distship::fetch::{CurlDownloader, fetch_tarball};
use distship::git::GitCli;
use distship::names::ReleaseNames;
use distship::registry::NpmRegistry;
use distship::ship::Shipper;
use crate::cli::{CLI, DistshipCommand};

pub fn init_logging(level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(level);
    builder.parse_default_env();
    let _ = builder.try_init();
}

/// Single place where a failed run is reported.
pub fn report_error(error: &anyhow::Error) {
    eprintln!("{} {error:#}", "error:".red().bold());
}

pub fn execute(cli: CLI) -> Result<()> {
    match cli.command {
        Some(DistshipCommand::Ship { ship: true, dry_run }) => {
            execute_ship(&cli.config, dry_run)
        }
        Some(DistshipCommand::Fetch) => {
            execute_fetch(&cli.config)
        }
        Some(DistshipCommand::Ship { ship: false, .. }) | None => {
            println!("Nothing to do.");
            Ok(())
        }
    }
}

pub fn execute_ship(config_path: &std::path::Path, dry_run: bool) -> Result<()> {
    let config = DistshipToml::load_or_default(config_path)?;
    let names = ReleaseNames::load(&config.release_names)
        .context("could not load the release name list")?;
    let registry = NpmRegistry::new(
        &config.registry,
        config.token(),
        Duration::from_secs(config.timeout_secs),
    )?;
    let git = GitCli::new(std::env::current_dir()?, &config.remote);

    let report = Shipper::new(&registry, &git, names, &config.packages_dir)
        .versioned_package(config.versioned_package.clone())
        .run(dry_run)?;
    print!("{report}");
    Ok(())
}

pub fn execute_fetch(config_path: &std::path::Path) -> Result<()> {
    let config = DistshipToml::load_or_default(config_path)?;
    let cwd = std::env::current_dir()?;
    let dest = fetch_tarball(&CurlDownloader::default(), &config.registry, &cwd)?;
    println!("Fetched {}", dest.display());
    Ok(())
}
