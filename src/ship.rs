use std::fmt;
use std::path::{Path, PathBuf};
use crate::error::{Error, Result};
use crate::git::VersionControl;
use crate::manifest::read_packages;
use crate::names::{ReleaseNames, next_release_name};
use crate::publish::publish;
use crate::reconcile::{merge, validate};
use crate::registry::{Registry, fetch_tag_sets};

/// What a ship run did, or would have done in dry-run mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipReport {
    /// The release name assigned by this run.
    pub release_name: String,
    /// `(name, version)` of every package promoted.
    pub packages: Vec<(String, String)>,
    /// Rewritten manifest; `None` on a dry run.
    pub manifest: Option<PathBuf>,
    pub dry_run: bool,
}

impl fmt::Display for ShipReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.dry_run { "Would ship" } else { "Shipped" };
        writeln!(f, "{verb} {}:", self.release_name)?;
        for (name, version) in &self.packages {
            writeln!(f, "  {name}@{version}")?;
        }
        Ok(())
    }
}

/// Runs the ship workflow against explicitly provided collaborators.
pub struct Shipper<'a> {
    registry: &'a dyn Registry,
    vcs: &'a dyn VersionControl,
    names: ReleaseNames,
    packages_dir: PathBuf,
    versioned_package: Option<String>,
}

impl<'a> Shipper<'a> {
    pub fn new<P: AsRef<Path>>(
        registry: &'a dyn Registry,
        vcs: &'a dyn VersionControl,
        names: ReleaseNames,
        packages_dir: P,
    ) -> Self {
        Self {
            registry,
            vcs,
            names,
            packages_dir: packages_dir.as_ref().to_path_buf(),
            versioned_package: None,
        }
    }

    /// Names the package whose manifest tracks the release name.
    /// Without it the first package directory is used.
    pub fn versioned_package(mut self, name: Option<String>) -> Self {
        self.versioned_package = name;
        self
    }

    /// read local state → query registry → validate → next name → (unless dry run) tag and publish.
    ///
    /// Every read-only step runs in dry-run mode so validation errors still surface.
    pub fn run(&self, dry_run: bool) -> Result<ShipReport> {
        let local = read_packages(&self.packages_dir)?;
        let versioned = match (&self.versioned_package, local.first()) {
            (Some(name), _) => name.clone(),
            (None, Some(first)) => first.name.clone(),
            (None, None) => {
                return Err(Error::Validation(format!(
                    "No packages found in {}",
                    self.packages_dir.display()
                )));
            }
        };
        println!("Found {} local packages", local.len());

        let names: Vec<&str> = local.iter().map(|p| p.name.as_str()).collect();
        let tag_sets = fetch_tag_sets(self.registry, &names)?;
        let state = merge(local, tag_sets);
        validate(&state)?;
        println!("Local versions match `next`");

        let release_name = next_release_name(&state, &versioned, &self.names)?;
        println!("Next release name: {release_name}");

        let manifest = if dry_run {
            println!("Dry run: skipping tagging and commit");
            None
        }
        else {
            let path = publish(self.registry, self.vcs, &state, &versioned, &release_name)?;
            println!("Committed {}", path.display());
            Some(path)
        };

        Ok(ShipReport {
            release_name,
            packages: state
                .packages()
                .map(|p| (p.name.clone(), p.version.clone()))
                .collect(),
            manifest,
            dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_display() {
        let report = ShipReport {
            release_name: "Beta".to_string(),
            packages: vec![("a".to_string(), "1.2.0".to_string())],
            manifest: None,
            dry_run: true,
        };
        assert_eq!(report.to_string(), "Would ship Beta:\n  a@1.2.0\n");
    }
}
