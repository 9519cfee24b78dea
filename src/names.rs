use std::path::Path;
use serde_json::Value;
use crate::error::{Error, Result};
use crate::reconcile::MergedPackageState;
use crate::util::normalize_tag;

/// Manifest object holding the release pointer: `{"release": {"release": "<name>"}}`.
pub const RELEASE_SECTION: &str = "release";
/// Key inside [`RELEASE_SECTION`] holding the last assigned release name.
pub const RELEASE_KEY: &str = "release";

/// The fixed, ordered list of release names. Names are consumed in order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseNames {
    names: Vec<String>,
}

/// Outcome of looking up the successor of a release name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextName<'a> {
    /// The name following the current one.
    Next(&'a str),
    /// The current name is not in the list.
    NotFound,
    /// The current name is the last entry.
    Exhausted,
}

impl ReleaseNames {
    /// Builds the list, rejecting empty lists and duplicates.
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(Error::Config("release name list is empty".to_string()));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(Error::Config(format!("release name listed twice: {name}")));
            }
        }
        Ok(Self { names })
    }

    /// Loads the list from a JSON array of strings.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        let names: Vec<String> = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::new(names)
    }

    /// Looks up the name following `current`.
    pub fn next_after(&self, current: &str) -> NextName<'_> {
        match self.names.iter().position(|n| n == current) {
            None => NextName::NotFound,
            Some(i) => match self.names.get(i + 1) {
                Some(next) => NextName::Next(next),
                None => NextName::Exhausted,
            },
        }
    }
}

/// Reads `release.release` from the versioned package's manifest.
pub fn current_release_name(state: &MergedPackageState, versioned_package: &str) -> Result<String> {
    let package = state.get(versioned_package).ok_or_else(|| {
        Error::Name(format!("versioned package {versioned_package} is not among the local packages"))
    })?;
    package
        .manifest
        .get(RELEASE_SECTION)
        .and_then(|section| section.get(RELEASE_KEY))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            Error::Name(format!(
                "{} has no `{RELEASE_SECTION}.{RELEASE_KEY}` field",
                package.manifest_path().display()
            ))
        })
}

/// Computes the release name to assign next.
///
/// Pure with respect to its inputs: calling it twice on the same state
/// returns the same name.
///
/// # Errors
/// [`Error::Name`] if the current name is unknown, the list is exhausted, or
/// the candidate is already a dist-tag of any package.
pub fn next_release_name(
    state: &MergedPackageState,
    versioned_package: &str,
    names: &ReleaseNames,
) -> Result<String> {
    let current = current_release_name(state, versioned_package)?;
    let next = match names.next_after(&current) {
        NextName::Next(next) => next,
        NextName::NotFound => {
            return Err(Error::Name(format!(
                "current release name {current:?} is not in the release name list"
            )));
        }
        NextName::Exhausted => {
            return Err(Error::Name(format!(
                "release name list is exhausted after {current:?}; add more names"
            )));
        }
    };

    let tag = normalize_tag(next);
    let collisions: Vec<String> = state
        .packages()
        .filter_map(|p| p.tag(&tag).map(|version| format!("{}@{}", p.name, version)))
        .collect();
    if !collisions.is_empty() {
        return Err(Error::Name(format!(
            "release name {next:?} is already a dist-tag ({tag}) on: {}",
            collisions.join(", ")
        )));
    }
    Ok(next.to_string())
}
