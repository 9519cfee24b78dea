//! Merging local package state with registry dist-tags, and the release
//! invariants checked on the result.

use std::collections::BTreeMap;
use std::path::PathBuf;
use serde_json::Value;
use crate::error::{Error, Result};
use crate::manifest::{MANIFEST_FILE, PackageRecord};
use crate::registry::RegistryTagSet;

/// Dist-tag expected to point at the build about to be shipped.
pub const NEXT_TAG: &str = "next";
/// Dist-tag pointing at the currently released version.
pub const LATEST_TAG: &str = "latest";

/// A local package together with its published dist-tags.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedPackage {
    pub path: PathBuf,
    pub name: String,
    pub version: String,
    pub manifest: Value,
    pub tags: BTreeMap<String, String>,
}

impl MergedPackage {
    /// Version the given dist-tag points at, if the tag exists.
    pub fn tag(&self, tag: &str) -> Option<&str> {
        self.tags.get(tag).map(String::as_str)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path.join(MANIFEST_FILE)
    }
}

/// Local and registry state keyed by package name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedPackageState {
    packages: BTreeMap<String, MergedPackage>,
}

impl MergedPackageState {
    pub fn get(&self, name: &str) -> Option<&MergedPackage> {
        self.packages.get(name)
    }

    /// Packages in name order.
    pub fn packages(&self) -> impl Iterator<Item = &MergedPackage> {
        self.packages.values()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Combines local records with registry tag sets.
///
/// Every local package appears in the result; a package the registry knows
/// nothing about gets an empty tag mapping. Tag sets for names with no local
/// package are ignored.
pub fn merge(local: Vec<PackageRecord>, registry: Vec<RegistryTagSet>) -> MergedPackageState {
    let mut tags: BTreeMap<String, BTreeMap<String, String>> = registry
        .into_iter()
        .map(|set| (set.name, set.tags))
        .collect();
    let packages = local
        .into_iter()
        .map(|record| {
            let merged = MergedPackage {
                tags: tags.remove(&record.name).unwrap_or_default(),
                path: record.path,
                name: record.name.clone(),
                version: record.version,
                manifest: record.manifest,
            };
            (record.name, merged)
        })
        .collect();
    MergedPackageState { packages }
}

/// Checks that shipping `state` is safe and meaningful.
///
/// 1. Every package's local version equals its `next` dist-tag. Otherwise the
///    build about to be promoted is not the one published as `next`.
/// 2. At least one package's `latest` differs from its `next`. Otherwise there
///    is nothing new to release.
pub fn validate(state: &MergedPackageState) -> Result<()> {
    let drifted: Vec<String> = state
        .packages()
        .filter(|p| p.tag(NEXT_TAG) != Some(p.version.as_str()))
        .map(|p| {
            format!(
                "{} (local {}, next {})",
                p.name,
                p.version,
                p.tag(NEXT_TAG).unwrap_or("<unset>")
            )
        })
        .collect();
    if !drifted.is_empty() {
        return Err(Error::Validation(format!(
            "Local versions do not match the published `next` tag: {}",
            drifted.join(", ")
        )));
    }

    let changed = state
        .packages()
        .any(|p| p.tag(LATEST_TAG) != p.tag(NEXT_TAG));
    if !changed {
        return Err(Error::Validation(
            "Nothing changed since the last release: `latest` already equals `next` for every package".to_string(),
        ));
    }
    Ok(())
}
