use std::path::PathBuf;
use rayon::prelude::*;
use serde_json::{Value, json};
use crate::error::{Error, Result};
use crate::git::VersionControl;
use crate::names::{RELEASE_KEY, RELEASE_SECTION};
use crate::reconcile::{LATEST_TAG, MergedPackageState};
use crate::registry::{Registry, apply_tags};
use crate::util::write_json_atomic;

/// Marker keeping CI from building the automated release commit.
pub const CI_SKIP: &str = "[skip ci]";

/// Tags every package `latest` and `release_name` at its local version.
///
/// Runs one task per package (each tagging its labels concurrently) and fails
/// with the first error once all have finished.
pub fn tag_release<R: Registry + ?Sized>(
    registry: &R,
    state: &MergedPackageState,
    release_name: &str,
) -> Result<()> {
    let labels = [LATEST_TAG, release_name];
    let packages: Vec<_> = state.packages().collect();
    packages
        .par_iter()
        .map(|p| apply_tags(registry, &p.name, &p.version, &labels))
        .collect::<Result<Vec<()>>>()?;
    Ok(())
}

/// Returns the versioned package's manifest path and a copy of its manifest
/// with `release.release` set to `release_name`.
pub fn updated_manifest(
    state: &MergedPackageState,
    versioned_package: &str,
    release_name: &str,
) -> Result<(PathBuf, Value)> {
    let package = state.get(versioned_package).ok_or_else(|| {
        Error::Publish(format!("versioned package {versioned_package} is not among the local packages"))
    })?;
    let path = package.manifest_path();
    let not_an_object = || Error::Publish(format!("{} is not a JSON object", path.display()));

    let mut manifest = package.manifest.clone();
    let section = manifest
        .as_object_mut()
        .ok_or_else(not_an_object)?
        .entry(RELEASE_SECTION)
        .or_insert_with(|| json!({}))
        .as_object_mut()
        .ok_or_else(|| Error::Publish(format!("`{RELEASE_SECTION}` in {} is not an object", path.display())))?;
    section.insert(RELEASE_KEY.to_string(), Value::String(release_name.to_string()));
    Ok((path, manifest))
}

/// Commit message for a release: every shipped package, the release name, and [`CI_SKIP`].
pub fn commit_message(state: &MergedPackageState, release_name: &str) -> String {
    let shipped: Vec<String> = state
        .packages()
        .map(|p| format!("- {}@{}", p.name, p.version))
        .collect();
    format!(
        "Ship {release_name} {CI_SKIP}\n\nReleased:\n{}\n\nRelease name: {release_name}\n",
        shipped.join("\n")
    )
}

/// Promotes the release and records it in version control, in this order:
///
/// 1. tag every package `latest` and `release_name`,
/// 2. set `release.release` in the versioned package's manifest,
/// 3. write the manifest,
/// 4. stage, commit and push it.
///
/// The registry is updated first; if git fails afterwards the registry
/// still reflects what was shipped.
///
/// Returns the path of the rewritten manifest.
pub fn publish<R, V>(
    registry: &R,
    vcs: &V,
    state: &MergedPackageState,
    versioned_package: &str,
    release_name: &str,
) -> Result<PathBuf>
where
    R: Registry + ?Sized,
    V: VersionControl + ?Sized,
{
    tag_release(registry, state, release_name)?;
    let (path, manifest) = updated_manifest(state, versioned_package, release_name)?;
    write_json_atomic(&path, &manifest)
        .map_err(|e| Error::Publish(format!("could not write {}: {e}", path.display())))?;
    vcs.stage(&path)?;
    vcs.commit(&commit_message(state, release_name))?;
    vcs.push()?;
    Ok(path)
}
