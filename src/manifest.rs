use std::path::{Path, PathBuf};
use serde_json::Value;
use walkdir::WalkDir;
use crate::error::{Error, Result};
use crate::util::is_valid_version;

/// File name of an npm package manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// A local package as read from its `package.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageRecord {
    /// Directory containing the manifest.
    pub path: PathBuf,
    /// The `name` field of the manifest.
    pub name: String,
    /// The `version` field of the manifest, a valid semver string.
    pub version: String,
    /// The whole manifest document.
    pub manifest: Value,
}

impl PackageRecord {
    /// Location of the manifest file on disk.
    pub fn manifest_path(&self) -> PathBuf {
        self.path.join(MANIFEST_FILE)
    }

    /// Reads `<dir>/package.json`.
    ///
    /// # Errors
    /// Returns [`Error::Read`] if the file is missing or unreadable, is not JSON,
    /// lacks string `name`/`version` fields, or carries an invalid version.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<PackageRecord> {
        let dir = dir.as_ref();
        let manifest_path = dir.join(MANIFEST_FILE);
        let read_error = |message: String| Error::Read {
            path: manifest_path.clone(),
            message,
        };
        let content = std::fs::read_to_string(&manifest_path)
            .map_err(|e| read_error(e.to_string()))?;
        let manifest: Value = serde_json::from_str(&content)
            .map_err(|e| read_error(e.to_string()))?;
        let name = string_field(&manifest, "name")
            .ok_or_else(|| read_error("missing string field `name`".to_string()))?;
        let version = string_field(&manifest, "version")
            .ok_or_else(|| read_error("missing string field `version`".to_string()))?;
        if !is_valid_version(&version) {
            return Err(read_error(format!("invalid version: {version}")));
        }
        Ok(PackageRecord {
            path: dir.to_path_buf(),
            name,
            version,
            manifest,
        })
    }
}

fn string_field(manifest: &Value, key: &str) -> Option<String> {
    manifest.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Reads one [`PackageRecord`] per immediate subdirectory of `root`.
///
/// Hidden directories (`.git`, `.cache`, ...) are skipped; symlinked package
/// directories are followed. Records come back sorted by directory name.
///
/// # Errors
/// Fails with [`Error::Read`] on the first subdirectory without a usable manifest,
/// on two directories declaring the same package name, or if `root` itself
/// cannot be listed.
pub fn read_packages<P: AsRef<Path>>(root: P) -> Result<Vec<PackageRecord>> {
    let root = root.as_ref();
    let entries = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    let mut packages: Vec<PackageRecord> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::Read {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_dir() || entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let package = PackageRecord::load(entry.path())?;
        if let Some(first) = packages.iter().find(|p| p.name == package.name) {
            return Err(Error::Read {
                path: package.manifest_path(),
                message: format!(
                    "package name {} is already declared by {}",
                    package.name,
                    first.manifest_path().display()
                ),
            });
        }
        packages.push(package);
    }
    log::debug!("read {} packages from {}", packages.len(), root.display());
    Ok(packages)
}
