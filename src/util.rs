use std::io::Write;
use std::path::{Path, PathBuf};
use semver::Version;
use serde_json::Value;
use tempfile::NamedTempFile;
use crate::error::Result;

/// Ensures the directory exists, creating it and any parents.
///
/// Returns the path that was ensured.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = PathBuf::from(path.as_ref());
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

/// Validates whether a version string is a valid SemVer version.
/// Pre-release and build metadata are part of the version here.
pub fn is_valid_version(version: &str) -> bool {
    Version::parse(version).is_ok()
}

/// Turns a free-form label into something the registry accepts as a dist-tag.
///
/// Lower-cases the label and replaces every whitespace character with `_`,
/// so `"Spring Fling"` becomes `"spring_fling"`.
pub fn normalize_tag(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Strips an npm scope from a package name: `@acme/app` becomes `app`.
pub fn unscoped_name(name: &str) -> &str {
    match name.strip_prefix('@') {
        Some(rest) => rest.split_once('/').map(|(_, base)| base).unwrap_or(name),
        None => name,
    }
}

/// Writes a JSON document the way npm does: two-space indent, trailing newline.
///
/// The file is written to a temporary sibling first and then renamed over
/// `path`, so readers never observe a half-written manifest.
pub fn write_json_atomic<P: AsRef<Path>>(path: P, value: &Value) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    // keep the mode of the file being replaced, temp files start out 0600
    if let Ok(metadata) = std::fs::metadata(path) {
        file.as_file().set_permissions(metadata.permissions())?;
    }
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
