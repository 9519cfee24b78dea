use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};

/// Default registry used when `distship.toml` does not name one.
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

/// Default name of the configuration file, looked up in the current directory.
pub const CONFIG_FILE: &str = "distship.toml";

/// Represents the contents of a `distship.toml` file.
///
/// Every key is optional. A project without the file gets the defaults.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DistshipToml {
    /// Base URL of the npm-compatible registry.
    pub registry: String,
    /// Directory whose immediate subdirectories are the local packages.
    pub packages_dir: PathBuf,
    /// Name of the package whose manifest carries `release.release`.
    /// Falls back to the first local package when unset.
    pub versioned_package: Option<String>,
    /// JSON file holding the ordered list of release names.
    pub release_names: PathBuf,
    /// Git remote the release commit is pushed to.
    pub remote: String,
    /// Environment variable holding the registry auth token.
    pub token_env: String,
    /// Per-request HTTP timeout.
    pub timeout_secs: u64,
}

impl Default for DistshipToml {
    fn default() -> Self {
        DistshipToml {
            registry: DEFAULT_REGISTRY.to_string(),
            packages_dir: PathBuf::from("packages"),
            versioned_package: None,
            release_names: PathBuf::from("release-names.json"),
            remote: "origin".to_string(),
            token_env: "NPM_TOKEN".to_string(),
            timeout_secs: 30,
        }
    }
}

impl DistshipToml {
    /// Loads a `DistshipToml` from a file path.
    ///
    /// Relative paths inside the file are resolved against the file's directory.
    ///
    /// # Errors
    /// Returns a [`Error::Config`] if the file can't be read or deserialized.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DistshipToml> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        let config: DistshipToml = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        let base = path.parent().unwrap_or(Path::new(""));
        Ok(config.resolve_paths(base))
    }

    /// Loads the file if it exists, otherwise returns defaults rooted at the file's directory.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<DistshipToml> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        }
        else {
            let base = path.parent().unwrap_or(Path::new(""));
            Ok(DistshipToml::default().resolve_paths(base))
        }
    }

    /// Reads the token from the configured environment variable, if set.
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env).ok().filter(|t| !t.is_empty())
    }

    fn resolve_paths(mut self, base: &Path) -> Self {
        if self.packages_dir.is_relative() {
            self.packages_dir = base.join(&self.packages_dir);
        }
        if self.release_names.is_relative() {
            self.release_names = base.join(&self.release_names);
        }
        self
    }
}
