use std::path::{Path, PathBuf};
use std::process::Command;
use crate::error::{Error, Result};
use crate::manifest::PackageRecord;
use crate::util::{ensure_dir, unscoped_name};

/// Directory, relative to the package, that fetched tarballs land in.
pub const PUBLISHED_DIR: &str = "published";

/// Something that can copy a URL to a local file.
pub trait Downloader {
    fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Downloads by spawning `curl`.
#[derive(Debug, Clone)]
pub struct CurlDownloader {
    program: String,
}

impl Default for CurlDownloader {
    fn default() -> Self {
        Self { program: "curl".to_string() }
    }
}

impl CurlDownloader {
    /// Uses `program` instead of `curl`. It receives curl's arguments.
    pub fn with_program(program: &str) -> Self {
        Self { program: program.to_string() }
    }
}

impl Downloader for CurlDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        log::debug!("{} {} -> {}", self.program, url, dest.display());
        let output = Command::new(&self.program)
            .args(["--fail", "--silent", "--show-error", "--location", "--output"])
            .arg(dest)
            .arg(url)
            .output()
            .map_err(|e| Error::Fetch {
                url: url.to_string(),
                message: format!("failed to run {}: {e}", self.program),
            })?;
        if !output.status.success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Registry URL of a package tarball: `<registry>/<name>/-/<basename>-<version>.tgz`.
///
/// `basename` drops the npm scope, so `@acme/app` resolves to `.../@acme/app/-/app-1.0.0.tgz`.
pub fn tarball_url(registry: &str, name: &str, version: &str) -> String {
    format!(
        "{}/{name}/-/{}-{version}.tgz",
        registry.trim_end_matches('/'),
        unscoped_name(name)
    )
}

/// Where the tarball of `name@version` is written, below `package_dir`.
pub fn tarball_path<P: AsRef<Path>>(package_dir: P, name: &str, version: &str) -> PathBuf {
    package_dir
        .as_ref()
        .join(PUBLISHED_DIR)
        .join(format!("{name}@{version}.tgz"))
}

/// Downloads the published tarball of the package in `package_dir`.
///
/// Reads name and version from its `package.json`, creates the destination
/// directory and hands the transfer to `downloader`. Returns the written path.
pub fn fetch_tarball<D, P>(downloader: &D, registry: &str, package_dir: P) -> Result<PathBuf>
where
    D: Downloader + ?Sized,
    P: AsRef<Path>,
{
    let package = PackageRecord::load(package_dir.as_ref())?;
    let url = tarball_url(registry, &package.name, &package.version);
    let dest = tarball_path(package_dir.as_ref(), &package.name, &package.version);
    if let Some(parent) = dest.parent() {
        ensure_dir(parent)?;
    }
    downloader.download(&url, &dest)?;
    Ok(dest)
}
