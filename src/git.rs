use std::path::{Path, PathBuf};
use std::process::Command;
use crate::error::{Error, Result};

/// The version-control operations the ship flow needs.
pub trait VersionControl {
    /// Stages one file.
    fn stage(&self, path: &Path) -> Result<()>;
    /// Commits the staged changes with `message`.
    fn commit(&self, message: &str) -> Result<()>;
    /// Pushes the current branch upstream.
    fn push(&self) -> Result<()>;
}

/// Drives the system `git` executable inside a working tree.
///
/// Authentication is whatever the user's git setup provides (SSH agent,
/// credential helpers, tokens in `~/.gitconfig`).
#[derive(Debug, Clone)]
pub struct GitCli {
    work_dir: PathBuf,
    remote: String,
}

impl GitCli {
    pub fn new<P: AsRef<Path>>(work_dir: P, remote: &str) -> Self {
        Self {
            work_dir: work_dir.as_ref().to_path_buf(),
            remote: remote.to_string(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        log::debug!("git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .map_err(|e| Error::Publish(format!("failed to run git {}: {e}", args[0])))?;
        if !output.status.success() {
            return Err(Error::Publish(format!(
                "git {} failed: {}",
                args[0],
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl VersionControl for GitCli {
    fn stage(&self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.run(&["add", "--", &path])?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message])?;
        Ok(())
    }

    fn push(&self) -> Result<()> {
        self.run(&["push", &self.remote, "HEAD"])?;
        Ok(())
    }
}
