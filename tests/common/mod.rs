#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use serde_json::{Value, json};
use tempfile::TempDir;
use distship::{Error, Registry, RegistryTagSet, Result, VersionControl};

/// In-memory registry recording every tag it is asked to add.
#[derive(Default)]
pub struct FakeRegistry {
    pub tags: BTreeMap<String, BTreeMap<String, String>>,
    pub added: Mutex<Vec<(String, String, String)>>,
}

impl FakeRegistry {
    pub fn with(mut self, name: &str, tag: &str, version: &str) -> Self {
        self.tags
            .entry(name.to_string())
            .or_default()
            .insert(tag.to_string(), version.to_string());
        self
    }

    pub fn added_sorted(&self) -> Vec<(String, String, String)> {
        let mut added = self.added.lock().unwrap().clone();
        added.sort();
        added
    }
}

impl Registry for FakeRegistry {
    fn dist_tags(&self, name: &str) -> Result<RegistryTagSet> {
        Ok(RegistryTagSet {
            name: name.to_string(),
            tags: self.tags.get(name).cloned().unwrap_or_default(),
        })
    }

    fn add_dist_tag(&self, name: &str, version: &str, tag: &str) -> Result<()> {
        self.added
            .lock()
            .unwrap()
            .push((name.to_string(), version.to_string(), tag.to_string()));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GitCall {
    Stage(PathBuf),
    Commit(String),
    Push,
}

/// Records git calls; optionally fails on push.
#[derive(Default)]
pub struct FakeGit {
    pub calls: RefCell<Vec<GitCall>>,
    pub fail_push: bool,
}

impl VersionControl for FakeGit {
    fn stage(&self, path: &Path) -> Result<()> {
        self.calls.borrow_mut().push(GitCall::Stage(path.to_path_buf()));
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.calls.borrow_mut().push(GitCall::Commit(message.to_string()));
        Ok(())
    }

    fn push(&self) -> Result<()> {
        if self.fail_push {
            return Err(Error::Publish("git push failed: rejected".to_string()));
        }
        self.calls.borrow_mut().push(GitCall::Push);
        Ok(())
    }
}

/// Creates `packages/<dir>/package.json` for every `(dir, name, version)`;
/// the first one carries `release.release = current_release`.
pub fn setup_packages(packages: &[(&str, &str, &str)], current_release: &str) -> TempDir {
    let root = TempDir::new().unwrap();
    for (i, (dir, name, version)) in packages.iter().enumerate() {
        let mut manifest = json!({"name": name, "version": version});
        if i == 0 {
            manifest["release"] = json!({"release": current_release});
        }
        let path = root.path().join("packages").join(dir);
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(path.join("package.json"), serde_json::to_string_pretty(&manifest).unwrap()).unwrap();
    }
    root
}

pub fn read_manifest(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}
