//! # Distship Core Library
//!
//! This crate contains the release logic behind the `distship` tool: shipping a
//! multi-package npm project by promoting registry dist-tags, assigning the next
//! human-readable release name, and recording it in git.
//!
//! The registry, git and the download tool are reached through traits
//! ([`Registry`], [`VersionControl`], [`Downloader`]) so every flow can run
//! against fakes.
//!
//! ## Modules Overview
//! - [`manifest`] – Reading local `package.json` files
//! - [`registry`] – Listing and adding dist-tags
//! - [`reconcile`] – Merging local and registry state, release invariants
//! - [`names`] – The release-name sequence
//! - [`publish`] – Tagging and committing a release
//! - [`ship`] – The ship workflow end to end
//! - [`fetch`] – Downloading a published tarball
//! - [`config`] – `distship.toml`
//! - [`git`] – Git through the system executable
//! - [`util`] – Shared helpers (tag normalization, atomic writes, ...)

pub mod config;
pub mod error;
pub mod fetch;
pub mod git;
pub mod manifest;
pub mod names;
pub mod publish;
pub mod reconcile;
pub mod registry;
pub mod ship;
pub mod util;

pub use config::*;
pub use error::{Error, Result};
pub use fetch::*;
pub use git::*;
pub use manifest::*;
pub use names::*;
pub use publish::*;
pub use reconcile::*;
pub use registry::*;
pub use ship::*;
pub use util::*;
