use std::collections::BTreeMap;
use std::time::Duration;
use rayon::prelude::*;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use crate::error::{Error, Result};
use crate::util::normalize_tag;

/// User agent sent with every registry request.
pub const USER_AGENT: &str = concat!("distship/", env!("CARGO_PKG_VERSION"));

/// The dist-tags of one package as published in the registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryTagSet {
    /// Package name the tags belong to.
    pub name: String,
    /// Tag name to version, e.g. `"next" => "1.2.0"`. Empty for unpublished packages.
    pub tags: BTreeMap<String, String>,
}

/// A registry able to list and add dist-tags.
///
/// Implementations must be shareable across threads: queries and tag
/// applications are fanned out concurrently.
pub trait Registry: Sync {
    /// Lists every dist-tag of `name`.
    fn dist_tags(&self, name: &str) -> Result<RegistryTagSet>;

    /// Points dist-tag `tag` of `name` at `version`.
    fn add_dist_tag(&self, name: &str, version: &str, tag: &str) -> Result<()>;
}

/// Queries the dist-tags of every package concurrently.
///
/// Waits for all queries; the first failure fails the whole step.
pub fn fetch_tag_sets<R, S>(registry: &R, names: &[S]) -> Result<Vec<RegistryTagSet>>
where
    R: Registry + ?Sized,
    S: AsRef<str> + Sync,
{
    names
        .par_iter()
        .map(|name| registry.dist_tags(name.as_ref()))
        .collect()
}

/// Applies every label as a dist-tag of `name@version`.
///
/// Labels are normalized with [`normalize_tag`] first. Tags are applied
/// concurrently and are not rolled back: if one fails, others may already
/// point at `version`.
pub fn apply_tags<R, S>(registry: &R, name: &str, version: &str, labels: &[S]) -> Result<()>
where
    R: Registry + ?Sized,
    S: AsRef<str> + Sync,
{
    labels
        .par_iter()
        .map(|label| registry.add_dist_tag(name, version, &normalize_tag(label.as_ref())))
        .collect::<Result<Vec<()>>>()
        .inspect_err(|e| log::warn!("tagging {name}@{version} stopped early, earlier tags are kept: {e}"))?;
    Ok(())
}

/// Client for the npm registry dist-tag API.
///
/// - `GET <registry>/-/package/<name>/dist-tags`
/// - `PUT <registry>/-/package/<name>/dist-tags/<tag>` with the version as a JSON string body
#[derive(Debug, Clone)]
pub struct NpmRegistry {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl NpmRegistry {
    /// Creates a client for the registry at `base_url`.
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Registry {
                package: base_url.to_string(),
                message: format!("could not build HTTP client: {e}"),
            })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    fn dist_tags_url(&self, name: &str) -> String {
        // Scoped names travel as a single path segment: @scope%2fname
        format!("{}/-/package/{}/dist-tags", self.base_url, name.replace('/', "%2f"))
    }
}

fn registry_error(package: &str, message: impl ToString) -> Error {
    Error::Registry {
        package: package.to_string(),
        message: message.to_string(),
    }
}

impl Registry for NpmRegistry {
    fn dist_tags(&self, name: &str) -> Result<RegistryTagSet> {
        let url = self.dist_tags_url(name);
        log::debug!("GET {url}");
        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().map_err(|e| registry_error(name, e))?;
        let tags = match response.status() {
            StatusCode::NOT_FOUND => BTreeMap::new(),
            status if status.is_success() => response
                .json::<BTreeMap<String, String>>()
                .map_err(|e| registry_error(name, format!("invalid dist-tags response: {e}")))?,
            status => return Err(registry_error(name, format!("unexpected status {status} from {url}"))),
        };
        Ok(RegistryTagSet {
            name: name.to_string(),
            tags,
        })
    }

    fn add_dist_tag(&self, name: &str, version: &str, tag: &str) -> Result<()> {
        let url = format!("{}/{}", self.dist_tags_url(name), tag);
        log::info!("tagging {name}@{version} as {tag}");
        let mut request = self.client.put(&url).json(version);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().map_err(|e| registry_error(name, e))?;
        if !response.status().is_success() {
            return Err(registry_error(
                name,
                format!("failed to set {tag} to {version}: status {}", response.status()),
            ));
        }
        Ok(())
    }
}
