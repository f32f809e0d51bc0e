//! Repository stats value and its API/cache mappings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Session cache key for a repository identifier
pub fn cache_key(repo: &str) -> String {
    format!("repo_{}", repo)
}

/// Star count, fork count and last push time of one repository
///
/// Every field is `None` until a cached or fetched value is published.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoStats {
    pub stars: Option<u64>,
    pub forks: Option<u64>,
    /// ISO-8601 time of the last push
    #[serde(rename = "updatedAt", alias = "updated")]
    pub updated_at: Option<String>,
}

impl RepoStats {
    /// Map a repository API response body
    ///
    /// Returns `None` for non-object bodies and "Not Found" messages.
    /// Missing or non-numeric counts become 0.
    pub fn from_api(body: &Value) -> Option<Self> {
        let repo = body.as_object()?;
        if repo.get("message").and_then(Value::as_str) == Some("Not Found") {
            return None;
        }

        Some(Self {
            stars: Some(count(repo.get("stargazers_count"))),
            forks: Some(count(repo.get("forks_count"))),
            updated_at: repo
                .get("pushed_at")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
        })
    }

    /// Parse a cache entry; malformed entries yield `None`
    pub fn from_cache_json(entry: &str) -> Option<Self> {
        match serde_json::from_str(entry) {
            Ok(stats) => Some(stats),
            Err(e) => {
                log::debug!("Discarding malformed stats cache entry: {}", e);
                None
            }
        }
    }

    pub fn to_cache_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Whether nothing has been published yet
    pub fn is_empty(&self) -> bool {
        self.stars.is_none() && self.forks.is_none() && self.updated_at.is_none()
    }
}

fn count(value: Option<&Value>) -> u64 {
    let Some(value) = value else { return 0 };
    if let Some(n) = value.as_u64() {
        return n;
    }
    match value.as_f64() {
        Some(n) if n.is_finite() && n > 0.0 => n.trunc() as u64,
        _ => 0,
    }
}
