//! Repository API access.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::header::ACCEPT;
use serde_json::Value;

use crate::config::StatsParameters;

/// Fetches the raw JSON body describing a repository
pub trait StatsSource: Send + Sync {
    fn fetch(&self, repo: &str) -> Result<Value>;
}

/// Blocking client for the GitHub REST API
pub struct GithubClient {
    client: reqwest::blocking::Client,
    api_base_url: String,
}

impl GithubClient {
    pub fn new(params: &StatsParameters) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(params.user_agent.as_str())
            .timeout(Duration::from_secs(params.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_base_url: params.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn repo_url(&self, repo: &str) -> String {
        format!("{}/repos/{}", self.api_base_url, repo)
    }
}

impl StatsSource for GithubClient {
    fn fetch(&self, repo: &str) -> Result<Value> {
        let url = self.repo_url(repo);
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .with_context(|| format!("GET {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("GET {} returned {}", url, status);
        }

        response
            .json::<Value>()
            .with_context(|| format!("Invalid JSON from {}", url))
    }
}
