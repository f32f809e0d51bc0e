//! Repository stats: session cache, remote source and the background fetcher.

mod client;
mod fetcher;
mod model;
mod store;

pub use client::{GithubClient, StatsSource};
pub use fetcher::RepoStatsFetcher;
pub use model::{cache_key, RepoStats};
pub use store::{MemoryStore, SessionStore};
