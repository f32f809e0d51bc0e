//! Cache-then-revalidate repository stats.
//!
//! `watch` publishes a cached value synchronously, then refreshes it on a
//! background thread. Every `watch` call starts a new generation; a
//! response from an older generation still updates its own cache entry
//! but is never published.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use super::client::StatsSource;
use super::model::{cache_key, RepoStats};
use super::store::SessionStore;

/// Watches one repository at a time and exposes its latest stats
pub struct RepoStatsFetcher {
    source: Arc<dyn StatsSource>,
    store: Arc<dyn SessionStore>,
    current: Arc<Mutex<RepoStats>>,
    generation: Arc<AtomicU64>,
    repo: Option<String>,
}

impl RepoStatsFetcher {
    pub fn new(source: Arc<dyn StatsSource>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            source,
            store,
            current: Arc::new(Mutex::new(RepoStats::default())),
            generation: Arc::new(AtomicU64::new(0)),
            repo: None,
        }
    }

    /// Point the fetcher at `repo` (`owner/name`)
    ///
    /// Returns the handle of the refresh thread, or `None` when `repo` is
    /// empty or the thread could not be spawned.
    pub fn watch(&mut self, repo: &str) -> Option<JoinHandle<()>> {
        let key = cache_key(repo);
        let generation = {
            let mut current = lock(&self.current);
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            if repo.is_empty() {
                return None;
            }
            if let Some(cached) = self.store.get(&key).as_deref().and_then(RepoStats::from_cache_json) {
                log::debug!("Using cached stats for {}", repo);
                *current = cached;
            } else if self.repo.as_deref() != Some(repo) {
                // Another repository's stats must not stand in for this one
                *current = RepoStats::default();
            }
            generation
        };
        self.repo = Some(repo.to_string());

        let refresh = Refresh {
            repo: repo.to_string(),
            key,
            generation,
            source: Arc::clone(&self.source),
            store: Arc::clone(&self.store),
            current: Arc::clone(&self.current),
            latest: Arc::clone(&self.generation),
        };

        match thread::Builder::new()
            .name(format!("repo-stats-{}", generation))
            .spawn(move || refresh.run())
        {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("Could not spawn stats refresh for {}: {}", repo, e);
                None
            }
        }
    }

    /// Latest published value
    pub fn current(&self) -> RepoStats {
        lock(&self.current).clone()
    }

    /// Repository currently watched
    pub fn repo(&self) -> Option<&str> {
        self.repo.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

fn lock(current: &Mutex<RepoStats>) -> MutexGuard<'_, RepoStats> {
    current.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One background revalidation
struct Refresh {
    repo: String,
    key: String,
    generation: u64,
    source: Arc<dyn StatsSource>,
    store: Arc<dyn SessionStore>,
    current: Arc<Mutex<RepoStats>>,
    latest: Arc<AtomicU64>,
}

impl Refresh {
    fn run(self) {
        let body = match self.source.fetch(&self.repo) {
            Ok(body) => body,
            Err(e) => {
                log::debug!("Stats fetch for {} failed: {:#}", self.repo, e);
                return;
            }
        };

        let Some(stats) = RepoStats::from_api(&body) else {
            log::debug!("Ignoring stats response for {}", self.repo);
            return;
        };

        match stats.to_cache_json() {
            Ok(json) => self.store.set(&self.key, json),
            Err(e) => log::warn!("Could not cache stats for {}: {}", self.repo, e),
        }

        let mut current = lock(&self.current);
        if self.latest.load(Ordering::SeqCst) == self.generation {
            log::info!(
                "Repository {}: {} stars, {} forks",
                self.repo,
                stats.stars.unwrap_or(0),
                stats.forks.unwrap_or(0)
            );
            *current = stats;
        } else {
            log::debug!("Stale stats response for {} dropped", self.repo);
        }
    }
}
