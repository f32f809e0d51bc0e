//! Integration tests for the repository stats fetcher
//!
//! Tests verify that:
//! - A successful response is published and cached as identical JSON
//! - Rejections and failures leave value and cache untouched
//! - Cached values are published before the request completes
//! - A superseded request never overwrites the current repository
//! - The HTTP client sends the API headers and rejects non-2xx statuses

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Result};
use portfolio_backdrop::config::StatsParameters;
use portfolio_backdrop::stats::{
    cache_key, GithubClient, MemoryStore, RepoStats, RepoStatsFetcher, SessionStore, StatsSource,
};
use serde_json::{json, Value};

/// Source returning canned responses per repository
struct MockSource {
    responses: Vec<(&'static str, Result<Value, &'static str>)>,
}

impl StatsSource for MockSource {
    fn fetch(&self, repo: &str) -> Result<Value> {
        match self.responses.iter().find(|(name, _)| *name == repo) {
            Some((_, Ok(body))) => Ok(body.clone()),
            Some((_, Err(reason))) => Err(anyhow!("{}", reason)),
            None => Err(anyhow!("no response for {}", repo)),
        }
    }
}

/// Source that holds one repository's response until released
struct GatedSource {
    slow_repo: &'static str,
    gate: Mutex<Receiver<()>>,
}

impl StatsSource for GatedSource {
    fn fetch(&self, repo: &str) -> Result<Value> {
        if repo == self.slow_repo {
            let gate = self.gate.lock().map_err(|_| anyhow!("gate poisoned"))?;
            gate.recv()?;
            return Ok(json!({ "stargazers_count": 1, "forks_count": 1, "pushed_at": "old" }));
        }
        Ok(json!({ "stargazers_count": 99, "forks_count": 9, "pushed_at": "new" }))
    }
}

fn gated(slow_repo: &'static str) -> (GatedSource, Sender<()>) {
    let (tx, rx) = channel();
    (
        GatedSource {
            slow_repo,
            gate: Mutex::new(rx),
        },
        tx,
    )
}

fn success_body() -> Value {
    json!({
        "stargazers_count": 42,
        "forks_count": 7,
        "pushed_at": "2024-01-01T00:00:00Z",
        "full_name": "octo/hello",
    })
}

/// Success publishes the value and caches the same JSON under repo_<id>
#[test]
fn test_success_publishes_and_caches() {
    let store = Arc::new(MemoryStore::new());
    let source = MockSource {
        responses: vec![("octo/hello", Ok(success_body()))],
    };
    let mut fetcher = RepoStatsFetcher::new(Arc::new(source), store.clone());

    fetcher.watch("octo/hello").unwrap().join().unwrap();

    let expected = RepoStats {
        stars: Some(42),
        forks: Some(7),
        updated_at: Some("2024-01-01T00:00:00Z".to_string()),
    };
    assert_eq!(fetcher.current(), expected);
    assert_eq!(
        store.get("repo_octo/hello").as_deref(),
        Some(r#"{"stars":42,"forks":7,"updatedAt":"2024-01-01T00:00:00Z"}"#)
    );
}

/// A transport failure leaves the value unchanged
#[test]
fn test_rejection_keeps_value() {
    let store = Arc::new(MemoryStore::new());
    let source = MockSource {
        responses: vec![("octo/hello", Err("connection reset"))],
    };
    let mut fetcher = RepoStatsFetcher::new(Arc::new(source), store.clone());

    fetcher.watch("octo/hello").unwrap().join().unwrap();

    assert_eq!(fetcher.current(), RepoStats::default());
    assert!(store.is_empty());
}

/// A "Not Found" body leaves both value and cache unchanged
#[test]
fn test_not_found_ignored() {
    let store = Arc::new(MemoryStore::new());
    let cached = r#"{"stars":3,"forks":1,"updatedAt":null}"#;
    store.set(&cache_key("octo/gone"), cached.to_string());
    let source = MockSource {
        responses: vec![("octo/gone", Ok(json!({ "message": "Not Found" })))],
    };
    let mut fetcher = RepoStatsFetcher::new(Arc::new(source), store.clone());

    fetcher.watch("octo/gone").unwrap().join().unwrap();

    assert_eq!(fetcher.current().stars, Some(3));
    assert_eq!(store.get("repo_octo/gone").as_deref(), Some(cached));
}

/// A malformed cache entry is discarded and the fetch still publishes
#[test]
fn test_malformed_cache_discarded() {
    let store = Arc::new(MemoryStore::new());
    store.set("repo_octo/hello", "{broken".to_string());
    let source = MockSource {
        responses: vec![("octo/hello", Ok(success_body()))],
    };
    let mut fetcher = RepoStatsFetcher::new(Arc::new(source), store.clone());

    let handle = fetcher.watch("octo/hello").unwrap();
    handle.join().unwrap();

    assert_eq!(fetcher.current().stars, Some(42));
}

/// An empty identifier neither fetches nor touches the cache
#[test]
fn test_empty_identifier() {
    let store = Arc::new(MemoryStore::new());
    let source = MockSource { responses: vec![] };
    let mut fetcher = RepoStatsFetcher::new(Arc::new(source), store.clone());

    assert!(fetcher.watch("").is_none());
    assert_eq!(fetcher.current(), RepoStats::default());
    assert!(store.is_empty());
}

/// A slow response for a previous repository is cached but not published
#[test]
fn test_superseded_response_not_published() {
    let store = Arc::new(MemoryStore::new());
    let (source, release) = gated("octo/slow");
    let mut fetcher = RepoStatsFetcher::new(Arc::new(source), store.clone());

    let slow = fetcher.watch("octo/slow").unwrap();
    let fast = fetcher.watch("octo/fast").unwrap();
    fast.join().unwrap();
    assert_eq!(fetcher.current().stars, Some(99));

    release.send(()).unwrap();
    slow.join().unwrap();

    assert_eq!(fetcher.current().stars, Some(99));
    assert_eq!(fetcher.repo(), Some("octo/fast"));
    let slow_entry = store.get("repo_octo/slow").unwrap();
    assert_eq!(RepoStats::from_cache_json(&slow_entry).unwrap().stars, Some(1));
}

/// Re-pointing publishes the new repository's cached value immediately
#[test]
fn test_repoint_uses_cache() {
    let store = Arc::new(MemoryStore::new());
    store.set("repo_octo/b", r#"{"stars":8,"forks":2,"updatedAt":"x"}"#.to_string());
    let source = MockSource {
        responses: vec![("octo/a", Ok(success_body()))],
    };
    let mut fetcher = RepoStatsFetcher::new(Arc::new(source), store);

    fetcher.watch("octo/a").unwrap().join().unwrap();
    assert_eq!(fetcher.current().stars, Some(42));

    let handle = fetcher.watch("octo/b").unwrap();
    assert_eq!(fetcher.current().stars, Some(8));
    handle.join().unwrap();
    assert_eq!(fetcher.current().stars, Some(8));
}

/// Re-pointing at an uncached repository clears the previous repository's stats
#[test]
fn test_repoint_without_cache_clears_value() {
    let store = Arc::new(MemoryStore::new());
    let source = MockSource {
        responses: vec![("octo/a", Ok(success_body())), ("octo/b", Err("rate limited"))],
    };
    let mut fetcher = RepoStatsFetcher::new(Arc::new(source), store.clone());

    fetcher.watch("octo/a").unwrap().join().unwrap();
    assert_eq!(fetcher.current().stars, Some(42));

    fetcher.watch("octo/b").unwrap().join().unwrap();
    assert_eq!(fetcher.repo(), Some("octo/b"));
    assert_eq!(fetcher.current(), RepoStats::default());
    assert!(store.get("repo_octo/b").is_none());
}

/// Watching the same repository again keeps its value while revalidating
#[test]
fn test_rewatch_same_repo_keeps_value() {
    let store = Arc::new(MemoryStore::new());
    let source = MockSource {
        responses: vec![("octo/a", Ok(success_body()))],
    };
    let mut fetcher = RepoStatsFetcher::new(Arc::new(source), store.clone());
    fetcher.watch("octo/a").unwrap().join().unwrap();

    // Drop the cache entry so only the published value remains
    store.set("repo_octo/a", "{broken".to_string());
    let handle = fetcher.watch("octo/a").unwrap();
    assert_eq!(fetcher.current().stars, Some(42));
    handle.join().unwrap();
    assert_eq!(fetcher.current().stars, Some(42));
}

/// Serve one canned HTTP response on a loopback port
///
/// Returns the base URL and a handle yielding the lowercased request head.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        String::from_utf8_lossy(&head).to_lowercase()
    });

    (base_url, handle)
}

fn loopback_client(base_url: String) -> GithubClient {
    let params = StatsParameters {
        api_base_url: base_url,
        timeout_secs: 5,
        ..Default::default()
    };
    GithubClient::new(&params).unwrap()
}

/// A 200 body is returned unchanged and the request carries the API headers
#[test]
fn test_client_success_and_headers() {
    let (base_url, server) = serve_once("200 OK", r#"{"stargazers_count":42,"forks_count":7,"pushed_at":"2024-01-01T00:00:00Z"}"#);
    let client = loopback_client(base_url);

    let body = client.fetch("o/n").unwrap();
    assert_eq!(
        body,
        json!({ "stargazers_count": 42, "forks_count": 7, "pushed_at": "2024-01-01T00:00:00Z" })
    );

    let head = server.join().unwrap();
    assert!(head.starts_with("get /repos/o/n http/1.1"), "request line: {}", head);
    assert!(head.contains("accept: application/vnd.github+json"));
    assert!(head.contains(&format!("user-agent: portfolio-backdrop/{}", env!("CARGO_PKG_VERSION"))));
}

/// A non-2xx status is a failure even with a JSON body
#[test]
fn test_client_error_status() {
    let (base_url, server) = serve_once("403 Forbidden", r#"{"message":"API rate limit exceeded"}"#);
    let client = loopback_client(base_url);

    let store = Arc::new(MemoryStore::new());
    let mut fetcher = RepoStatsFetcher::new(Arc::new(client), store.clone());
    fetcher.watch("o/n").unwrap().join().unwrap();
    server.join().unwrap();

    assert_eq!(fetcher.current(), RepoStats::default());
    assert!(store.is_empty());
}

/// An unreachable endpoint counts as a failure
#[test]
fn test_unreachable_endpoint() {
    let params = StatsParameters {
        api_base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 2,
        ..Default::default()
    };
    let client = GithubClient::new(&params).unwrap();
    assert!(client.fetch("octo/hello").is_err());

    let store = Arc::new(MemoryStore::new());
    let mut fetcher = RepoStatsFetcher::new(Arc::new(client), store.clone());
    fetcher.watch("octo/hello").unwrap().join().unwrap();
    assert_eq!(fetcher.current(), RepoStats::default());
    assert!(store.is_empty());
}
