//! Repository snapshot: a 1:1 mapping of the repo record, no aggregation.

use serde::Serialize;

use crate::github::RepoSnapshot;

/// Headline repository figures.
#[derive(Debug, Serialize, Clone)]
pub struct RepoStats {
    pub stars: u32,
    pub forks: u32,
    pub watchers: u32,
    pub size_kb: u32,
    /// ISO-8601 UTC timestamp of the last update, or empty when the record
    /// carries none. Deliberately not the "N/A" sentinel, which is reserved
    /// for undefined averages.
    pub last_updated: String,
    pub language: String,
}

pub fn extract(snapshot: &RepoSnapshot) -> RepoStats {
    RepoStats {
        stars: snapshot.stars,
        forks: snapshot.forks,
        watchers: snapshot.watchers,
        size_kb: snapshot.size_kb,
        last_updated: snapshot
            .last_updated
            .map(|updated| updated.format("%Y-%m-%dT%H:%M:%SZ").to_string())
            .unwrap_or_default(),
        language: snapshot.language.clone().unwrap_or_default(),
    }
}
