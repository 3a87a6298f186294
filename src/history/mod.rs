mod store;

pub use store::{FileStore, KeyValueStore};

#[cfg(test)]
pub use store::MemoryStore;

use crate::media::{MediaMetadata, Platform};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

pub const HISTORY_KEY: &str = "download_history";
pub const HISTORY_LIMIT: usize = 10;

/// A past lookup, as persisted under [`HISTORY_KEY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub url: String,
    pub title: String,
    pub platform: Platform,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl HistoryEntry {
    pub fn new(url: &str, metadata: &MediaMetadata) -> Self {
        Self {
            id: crate::utils::short_token(),
            url: url.to_string(),
            title: metadata.title.clone(),
            platform: metadata.platform,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Bounded, most-recent-first list of lookups with at most one entry per url.
///
/// Not safe for concurrent writers; callers serialize access.
pub struct HistoryCache<S> {
    entries: Vec<HistoryEntry>,
    store: S,
}

impl<S: KeyValueStore> HistoryCache<S> {
    /// Read the persisted list. Anything missing or unreadable means an empty history.
    ///
    /// A hand-edited list is brought back to one entry per url and at most
    /// [`HISTORY_LIMIT`] entries, keeping the front-most ones.
    pub fn load(store: S) -> Self {
        let mut entries = match store.get(HISTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring unreadable history: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No saved history");
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read history: {:#}", e);
                Vec::new()
            }
        };

        let mut seen = HashSet::new();
        entries.retain(|h| seen.insert(h.url.clone()));
        entries.truncate(HISTORY_LIMIT);

        Self { entries, store }
    }

    pub fn record(&mut self, entry: HistoryEntry) -> &[HistoryEntry] {
        self.entries.retain(|h| h.url != entry.url);
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_LIMIT);

        if let Err(e) = self.persist() {
            warn!("Failed to save history: {:#}", e);
        }

        &self.entries
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&mut self) -> anyhow::Result<()> {
        let value = serde_json::to_string(&self.entries)?;
        self.store.set(HISTORY_KEY, &value)
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str, title: &str) -> HistoryEntry {
        HistoryEntry {
            id: crate::utils::short_token(),
            url: url.to_string(),
            title: title.to_string(),
            platform: Platform::Unknown,
            timestamp: 0,
        }
    }

    fn urls(entries: &[HistoryEntry]) -> Vec<&str> {
        entries.iter().map(|h| h.url.as_str()).collect()
    }

    #[test]
    fn test_same_url_kept_once_at_front() {
        let mut cache = HistoryCache::load(MemoryStore::default());
        cache.record(entry("https://x/1", "first"));
        cache.record(entry("https://x/other", "other"));
        let entries = cache.record(entry("https://x/1", "second"));

        assert_eq!(urls(entries), vec!["https://x/1", "https://x/other"]);
        assert_eq!(entries[0].title, "second");
    }

    #[test]
    fn test_cap_keeps_newest_ten() {
        let mut cache = HistoryCache::load(MemoryStore::default());
        for i in 0..15 {
            cache.record(entry(&format!("https://x/{i}"), "t"));
        }

        assert_eq!(cache.len(), HISTORY_LIMIT);
        let expected: Vec<String> = (5..15).rev().map(|i| format!("https://x/{i}")).collect();
        assert_eq!(urls(cache.entries()), expected);
    }

    #[test]
    fn test_replacement_scenario() {
        let mut cache = HistoryCache::load(MemoryStore::default());
        cache.record(entry("https://x/1", "A"));
        cache.record(entry("https://x/2", "B"));
        let entries = cache.record(entry("https://x/1", "A2"));

        let pairs: Vec<(&str, &str)> = entries
            .iter()
            .map(|h| (h.url.as_str(), h.title.as_str()))
            .collect();
        assert_eq!(pairs, vec![("https://x/1", "A2"), ("https://x/2", "B")]);
    }

    #[test]
    fn test_load_empty_or_corrupt_is_empty() {
        assert!(HistoryCache::load(MemoryStore::default()).is_empty());
        assert!(HistoryCache::load(MemoryStore::with(HISTORY_KEY, "")).is_empty());
        assert!(HistoryCache::load(MemoryStore::with(HISTORY_KEY, "{not json")).is_empty());
        assert!(HistoryCache::load(MemoryStore::with(HISTORY_KEY, r#"{"url": 1}"#)).is_empty());
    }

    #[test]
    fn test_load_restores_invariants() {
        let mut saved: Vec<HistoryEntry> = (0..12)
            .map(|i| entry(&format!("https://x/{i}"), "t"))
            .collect();
        saved.insert(1, entry("https://x/0", "older duplicate"));
        let raw = serde_json::to_string(&saved).unwrap();

        let cache = HistoryCache::load(MemoryStore::with(HISTORY_KEY, &raw));

        assert_eq!(cache.len(), HISTORY_LIMIT);
        let expected: Vec<String> = (0..10).map(|i| format!("https://x/{i}")).collect();
        assert_eq!(urls(cache.entries()), expected);
        assert_eq!(cache.entries()[0].title, "t");
    }

    #[test]
    fn test_record_persists_whole_list() {
        let mut cache = HistoryCache::load(MemoryStore::default());
        cache.record(entry("https://x/1", "A"));
        cache.record(entry("https://x/2", "B"));

        let raw = cache.store().get(HISTORY_KEY).unwrap().unwrap();
        let saved: Vec<HistoryEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(saved, cache.entries());
    }

    #[test]
    fn test_persisted_format() {
        let mut cache = HistoryCache::load(MemoryStore::default());
        let mut e = entry("https://x/1", "A");
        e.platform = Platform::Youtube;
        e.timestamp = 1_700_000_000_000;
        cache.record(e);

        let raw = cache.store().get(HISTORY_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["platform"], "youtube");
        assert_eq!(value[0]["timestamp"], 1_700_000_000_000_i64);
        assert!(value[0]["id"].is_string());
    }

    #[test]
    fn test_reload_from_file_store() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut cache = HistoryCache::load(FileStore::new(dir.path()));
            cache.record(entry("https://x/1", "A"));
            cache.record(entry("https://x/2", "B"));
        }

        let cache = HistoryCache::load(FileStore::new(dir.path()));
        assert_eq!(urls(cache.entries()), vec!["https://x/2", "https://x/1"]);
    }

    #[test]
    fn test_entry_from_metadata() {
        let metadata: MediaMetadata =
            serde_json::from_str(crate::media::testing::YOUTUBE_REPLY).unwrap();
        let e = HistoryEntry::new("https://youtu.be/abc", &metadata);
        assert_eq!(e.url, "https://youtu.be/abc");
        assert_eq!(e.title, metadata.title);
        assert_eq!(e.platform, Platform::Youtube);
        assert!(e.timestamp > 0);
        assert!(!e.id.is_empty());
    }
}
