use std::{
    collections::{BTreeMap, HashSet},
    io::Error,
    path::{Path, PathBuf},
};

#[derive(Debug)]
pub enum CacheError {
    IoError(Error),
    SerdeError(serde_json::Error),
}

impl From<Error> for CacheError {
    fn from(err: Error) -> Self {
        CacheError::IoError(err)
    }
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::IoError(e) => write!(f, "io error: {}", e),
            CacheError::SerdeError(e) => write!(f, "serde error: {}", e),
        }
    }
}

/// Persistent record of which source tracks have already been reconciled into
/// which target playlist.
///
/// Stored as a JSON object keyed by `"<sourceId>:<targetId>"`, each value an
/// ordered list of source track ids with duplicates suppressed on insert.
/// Membership is monotonic: ids are only ever added for the lifetime of a
/// mapping. The cache is a first-line guard against re-searching; the target
/// playlist's own membership sets remain the second, independent guard, which
/// is why a missing or corrupt cache degrades to empty instead of aborting.
#[derive(Debug)]
pub struct SyncCacheManager {
    entries: BTreeMap<String, Vec<String>>,
}

impl SyncCacheManager {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub async fn load() -> Result<Self, CacheError> {
        Self::load_from(&Self::cache_path()).await
    }

    async fn load_from(path: &Path) -> Result<Self, CacheError> {
        let content = async_fs::read_to_string(path)
            .await
            .map_err(|e| CacheError::IoError(e))?;
        let entries: BTreeMap<String, Vec<String>> =
            serde_json::from_str(&content).map_err(|e| CacheError::SerdeError(e))?;
        Ok(Self { entries })
    }

    pub async fn persist(&self) -> Result<(), CacheError> {
        let path = Self::cache_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| CacheError::IoError(e))?;
        }

        let json =
            serde_json::to_string_pretty(&self.entries).map_err(|e| CacheError::SerdeError(e))?;
        async_fs::write(path, json)
            .await
            .map_err(|e| CacheError::IoError(e))
    }

    /// Source track ids already confirmed synced for this playlist pair.
    pub fn synced_tracks(&self, source_playlist: &str, target_playlist: &str) -> HashSet<String> {
        self.entries
            .get(&Self::pair_key(source_playlist, target_playlist))
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Marks a source track as synced for a playlist pair. Re-marking an
    /// existing id is a no-op.
    pub fn mark_synced(&mut self, source_playlist: &str, target_playlist: &str, track_id: &str) {
        let ids = self
            .entries
            .entry(Self::pair_key(source_playlist, target_playlist))
            .or_default();
        if !ids.iter().any(|id| id == track_id) {
            ids.push(track_id.to_string());
        }
    }

    // Both catalogs use URL-safe alphanumeric playlist ids, so the colon
    // cannot occur inside either component.
    fn pair_key(source_playlist: &str, target_playlist: &str) -> String {
        format!("{source_playlist}:{target_playlist}")
    }

    fn cache_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("plsyncli/cache/sync_cache.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_synced_is_monotonic_and_duplicate_free() {
        let mut cache = SyncCacheManager::new();
        cache.mark_synced("sp1", "yt1", "a");
        cache.mark_synced("sp1", "yt1", "b");
        cache.mark_synced("sp1", "yt1", "a");

        let synced = cache.synced_tracks("sp1", "yt1");
        assert_eq!(synced.len(), 2);
        assert!(synced.contains("a"));
        assert!(synced.contains("b"));
        assert_eq!(cache.entries["sp1:yt1"], vec!["a", "b"]);
    }

    #[tokio::test]
    async fn corrupt_document_fails_load_as_serde_error() {
        let path = std::env::temp_dir().join("plsyncli-test-corrupt-sync-cache.json");
        async_fs::write(&path, "not json").await.unwrap();

        let err = SyncCacheManager::load_from(&path).await.unwrap_err();
        assert!(matches!(err, CacheError::SerdeError(_)));
        assert!(err.to_string().starts_with("serde error"));

        // The caller recovers by starting from an empty cache
        let cache = SyncCacheManager::load_from(&path)
            .await
            .unwrap_or_else(|_| SyncCacheManager::new());
        assert!(cache.synced_tracks("sp1", "yt1").is_empty());

        async_fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_document_fails_load_as_io_error() {
        let path = std::env::temp_dir().join("plsyncli-test-missing-sync-cache.json");
        let _ = async_fs::remove_file(&path).await;

        let err = SyncCacheManager::load_from(&path).await.unwrap_err();
        assert!(matches!(err, CacheError::IoError(_)));
    }

    #[test]
    fn pairs_are_isolated() {
        let mut cache = SyncCacheManager::new();
        cache.mark_synced("sp1", "yt1", "a");
        cache.mark_synced("sp1", "yt2", "b");

        assert!(cache.synced_tracks("sp1", "yt1").contains("a"));
        assert!(!cache.synced_tracks("sp1", "yt1").contains("b"));
        assert!(cache.synced_tracks("sp1", "yt2").contains("b"));
        assert!(cache.synced_tracks("sp2", "yt1").is_empty());
    }
}
