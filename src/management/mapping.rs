use std::{io::Error, path::PathBuf};

use crate::types::PlaylistPair;

#[derive(Debug)]
pub enum MappingError {
    IoError(Error),
    SerdeError(serde_json::Error),
}

impl From<Error> for MappingError {
    fn from(err: Error) -> Self {
        MappingError::IoError(err)
    }
}

impl std::fmt::Display for MappingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappingError::IoError(e) => write!(f, "io error: {}", e),
            MappingError::SerdeError(e) => write!(f, "serde error: {}", e),
        }
    }
}

/// Persistent store of source-to-target playlist mappings.
///
/// A source playlist id maps to at most one active target id; adding a pair
/// for an already-mapped source replaces the previous target.
pub struct MappingManager {
    pairs: Vec<PlaylistPair>,
}

impl MappingManager {
    pub fn new(pairs: Option<Vec<PlaylistPair>>) -> Self {
        Self {
            pairs: pairs.unwrap_or_default(),
        }
    }

    pub async fn load() -> Result<Self, MappingError> {
        let path = Self::mapping_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| MappingError::IoError(e))?;
        let pairs: Vec<PlaylistPair> =
            serde_json::from_str(&content).map_err(|e| MappingError::SerdeError(e))?;
        Ok(Self { pairs })
    }

    pub async fn persist(&self) -> Result<(), MappingError> {
        let path = Self::mapping_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| MappingError::IoError(e))?;
        }

        let json =
            serde_json::to_string_pretty(&self.pairs).map_err(|e| MappingError::SerdeError(e))?;
        async_fs::write(path, json)
            .await
            .map_err(|e| MappingError::IoError(e))
    }

    pub fn add(&mut self, pair: PlaylistPair) -> &mut Self {
        self.pairs.retain(|p| p.spotify_id != pair.spotify_id);
        self.pairs.push(pair);
        self
    }

    /// Removes the mapping for a source playlist. Returns whether an entry
    /// was present.
    pub fn remove(&mut self, spotify_id: &str) -> bool {
        let before = self.pairs.len();
        self.pairs.retain(|p| p.spotify_id != spotify_id);
        self.pairs.len() != before
    }

    pub fn all(&self) -> Vec<PlaylistPair> {
        self.pairs.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn count(&self) -> usize {
        self.pairs.len()
    }

    fn mapping_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("plsyncli/mappings.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(sp: &str, yt: Option<&str>) -> PlaylistPair {
        PlaylistPair {
            spotify_id: sp.to_string(),
            ytmusic_id: yt.map(String::from),
        }
    }

    #[test]
    fn add_replaces_existing_source_mapping() {
        let mut mgr = MappingManager::new(None);
        mgr.add(pair("sp1", Some("yt1")));
        mgr.add(pair("sp1", Some("yt2")));

        let all = mgr.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].ytmusic_id.as_deref(), Some("yt2"));
    }

    #[test]
    fn remove_reports_presence() {
        let mut mgr = MappingManager::new(Some(vec![pair("sp1", None)]));
        assert!(mgr.remove("sp1"));
        assert!(!mgr.remove("sp1"));
        assert!(mgr.is_empty());
    }
}
