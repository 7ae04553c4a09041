//! Persisted liked-tracks store
//!
//! A single JSON array on disk, read once at startup and rewritten
//! wholesale whenever a track is liked. Ids are unique within the
//! collection; a like for an already-liked id is a no-op.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::types::Track;

const LIKED_TRACKS_FILE: &str = ".cache/liked_tracks.json";

/// The liked projection of a [`Track`], as stored on disk.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LikedTrack {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub cover: String,
    pub preview: String,
}

impl LikedTrack {
    pub fn from_track(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            cover: track.cover_medium.clone(),
            preview: track.preview_url.clone(),
        }
    }
}

/// Durable collection of liked tracks, deduplicated by id.
#[derive(Clone)]
pub struct LikedStore {
    entries: Arc<RwLock<Vec<LikedTrack>>>,
    path: PathBuf,
}

impl LikedStore {
    pub fn new() -> Self {
        Self::with_path(LIKED_TRACKS_FILE)
    }

    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            path: path.as_ref().to_path_buf(),
        }
    }

    pub async fn load_from_disk(&self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let tracks: Vec<LikedTrack> = serde_json::from_str(&content)?;
            let mut entries = self.entries.write().await;
            *entries = tracks;
        }
        Ok(())
    }

    pub async fn save_to_disk(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir)?;
            }
        }

        let entries = self.entries.read().await;
        let content = serde_json::to_string(&*entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Add a track to the collection and persist it. Returns false when an
    /// entry with the same id already exists (nothing is written then).
    pub async fn add(&self, track: LikedTrack) -> Result<bool> {
        {
            let mut entries = self.entries.write().await;
            if entries.iter().any(|t| t.id == track.id) {
                return Ok(false);
            }
            entries.push(track);
        }
        self.save_to_disk().await?;
        Ok(true)
    }

    pub async fn contains(&self, track_id: &str) -> bool {
        let entries = self.entries.read().await;
        entries.iter().any(|t| t.id == track_id)
    }

    pub async fn all(&self) -> Vec<LikedTrack> {
        self.entries.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Default for LikedStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn liked(id: &str) -> LikedTrack {
        LikedTrack {
            id: id.to_string(),
            title: format!("Track {}", id),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            cover: String::new(),
            preview: format!("https://cdn.example/{}.mp3", id),
        }
    }

    #[tokio::test]
    async fn add_rejects_duplicate_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = LikedStore::with_path(dir.path().join("liked.json"));

        assert!(store.add(liked("1")).await.unwrap());
        assert!(!store.add(liked("1")).await.unwrap());
        assert_eq!(store.len().await, 1);

        // Still unique after a reload from disk
        let reloaded = LikedStore::with_path(dir.path().join("liked.json"));
        reloaded.load_from_disk().await.unwrap();
        assert_eq!(reloaded.len().await, 1);
    }

    #[tokio::test]
    async fn likes_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("liked.json");

        let store = LikedStore::with_path(&path);
        store.add(liked("1")).await.unwrap();
        store.add(liked("2")).await.unwrap();

        let reloaded = LikedStore::with_path(&path);
        reloaded.load_from_disk().await.unwrap();
        assert_eq!(reloaded.all().await, vec![liked("1"), liked("2")]);
        assert!(reloaded.contains("2").await);
        assert!(!reloaded.contains("3").await);
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LikedStore::with_path(dir.path().join("nope.json"));
        store.load_from_disk().await.unwrap();
        assert_eq!(store.len().await, 0);
    }
}
