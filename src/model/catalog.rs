//! Catalog clients - where tracks come from
//!
//! Two providers are supported behind the [`Catalog`] enum:
//!
//! - Deezer: resolve the fixed genre id, list the genre's artists, then
//!   pull a handful of top tracks per artist.
//! - Spotify: a token-authenticated genre search, used when client
//!   credentials are configured, with Deezer as fallback when the search
//!   comes back empty.
//!
//! Both providers only ever emit tracks that carry a preview URL. A failed
//! sub-request is logged and skipped; it never aborts the overall load.

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::auth::TokenProvider;
use crate::log_api_result;

use super::types::{Genre, Track};

pub const DEEZER_BASE: &str = "https://api.deezer.com";
pub const SPOTIFY_API_BASE: &str = "https://api.spotify.com";

/// Top tracks fetched per artist on the Deezer path
const TOP_TRACKS_LIMIT: u32 = 5;
/// Page size for the Spotify genre search
const SEARCH_LIMIT: u32 = 50;

// ============================================================================
// Deezer
// ============================================================================

/// Deezer wraps every listing in `{ "data": [...] }`; error payloads omit
/// the field entirely, which we treat as an empty page.
#[derive(Debug, Deserialize)]
struct DeezerPage<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct DeezerArtist {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct DeezerTrack {
    id: u64,
    title: String,
    #[serde(default)]
    preview: String,
    artist: DeezerTrackArtist,
    album: DeezerAlbum,
}

#[derive(Debug, Deserialize)]
struct DeezerTrackArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct DeezerAlbum {
    title: String,
    #[serde(default)]
    cover_medium: String,
    #[serde(default)]
    cover_big: String,
    #[serde(default)]
    cover_xl: String,
}

/// Keep only tracks with a preview and map them into the app's Track type.
fn playable_deezer_tracks(tracks: Vec<DeezerTrack>) -> Vec<Track> {
    tracks
        .into_iter()
        .filter(|t| !t.preview.is_empty())
        .map(|t| Track {
            id: t.id.to_string(),
            title: t.title,
            artist: t.artist.name,
            album: t.album.title,
            cover_medium: t.album.cover_medium,
            cover_big: t.album.cover_big,
            cover_xl: t.album.cover_xl,
            preview_url: t.preview,
        })
        .collect()
}

/// Catalog client for the Deezer public API.
#[derive(Clone)]
pub struct DeezerCatalog {
    http: reqwest::Client,
    base: String,
}

impl DeezerCatalog {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base: DEEZER_BASE.to_string(),
        }
    }

    /// Collect preview-playable tracks for every selected genre.
    ///
    /// Sub-requests run sequentially; any that fail are skipped. An empty
    /// result is the caller's cue to show the "no tracks found" notice.
    pub async fn tracks_for_genres(&self, genres: &[Genre]) -> Vec<Track> {
        let mut tracks = Vec::new();

        for genre in genres {
            let artists = match self.artists_for_genre(*genre).await {
                Ok(artists) => artists,
                Err(e) => {
                    tracing::warn!(genre = genre.label(), error = %e, "Skipping genre after failed artist fetch");
                    continue;
                }
            };

            for artist in artists {
                match self.top_tracks(artist.id).await {
                    Ok(mut artist_tracks) => tracks.append(&mut artist_tracks),
                    Err(e) => {
                        tracing::warn!(artist = %artist.name, error = %e, "Skipping artist after failed track fetch");
                    }
                }
            }
        }

        tracing::info!(count = tracks.len(), "Deezer load finished");
        tracks
    }

    async fn artists_for_genre(&self, genre: Genre) -> Result<Vec<DeezerArtist>> {
        let url = format!("{}/genre/{}/artists", self.base, genre.deezer_id());
        let result = self.get_json::<DeezerPage<DeezerArtist>>(&url).await;
        log_api_result!("deezer_genre_artists", result);
        Ok(result?.data)
    }

    async fn top_tracks(&self, artist_id: u64) -> Result<Vec<Track>> {
        let url = format!(
            "{}/artist/{}/top?limit={}",
            self.base, artist_id, TOP_TRACKS_LIMIT
        );
        let result = self.get_json::<DeezerPage<DeezerTrack>>(&url).await;
        log_api_result!("deezer_artist_top", result);
        Ok(playable_deezer_tracks(result?.data))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        Ok(self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?)
    }
}

// ============================================================================
// Spotify
// ============================================================================

#[derive(Debug, Deserialize)]
struct SpotifySearchResponse {
    tracks: SpotifyTrackPage,
}

#[derive(Debug, Deserialize)]
struct SpotifyTrackPage {
    #[serde(default)]
    items: Vec<SpotifyTrack>,
}

#[derive(Debug, Deserialize)]
struct SpotifyTrack {
    id: String,
    name: String,
    artists: Vec<SpotifyArtist>,
    album: SpotifyAlbum,
    preview_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SpotifyAlbum {
    name: String,
    #[serde(default)]
    images: Vec<SpotifyImage>,
}

#[derive(Debug, Deserialize)]
struct SpotifyImage {
    url: String,
}

/// Keep only items with a preview URL. Spotify orders album images from
/// largest to smallest.
fn playable_spotify_tracks(items: Vec<SpotifyTrack>) -> Vec<Track> {
    items
        .into_iter()
        .filter_map(|t| {
            let preview_url = t.preview_url.filter(|p| !p.is_empty())?;
            let artist = t.artists.first().map(|a| a.name.clone()).unwrap_or_default();
            let cover_large = t.album.images.first().map(|i| i.url.clone()).unwrap_or_default();
            let cover_small = t.album.images.last().map(|i| i.url.clone()).unwrap_or_default();
            Some(Track {
                id: t.id,
                title: t.name,
                artist,
                album: t.album.name,
                cover_medium: cover_small,
                cover_big: cover_large.clone(),
                cover_xl: cover_large,
                preview_url,
            })
        })
        .collect()
}

/// Catalog client for the Spotify Web API (client-credentials search).
#[derive(Clone)]
pub struct SpotifyCatalog {
    http: reqwest::Client,
    auth: TokenProvider,
    base: String,
}

impl SpotifyCatalog {
    pub fn new(http: reqwest::Client, auth: TokenProvider) -> Self {
        Self {
            http,
            auth,
            base: SPOTIFY_API_BASE.to_string(),
        }
    }

    pub async fn tracks_for_genres(&self, genres: &[Genre]) -> Vec<Track> {
        let mut tracks = Vec::new();

        for genre in genres {
            let result = self.search_genre(*genre).await;
            log_api_result!("spotify_search", result);
            match result {
                Ok(mut genre_tracks) => tracks.append(&mut genre_tracks),
                Err(e) => {
                    tracing::warn!(genre = genre.label(), error = %e, "Skipping genre after failed search");
                }
            }
        }

        tracing::info!(count = tracks.len(), "Spotify load finished");
        tracks
    }

    /// One genre search. A 401 invalidates the cached token and the
    /// request is retried exactly once with a fresh one.
    async fn search_genre(&self, genre: Genre) -> Result<Vec<Track>> {
        let response = self.search_request(genre).await?;

        let response = if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            tracing::info!("Spotify returned 401, re-authenticating once");
            self.auth.invalidate().await;
            self.search_request(genre).await?
        } else {
            response
        };

        if !response.status().is_success() {
            return Err(anyhow!("Spotify search failed with {}", response.status()));
        }

        let body: SpotifySearchResponse = response.json().await?;
        Ok(playable_spotify_tracks(body.tracks.items))
    }

    async fn search_request(&self, genre: Genre) -> Result<reqwest::Response> {
        let token = self.auth.bearer().await?;
        let url = format!("{}/v1/search", self.base);
        Ok(self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("q", format!("genre:\"{}\"", genre.spotify_slug())),
                ("type", "track".to_string()),
                ("limit", SEARCH_LIMIT.to_string()),
            ])
            .send()
            .await?)
    }
}

// ============================================================================
// Provider selection
// ============================================================================

/// The configured track source.
///
/// Spotify is picked up when client credentials are present in the
/// environment and falls back to Deezer when its search yields nothing;
/// otherwise Deezer alone is used.
#[derive(Clone)]
pub enum Catalog {
    Deezer(DeezerCatalog),
    SpotifyWithFallback {
        spotify: SpotifyCatalog,
        fallback: DeezerCatalog,
    },
}

impl Catalog {
    pub fn from_env(http: reqwest::Client) -> Self {
        match TokenProvider::from_env(http.clone()) {
            Some(auth) => {
                tracing::info!("Spotify credentials found, using Spotify with Deezer fallback");
                Catalog::SpotifyWithFallback {
                    spotify: SpotifyCatalog::new(http.clone(), auth),
                    fallback: DeezerCatalog::new(http),
                }
            }
            None => {
                tracing::info!("No Spotify credentials, using Deezer");
                Catalog::Deezer(DeezerCatalog::new(http))
            }
        }
    }

    pub async fn tracks_for_genres(&self, genres: &[Genre]) -> Vec<Track> {
        match self {
            Catalog::Deezer(deezer) => deezer.tracks_for_genres(genres).await,
            Catalog::SpotifyWithFallback { spotify, fallback } => {
                let tracks = spotify.tracks_for_genres(genres).await;
                if tracks.is_empty() {
                    tracing::info!("Spotify search empty, falling back to Deezer");
                    fallback.tracks_for_genres(genres).await
                } else {
                    tracks
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deezer_tracks_without_preview_are_dropped() {
        let page: DeezerPage<DeezerTrack> = serde_json::from_value(json!({
            "data": [
                { "id": 1, "title": "A", "preview": "https://cdn/a.mp3",
                  "artist": { "name": "X" },
                  "album": { "title": "AX", "cover_medium": "m", "cover_big": "b", "cover_xl": "x" } },
                { "id": 2, "title": "B", "preview": "",
                  "artist": { "name": "X" }, "album": { "title": "BX" } },
                { "id": 3, "title": "C", "preview": "https://cdn/c.mp3",
                  "artist": { "name": "Y" }, "album": { "title": "CY" } },
                { "id": 4, "title": "D",
                  "artist": { "name": "Y" }, "album": { "title": "DY" } },
                { "id": 5, "title": "E", "preview": "https://cdn/e.mp3",
                  "artist": { "name": "Z" }, "album": { "title": "EZ" } }
            ]
        }))
        .unwrap();

        let tracks = playable_deezer_tracks(page.data);
        assert_eq!(tracks.len(), 3);
        assert!(tracks.iter().all(|t| !t.preview_url.is_empty()));
        assert_eq!(tracks[0].id, "1");
        assert_eq!(tracks[0].artist, "X");
        assert_eq!(tracks[0].cover_medium, "m");
    }

    #[test]
    fn deezer_error_payload_parses_as_empty_page() {
        let page: DeezerPage<DeezerArtist> = serde_json::from_value(json!({
            "error": { "type": "DataException", "message": "no data" }
        }))
        .unwrap();
        assert!(page.data.is_empty());
    }

    #[test]
    fn spotify_tracks_without_preview_are_dropped() {
        let response: SpotifySearchResponse = serde_json::from_value(json!({
            "tracks": {
                "items": [
                    { "id": "a", "name": "A", "preview_url": "https://p/a.mp3",
                      "artists": [{ "name": "X" }],
                      "album": { "name": "AX", "images": [{ "url": "big" }, { "url": "small" }] } },
                    { "id": "b", "name": "B", "preview_url": null,
                      "artists": [{ "name": "X" }], "album": { "name": "BX" } },
                    { "id": "c", "name": "C", "preview_url": "https://p/c.mp3",
                      "artists": [], "album": { "name": "CY", "images": [] } }
                ]
            }
        }))
        .unwrap();

        let tracks = playable_spotify_tracks(response.tracks.items);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].cover_big, "big");
        assert_eq!(tracks[0].cover_medium, "small");
        // Missing artists/images degrade to empty strings, not errors
        assert_eq!(tracks[1].artist, "");
        assert_eq!(tracks[1].cover_big, "");
    }
}
