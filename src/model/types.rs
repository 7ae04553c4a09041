//! Core type definitions for the application

use std::time::Instant;

/// The music genres the user can pick from.
///
/// The numeric ids come from the Deezer genre taxonomy; the slug is what
/// the Spotify search endpoint understands in a `genre:"..."` filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Genre {
    Pop,
    Rock,
    HipHop,
    Electronic,
    Jazz,
    Classical,
    Country,
    Rnb,
}

impl Genre {
    pub const ALL: [Genre; 8] = [
        Genre::Pop,
        Genre::Rock,
        Genre::HipHop,
        Genre::Electronic,
        Genre::Jazz,
        Genre::Classical,
        Genre::Country,
        Genre::Rnb,
    ];

    /// Deezer's internal category id for this genre.
    pub fn deezer_id(self) -> u32 {
        match self {
            Genre::Pop => 132,
            Genre::Rock => 152,
            Genre::HipHop => 116,
            Genre::Electronic => 106,
            Genre::Jazz => 129,
            Genre::Classical => 98,
            Genre::Country => 144,
            Genre::Rnb => 165,
        }
    }

    /// Slug used in Spotify `genre:"..."` search filters.
    pub fn spotify_slug(self) -> &'static str {
        match self {
            Genre::Pop => "pop",
            Genre::Rock => "rock",
            Genre::HipHop => "hip-hop",
            Genre::Electronic => "electronic",
            Genre::Jazz => "jazz",
            Genre::Classical => "classical",
            Genre::Country => "country",
            Genre::Rnb => "r-n-b",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Genre::Pop => "Pop",
            Genre::Rock => "Rock",
            Genre::HipHop => "Hip-Hop",
            Genre::Electronic => "Electronic",
            Genre::Jazz => "Jazz",
            Genre::Classical => "Classical",
            Genre::Country => "Country",
            Genre::Rnb => "R&B",
        }
    }
}

/// Which of the three screens is currently visible
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    GenreSelect,
    Swipe,
    LikedList,
}

/// A track with a playable preview, produced by the catalog layer.
///
/// The catalog only ever constructs tracks with a non-empty `preview_url`;
/// everything downstream relies on that.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub cover_medium: String,
    pub cover_big: String,
    pub cover_xl: String,
    pub preview_url: String,
}

/// UI state for the application
#[derive(Clone)]
pub struct UiState {
    pub screen: Screen,
    pub genre_cursor: usize,
    pub liked_selected: usize,
    pub loading: bool,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            screen: Screen::GenreSelect,
            genre_cursor: 0,
            liked_selected: 0,
            loading: false,
            error_message: None,
            error_timestamp: None,
        }
    }
}
