//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for
//! the application. It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (genres, screens, tracks, UI state)
//! - `session`: The swipe session (selection, shuffled queue, position)
//! - `liked`: Persisted liked-tracks store
//! - `catalog`: Track source adapters (Deezer, Spotify)
//! - `app_model`: Main application model with state management methods

mod app_model;
mod catalog;
mod liked;
mod session;
mod types;

// Re-export all public types for convenient access
pub use types::{Genre, Screen, Track, UiState};

pub use session::Advance;

pub use liked::{LikedStore, LikedTrack};

pub use catalog::{Catalog, DeezerCatalog};

pub use app_model::{AppModel, AppSnapshot};
