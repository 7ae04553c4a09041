//! Controller module - Application logic and event handling
//!
//! Coordinates between the model, the catalog and the preview player.
//! Organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `session_flow`: Session start, like/skip, queue refill, playback

mod input;
mod session_flow;

use std::sync::Arc;

use crate::audio::PreviewPlayer;
use crate::model::{AppModel, Catalog};

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<AppModel>,
    pub(crate) catalog: Catalog,
    pub(crate) playback: PreviewPlayer,
}

impl AppController {
    pub fn new(model: Arc<AppModel>, catalog: Catalog, playback: PreviewPlayer) -> Self {
        Self {
            model,
            catalog,
            playback,
        }
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        let error_str = error.to_string();

        if error_str.contains("401") {
            "Authentication failed. Check your Spotify credentials.".to_string()
        } else if error_str.contains("429") {
            "Rate limited by the catalog. Please wait a moment.".to_string()
        } else if error_str.contains("timed out") {
            "The catalog is not responding. Check your connection.".to_string()
        } else {
            format!("Error: {}", error_str)
        }
    }
}
