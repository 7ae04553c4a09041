//! View module - UI rendering
//!
//! Pure rendering from a model snapshot; nothing in here mutates state.
//! One submodule per screen:
//!
//! - `genre_select`: the genre toggle list
//! - `swipe`: the current track card
//! - `liked_list`: the persisted liked tracks
//! - `overlays`: the error notice rendered on top of any screen
//! - `utils`: shared text/list helpers

mod genre_select;
mod liked_list;
mod overlays;
mod swipe;
mod utils;

use ratatui::Frame;

use crate::model::{AppSnapshot, Screen};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, snapshot: &AppSnapshot, preview_active: bool) {
        // Exactly one screen is visible at a time
        match snapshot.ui.screen {
            Screen::GenreSelect => genre_select::render(frame, snapshot),
            Screen::Swipe => swipe::render(frame, snapshot, preview_active),
            Screen::LikedList => liked_list::render(frame, snapshot),
        }

        if snapshot.ui.error_message.is_some() {
            overlays::render_error_notification(frame, &snapshot.ui);
        }
    }
}
