//! Main application model with state management

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::liked::{LikedStore, LikedTrack};
use super::session::{Advance, SwipeSession};
use super::types::{Genre, Screen, Track, UiState};

/// How long a user-facing error stays on screen before auto-clearing
const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(5);

/// Everything the view needs for one frame
#[derive(Clone)]
pub struct AppSnapshot {
    pub ui: UiState,
    pub selected_genres: Vec<Genre>,
    pub current_track: Option<Track>,
    pub current_liked: bool,
    pub position: usize,
    pub queue_len: usize,
    pub liked: Vec<LikedTrack>,
}

/// Main application model containing all state
pub struct AppModel {
    session: Arc<Mutex<SwipeSession>>,
    pub liked: LikedStore,
    ui_state: Arc<Mutex<UiState>>,
    should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(liked: LikedStore) -> Self {
        Self {
            session: Arc::new(Mutex::new(SwipeSession::new())),
            liked,
            ui_state: Arc::new(Mutex::new(UiState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    // ========================================================================
    // UI state
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn screen(&self) -> Screen {
        self.ui_state.lock().await.screen
    }

    pub async fn set_screen(&self, screen: Screen) {
        let mut ui = self.ui_state.lock().await;
        ui.screen = screen;
        if screen == Screen::LikedList {
            ui.liked_selected = 0;
        }
    }

    pub async fn set_loading(&self, loading: bool) {
        self.ui_state.lock().await.loading = loading;
    }

    /// Claim the loading flag. Returns `false` when a load is already in
    /// flight, so only one refill runs at a time.
    pub async fn begin_loading(&self) -> bool {
        let mut ui = self.ui_state.lock().await;
        if ui.loading {
            false
        } else {
            ui.loading = true;
            true
        }
    }

    pub async fn set_error(&self, message: String) {
        let mut ui = self.ui_state.lock().await;
        ui.error_message = Some(message);
        ui.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut ui = self.ui_state.lock().await;
        ui.error_message = None;
        ui.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    /// Clear errors that have been visible longer than the display window.
    pub async fn auto_clear_old_errors(&self) {
        let mut ui = self.ui_state.lock().await;
        if let Some(ts) = ui.error_timestamp {
            if ts.elapsed() >= ERROR_DISPLAY_DURATION {
                ui.error_message = None;
                ui.error_timestamp = None;
            }
        }
    }

    pub async fn genre_cursor_up(&self) {
        let mut ui = self.ui_state.lock().await;
        if ui.genre_cursor == 0 {
            ui.genre_cursor = Genre::ALL.len() - 1;
        } else {
            ui.genre_cursor -= 1;
        }
    }

    pub async fn genre_cursor_down(&self) {
        let mut ui = self.ui_state.lock().await;
        ui.genre_cursor = (ui.genre_cursor + 1) % Genre::ALL.len();
    }

    pub async fn liked_cursor_up(&self) {
        let mut ui = self.ui_state.lock().await;
        ui.liked_selected = ui.liked_selected.saturating_sub(1);
    }

    pub async fn liked_cursor_down(&self) {
        let count = self.liked.len().await;
        let mut ui = self.ui_state.lock().await;
        if count > 0 && ui.liked_selected < count - 1 {
            ui.liked_selected += 1;
        }
    }

    // ========================================================================
    // Session
    // ========================================================================

    pub async fn toggle_genre_at_cursor(&self) {
        let cursor = self.ui_state.lock().await.genre_cursor;
        let mut session = self.session.lock().await;
        session.toggle_genre(Genre::ALL[cursor]);
    }

    pub async fn selected_genres(&self) -> Vec<Genre> {
        self.session.lock().await.selected_genres()
    }

    pub async fn has_genre_selection(&self) -> bool {
        self.session.lock().await.has_selection()
    }

    pub async fn start_queue(&self, tracks: Vec<Track>) {
        self.session.lock().await.start(tracks);
    }

    pub async fn current_track(&self) -> Option<Track> {
        self.session.lock().await.current_track().cloned()
    }

    pub async fn advance(&self) -> Advance {
        self.session.lock().await.advance()
    }

    /// Collect the state the view renders from.
    pub async fn snapshot(&self) -> AppSnapshot {
        let ui = self.ui_state.lock().await.clone();
        let (selected_genres, current_track, position, queue_len) = {
            let session = self.session.lock().await;
            (
                session.selected_genres(),
                session.current_track().cloned(),
                session.position(),
                session.queue_len(),
            )
        };
        let current_liked = match &current_track {
            Some(track) => self.liked.contains(&track.id).await,
            None => false,
        };
        AppSnapshot {
            ui,
            selected_genres,
            current_track,
            current_liked,
            position,
            queue_len,
            liked: self.liked.all().await,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn model(dir: &std::path::Path) -> AppModel {
        AppModel::new(LikedStore::with_path(dir.join("liked.json")))
    }

    #[tokio::test]
    async fn begin_loading_claims_the_flag_exactly_once() {
        let dir = tempdir().unwrap();
        let model = model(dir.path());

        assert!(model.begin_loading().await);
        // A second trigger while a load is in flight must not claim it
        assert!(!model.begin_loading().await);
        assert!(model.get_ui_state().await.loading);

        model.set_loading(false).await;
        assert!(model.begin_loading().await);
    }

    #[tokio::test]
    async fn errors_clear_after_the_display_window() {
        let dir = tempdir().unwrap();
        let model = model(dir.path());

        model.set_error("boom".to_string()).await;
        assert!(model.has_error().await);

        // Freshly raised errors survive an auto-clear pass
        model.auto_clear_old_errors().await;
        assert!(model.has_error().await);

        model.ui_state.lock().await.error_timestamp =
            Some(Instant::now() - ERROR_DISPLAY_DURATION);
        model.auto_clear_old_errors().await;
        assert!(!model.has_error().await);
    }
}
