//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::model::Screen;

use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        // An error notice blocks all other interactions
        if self.model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.model.clear_error().await;
            }
            return Ok(());
        }

        // Global quit
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
            self.playback.stop().await;
            self.model.set_should_quit(true).await;
            return Ok(());
        }

        match self.model.screen().await {
            Screen::GenreSelect => match key.code {
                KeyCode::Up => self.model.genre_cursor_up().await,
                KeyCode::Down => self.model.genre_cursor_down().await,
                KeyCode::Char(' ') | KeyCode::Enter => {
                    self.model.toggle_genre_at_cursor().await;
                }
                KeyCode::Char('s') | KeyCode::Char('S') => {
                    self.start_session().await;
                }
                _ => {}
            },
            Screen::Swipe => {
                // Swiping on a stale queue makes no sense mid-refill
                if self.model.get_ui_state().await.loading {
                    return Ok(());
                }
                match key.code {
                    KeyCode::Right => self.like_current().await,
                    KeyCode::Left => self.skip_current().await,
                    KeyCode::Char('l') | KeyCode::Char('L') => {
                        // Leaving the swipe screen releases the preview
                        self.playback.stop().await;
                        self.model.set_screen(Screen::LikedList).await;
                    }
                    _ => {}
                }
            }
            Screen::LikedList => match key.code {
                KeyCode::Up => self.model.liked_cursor_up().await,
                KeyCode::Down => self.model.liked_cursor_down().await,
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') | KeyCode::Char('B') => {
                    self.model.set_screen(Screen::Swipe).await;
                }
                _ => {}
            },
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::{KeyEvent, KeyModifiers};
    use tempfile::tempdir;

    use crate::audio::PreviewPlayer;
    use crate::model::{AppModel, Catalog, DeezerCatalog, LikedStore};

    use super::*;

    fn controller(dir: &std::path::Path) -> AppController {
        let http = reqwest::Client::new();
        let model = Arc::new(AppModel::new(LikedStore::with_path(
            dir.join("liked.json"),
        )));
        let catalog = Catalog::Deezer(DeezerCatalog::new(http.clone()));
        AppController::new(model, catalog, PreviewPlayer::new(http))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn opening_liked_list_releases_the_preview() {
        let dir = tempdir().unwrap();
        let controller = controller(dir.path());
        controller.model.set_screen(Screen::Swipe).await;

        let (stop, _) = controller.playback.acquire_handle().await;
        assert!(controller.playback.is_active().await);

        controller
            .handle_key_event(press(KeyCode::Char('l')))
            .await
            .unwrap();

        assert_eq!(controller.model.screen().await, Screen::LikedList);
        assert!(stop.load(std::sync::atomic::Ordering::SeqCst));
        assert!(!controller.playback.is_active().await);
    }

    #[tokio::test]
    async fn quit_releases_the_preview() {
        let dir = tempdir().unwrap();
        let controller = controller(dir.path());
        controller.model.set_screen(Screen::Swipe).await;
        controller.playback.acquire_handle().await;

        controller
            .handle_key_event(press(KeyCode::Char('q')))
            .await
            .unwrap();

        assert!(controller.model.should_quit().await);
        assert!(!controller.playback.is_active().await);
    }
}
