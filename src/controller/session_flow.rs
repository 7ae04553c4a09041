//! Session flow: start, like/skip, refill and preview kick-off

use crate::model::{Advance, LikedTrack, Screen};

use super::AppController;

impl AppController {
    /// Start a session for the current genre selection. No-op without a
    /// selection (the start hint is hidden in that case too).
    pub async fn start_session(&self) {
        if !self.model.has_genre_selection().await {
            return;
        }

        tracing::info!(genres = ?self.model.selected_genres().await, "Starting session");
        self.model.set_screen(Screen::Swipe).await;
        self.spawn_reload().await;
    }

    /// Like the current track (deduplicated by id, persisted), then move on.
    pub async fn like_current(&self) {
        if let Some(track) = self.model.current_track().await {
            match self.model.liked.add(LikedTrack::from_track(&track)).await {
                Ok(true) => tracing::info!(track = %track.title, "Track liked"),
                Ok(false) => tracing::debug!(track = %track.title, "Track already liked"),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to persist liked track");
                    self.model.set_error(Self::format_error(&e)).await;
                }
            }
        }
        self.advance().await;
    }

    /// Move on without touching the liked collection.
    pub async fn skip_current(&self) {
        self.advance().await;
    }

    async fn advance(&self) {
        match self.model.advance().await {
            Advance::Next => self.play_current().await,
            Advance::Exhausted => {
                tracing::info!("Queue exhausted, refilling with the same genres");
                self.spawn_reload().await;
            }
        }
    }

    /// Fetch tracks in the background so the UI stays responsive. The
    /// loading flag is claimed before spawning, so a second trigger that
    /// lands while a refill is in flight is a no-op.
    async fn spawn_reload(&self) {
        if !self.model.begin_loading().await {
            tracing::debug!("Refill already in flight, skipping");
            return;
        }
        let controller = self.clone();
        tokio::spawn(async move {
            controller.reload_queue().await;
        });
    }

    /// Fetch tracks for the selected genres and install them as the queue.
    /// The caller holds the loading flag; it is cleared on every exit path.
    pub(crate) async fn reload_queue(&self) {
        let genres = self.model.selected_genres().await;

        let tracks = self.catalog.tracks_for_genres(&genres).await;

        if tracks.is_empty() {
            // Per-request failures were already logged and skipped; an
            // empty load is the one condition the user has to see.
            self.model
                .set_error("No tracks found. Try a different genre selection.".to_string())
                .await;
        } else {
            tracing::info!(count = tracks.len(), "Queue installed");
            self.model.start_queue(tracks).await;
            self.play_current().await;
        }

        self.model.set_loading(false).await;
    }

    /// Kick off preview playback for the current track. Playback failures
    /// are logged but never block swiping.
    pub(crate) async fn play_current(&self) {
        if let Some(track) = self.model.current_track().await {
            let playback = self.playback.clone();
            let url = track.preview_url.clone();
            tokio::spawn(async move {
                if let Err(e) = playback.play(&url).await {
                    tracing::warn!(error = %e, "Preview playback failed");
                }
            });
        }
    }
}
