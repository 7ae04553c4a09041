//! Preview playback
//!
//! Downloads a track's preview clip and plays it on a dedicated sink
//! thread at fixed volume, capped at 15 seconds. At most one preview is
//! audible at a time: starting a new one releases the previous handle
//! (stop flag) and its pending expiry timer is neutralized through a
//! generation counter.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use rodio::{Decoder, OutputStream, Sink};
use tokio::sync::Mutex;

/// Hard cap on preview playback
pub const PREVIEW_CAP: Duration = Duration::from_secs(15);
/// Fixed playback volume
pub const PREVIEW_VOLUME: f32 = 0.5;

const SINK_POLL_INTERVAL: Duration = Duration::from_millis(100);

struct ActivePreview {
    stop: Arc<AtomicBool>,
    generation: u64,
}

/// Owns the single active preview handle.
#[derive(Clone)]
pub struct PreviewPlayer {
    http: reqwest::Client,
    active: Arc<Mutex<Option<ActivePreview>>>,
    generation: Arc<AtomicU64>,
}

impl PreviewPlayer {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            active: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Play a preview clip. Any preview already playing is stopped before
    /// the new one starts; playback ends at [`PREVIEW_CAP`] or when the
    /// clip runs out, whichever comes first.
    pub async fn play(&self, preview_url: &str) -> Result<()> {
        let (stop, generation) = self.acquire_handle().await;

        let data = match self.download(preview_url).await {
            Ok(data) => data,
            Err(e) => {
                self.expire(generation).await;
                return Err(e);
            }
        };

        // A newer play() may have superseded us while downloading
        if stop.load(Ordering::SeqCst) {
            return Ok(());
        }

        tracing::debug!(url = preview_url, bytes = data.len(), "Starting preview");

        let stop_for_sink = stop.clone();
        std::thread::spawn(move || run_sink(data, stop_for_sink));

        let player = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(PREVIEW_CAP).await;
            player.expire(generation).await;
        });

        Ok(())
    }

    /// Stop whatever is currently playing.
    pub async fn stop(&self) {
        if let Some(prev) = self.active.lock().await.take() {
            prev.stop.store(true, Ordering::SeqCst);
        }
    }

    /// Whether a preview is still audible. The sink thread raises the
    /// stop flag when the clip runs out before the 15s cap, so this goes
    /// false without waiting for the expiry timer.
    pub async fn is_active(&self) -> bool {
        self.active
            .lock()
            .await
            .as_ref()
            .is_some_and(|preview| !preview.stop.load(Ordering::SeqCst))
    }

    /// Release the previous handle (if any) and install a fresh one.
    pub(crate) async fn acquire_handle(&self) -> (Arc<AtomicBool>, u64) {
        let mut active = self.active.lock().await;
        if let Some(prev) = active.take() {
            prev.stop.store(true, Ordering::SeqCst);
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let stop = Arc::new(AtomicBool::new(false));
        *active = Some(ActivePreview {
            stop: stop.clone(),
            generation,
        });
        (stop, generation)
    }

    /// Stop the handle iff it is still the active generation. Expiry
    /// timers of superseded previews land here and do nothing.
    async fn expire(&self, generation: u64) {
        let mut active = self.active.lock().await;
        if let Some(current) = active.as_ref() {
            if current.generation == generation {
                current.stop.store(true, Ordering::SeqCst);
                *active = None;
            }
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        Ok(self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec())
    }
}

/// Blocking sink thread: decode and play until stopped or the clip ends.
/// Raises the stop flag on the way out so the handle reads as inactive
/// even before its expiry timer fires.
fn run_sink(data: Vec<u8>, stop: Arc<AtomicBool>) {
    play_clip(data, &stop);
    stop.store(true, Ordering::SeqCst);
}

fn play_clip(data: Vec<u8>, stop: &AtomicBool) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(out) => out,
        Err(e) => {
            tracing::error!(error = %e, "No audio output available");
            return;
        }
    };

    let sink = match Sink::try_new(&handle) {
        Ok(sink) => sink,
        Err(e) => {
            tracing::error!(error = %e, "Failed to open audio sink");
            return;
        }
    };
    sink.set_volume(PREVIEW_VOLUME);

    match Decoder::new(Cursor::new(data)) {
        Ok(source) => sink.append(source),
        Err(e) => {
            tracing::warn!(error = %e, "Preview clip could not be decoded");
            return;
        }
    }

    while !stop.load(Ordering::SeqCst) && !sink.empty() {
        std::thread::sleep(SINK_POLL_INTERVAL);
    }
    sink.stop();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> PreviewPlayer {
        PreviewPlayer::new(reqwest::Client::new())
    }

    #[tokio::test]
    async fn second_acquire_releases_first_handle() {
        let player = player();

        let (first_stop, first_gen) = player.acquire_handle().await;
        assert!(!first_stop.load(Ordering::SeqCst));
        assert!(player.is_active().await);

        let (second_stop, second_gen) = player.acquire_handle().await;
        // The old handle is torn down before the new one exists
        assert!(first_stop.load(Ordering::SeqCst));
        assert!(!second_stop.load(Ordering::SeqCst));
        assert!(second_gen > first_gen);
    }

    #[tokio::test]
    async fn stale_expiry_does_not_stop_newer_preview() {
        let player = player();

        let (_, first_gen) = player.acquire_handle().await;
        let (second_stop, _) = player.acquire_handle().await;

        player.expire(first_gen).await;
        assert!(!second_stop.load(Ordering::SeqCst));
        assert!(player.is_active().await);
    }

    #[tokio::test]
    async fn expiry_stops_the_active_preview() {
        let player = player();

        let (stop, generation) = player.acquire_handle().await;
        player.expire(generation).await;

        assert!(stop.load(Ordering::SeqCst));
        assert!(!player.is_active().await);
    }

    #[tokio::test]
    async fn finished_clip_reads_inactive_before_expiry() {
        let player = player();

        let (stop, generation) = player.acquire_handle().await;
        assert!(player.is_active().await);

        // The sink thread raises the flag when the clip runs out early
        stop.store(true, Ordering::SeqCst);
        assert!(!player.is_active().await);

        // The pending expiry timer still clears the slot
        player.expire(generation).await;
        assert!(!player.is_active().await);
    }

    #[tokio::test]
    async fn stop_releases_the_active_handle() {
        let player = player();

        let (stop, _) = player.acquire_handle().await;
        player.stop().await;

        assert!(stop.load(Ordering::SeqCst));
        assert!(!player.is_active().await);

        // Idempotent with nothing active
        player.stop().await;
        assert!(!player.is_active().await);
    }
}
