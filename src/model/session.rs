//! Swipe session state
//!
//! Holds the selected genres, the shuffled track queue and the current
//! position. The session is deliberately synchronous; fetching and
//! refilling are driven by the controller so this stays testable on its
//! own.

use rand::seq::SliceRandom;

use super::types::{Genre, Track};

/// Result of advancing the queue position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next track in the queue
    Next,
    /// The queue is used up; the caller should refill with the same genres
    Exhausted,
}

/// One running swipe session.
///
/// Invariant: `0 <= current <= queue.len()`. `current == queue.len()`
/// means the queue is exhausted and a refill is pending.
pub struct SwipeSession {
    selected: Vec<Genre>,
    queue: Vec<Track>,
    current: usize,
}

impl SwipeSession {
    pub fn new() -> Self {
        Self {
            selected: Vec::new(),
            queue: Vec::new(),
            current: 0,
        }
    }

    /// Toggle a genre in the selection.
    pub fn toggle_genre(&mut self, genre: Genre) {
        if let Some(pos) = self.selected.iter().position(|g| *g == genre) {
            self.selected.remove(pos);
        } else {
            self.selected.push(genre);
        }
    }

    pub fn selected_genres(&self) -> Vec<Genre> {
        self.selected.clone()
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Install a freshly fetched queue: uniform Fisher-Yates shuffle,
    /// position reset to the first track.
    pub fn start(&mut self, mut tracks: Vec<Track>) {
        tracks.shuffle(&mut rand::thread_rng());
        self.queue = tracks;
        self.current = 0;
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.queue.get(self.current)
    }

    /// Move to the next track. Reports `Exhausted` once the position
    /// reaches the end of the queue.
    pub fn advance(&mut self) -> Advance {
        if self.current < self.queue.len() {
            self.current += 1;
        }
        if self.current >= self.queue.len() {
            Advance::Exhausted
        } else {
            Advance::Next
        }
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn position(&self) -> usize {
        self.current
    }
}

impl Default for SwipeSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("Track {}", id),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            cover_medium: String::new(),
            cover_big: String::new(),
            cover_xl: String::new(),
            preview_url: format!("https://cdn.example/{}.mp3", id),
        }
    }

    #[test]
    fn toggle_genre_adds_and_removes() {
        let mut session = SwipeSession::new();
        assert!(!session.has_selection());

        session.toggle_genre(Genre::Pop);
        session.toggle_genre(Genre::Rock);
        assert!(session.has_selection());
        assert_eq!(session.selected_genres(), vec![Genre::Pop, Genre::Rock]);

        session.toggle_genre(Genre::Pop);
        assert_eq!(session.selected_genres(), vec![Genre::Rock]);
    }

    #[test]
    fn start_resets_position_and_keeps_all_tracks() {
        let mut session = SwipeSession::new();
        session.start(vec![track("1"), track("2"), track("3")]);
        session.advance();
        assert_eq!(session.position(), 1);

        session.start(vec![track("4"), track("5")]);
        assert_eq!(session.position(), 0);
        assert_eq!(session.queue_len(), 2);
    }

    #[test]
    fn shuffle_preserves_queue_as_multiset() {
        let tracks: Vec<Track> = (0..20).map(|i| track(&i.to_string())).collect();
        let mut session = SwipeSession::new();
        session.start(tracks.clone());

        let mut got: Vec<String> = Vec::new();
        loop {
            match session.current_track() {
                Some(t) => got.push(t.id.clone()),
                None => break,
            }
            session.advance();
        }
        got.sort();
        let mut want: Vec<String> = tracks.into_iter().map(|t| t.id).collect();
        want.sort();
        assert_eq!(got, want);
    }

    #[test]
    fn advancing_n_times_moves_position_by_n() {
        let mut session = SwipeSession::new();
        session.start(vec![track("1"), track("2"), track("3")]);

        assert_eq!(session.advance(), Advance::Next);
        assert_eq!(session.position(), 1);
        assert_eq!(session.advance(), Advance::Next);
        assert_eq!(session.position(), 2);
        assert_eq!(session.advance(), Advance::Exhausted);
        assert_eq!(session.position(), 3);
        assert!(session.current_track().is_none());

        // Refill resets to the start
        session.start(vec![track("4"), track("5")]);
        assert_eq!(session.position(), 0);
        assert!(session.current_track().is_some());
    }

    #[test]
    fn empty_queue_is_immediately_exhausted() {
        let mut session = SwipeSession::new();
        assert_eq!(session.advance(), Advance::Exhausted);
        assert!(session.current_track().is_none());
    }
}
