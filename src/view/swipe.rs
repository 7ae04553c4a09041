//! Swipe screen - the current track card

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::AppSnapshot;

use super::utils::truncate_string;

pub fn render(frame: &mut Frame, snapshot: &AppSnapshot, preview_active: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Track card
            Constraint::Length(3), // Hints
        ])
        .split(frame.area());

    let card_width = chunks[0].width.saturating_sub(6) as usize;

    let lines: Vec<Line> = if snapshot.ui.loading {
        vec![
            Line::default(),
            Line::from(Span::styled(
                "Loading tracks...",
                Style::default().fg(Color::Yellow),
            )),
        ]
    } else if let Some(track) = &snapshot.current_track {
        // Largest artwork URL available
        let art = [&track.cover_xl, &track.cover_big, &track.cover_medium]
            .into_iter()
            .find(|url| !url.is_empty())
            .cloned()
            .unwrap_or_default();

        let title = if snapshot.current_liked {
            format!("♥ {}", track.title)
        } else {
            track.title.clone()
        };

        let playing = if preview_active {
            Span::styled("♪ playing 15s preview", Style::default().fg(Color::Cyan))
        } else {
            Span::styled("preview ended", Style::default().fg(Color::DarkGray))
        };

        vec![
            Line::default(),
            Line::from(Span::styled(
                truncate_string(&title, card_width),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                truncate_string(&track.artist, card_width),
                Style::default().fg(Color::White),
            )),
            Line::from(Span::styled(
                truncate_string(&track.album, card_width),
                Style::default().fg(Color::DarkGray),
            )),
            Line::default(),
            Line::from(Span::styled(
                truncate_string(&art, card_width),
                Style::default().fg(Color::DarkGray),
            )),
            Line::default(),
            Line::from(playing),
        ]
    } else {
        vec![
            Line::default(),
            Line::from(Span::styled(
                "Nothing queued",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    };

    let title = format!(
        " Swipe ({}/{}) ",
        (snapshot.position + 1).min(snapshot.queue_len),
        snapshot.queue_len
    );

    let card = Paragraph::new(lines).centered().block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::horizontal(2)),
    );
    frame.render_widget(card, chunks[0]);

    let hints = Paragraph::new("→ like   ← skip   L liked list   Q quit")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(hints, chunks[1]);
}
