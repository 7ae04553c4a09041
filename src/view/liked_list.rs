//! Liked tracks screen

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::AppSnapshot;

use super::utils::{render_scrollable_list, truncate_string};

pub fn render(frame: &mut Frame, snapshot: &AppSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Liked list
            Constraint::Length(3), // Hints
        ])
        .split(frame.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Liked tracks ({}) ", snapshot.liked.len()))
        .padding(Padding::horizontal(1));

    if snapshot.liked.is_empty() {
        let empty = Paragraph::new("You haven't liked any tracks yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, chunks[0]);
    } else {
        let row_width = chunks[0].width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = snapshot
            .liked
            .iter()
            .enumerate()
            .map(|(i, track)| {
                let style = if i == snapshot.ui.liked_selected {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                let row = format!("{} - {}", track.title, track.artist);
                ListItem::new(truncate_string(&row, row_width)).style(style)
            })
            .collect();

        render_scrollable_list(frame, chunks[0], items, snapshot.ui.liked_selected, block);
    }

    let hints = Paragraph::new("↑↓ scroll   Esc back   Q quit")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(hints, chunks[1]);
}
