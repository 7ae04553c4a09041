//! Genre selection screen

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{AppSnapshot, Genre};

use super::utils::render_scrollable_list;

pub fn render(frame: &mut Frame, snapshot: &AppSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Genre list
            Constraint::Length(3), // Hints
        ])
        .split(frame.area());

    let items: Vec<ListItem> = Genre::ALL
        .iter()
        .enumerate()
        .map(|(i, genre)| {
            let selected = snapshot.selected_genres.contains(genre);
            let marker = if selected { "[x]" } else { "[ ]" };
            let style = if i == snapshot.ui.genre_cursor {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if selected {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("{} {}", marker, genre.label())).style(style)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Pick your genres ")
        .padding(Padding::horizontal(1));

    render_scrollable_list(frame, chunks[0], items, snapshot.ui.genre_cursor, block);

    // Start hint only appears once something is selected
    let hint = if snapshot.selected_genres.is_empty() {
        "↑↓ move   Space toggle   Q quit"
    } else {
        "↑↓ move   Space toggle   S start swiping   Q quit"
    };

    let hints = Paragraph::new(hint)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(hints, chunks[1]);
}
