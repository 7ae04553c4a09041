mod audio;
mod auth;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use audio::PreviewPlayer;
use controller::AppController;
use model::{AppModel, Catalog, LikedStore};
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== swipetune starting ===");

    let http = reqwest::Client::new();

    // Liked tracks carry over from previous runs
    let liked = LikedStore::new();
    if let Err(e) = liked.load_from_disk().await {
        tracing::warn!(error = %e, "Could not load liked tracks, starting empty");
    }

    let model = Arc::new(AppModel::new(liked));
    let catalog = Catalog::from_env(http.clone());
    let playback = PreviewPlayer::new(http);
    let controller = AppController::new(model.clone(), catalog, playback.clone());

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller, playback).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("swipetune shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<AppModel>,
    controller: AppController,
    playback: PreviewPlayer,
) -> io::Result<()> {
    loop {
        // Auto-clear old errors (after 5 seconds)
        model.auto_clear_old_errors().await;

        let snapshot = model.snapshot().await;
        let preview_active = playback.is_active().await;

        terminal.draw(|f| {
            AppView::render(f, &snapshot, preview_active);
        })?;

        // Short poll time keeps the UI responsive while loads run in the
        // background
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                let _ = controller.handle_key_event(key).await;
            }
        }

        if model.should_quit().await {
            break;
        }
    }

    Ok(())
}
