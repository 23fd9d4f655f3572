use std::io;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;

use bookreel_core::{
    book::{spawn_search, BookSearch, OpenLibraryClient},
    AppConfig, SearchEvent, SearchTerm,
};
use bookreel_tui::{
    app::{App, Mode},
    event::{AppEvent, EventHandler, ImageLoadResult},
    images::{cover_client, spawn_cover_load},
    input::{handle_key_event, Action},
    widgets::{CarouselWidget, PopupWidget, SearchBarWidget, StatusBarWidget},
};

/// Channels and clients shared by the event loop
struct Services {
    search: Arc<dyn BookSearch>,
    search_tx: mpsc::UnboundedSender<SearchEvent>,
    covers: reqwest::Client,
    img_tx: mpsc::UnboundedSender<ImageLoadResult>,
}

pub async fn run(config: Arc<AppConfig>, query: Option<String>) -> Result<()> {
    let search: Arc<dyn BookSearch> = Arc::new(OpenLibraryClient::new(&config)?);
    let covers = cover_client(config.search.request_timeout_secs)?;

    let (search_tx, mut search_rx) = mpsc::unbounded_channel::<SearchEvent>();
    let (img_tx, mut img_rx) = mpsc::unbounded_channel::<ImageLoadResult>();

    let services = Services {
        search,
        search_tx,
        covers,
        img_tx,
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange,
        SetTitle("Bookreel")
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.clone());
    tracing::info!("Bookreel started");

    if let Some(term) = query.as_deref().and_then(SearchTerm::typed) {
        spawn_search(services.search.clone(), term, services.search_tx.clone());
    }

    let event_handler =
        EventHandler::with_animation_fps(config.ui.tick_rate_ms, config.ui.animation_fps);

    // Checked at the end of each iteration to pick the next poll timeout
    let mut needs_fast_update = false;

    let result: Result<()> = async {
        loop {
            while let Ok(event) = search_rx.try_recv() {
                app.handle_search_event(event);
            }

            while let Ok(result) = img_rx.try_recv() {
                app.handle_image_result(result);
            }

            app.tick(Utc::now());

            terminal.draw(|frame| {
                let size = frame.area();

                let layout = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3), // Search bar
                        Constraint::Min(4),    // Carousel
                        Constraint::Length(1), // Status bar
                    ])
                    .split(size);

                SearchBarWidget::render(frame, layout[0], &app);
                CarouselWidget::render(frame, layout[1], &mut app);
                StatusBarWidget::render(frame, layout[2], &app);

                if app.mode == Mode::Help {
                    PopupWidget::render_help(frame, &app.theme);
                }
            })?;

            // Drawing records the carousel size, which decides the cover sizes
            for url in app.covers_to_load() {
                spawn_cover_load(services.covers.clone(), url, services.img_tx.clone());
            }

            let event = if needs_fast_update {
                event_handler.next_animation()?
            } else {
                event_handler.next()?
            };
            if let Some(event) = event {
                match event {
                    AppEvent::Key(key) => {
                        let action = handle_key_event(key, &app);
                        handle_action(&mut app, action, &services);
                    }
                    AppEvent::Pointer(column, row) => app.pointer_moved(column, row),
                    AppEvent::Visibility(visible) => app.set_visibility(visible),
                    // The next draw picks up the new carousel width
                    AppEvent::Resize(_, _) => {}
                    AppEvent::Tick => {}
                }
            }

            needs_fast_update = app.needs_fast_update();

            if app.should_quit {
                break;
            }
        }
        Ok(())
    }
    .await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    tracing::info!("Bookreel stopped");
    result
}

fn handle_action(app: &mut App, action: Action, services: &Services) {
    match action {
        Action::Quit => app.should_quit = true,
        Action::StartSearch => {
            app.clear_status();
            app.begin_search_input();
        }
        Action::TogglePlay => app.carousel.toggle(),
        Action::Start => app.carousel.start(),
        Action::Stop => app.carousel.stop(),
        Action::MoreVisible => app.change_visible_count(1),
        Action::FewerVisible => app.change_visible_count(-1),
        Action::OpenLink => match app.leftmost_link() {
            Some(link) => {
                if let Err(e) = open::that(&link) {
                    tracing::warn!("Failed to open {}: {}", link, e);
                    app.set_status(format!("Failed to open link: {}", e));
                } else {
                    app.set_status(format!("Opened {}", link));
                }
            }
            None => app.set_status("Nothing to open"),
        },
        Action::ShowHelp => app.mode = Mode::Help,
        Action::ExitMode | Action::Cancel => app.cancel_input(),
        Action::Submit => {
            if let Some(term) = app.submit_search() {
                tracing::info!("Searching for \"{}\"", term);
                spawn_search(services.search.clone(), term, services.search_tx.clone());
            }
        }
        Action::InputChar(c) => app.push_search_char(c),
        Action::Backspace => app.pop_search_char(),
        Action::None => {}
    }
}
