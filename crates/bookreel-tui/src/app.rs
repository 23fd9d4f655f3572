use std::sync::Arc;

use bookreel_core::{AppConfig, SearchEvent, SearchTerm};
use chrono::{DateTime, Utc};
use ratatui::layout::{Position, Rect};

use crate::carousel::{AnimationState, Carousel};
use crate::event::ImageLoadResult;
use crate::images::CoverStore;
use crate::theme::Theme;

/// Application mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Carousel has the keyboard
    Normal,
    /// Typing a search term
    Search(String),
    /// Help overlay
    Help,
}

/// Application state
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub carousel: Carousel,
    /// Decoded covers for the slots on screen
    pub covers: CoverStore,
    pub mode: Mode,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    /// A search is in flight
    pub searching: bool,
    pub last_term: Option<SearchTerm>,
    pub last_search_at: Option<DateTime<Utc>>,
    /// Screen area of the carousel, for pointer hit-testing
    pub carousel_area: Rect,
    /// Last pointer position reported by the terminal
    pointer: Option<Position>,
    pointer_inside: bool,
    elapsed_label: Option<String>,
}

impl App {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let carousel = Carousel::from_config(&config.carousel);
        Self {
            config,
            theme: Theme::default(),
            carousel,
            covers: CoverStore::new(),
            mode: Mode::Normal,
            should_quit: false,
            status_message: None,
            searching: false,
            last_term: None,
            last_search_at: None,
            carousel_area: Rect::default(),
            pointer: None,
            pointer_inside: false,
            elapsed_label: None,
        }
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, Mode::Search(_))
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Enter search input, prefilled with the last term
    pub fn begin_search_input(&mut self) {
        let initial = self
            .last_term
            .as_ref()
            .map(|t| t.to_string())
            .unwrap_or_default();
        self.mode = Mode::Search(initial);
    }

    pub fn push_search_char(&mut self, c: char) {
        if let Mode::Search(ref mut buffer) = self.mode {
            buffer.push(c);
        }
    }

    pub fn pop_search_char(&mut self) {
        if let Mode::Search(ref mut buffer) = self.mode {
            buffer.pop();
        }
    }

    pub fn cancel_input(&mut self) {
        self.mode = Mode::Normal;
    }

    /// Leave search input, returning the term to search for if it is usable
    pub fn submit_search(&mut self) -> Option<SearchTerm> {
        let Mode::Search(buffer) = std::mem::replace(&mut self.mode, Mode::Normal) else {
            return None;
        };
        let term = SearchTerm::typed(&buffer);
        if term.is_none() {
            self.set_status("Type something to search for");
        }
        term
    }

    /// Apply a search event from the search component
    pub fn handle_search_event(&mut self, event: SearchEvent) {
        match event {
            SearchEvent::Started { term } => {
                self.searching = true;
                self.set_status(format!("Searching for \"{}\"...", term));
                self.last_term = Some(term);
            }
            SearchEvent::Completed { term, items, at } => {
                self.searching = false;
                self.last_search_at = Some(at);
                let count = items.len();

                self.carousel.set_feed(items, self.config.carousel.autostart);
                self.sync_covers();

                if count == 0 {
                    self.set_status(format!("No books found for \"{}\"", term));
                } else if !self.carousel.can_scroll() {
                    self.set_status(format!("{} books for \"{}\" (too few to scroll)", count, term));
                } else {
                    self.set_status(format!("{} books for \"{}\"", count, term));
                }
                self.refresh_elapsed(at);
            }
            SearchEvent::Failed { term, error, at } => {
                self.searching = false;
                self.last_search_at = Some(at);
                self.set_status(format!("Search for \"{}\" failed: {}", term, error));
                self.refresh_elapsed(at);
            }
        }
    }

    /// Record where the carousel is drawn; rebuilds it when the width changed
    pub fn set_carousel_area(&mut self, area: Rect) {
        if self.carousel_area != area {
            self.carousel_area = area;
            // The area may have moved out from under (or onto) a resting pointer
            self.update_hover();
        }
        if self.carousel.resize(area.width) {
            self.sync_covers();
        }
    }

    /// Pointer moved; translates into enter/leave of the carousel
    pub fn pointer_moved(&mut self, column: u16, row: u16) {
        self.pointer = Some(Position::new(column, row));
        self.update_hover();
    }

    fn update_hover(&mut self) {
        let inside = self
            .pointer
            .is_some_and(|position| self.carousel_area.contains(position));
        if inside == self.pointer_inside {
            return;
        }
        self.pointer_inside = inside;
        if inside {
            self.carousel.pointer_entered();
        } else {
            self.carousel.pointer_left();
        }
    }

    pub fn set_visibility(&mut self, visible: bool) {
        self.carousel.set_page_visible(visible);
    }

    /// Change the number of visible items by `delta`
    pub fn change_visible_count(&mut self, delta: i32) {
        let current = self.carousel.visible_count() as i32;
        let next = (current + delta).max(1) as usize;
        self.carousel.set_visible_count(next);
        self.sync_covers();
        self.set_status(format!("Showing {} at a time", self.carousel.visible_count()));
    }

    /// Frame update; returns whether the carousel advanced a step
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        let stepped = self.carousel.tick();
        if stepped {
            self.sync_covers();
        }
        self.refresh_elapsed(now);
        stepped
    }

    /// Whether the loop should run at animation frame rate
    pub fn needs_fast_update(&self) -> bool {
        self.carousel.state() == AnimationState::Playing
    }

    /// Cover URLs wanted on screen that have not been requested yet
    ///
    /// Marks the returned URLs as loading.
    pub fn covers_to_load(&mut self) -> Vec<String> {
        let urls: Vec<String> = self
            .carousel
            .cover_urls()
            .into_iter()
            .filter(|url| !self.covers.is_known(url))
            .collect();
        for url in &urls {
            self.covers.start_loading(url);
        }
        urls
    }

    /// Apply a finished cover load
    pub fn handle_image_result(&mut self, result: ImageLoadResult) {
        match result {
            ImageLoadResult::Success { url, image } => {
                self.covers.set_loaded(&url, image);
            }
            ImageLoadResult::Failure { url, error } => {
                self.covers.set_failed(&url, error);
                // Slots swap to their fallback; covers_to_load requests it
                self.carousel.cover_failed(&url);
            }
        }
    }

    /// Link of the leftmost visible item
    pub fn leftmost_link(&self) -> Option<String> {
        self.carousel
            .pool()
            .get(0)
            .and_then(|slot| slot.content())
            .map(|content| content.item.link_url.clone())
    }

    /// "Time since last search" label, refreshed on tick
    pub fn elapsed_label(&self) -> Option<&str> {
        self.elapsed_label.as_deref()
    }

    fn refresh_elapsed(&mut self, now: DateTime<Utc>) {
        self.elapsed_label = self
            .last_search_at
            .map(|at| format_elapsed(now.signed_duration_since(at)));
    }

    fn sync_covers(&mut self) {
        let urls = self.carousel.cover_urls();
        self.covers.retain_urls(&urls);
    }
}

/// Human-readable age of the last search
pub fn format_elapsed(elapsed: chrono::Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    if secs < 10 {
        "just now".to_string()
    } else if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}
