//! L2 Organism Layer: Carousel controller
//!
//! Owns the data sequence, the cursor and the play state, and keeps the slot
//! pool and scroll engine consistent with them.
//!
//! Pausing is tracked per cause (explicit, pointer hover, hidden page). Host
//! signals only resume once every cause has cleared, so leaving the list with
//! the pointer while the page is hidden does not restart scrolling. An
//! explicit `start()` clears every cause; the next host signal holds again.

use bookreel_core::{CarouselConfig, ItemRecord};

use super::config::{slot_width, CarouselConfigExt};
use super::engine::{ScrollEngine, StepToken};
use super::render::{render_item, RenderSettings};
use super::slots::{SlotContent, SlotPool};
use super::transition::{ClockTransition, TimedTransition};

/// Play state of a carousel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Reasons the carousel is currently held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PauseHolds {
    /// `pause()` was called
    pub explicit: bool,
    /// Pointer is over the list
    pub pointer: bool,
    /// Hosting page is not visible
    pub hidden: bool,
}

impl PauseHolds {
    pub fn any(&self) -> bool {
        self.explicit || self.pointer || self.hidden
    }
}

/// Auto-scrolling carousel over a sequence of book records
#[derive(Debug)]
pub struct Carousel<T: TimedTransition = ClockTransition> {
    config: CarouselConfig,
    render: RenderSettings,
    visible_count: usize,
    items: Vec<ItemRecord>,
    pool: SlotPool,
    engine: ScrollEngine<T>,
    /// Next data index to scroll into view
    cursor: usize,
    state: AnimationState,
    holds: PauseHolds,
    container_width: u16,
}

impl Carousel<ClockTransition> {
    /// Carousel driven by the wall clock
    pub fn from_config(config: &CarouselConfig) -> Self {
        Self::new(config, ClockTransition::default())
    }
}

impl<T: TimedTransition> Carousel<T> {
    pub fn new(config: &CarouselConfig, transition: T) -> Self {
        let visible_count = config.effective_visible_count();
        let mut carousel = Self {
            config: config.clone(),
            render: config.render_settings(),
            visible_count,
            items: Vec::new(),
            pool: SlotPool::new(),
            engine: ScrollEngine::new(transition, config.step_duration()),
            cursor: 0,
            state: AnimationState::Stopped,
            holds: PauseHolds::default(),
            container_width: 0,
        };
        carousel.rebuild();
        carousel
    }

    /// Replace the data sequence and rebuild the window
    pub fn set_feed(&mut self, items: Vec<ItemRecord>, autostart: bool) {
        self.engine.stop();
        self.state = AnimationState::Stopped;
        self.holds.explicit = false;
        self.items = items;
        tracing::debug!(count = self.items.len(), autostart, "Carousel feed replaced");

        self.rebuild();
        if autostart {
            // Unlike start(), autostart respects a hovering pointer or hidden page
            self.begin_if_scrollable();
        }
    }

    /// Start scrolling, or resume from any pause
    ///
    /// Overrides pointer and visibility holds as well as an explicit pause.
    pub fn start(&mut self) {
        self.holds = PauseHolds::default();
        match self.state {
            AnimationState::Stopped => self.begin_if_scrollable(),
            AnimationState::Paused => self.try_resume(),
            AnimationState::Playing => {}
        }
    }

    pub fn pause(&mut self) {
        match self.state {
            AnimationState::Playing => {
                self.holds.explicit = true;
                self.hold();
            }
            AnimationState::Paused => self.holds.explicit = true,
            AnimationState::Stopped => {}
        }
    }

    pub fn stop(&mut self) {
        self.holds.explicit = false;
        if self.state != AnimationState::Stopped {
            self.engine.stop();
            self.state = AnimationState::Stopped;
            tracing::debug!("Carousel stopped");
        }
    }

    /// Pause when playing, otherwise start
    pub fn toggle(&mut self) {
        if self.state == AnimationState::Playing {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn pointer_entered(&mut self) {
        self.holds.pointer = true;
        if self.state == AnimationState::Playing {
            self.hold();
        }
    }

    pub fn pointer_left(&mut self) {
        self.holds.pointer = false;
        self.try_resume();
    }

    /// Page (terminal focus) visibility changed
    pub fn set_page_visible(&mut self, visible: bool) {
        self.holds.hidden = !visible;
        if visible {
            self.try_resume();
        } else if self.state == AnimationState::Playing {
            self.hold();
        }
    }

    /// Change the number of visible items, keeping the play state
    pub fn set_visible_count(&mut self, count: usize) {
        if count == 0 {
            tracing::warn!("Visible item count must be at least 1, using 1");
        }
        let count = count.max(1);
        if count == self.visible_count {
            return;
        }
        self.visible_count = count;
        self.config.visible_count = count;
        self.rebuild();
    }

    /// Container width changed; returns whether the pool was rebuilt
    pub fn resize(&mut self, container_width: u16) -> bool {
        if container_width == self.container_width {
            return false;
        }
        self.container_width = container_width;
        self.rebuild();
        true
    }

    /// Advance time-driven work; returns whether a step completed
    pub fn tick(&mut self) -> bool {
        match self.engine.poll() {
            Some(token) => {
                self.complete_step(token);
                true
            }
            None => false,
        }
    }

    /// Record a cover load failure for every slot showing `url`
    ///
    /// Affected slots move on to their fallback cover, which then shows up in
    /// [`Carousel::cover_urls`].
    pub fn cover_failed(&mut self, url: &str) {
        let ids: Vec<_> = self
            .pool
            .iter()
            .filter(|s| s.content().and_then(|c| c.cover_url()) == Some(url))
            .map(|s| s.id())
            .collect();

        for id in ids {
            if let Some(content) = self.pool.get_by_id_mut(id).and_then(|slot| slot.content_mut()) {
                if content.cover_failed().is_none() {
                    tracing::debug!(url, "No fallback cover left for slot");
                }
            }
        }
    }

    /// Cover URLs currently wanted by the slots
    pub fn cover_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        for url in self.pool.iter().filter_map(|s| s.content()?.cover_url()) {
            if !urls.iter().any(|u| u == url) {
                urls.push(url.to_string());
            }
        }
        urls
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn holds(&self) -> PauseHolds {
        self.holds
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn pool(&self) -> &SlotPool {
        &self.pool
    }

    pub fn slot_width(&self) -> u16 {
        self.pool.slot_width()
    }

    /// Current leftward translation of the slot row in columns
    pub fn offset(&self) -> u16 {
        self.engine.offset()
    }

    pub fn progress(&self) -> f64 {
        self.engine.progress()
    }

    /// Data indices of the slots inside the visible window
    pub fn window(&self) -> Vec<usize> {
        self.pool
            .iter()
            .take(self.visible_count)
            .filter_map(|s| s.content().map(|c| c.data_index))
            .collect()
    }

    /// Enough distinct items to scroll
    pub fn can_scroll(&self) -> bool {
        self.items.len() > self.visible_count
    }

    pub fn engine(&self) -> &ScrollEngine<T> {
        &self.engine
    }

    fn begin_if_scrollable(&mut self) {
        if !self.can_scroll() {
            tracing::debug!(
                items = self.items.len(),
                visible = self.visible_count,
                "Not enough items to scroll"
            );
            return;
        }
        self.begin();
    }

    fn begin(&mut self) {
        if !self.can_scroll() {
            return;
        }
        self.state = AnimationState::Playing;
        self.engine.step(self.state);
        tracing::debug!(cursor = self.cursor, "Carousel playing");
        if self.holds.any() {
            self.hold();
        }
    }

    fn hold(&mut self) {
        self.state = AnimationState::Paused;
        self.engine.pause();
        tracing::debug!(holds = ?self.holds, "Carousel paused");
    }

    fn try_resume(&mut self) {
        if self.state == AnimationState::Paused && !self.holds.any() {
            self.state = AnimationState::Playing;
            self.engine.resume();
            tracing::debug!("Carousel resumed");
        }
    }

    /// Recycle and advance before the next step is scheduled
    fn complete_step(&mut self, _token: StepToken) {
        if self.state != AnimationState::Playing {
            return;
        }
        let len = self.items.len();
        if len == 0 {
            return;
        }

        let next = self.cursor % len;
        let content = self.render_slot(next);
        self.pool.recycle_oldest(content);
        self.cursor = (next + 1) % len;

        self.engine.step(self.state);
    }

    fn render_slot(&self, index: usize) -> SlotContent {
        let viewport = self.config.viewport_px(self.container_width);
        SlotContent::new(index, render_item(&self.items[index], viewport, &self.render))
    }

    /// Tear down and rebuild the slot pool, then restore the play intent
    fn rebuild(&mut self) {
        let previous = self.state;
        self.engine.stop();
        self.state = AnimationState::Stopped;

        let width = slot_width(self.container_width, self.visible_count);
        self.engine.set_distance(width);
        self.pool.rebuild(self.visible_count + 2, width);

        let viewport = self.config.viewport_px(self.container_width);
        let render = &self.render;
        let filled = self.pool.fill_initial(
            self.items
                .iter()
                .enumerate()
                .map(|(i, item)| SlotContent::new(i, render_item(item, viewport, render))),
        );
        self.cursor = if self.items.is_empty() {
            0
        } else {
            filled % self.items.len()
        };

        tracing::debug!(
            slots = self.pool.len(),
            width,
            cursor = self.cursor,
            "Carousel window rebuilt"
        );

        if previous != AnimationState::Stopped {
            self.begin();
        }
    }
}
