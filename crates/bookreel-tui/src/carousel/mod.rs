//! Auto-scrolling cover carousel
//!
//! Keeps a fixed window of `visible_count` items over a search result list of
//! any length and scrolls it left one item at a time, recycling slots instead
//! of re-rendering the row.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `timing` - Linear progress and interpolation
//! - `transition` - Timed transition resource and clocks
//! - `render` - Item renderer (cover URL, caption, link)
//! - `config` - Configuration helpers (re-exported from bookreel-core)
//!
//! ## L3 Molecular Layer
//! - `slots` - Slot pool
//! - `engine` - Scroll engine, one step per transition
//!
//! ## L2 Organism Layer
//! - `controller` - Play/pause/stop state machine tying it together
//!
//! # Usage
//!
//! ```ignore
//! use bookreel_tui::carousel::Carousel;
//!
//! let mut carousel = Carousel::from_config(&config.carousel);
//! carousel.resize(area.width);
//! carousel.set_feed(items, true);
//!
//! // In the main loop, once per frame
//! carousel.tick();
//! let offset = carousel.offset();
//! ```

// L4 Atomic Layer
pub mod config;
pub mod render;
pub mod timing;
pub mod transition;

// L3 Molecular Layer
pub mod engine;
pub mod slots;

// L2 Organism Layer
pub mod controller;

pub use config::{CarouselConfig, CarouselConfigExt};
pub use controller::{AnimationState, Carousel, PauseHolds};
pub use engine::{ScrollEngine, StepToken};
pub use render::{render_item, CoverSize, RenderSettings, RenderedItem};
pub use slots::{CoverState, Slot, SlotContent, SlotId, SlotPool};
pub use transition::{
    Clock, ClockTransition, ManualClock, SystemClock, TimedTransition, TransitionPhase,
};
