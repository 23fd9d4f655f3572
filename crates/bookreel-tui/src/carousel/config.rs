//! L4 Atomic Layer: Configuration helpers for the carousel
//!
//! Re-exports configuration from bookreel-core and derives runtime values.

use std::time::Duration;

pub use bookreel_core::CarouselConfig;

use super::render::RenderSettings;

/// Extension trait for CarouselConfig with utility methods
pub trait CarouselConfigExt {
    /// Duration of one scroll step
    fn step_duration(&self) -> Duration;

    /// URL settings for the item renderer
    fn render_settings(&self) -> RenderSettings;

    /// Approximate pixel width of `columns` terminal cells
    fn viewport_px(&self, columns: u16) -> u32;
}

impl CarouselConfigExt for CarouselConfig {
    #[inline]
    fn step_duration(&self) -> Duration {
        Duration::from_millis(self.step_duration_ms)
    }

    fn render_settings(&self) -> RenderSettings {
        RenderSettings::from_config(self)
    }

    #[inline]
    fn viewport_px(&self, columns: u16) -> u32 {
        (columns as u32).saturating_mul(self.cell_width_px.max(1))
    }
}

/// Width of one slot: container width split evenly, rounded
#[inline]
pub fn slot_width(container_width: u16, visible_count: usize) -> u16 {
    let visible = visible_count.max(1) as f64;
    (container_width as f64 / visible).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_duration() {
        let config = CarouselConfig::default();
        assert_eq!(config.step_duration(), Duration::from_millis(3000));
    }

    #[test]
    fn test_viewport_px() {
        let config = CarouselConfig {
            cell_width_px: 9,
            ..Default::default()
        };
        assert_eq!(config.viewport_px(120), 1080);
    }

    #[test]
    fn test_slot_width_rounds() {
        assert_eq!(slot_width(80, 3), 27);
        assert_eq!(slot_width(100, 3), 33);
        assert_eq!(slot_width(10, 4), 3);
        // Never divides by zero
        assert_eq!(slot_width(50, 0), 50);
    }

    #[test]
    fn test_viewport_px_saturates() {
        let config = CarouselConfig {
            cell_width_px: u32::MAX / 2,
            ..Default::default()
        };
        assert_eq!(config.viewport_px(200), u32::MAX);
    }
}
