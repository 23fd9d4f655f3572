use image::DynamicImage;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};

use crate::app::App;
use crate::carousel::{AnimationState, Carousel, ClockTransition, SlotContent, TimedTransition};
use crate::images::CoverStore;
use crate::theme::Theme;

/// Rows reserved under each cover for the caption
const CAPTION_HEIGHT: u16 = 3;

pub struct CarouselWidget;

impl CarouselWidget {
    /// Draw the carousel frame and record its inner area on the app
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &app.theme;
        let (marker, marker_color) = match app.carousel.state() {
            AnimationState::Playing => ("▶", theme.green),
            AnimationState::Paused => ("⏸", theme.yellow),
            AnimationState::Stopped => ("■", theme.grey1),
        };

        let title = Line::from(vec![
            Span::raw(" Books "),
            Span::styled(marker, Style::default().fg(marker_color)),
            Span::raw(" "),
        ]);

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.grey0))
            .style(Style::default().bg(theme.bg0));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        app.set_carousel_area(inner);

        if app.carousel.items().is_empty() {
            let hint = if app.searching {
                "Searching..."
            } else {
                "Press / to search for books"
            };
            render_centered(frame.buffer_mut(), inner, hint, &app.theme);
            return;
        }

        let view = CarouselView {
            carousel: &app.carousel,
            covers: &app.covers,
            theme: &app.theme,
        };
        frame.render_widget(view, inner);
    }
}

/// The scrolling slot row, translated left by the carousel's current offset
pub struct CarouselView<'a, T: TimedTransition = ClockTransition> {
    pub carousel: &'a Carousel<T>,
    pub covers: &'a CoverStore,
    pub theme: &'a Theme,
}

impl<T: TimedTransition> Widget for CarouselView<'_, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = self.carousel.slot_width();
        if width == 0 || area.height == 0 {
            return;
        }
        let offset = self.carousel.offset() as i32;

        for (index, slot) in self.carousel.pool().iter().enumerate() {
            let left = index as i32 * width as i32 - offset;
            let right = left + width as i32;
            if right <= 0 || left >= area.width as i32 {
                continue;
            }
            let Some(content) = slot.content() else {
                continue;
            };

            // Draw off-screen, then copy the visible columns
            let mut scratch = Buffer::empty(Rect::new(0, 0, width, area.height));
            render_slot(&mut scratch, content, self.covers, self.theme);

            let first = left.max(0);
            let last = right.min(area.width as i32);
            for x in first..last {
                let src_x = (x - left) as u16;
                for y in 0..area.height {
                    if let (Some(src), Some(dst)) = (
                        scratch.cell((src_x, y)),
                        buf.cell_mut((area.x + x as u16, area.y + y)),
                    ) {
                        *dst = src.clone();
                    }
                }
            }
        }
    }
}

/// Draw one slot filling `buf`'s whole area
fn render_slot(buf: &mut Buffer, content: &SlotContent, covers: &CoverStore, theme: &Theme) {
    let area = buf.area;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.bg2))
        .style(Style::default().bg(theme.bg0));
    let inner = block.inner(area);
    block.render(area, buf);

    let caption_height = CAPTION_HEIGHT.min(inner.height);
    let cover_area = Rect {
        height: inner.height - caption_height,
        ..inner
    };
    let caption_area = Rect {
        y: inner.y + cover_area.height,
        height: caption_height,
        ..inner
    };

    match content.cover_url() {
        Some(url) => {
            if let Some(image) = covers.get(url) {
                render_halfblocks(buf, cover_area, image);
            } else if covers.is_loading(url) {
                render_centered(buf, cover_area, "Loading cover...", theme);
            } else {
                render_centered(buf, cover_area, "No cover", theme);
            }
        }
        None => render_centered(buf, cover_area, "No cover", theme),
    }

    Paragraph::new(content.item.caption.as_str())
        .style(Style::default().fg(theme.fg0))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(caption_area, buf);
}

fn render_centered(buf: &mut Buffer, area: Rect, message: &str, theme: &Theme) {
    if area.height == 0 {
        return;
    }
    let line = Line::from(Span::styled(
        message.to_string(),
        Style::default()
            .fg(theme.grey1)
            .add_modifier(Modifier::ITALIC),
    ));
    let centered = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };
    Paragraph::new(line)
        .alignment(Alignment::Center)
        .render(centered, buf);
}

/// Draw an image with half-block characters, two pixels per cell vertically
fn render_halfblocks(buf: &mut Buffer, area: Rect, img: &DynamicImage) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let target_width = area.width as u32;
    let target_height = area.height as u32 * 2;

    // Aspect-ratio preserving fit
    let (img_width, img_height) = (img.width().max(1), img.height().max(1));
    let scale_w = target_width as f32 / img_width as f32;
    let scale_h = target_height as f32 / img_height as f32;
    let scale = scale_w.min(scale_h);

    let new_width = ((img_width as f32 * scale) as u32).clamp(1, target_width);
    let new_height = ((img_height as f32 * scale) as u32).clamp(1, target_height);

    let resized = img.resize_exact(new_width, new_height, image::imageops::FilterType::Nearest);
    let rgba = resized.to_rgba8();

    let x_offset = (target_width - new_width) / 2;
    let rows = new_height.div_ceil(2);
    let y_offset = (area.height as u32).saturating_sub(rows) / 2;

    for row in 0..rows {
        let y = row * 2;
        for x in 0..new_width {
            let top = rgba.get_pixel(x, y);
            let bottom = if y + 1 < new_height {
                rgba.get_pixel(x, y + 1)
            } else {
                top
            };

            let position = (
                area.x + (x_offset + x) as u16,
                area.y + (y_offset + row) as u16,
            );
            if let Some(cell) = buf.cell_mut(position) {
                cell.set_symbol("▀")
                    .set_fg(Color::Rgb(top[0], top[1], top[2]))
                    .set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
            }
        }
    }
}
