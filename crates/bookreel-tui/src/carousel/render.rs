//! L4 Atomic Layer: Item renderer
//!
//! Maps one [`ItemRecord`] to what a slot displays: cover URL, caption and
//! catalog link. The fallback cover is resolved here as well and carried with
//! the result, so a slot can swap to it on load failure without looking back
//! at configuration.

use bookreel_core::{CarouselConfig, ItemRecord};

/// Placeholder used when no stub image is configured
pub const DEFAULT_PLACEHOLDER_URL: &str = "https://openlibrary.org/images/icons/avatar_book-sm.png";

/// Cover size variant requested from the cover service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    Small,
    Medium,
    Large,
}

impl CoverSize {
    /// Size for a viewport width in pixels
    pub fn for_viewport(width_px: u32) -> Self {
        if width_px < 500 {
            CoverSize::Small
        } else if width_px < 1080 {
            CoverSize::Medium
        } else {
            CoverSize::Large
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            CoverSize::Small => "S",
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }
}

/// URL settings the renderer needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    pub covers_base_url: String,
    pub catalog_base_url: String,
    pub stub_image_url: String,
}

impl RenderSettings {
    pub fn from_config(config: &CarouselConfig) -> Self {
        Self {
            covers_base_url: config.covers_base_url.trim_end_matches('/').to_string(),
            catalog_base_url: config.catalog_base_url.trim_end_matches('/').to_string(),
            stub_image_url: config.stub_image_url.trim().to_string(),
        }
    }

    /// Stub image if configured, otherwise the built-in placeholder
    pub fn fallback_url(&self) -> &str {
        if self.stub_image_url.is_empty() {
            DEFAULT_PLACEHOLDER_URL
        } else {
            &self.stub_image_url
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from_config(&CarouselConfig::default())
    }
}

/// Render descriptor for one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    pub image_url: String,
    /// Replacement applied if `image_url` fails to load
    pub fallback_url: String,
    pub caption: String,
    pub link_url: String,
}

/// Render one item for a viewport of `viewport_width_px` pixels
pub fn render_item(item: &ItemRecord, viewport_width_px: u32, settings: &RenderSettings) -> RenderedItem {
    let size = CoverSize::for_viewport(viewport_width_px).suffix();
    let fallback_url = settings.fallback_url().to_string();

    let image_url = if let Some(id) = item.cover_id {
        format!("{}/id/{}-{}.jpg", settings.covers_base_url, id, size)
    } else if let Some(isbn) = item.first_isbn() {
        format!("{}/isbn/{}-{}.jpg", settings.covers_base_url, isbn, size)
    } else {
        fallback_url.clone()
    };

    let link_url = match item.link_key.as_deref() {
        Some(key) if !key.is_empty() => format!("{}{}", settings.catalog_base_url, key),
        _ => settings.catalog_base_url.clone(),
    };

    RenderedItem {
        image_url,
        fallback_url,
        caption: format!("{} by {}", item.title, item.author_list()),
        link_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> ItemRecord {
        ItemRecord {
            author: vec!["Ursula K. Le Guin".into()],
            title: "The Dispossessed".into(),
            cover_id: Some(8231856),
            isbn: vec!["9780060512750".into()],
            link_key: Some("/works/OL59814W".into()),
        }
    }

    #[test]
    fn test_size_breakpoints() {
        assert_eq!(CoverSize::for_viewport(0), CoverSize::Small);
        assert_eq!(CoverSize::for_viewport(499), CoverSize::Small);
        assert_eq!(CoverSize::for_viewport(500), CoverSize::Medium);
        assert_eq!(CoverSize::for_viewport(1079), CoverSize::Medium);
        assert_eq!(CoverSize::for_viewport(1080), CoverSize::Large);
    }

    #[test]
    fn test_cover_id_preferred() {
        let r = render_item(&book(), 800, &RenderSettings::default());
        assert_eq!(r.image_url, "https://covers.openlibrary.org/b/id/8231856-M.jpg");
        assert_eq!(r.caption, "The Dispossessed by Ursula K. Le Guin");
        assert_eq!(r.link_url, "https://openlibrary.org/works/OL59814W");
    }

    #[test]
    fn test_isbn_used_without_cover_id() {
        let item = ItemRecord {
            cover_id: None,
            ..book()
        };
        let r = render_item(&item, 1920, &RenderSettings::default());
        assert_eq!(r.image_url, "https://covers.openlibrary.org/b/isbn/9780060512750-L.jpg");
    }

    #[test]
    fn test_stub_then_default_placeholder() {
        let bare = ItemRecord {
            title: "Notes".into(),
            ..Default::default()
        };

        let r = render_item(&bare, 300, &RenderSettings::default());
        assert_eq!(r.image_url, DEFAULT_PLACEHOLDER_URL);
        assert_eq!(r.fallback_url, DEFAULT_PLACEHOLDER_URL);

        let settings = RenderSettings {
            stub_image_url: "https://example.com/stub.png".into(),
            ..Default::default()
        };
        let r = render_item(&bare, 300, &settings);
        assert_eq!(r.image_url, "https://example.com/stub.png");
        assert_eq!(r.fallback_url, "https://example.com/stub.png");
    }

    #[test]
    fn test_malformed_item_renders_empty_strings() {
        let r = render_item(&ItemRecord::default(), 300, &RenderSettings::default());
        assert_eq!(r.caption, " by ");
        assert_eq!(r.link_url, "https://openlibrary.org");
    }
}
