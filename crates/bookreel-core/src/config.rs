use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Carousel behaviour and cover URL settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Number of items visible at once (values below 1 are treated as 1)
    #[serde(default = "default_visible_count")]
    pub visible_count: usize,
    /// Fallback cover URL; empty means the built-in placeholder
    #[serde(default)]
    pub stub_image_url: String,
    /// Duration of one scroll step in milliseconds
    #[serde(default = "default_step_duration")]
    pub step_duration_ms: u64,
    /// Start scrolling as soon as new search results arrive
    #[serde(default = "default_true")]
    pub autostart: bool,
    /// Approximate pixel width of one terminal cell, used for cover size breakpoints
    #[serde(default = "default_cell_width_px")]
    pub cell_width_px: u32,
    /// Base URL of the cover image service
    #[serde(default = "default_covers_base_url")]
    pub covers_base_url: String,
    /// Base URL prepended to an item's catalog key
    #[serde(default = "default_catalog_base_url")]
    pub catalog_base_url: String,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            visible_count: default_visible_count(),
            stub_image_url: String::new(),
            step_duration_ms: default_step_duration(),
            autostart: default_true(),
            cell_width_px: default_cell_width_px(),
            covers_base_url: default_covers_base_url(),
            catalog_base_url: default_catalog_base_url(),
        }
    }
}

impl CarouselConfig {
    /// Visible count clamped to a safe minimum of one
    pub fn effective_visible_count(&self) -> usize {
        if self.visible_count == 0 {
            tracing::warn!("carousel.visible_count must be at least 1, using 1");
        }
        self.visible_count.max(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Book search API base URL
    #[serde(default = "default_search_base_url")]
    pub base_url: String,
    /// Maximum number of results requested per search
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// HTTP proxy URL (e.g., "http://127.0.0.1:7890" or "socks5://127.0.0.1:1080")
    #[serde(default)]
    pub proxy_url: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_base_url(),
            result_limit: default_result_limit(),
            request_timeout_secs: default_timeout(),
            proxy_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while the carousel is scrolling
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Show the time elapsed since the last search in the status bar
    #[serde(default = "default_true")]
    pub show_elapsed: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            show_elapsed: default_true(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bookreel")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_visible_count() -> usize {
    3
}

fn default_step_duration() -> u64 {
    3000
}

fn default_cell_width_px() -> u32 {
    8
}

fn default_covers_base_url() -> String {
    "https://covers.openlibrary.org/b".to_string()
}

fn default_catalog_base_url() -> String {
    "https://openlibrary.org".to_string()
}

fn default_search_base_url() -> String {
    "https://openlibrary.org".to_string()
}

fn default_result_limit() -> usize {
    20
}

fn default_timeout() -> u64 {
    15
}

fn default_tick_rate() -> u64 {
    250
}

fn default_animation_fps() -> u32 {
    30
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/bookreel/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("bookreel")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("bookreel.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.carousel.visible_count, 3);
        assert_eq!(config.carousel.step_duration_ms, 3000);
        assert!(config.carousel.stub_image_url.is_empty());
        assert!(config.carousel.autostart);
        assert_eq!(config.search.result_limit, 20);
        assert_eq!(config.ui.animation_fps, 30);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [carousel]
            visible_count = 5
            stub_image_url = "https://example.com/stub.png"
            "#,
        )
        .unwrap();

        assert_eq!(config.carousel.visible_count, 5);
        assert_eq!(config.carousel.stub_image_url, "https://example.com/stub.png");
        assert_eq!(config.carousel.step_duration_ms, 3000);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[carousel]\nvisible_count = \"three\"").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_zero_visible_count_is_clamped() {
        let config = CarouselConfig {
            visible_count: 0,
            ..Default::default()
        };
        assert_eq!(config.effective_visible_count(), 1);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = AppConfig::default();
        config.carousel.visible_count = 4;
        config.search.proxy_url = Some("socks5://127.0.0.1:1080".to_string());

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.carousel, config.carousel);
        assert_eq!(parsed.search.proxy_url, config.search.proxy_url);
    }

    #[test]
    fn test_expand_tilde() {
        let plain = PathBuf::from("/var/lib/bookreel");
        assert_eq!(expand_tilde(&plain), plain);
    }
}
