use std::collections::HashMap;
use std::time::Duration;

use bookreel_core::http::read_body_capped;
use image::DynamicImage;
use tokio::sync::mpsc;

use crate::event::ImageLoadResult;

const MAX_COVER_BYTES: usize = 2 * 1024 * 1024;

/// Load state of one cover
pub enum CoverImage {
    Loading,
    Loaded(DynamicImage),
    Failed(String),
}

/// Covers for the slots currently on the carousel
///
/// Only covers still referenced by a slot are kept.
#[derive(Default)]
pub struct CoverStore {
    covers: HashMap<String, CoverImage>,
}

impl CoverStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a load was already started (or finished) for `url`
    pub fn is_known(&self, url: &str) -> bool {
        self.covers.contains_key(url)
    }

    pub fn start_loading(&mut self, url: &str) {
        self.covers.insert(url.to_string(), CoverImage::Loading);
    }

    pub fn is_loading(&self, url: &str) -> bool {
        matches!(self.covers.get(url), Some(CoverImage::Loading))
    }

    pub fn set_loaded(&mut self, url: &str, image: DynamicImage) {
        // Ignore results for covers no longer on screen
        if let Some(entry) = self.covers.get_mut(url) {
            *entry = CoverImage::Loaded(image);
        }
    }

    pub fn set_failed(&mut self, url: &str, error: String) {
        if let Some(entry) = self.covers.get_mut(url) {
            *entry = CoverImage::Failed(error);
        }
    }

    pub fn get(&self, url: &str) -> Option<&DynamicImage> {
        match self.covers.get(url) {
            Some(CoverImage::Loaded(image)) => Some(image),
            _ => None,
        }
    }

    /// Drop every cover not in `urls`
    pub fn retain_urls(&mut self, urls: &[String]) {
        self.covers.retain(|url, _| urls.iter().any(|u| u == url));
    }

    pub fn len(&self) -> usize {
        self.covers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.covers.is_empty()
    }
}

/// Build the HTTP client used for cover downloads
pub fn cover_client(timeout_secs: u64) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("bookreel/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Download and decode one cover image
pub async fn download_cover(client: &reqwest::Client, url: &str) -> Result<DynamicImage, String> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "image/jpeg,image/png,image/*;q=0.8")
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {}", status));
    }

    let bytes = read_body_capped(response, MAX_COVER_BYTES)
        .await
        .map_err(|e| format!("Failed to read cover: {}", e))?;

    decode_cover(&bytes)
}

/// Decode image bytes; tiny images count as failures
///
/// The cover service answers unknown covers with a 1x1 pixel image.
pub fn decode_cover(bytes: &[u8]) -> Result<DynamicImage, String> {
    let image = image::load_from_memory(bytes).map_err(|e| format!("Decode failed: {}", e))?;
    if image.width() <= 1 || image.height() <= 1 {
        return Err("Cover not available".to_string());
    }
    Ok(image)
}

/// Spawn a background cover load reporting on `tx`
pub fn spawn_cover_load(
    client: reqwest::Client,
    url: String,
    tx: mpsc::UnboundedSender<ImageLoadResult>,
) {
    tokio::spawn(async move {
        let result = match download_cover(&client, &url).await {
            Ok(image) => ImageLoadResult::Success { url, image },
            Err(error) => {
                tracing::debug!("Cover load failed for {}: {}", url, error);
                ImageLoadResult::Failure { url, error }
            }
        };
        let _ = tx.send(result);
    });
}
