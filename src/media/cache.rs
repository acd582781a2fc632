use image::imageops::FilterType;
use image::ImageFormat;
use reqwest::Client;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::ImageError;

/// Size class of a cached image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Product cards (256px)
    Thumbnail,
    /// Detail page carousel (1024px)
    Preview,
}

impl Tier {
    /// Longest edge in pixels
    pub fn size(&self) -> u32 {
        match self {
            Tier::Thumbnail => 256,
            Tier::Preview => 1024,
        }
    }

    fn dir_name(&self) -> &'static str {
        match self {
            Tier::Thumbnail => "thumbnails",
            Tier::Preview => "previews",
        }
    }
}

/// Downloads product images and keeps resized copies on disk
///
/// Layout: `<root>/thumbnails/{key}.jpg` and `<root>/previews/{key}.jpg`
#[derive(Debug, Clone)]
pub struct ImageCache {
    client: Client,
    root: PathBuf,
}

impl ImageCache {
    pub fn new(client: Client, root: PathBuf) -> Self {
        Self { client, root }
    }

    /// Where the image for `key` lives (doesn't fetch, just returns the expected path)
    pub fn path_for(&self, tier: Tier, key: &str) -> PathBuf {
        self.root.join(tier.dir_name()).join(format!("{}.jpg", key))
    }

    /// Return the cached copy of `url`, downloading it first if needed
    pub async fn fetch(&self, tier: Tier, key: String, url: String) -> Result<PathBuf, ImageError> {
        let path = self.path_for(tier, &key);
        if path.exists() {
            return Ok(path);
        }

        let bytes = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        debug!("Downloaded {} ({} KB)", url, bytes.len() / 1024);

        // Spawn blocking task for CPU-bound work
        let target = path.clone();
        tokio::task::spawn_blocking(move || save_resized(&bytes, tier.size(), &target))
            .await
            .map_err(|e| ImageError::Io(format!("Task join error: {}", e)))?
            .inspect_err(|e| warn!("Failed to cache {}: {}", url, e))?;

        Ok(path)
    }
}

/// Decode `data`, shrink it to fit `size`x`size` and save it as JPEG
fn save_resized(data: &[u8], size: u32, path: &Path) -> Result<(), ImageError> {
    let img = image::load_from_memory(data)?;

    // Never upscale small images
    let resized = if img.width() > size || img.height() > size {
        img.resize(size, size, FilterType::Lanczos3)
    } else {
        img
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Written under a temporary name and renamed into place, so an
    // interrupted write never leaves a truncated file at `path`.
    // JPEG has no alpha channel.
    let partial = path.with_extension("jpg.part");
    resized
        .to_rgb8()
        .save_with_format(&partial, ImageFormat::Jpeg)
        .inspect_err(|_| {
            let _ = fs::remove_file(&partial);
        })?;
    fs::rename(&partial, path)?;

    debug!("Cached image: {}", path.display());
    Ok(())
}
