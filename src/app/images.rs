//! Card image loading

use crate::utils::image_cache_path;
use eframe::egui;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Texture cache for card images, backed by the on-disk image cache
pub struct CardImages {
    runtime: tokio::runtime::Handle,
    cache_dir: PathBuf,
    // `None` marks an image that failed and should not be retried
    textures: HashMap<String, Option<egui::TextureHandle>>,
    loading: HashSet<String>,
    // URLs whose download failed, posted back from the runtime
    failed: Arc<Mutex<Vec<String>>>,
}

impl CardImages {
    pub fn new(runtime: tokio::runtime::Handle, cache_dir: PathBuf) -> Self {
        Self {
            runtime,
            cache_dir,
            textures: HashMap::new(),
            loading: HashSet::new(),
            failed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Forget all textures, e.g. when the user changes
    pub fn clear(&mut self) {
        self.textures.clear();
        self.loading.clear();
        if let Ok(mut failed) = self.failed.lock() {
            failed.clear();
        }
    }

    /// Texture for a card image, fetching it in the background on first use.
    /// Returns `None` until the download lands in the disk cache, and for
    /// good once it has failed.
    pub fn load(&mut self, ctx: &egui::Context, url: &str) -> Option<egui::TextureHandle> {
        self.collect_failures();

        if let Some(cached) = self.textures.get(url) {
            return cached.clone();
        }

        let cache_path = image_cache_path(&self.cache_dir, url);

        if cache_path.exists() {
            // Cached files carry no format extension, so sniff the bytes
            let decoded = std::fs::read(&cache_path)
                .map_err(|e| e.to_string())
                .and_then(|bytes| image::load_from_memory(&bytes).map_err(|e| e.to_string()));
            let texture = match decoded {
                Ok(img) => {
                    let rgba = img.to_rgba8();
                    let size = [rgba.width() as usize, rgba.height() as usize];
                    let pixels = rgba.into_raw();
                    Some(ctx.load_texture(
                        url,
                        egui::ColorImage::from_rgba_unmultiplied(size, &pixels),
                        egui::TextureOptions::LINEAR,
                    ))
                }
                Err(e) => {
                    warn!(url, error = %e, "Failed to decode card image");
                    None
                }
            };
            self.loading.remove(url);
            self.textures.insert(url.to_string(), texture.clone());
            return texture;
        }

        if !self.loading.insert(url.to_string()) {
            return None;
        }

        let url_owned = url.to_string();
        let failed = self.failed.clone();
        let ctx_clone = ctx.clone();
        debug!(url, "Fetching card image");

        self.runtime.spawn(async move {
            let fetched = match reqwest::get(&url_owned).await {
                Ok(response) if response.status().is_success() => response.bytes().await.ok(),
                Ok(response) => {
                    warn!(url = %url_owned, status = %response.status(), "Card image request failed");
                    None
                }
                Err(e) => {
                    warn!(url = %url_owned, error = %e, "Card image request failed");
                    None
                }
            };
            let stored = match fetched {
                Some(bytes) => {
                    if let Some(parent) = cache_path.parent() {
                        std::fs::create_dir_all(parent).ok();
                    }
                    // Write-then-rename so the UI never decodes a partial file
                    let part = cache_path.with_extension("part");
                    match std::fs::write(&part, &bytes).and_then(|_| std::fs::rename(&part, &cache_path)) {
                        Ok(()) => true,
                        Err(e) => {
                            warn!(error = %e, "Failed to cache card image");
                            false
                        }
                    }
                }
                None => false,
            };
            if !stored {
                if let Ok(mut failed) = failed.lock() {
                    failed.push(url_owned);
                }
            }
            ctx_clone.request_repaint();
        });

        None
    }

    /// Settle failed downloads as permanent placeholders
    fn collect_failures(&mut self) {
        let failed = match self.failed.lock() {
            Ok(mut failed) => std::mem::take(&mut *failed),
            Err(_) => return,
        };
        for url in failed {
            self.loading.remove(&url);
            self.textures.insert(url, None);
        }
    }
}
