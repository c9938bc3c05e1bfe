//! Utility functions

use crate::constants::APP_NAME;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Get the app data directory (settings, session, logs)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Cache file for a remote card image, keyed by a hash of its URL
pub fn image_cache_path(cache_dir: &Path, url: &str) -> PathBuf {
    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    cache_dir
        .join("images")
        .join(format!("{:016x}.img", hasher.finish()))
}

/// Join the non-empty parts of a card's meta line
pub fn meta_line(cook_time: Option<String>, servings: Option<String>) -> String {
    let mut parts = Vec::new();
    if let Some(t) = cook_time {
        parts.push(format!("{}  {}", egui_phosphor::regular::CLOCK, t));
    }
    if let Some(s) = servings {
        parts.push(format!("{}  {}", egui_phosphor::regular::USERS, s));
    }
    parts.join("     ")
}

/// Fresh scratch directory for filesystem tests
#[cfg(test)]
pub fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("recipe-favorites-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
