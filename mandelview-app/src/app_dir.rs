//! Directory where the executable lives. Preferences and exported images are
//! kept next to the binary.

use std::path::{Path, PathBuf};

/// Directory containing the running executable. Falls back to current directory if unavailable.
pub fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Default directory for exported images.
pub fn images_directory() -> PathBuf {
    exe_directory().join("images")
}

/// The configured output directory, or [`images_directory`] when unset.
pub fn output_directory(configured: &str) -> PathBuf {
    if configured.trim().is_empty() {
        images_directory()
    } else {
        Path::new(configured).to_path_buf()
    }
}
