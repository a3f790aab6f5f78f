use std::{io, path::PathBuf};

use crate::tools::DOWNLOADER_BIN;

/// Name of the folder, next to the executable, that receives finished videos.
pub const DOWNLOAD_DIR_NAME: &str = "Downloads";

/// Runtime settings for the host side. Fixed at startup, never persisted.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Where finished files land
    pub download_dir: PathBuf,
    /// yt-dlp executable (bundled copy or a name looked up on PATH)
    pub downloader: PathBuf,
    /// Bundled ffmpeg handed to yt-dlp, if any
    pub ffmpeg: Option<PathBuf>,
    /// yt-dlp format selector
    pub format: String,
    /// Container the streams are merged into
    pub output_extension: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            downloader: PathBuf::from(DOWNLOADER_BIN),
            ffmpeg: None,
            format: "bestvideo+bestaudio/best".to_string(),
            output_extension: "mp4".to_string(),
        }
    }
}

impl Settings {
    /// Creates the download folder if it is missing.
    pub fn ensure_download_dir(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.download_dir)
    }
}

fn default_download_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DOWNLOAD_DIR_NAME)
}
