use std::{
    path::{Path, PathBuf},
    process::Stdio,
    sync::Arc,
};

use serde::Deserialize;
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    process::Command,
    sync::mpsc::UnboundedSender,
};
use tracing::{debug, info};

use crate::{
    config::Settings,
    error::DownloadError,
    model::{DownloadRequest, DownloadResult, ItemId, ProgressEvent},
    progress::progress_text,
};

/// The part of `yt-dlp --dump-json` we care about.
#[derive(Debug, Deserialize)]
pub struct VideoInfo {
    pub title: String,
}

/// Replaces everything except ASCII letters and digits with `_` and lowercases.
///
/// Works per `char`, so a character outside the Basic Multilingual Plane
/// (most emoji) becomes a single `_`, not one per UTF-16 code unit.
pub fn safe_file_stem(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

/// Drives yt-dlp for one request at a time; callers run as many as they like
/// concurrently.
pub struct Downloader {
    settings: Arc<Settings>,
}

impl Downloader {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    fn program(&self) -> String {
        self.settings.downloader.display().to_string()
    }

    /// Where a video with this title ends up. Two titles with the same safe
    /// stem share a path and the later download overwrites the earlier one.
    pub fn output_path(&self, title: &str) -> PathBuf {
        self.settings
            .download_dir
            .join(format!("{}.{}", safe_file_stem(title), self.settings.output_extension))
    }

    /// Asks yt-dlp to resolve `url` without downloading anything.
    pub async fn fetch_info(&self, url: &str) -> Result<VideoInfo, DownloadError> {
        let output = Command::new(&self.settings.downloader)
            .args(["--dump-json", "--no-warnings", "--no-playlist"])
            .arg(url)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| DownloadError::Spawn {
                program: self.program(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.is_empty() {
                return Err(DownloadError::from_status(output.status));
            }
            return Err(DownloadError::Metadata(stderr));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }

    /// Resolves the title, then downloads and merges the video into the
    /// download folder. Every chunk yt-dlp writes to stdout or stderr is
    /// forwarded on `events` tagged with the request id.
    pub async fn download(
        &self,
        request: DownloadRequest,
        events: UnboundedSender<ProgressEvent>,
    ) -> Result<DownloadResult, DownloadError> {
        let DownloadRequest { id, url } = request;

        info!(%id, %url, "resolving video info");
        let info = self.fetch_info(&url).await?;
        let output = self.output_path(&info.title);
        info!(%id, title = %info.title, output = %output.display(), "starting download");

        let mut child = self
            .download_command(&url, &output)
            .spawn()
            .map_err(|source| DownloadError::Spawn {
                program: self.program(),
                source,
            })?;

        let (out, err) = tokio::join!(
            relay(child.stdout.take(), id, &events),
            relay(child.stderr.take(), id, &events),
        );
        out?;
        err?;

        let status = child.wait().await?;
        if !status.success() {
            return Err(DownloadError::from_status(status));
        }

        info!(%id, output = %output.display(), "download finished");
        Ok(DownloadResult {
            id,
            title: info.title,
            output,
        })
    }

    fn download_command(&self, url: &str, output: &Path) -> Command {
        let mut cmd = Command::new(&self.settings.downloader);
        cmd.arg("-o")
            .arg(output)
            .args(["-f", self.settings.format.as_str()])
            .args(["--merge-output-format", self.settings.output_extension.as_str()])
            .arg("--no-warnings");
        if let Some(ffmpeg) = &self.settings.ffmpeg {
            cmd.arg("--ffmpeg-location").arg(ffmpeg);
        }
        cmd.arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

/// Forwards every chunk of `stream` until EOF.
async fn relay<R>(
    stream: Option<R>,
    id: ItemId,
    events: &UnboundedSender<ProgressEvent>,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let Some(mut stream) = stream else {
        return Ok(());
    };
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        if let Some(progress) = progress_text(&buf[..n]) {
            debug!(%id, "{progress}");
            // keep draining even if nobody listens, or the child blocks on a full pipe
            let _ = events.send(ProgressEvent { id, progress });
        }
    }
}
