use std::{fs::File, io::Write, path::PathBuf};

use rust_embed::RustEmbed;
use tracing::info;

use crate::config::Settings;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Asset;

pub const DOWNLOADER_BIN: &str = if cfg!(target_os = "windows") { "yt-dlp.exe" } else { "yt-dlp" };
pub const FFMPEG_BIN: &str = if cfg!(target_os = "windows") { "ffmpeg.exe" } else { "ffmpeg" };

/// Points `settings` at the yt-dlp and ffmpeg bundled into this build, if any.
pub fn use_bundled(settings: &mut Settings) -> std::io::Result<()> {
    if let Some(path) = extract(DOWNLOADER_BIN)? {
        settings.downloader = path;
    }
    if let Some(path) = extract(FFMPEG_BIN)? {
        settings.ffmpeg = Some(path);
    }
    Ok(())
}

/// Writes an embedded binary to the temp dir and returns its path.
/// `None` when the build does not carry `bin`.
fn extract(bin: &str) -> std::io::Result<Option<PathBuf>> {
    let Some(data) = Asset::get(bin) else {
        return Ok(None);
    };
    let tmp = std::env::temp_dir().join(format!("vidgrab-{bin}"));

    // reuse a previous extraction unless the bundled copy changed size
    let stale = match std::fs::metadata(&tmp) {
        Ok(meta) => meta.len() != data.data.len() as u64,
        Err(_) => true,
    };
    if stale {
        let mut f = File::create(&tmp)?;
        f.write_all(&data.data)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o755))?;
        }
        info!(path = %tmp.display(), "extracted bundled {bin}");
    }
    Ok(Some(tmp))
}
