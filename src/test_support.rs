//! Shell-script stand-in for yt-dlp used by the process tests.

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

use crate::config::{DOWNLOAD_DIR_NAME, Settings};

/// Behaviour of the fake yt-dlp.
///
/// `--dump-json` as first argument answers the metadata query; any other call
/// is a download that prints `progress` to stdout, `stderr` to stderr, writes
/// the `-o` target on success and exits with `exit_code`.
pub struct FakeTool {
    pub title: Option<&'static str>,
    pub info_error: Option<&'static str>,
    pub progress: Vec<&'static str>,
    pub stderr: Vec<&'static str>,
    pub exit_code: i32,
}

impl Default for FakeTool {
    fn default() -> Self {
        Self {
            title: Some("My Video!"),
            info_error: None,
            progress: Vec::new(),
            stderr: Vec::new(),
            exit_code: 0,
        }
    }
}

impl FakeTool {
    pub fn download_dir(&self, root: &Path) -> PathBuf {
        root.join(DOWNLOAD_DIR_NAME)
    }

    /// Installs the script under `root` and returns settings pointing at it.
    pub fn settings(&self, root: &Path) -> Settings {
        let script = root.join("fake-yt-dlp");
        fs::write(&script, self.script()).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let settings = Settings {
            download_dir: self.download_dir(root),
            downloader: script,
            ..Settings::default()
        };
        settings.ensure_download_dir().unwrap();
        settings
    }

    fn script(&self) -> String {
        let info = match (self.info_error, self.title) {
            (Some(err), _) => format!("  echo '{err}' >&2\n  exit 1"),
            (None, Some(title)) => {
                format!("  echo '{}'\n  exit 0", serde_json::json!({ "id": "abc", "title": title }))
            }
            (None, None) => "  echo '{\"id\": \"abc\"}'\n  exit 0".to_string(),
        };
        let mut download = String::new();
        for line in &self.progress {
            download.push_str(&format!("echo '{line}'\n"));
        }
        for line in &self.stderr {
            download.push_str(&format!("echo '{line}' >&2\n"));
        }
        if self.exit_code == 0 {
            download.push_str("printf 'video' > \"$out\"\n");
        }

        format!(
            "#!/bin/sh\n\
             if [ \"$1\" = \"--dump-json\" ]; then\n{info}\nfi\n\
             out=\"\"\n\
             while [ $# -gt 0 ]; do\n  \
               if [ \"$1\" = \"-o\" ]; then out=\"$2\"; fi\n  \
               shift\n\
             done\n\
             {download}\
             exit {}\n",
            self.exit_code
        )
    }
}
