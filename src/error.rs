use thiserror::Error;

/// Everything that can go wrong between "download this URL" and a file on disk.
///
/// The `Display` text is what the user sees next to the failed item.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// yt-dlp could not resolve the URL; carries its stderr.
    #[error("{0}")]
    Metadata(String),

    #[error("unreadable video info: {0}")]
    InvalidMetadata(#[from] serde_json::Error),

    #[error("yt-dlp exited with code {0}")]
    Exit(i32),

    #[error("yt-dlp was terminated by a signal")]
    Killed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("download task stopped before reporting a result")]
    HostGone,
}

impl DownloadError {
    /// Maps a non-zero exit status onto `Exit` or `Killed`.
    pub fn from_status(status: std::process::ExitStatus) -> Self {
        match status.code() {
            Some(code) => DownloadError::Exit(code),
            None => DownloadError::Killed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_message_names_the_code() {
        assert_eq!(DownloadError::Exit(1).to_string(), "yt-dlp exited with code 1");
    }

    #[test]
    fn metadata_message_is_passed_through() {
        let err = DownloadError::Metadata("ERROR: Unsupported URL: https://example.com".into());
        assert_eq!(err.to_string(), "ERROR: Unsupported URL: https://example.com");
    }

    #[test]
    fn broken_json_is_invalid_metadata() {
        let err: DownloadError = serde_json::from_str::<serde_json::Value>("{")
            .map(|_| ())
            .unwrap_err()
            .into();
        assert!(matches!(err, DownloadError::InvalidMetadata(_)));
        assert!(err.to_string().starts_with("unreadable video info"));
    }
}
