/// Turns one chunk of yt-dlp output into the text shown for an item.
///
/// No parsing: the chunk is decoded lossily and trimmed. Unlike a plain relay
/// of every chunk, chunks that are only whitespace (yt-dlp's bare `\r`
/// redraws) yield nothing, so they never blank the displayed progress.
pub fn progress_text(chunk: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(chunk);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::progress_text;

    #[test]
    fn keeps_raw_download_line() {
        let chunk = b"\r[download]  42.3% of ~ 12.34MiB at  1.02MiB/s ETA 00:07\n";
        assert_eq!(
            progress_text(chunk).as_deref(),
            Some("[download]  42.3% of ~ 12.34MiB at  1.02MiB/s ETA 00:07")
        );
    }

    #[test]
    fn keeps_multiline_chunks_together() {
        let chunk = b"[Merger] Merging formats\n[download] 100%\n";
        assert_eq!(
            progress_text(chunk).as_deref(),
            Some("[Merger] Merging formats\n[download] 100%")
        );
    }

    #[test]
    fn drops_whitespace_only_chunks() {
        assert_eq!(progress_text(b"\r\n  "), None);
        assert_eq!(progress_text(b""), None);
    }

    #[test]
    fn tolerates_invalid_utf8() {
        let text = progress_text(b"[download] \xff 10%").unwrap();
        assert!(text.ends_with("10%"));
    }
}
