use std::{
    fmt,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

/// Opaque handle tying a UI item to its request and progress events.
///
/// Derived from the submission time in milliseconds; bumped past the previous
/// id when two submissions land in the same millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    /// Issues an id for "now" that is strictly greater than `last`.
    pub fn issue(last: Option<ItemId>) -> Self {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self::issue_at(now_ms, last)
    }

    fn issue_at(now_ms: u64, last: Option<ItemId>) -> Self {
        match last {
            Some(ItemId(prev)) if prev >= now_ms => ItemId(prev + 1),
            _ => ItemId(now_ms),
        }
    }

    #[cfg(test)]
    pub fn from_raw(raw: u64) -> Self {
        ItemId(raw)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents the current state of a download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    /// yt-dlp is still running
    InProgress,
    /// File is on disk
    Completed,
    /// Either yt-dlp call failed
    Error,
}

/// Data structure for tracking a download in the UI
#[derive(Debug, Clone)]
pub struct DownloadItem {
    pub id: ItemId,
    /// Placeholder until yt-dlp resolves the real title
    pub title: String,
    /// Last chunk of raw tool output, shown as-is
    pub progress: String,
    pub status: DownloadStatus,
    /// Set only when `status` is `Error`
    pub error: Option<String>,
    /// Set once the download completed
    pub output: Option<PathBuf>,
}

impl DownloadItem {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            title: "Fetching video info...".to_string(),
            progress: "0%".to_string(),
            status: DownloadStatus::InProgress,
            error: None,
            output: None,
        }
    }

    /// One-line rendering used by the download list.
    pub fn label(&self) -> String {
        match (&self.status, &self.error) {
            (DownloadStatus::Error, Some(err)) => {
                format!("{} - {} (Error: {})", self.title, self.progress, err)
            }
            _ => format!("{} - {}", self.title, self.progress),
        }
    }
}

/// "Download this URL", sent from the UI to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub id: ItemId,
    pub url: String,
}

/// Reply to a successful `DownloadRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub id: ItemId,
    pub title: String,
    pub output: PathBuf,
}

/// Raw tool output for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub id: ItemId,
    pub progress: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_use_the_clock_when_it_moved_on() {
        assert_eq!(ItemId::issue_at(500, Some(ItemId(100))), ItemId(500));
        assert_eq!(ItemId::issue_at(500, None), ItemId(500));
    }

    #[test]
    fn ids_within_one_millisecond_stay_distinct() {
        let first = ItemId::issue_at(500, None);
        let second = ItemId::issue_at(500, Some(first));
        let third = ItemId::issue_at(499, Some(second));
        assert_eq!(second, ItemId(501));
        assert_eq!(third, ItemId(502));
    }

    #[test]
    fn issued_ids_increase() {
        let a = ItemId::issue(None);
        let b = ItemId::issue(Some(a));
        assert!(b > a);
    }

    #[test]
    fn new_item_is_in_progress_with_placeholder() {
        let item = DownloadItem::new(ItemId(1));
        assert_eq!(item.status, DownloadStatus::InProgress);
        assert_eq!(item.label(), "Fetching video info... - 0%");
        assert!(item.error.is_none());
    }

    #[test]
    fn error_label_shows_message() {
        let mut item = DownloadItem::new(ItemId(1));
        item.status = DownloadStatus::Error;
        item.error = Some("yt-dlp exited with code 1".into());
        assert_eq!(
            item.label(),
            "Fetching video info... - 0% (Error: yt-dlp exited with code 1)"
        );
    }
}
