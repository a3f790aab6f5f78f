use crate::{
    bridge::{Bridge, PendingDownload},
    model::{DownloadItem, DownloadRequest, DownloadResult, DownloadStatus, ItemId, ProgressEvent},
};

/// Ordered list of everything submitted in this session.
///
/// Items are only ever appended and updated in place.
#[derive(Default)]
pub struct DownloadList {
    items: Vec<DownloadItem>,
    last_id: Option<ItemId>,
}

impl DownloadList {
    pub fn items(&self) -> &[DownloadItem] {
        &self.items
    }

    pub fn has_active(&self) -> bool {
        self.items.iter().any(|item| item.status == DownloadStatus::InProgress)
    }

    /// Adds an in-progress item for `input` and returns the request to send.
    /// Blank input is ignored.
    pub fn submit(&mut self, input: &str) -> Option<DownloadRequest> {
        let url = input.trim();
        if url.is_empty() {
            return None;
        }
        let id = ItemId::issue(self.last_id);
        self.last_id = Some(id);
        self.items.push(DownloadItem::new(id));
        Some(DownloadRequest {
            id,
            url: url.to_string(),
        })
    }

    /// Overwrites the matching item's progress text. Unknown ids and items
    /// that already finished are left alone.
    pub fn apply_progress(&mut self, event: ProgressEvent) {
        if let Some(item) = self.item_mut(event.id) {
            if item.status == DownloadStatus::InProgress {
                item.progress = event.progress;
            }
        }
    }

    /// Applies everything the host reported since the last call: progress
    /// first, then finished downloads, which leave `pending`.
    pub fn sync_with(&mut self, bridge: &mut Bridge, pending: &mut Vec<PendingDownload>) {
        for event in bridge.poll_progress() {
            self.apply_progress(event);
        }
        pending.retain_mut(|download| match download.try_result() {
            None => true,
            Some(Ok(result)) => {
                self.complete(result);
                false
            }
            Some(Err(e)) => {
                self.fail(download.id(), e.to_string());
                false
            }
        });
    }

    pub fn complete(&mut self, result: DownloadResult) {
        if let Some(item) = self.item_mut(result.id) {
            item.title = result.title;
            item.progress = "100%".to_string();
            item.status = DownloadStatus::Completed;
            item.output = Some(result.output);
        }
    }

    pub fn fail(&mut self, id: ItemId, message: String) {
        if let Some(item) = self.item_mut(id) {
            item.status = DownloadStatus::Error;
            item.error = Some(message);
        }
    }

    fn item_mut(&mut self, id: ItemId) -> Option<&mut DownloadItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }
}
