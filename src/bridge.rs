//! The only way the UI reaches the host: start a download, and read progress.
//!
//! The UI never touches the runtime, the settings or child processes directly.

use std::sync::Arc;

use tokio::{
    runtime::Handle,
    sync::{
        mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
        oneshot::{self, error::TryRecvError},
    },
};
use tracing::error;

use crate::{
    config::Settings,
    downloader::Downloader,
    error::DownloadError,
    model::{DownloadRequest, DownloadResult, ItemId, ProgressEvent},
};

pub struct Bridge {
    runtime: Handle,
    downloader: Arc<Downloader>,
    progress_tx: UnboundedSender<ProgressEvent>,
    progress_rx: UnboundedReceiver<ProgressEvent>,
}

impl Bridge {
    pub fn new(runtime: Handle, settings: Arc<Settings>) -> Self {
        let (progress_tx, progress_rx) = unbounded_channel();
        Self {
            runtime,
            downloader: Arc::new(Downloader::new(settings)),
            progress_tx,
            progress_rx,
        }
    }

    /// Starts a download on the host runtime and returns immediately.
    pub fn download_video(&self, request: DownloadRequest) -> PendingDownload {
        let (tx, rx) = oneshot::channel();
        let id = request.id;
        let downloader = Arc::clone(&self.downloader);
        let events = self.progress_tx.clone();

        self.runtime.spawn(async move {
            let result = downloader.download(request, events).await;
            if let Err(e) = &result {
                error!(%id, "download failed: {e}");
            }
            let _ = tx.send(result);
        });

        PendingDownload { id, rx }
    }

    /// Progress events from every running download, oldest first.
    pub fn poll_progress(&mut self) -> impl Iterator<Item = ProgressEvent> + '_ {
        std::iter::from_fn(move || self.progress_rx.try_recv().ok())
    }
}

/// Outcome of one `download_video` call, polled from the UI thread.
pub struct PendingDownload {
    id: ItemId,
    rx: oneshot::Receiver<Result<DownloadResult, DownloadError>>,
}

impl PendingDownload {
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// `None` while the download is still running.
    pub fn try_result(&mut self) -> Option<Result<DownloadResult, DownloadError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(DownloadError::HostGone)),
        }
    }
}
