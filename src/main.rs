//! Desktop front end that hands video URLs to yt-dlp and shows its raw output

// Host-side access to yt-dlp, the only surface the UI may call
mod bridge;
// Fixed runtime settings and the download folder
mod config;
// yt-dlp invocations: metadata lookup and the actual download
mod downloader;
// Error type shared by the host and shown by the UI
mod error;
// Download items and the messages exchanged with the host
mod model;
// Raw tool output to display text
mod progress;
// yt-dlp/ffmpeg binaries bundled into the build
mod tools;
// In-memory list behind the download panel
mod view;

#[cfg(all(test, unix))]
mod test_support;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use bridge::{Bridge, PendingDownload};
use config::Settings;
use eframe::{App, Frame, egui};
use egui::{Color32, Visuals};
use model::DownloadStatus;
use once_cell::sync::OnceCell;
use tokio::runtime::Runtime;
use tracing::info;
use view::DownloadList;

// Global Tokio runtime stored in a OnceCell for lazy init
static RUNTIME: OnceCell<Runtime> = OnceCell::new();

const BACKGROUND: Color32 = Color32::from_rgb(0x31, 0x24, 0x50);

/// Program entry point: prepares the host side and launches the window
fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut settings = Settings::default();
    tools::use_bundled(&mut settings).context("failed to unpack bundled tools")?;
    settings.ensure_download_dir().with_context(|| {
        format!("failed to create download folder {}", settings.download_dir.display())
    })?;
    info!(
        download_dir = %settings.download_dir.display(),
        downloader = %settings.downloader.display(),
        "host ready"
    );

    let runtime = RUNTIME
        .get_or_try_init(Runtime::new)
        .context("failed to start the async runtime")?;
    let download_dir = settings.download_dir.clone();
    let bridge = Bridge::new(runtime.handle().clone(), Arc::new(settings));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_title("Video Downloader"),
        ..Default::default()
    };
    eframe::run_native(
        "Video Downloader",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(visuals());
            Box::new(VidgrabApp::new(bridge, download_dir))
        }),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {e}"))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vidgrab=info".into());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn visuals() -> Visuals {
    let mut visuals = Visuals::dark();
    visuals.panel_fill = BACKGROUND;
    visuals.window_fill = BACKGROUND;
    visuals.override_text_color = Some(Color32::WHITE);
    visuals
}

/// Application state for the GUI
struct VidgrabApp {
    /// Input field for the video URL
    url_input: String,
    /// Everything submitted so far
    downloads: DownloadList,
    /// Downloads still waiting for a result from the host
    pending: Vec<PendingDownload>,
    bridge: Bridge,
    /// Opened by the "Open Folder" button
    download_dir: PathBuf,
}

impl VidgrabApp {
    fn new(bridge: Bridge, download_dir: PathBuf) -> Self {
        Self {
            url_input: String::new(),
            downloads: DownloadList::default(),
            pending: Vec::new(),
            bridge,
            download_dir,
        }
    }

    fn submit(&mut self) {
        if let Some(request) = self.downloads.submit(&self.url_input) {
            info!(id = %request.id, url = %request.url, "submitted");
            self.pending.push(self.bridge.download_video(request));
            self.url_input.clear();
        }
    }

}

/// GUI update loop: called each frame to redraw and handle interactions
impl App for VidgrabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.downloads.sync_with(&mut self.bridge, &mut self.pending);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Video Downloader");
            ui.add_space(10.0);

            let mut submit = false;
            ui.horizontal(|ui| {
                let field = ui.add(
                    egui::TextEdit::singleline(&mut self.url_input)
                        .hint_text("Enter YouTube URL")
                        .desired_width(ui.available_width() * 0.6),
                );
                if field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                if ui.button("Download").clicked() {
                    submit = true;
                }
            });
            if submit {
                self.submit();
            }

            ui.separator();

            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    for item in self.downloads.items() {
                        ui.horizontal(|ui| {
                            ui.label(item.label());
                            if item.status != DownloadStatus::Completed {
                                return;
                            }
                            if let Some(name) = item.output.as_deref().and_then(|p| p.file_name()) {
                                ui.weak(name.to_string_lossy().into_owned());
                            }
                            if ui.button("Open Folder").clicked() {
                                open_folder(self.download_dir.clone());
                            }
                        });
                        ui.add_space(4.0);
                    }
                });
        });

        // Results arrive off-thread; keep polling while anything is running
        if self.downloads.has_active() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

/// Opens `folder` in the platform file browser without blocking the UI.
fn open_folder(folder: PathBuf) {
    std::thread::spawn(move || {
        #[cfg(target_os = "windows")]
        let result = std::process::Command::new("explorer").arg(&folder).spawn();
        #[cfg(target_os = "macos")]
        let result = std::process::Command::new("open").arg(&folder).spawn();
        #[cfg(all(unix, not(target_os = "macos")))]
        let result = std::process::Command::new("xdg-open").arg(&folder).spawn();

        if let Err(e) = result {
            tracing::warn!(folder = %folder.display(), "could not open folder: {e}");
        }
    });
}
