use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use iced::widget::image::Handle;
use pdfview_core::{ISize, Metadata, PdfViewer, PointF, Status, ViewerConfig};

use crate::input::Action;
use crate::renderer::PdfiumBackend;

/// The viewer plus what the window needs to show it: the last presented
/// frame and the clock of a running page slide.
pub struct PdfPane {
    viewer: PdfViewer<PdfiumBackend>,
    frame: Handle,
    slide_started: Option<Instant>,
}

impl PdfPane {
    pub fn new(backend: PdfiumBackend, config: ViewerConfig) -> Result<Self> {
        let viewer = PdfViewer::new(backend, config).context("Failed to create viewer")?;
        let mut pane = Self {
            viewer,
            frame: Handle::from_rgba(1, 1, vec![0, 0, 0, 0]),
            slide_started: None,
        };
        pane.refresh();
        Ok(pane)
    }

    pub fn open(&mut self, path: &Path) {
        match self.viewer.open(path) {
            Ok(metadata) => {
                tracing::info!(title = metadata.display_title(), "showing document");
            }
            Err(e) => {
                tracing::error!("Failed to open PDF: {}", e);
            }
        }
        self.refresh();
    }

    pub fn viewer(&self) -> &PdfViewer<PdfiumBackend> {
        &self.viewer
    }

    pub fn frame(&self) -> Handle {
        self.frame.clone()
    }

    pub fn file_name(&self) -> String {
        self.viewer
            .source()
            .and_then(|path| path.file_name())
            .and_then(|name| name.to_str())
            .unwrap_or("Untitled")
            .to_string()
    }

    /// Re-present and rebuild the displayed frame.
    pub fn refresh(&mut self) {
        let image = self.viewer.present_image();
        let (width, height) = image.dimensions();
        self.frame = Handle::from_rgba(width, height, image.into_raw());
    }

    pub fn resize(&mut self, viewport: ISize) {
        if viewport == self.viewer.viewport() {
            return;
        }
        if let Err(e) = self.viewer.resize(viewport) {
            tracing::error!("Failed to resize viewport: {}", e);
        }
        self.refresh();
    }

    /// Apply a view action. Quitting and the info panel belong to the window.
    pub fn apply(&mut self, action: Action) {
        let step = self.viewer.config().zoom_step;
        match action {
            Action::NextPage => self.viewer.next_page(),
            Action::PrevPage => self.viewer.prev_page(),
            Action::RotateClockwise => self.viewer.rotate_clockwise(),
            Action::RotateCounterClockwise => self.viewer.rotate_counter_clockwise(),
            Action::FitZoom => {
                let fit = self.viewer.fit_zoom();
                self.viewer.set_zoom(fit);
            }
            Action::CoverZoom => {
                let cover = self.viewer.cover_zoom();
                self.viewer.set_zoom(cover);
                let pan = self.viewer.cover_pan();
                self.viewer.set_pan(pan);
            }
            Action::ZoomIn => self.viewer.zoom_in(step),
            Action::ZoomOut => self.viewer.zoom_out(step),
            Action::Quit | Action::ToggleInfo => return,
        }
        self.refresh();
    }

    pub fn toggle_fit_cover(&mut self) {
        self.viewer.toggle_fit_cover();
        self.refresh();
    }

    pub fn begin_drag(&mut self) {
        self.viewer.begin_drag();
    }

    pub fn drag_by(&mut self, dx: f32, dy: f32) {
        self.viewer.drag_by(PointF::new(f64::from(dx), f64::from(dy)));
        self.refresh();
    }

    pub fn end_drag(&mut self, velocity: f64) {
        self.viewer.end_drag(velocity);
        if self.viewer.is_sliding() {
            self.slide_started = Some(Instant::now());
        }
        self.refresh();
    }

    pub fn is_sliding(&self) -> bool {
        self.viewer.is_sliding()
    }

    pub fn tick(&mut self, now: Instant) {
        let Some(started) = self.slide_started else {
            return;
        };
        let elapsed_ms = now.saturating_duration_since(started).as_secs_f64() * 1000.0;
        if !self.viewer.tick(elapsed_ms) {
            self.slide_started = None;
        }
        self.refresh();
    }

    pub fn status_line(&self) -> String {
        status_line(
            self.viewer.page_index(),
            self.viewer.page_count(),
            self.viewer.zoom() * self.viewer.state().fit_scale(),
            self.viewer.status(),
        )
    }

    pub fn info_rows(&self) -> Vec<(&'static str, String)> {
        info_rows(self.viewer.metadata(), &self.file_name())
    }
}

/// "Page 2 / 14 · 150% · Okay". The percentage is the rasterization scale.
pub fn status_line(page_index: Option<usize>, page_count: usize, scale: f64, status: Status) -> String {
    let page = match page_index {
        Some(index) if status == Status::Ok => format!("Page {} / {}", index + 1, page_count),
        _ => "Page - / -".to_string(),
    };
    format!("{page} · {}% · {status}", (scale * 100.0).round() as i64)
}

pub fn info_rows(metadata: &Metadata, file_name: &str) -> Vec<(&'static str, String)> {
    let date = |value: Option<String>| value.unwrap_or_else(|| "Unknown".to_string());
    vec![
        ("File", file_name.to_string()),
        ("Title", metadata.display_title().to_string()),
        ("Author", metadata.display_author().to_string()),
        ("Creator", metadata.creator.clone()),
        ("Created", date(metadata.creation_date.map(|d| d.to_string()))),
        ("Modified", date(metadata.modification_date.map(|d| d.to_string()))),
    ]
}
