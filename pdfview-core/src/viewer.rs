//! The viewer as the host sees it.
//!
//! Every host call mutates the [`ViewState`], then the queued notifications
//! are handed to the renderer and to subscribed listeners, in order.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use tracing::{debug, error, info, warn};

use crate::animator::{SlideAnimation, SlideTarget};
use crate::backend::{Backend, DocumentHandle, PageHandle};
use crate::config::ViewerConfig;
use crate::error::{BackendError, OpenError, Result};
use crate::events::ViewEvent;
use crate::framebuffer::Framebuffer;
use crate::geometry::{ISize, PointF};
use crate::metadata::Metadata;
use crate::orientation::PageOrientation;
use crate::renderer::{IncrementalRenderer, RenderStats};
use crate::view_state::{Status, ViewState};

type PageOf<B> = <<B as Backend>::Document as DocumentHandle>::Page;

type Listener = Box<dyn FnMut(ViewEvent)>;

/// A drag in progress. `overshoot` is the horizontal motion the pan clamp
/// refused, i.e. how far the user pulled past the page edge.
#[derive(Debug, Clone, Copy, Default)]
struct DragGesture {
    overshoot: f64,
}

pub struct PdfViewer<B: Backend> {
    // Field order is drop order: the page handle inside the renderer goes
    // before the document that produced it.
    renderer: IncrementalRenderer<PageOf<B>>,
    document: Option<B::Document>,
    backend: B,
    state: ViewState,
    config: ViewerConfig,
    source: Option<PathBuf>,
    metadata: Metadata,
    listeners: Vec<Listener>,
    drag: Option<DragGesture>,
    slide: Option<SlideAnimation>,
    slide_offset: f64,
    page_loads: u64,
}

impl<B: Backend> PdfViewer<B> {
    /// # Errors
    ///
    /// Fails on an invalid configuration or when the framebuffer for the
    /// configured viewport cannot be allocated.
    pub fn new(backend: B, config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        let state = ViewState::new(config.viewport, config.max_zoom);
        let renderer = IncrementalRenderer::new(config.viewport, Rgba(config.background))?;
        Ok(Self {
            renderer,
            document: None,
            backend,
            state,
            config,
            source: None,
            metadata: Metadata::default(),
            listeners: Vec::new(),
            drag: None,
            slide: None,
            slide_offset: 0.0,
            page_loads: 0,
        })
    }

    /// Register a callback invoked with every notification, after the
    /// renderer has reacted to it.
    pub fn subscribe(&mut self, listener: impl FnMut(ViewEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Close the current document and open `path`.
    ///
    /// The outcome is also reflected in [`PdfViewer::status`]; on failure the
    /// page index, zoom and pan keep their previous values.
    pub fn open(&mut self, path: impl AsRef<Path>) -> std::result::Result<Metadata, OpenError> {
        let path = path.as_ref();
        self.cancel_gestures();
        self.renderer.release_page();
        self.document = None;
        self.metadata = Metadata::default();
        self.state.page_unloaded();
        self.state.set_page_count(0);
        self.source = Some(path.to_path_buf());
        self.state.source_changed();

        let outcome = self.load_document(path);
        match &outcome {
            Ok(_) => {
                info!(path = %path.display(), pages = self.state.page_count(), "document opened");
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot open document");
                self.document = None;
                self.state.set_page_count(0);
                self.state.set_status(err.status());
            }
        }
        self.notify();
        outcome
    }

    fn load_document(&mut self, path: &Path) -> std::result::Result<Metadata, OpenError> {
        let document = match self.backend.load(path) {
            Ok(document) => document,
            Err(BackendError::Locked) => return Err(OpenError::Locked),
            Err(err) => {
                return Err(OpenError::CannotOpen {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                })
            }
        };
        if document.is_locked() {
            return Err(OpenError::Locked);
        }
        let page_count = document.page_count();
        if page_count == 0 {
            return Err(OpenError::NoPages);
        }

        self.metadata = document.metadata();
        self.document = Some(document);
        self.state.set_page_count(page_count);
        self.state.set_status(Status::Ok);
        self.load_page(0).map_err(|err| OpenError::CannotOpen {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        Ok(self.metadata.clone())
    }

    /// Swap the displayed page. The old handle is released before the new
    /// one is acquired.
    fn load_page(&mut self, index: usize) -> std::result::Result<(), BackendError> {
        self.renderer.release_page();
        let Some(document) = self.document.as_ref() else {
            return Err(BackendError::Page {
                index,
                reason: "no document loaded".into(),
            });
        };
        let page = match document.page(index) {
            Ok(page) => page,
            Err(err) => {
                self.state.page_unloaded();
                return Err(err);
            }
        };
        let size = page.natural_size();
        self.renderer.set_page(Some(page));
        self.page_loads += 1;
        self.state.page_loaded(index, size);
        Ok(())
    }

    /// Show page `index`, clamped into the document. Ignored unless a
    /// document is open.
    pub fn set_page_index(&mut self, index: i64) {
        if self.state.status() != Status::Ok {
            return;
        }
        let Some(index) = self.state.clamp_page_index(index) else {
            return;
        };
        if self.state.page_index() == Some(index) && self.renderer.page().is_some() {
            return;
        }
        debug!(index, "switching page");
        if let Err(err) = self.load_page(index) {
            warn!(index, error = %err, "cannot load page");
        }
        self.notify();
    }

    pub fn next_page(&mut self) {
        if let Some(index) = self.state.page_index() {
            self.set_page_index(index as i64 + 1);
        }
    }

    pub fn prev_page(&mut self) {
        if let Some(index) = self.state.page_index() {
            self.set_page_index(index as i64 - 1);
        }
    }

    fn has_next_page(&self) -> bool {
        self.state
            .page_index()
            .is_some_and(|index| index + 1 < self.state.page_count())
    }

    fn has_prev_page(&self) -> bool {
        self.state.page_index().is_some_and(|index| index > 0)
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.state.set_zoom(zoom);
        self.notify();
    }

    pub fn zoom_in(&mut self, factor: f64) {
        self.state.zoom_in(factor);
        self.notify();
    }

    pub fn zoom_out(&mut self, factor: f64) {
        self.state.zoom_out(factor);
        self.notify();
    }

    pub fn set_max_zoom(&mut self, max_zoom: f64) {
        self.state.set_max_zoom(max_zoom);
        self.notify();
    }

    pub fn set_pan(&mut self, pan: PointF) {
        self.state.set_pan(pan);
        self.notify();
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.state.pan_by(PointF::new(dx, dy));
        self.notify();
    }

    pub fn set_page_orientation(&mut self, orientation: PageOrientation) {
        self.state.set_page_orientation(orientation);
        self.notify();
    }

    pub fn set_page_orientation_steps(&mut self, steps: i64) {
        self.state.set_page_orientation_steps(steps);
        self.notify();
    }

    pub fn rotate_clockwise(&mut self) {
        self.state.rotate_clockwise();
        self.notify();
    }

    pub fn rotate_counter_clockwise(&mut self) {
        self.state.rotate_counter_clockwise();
        self.notify();
    }

    pub fn toggle_fit_cover(&mut self) {
        self.state.toggle_fit_cover();
        self.notify();
    }

    /// # Errors
    ///
    /// Fails when the framebuffer for the new size cannot be allocated.
    pub fn resize(&mut self, viewport: ISize) -> Result<()> {
        self.state.resize(viewport);
        self.dispatch()
    }

    /// Rasterize everything pending and return the framebuffer.
    pub fn present(&mut self) -> &Framebuffer {
        self.renderer.present(&self.state)
    }

    /// Present and return an owned frame, shifted by the running slide.
    pub fn present_image(&mut self) -> RgbaImage {
        let offset = self.slide_offset.round() as i32;
        self.renderer.present(&self.state);
        if offset == 0 {
            self.renderer.framebuffer().as_image().clone()
        } else {
            self.renderer.compose_slide(offset)
        }
    }

    pub fn set_background(&mut self, background: [u8; 4]) {
        self.config.background = background;
        self.renderer.set_background(Rgba(background));
    }

    pub fn begin_drag(&mut self) {
        if self.slide.is_none() {
            self.drag = Some(DragGesture::default());
        }
    }

    /// Pan by a drag motion, collecting horizontal motion past the page edge.
    pub fn drag_by(&mut self, delta: PointF) {
        if self.slide.is_some() {
            return;
        }
        let Some(mut drag) = self.drag else {
            self.pan_by(delta.x, delta.y);
            return;
        };

        // Pulling back towards the page unwinds the overshoot first.
        let mut dx = delta.x;
        if drag.overshoot != 0.0 && dx * drag.overshoot < 0.0 {
            let unwound = if dx.abs() > drag.overshoot.abs() {
                -drag.overshoot
            } else {
                dx
            };
            drag.overshoot += unwound;
            dx -= unwound;
        }

        let requested = self.state.pan() + PointF::new(dx, delta.y);
        let applied = self.state.set_pan(requested);
        drag.overshoot += requested.x - applied.x;

        self.drag = Some(drag);
        self.slide_offset = drag.overshoot;
        self.notify();
    }

    /// Release the drag with a horizontal velocity in pixels per millisecond.
    ///
    /// Pulling far enough past an edge with a neighbouring page behind it
    /// slides to that page; anything else springs back.
    pub fn end_drag(&mut self, velocity: f64) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        if drag.overshoot == 0.0 {
            self.slide_offset = 0.0;
            return;
        }

        let width = f64::from(self.state.viewport().width);
        let threshold = self.config.slide_threshold * width;
        let target = if drag.overshoot <= -threshold && self.has_next_page() {
            SlideTarget::NextPage
        } else if drag.overshoot >= threshold && self.has_prev_page() {
            SlideTarget::PreviousPage
        } else {
            SlideTarget::Rest
        };
        let end = match target {
            SlideTarget::NextPage => -width,
            SlideTarget::PreviousPage => width,
            SlideTarget::Rest => 0.0,
        };
        debug!(?target, overshoot = drag.overshoot, velocity, "starting page slide");
        self.slide = Some(SlideAnimation::new(
            drag.overshoot,
            end,
            velocity,
            self.config.slide_duration_ms,
            target,
        ));
    }

    /// Advance the running slide to `elapsed_ms` after it started. Returns
    /// whether the slide still runs; a finished slide commits its page change.
    pub fn tick(&mut self, elapsed_ms: f64) -> bool {
        let Some(slide) = self.slide.as_mut() else {
            return false;
        };
        let frame = slide.advance(elapsed_ms);
        self.slide_offset = frame.offset;
        if !frame.done {
            return true;
        }

        let target = slide.target();
        self.slide = None;
        self.slide_offset = 0.0;
        match target {
            SlideTarget::NextPage => self.next_page(),
            SlideTarget::PreviousPage => self.prev_page(),
            SlideTarget::Rest => {}
        }
        false
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_sliding(&self) -> bool {
        self.slide.is_some()
    }

    pub fn slide_offset(&self) -> f64 {
        self.slide_offset
    }

    fn cancel_gestures(&mut self) {
        self.drag = None;
        self.slide = None;
        self.slide_offset = 0.0;
    }

    fn dispatch(&mut self) -> Result<()> {
        for event in self.state.take_events() {
            self.renderer.handle_event(event, &self.state)?;
            for listener in &mut self.listeners {
                listener(event);
            }
        }
        Ok(())
    }

    fn notify(&mut self) {
        if let Err(err) = self.dispatch() {
            error!(error = %err, "failed to apply view change");
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    pub fn status_message(&self) -> &'static str {
        self.state.status_message()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn page_index(&self) -> Option<usize> {
        self.state.page_index()
    }

    pub fn page_count(&self) -> usize {
        self.state.page_count()
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom()
    }

    pub fn max_zoom(&self) -> f64 {
        self.state.max_zoom()
    }

    pub fn fit_zoom(&self) -> f64 {
        self.state.fit_zoom()
    }

    pub fn cover_zoom(&self) -> f64 {
        self.state.cover_zoom()
    }

    pub fn pan(&self) -> PointF {
        self.state.pan()
    }

    pub fn fit_pan(&self) -> PointF {
        self.state.fit_pan()
    }

    pub fn cover_pan(&self) -> PointF {
        self.state.cover_pan()
    }

    pub fn orientation(&self) -> PageOrientation {
        self.state.orientation()
    }

    pub fn viewport(&self) -> ISize {
        self.state.viewport()
    }

    pub fn render_stats(&self) -> RenderStats {
        self.renderer.stats()
    }

    pub fn dirty_region(&self) -> &crate::dirty_region::DirtyRegion {
        self.renderer.dirty_region()
    }

    /// Number of page handles acquired since construction.
    pub fn page_loads(&self) -> u64 {
        self.page_loads
    }
}
