//! Keeps a viewport-sized framebuffer in step with the [`ViewState`].
//!
//! Rasterization is the dominant cost, so the renderer only asks the page
//! for the pixels that changed: a pan scrolls the existing framebuffer and
//! patches the strips it exposes, while zoom, rotation, page and resize
//! changes repaint everything.

use image::{Rgba, RgbaImage};
use tracing::{debug, trace, warn};

use crate::backend::{PageHandle, RasterRequest};
use crate::dirty_region::DirtyRegion;
use crate::error::Result;
use crate::events::ViewEvent;
use crate::framebuffer::Framebuffer;
use crate::geometry::{IPoint, IRect, ISize};
use crate::view_state::ViewState;

/// Counters describing how much work the renderer has done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub presents: u64,
    pub rasterize_calls: u64,
    pub rasterized_pixels: u64,
    pub full_invalidations: u64,
}

pub struct IncrementalRenderer<P> {
    page: Option<P>,
    framebuffer: Framebuffer,
    dirty: DirtyRegion,
    /// Page translation the framebuffer content was rendered at.
    translation: IPoint,
    background: Rgba<u8>,
    stats: RenderStats,
}

impl<P: PageHandle> IncrementalRenderer<P> {
    /// # Errors
    ///
    /// Fails when the framebuffer cannot be allocated.
    pub fn new(viewport: ISize, background: Rgba<u8>) -> Result<Self> {
        let framebuffer = Framebuffer::new(viewport, background)?;
        let mut dirty = DirtyRegion::new();
        dirty.invalidate_all(viewport);
        Ok(Self {
            page: None,
            framebuffer,
            dirty,
            translation: IPoint::ZERO,
            background,
            stats: RenderStats::default(),
        })
    }

    pub fn page(&self) -> Option<&P> {
        self.page.as_ref()
    }

    /// Replace the page handle. The previous handle is dropped here, before
    /// the caller can acquire another one for the same slot.
    ///
    /// Any change of the slot repaints the whole framebuffer, so an emptied
    /// slot never leaves the old page's pixels behind.
    pub fn set_page(&mut self, page: Option<P>) {
        let had_page = self.page.take().is_some();
        let has_page = page.is_some();
        self.page = page;
        if had_page || has_page {
            self.invalidate_all();
        }
    }

    /// Drop the current page handle, returning to an empty page.
    pub fn release_page(&mut self) {
        self.set_page(None);
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn dirty_region(&self) -> &DirtyRegion {
        &self.dirty
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    pub fn set_background(&mut self, background: Rgba<u8>) {
        if background != self.background {
            self.background = background;
            self.invalidate_all();
        }
    }

    pub fn invalidate_all(&mut self) {
        self.dirty.invalidate_all(self.framebuffer.size());
        self.stats.full_invalidations += 1;
    }

    /// React to one notification from the view state.
    ///
    /// # Errors
    ///
    /// Fails when a resize cannot allocate the new framebuffer.
    pub fn handle_event(&mut self, event: ViewEvent, state: &ViewState) -> Result<()> {
        match event {
            ViewEvent::ViewportResized => {
                let viewport = state.viewport();
                if viewport != self.framebuffer.size() {
                    debug!(width = viewport.width, height = viewport.height, "reallocating framebuffer");
                    self.framebuffer = Framebuffer::new(viewport, self.background)?;
                }
                self.invalidate_all();
                self.translation = state.translation();
            }
            ViewEvent::PanChanged => {
                let translation = state.translation();
                self.scroll(translation - self.translation);
                self.translation = translation;
            }
            event if event.invalidates_framebuffer() => {
                self.invalidate_all();
                self.translation = state.translation();
            }
            _ => {}
        }
        Ok(())
    }

    /// Scroll-then-patch: move valid pixels by `delta` and mark the strips
    /// the move exposed.
    fn scroll(&mut self, delta: IPoint) {
        if delta == IPoint::ZERO {
            return;
        }
        let bounds = self.framebuffer.bounds();
        let (width, height) = (bounds.width, bounds.height);
        let (dx, dy) = (delta.x, delta.y);

        self.framebuffer.scroll(delta);
        self.dirty.translate(delta, bounds);

        if dy > 0 {
            self.dirty.add(IRect::new(0, 0, width, dy), bounds);
        }
        if dy < 0 {
            self.dirty.add(IRect::new(0, height + dy, width, -dy), bounds);
        }
        if dx > 0 {
            self.dirty.add(IRect::new(0, 0, dx, height), bounds);
        }
        if dx < 0 {
            self.dirty.add(IRect::new(width + dx, 0, -dx, height), bounds);
        }
        trace!(dx, dy, pending = self.dirty.rects().len(), "scrolled framebuffer");
    }

    /// Repaint every dirty rectangle and hand back the framebuffer.
    pub fn present(&mut self, state: &ViewState) -> &Framebuffer {
        for rect in self.dirty.take() {
            self.render_rect(rect, state);
        }
        self.stats.presents += 1;
        &self.framebuffer
    }

    fn render_rect(&mut self, rect: IRect, state: &ViewState) {
        self.framebuffer.fill_rect(rect, self.background);

        let Some(page) = self.page.as_ref() else {
            return;
        };
        let page_rect = state.page_rect();
        let translation = state.translation();
        let visible = rect.translated(-translation).intersect(&page_rect);
        if visible.is_empty() {
            return;
        }

        let request = RasterRequest::at_scale(state.scale(), visible, state.orientation());
        self.stats.rasterize_calls += 1;
        self.stats.rasterized_pixels += visible.area();
        match page.rasterize(&request) {
            Ok(bitmap) => {
                self.framebuffer.blit(&bitmap, translation + visible.top_left());
            }
            Err(err) => {
                warn!(error = %err, ?visible, "page rasterization failed");
            }
        }
    }

    /// The framebuffer shifted horizontally by `offset`, with the uncovered
    /// band filled with the background. Used while a page slide runs.
    pub fn compose_slide(&self, offset: i32) -> RgbaImage {
        let mut shifted = match Framebuffer::new(self.framebuffer.size(), self.background) {
            Ok(shifted) => shifted,
            Err(err) => {
                warn!(error = %err, "cannot compose slide frame");
                return self.framebuffer.as_image().clone();
            }
        };
        shifted.blit(self.framebuffer.as_image(), IPoint::new(offset, 0));
        shifted.into_image()
    }
}
