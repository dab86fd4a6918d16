//! Geometric model of the viewer: page size, rotation, zoom, pan and viewport.
//!
//! Zoom and scale describe the same thing from two sides. Scale is the factor
//! the page is rasterized at; zoom is relative to the fit scale, so a zoom of
//! 1 always shows the whole page regardless of rotation or viewport size.

use std::fmt;

use tracing::debug;

use crate::events::{EventQueue, ViewEvent};
use crate::geometry::{equal_reals, IPoint, IRect, ISize, PointF, SizeF, REAL_PRECISION};
use crate::orientation::PageOrientation;

/// Zoom at which the page fits the viewport exactly. Never goes below this.
pub const FIT_ZOOM: f64 = 1.0;

pub const DEFAULT_MAX_ZOOM: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// Nothing has been opened yet.
    #[default]
    NotOpen,
    /// A document with at least one page is open and unlocked.
    Ok,
    CannotOpen,
    NoPages,
    Locked,
}

impl Status {
    pub fn message(self) -> &'static str {
        match self {
            Status::Ok => "Okay",
            Status::NotOpen => "No document opened",
            Status::NoPages => "Document has no pages",
            Status::CannotOpen => "Unable to open document",
            Status::Locked => "Document is locked",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug)]
pub struct ViewState {
    status: Status,
    page_index: Option<usize>,
    page_count: usize,
    page_size: Option<SizeF>,
    orientation: PageOrientation,
    zoom: f64,
    max_zoom: f64,
    pan: PointF,
    viewport: ISize,
    events: EventQueue,
}

impl ViewState {
    pub fn new(viewport: ISize, max_zoom: f64) -> Self {
        Self {
            status: Status::NotOpen,
            page_index: None,
            page_count: 0,
            page_size: None,
            orientation: PageOrientation::ZeroPi,
            zoom: FIT_ZOOM,
            max_zoom: max_zoom.max(FIT_ZOOM),
            pan: PointF::ZERO,
            viewport,
            events: EventQueue::default(),
        }
    }

    /// Notifications emitted since the last call, in emission order.
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        self.events.drain()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn status_message(&self) -> &'static str {
        self.status.message()
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        if status != self.status {
            debug!(from = ?self.status, to = ?status, "status changed");
            self.status = status;
            self.events.emit(ViewEvent::StatusChanged);
        }
    }

    pub(crate) fn source_changed(&mut self) {
        self.events.emit(ViewEvent::SourceChanged);
    }

    pub fn page_index(&self) -> Option<usize> {
        self.page_index
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Natural size of the loaded page in points.
    pub fn page_size(&self) -> Option<SizeF> {
        self.page_size
    }

    pub(crate) fn set_page_count(&mut self, page_count: usize) {
        self.page_count = page_count;
    }

    /// Clamp a requested page index into the document. `None` without pages.
    pub fn clamp_page_index(&self, index: i64) -> Option<usize> {
        if self.page_count == 0 {
            return None;
        }
        let last = self.page_count as i64 - 1;
        Some(index.clamp(0, last) as usize)
    }

    /// Record that the page at `index` is now the one displayed.
    ///
    /// Resets the view to fit zoom and the centered pan.
    pub(crate) fn page_loaded(&mut self, index: usize, natural_size: SizeF) {
        debug!(index, width = natural_size.width, height = natural_size.height, "page loaded");
        self.page_index = Some(index);
        self.page_size = Some(natural_size);
        self.events.emit(ViewEvent::PageNumberChanged);
        self.events.emit(ViewEvent::CoverZoomChanged);
        self.reset_to_fit();
    }

    /// Forget the displayed page. Zoom and pan are left alone until the
    /// next page is loaded.
    pub(crate) fn page_unloaded(&mut self) {
        if self.page_size.take().is_some() {
            self.events.emit(ViewEvent::CoverZoomChanged);
        }
    }

    pub fn orientation(&self) -> PageOrientation {
        self.orientation
    }

    pub fn set_page_orientation(&mut self, orientation: PageOrientation) {
        if orientation == self.orientation {
            return;
        }
        self.orientation = orientation;
        self.events.emit(ViewEvent::PageOrientationChanged);
        self.events.emit(ViewEvent::CoverZoomChanged);
        self.reconstrain_pan();
    }

    /// Set orientation from any number of quarter turns, negative included.
    pub fn set_page_orientation_steps(&mut self, steps: i64) {
        self.set_page_orientation(PageOrientation::from_steps(steps));
    }

    pub fn rotate_clockwise(&mut self) {
        self.set_page_orientation(self.orientation.clockwise());
    }

    pub fn rotate_counter_clockwise(&mut self) {
        self.set_page_orientation(self.orientation.counter_clockwise());
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn fit_zoom(&self) -> f64 {
        FIT_ZOOM
    }

    pub fn is_fit_zoom(&self) -> bool {
        equal_reals(self.zoom, FIT_ZOOM, REAL_PRECISION)
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_nan() {
            return;
        }
        let zoom = zoom.clamp(FIT_ZOOM, self.max_zoom);
        if equal_reals(self.zoom, zoom, REAL_PRECISION) {
            // Silent, but a lowered maximum must still bound the stored value.
            self.zoom = self.zoom.clamp(FIT_ZOOM, self.max_zoom);
            return;
        }
        self.zoom = zoom;
        self.events.emit(ViewEvent::ZoomChanged);
        self.reconstrain_pan();
    }

    pub fn zoom_in(&mut self, factor: f64) {
        self.set_zoom(self.zoom * factor);
    }

    pub fn zoom_out(&mut self, factor: f64) {
        self.set_zoom(self.zoom / factor);
    }

    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    pub fn set_max_zoom(&mut self, max_zoom: f64) {
        let max_zoom = max_zoom.max(FIT_ZOOM);
        if equal_reals(self.max_zoom, max_zoom, REAL_PRECISION) {
            return;
        }
        self.max_zoom = max_zoom;
        self.events.emit(ViewEvent::MaxZoomChanged);
        self.set_zoom(self.zoom);
    }

    /// Zoom at which the page covers the whole viewport.
    pub fn cover_zoom(&self) -> f64 {
        self.cover_scale() / self.fit_scale()
    }

    pub fn pan(&self) -> PointF {
        self.pan
    }

    /// Set the pan after constraining it. Returns the pan actually applied.
    pub fn set_pan(&mut self, requested: PointF) -> PointF {
        let constrained = self.constrain_pan(requested);
        if !constrained.fuzzy_eq(&self.pan) {
            self.pan = constrained;
            self.events.emit(ViewEvent::PanChanged);
        }
        self.pan
    }

    pub fn pan_by(&mut self, delta: PointF) -> PointF {
        self.set_pan(self.pan + delta)
    }

    /// Pan that centers the page at fit zoom.
    pub fn fit_pan(&self) -> PointF {
        let Some(quad) = self.page_quad() else {
            return PointF::ZERO;
        };
        let viewport = self.viewport.to_f64();
        let fit = self.fit_scale();
        PointF::new(
            (viewport.width - quad.width * fit) / 2.0,
            (viewport.height - quad.height * fit) / 2.0,
        )
    }

    /// Pan that puts the page's top-left corner at the viewport's at cover zoom.
    pub fn cover_pan(&self) -> PointF {
        let Some(quad) = self.page_quad() else {
            return PointF::ZERO;
        };
        let excess = self.cover_scale() - self.fit_scale();
        PointF::new(quad.width * excess / 2.0, quad.height * excess / 2.0)
    }

    /// Offset that keeps the page centered while it grows beyond fit scale.
    pub fn zoom_pan(&self) -> PointF {
        let Some(quad) = self.page_quad() else {
            return PointF::ZERO;
        };
        let excess = self.scale() - self.fit_scale();
        PointF::new(-quad.width * excess / 2.0, -quad.height * excess / 2.0)
    }

    /// Screen position of the scaled page's top-left corner, in whole pixels.
    pub fn translation(&self) -> IPoint {
        self.pan.rounded() + self.zoom_pan().rounded()
    }

    /// Restrict a requested pan so the page never reveals background on an
    /// axis where it is larger than the viewport.
    ///
    /// At fit zoom the pan is the fit pan. Otherwise each axis on which the
    /// scaled page fits inside the viewport is locked to the centered
    /// position; on the other axes the page edges may not move inside the
    /// viewport edges.
    pub fn constrain_pan(&self, requested: PointF) -> PointF {
        let fit_pan = self.fit_pan();
        if self.is_fit_zoom() || requested.x.is_nan() || requested.y.is_nan() {
            return fit_pan;
        }
        let Some(quad) = self.page_quad() else {
            return fit_pan;
        };

        let viewport = self.viewport.to_f64();
        let scaled = quad.scaled(self.scale());
        let zoom_pan = self.zoom_pan();
        PointF::new(
            constrain_axis(requested.x, fit_pan.x, scaled.width, viewport.width, zoom_pan.x),
            constrain_axis(requested.y, fit_pan.y, scaled.height, viewport.height, zoom_pan.y),
        )
    }

    fn reconstrain_pan(&mut self) {
        let pan = self.pan;
        self.set_pan(pan);
    }

    fn reset_to_fit(&mut self) {
        self.set_zoom(FIT_ZOOM);
        let fit_pan = self.fit_pan();
        self.set_pan(fit_pan);
    }

    /// Jump between fit zoom and cover zoom.
    pub fn toggle_fit_cover(&mut self) {
        if self.is_fit_zoom() {
            self.set_zoom(self.cover_zoom());
            let cover_pan = self.cover_pan();
            self.set_pan(cover_pan);
        } else {
            self.reset_to_fit();
        }
    }

    pub fn viewport(&self) -> ISize {
        self.viewport
    }

    pub fn resize(&mut self, viewport: ISize) {
        if viewport == self.viewport {
            return;
        }
        debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.viewport = viewport;
        self.events.emit(ViewEvent::ViewportResized);
        self.events.emit(ViewEvent::CoverZoomChanged);
        self.reconstrain_pan();
    }

    /// Page size with width and height swapped at 90° and 270°.
    pub fn page_quad(&self) -> Option<SizeF> {
        let size = self.page_size?;
        Some(if self.orientation.is_quarter_turned() {
            size.transposed()
        } else {
            size
        })
    }

    /// Scale at which the whole page is visible, touching the tighter axis.
    pub fn fit_scale(&self) -> f64 {
        self.axis_scales().map_or(1.0, |(fit, _)| fit)
    }

    /// Scale at which the page covers the whole viewport.
    pub fn cover_scale(&self) -> f64 {
        self.axis_scales().map_or(1.0, |(_, cover)| cover)
    }

    /// Current rasterization scale.
    pub fn scale(&self) -> f64 {
        self.zoom * self.fit_scale()
    }

    /// `(fit, cover)`. A viewport wider than the page at viewport height
    /// fits on height and covers on width; otherwise the roles swap.
    fn axis_scales(&self) -> Option<(f64, f64)> {
        let quad = self.page_quad().filter(|quad| !quad.is_empty())?;
        let viewport = self.viewport.to_f64();
        let by_height = viewport.height / quad.height;
        let by_width = viewport.width / quad.width;
        let page_aspect = quad.width / quad.height;

        if viewport.width > viewport.height * page_aspect {
            Some((by_height, by_width))
        } else {
            Some((by_width, by_height))
        }
    }

    /// The scaled page in its own pixel space, origin at (0, 0).
    pub fn page_rect(&self) -> IRect {
        let Some(quad) = self.page_quad() else {
            return IRect::default();
        };
        let scale = self.scale();
        IRect::new(
            0,
            0,
            (quad.width * scale).round() as i32,
            (quad.height * scale).round() as i32,
        )
    }

    /// Map a viewport pixel to a point on the rotated page, in points.
    pub fn screen_to_page(&self, point: PointF) -> PointF {
        let translation = self.translation();
        let scale = self.scale();
        PointF::new(
            (point.x - f64::from(translation.x)) / scale,
            (point.y - f64::from(translation.y)) / scale,
        )
    }

    pub fn page_to_screen(&self, point: PointF) -> PointF {
        let translation = self.translation();
        let scale = self.scale();
        PointF::new(
            point.x * scale + f64::from(translation.x),
            point.y * scale + f64::from(translation.y),
        )
    }
}

fn constrain_axis(requested: f64, fit: f64, extent: f64, viewport: f64, zoom_offset: f64) -> f64 {
    if extent <= viewport {
        return fit;
    }
    // Page edge = pan + zoom_offset must stay within [viewport - extent, 0].
    let lowest = viewport - extent - zoom_offset;
    let highest = -zoom_offset;
    requested.clamp(lowest, highest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LETTER: SizeF = SizeF::new(612.0, 792.0);

    fn state_with_page(viewport: ISize, page: SizeF) -> ViewState {
        let mut state = ViewState::new(viewport, DEFAULT_MAX_ZOOM);
        state.set_status(Status::Ok);
        state.set_page_count(1);
        state.page_loaded(0, page);
        state.take_events();
        state
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn portrait_page_in_landscape_viewport_fits_on_height() {
        let state = state_with_page(ISize::new(800, 600), LETTER);
        assert_close(state.fit_scale(), 600.0 / 792.0);
        assert_close(state.cover_scale(), 800.0 / 612.0);
        assert_close(state.cover_zoom(), (800.0 / 612.0) / (600.0 / 792.0));
    }

    #[test]
    fn quarter_turn_swaps_constrained_axis() {
        let mut state = state_with_page(ISize::new(800, 600), LETTER);
        state.rotate_clockwise();
        assert_eq!(state.page_quad(), Some(SizeF::new(792.0, 612.0)));
        // 800 > 600 * (792 / 612) still holds, so height constrains the fit.
        assert_close(state.fit_scale(), 600.0 / 612.0);
        assert_close(state.cover_scale(), 800.0 / 792.0);
    }

    #[test]
    fn without_page_scales_are_unity() {
        let state = ViewState::new(ISize::new(800, 600), DEFAULT_MAX_ZOOM);
        assert_eq!(state.fit_scale(), 1.0);
        assert_eq!(state.cover_scale(), 1.0);
        assert_eq!(state.fit_pan(), PointF::ZERO);
        assert_eq!(state.page_rect(), IRect::default());
    }

    #[test]
    fn loaded_page_is_centered_at_fit() {
        let state = state_with_page(ISize::new(800, 600), LETTER);
        let fit = 600.0 / 792.0;
        assert_eq!(state.zoom(), FIT_ZOOM);
        assert_close(state.pan().x, (800.0 - 612.0 * fit) / 2.0);
        assert_close(state.pan().y, 0.0);
        assert_eq!(state.translation(), state.fit_pan().rounded());
    }

    #[test]
    fn zoom_is_clamped_between_fit_and_max() {
        let mut state = state_with_page(ISize::new(800, 600), LETTER);
        state.set_zoom(0.2);
        assert_eq!(state.zoom(), FIT_ZOOM);
        state.set_zoom(100.0);
        assert_eq!(state.zoom(), DEFAULT_MAX_ZOOM);
        state.set_zoom(f64::NAN);
        assert_eq!(state.zoom(), DEFAULT_MAX_ZOOM);
    }

    #[test]
    fn near_duplicate_zoom_emits_nothing() {
        let mut state = state_with_page(ISize::new(800, 600), LETTER);
        state.set_zoom(2.0);
        state.take_events();
        state.set_zoom(2.0004);
        assert!(state.take_events().is_empty());
        assert_eq!(state.zoom(), 2.0);
    }

    #[test]
    fn lowering_max_zoom_reclamps_zoom() {
        let mut state = state_with_page(ISize::new(800, 600), LETTER);
        state.set_zoom(5.0);
        state.take_events();
        state.set_max_zoom(3.0);

        assert_eq!(state.zoom(), 3.0);
        let events = state.take_events();
        assert_eq!(events[0], ViewEvent::MaxZoomChanged);
        assert!(events.contains(&ViewEvent::ZoomChanged));
    }

    #[test]
    fn max_zoom_never_drops_below_fit() {
        let mut state = state_with_page(ISize::new(800, 600), LETTER);
        state.set_max_zoom(0.5);
        assert_eq!(state.max_zoom(), FIT_ZOOM);
    }

    #[test]
    fn pan_is_locked_at_fit_zoom() {
        let mut state = state_with_page(ISize::new(800, 600), LETTER);
        let fit_pan = state.fit_pan();
        state.set_pan(PointF::new(-500.0, 300.0));
        assert!(state.pan().fuzzy_eq(&fit_pan));
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn returning_to_fit_zoom_restores_fit_pan() {
        let mut state = state_with_page(ISize::new(800, 600), LETTER);
        state.set_zoom(3.0);
        state.pan_by(PointF::new(-120.0, -80.0));
        state.set_zoom(FIT_ZOOM);
        assert!(state.pan().fuzzy_eq(&state.fit_pan()));
    }

    #[test]
    fn narrow_axis_stays_centered_while_zoomed() {
        // At zoom 1.2 the page is 555px wide in an 800px viewport.
        let mut state = state_with_page(ISize::new(800, 600), LETTER);
        state.set_zoom(1.2);
        let centered = state.constrain_pan(state.fit_pan());
        state.set_pan(PointF::new(1000.0, state.pan().y));
        assert_close(state.pan().x, centered.x);

        let scaled_width = 612.0 * state.scale();
        let left = state.pan().x + state.zoom_pan().x;
        assert_close(left, (800.0 - scaled_width) / 2.0);
    }

    #[test]
    fn overflowing_axis_stops_at_page_edges() {
        let mut state = state_with_page(ISize::new(800, 600), LETTER);
        state.set_zoom(3.0);
        let scaled = LETTER.scaled(state.scale());

        state.set_pan(PointF::new(1e6, 1e6));
        let top_left = state.pan() + state.zoom_pan();
        assert_close(top_left.x, 0.0);
        assert_close(top_left.y, 0.0);

        state.set_pan(PointF::new(-1e6, -1e6));
        let top_left = state.pan() + state.zoom_pan();
        assert_close(top_left.x + scaled.width, 800.0);
        assert_close(top_left.y + scaled.height, 600.0);
    }

    #[test]
    fn resize_keeps_fit_pan_at_fit_zoom() {
        let mut state = state_with_page(ISize::new(800, 600), LETTER);
        state.resize(ISize::new(1000, 600));
        assert!(state.pan().fuzzy_eq(&state.fit_pan()));
        let events = state.take_events();
        assert_eq!(
            &events[..2],
            &[ViewEvent::ViewportResized, ViewEvent::CoverZoomChanged]
        );
        assert!(events.contains(&ViewEvent::PanChanged));
    }

    #[test]
    fn resize_to_same_size_is_silent() {
        let mut state = state_with_page(ISize::new(800, 600), LETTER);
        state.resize(ISize::new(800, 600));
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn rotation_emits_orientation_and_cover_zoom() {
        let mut state = state_with_page(ISize::new(800, 600), LETTER);
        state.rotate_counter_clockwise();
        assert_eq!(state.orientation(), PageOrientation::OneHalfPi);
        let events = state.take_events();
        assert_eq!(events[0], ViewEvent::PageOrientationChanged);
        assert_eq!(events[1], ViewEvent::CoverZoomChanged);

        state.set_page_orientation_steps(-1);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn toggle_fit_cover_round_trips() {
        let mut state = state_with_page(ISize::new(800, 600), LETTER);
        state.toggle_fit_cover();
        assert!(equal_reals(state.zoom(), state.cover_zoom(), REAL_PRECISION));
        // At cover zoom the page's top-left sits at the viewport's.
        assert_eq!(state.translation(), IPoint::ZERO);

        state.toggle_fit_cover();
        assert!(state.is_fit_zoom());
        assert!(state.pan().fuzzy_eq(&state.fit_pan()));
    }

    #[test]
    fn screen_and_page_points_map_both_ways() {
        let mut state = state_with_page(ISize::new(800, 600), LETTER);
        state.set_zoom(2.0);
        let origin = state.translation();

        let top_left = state.screen_to_page(PointF::new(f64::from(origin.x), f64::from(origin.y)));
        assert_close(top_left.x, 0.0);
        assert_close(top_left.y, 0.0);

        let corner = state.page_to_screen(PointF::new(612.0, 792.0));
        assert_close(corner.x - f64::from(origin.x), 612.0 * state.scale());

        let back = state.page_to_screen(state.screen_to_page(PointF::new(400.0, 300.0)));
        assert_close(back.x, 400.0);
        assert_close(back.y, 300.0);
    }

    #[test]
    fn clamp_page_index_stays_in_document() {
        let mut state = ViewState::new(ISize::new(800, 600), DEFAULT_MAX_ZOOM);
        assert_eq!(state.clamp_page_index(0), None);
        state.set_page_count(3);
        assert_eq!(state.clamp_page_index(5), Some(2));
        assert_eq!(state.clamp_page_index(-1), Some(0));
    }

    #[test]
    fn status_messages() {
        assert_eq!(Status::NotOpen.to_string(), "No document opened");
        assert_eq!(Status::Locked.message(), "Document is locked");
    }

    proptest! {
        #[test]
        fn zoom_always_within_bounds(zoom in -100.0f64..100.0, max in 0.0f64..20.0) {
            let mut state = state_with_page(ISize::new(800, 600), LETTER);
            state.set_max_zoom(max);
            state.set_zoom(zoom);
            prop_assert!(state.zoom() >= state.fit_zoom());
            prop_assert!(state.zoom() <= state.max_zoom());
        }

        #[test]
        fn zoomed_pan_never_reveals_background_on_overflowing_axis(
            zoom in 1.0f64..6.0,
            x in -5000.0f64..5000.0,
            y in -5000.0f64..5000.0,
            width in 100u32..1600,
            height in 100u32..1200,
        ) {
            let mut state = state_with_page(ISize::new(width, height), LETTER);
            state.set_zoom(zoom);
            state.set_pan(PointF::new(x, y));

            let viewport = state.viewport().to_f64();
            let scaled = LETTER.scaled(state.scale());
            let top_left = state.pan() + state.zoom_pan();
            let tolerance = 1e-3;
            if !state.is_fit_zoom() && scaled.width > viewport.width {
                prop_assert!(top_left.x <= tolerance);
                prop_assert!(top_left.x + scaled.width >= viewport.width - tolerance);
            }
            if !state.is_fit_zoom() && scaled.height > viewport.height {
                prop_assert!(top_left.y <= tolerance);
                prop_assert!(top_left.y + scaled.height >= viewport.height - tolerance);
            }
        }

        #[test]
        fn fit_zoom_always_means_fit_pan(
            history in proptest::collection::vec((1.0f64..6.0, -800.0f64..800.0, -800.0f64..800.0), 0..8),
        ) {
            let mut state = state_with_page(ISize::new(800, 600), LETTER);
            for (zoom, dx, dy) in history {
                state.set_zoom(zoom);
                state.pan_by(PointF::new(dx, dy));
            }
            state.set_zoom(FIT_ZOOM);
            prop_assert!(state.pan().fuzzy_eq(&state.fit_pan()));
        }
    }
}
