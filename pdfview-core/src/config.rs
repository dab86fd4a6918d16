use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::ISize;

/// Tunables for a [`crate::PdfViewer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Upper zoom bound. Values below the fit zoom are raised to it.
    pub max_zoom: f64,
    /// Factor applied by `zoom_in`/`zoom_out`.
    pub zoom_step: f64,
    /// RGBA fill for viewport area not covered by the page.
    pub background: [u8; 4],
    /// Initial viewport, replaced by the host's first resize.
    pub viewport: ISize,
    pub slide_duration_ms: f64,
    pub slide_tick_ms: u64,
    /// Fraction of the viewport width a drag must overshoot the page edge
    /// before releasing it slides to the neighbouring page.
    pub slide_threshold: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            max_zoom: 6.0,
            zoom_step: 1.25,
            background: [0x30, 0x30, 0x30, 0xff],
            viewport: ISize::new(800, 600),
            slide_duration_ms: 300.0,
            slide_tick_ms: 10,
            slide_threshold: 0.25,
        }
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.zoom_step > 1.0) {
            return Err(ConfigError::ZoomStep(self.zoom_step));
        }
        if !(self.slide_duration_ms > 0.0) {
            return Err(ConfigError::SlideDuration(self.slide_duration_ms));
        }
        if self.slide_tick_ms == 0 {
            return Err(ConfigError::SlideTick);
        }
        if !(self.slide_threshold > 0.0 && self.slide_threshold <= 1.0) {
            return Err(ConfigError::SlideThreshold(self.slide_threshold));
        }
        Ok(())
    }
}
