//! Document loading and page rasterization interfaces.
//!
//! The viewer never parses PDF itself. A [`Backend`] opens documents, a
//! [`DocumentHandle`] hands out pages and metadata, and a [`PageHandle`]
//! rasterizes sub-regions of one page.

use std::path::Path;

use image::RgbaImage;

use crate::error::BackendError;
use crate::geometry::{IRect, SizeF};
use crate::metadata::Metadata;
use crate::orientation::PageOrientation;

/// Reference resolution of PDF user space: one point is 1/72 inch.
pub const POINTS_PER_INCH: f64 = 72.0;

pub trait Backend {
    type Document: DocumentHandle;

    /// Open a document.
    ///
    /// # Errors
    ///
    /// [`BackendError::Unreadable`] when the file cannot be parsed, or
    /// [`BackendError::Locked`] when the backend refuses to open an encrypted
    /// document without a password.
    fn load(&self, path: &Path) -> Result<Self::Document, BackendError>;
}

pub trait DocumentHandle {
    type Page: PageHandle;

    fn is_locked(&self) -> bool;

    fn page_count(&self) -> usize;

    fn page(&self, index: usize) -> Result<Self::Page, BackendError>;

    fn metadata(&self) -> Metadata;
}

pub trait PageHandle {
    /// Unrotated page size in points.
    fn natural_size(&self) -> SizeF;

    /// Rasterize `request.clip` of the page. The returned bitmap is
    /// `clip.width x clip.height` pixels.
    fn rasterize(&self, request: &RasterRequest) -> Result<RgbaImage, BackendError>;
}

/// One rasterization call.
///
/// `clip` lives in pixel space of the page rendered at `dpi_x`/`dpi_y` and
/// rotated by `orientation`, with the origin at the rotated page's top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterRequest {
    pub dpi_x: f64,
    pub dpi_y: f64,
    pub clip: IRect,
    pub orientation: PageOrientation,
}

impl RasterRequest {
    pub fn at_scale(scale: f64, clip: IRect, orientation: PageOrientation) -> Self {
        Self {
            dpi_x: POINTS_PER_INCH * scale,
            dpi_y: POINTS_PER_INCH * scale,
            clip,
            orientation,
        }
    }

    /// Pixels per point on the horizontal axis.
    pub fn scale_x(&self) -> f64 {
        self.dpi_x / POINTS_PER_INCH
    }

    pub fn scale_y(&self) -> f64 {
        self.dpi_y / POINTS_PER_INCH
    }
}
