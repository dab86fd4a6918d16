//! PDFium-backed implementation of the viewer's backend traits.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use image::RgbaImage;
use pdfium_render::prelude::*;
use pdfview_core::metadata::parse_pdf_date;
use pdfview_core::{
    Backend, BackendError, DocumentHandle, Metadata, PageHandle, PageOrientation, RasterRequest,
    SizeF,
};

/// Opens documents through a PDFium library bound once for the process.
pub struct PdfiumBackend {
    pdfium: &'static Pdfium,
}

impl PdfiumBackend {
    pub fn new() -> Result<Self> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .context("Failed to bind to PDFium library. Please install PDFium or download the library from https://github.com/bblanchon/pdfium-binaries")?;
        // Documents and pages borrow the library; it lives as long as the process.
        let pdfium: &'static Pdfium = Box::leak(Box::new(Pdfium::new(bindings)));
        Ok(Self { pdfium })
    }
}

impl Backend for PdfiumBackend {
    type Document = PdfiumDocument;

    fn load(&self, path: &Path) -> std::result::Result<PdfiumDocument, BackendError> {
        match self.pdfium.load_pdf_from_file(path, None) {
            Ok(inner) => Ok(PdfiumDocument { inner }),
            Err(PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError)) => {
                Err(BackendError::Locked)
            }
            Err(err) => Err(BackendError::Unreadable(err.to_string())),
        }
    }
}

pub struct PdfiumDocument {
    inner: PdfDocument<'static>,
}

impl DocumentHandle for PdfiumDocument {
    type Page = PdfiumPage;

    fn is_locked(&self) -> bool {
        // PDFium refuses to load encrypted documents without the password.
        false
    }

    fn page_count(&self) -> usize {
        self.inner.pages().len() as usize
    }

    fn page(&self, index: usize) -> std::result::Result<PdfiumPage, BackendError> {
        let page_error = |reason: String| BackendError::Page { index, reason };
        let page_index = u16::try_from(index).map_err(|err| page_error(err.to_string()))?;
        let inner = self
            .inner
            .pages()
            .get(page_index)
            .map_err(|err| page_error(err.to_string()))?;
        Ok(PdfiumPage {
            inner,
            raster: RefCell::new(None),
        })
    }

    fn metadata(&self) -> Metadata {
        let metadata = self.inner.metadata();
        let text = |tag: PdfDocumentMetadataTagType| {
            metadata
                .get(tag)
                .map(|entry| entry.value().to_string())
                .unwrap_or_default()
        };
        let date = |tag: PdfDocumentMetadataTagType| {
            metadata
                .get(tag)
                .and_then(|entry| parse_pdf_date(entry.value()))
        };
        Metadata {
            title: text(PdfDocumentMetadataTagType::Title),
            author: text(PdfDocumentMetadataTagType::Author),
            creator: text(PdfDocumentMetadataTagType::Creator),
            creation_date: date(PdfDocumentMetadataTagType::CreationDate),
            modification_date: date(PdfDocumentMetadataTagType::ModificationDate),
        }
    }
}

/// Key of the last full-page raster: scale bits and rotation.
type RasterKey = (u64, PageOrientation);

/// Largest full-page raster kept between strip requests, in pixels
/// (about 200 MiB of RGBA).
const MAX_CACHED_PIXELS: u64 = 50 * 1024 * 1024;

fn keeps_raster(width: u32, height: u32) -> bool {
    u64::from(width) * u64::from(height) <= MAX_CACHED_PIXELS
}

pub struct PdfiumPage {
    inner: PdfPage<'static>,
    raster: RefCell<Option<(RasterKey, Rc<RgbaImage>)>>,
}

impl PdfiumPage {
    /// Render the whole page, reusing the previous raster for the same scale
    /// and rotation. Panning asks for many strips of one raster.
    ///
    /// Rasters above [`MAX_CACHED_PIXELS`] are dropped after use.
    fn full_raster(&self, scale: f64, orientation: PageOrientation) -> Result<Rc<RgbaImage>> {
        let key = (scale.to_bits(), orientation);
        if let Some((cached, image)) = self.raster.borrow().as_ref() {
            if *cached == key {
                return Ok(Rc::clone(image));
            }
        }
        // Release the stale raster before allocating its replacement.
        self.raster.borrow_mut().take();

        let config = PdfRenderConfig::new()
            .scale_page_by_factor(scale as f32)
            .rotate(render_rotation(orientation), false);
        let bitmap = self
            .inner
            .render_with_config(&config)
            .context("Failed to render page")?;
        let image = RgbaImage::from_raw(
            bitmap.width() as u32,
            bitmap.height() as u32,
            bitmap.as_rgba_bytes(),
        )
        .context("Failed to create image from bitmap")?;

        tracing::debug!(
            width = image.width(),
            height = image.height(),
            degrees = orientation.degrees(),
            "rasterized full page"
        );
        let image = Rc::new(image);
        if keeps_raster(image.width(), image.height()) {
            *self.raster.borrow_mut() = Some((key, Rc::clone(&image)));
        }
        Ok(image)
    }
}

impl PageHandle for PdfiumPage {
    fn natural_size(&self) -> SizeF {
        SizeF::new(
            f64::from(self.inner.width().value),
            f64::from(self.inner.height().value),
        )
    }

    fn rasterize(&self, request: &RasterRequest) -> std::result::Result<RgbaImage, BackendError> {
        let clip = request.clip;
        let full = self
            .full_raster(request.scale_x(), request.orientation)
            .map_err(|err| BackendError::Raster(format!("{err:#}")))?;

        let mut out = RgbaImage::from_pixel(
            clip.width.max(0) as u32,
            clip.height.max(0) as u32,
            image::Rgba([255, 255, 255, 255]),
        );
        // PDFium may round the page size one pixel differently; the white
        // fill covers any shortfall at the far edges.
        let region = image::imageops::crop_imm(
            full.as_ref(),
            clip.x.max(0) as u32,
            clip.y.max(0) as u32,
            out.width(),
            out.height(),
        )
        .to_image();
        image::imageops::replace(&mut out, &region, 0, 0);
        Ok(out)
    }
}

fn render_rotation(orientation: PageOrientation) -> PdfPageRenderRotation {
    match orientation {
        PageOrientation::ZeroPi => PdfPageRenderRotation::None,
        PageOrientation::HalfPi => PdfPageRenderRotation::Degrees90,
        PageOrientation::OnePi => PdfPageRenderRotation::Degrees180,
        PageOrientation::OneHalfPi => PdfPageRenderRotation::Degrees270,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_moderate_rasters_are_kept() {
        // Letter page at fit on a 1080p screen, and at 6x of that.
        assert!(keeps_raster(1_080, 1_397));
        assert!(!keeps_raster(6_480, 8_382));
        assert!(keeps_raster(1, MAX_CACHED_PIXELS as u32));
    }

    #[test]
    fn quarter_turns_map_to_pdfium_rotations() {
        assert!(matches!(
            render_rotation(PageOrientation::ZeroPi),
            PdfPageRenderRotation::None
        ));
        assert!(matches!(
            render_rotation(PageOrientation::ZeroPi.clockwise()),
            PdfPageRenderRotation::Degrees90
        ));
        assert!(matches!(
            render_rotation(PageOrientation::ZeroPi.counter_clockwise()),
            PdfPageRenderRotation::Degrees270
        ));
    }
}
