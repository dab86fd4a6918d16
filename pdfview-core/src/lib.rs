//! # pdfview-core
//!
//! Engine of a single-page PDF viewer: the geometric view model (page
//! rotation, zoom, pan, viewport), an incremental renderer that keeps a
//! framebuffer in step with it, and the page-slide gesture animation.
//!
//! PDF parsing and rasterization are delegated to a [`Backend`]. The desktop
//! host plugs in PDFium; tests plug in synthetic pages.
//!
//! ```no_run
//! # use pdfview_core::{Backend, PdfViewer, ViewerConfig};
//! # fn demo<B: Backend>(backend: B) -> pdfview_core::Result<()> {
//! let mut viewer = PdfViewer::new(backend, ViewerConfig::default())?;
//! if viewer.open("paper.pdf").is_ok() {
//!     viewer.zoom_in(1.25);
//!     let frame = viewer.present();
//!     println!("{}x{}", frame.size().width, frame.size().height);
//! }
//! # Ok(())
//! # }
//! ```

pub mod animator;
pub mod backend;
pub mod config;
pub mod dirty_region;
pub mod error;
pub mod events;
pub mod framebuffer;
pub mod geometry;
pub mod metadata;
pub mod orientation;
pub mod renderer;
pub mod view_state;
pub mod viewer;

pub use animator::{SlideAnimation, SlideCurve, SlideFrame, SlideTarget};
pub use backend::{Backend, DocumentHandle, PageHandle, RasterRequest, POINTS_PER_INCH};
pub use config::ViewerConfig;
pub use dirty_region::DirtyRegion;
pub use error::{BackendError, ConfigError, OpenError, Result, ViewerError};
pub use events::ViewEvent;
pub use framebuffer::Framebuffer;
pub use geometry::{IPoint, IRect, ISize, PointF, SizeF};
pub use metadata::{parse_pdf_date, Metadata};
pub use orientation::PageOrientation;
pub use renderer::{IncrementalRenderer, RenderStats};
pub use view_state::{Status, ViewState, DEFAULT_MAX_ZOOM, FIT_ZOOM};
pub use viewer::PdfViewer;
