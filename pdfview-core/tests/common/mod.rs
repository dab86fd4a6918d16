//! Synthetic backend: pages whose pixels encode their own page coordinates,
//! so any framebuffer pixel can be checked against a fresh render.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::{Rgba, RgbaImage};
use pdfview_core::{
    Backend, BackendError, DocumentHandle, Metadata, PageHandle, RasterRequest, SizeF,
};

pub const LETTER: SizeF = SizeF::new(612.0, 792.0);

#[derive(Debug, Clone)]
pub enum Fixture {
    Pages { count: usize, size: SizeF, title: String },
    /// Letter-sized pages where loading page `broken` fails.
    BrokenPage { count: usize, broken: usize },
    Locked,
    RefusesWithoutPassword,
}

#[derive(Default)]
pub struct MockBackend {
    fixtures: HashMap<PathBuf, Fixture>,
    pub page_requests: Rc<Cell<u32>>,
    pub raster_calls: Rc<Cell<u32>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, fixture: Fixture) -> Self {
        self.fixtures.insert(PathBuf::from(path), fixture);
        self
    }

    /// `letter.pdf` (3 pages), `torn.pdf` (3 pages, page 1 unloadable),
    /// `locked.pdf`, `password.pdf` and `empty.pdf`.
    pub fn standard() -> Self {
        Self::new()
            .with(
                "letter.pdf",
                Fixture::Pages {
                    count: 3,
                    size: LETTER,
                    title: "Quarterly Report".into(),
                },
            )
            .with("torn.pdf", Fixture::BrokenPage { count: 3, broken: 1 })
            .with("locked.pdf", Fixture::Locked)
            .with("password.pdf", Fixture::RefusesWithoutPassword)
            .with(
                "empty.pdf",
                Fixture::Pages {
                    count: 0,
                    size: LETTER,
                    title: String::new(),
                },
            )
    }
}

pub struct MockDocument {
    fixture: Fixture,
    page_requests: Rc<Cell<u32>>,
    raster_calls: Rc<Cell<u32>>,
}

pub struct MockPage {
    index: usize,
    size: SizeF,
    raster_calls: Rc<Cell<u32>>,
}

impl Backend for MockBackend {
    type Document = MockDocument;

    fn load(&self, path: &Path) -> Result<MockDocument, BackendError> {
        match self.fixtures.get(path) {
            None => Err(BackendError::Unreadable(format!("{} not found", path.display()))),
            Some(Fixture::RefusesWithoutPassword) => Err(BackendError::Locked),
            Some(fixture) => Ok(MockDocument {
                fixture: fixture.clone(),
                page_requests: Rc::clone(&self.page_requests),
                raster_calls: Rc::clone(&self.raster_calls),
            }),
        }
    }
}

impl DocumentHandle for MockDocument {
    type Page = MockPage;

    fn is_locked(&self) -> bool {
        matches!(self.fixture, Fixture::Locked)
    }

    fn page_count(&self) -> usize {
        match &self.fixture {
            Fixture::Pages { count, .. } | Fixture::BrokenPage { count, .. } => *count,
            _ => 0,
        }
    }

    fn page(&self, index: usize) -> Result<MockPage, BackendError> {
        let (count, size) = match &self.fixture {
            Fixture::Pages { count, size, .. } => (count, size),
            Fixture::BrokenPage { broken, .. } if *broken == index => {
                return Err(BackendError::Page {
                    index,
                    reason: "damaged page tree".into(),
                });
            }
            Fixture::BrokenPage { count, .. } => (count, &LETTER),
            _ => {
                return Err(BackendError::Page {
                    index,
                    reason: "locked".into(),
                })
            }
        };
        if index >= *count {
            return Err(BackendError::Page {
                index,
                reason: "out of range".into(),
            });
        }
        self.page_requests.set(self.page_requests.get() + 1);
        Ok(MockPage {
            index,
            size: *size,
            raster_calls: Rc::clone(&self.raster_calls),
        })
    }

    fn metadata(&self) -> Metadata {
        match &self.fixture {
            Fixture::Pages { title, .. } => Metadata {
                title: title.clone(),
                author: "Finance".into(),
                ..Metadata::default()
            },
            _ => Metadata::default(),
        }
    }
}

/// Colour of the page pixel at `(x, y)` in rasterized page space.
pub fn page_pixel(index: usize, x: i32, y: i32) -> Rgba<u8> {
    Rgba([
        x.rem_euclid(251) as u8,
        y.rem_euclid(241) as u8,
        (index as u8).wrapping_mul(40).wrapping_add(((x / 7 + y / 5) % 64) as u8),
        255,
    ])
}

impl PageHandle for MockPage {
    fn natural_size(&self) -> SizeF {
        self.size
    }

    fn rasterize(&self, request: &RasterRequest) -> Result<RgbaImage, BackendError> {
        self.raster_calls.set(self.raster_calls.get() + 1);
        let clip = request.clip;
        Ok(RgbaImage::from_fn(
            clip.width as u32,
            clip.height as u32,
            |x, y| page_pixel(self.index, clip.x + x as i32, clip.y + y as i32),
        ))
    }
}
