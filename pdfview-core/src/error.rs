use std::path::PathBuf;

use thiserror::Error;

use crate::view_state::Status;

/// Failures that stop the viewer from working at all.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("failed to allocate a {width}x{height} framebuffer")]
    FramebufferAllocation { width: u32, height: u32 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Why a document could not be opened. Mirrored into [`Status`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OpenError {
    #[error("unable to open document {path}: {reason}")]
    CannotOpen { path: PathBuf, reason: String },

    #[error("document is locked")]
    Locked,

    #[error("document has no pages")]
    NoPages,
}

impl OpenError {
    pub fn status(&self) -> Status {
        match self {
            OpenError::CannotOpen { .. } => Status::CannotOpen,
            OpenError::Locked => Status::Locked,
            OpenError::NoPages => Status::NoPages,
        }
    }
}

/// Errors reported by a document or rasterization backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("document is unreadable: {0}")]
    Unreadable(String),

    #[error("document requires a password")]
    Locked,

    #[error("page {index} is unavailable: {reason}")]
    Page { index: usize, reason: String },

    #[error("rasterization failed: {0}")]
    Raster(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("zoom step must be greater than 1, got {0}")]
    ZoomStep(f64),

    #[error("slide duration must be positive, got {0} ms")]
    SlideDuration(f64),

    #[error("slide tick interval must be positive")]
    SlideTick,

    #[error("slide threshold must lie in (0, 1], got {0}")]
    SlideThreshold(f64),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
