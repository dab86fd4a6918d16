use std::path::PathBuf;

use clap::Parser;

/// Fullscreen single-page PDF viewer.
#[derive(Debug, Clone, Parser)]
#[command(name = "pdfview", version, about)]
pub struct Options {
    /// PDF document to open.
    pub path: PathBuf,

    /// Run in a window instead of fullscreen.
    #[arg(long)]
    pub windowed: bool,

    /// Upper zoom bound, relative to the fit zoom.
    #[arg(long, value_name = "FACTOR")]
    pub max_zoom: Option<f64>,

    /// JSON file with viewer settings.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
