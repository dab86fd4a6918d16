use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pdfview_core::ViewerConfig;

use crate::cli::Options;

/// Read viewer settings from an optional JSON file, then apply command-line
/// overrides. Missing keys keep their defaults.
pub fn load(options: &Options) -> Result<ViewerConfig> {
    let mut config = match &options.config {
        Some(path) => read_file(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(max_zoom) = options.max_zoom {
        config.max_zoom = max_zoom;
    }
    config.validate().context("invalid viewer settings")?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<ViewerConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read settings file {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("malformed settings file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded settings file");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn options(config: Option<PathBuf>, max_zoom: Option<f64>) -> Options {
        Options {
            path: PathBuf::from("paper.pdf"),
            windowed: true,
            max_zoom,
            config,
        }
    }

    #[test]
    fn defaults_without_file() {
        let config = load(&options(None, None)).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn file_values_and_cli_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_zoom": 3.0, "zoom_step": 1.5 }}"#).unwrap();

        let config = load(&options(Some(file.path().to_path_buf()), None)).unwrap();
        assert_eq!(config.max_zoom, 3.0);
        assert_eq!(config.zoom_step, 1.5);
        assert_eq!(config.slide_tick_ms, ViewerConfig::default().slide_tick_ms);

        let config = load(&options(Some(file.path().to_path_buf()), Some(9.0))).unwrap();
        assert_eq!(config.max_zoom, 9.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "zoom_step": 0.5 }}"#).unwrap();
        assert!(load(&options(Some(file.path().to_path_buf()), None)).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        let err = load(&options(Some(missing), None)).unwrap_err();
        assert!(err.to_string().contains("cannot read settings file"));
    }
}
