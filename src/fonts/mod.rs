//! Font discovery, loading, and text measurement
//!
//! The drawing surface needs a real face: an explicit file when the user
//! points at one, otherwise a system lookup preferring the dashboard's
//! "Cairo" family with a sans-serif fallback. The loaded face doubles as
//! the layout pass's measurement capability.

use fontdue::{Font, FontSettings};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::FontConfig;
use crate::layout::Measure;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("no installed font matches family '{0}'")]
    NotFound(String),
    #[error("failed to read font file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse font data: {0}")]
    Parse(String),
}

/// A face ready for measurement and rasterization
#[derive(Debug)]
pub struct LoadedFont {
    font: Font,
    family: String,
}

impl LoadedFont {
    /// Load an explicit font file
    pub fn from_path(path: &Path) -> Result<Self, FontError> {
        let bytes = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let family = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("custom")
            .to_string();
        Self::from_bytes(bytes, 0, family)
    }

    /// Find a face through the system font database
    pub fn discover(family: &str) -> Result<Self, FontError> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let query = fontdb::Query {
            families: &[fontdb::Family::Name(family), fontdb::Family::SansSerif],
            ..fontdb::Query::default()
        };
        let id = db
            .query(&query)
            .ok_or_else(|| FontError::NotFound(family.to_string()))?;
        let (source, index) = db
            .face_source(id)
            .ok_or_else(|| FontError::NotFound(family.to_string()))?;

        let bytes = match source {
            fontdb::Source::Binary(data) | fontdb::Source::SharedFile(_, data) => {
                data.as_ref().as_ref().to_vec()
            }
            fontdb::Source::File(path) => std::fs::read(&path).map_err(|source| FontError::Io {
                path: path.clone(),
                source,
            })?,
        };

        Self::from_bytes(bytes, index, family.to_string())
    }

    fn from_bytes(bytes: Vec<u8>, collection_index: u32, family: String) -> Result<Self, FontError> {
        let settings = FontSettings {
            collection_index,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(bytes, settings).map_err(|e| FontError::Parse(e.to_string()))?;
        Ok(Self { font, family })
    }

    /// Resolve per config: explicit path wins over family lookup
    pub fn resolve(config: &FontConfig) -> Result<Self, FontError> {
        match &config.path {
            Some(path) => Self::from_path(path),
            None => Self::discover(&config.family),
        }
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Baseline y that vertically centers a line box on `y`
    pub fn centered_baseline(&self, y: f32, font_size: f32) -> f32 {
        match self.font.horizontal_line_metrics(font_size) {
            // descent is negative, so this lands between ascent and descent
            Some(metrics) => y + (metrics.ascent + metrics.descent) / 2.0,
            None => y + font_size * 0.35,
        }
    }
}

impl Measure for LoadedFont {
    fn width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.font.metrics(ch, font_size).advance_width)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_file_is_an_io_error() {
        let err = LoadedFont::from_path(Path::new("/nonexistent/cairo.ttf")).unwrap_err();
        assert!(matches!(err, FontError::Io { .. }));
    }

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();
        let err = LoadedFont::from_path(&path).unwrap_err();
        assert!(matches!(err, FontError::Parse(_)));
    }
}
