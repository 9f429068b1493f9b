//! Drawing snapshot loader
//!
//! Drawings arrive as JSON documents exported by the editor. The loader
//! deserializes them and runs [`Drawing::validate`] so the engine only ever
//! sees snapshots whose preconditions hold.

use std::path::Path;
use thiserror::Error;

use super::schema::{Drawing, DrawingError};

#[derive(Debug, Error)]
pub enum DrawingLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid drawing: {0}")]
    Invalid(#[from] DrawingError),
}

/// Loader for JSON drawing snapshots
pub struct DrawingLoader;

impl DrawingLoader {
    /// Load and validate a drawing from a file
    pub fn load(path: &Path) -> Result<Drawing, DrawingLoadError> {
        let content = std::fs::read_to_string(path)?;
        let drawing = Self::from_json_str(&content)?;
        tracing::debug!(
            "Loaded drawing {} ({} components, {} markers, {} wires)",
            path.display(),
            drawing.components.len(),
            drawing.markers.len(),
            drawing.wires.len()
        );
        Ok(drawing)
    }

    /// Parse and validate a drawing from a JSON string
    pub fn from_json_str(content: &str) -> Result<Drawing, DrawingLoadError> {
        let drawing: Drawing = serde_json::from_str(content)?;
        drawing.validate()?;
        Ok(drawing)
    }

    /// Serialize a drawing back to pretty JSON
    pub fn to_json_string(drawing: &Drawing) -> Result<String, DrawingLoadError> {
        Ok(serde_json::to_string_pretty(drawing)?)
    }
}
