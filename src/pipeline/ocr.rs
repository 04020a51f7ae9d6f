//! Word extraction: page image → OCR annotations → per-word detections.
//!
//! The OCR capability returns every annotation it found. By convention the
//! first one covers the whole image (the full page text as a single block) and
//! the rest are individual words. [`extract_words`] drops that first entry so
//! downstream stages only see words.

use crate::error::{PdfTranslateError, ServiceError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A pixel coordinate in page-image space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

impl Vertex {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Four vertices in the order the OCR service returned them.
///
/// The winding is not normalised: rotated text can start at any corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingQuad {
    pub vertices: [Vertex; 4],
}

impl BoundingQuad {
    pub const fn new(vertices: [Vertex; 4]) -> Self {
        Self { vertices }
    }

    /// Build a quad from `(x, y)` pairs.
    pub fn from_points(points: [(i32, i32); 4]) -> Self {
        Self {
            vertices: points.map(|(x, y)| Vertex::new(x, y)),
        }
    }

    pub fn min_x(&self) -> i32 {
        self.vertices.iter().map(|v| v.x).min().unwrap_or_default()
    }

    pub fn min_y(&self) -> i32 {
        self.vertices.iter().map(|v| v.y).min().unwrap_or_default()
    }
}

/// A text span found by OCR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedWord {
    pub text: String,
    pub bounding_quad: BoundingQuad,
}

/// The OCR capability.
///
/// Implementations return every annotation, including the leading
/// whole-image block.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &str;

    /// Detect text in an encoded image (PNG, JPEG, …).
    async fn detect_text(&self, image_bytes: &[u8]) -> Result<Vec<DetectedWord>, ServiceError>;
}

/// Drop the leading whole-image annotation.
pub fn words_from_annotations(annotations: Vec<DetectedWord>) -> Vec<DetectedWord> {
    annotations.into_iter().skip(1).collect()
}

/// Run OCR on one page image and return its words, in OCR order.
///
/// Service failures are not handled here; they abort the run.
pub async fn extract_words(
    provider: &dyn OcrProvider,
    page_num: usize,
    image_path: &Path,
) -> Result<Vec<DetectedWord>, PdfTranslateError> {
    let bytes = tokio::fs::read(image_path)
        .await
        .map_err(|e| PdfTranslateError::ImageIo {
            path: image_path.to_path_buf(),
            detail: e.to_string(),
        })?;

    let annotations = provider
        .detect_text(&bytes)
        .await
        .map_err(|source| PdfTranslateError::Ocr {
            page: page_num,
            source,
        })?;

    let words = words_from_annotations(annotations);
    debug!(
        "Page {}: {} words detected by {}",
        page_num,
        words.len(),
        provider.name()
    );
    Ok(words)
}
