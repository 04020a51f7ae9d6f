//! Result types returned by a translation run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Summary of a completed run. The translated document itself is on disk at
/// [`output_path`](Self::output_path).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationOutput {
    pub output_path: PathBuf,
    /// One entry per page, in page order.
    pub pages: Vec<PageSummary>,
    pub stats: TranslationStats,
}

/// What happened to one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Page width in pixels (and in points in the output document).
    pub width: u32,
    pub height: u32,
    /// Number of translated words drawn on the page.
    pub words_translated: usize,
    /// Wall time spent on OCR, translation and drawing for this page.
    pub duration_ms: u64,
}

/// Aggregate statistics for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationStats {
    pub total_pages: usize,
    pub total_words: usize,
    /// Time spent rasterising the input. Zero when the caller supplied
    /// pre-rendered images.
    pub render_duration_ms: u64,
    /// Time spent in OCR, translation and overlay across all pages.
    pub translate_duration_ms: u64,
    pub total_duration_ms: u64,
}

impl TranslationStats {
    pub(crate) fn from_pages(
        pages: &[PageSummary],
        render_duration_ms: u64,
        translate_duration_ms: u64,
        total_duration_ms: u64,
    ) -> Self {
        Self {
            total_pages: pages.len(),
            total_words: pages.iter().map(|p| p.words_translated).sum(),
            render_duration_ms,
            translate_duration_ms,
            total_duration_ms,
        }
    }
}
