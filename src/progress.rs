//! Progress-callback trait for per-page translation events.
//!
//! Inject an [`Arc<dyn TranslationProgressCallback>`] via
//! [`crate::config::TranslateConfigBuilder::progress_callback`] to receive
//! events as the pipeline works through each page. Pages are processed one at
//! a time, so events always arrive in page order.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf_translate::{TranslateConfig, TranslationProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct WordCounter {
//!     words: AtomicUsize,
//! }
//!
//! impl TranslationProgressCallback for WordCounter {
//!     fn on_page_complete(&self, page_num: usize, total_pages: usize, words: usize) {
//!         self.words.fetch_add(words, Ordering::SeqCst);
//!         eprintln!("Page {}/{}: {} words", page_num, total_pages, words);
//!     }
//! }
//!
//! let config = TranslateConfig::builder()
//!     .progress_callback(Arc::new(WordCounter { words: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the translation pipeline as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait TranslationProgressCallback: Send + Sync {
    /// Called once after rasterisation, before the first page is sent to OCR.
    fn on_document_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before OCR is requested for a page (1-indexed).
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page's overlay image has been written.
    ///
    /// `words` is the number of translated words drawn on the page.
    fn on_page_complete(&self, page_num: usize, total_pages: usize, words: usize) {
        let _ = (page_num, total_pages, words);
    }

    /// Called when a page fails. The run aborts right after this event.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: String) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once after the output document has been written.
    fn on_document_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl TranslationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::TranslateConfig`].
pub type ProgressCallback = Arc<dyn TranslationProgressCallback>;
