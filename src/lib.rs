//! # edgequake-pdf-translate
//!
//! Translate the words of a PDF in place: each page is rasterised, words are
//! found with OCR, every word is machine-translated, and the translation is
//! painted over the original on an opaque box. The result is a new PDF whose
//! pages are images.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      validate the path and PDF magic bytes
//!  ├─ 2. Rasterise  every page → PNG in a scratch dir (pdfium, spawn_blocking)
//!  ├─ 3. OCR        words + bounding quads per page (Google Vision by default)
//!  ├─ 4. Translate  one request per word, reversed for right-to-left display
//!  ├─ 5. Overlay    white box + translated text at the mirrored x position
//!  └─ 6. Assemble   one page per overlay image, written atomically
//! ```
//!
//! Pages are processed one after the other. Any failure aborts the run; no
//! output is written and both scratch directories are removed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf_translate::{translate_pdf, TranslateConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credentials from GOOGLE_API_KEY or GOOGLE_ACCESS_TOKEN
//!     let config = TranslateConfig::builder().target_language("he").build()?;
//!     let output = translate_pdf("scan.pdf", "translated_output.pdf", &config).await?;
//!     eprintln!(
//!         "{} words on {} pages",
//!         output.stats.total_words, output.stats.total_pages
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Custom backends
//!
//! OCR and translation are the [`OcrProvider`] and [`Translator`] traits.
//! Pass your own implementations through [`TranslateConfigBuilder::ocr`] and
//! [`TranslateConfigBuilder::translator`]; they take precedence over the
//! built-in Google clients.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdftranslate` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! ```toml
//! edgequake-pdf-translate = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pdfium;
pub mod pipeline;
pub mod progress;
pub mod providers;
pub mod translate;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{FontSource, OverlayStyle, TranslateConfig, TranslateConfigBuilder};
pub use error::{PdfTranslateError, ServiceError};
pub use output::{PageSummary, TranslationOutput, TranslationStats};
pub use pipeline::ocr::{BoundingQuad, DetectedWord, OcrProvider, Vertex};
pub use pipeline::rasterize::RasterizedDocument;
pub use pipeline::translate::{TranslatedWord, Translator};
pub use progress::{NoopProgressCallback, ProgressCallback, TranslationProgressCallback};
pub use providers::{GoogleAuth, GoogleTranslate, GoogleVisionOcr};
pub use translate::{translate_pdf, translate_pdf_sync, translate_rasterized};
