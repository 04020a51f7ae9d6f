//! Pipeline stages for PDF translation.
//!
//! Each submodule implements exactly one transformation step and can be
//! driven on its own in tests.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ rasterize ──▶ ocr ──▶ translate ──▶ overlay ──▶ assemble
//! (path)     (pdfium)     (words)  (reversed)   (boxes+text) (pdfium)
//! ```
//!
//! 1. [`input`]     validate the path and `%PDF` magic
//! 2. [`rasterize`] render every page to PNG; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 3. [`ocr`]       detect words, dropping the whole-image annotation
//! 4. [`translate`] one request per word, result reversed for RTL display
//! 5. [`overlay`]   paint a box and the translation over each word
//! 6. [`assemble`]  one PDF page per overlay image

pub mod assemble;
pub mod input;
pub mod ocr;
pub mod overlay;
pub mod rasterize;
pub mod translate;
