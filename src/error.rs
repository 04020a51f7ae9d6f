//! Error types for the edgequake-pdf-translate library.
//!
//! Two distinct error types reflect two distinct layers:
//!
//! * [`PdfTranslateError`] is **fatal**: the run cannot proceed (bad input
//!   file, corrupt PDF, a service call failed, output could not be written).
//!   Every failure is fatal: there is no per-page isolation, so one failing
//!   OCR or translation call aborts the whole document.
//!
//! * [`ServiceError`] is returned by the OCR and translation capabilities
//!   ([`crate::pipeline::ocr::OcrProvider`],
//!   [`crate::pipeline::translate::Translator`]). The pipeline wraps it into
//!   [`PdfTranslateError::Ocr`] or [`PdfTranslateError::Translation`] with the
//!   page (and word) it failed on.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-pdf-translate library.
#[derive(Debug, Error)]
pub enum PdfTranslateError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── Scratch storage / imaging ─────────────────────────────────────────
    /// A scratch directory could not be created.
    #[error("Failed to create scratch directory: {source}")]
    ScratchDir {
        #[source]
        source: std::io::Error,
    },

    /// A page image could not be read, decoded, or written.
    #[error("Image I/O failed for '{path}': {detail}")]
    ImageIo { path: PathBuf, detail: String },

    /// The overlay font could not be loaded or parsed.
    #[error("Failed to load font '{source_name}': {detail}")]
    FontLoad { source_name: String, detail: String },

    // ── Service errors ────────────────────────────────────────────────────
    /// The OCR capability failed for a page.
    #[error("OCR failed on page {page}: {source}")]
    Ocr {
        page: usize,
        #[source]
        source: ServiceError,
    },

    /// The translation capability failed for a word.
    #[error("Translation of '{word}' on page {page} failed: {source}")]
    Translation {
        page: usize,
        word: String,
        #[source]
        source: ServiceError,
    },

    /// No OCR or translation backend could be resolved.
    #[error("{service} service is not configured.\n{hint}")]
    ServiceNotConfigured { service: String, hint: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// pdfium could not build the output document.
    #[error("Failed to assemble output PDF: {detail}")]
    AssemblyFailed { detail: String },

    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Place libpdfium next to the working directory.\n\
  • Install pdfium system-wide (see https://github.com/bblanchon/pdfium-binaries).\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// An error raised by an OCR or translation backend.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// The request never produced an HTTP response (DNS, TLS, connection reset, timeout).
    #[error("{service}: request failed: {reason}")]
    Http { service: String, reason: String },

    /// The service answered with an error status or an error object.
    #[error("{service}: API error {status}: {message}")]
    Api {
        service: String,
        status: u16,
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("{service}: malformed response: {detail}")]
    MalformedResponse { service: String, detail: String },

    /// Any other backend failure (used by custom providers).
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ocr_error_display_names_page() {
        let e = PdfTranslateError::Ocr {
            page: 3,
            source: ServiceError::Api {
                service: "google-vision".into(),
                status: 403,
                message: "API key not valid".into(),
            },
        };
        let msg = e.to_string();
        assert!(msg.contains("page 3"), "got: {msg}");
        assert!(msg.contains("403"), "got: {msg}");
    }

    #[test]
    fn translation_error_display_names_word() {
        let e = PdfTranslateError::Translation {
            page: 1,
            word: "HELLO".into(),
            source: ServiceError::Other("boom".into()),
        };
        let msg = e.to_string();
        assert!(msg.contains("'HELLO'"));
        assert!(msg.contains("page 1"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn service_not_configured_display() {
        let e = PdfTranslateError::ServiceNotConfigured {
            service: "OCR".into(),
            hint: "Set GOOGLE_API_KEY".into(),
        };
        assert!(e.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn source_chain_is_preserved() {
        use std::error::Error as _;
        let e = PdfTranslateError::Ocr {
            page: 2,
            source: ServiceError::Http {
                service: "google-vision".into(),
                reason: "connection reset".into(),
            },
        };
        let src = e.source().expect("source should be set");
        assert!(src.to_string().contains("connection reset"));
    }
}
