//! Input validation: check the user-supplied path before pdfium sees it.
//!
//! pdfium reports a missing file, an unreadable file and a JPEG renamed to
//! `.pdf` with the same opaque load error. Checking existence, permissions and
//! the `%PDF` magic bytes up front gives the caller an actionable message and
//! guarantees no scratch directory is created for an unusable input.

use crate::error::PdfTranslateError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate that `path` exists, is readable, and looks like a PDF.
pub fn resolve_input(path: impl AsRef<Path>) -> Result<PathBuf, PdfTranslateError> {
    let path = path.as_ref().to_path_buf();

    if !path.exists() {
        return Err(PdfTranslateError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(PdfTranslateError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PdfTranslateError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(PdfTranslateError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}
