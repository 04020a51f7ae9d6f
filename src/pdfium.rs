//! Runtime binding to the pdfium shared library.
//!
//! Lookup order:
//! 1. `PDFIUM_LIB_PATH`: explicit path to `libpdfium.{so,dylib}` / `pdfium.dll`
//! 2. the platform library name in the working directory
//! 3. the system library search path

use crate::error::PdfTranslateError;
use pdfium_render::prelude::Pdfium;
use std::path::PathBuf;
use tracing::debug;

/// Environment variable pointing at an existing pdfium library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to pdfium, returning an error instead of panicking when no library is found.
pub fn bind_pdfium() -> Result<Pdfium, PdfTranslateError> {
    if let Ok(env_path) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        let lib_path = PathBuf::from(env_path);
        if lib_path.exists() {
            debug!("Binding pdfium from {}", lib_path.display());
            return Pdfium::bind_to_library(&lib_path)
                .map(Pdfium::new)
                .map_err(|e| {
                    PdfTranslateError::PdfiumBindingFailed(format!(
                        "{}: {:?}",
                        lib_path.display(),
                        e
                    ))
                });
        }
    }

    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| PdfTranslateError::PdfiumBindingFailed(format!("{:?}", e)))
}
