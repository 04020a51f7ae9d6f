//! Output assembly: one PDF page per overlay image.
//!
//! Each page is sized to its image's pixel dimensions (one pixel per PDF
//! point) and the image is placed over the whole page, so nothing is scaled or
//! cropped. Pages may therefore differ in size from each other.
//!
//! The document is saved to a sibling `*.pdf.tmp` file and renamed over the
//! target, so an existing output is either fully replaced or left untouched.

use crate::error::PdfTranslateError;
use crate::pdfium::bind_pdfium;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Assemble `images` (in order) into a PDF at `output`, overwriting it.
///
/// Returns the number of pages written.
pub async fn assemble(images: &[PathBuf], output: &Path) -> Result<usize, PdfTranslateError> {
    let images = images.to_vec();
    let output = output.to_path_buf();

    tokio::task::spawn_blocking(move || assemble_blocking(&images, &output))
        .await
        .map_err(|e| PdfTranslateError::Internal(format!("Assembly task panicked: {}", e)))?
}

/// Blocking implementation of [`assemble`].
pub fn assemble_blocking(images: &[PathBuf], output: &Path) -> Result<usize, PdfTranslateError> {
    if images.is_empty() {
        return Err(PdfTranslateError::AssemblyFailed {
            detail: "no page images to assemble".into(),
        });
    }

    let pdfium = bind_pdfium()?;
    let mut document = pdfium
        .create_new_pdf()
        .map_err(|e| PdfTranslateError::AssemblyFailed {
            detail: format!("{:?}", e),
        })?;

    for (idx, path) in images.iter().enumerate() {
        let image = image::open(path).map_err(|e| PdfTranslateError::ImageIo {
            path: path.clone(),
            detail: e.to_string(),
        })?;

        let width = PdfPoints::new(image.width() as f32);
        let height = PdfPoints::new(image.height() as f32);

        let mut page = document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::Custom(width, height))
            .map_err(|e| PdfTranslateError::AssemblyFailed {
                detail: format!("page {}: {:?}", idx + 1, e),
            })?;

        page.objects_mut()
            .create_image_object(PdfPoints::ZERO, PdfPoints::ZERO, &image, Some(width), Some(height))
            .map_err(|e| PdfTranslateError::AssemblyFailed {
                detail: format!("page {} image: {:?}", idx + 1, e),
            })?;

        debug!(
            "Added page {} ({}x{} pt) from {}",
            idx + 1,
            image.width(),
            image.height(),
            path.display()
        );
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PdfTranslateError::OutputWriteFailed {
            path: output.to_path_buf(),
            source: e,
        })?;
    }

    let tmp_path = output.with_extension("pdf.tmp");
    if let Err(e) = document.save_to_file(&tmp_path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(PdfTranslateError::AssemblyFailed {
            detail: format!("saving {}: {:?}", tmp_path.display(), e),
        });
    }

    std::fs::rename(&tmp_path, output).map_err(|e| PdfTranslateError::OutputWriteFailed {
        path: output.to_path_buf(),
        source: e,
    })?;

    info!("Wrote {} pages to {}", images.len(), output.display());
    Ok(images.len())
}
