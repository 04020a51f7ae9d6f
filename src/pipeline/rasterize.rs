//! PDF rasterisation: render every page to a PNG in a fresh scratch directory.
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which is blocking
//! and CPU-bound, so rendering runs inside `tokio::task::spawn_blocking`.
//!
//! The returned [`RasterizedDocument`] owns its scratch directory. Dropping it
//! (normally, on an error path, or while unwinding) deletes the directory and
//! every page image in it.

use crate::config::TranslateConfig;
use crate::error::PdfTranslateError;
use crate::pdfium::bind_pdfium;
use image::{DynamicImage, ImageFormat};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// Prefix of the scratch directory holding rasterised pages.
pub const PAGES_DIR_PREFIX: &str = "pdf-translate-pages-";

/// Ordered page images plus the scratch directory that owns them.
#[derive(Debug)]
pub struct RasterizedDocument {
    pages: Vec<PathBuf>,
    dir: TempDir,
}

impl RasterizedDocument {
    /// Page image paths, in page order.
    pub fn pages(&self) -> &[PathBuf] {
        &self.pages
    }

    /// The scratch directory holding the page images.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Give up the page list and keep only the directory handle.
    pub fn into_dir(self) -> TempDir {
        self.dir
    }

    /// Write already-rendered page images into a new scratch directory.
    ///
    /// Lets the downstream stages run on images that did not come from pdfium.
    pub fn from_images(
        images: &[DynamicImage],
        scratch_root: Option<&Path>,
    ) -> Result<Self, PdfTranslateError> {
        let dir = scratch_dir(scratch_root, PAGES_DIR_PREFIX)?;
        let mut pages = Vec::with_capacity(images.len());
        for (idx, image) in images.iter().enumerate() {
            pages.push(write_page_image(dir.path(), idx + 1, image)?);
        }
        Ok(Self { pages, dir })
    }
}

/// File name of the image for a 1-indexed page.
pub fn page_file_name(page_num: usize) -> String {
    format!("page_{page_num}.png")
}

/// Create a uniquely named scratch directory under `root` (or the system temp dir).
pub(crate) fn scratch_dir(root: Option<&Path>, prefix: &str) -> Result<TempDir, PdfTranslateError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(prefix);
    let dir = match root {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    }
    .map_err(|source| PdfTranslateError::ScratchDir { source })?;
    debug!("Created scratch directory {}", dir.path().display());
    Ok(dir)
}

/// Rasterise every page of a PDF into PNG files.
pub async fn rasterize(
    pdf_path: &Path,
    config: &TranslateConfig,
) -> Result<RasterizedDocument, PdfTranslateError> {
    let path = pdf_path.to_path_buf();
    let scale = config.render_scale;
    let password = config.password.clone();
    let scratch_root = config.scratch_root.clone();

    tokio::task::spawn_blocking(move || {
        rasterize_blocking(&path, scale, password.as_deref(), scratch_root.as_deref())
    })
    .await
    .map_err(|e| PdfTranslateError::Internal(format!("Render task panicked: {}", e)))?
}

/// Blocking implementation of page rendering.
fn rasterize_blocking(
    pdf_path: &Path,
    scale: f32,
    password: Option<&str>,
    scratch_root: Option<&Path>,
) -> Result<RasterizedDocument, PdfTranslateError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                PdfTranslateError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                PdfTranslateError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            PdfTranslateError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })?;

    // Created only once the document is known to be readable.
    let dir = scratch_dir(scratch_root, PAGES_DIR_PREFIX)?;

    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
    let pages = document.pages();
    let mut paths = Vec::with_capacity(pages.len() as usize);

    for (idx, page) in pages.iter().enumerate() {
        let page_num = idx + 1;
        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            PdfTranslateError::RasterisationFailed {
                page: page_num,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            page_num,
            image.width(),
            image.height()
        );
        paths.push(write_page_image(dir.path(), page_num, &image)?);
    }

    info!("Rasterised {} pages into {}", paths.len(), dir.path().display());
    Ok(RasterizedDocument { pages: paths, dir })
}

fn write_page_image(
    dir: &Path,
    page_num: usize,
    image: &DynamicImage,
) -> Result<PathBuf, PdfTranslateError> {
    let path = dir.join(page_file_name(page_num));
    image
        .save_with_format(&path, ImageFormat::Png)
        .map_err(|e| PdfTranslateError::ImageIo {
            path: path.clone(),
            detail: e.to_string(),
        })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn page_file_names_are_one_indexed() {
        assert_eq!(page_file_name(1), "page_1.png");
        assert_eq!(page_file_name(12), "page_12.png");
    }

    #[test]
    fn from_images_writes_pages_in_order() {
        let root = tempfile::tempdir().unwrap();
        let images: Vec<DynamicImage> = [(30, 20), (40, 10), (5, 5)]
            .iter()
            .map(|&(w, h)| DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([9, 9, 9, 255]))))
            .collect();

        let doc = RasterizedDocument::from_images(&images, Some(root.path())).unwrap();
        assert_eq!(doc.len(), 3);
        assert!(doc.dir().starts_with(root.path()));

        for (idx, path) in doc.pages().iter().enumerate() {
            assert_eq!(path.file_name().unwrap().to_str().unwrap(), page_file_name(idx + 1));
            let reread = image::open(path).unwrap();
            assert_eq!(
                (reread.width(), reread.height()),
                (images[idx].width(), images[idx].height())
            );
        }
    }

    #[test]
    fn dropping_document_removes_scratch_dir() {
        let root = tempfile::tempdir().unwrap();
        let img = DynamicImage::ImageRgba8(RgbaImage::new(4, 4));
        let doc = RasterizedDocument::from_images(&[img], Some(root.path())).unwrap();
        let dir = doc.dir().to_path_buf();
        assert!(dir.exists());

        drop(doc);
        assert!(!dir.exists());
    }

    #[test]
    fn scratch_dir_in_missing_root_fails() {
        let err = scratch_dir(Some(Path::new("/definitely/not/here")), PAGES_DIR_PREFIX).unwrap_err();
        assert!(matches!(err, PdfTranslateError::ScratchDir { .. }));
    }
}
