//! Overlay rendering: paint translated words over a page image.
//!
//! For every word a fixed-size opaque box is painted at a horizontally
//! mirrored position and the translated text is drawn inside it:
//!
//! ```text
//! x_position = image_width - (x_min + box_width)
//! y_position = y_min
//! ```
//!
//! Mirroring the left edge of the source word around the page's vertical
//! centre approximates right-to-left placement. The box never grows to fit the
//! text and the font never shrinks, so long translations overflow the box, and
//! words near the left edge produce a negative `x_position` that the canvas
//! clips.
//!
//! Overlays are written to a separate directory under the source image's file
//! name; the source image is never modified.

use crate::config::{FontSource, OverlayStyle, MAX_BOX_DIMENSION};
use crate::error::PdfTranslateError;
use crate::pipeline::ocr::BoundingQuad;
use crate::pipeline::translate::TranslatedWord;
use ab_glyph::{Font, FontArc, PxScale};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// DejaVu Sans, bundled so the default font covers right-to-left scripts.
static EMBEDDED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Load the overlay font.
pub fn load_font(source: &FontSource) -> Result<FontArc, PdfTranslateError> {
    match source {
        FontSource::Embedded => {
            FontArc::try_from_slice(EMBEDDED_FONT).map_err(|e| PdfTranslateError::FontLoad {
                source_name: "embedded DejaVu Sans".into(),
                detail: e.to_string(),
            })
        }
        FontSource::File(path) => {
            let bytes = std::fs::read(path).map_err(|e| PdfTranslateError::FontLoad {
                source_name: path.display().to_string(),
                detail: e.to_string(),
            })?;
            FontArc::try_from_vec(bytes).map_err(|e| PdfTranslateError::FontLoad {
                source_name: path.display().to_string(),
                detail: e.to_string(),
            })
        }
    }
}

/// Top-left corner of the box for a word on an image `image_width` pixels wide.
///
/// Returns `None` when the box's left or right edge does not fit in an `i32`.
pub fn box_origin(image_width: u32, quad: &BoundingQuad, box_width: u32) -> Option<(i32, i32)> {
    let x_position =
        i64::from(image_width) - (i64::from(quad.min_x()) + i64::from(box_width));
    let x_position = i32::try_from(x_position).ok()?;
    x_position.checked_add(i32::try_from(box_width).ok()?)?;
    Some((x_position, quad.min_y()))
}

/// Pixel scale giving an em square of `pt` pixels, the way desktop imaging
/// libraries interpret a TrueType "size".
fn px_scale_for(font: &FontArc, pt: f32) -> PxScale {
    match font.units_per_em() {
        Some(upem) if upem > 0.0 => PxScale::from(pt * font.height_unscaled() / upem),
        _ => PxScale::from(pt),
    }
}

/// Paint boxes and translated text onto a copy of `image`.
///
/// The returned canvas always has the dimensions of `image`.
pub fn draw_overlay(
    image: &DynamicImage,
    words: &[TranslatedWord],
    style: &OverlayStyle,
    font: &FontArc,
) -> RgbaImage {
    let mut canvas = image.to_rgba8();
    let (width, height) = canvas.dimensions();
    let scale = px_scale_for(font, style.font_size);
    let box_color = Rgba(style.box_color);
    let text_color = Rgba(style.text_color);

    for word in words {
        let origin = box_origin(width, &word.source_quad, style.box_width)
            .filter(|_| style.box_height <= MAX_BOX_DIMENSION);
        let Some((x, y)) = origin else {
            warn!(
                "Box for '{}' cannot be placed on the {}x{} canvas; skipped",
                word.translated_text, width, height
            );
            continue;
        };

        let (left, top) = (i64::from(x), i64::from(y));
        let right = left + i64::from(style.box_width);
        let bottom = top + i64::from(style.box_height);

        // Text runs right and down from the origin, so nothing would be visible.
        if left >= i64::from(width) || top >= i64::from(height) {
            warn!(
                "Box for '{}' at ({}, {}) lies past the {}x{} canvas; skipped",
                word.translated_text, x, y, width, height
            );
            continue;
        }
        if left < 0 || top < 0 || right > i64::from(width) || bottom > i64::from(height) {
            warn!(
                "Box for '{}' at ({}, {}) extends past the {}x{} canvas",
                word.translated_text, x, y, width, height
            );
        }

        draw_filled_rect_mut(
            &mut canvas,
            Rect::at(x, y).of_size(style.box_width, style.box_height),
            box_color,
        );
        draw_text_mut(
            &mut canvas,
            text_color,
            x,
            y,
            scale,
            font,
            &word.translated_text,
        );
    }

    canvas
}

/// Where the overlay for `source` goes: same file name, inside `translated_dir`.
pub fn translated_path(source: &Path, translated_dir: &Path) -> Result<PathBuf, PdfTranslateError> {
    let file_name = source.file_name().ok_or_else(|| {
        PdfTranslateError::Internal(format!(
            "Page image path has no file name: {}",
            source.display()
        ))
    })?;
    let dest = translated_dir.join(file_name);
    if dest == source {
        return Err(PdfTranslateError::Internal(format!(
            "Overlay would overwrite its source image: {}",
            source.display()
        )));
    }
    Ok(dest)
}

/// Read `source`, draw the overlay, and write it next to its siblings in
/// `translated_dir`. Returns the overlay path and its dimensions.
pub fn overlay_page_blocking(
    source: &Path,
    translated_dir: &Path,
    words: &[TranslatedWord],
    style: &OverlayStyle,
    font: &FontArc,
) -> Result<(PathBuf, (u32, u32)), PdfTranslateError> {
    let dest = translated_path(source, translated_dir)?;

    let image = image::open(source).map_err(|e| PdfTranslateError::ImageIo {
        path: source.to_path_buf(),
        detail: e.to_string(),
    })?;

    let canvas = draw_overlay(&image, words, style, font);
    let dims = canvas.dimensions();

    canvas
        .save_with_format(&dest, ImageFormat::Png)
        .map_err(|e| PdfTranslateError::ImageIo {
            path: dest.clone(),
            detail: e.to_string(),
        })?;

    debug!(
        "Overlay with {} words → {} ({}x{})",
        words.len(),
        dest.display(),
        dims.0,
        dims.1
    );
    Ok((dest, dims))
}

/// Async wrapper around [`overlay_page_blocking`]; drawing runs on the blocking pool.
pub async fn overlay_page(
    source: &Path,
    translated_dir: &Path,
    words: Vec<TranslatedWord>,
    style: &OverlayStyle,
    font: &FontArc,
) -> Result<(PathBuf, (u32, u32)), PdfTranslateError> {
    let source = source.to_path_buf();
    let translated_dir = translated_dir.to_path_buf();
    let style = style.clone();
    let font = font.clone();

    tokio::task::spawn_blocking(move || {
        overlay_page_blocking(&source, &translated_dir, &words, &style, &font)
    })
    .await
    .map_err(|e| PdfTranslateError::Internal(format!("Overlay task panicked: {}", e)))?
}
