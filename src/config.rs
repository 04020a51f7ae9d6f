//! Configuration types for PDF translation.
//!
//! All run behaviour is controlled through [`TranslateConfig`], built via its
//! [`TranslateConfigBuilder`]. The drawing tunables (font size, box size,
//! colours, font) live in the nested [`OverlayStyle`] so the overlay stage can
//! be driven on its own in tests.

use crate::error::PdfTranslateError;
use crate::pipeline::ocr::OcrProvider;
use crate::pipeline::translate::Translator;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default target language (ISO-639-1). Hebrew, a right-to-left script.
pub const DEFAULT_TARGET_LANGUAGE: &str = "he";

/// Default output path, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "translated_output.pdf";

/// Largest box width or height, in pixels. Box coordinates are signed 32-bit.
pub const MAX_BOX_DIMENSION: u32 = i32::MAX as u32;

/// Where the overlay font comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontSource {
    /// DejaVu Sans, compiled into the binary. Covers Latin, Hebrew, Arabic,
    /// Cyrillic and Greek.
    #[default]
    Embedded,
    /// A TrueType/OpenType file on disk.
    File(PathBuf),
}

/// Drawing parameters for the overlay stage.
///
/// The box has a fixed size and does not adapt to the translated text: long
/// translations overflow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    /// Font size in points. Default: 10.
    pub font_size: f32,
    /// Width of the opaque box painted over each word, in pixels. Default: 50.
    pub box_width: u32,
    /// Height of the opaque box, in pixels. Default: 15.
    pub box_height: u32,
    /// RGBA fill of the box. Default: opaque white.
    pub box_color: [u8; 4],
    /// RGBA colour of the translated text. Default: opaque black.
    pub text_color: [u8; 4],
    /// Font used for the translated text.
    pub font: FontSource,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            box_width: 50,
            box_height: 15,
            box_color: [255, 255, 255, 255],
            text_color: [0, 0, 0, 255],
            font: FontSource::Embedded,
        }
    }
}

/// Configuration for a PDF translation run.
///
/// Built via [`TranslateConfig::builder()`] or using
/// [`TranslateConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_pdf_translate::TranslateConfig;
///
/// let config = TranslateConfig::builder()
///     .target_language("ar")
///     .font_size(12.0)
///     .box_size(60, 18)
///     .build()
///     .unwrap();
/// assert_eq!(config.style.box_width, 60);
/// ```
#[derive(Clone)]
pub struct TranslateConfig {
    /// Target language code passed to the translation service. Default: `"he"`.
    pub target_language: String,

    /// Rasterisation scale relative to the PDF's 72 DPI user space.
    /// Range: 0.1–8.0. Default: 1.0 (one pixel per point).
    pub render_scale: f32,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Directory under which scratch directories are created.
    /// If None, the system temp directory is used.
    pub scratch_root: Option<PathBuf>,

    /// Overlay drawing parameters.
    pub style: OverlayStyle,

    /// Google Cloud API key used by the built-in providers.
    /// If None, `GOOGLE_API_KEY` / `GOOGLE_ACCESS_TOKEN` are read from the environment.
    pub api_key: Option<String>,

    /// Per-request timeout for the built-in HTTP providers, in seconds.
    /// Default: None (requests may block indefinitely).
    pub request_timeout_secs: Option<u64>,

    /// Pre-constructed OCR provider. Takes precedence over `api_key`.
    pub ocr: Option<Arc<dyn OcrProvider>>,

    /// Pre-constructed translator. Takes precedence over `api_key`.
    pub translator: Option<Arc<dyn Translator>>,

    /// Per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            render_scale: 1.0,
            password: None,
            scratch_root: None,
            style: OverlayStyle::default(),
            api_key: None,
            request_timeout_secs: None,
            ocr: None,
            translator: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for TranslateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslateConfig")
            .field("target_language", &self.target_language)
            .field("render_scale", &self.render_scale)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("scratch_root", &self.scratch_root)
            .field("style", &self.style)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("ocr", &self.ocr.as_ref().map(|p| p.name().to_string()))
            .field(
                "translator",
                &self.translator.as_ref().map(|t| t.name().to_string()),
            )
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl TranslateConfig {
    /// Create a new builder for `TranslateConfig`.
    pub fn builder() -> TranslateConfigBuilder {
        TranslateConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`TranslateConfig`].
#[derive(Debug)]
pub struct TranslateConfigBuilder {
    config: TranslateConfig,
}

impl TranslateConfigBuilder {
    pub fn target_language(mut self, lang: impl Into<String>) -> Self {
        self.config.target_language = lang.into();
        self
    }

    pub fn render_scale(mut self, scale: f32) -> Self {
        self.config.render_scale = scale;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn scratch_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.scratch_root = Some(dir.into());
        self
    }

    pub fn style(mut self, style: OverlayStyle) -> Self {
        self.config.style = style;
        self
    }

    pub fn font_size(mut self, pt: f32) -> Self {
        self.config.style.font_size = pt;
        self
    }

    pub fn box_size(mut self, width: u32, height: u32) -> Self {
        self.config.style.box_width = width;
        self.config.style.box_height = height;
        self
    }

    pub fn font(mut self, font: FontSource) -> Self {
        self.config.style.font = font;
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn ocr(mut self, provider: Arc<dyn OcrProvider>) -> Self {
        self.config.ocr = Some(provider);
        self
    }

    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.config.translator = Some(translator);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<TranslateConfig, PdfTranslateError> {
        let c = &self.config;
        if c.target_language.trim().is_empty() {
            return Err(PdfTranslateError::InvalidConfig(
                "Target language must not be empty".into(),
            ));
        }
        if !(0.1..=8.0).contains(&c.render_scale) {
            return Err(PdfTranslateError::InvalidConfig(format!(
                "Render scale must be 0.1–8.0, got {}",
                c.render_scale
            )));
        }
        if c.style.box_width == 0 || c.style.box_height == 0 {
            return Err(PdfTranslateError::InvalidConfig(format!(
                "Box dimensions must be ≥ 1, got {}x{}",
                c.style.box_width, c.style.box_height
            )));
        }
        if c.style.box_width > MAX_BOX_DIMENSION || c.style.box_height > MAX_BOX_DIMENSION {
            return Err(PdfTranslateError::InvalidConfig(format!(
                "Box dimensions must be ≤ {}, got {}x{}",
                MAX_BOX_DIMENSION, c.style.box_width, c.style.box_height
            )));
        }
        if !c.style.font_size.is_finite() || c.style.font_size <= 0.0 {
            return Err(PdfTranslateError::InvalidConfig(format!(
                "Font size must be > 0, got {}",
                c.style.font_size
            )));
        }
        if c.request_timeout_secs == Some(0) {
            return Err(PdfTranslateError::InvalidConfig(
                "Request timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = TranslateConfig::default();
        assert_eq!(c.target_language, "he");
        assert_eq!(c.render_scale, 1.0);
        assert_eq!(c.style.font_size, 10.0);
        assert_eq!(c.style.box_width, 50);
        assert_eq!(c.style.box_height, 15);
        assert_eq!(c.style.box_color, [255, 255, 255, 255]);
        assert_eq!(c.style.text_color, [0, 0, 0, 255]);
        assert_eq!(c.style.font, FontSource::Embedded);
        assert!(c.request_timeout_secs.is_none());
    }

    #[test]
    fn builder_overrides_style() {
        let c = TranslateConfig::builder()
            .font_size(14.0)
            .box_size(80, 20)
            .font(FontSource::File("fonts/Arial.ttf".into()))
            .build()
            .unwrap();
        assert_eq!(c.style.font_size, 14.0);
        assert_eq!((c.style.box_width, c.style.box_height), (80, 20));
        assert_eq!(c.style.font, FontSource::File("fonts/Arial.ttf".into()));
    }

    #[test]
    fn builder_rejects_zero_box() {
        let err = TranslateConfig::builder().box_size(0, 15).build().unwrap_err();
        assert!(matches!(err, PdfTranslateError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_box_larger_than_signed_range() {
        let err = TranslateConfig::builder()
            .box_size(u32::MAX, 15)
            .build()
            .unwrap_err();
        assert!(matches!(err, PdfTranslateError::InvalidConfig(_)));
        assert!(TranslateConfig::builder()
            .box_size(50, MAX_BOX_DIMENSION + 1)
            .build()
            .is_err());
        assert!(TranslateConfig::builder()
            .box_size(MAX_BOX_DIMENSION, MAX_BOX_DIMENSION)
            .build()
            .is_ok());
    }

    #[test]
    fn builder_rejects_bad_font_size() {
        assert!(TranslateConfig::builder().font_size(0.0).build().is_err());
        assert!(TranslateConfig::builder().font_size(f32::NAN).build().is_err());
    }

    #[test]
    fn builder_rejects_empty_language() {
        assert!(TranslateConfig::builder().target_language("  ").build().is_err());
    }

    #[test]
    fn builder_rejects_out_of_range_scale() {
        assert!(TranslateConfig::builder().render_scale(0.0).build().is_err());
        assert!(TranslateConfig::builder().render_scale(9.0).build().is_err());
        assert!(TranslateConfig::builder().render_scale(2.0).build().is_ok());
    }

    #[test]
    fn debug_redacts_secrets() {
        let c = TranslateConfig::builder()
            .api_key("AIza-secret")
            .password("hunter2")
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("AIza-secret"));
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }
}
