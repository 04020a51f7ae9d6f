//! Whole-document translation entry points.
//!
//! A run validates the input, rasterises every page, then walks the pages one
//! at a time: OCR, per-word translation, overlay. Once every page has an
//! overlay image the output PDF is assembled. Any failure aborts the run and
//! no output is written.
//!
//! Both scratch directories (rasterised pages and overlay images) are owned by
//! this scope and are removed however the run ends.

use crate::config::TranslateConfig;
use crate::error::PdfTranslateError;
use crate::output::{PageSummary, TranslationOutput, TranslationStats};
use crate::pipeline::ocr::{self, OcrProvider};
use crate::pipeline::rasterize::{self, RasterizedDocument};
use crate::pipeline::translate::{self as words, Translator};
use crate::pipeline::{assemble, input, overlay};
use crate::providers::{
    GoogleAuth, GoogleTranslate, GoogleVisionOcr, GOOGLE_ACCESS_TOKEN_ENV, GOOGLE_API_KEY_ENV,
};
use ab_glyph::FontArc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Prefix of the scratch directory holding overlay images.
pub const TRANSLATED_DIR_PREFIX: &str = "pdf-translate-translated-";

/// Translate a PDF and write the overlaid copy to `output`.
///
/// This is the primary entry point for the library. `output` is overwritten
/// if it exists.
///
/// # Errors
/// Every failure is fatal: a bad input file, an unusable font, a missing
/// service configuration, a single failed OCR or translation request, or an
/// assembly/write failure. On error `output` is left as it was.
pub async fn translate_pdf(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &TranslateConfig,
) -> Result<TranslationOutput, PdfTranslateError> {
    let total_start = Instant::now();
    let pdf_path = input::resolve_input(input)?;
    info!("Starting translation: {}", pdf_path.display());

    let services = Services::resolve(config)?;

    let render_start = Instant::now();
    let document = rasterize::rasterize(&pdf_path, config).await?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    info!(
        "Rasterised {} pages in {}ms",
        document.len(),
        render_duration_ms
    );

    run(
        document,
        output.as_ref(),
        config,
        &services,
        render_duration_ms,
        total_start,
    )
    .await
}

/// Run OCR, translation, overlay and assembly on pages that are already
/// rasterised.
///
/// Takes ownership of `document`; its scratch directory is removed when the
/// call returns.
pub async fn translate_rasterized(
    document: RasterizedDocument,
    output: impl AsRef<Path>,
    config: &TranslateConfig,
) -> Result<TranslationOutput, PdfTranslateError> {
    let total_start = Instant::now();
    let services = Services::resolve(config)?;
    run(document, output.as_ref(), config, &services, 0, total_start).await
}

/// Synchronous wrapper around [`translate_pdf`].
///
/// Creates a temporary tokio runtime internally.
pub fn translate_pdf_sync(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &TranslateConfig,
) -> Result<TranslationOutput, PdfTranslateError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| PdfTranslateError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(translate_pdf(input, output, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Capabilities and resources needed to process pages.
struct Services {
    ocr: Arc<dyn OcrProvider>,
    translator: Arc<dyn Translator>,
    font: FontArc,
}

impl Services {
    fn resolve(config: &TranslateConfig) -> Result<Self, PdfTranslateError> {
        let ocr = resolve_ocr(config)?;
        let translator = resolve_translator(config)?;
        let font = overlay::load_font(&config.style.font)?;
        debug!(
            "Using OCR '{}' and translator '{}'",
            ocr.name(),
            translator.name()
        );
        Ok(Self {
            ocr,
            translator,
            font,
        })
    }
}

/// Resolve credentials for the built-in Google providers.
///
/// 1. `config.api_key`
/// 2. `GOOGLE_API_KEY`
/// 3. `GOOGLE_ACCESS_TOKEN` (bearer)
fn resolve_auth(config: &TranslateConfig, service: &str) -> Result<GoogleAuth, PdfTranslateError> {
    if let Some(key) = config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        return Ok(GoogleAuth::ApiKey(key.to_string()));
    }

    GoogleAuth::from_env().ok_or_else(|| PdfTranslateError::ServiceNotConfigured {
        service: service.to_string(),
        hint: format!(
            "No credentials found.\n\
            Set {GOOGLE_API_KEY_ENV} or {GOOGLE_ACCESS_TOKEN_ENV}, pass --api-key, \
            or supply a provider in TranslateConfig."
        ),
    })
}

/// A provider in the config wins over anything built from credentials.
fn resolve_ocr(config: &TranslateConfig) -> Result<Arc<dyn OcrProvider>, PdfTranslateError> {
    if let Some(ref provider) = config.ocr {
        return Ok(Arc::clone(provider));
    }

    let auth = resolve_auth(config, "OCR")?;
    let provider = GoogleVisionOcr::new(auth, config.request_timeout_secs).map_err(|e| {
        PdfTranslateError::ServiceNotConfigured {
            service: "OCR".into(),
            hint: e.to_string(),
        }
    })?;
    Ok(Arc::new(provider))
}

fn resolve_translator(config: &TranslateConfig) -> Result<Arc<dyn Translator>, PdfTranslateError> {
    if let Some(ref translator) = config.translator {
        return Ok(Arc::clone(translator));
    }

    let auth = resolve_auth(config, "Translation")?;
    let translator = GoogleTranslate::new(auth, config.request_timeout_secs).map_err(|e| {
        PdfTranslateError::ServiceNotConfigured {
            service: "Translation".into(),
            hint: e.to_string(),
        }
    })?;
    Ok(Arc::new(translator))
}

async fn run(
    document: RasterizedDocument,
    output: &Path,
    config: &TranslateConfig,
    services: &Services,
    render_duration_ms: u64,
    total_start: Instant,
) -> Result<TranslationOutput, PdfTranslateError> {
    if document.is_empty() {
        return Err(PdfTranslateError::AssemblyFailed {
            detail: "document has no pages".into(),
        });
    }

    let translated_dir =
        rasterize::scratch_dir(config.scratch_root.as_deref(), TRANSLATED_DIR_PREFIX)?;

    let translate_start = Instant::now();
    let (overlays, pages) =
        translate_pages(&document, translated_dir.path(), config, services).await?;
    let translate_duration_ms = translate_start.elapsed().as_millis() as u64;

    assemble::assemble(&overlays, output).await?;

    close_scratch(translated_dir);
    close_scratch(document.into_dir());

    if let Some(ref cb) = config.progress_callback {
        cb.on_document_complete(pages.len());
    }

    let stats = TranslationStats::from_pages(
        &pages,
        render_duration_ms,
        translate_duration_ms,
        total_start.elapsed().as_millis() as u64,
    );
    info!(
        "Translation complete: {} pages, {} words, {}ms total",
        stats.total_pages, stats.total_words, stats.total_duration_ms
    );

    Ok(TranslationOutput {
        output_path: output.to_path_buf(),
        pages,
        stats,
    })
}

/// Process every page in order, writing overlays into `translated_dir`.
///
/// Returns the overlay paths (page order) and one summary per page.
async fn translate_pages(
    document: &RasterizedDocument,
    translated_dir: &Path,
    config: &TranslateConfig,
    services: &Services,
) -> Result<(Vec<PathBuf>, Vec<PageSummary>), PdfTranslateError> {
    let total_pages = document.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_document_start(total_pages);
    }

    let mut overlays = Vec::with_capacity(total_pages);
    let mut pages = Vec::with_capacity(total_pages);

    for (idx, source) in document.pages().iter().enumerate() {
        let page_num = idx + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, total_pages);
        }

        let page_start = Instant::now();
        match process_page(page_num, source, translated_dir, config, services).await {
            Ok((path, (width, height), words_translated)) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_complete(page_num, total_pages, words_translated);
                }
                overlays.push(path);
                pages.push(PageSummary {
                    page_num,
                    width,
                    height,
                    words_translated,
                    duration_ms: page_start.elapsed().as_millis() as u64,
                });
            }
            Err(e) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_error(page_num, total_pages, e.to_string());
                }
                return Err(e);
            }
        }
    }

    Ok((overlays, pages))
}

async fn process_page(
    page_num: usize,
    source: &Path,
    translated_dir: &Path,
    config: &TranslateConfig,
    services: &Services,
) -> Result<(PathBuf, (u32, u32), usize), PdfTranslateError> {
    let detected = ocr::extract_words(services.ocr.as_ref(), page_num, source).await?;
    let translated = words::translate_words(
        services.translator.as_ref(),
        page_num,
        &detected,
        &config.target_language,
    )
    .await?;

    let count = translated.len();
    let (path, dims) =
        overlay::overlay_page(source, translated_dir, translated, &config.style, &services.font)
            .await?;
    Ok((path, dims, count))
}

/// Remove a scratch directory now, logging instead of failing the run.
fn close_scratch(dir: TempDir) {
    let path = dir.path().to_path_buf();
    if let Err(e) = dir.close() {
        warn!("Failed to remove scratch directory {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ocr::tests::{hello_annotations, FailingOcr, StubOcr};
    use crate::pipeline::translate::tests::FixedTranslator;
    use crate::progress::TranslationProgressCallback;
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl TranslationProgressCallback for Recorder {
        fn on_document_start(&self, total_pages: usize) {
            self.events.lock().unwrap().push(format!("doc:{total_pages}"));
        }
        fn on_page_start(&self, page_num: usize, _total: usize) {
            self.events.lock().unwrap().push(format!("start:{page_num}"));
        }
        fn on_page_complete(&self, page_num: usize, _total: usize, words: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done:{page_num}:{words}"));
        }
        fn on_page_error(&self, page_num: usize, _total: usize, _error: String) {
            self.events.lock().unwrap().push(format!("error:{page_num}"));
        }
    }

    fn grey_pages(sizes: &[(u32, u32)]) -> Vec<DynamicImage> {
        sizes
            .iter()
            .map(|&(w, h)| {
                DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([128, 128, 128, 255])))
            })
            .collect()
    }

    fn stub_config(
        root: &Path,
        ocr: Arc<dyn OcrProvider>,
        translator: Arc<dyn Translator>,
        recorder: Arc<Recorder>,
    ) -> TranslateConfig {
        TranslateConfig::builder()
            .scratch_root(root)
            .ocr(ocr)
            .translator(translator)
            .progress_callback(recorder)
            .build()
            .unwrap()
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn pages_are_processed_in_order_into_the_translated_dir() {
        let root = tempfile::tempdir().unwrap();
        let recorder = Arc::new(Recorder::default());
        let config = stub_config(
            root.path(),
            Arc::new(StubOcr::new(hello_annotations())),
            Arc::new(FixedTranslator::new("abcde")),
            Arc::clone(&recorder),
        );
        let services = Services::resolve(&config).unwrap();

        let document =
            RasterizedDocument::from_images(&grey_pages(&[(200, 100), (300, 150)]), Some(root.path()))
                .unwrap();
        let translated = tempfile::tempdir_in(root.path()).unwrap();

        let (overlays, pages) = translate_pages(&document, translated.path(), &config, &services)
            .await
            .unwrap();

        assert_eq!(overlays.len(), 2);
        for (idx, path) in overlays.iter().enumerate() {
            assert_eq!(path.parent(), Some(translated.path()));
            assert_eq!(path.file_name(), document.pages()[idx].file_name());
            assert_ne!(path, &document.pages()[idx]);
        }
        assert_eq!((pages[0].width, pages[0].height), (200, 100));
        assert_eq!((pages[1].width, pages[1].height), (300, 150));
        assert!(pages.iter().all(|p| p.words_translated == 1));

        // HELLO at x_min 10 on a 200px page: box spans x 140..190, y 10..25.
        let first = image::open(&overlays[0]).unwrap().to_rgba8();
        assert_eq!(first.get_pixel(189, 24), &Rgba([255, 255, 255, 255]));
        assert_eq!(first.get_pixel(139, 24), &Rgba([128, 128, 128, 255]));

        assert_eq!(
            *recorder.events.lock().unwrap(),
            ["doc:2", "start:1", "done:1:1", "start:2", "done:2:1"]
        );
    }

    #[tokio::test]
    async fn reversed_translation_is_what_reaches_the_page() {
        let root = tempfile::tempdir().unwrap();
        let config = stub_config(
            root.path(),
            Arc::new(StubOcr::new(hello_annotations())),
            Arc::new(FixedTranslator::new("abcde")),
            Arc::new(Recorder::default()),
        );
        let services = Services::resolve(&config).unwrap();

        let pages = grey_pages(&[(200, 100)]);
        let document = RasterizedDocument::from_images(&pages, Some(root.path())).unwrap();
        let translated = tempfile::tempdir_in(root.path()).unwrap();

        let (overlays, _) = translate_pages(&document, translated.path(), &config, &services)
            .await
            .unwrap();
        let written = image::open(&overlays[0]).unwrap().to_rgba8();

        let drawn = |text: &str| {
            let word = words::TranslatedWord {
                translated_text: text.to_string(),
                source_quad: hello_annotations()[1].bounding_quad,
            };
            overlay::draw_overlay(&pages[0], &[word], &config.style, &services.font)
        };
        assert!(written == drawn("edcba"), "page should carry the reversed text");
        assert!(written != drawn("abcde"), "page must not carry the raw translation");
    }

    #[tokio::test]
    async fn ocr_failure_removes_all_scratch_dirs() {
        let root = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("out.pdf");
        let recorder = Arc::new(Recorder::default());
        let config = stub_config(
            root.path(),
            Arc::new(FailingOcr),
            Arc::new(FixedTranslator::new("x")),
            Arc::clone(&recorder),
        );

        let document =
            RasterizedDocument::from_images(&grey_pages(&[(50, 50), (50, 50)]), Some(root.path()))
                .unwrap();
        assert_eq!(entries(root.path()), 1);

        let err = translate_rasterized(document, &output, &config)
            .await
            .unwrap_err();

        assert!(matches!(err, PdfTranslateError::Ocr { page: 1, .. }));
        assert_eq!(entries(root.path()), 0, "scratch dirs left behind");
        assert!(!output.exists());
        assert_eq!(
            *recorder.events.lock().unwrap(),
            ["doc:2", "start:1", "error:1"]
        );
    }

    #[tokio::test]
    async fn translation_failure_on_a_later_page_aborts_the_run() {
        struct FailSecondCall(Mutex<usize>);

        #[async_trait::async_trait]
        impl Translator for FailSecondCall {
            fn name(&self) -> &str {
                "fail-second"
            }
            async fn translate(
                &self,
                _text: &str,
                _target: &str,
            ) -> Result<String, crate::error::ServiceError> {
                let mut n = self.0.lock().unwrap();
                *n += 1;
                if *n == 2 {
                    Err(crate::error::ServiceError::Other("quota exceeded".into()))
                } else {
                    Ok("ok".into())
                }
            }
        }

        let root = tempfile::tempdir().unwrap();
        let output = root.path().join("never.pdf");
        let scratch = root.path().join("scratch");
        std::fs::create_dir(&scratch).unwrap();
        let recorder = Arc::new(Recorder::default());
        let config = stub_config(
            &scratch,
            Arc::new(StubOcr::new(hello_annotations())),
            Arc::new(FailSecondCall(Mutex::new(0))),
            Arc::clone(&recorder),
        );

        let document =
            RasterizedDocument::from_images(&grey_pages(&[(80, 40), (80, 40)]), Some(&scratch))
                .unwrap();
        let err = translate_rasterized(document, &output, &config)
            .await
            .unwrap_err();

        match err {
            PdfTranslateError::Translation { page, word, .. } => {
                assert_eq!(page, 2);
                assert_eq!(word, "HELLO");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(entries(&scratch), 0);
        assert!(!output.exists());
        assert_eq!(
            recorder.events.lock().unwrap().last().map(String::as_str),
            Some("error:2")
        );
    }

    #[tokio::test]
    async fn empty_document_is_rejected_and_cleaned_up() {
        let root = tempfile::tempdir().unwrap();
        let config = stub_config(
            root.path(),
            Arc::new(StubOcr::new(Vec::new())),
            Arc::new(FixedTranslator::new("x")),
            Arc::new(Recorder::default()),
        );
        let document = RasterizedDocument::from_images(&[], Some(root.path())).unwrap();

        let err = translate_rasterized(document, root.path().join("out.pdf"), &config)
            .await
            .unwrap_err();

        assert!(matches!(err, PdfTranslateError::AssemblyFailed { .. }));
        assert_eq!(entries(root.path()), 0);
    }

    #[test]
    fn configured_providers_take_precedence_over_credentials() {
        let config = TranslateConfig::builder()
            .api_key("AIza-test")
            .ocr(Arc::new(StubOcr::new(Vec::new())))
            .build()
            .unwrap();

        assert_eq!(resolve_ocr(&config).unwrap().name(), "stub-ocr");
        assert_eq!(resolve_translator(&config).unwrap().name(), "google-translate");
    }

    #[test]
    fn config_api_key_builds_google_providers() {
        let config = TranslateConfig::builder()
            .api_key("AIza-test")
            .request_timeout_secs(5)
            .build()
            .unwrap();
        assert_eq!(resolve_ocr(&config).unwrap().name(), "google-vision");
        assert_eq!(
            resolve_auth(&config, "OCR").unwrap(),
            GoogleAuth::ApiKey("AIza-test".into())
        );
    }

    #[test]
    fn missing_credentials_are_reported() {
        if GoogleAuth::from_env().is_some() {
            eprintln!("Google credentials present in the environment; skipping");
            return;
        }
        let config = TranslateConfig::default();
        let err = resolve_ocr(&config).err().unwrap();
        match err {
            PdfTranslateError::ServiceNotConfigured { service, hint } => {
                assert_eq!(service, "OCR");
                assert!(hint.contains(GOOGLE_API_KEY_ENV));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_input_fails_before_anything_else() {
        let root = tempfile::tempdir().unwrap();
        let config = TranslateConfig::builder()
            .scratch_root(root.path())
            .build()
            .unwrap();
        let err = translate_pdf("/no/such/input.pdf", root.path().join("o.pdf"), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, PdfTranslateError::FileNotFound { .. }));
        assert_eq!(entries(root.path()), 0);
    }
}
