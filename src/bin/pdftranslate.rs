//! CLI binary for edgequake-pdf-translate.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `TranslateConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf_translate::config::{DEFAULT_OUTPUT_PATH, DEFAULT_TARGET_LANGUAGE};
use edgequake_pdf_translate::{
    translate_pdf, FontSource, ProgressCallback, TranslateConfig, TranslationProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Live progress bar plus one log line per page.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Start of the page currently in flight.
    page_started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    /// Spinner until `on_document_start` tells us the page count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Rasterising PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            page_started: Mutex::new(None),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Translating");
        self.bar.reset_eta();
    }

    fn page_elapsed_secs(&self) -> f64 {
        self.page_started
            .lock()
            .ok()
            .and_then(|mut started| started.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl TranslationProgressCallback for CliProgressCallback {
    fn on_document_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Translating {total_pages} pages…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        if let Ok(mut started) = self.page_started.lock() {
            *started = Some(Instant::now());
        }
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, words: usize) {
        let secs = self.page_elapsed_secs();
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {:<10}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{words:>5} words")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: String) {
        let secs = self.page_elapsed_secs();
        let first_line = error.lines().next().unwrap_or_default();
        let msg = if first_line.chars().count() > 80 {
            let head: String = first_line.chars().take(79).collect();
            format!("{head}\u{2026}")
        } else {
            first_line.to_string()
        };

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.abandon();
    }

    fn on_document_complete(&self, total_pages: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages translated",
            green("✔"),
            bold(&total_pages.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Translate the bundled sample into Hebrew
  pdftranslate

  # Translate a scan, writing next to it
  pdftranslate scan.pdf -o scan.he.pdf

  # Arabic, with a larger font and box
  pdftranslate --target-language ar --font-size 12 --box-width 70 --box-height 18 scan.pdf

  # Higher resolution rendering (2 px per PDF point)
  pdftranslate --scale 2 scan.pdf

  # JSON summary on stdout
  pdftranslate --json scan.pdf > summary.json

ENVIRONMENT VARIABLES:
  GOOGLE_API_KEY          Google Cloud API key (Vision + Translation)
  GOOGLE_ACCESS_TOKEN     OAuth2 bearer token, used when no API key is set
  PDFIUM_LIB_PATH         Path to an existing libpdfium
  RUST_LOG                Override the log filter (e.g. RUST_LOG=debug)

SETUP:
  1. Enable the Cloud Vision and Cloud Translation APIs for your project.
  2. export GOOGLE_API_KEY=AIza...
  3. Put libpdfium next to the binary, on the library path, or in PDFIUM_LIB_PATH.
"#;

/// Translate the words of a PDF and paint the translations over the originals.
#[derive(Parser, Debug)]
#[command(
    name = "pdftranslate",
    version,
    about = "Overlay machine translations onto the words of a PDF",
    long_about = "Rasterise every page of a PDF, detect words with OCR, translate each word, \
and paint the translation over the original on an opaque box. Right-to-left output is \
produced by reversing each translation character by character.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to translate.
    #[arg(env = "PDFTRANSLATE_INPUT", default_value = "./examples/sample-2.pdf")]
    input: PathBuf,

    /// Where to write the translated PDF. Overwritten if it exists.
    #[arg(short, long, env = "PDFTRANSLATE_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Target language code (ISO-639-1).
    #[arg(long, env = "PDFTRANSLATE_TARGET_LANGUAGE", default_value = DEFAULT_TARGET_LANGUAGE)]
    target_language: String,

    /// TrueType/OpenType font for the translated text. Default: embedded DejaVu Sans.
    #[arg(long, env = "PDFTRANSLATE_FONT")]
    font: Option<PathBuf>,

    /// Font size in points.
    #[arg(long, env = "PDFTRANSLATE_FONT_SIZE", default_value_t = 10.0)]
    font_size: f32,

    /// Width of the box painted over each word, in pixels.
    #[arg(long, env = "PDFTRANSLATE_BOX_WIDTH", default_value_t = 50,
          value_parser = clap::value_parser!(u32).range(1..=i32::MAX as i64))]
    box_width: u32,

    /// Height of the box painted over each word, in pixels.
    #[arg(long, env = "PDFTRANSLATE_BOX_HEIGHT", default_value_t = 15,
          value_parser = clap::value_parser!(u32).range(1..=i32::MAX as i64))]
    box_height: u32,

    /// Rasterisation scale (pixels per PDF point, 0.1–8.0).
    #[arg(long, env = "PDFTRANSLATE_SCALE", default_value_t = 1.0)]
    scale: f32,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDFTRANSLATE_PASSWORD")]
    password: Option<String>,

    /// Google Cloud API key.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Directory in which scratch directories are created. Default: system temp dir.
    #[arg(long, env = "PDFTRANSLATE_SCRATCH_DIR")]
    scratch_dir: Option<PathBuf>,

    /// Per-request timeout for OCR and translation calls, in seconds. Default: none.
    #[arg(long, env = "PDFTRANSLATE_REQUEST_TIMEOUT",
          value_parser = clap::value_parser!(u64).range(1..))]
    request_timeout: Option<u64>,

    /// Print a JSON summary (TranslationOutput) on stdout.
    #[arg(long, env = "PDFTRANSLATE_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDFTRANSLATE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFTRANSLATE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFTRANSLATE_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level logs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn TranslationProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run translation ──────────────────────────────────────────────────
    let output = translate_pdf(&cli.input, &cli.output, &config)
        .await
        .with_context(|| format!("Failed to translate {}", cli.input.display()))?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        eprintln!(
            "{}  {} pages  {} words  {}ms  →  {}",
            green("✔"),
            output.stats.total_pages,
            output.stats.total_words,
            output.stats.total_duration_ms,
            bold(&output.output_path.display().to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `TranslateConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<TranslateConfig> {
    let font = match cli.font {
        Some(ref path) => FontSource::File(path.clone()),
        None => FontSource::Embedded,
    };

    let mut builder = TranslateConfig::builder()
        .target_language(cli.target_language.clone())
        .render_scale(cli.scale)
        .font(font)
        .font_size(cli.font_size)
        .box_size(cli.box_width, cli.box_height);

    if let Some(ref password) = cli.password {
        builder = builder.password(password.clone());
    }
    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.clone());
    }
    if let Some(ref dir) = cli.scratch_dir {
        builder = builder.scratch_root(dir.clone());
    }
    if let Some(secs) = cli.request_timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
