//! CLI binary for pdforge.
//!
//! A thin shim over the library crate: one subcommand per operation, flags
//! mapped onto the library's arguments, summaries printed at the end.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdforge::{
    compose, compose_dir, extract_text, extract_text_first_page, extract_text_range, page_count,
    rasterize_with, split, OutputFormat, PageProgress, ProgressHook, RasterizeConfig,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Terminal progress bar driven by the library's page events ────────────────

struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_start
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_prefix("Extracting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl PageProgress for CliProgress {
    fn on_start(&self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
    }

    fn on_page(&self, _page: usize, _total_pages: usize) {
        self.bar.inc(1);
    }

    fn on_finish(&self, _total_pages: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Combine scans into one PDF (pages ordered as given)
  pdforge compose page1.png page2.png -o scans.pdf

  # Combine a whole directory, ordered by numeric filename (2.png before 10.png)
  pdforge compose --dir ./scans -o scans.pdf

  # Write each page's embedded image to out/1.jpg, out/2.jpg, ...
  pdforge rasterize scans.pdf -d out

  # Same, but lossless PNG output
  pdforge rasterize scans.pdf -d out --format png

  # Split into parts of at most 10 pages: parts/1.pdf, parts/2.pdf, ...
  pdforge split big.pdf -d parts -n 10

  # Print the text of pages 3-7, or of the whole document
  pdforge extract report.pdf --pages 3-7
  pdforge extract report.pdf

  # Print the page count
  pdforge count report.pdf

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH    Path to an existing libpdfium — skips auto-download
  PDFIUM_CACHE_DIR   Override the default pdfium cache directory
  RUST_LOG           Log filter, e.g. RUST_LOG=pdforge=debug

SETUP:
  PDFium is located automatically: an existing PDFIUM_LIB_PATH, the local
  cache, or a system-wide install are used if present; otherwise the library
  (~30 MB) is downloaded once and cached.
"#;

/// PDF utility operations: compose, rasterize, split, extract, count.
#[derive(Parser, Debug)]
#[command(
    name = "pdforge",
    version,
    about = "PDF utility operations: images-to-PDF, page-image extraction, splitting, text",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print machine-readable JSON summaries instead of human text.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress progress bars and summary lines.
    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Combine images into one PDF, one page per image, sized to the pixels.
    Compose {
        /// Image files, in page order (GIF, JPEG, PNG, TIFF).
        #[arg(required_unless_present = "dir", conflicts_with = "dir")]
        images: Vec<PathBuf>,

        /// Take all files of this directory instead, ordered by numeric
        /// filename stem (2.png before 10.png).
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Destination PDF (created or overwritten).
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Write each page's embedded image to {page}.jpg in a directory.
    Rasterize {
        /// Source PDF.
        pdf: PathBuf,

        /// Destination directory (created if absent).
        #[arg(short = 'd', long)]
        out_dir: PathBuf,

        /// Output encoding: jpeg or png.
        #[arg(long, default_value = "jpeg")]
        format: OutputFormat,

        /// PDF user password for encrypted documents.
        #[arg(long)]
        password: Option<String>,
    },

    /// Split a PDF into consecutive parts of at most N pages.
    Split {
        /// Source PDF.
        pdf: PathBuf,

        /// Destination directory (created if absent).
        #[arg(short = 'd', long)]
        out_dir: PathBuf,

        /// Pages per part.
        #[arg(short = 'n', long, default_value_t = 1)]
        pages_per_part: usize,
    },

    /// Print the text content of a page range (default: whole document).
    Extract {
        /// Source PDF.
        pdf: PathBuf,

        /// Page selection: "all", a single page "5", or a range "3-7".
        #[arg(long, default_value = "all", conflicts_with = "first_page")]
        pages: String,

        /// Shortcut for --pages 1.
        #[arg(long)]
        first_page: bool,
    },

    /// Print the page count.
    Count {
        /// Source PDF.
        pdf: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    preflight_pdfium(cli.quiet)?;

    match cli.command {
        Command::Compose { images, dir, output } => {
            let summary = if let Some(dir) = dir {
                compose_dir(&dir, &output)
            } else {
                compose(&images, &output)
            }
            .context("Compose failed")?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else if !cli.quiet {
                eprintln!(
                    "{} {} pages  {}  →  {}",
                    green("✔"),
                    summary.pages,
                    dim(&format!("{}ms", summary.duration_ms)),
                    bold(&summary.destination.display().to_string()),
                );
            }
        }

        Command::Rasterize {
            pdf,
            out_dir,
            format,
            password,
        } => {
            let mut builder = RasterizeConfig::builder().format(format);
            if let Some(password) = password {
                builder = builder.password(password);
            }
            if !cli.quiet {
                builder = builder.progress(CliProgress::new() as ProgressHook);
            }

            let summary =
                rasterize_with(&pdf, &out_dir, &builder.build()).context("Extraction failed")?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else if !cli.quiet {
                eprintln!(
                    "{} {} images  {}  →  {}",
                    green("✔"),
                    summary.pages,
                    dim(&format!("{}ms", summary.duration_ms)),
                    bold(&out_dir.display().to_string()),
                );
            }
        }

        Command::Split {
            pdf,
            out_dir,
            pages_per_part,
        } => {
            let summary = split(&pdf, &out_dir, pages_per_part).context("Split failed")?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else if !cli.quiet {
                eprintln!(
                    "{} {} parts  {}  →  {}",
                    green("✔"),
                    summary.parts,
                    dim(&format!("{}ms", summary.duration_ms)),
                    bold(&out_dir.display().to_string()),
                );
            }
        }

        Command::Extract {
            pdf,
            pages,
            first_page,
        } => {
            let text = if first_page {
                extract_text_first_page(&pdf)
            } else {
                match parse_pages(&pages)? {
                    None => extract_text(&pdf),
                    Some((start, end)) => extract_text_range(&pdf, start, end),
                }
            }
            .context("Text extraction failed")?;

            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
        }

        Command::Count { pdf } => {
            let count = page_count(&pdf).context("Page count failed")?;
            println!("{count}");
        }
    }

    Ok(())
}

/// Make sure a pdfium library is available before touching any document,
/// showing a download bar on a cold cache.
fn preflight_pdfium(quiet: bool) -> Result<()> {
    if pdfium_locator::is_cached() || pdfium_locator::bind_local().is_ok() {
        return Ok(());
    }

    if quiet {
        pdfium_locator::ensure_library(None).context("Failed to download the PDFium library")?;
        return Ok(());
    }

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {bytes}/{total_bytes}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    bar.set_prefix("PDF engine");
    bar.enable_steady_tick(Duration::from_millis(80));

    let b = bar.clone();
    pdfium_locator::ensure_library(Some(&move |downloaded, total| {
        if let Some(t) = total {
            if b.length().unwrap_or(0) != t {
                b.set_length(t);
            }
        }
        b.set_position(downloaded);
    }))
    .context("Failed to download the PDFium library")?;

    bar.finish_with_message("ready ✓");
    Ok(())
}

/// Parse `--pages` into `None` (all) or `Some((start, end))`.
fn parse_pages(s: &str) -> Result<Option<(usize, usize)>> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(None);
    }

    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start.trim().parse().context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;
        if start < 1 {
            bail!("Pages are 1-indexed, minimum is 1 (got {start})");
        }
        if start > end {
            bail!("Invalid page range '{start}-{end}': start must be <= end");
        }
        return Ok(Some((start, end)));
    }

    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        bail!("Pages are 1-indexed, minimum is 1 (got {page})");
    }
    Ok(Some((page, page)))
}
