//! # pdforge
//!
//! Utility operations over PDF documents, built on the pdfium document model
//! via [`pdfium-render`](https://crates.io/crates/pdfium-render):
//!
//! ```text
//! compose     images (GIF/JPEG/PNG/TIFF) ─▶ one PDF page per image
//! rasterize   PDF ─▶ each page's embedded image as {page}.jpg
//! split       PDF ─▶ parts of at most K pages as {part}.pdf
//! extract     PDF ─▶ text of a 1-based page range as one String
//! count       PDF ─▶ page count
//! ```
//!
//! Every operation is an independent, synchronous entry point: it binds
//! pdfium, opens exactly one document handle, walks pages strictly in order,
//! and releases all handles on every exit path. Failures are logged via
//! [`tracing`] and returned as a typed [`PdforgeError`] — never swallowed.
//!
//! The pdfium dynamic library is resolved automatically on first use
//! (`PDFIUM_LIB_PATH` override, per-user cache, system library, download);
//! see the `pdfium-locator` workspace crate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdforge::{compose, page_count, split};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scans = ["1.png", "2.png", "10.png"];
//!     let summary = compose(&scans, Path::new("album.pdf"))?;
//!     assert_eq!(summary.pages, page_count(Path::new("album.pdf"))?);
//!
//!     split(Path::new("album.pdf"), Path::new("parts/"), 2)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdforge` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdforge = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod ops;
pub mod progress;

mod engine;
mod input;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{OutputFormat, RasterizeConfig, RasterizeConfigBuilder};
pub use error::PdforgeError;
pub use ops::compose::{compose, compose_dir, ComposeSummary};
pub use ops::rasterize::{rasterize, rasterize_with, RasterizeSummary};
pub use ops::split::{split, SplitSummary};
pub use ops::text::{extract_text, extract_text_first_page, extract_text_range, page_count};
pub use progress::{NoopPageProgress, PageProgress, ProgressHook};
