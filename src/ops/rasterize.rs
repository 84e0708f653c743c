//! Rasterize: write each page's embedded image out as a standalone file.
//!
//! This is the inverse of compose for scanned-style documents: every page is
//! expected to carry exactly one embedded image object, which is decoded and
//! written to `{page}.{ext}` in the destination directory, 1-based page
//! numbers matching output filenames. A page with zero or several image
//! objects fails the whole run with
//! [`PdforgeError::UnexpectedImageCount`] — there is no per-page recovery.
//!
//! The walk is strictly sequential; pages are written in order 1..N.

use crate::config::{OutputFormat, RasterizeConfig};
use crate::engine;
use crate::error::PdforgeError;
use crate::input;
use crate::progress::PageProgress;
use image::DynamicImage;
use pdfium_render::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};

/// What a successful rasterize produced.
#[derive(Debug, Clone, Serialize)]
pub struct RasterizeSummary {
    /// Number of pages processed (equals the number of files written).
    pub pages: usize,
    /// Output files in page order.
    pub files: Vec<PathBuf>,
    /// Wall-clock duration of the whole operation.
    pub duration_ms: u64,
}

/// Extract every page's embedded image to `destination_dir`, as JPEG.
pub fn rasterize(source: &Path, destination_dir: &Path) -> Result<RasterizeSummary, PdforgeError> {
    rasterize_with(source, destination_dir, &RasterizeConfig::default())
}

/// Extract every page's embedded image to `destination_dir`.
///
/// The destination directory is created if absent. On success it contains
/// exactly one image file per page, named `{page}.{ext}` by 1-based index.
///
/// # Errors
/// - [`PdforgeError::UnexpectedImageCount`] when a page does not hold
///   exactly one image object
/// - [`PdforgeError::NotAPdf`] / [`PdforgeError::CorruptPdf`] /
///   [`PdforgeError::PasswordRequired`] for unreadable sources
/// - [`PdforgeError::OutputWriteFailed`] when an output cannot be written
pub fn rasterize_with(
    source: &Path,
    destination_dir: &Path,
    config: &RasterizeConfig,
) -> Result<RasterizeSummary, PdforgeError> {
    input::validate_pdf_path(source)?;
    std::fs::create_dir_all(destination_dir).map_err(|e| PdforgeError::OutputWriteFailed {
        path: destination_dir.to_path_buf(),
        detail: e.to_string(),
    })?;

    let start = Instant::now();
    let pdfium = engine::bind()?;
    let document = engine::open_document(&pdfium, source, config.password.as_deref())?;
    let total = document.pages().len() as usize;

    if let Some(hook) = &config.progress {
        hook.on_start(total);
    }

    let mut files = Vec::with_capacity(total);
    for (index, page) in document.pages().iter().enumerate() {
        let page_num = index + 1;

        let bitmap = single_embedded_image(&document, &page, page_num).inspect_err(|e| {
            error!("extraction aborted on page {page_num}: {e}");
        })?;

        let out_path = destination_dir.join(format!("{page_num}.{}", config.format.extension()));
        write_image(&bitmap, &out_path, config)?;
        debug!(
            "page {page_num}: {}x{} → {}",
            bitmap.width(),
            bitmap.height(),
            out_path.display()
        );

        files.push(out_path);
        if let Some(hook) = &config.progress {
            hook.on_page(page_num, total);
        }
    }

    if let Some(hook) = &config.progress {
        hook.on_finish(total);
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "extracted {} page images from {} in {}ms",
        total,
        source.display(),
        duration_ms
    );

    Ok(RasterizeSummary {
        pages: total,
        files,
        duration_ms,
    })
}

/// Return the decoded bitmap of the page's single image object.
///
/// Walks the page's object list counting image objects; anything other than
/// exactly one is a structural failure. The raw (undecoded-by-filters)
/// bitmap is preferred; pdfium falls back to the fully processed bitmap for
/// colour spaces the raw path cannot represent.
fn single_embedded_image(
    document: &PdfDocument,
    page: &PdfPage,
    page_num: usize,
) -> Result<DynamicImage, PdforgeError> {
    let mut bitmap: Option<DynamicImage> = None;
    let mut count = 0usize;

    for object in page.objects().iter() {
        if let Some(image_object) = object.as_image_object() {
            count += 1;
            if bitmap.is_none() {
                let decoded = image_object
                    .get_raw_image()
                    .or_else(|_| image_object.get_processed_image(document))
                    .map_err(|e| PdforgeError::PageOperationFailed {
                        page: page_num,
                        detail: format!("image object decode failed: {e:?}"),
                    })?;
                bitmap = Some(decoded);
            }
        }
    }

    match (bitmap, count) {
        (Some(decoded), 1) => Ok(decoded),
        (_, count) => Err(PdforgeError::UnexpectedImageCount {
            page: page_num,
            count,
        }),
    }
}

/// Encode and write one page image.
fn write_image(
    bitmap: &DynamicImage,
    path: &Path,
    config: &RasterizeConfig,
) -> Result<(), PdforgeError> {
    let io_err = |e: image::ImageError| PdforgeError::OutputWriteFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    };

    match config.format {
        // The JPEG encoder rejects alpha channels; flatten to RGB first.
        OutputFormat::Jpeg => DynamicImage::ImageRgb8(bitmap.to_rgb8())
            .save_with_format(path, config.format.image_format())
            .map_err(io_err),
        OutputFormat::Png => bitmap
            .save_with_format(path, config.format.image_format())
            .map_err(io_err),
    }
}
