//! Compose: combine an ordered list of images into one PDF.
//!
//! One output page per input image. The page size in points equals the
//! image's pixel dimensions exactly — no scaling, no margins — and the image
//! object is stretched over the whole page area, so a later extraction pass
//! gets the original raster back at full resolution.
//!
//! Input order is the caller's order and is preserved exactly. The
//! destination document is saved once, after the last page; any decode
//! failure aborts the whole operation and no partial output is guaranteed
//! to be valid.

use crate::engine;
use crate::error::PdforgeError;
use crate::input;
use image::GenericImageView;
use pdfium_render::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};

/// What a successful compose produced.
#[derive(Debug, Clone, Serialize)]
pub struct ComposeSummary {
    /// Number of pages written (equals the number of input images).
    pub pages: usize,
    /// The destination PDF.
    pub destination: PathBuf,
    /// Wall-clock duration of the whole operation.
    pub duration_ms: u64,
}

/// Combine `images`, in the given order, into a single PDF at `destination`.
///
/// Accepts GIF, JPEG, PNG, and TIFF inputs. The destination file is created
/// or overwritten.
///
/// # Errors
/// - [`PdforgeError::EmptyImageList`] when `images` is empty
/// - [`PdforgeError::FileNotFound`] / [`PdforgeError::ImageDecodeFailed`]
///   when an input is missing or not a decodable raster image
/// - [`PdforgeError::OutputWriteFailed`] when the destination cannot be written
pub fn compose<P: AsRef<Path>>(
    images: &[P],
    destination: &Path,
) -> Result<ComposeSummary, PdforgeError> {
    if images.is_empty() {
        error!("compose called with an empty image list");
        return Err(PdforgeError::EmptyImageList);
    }

    let start = Instant::now();
    let pdfium = engine::bind()?;
    let mut document = pdfium
        .create_new_pdf()
        .map_err(|e| PdforgeError::Internal(format!("failed to create document: {e:?}")))?;

    for (index, path) in images.iter().enumerate() {
        let path = path.as_ref();
        append_image_page(&mut document, path).inspect_err(|e| {
            error!("compose aborted at image {} ({}): {e}", index + 1, path.display());
        })?;
        debug!("appended page {} from {}", index + 1, path.display());
    }

    document
        .save_to_file(destination)
        .map_err(|e| PdforgeError::OutputWriteFailed {
            path: destination.to_path_buf(),
            detail: format!("{e:?}"),
        })?;

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "composed {} pages into {} in {}ms",
        images.len(),
        destination.display(),
        duration_ms
    );

    Ok(ComposeSummary {
        pages: images.len(),
        destination: destination.to_path_buf(),
        duration_ms,
    })
}

/// Combine every file in `source_dir` into a single PDF at `destination`.
///
/// Files are ordered by the numeric value of their filename stem, so
/// `2.png` comes before `10.png`. A file with a non-numeric stem fails the
/// call with [`PdforgeError::NonNumericFilename`]; subdirectories are
/// ignored.
pub fn compose_dir(source_dir: &Path, destination: &Path) -> Result<ComposeSummary, PdforgeError> {
    let ordered = input::numbered_files(source_dir)?;
    compose(&ordered, destination)
}

/// Decode one image and append it as a full-bleed page.
fn append_image_page(document: &mut PdfDocument, path: &Path) -> Result<(), PdforgeError> {
    if !path.exists() {
        return Err(PdforgeError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let decoded = image::open(path).map_err(|e| PdforgeError::ImageDecodeFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let (width_px, height_px) = decoded.dimensions();
    let width = PdfPoints::new(width_px as f32);
    let height = PdfPoints::new(height_px as f32);

    let page_num = document.pages().len() as usize + 1;
    let pdfium_err = |e: PdfiumError| PdforgeError::PageOperationFailed {
        page: page_num,
        detail: format!("{e:?}"),
    };

    let mut page = document
        .pages_mut()
        .create_page_at_end(PdfPagePaperSize::Custom(width, height))
        .map_err(pdfium_err)?;

    // A fresh image object is 1pt × 1pt; scaling by the page dimensions
    // stretches it over the entire page.
    let mut object = PdfPageImageObject::new(document, &decoded).map_err(pdfium_err)?;
    object.scale(width.value, height.value).map_err(pdfium_err)?;
    page.objects_mut()
        .add_object(PdfPageObject::Image(object))
        .map_err(pdfium_err)?;

    Ok(())
}
