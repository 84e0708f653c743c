//! Text extraction and page counting.
//!
//! Text is concatenated in page order with no separator added by this layer;
//! whatever spacing and newlines pdfium's text engine produces per page is
//! preserved as-is. Page ranges are 1-based and inclusive.

use crate::engine;
use crate::error::PdforgeError;
use crate::input;
use pdfium_render::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

/// Number of pages in `source`.
pub fn page_count(source: &Path) -> Result<usize, PdforgeError> {
    input::validate_pdf_path(source)?;
    let pdfium = engine::bind()?;
    let document = engine::open_document(&pdfium, source, None)?;
    Ok(document.pages().len() as usize)
}

/// Extract the text of the whole document.
///
/// Equivalent to [`extract_text_range`] over the full page range, but opens
/// the document only once. An empty document yields an empty string.
pub fn extract_text(source: &Path) -> Result<String, PdforgeError> {
    input::validate_pdf_path(source)?;
    let start = Instant::now();
    let pdfium = engine::bind()?;
    let document = engine::open_document(&pdfium, source, None)?;
    let total = document.pages().len() as usize;

    let text = collect_range(&document, 1, total)?;
    info!(
        "extracted text of {} pages in {}ms",
        total,
        start.elapsed().as_millis()
    );
    Ok(text)
}

/// Extract the text of page 1 only.
pub fn extract_text_first_page(source: &Path) -> Result<String, PdforgeError> {
    extract_text_range(source, 1, 1)
}

/// Extract the text of pages `start..=end` (1-based, inclusive).
///
/// # Errors
/// - [`PdforgeError::InvalidPageRange`] when `start` is 0 or `start > end`
/// - [`PdforgeError::PageOutOfRange`] when `end` exceeds the page count
pub fn extract_text_range(
    source: &Path,
    start: usize,
    end: usize,
) -> Result<String, PdforgeError> {
    if start == 0 || start > end {
        return Err(PdforgeError::InvalidPageRange { start, end });
    }

    input::validate_pdf_path(source)?;
    let begin = Instant::now();
    let pdfium = engine::bind()?;
    let document = engine::open_document(&pdfium, source, None)?;
    let total = document.pages().len() as usize;

    if end > total {
        error!("page range {start}-{end} exceeds {total}-page document");
        return Err(PdforgeError::PageOutOfRange { page: end, total });
    }

    let text = collect_range(&document, start, end)?;
    info!(
        "extracted text of pages {start}-{end} in {}ms",
        begin.elapsed().as_millis()
    );
    Ok(text)
}

/// Concatenate the text of pages `start..=end` of an open document.
///
/// `start > end` (the empty-document case) yields an empty string.
fn collect_range(
    document: &PdfDocument,
    start: usize,
    end: usize,
) -> Result<String, PdforgeError> {
    let mut text = String::new();
    for page_num in start..=end {
        let page_err = |detail: String| PdforgeError::PageOperationFailed {
            page: page_num,
            detail,
        };

        let page = document
            .pages()
            .get((page_num - 1) as u16)
            .map_err(|e| page_err(format!("{e:?}")))?;
        let page_text = page.text().map_err(|e| page_err(format!("{e:?}")))?;
        text.push_str(&page_text.all());
    }
    Ok(text)
}
