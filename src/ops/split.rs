//! Split: re-partition a PDF into consecutive parts of at most K pages.
//!
//! Part *i* (1-based) is written to `{destination_dir}/{i}.pdf`. Original
//! page order and content are preserved, so concatenating the outputs in
//! filename order reproduces the source page sequence exactly. The last
//! part holds the remainder when the page count is not divisible by K.

use crate::engine;
use crate::error::PdforgeError;
use crate::input;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// What a successful split produced.
#[derive(Debug, Clone, Serialize)]
pub struct SplitSummary {
    /// Number of output PDFs, `ceil(pages / pages_per_part)`.
    pub parts: usize,
    /// Output files in part order.
    pub files: Vec<PathBuf>,
    /// Wall-clock duration of the whole operation.
    pub duration_ms: u64,
}

/// Split `source` into parts of at most `pages_per_part` pages each.
///
/// The destination directory is created if absent.
///
/// # Errors
/// - [`PdforgeError::InvalidConfig`] when `pages_per_part` is 0
/// - [`PdforgeError::NotAPdf`] / [`PdforgeError::CorruptPdf`] for
///   unreadable sources
/// - [`PdforgeError::OutputWriteFailed`] when a part cannot be written
pub fn split(
    source: &Path,
    destination_dir: &Path,
    pages_per_part: usize,
) -> Result<SplitSummary, PdforgeError> {
    if pages_per_part == 0 {
        return Err(PdforgeError::InvalidConfig(
            "pages per part must be at least 1".into(),
        ));
    }

    input::validate_pdf_path(source)?;
    std::fs::create_dir_all(destination_dir).map_err(|e| PdforgeError::OutputWriteFailed {
        path: destination_dir.to_path_buf(),
        detail: e.to_string(),
    })?;

    let start = Instant::now();
    let pdfium = engine::bind()?;
    let document = engine::open_document(&pdfium, source, None)?;
    let total = document.pages().len() as usize;

    let bounds = part_bounds(total, pages_per_part);
    let mut files = Vec::with_capacity(bounds.len());

    for (index, (first, last)) in bounds.iter().enumerate() {
        let part_num = index + 1;
        let out_path = destination_dir.join(format!("{part_num}.pdf"));

        let mut part = pdfium
            .create_new_pdf()
            .map_err(|e| PdforgeError::Internal(format!("failed to create document: {e:?}")))?;
        part.pages_mut()
            .copy_pages_from_document(&document, &format!("{first}-{last}"), 0)
            .map_err(|e| PdforgeError::PageOperationFailed {
                page: *first,
                detail: format!("copying pages {first}-{last} failed: {e:?}"),
            })?;
        part.save_to_file(&out_path)
            .map_err(|e| PdforgeError::OutputWriteFailed {
                path: out_path.clone(),
                detail: format!("{e:?}"),
            })?;

        debug!("part {part_num}: pages {first}-{last} → {}", out_path.display());
        files.push(out_path);
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "split {} pages into {} parts in {}ms",
        total,
        files.len(),
        duration_ms
    );

    Ok(SplitSummary {
        parts: files.len(),
        files,
        duration_ms,
    })
}

/// 1-based inclusive `(first, last)` page bounds for each part.
fn part_bounds(total_pages: usize, pages_per_part: usize) -> Vec<(usize, usize)> {
    let parts = total_pages.div_ceil(pages_per_part);
    (1..=parts)
        .map(|part| {
            let first = (part - 1) * pages_per_part + 1;
            let last = (part * pages_per_part).min(total_pages);
            (first, last)
        })
        .collect()
}
