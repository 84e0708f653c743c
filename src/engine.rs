//! pdfium binding and document-open helpers shared by every operation.
//!
//! Each operation binds pdfium and opens at most one document handle for its
//! own lifetime; handles are released by drop on every exit path. The
//! library is resolved through `pdfium-locator` (env override, cache, system
//! library, download — in that order).

use crate::error::PdforgeError;
use pdfium_render::prelude::*;
use std::path::Path;

/// Bind to the pdfium library, downloading it on first use if necessary.
pub(crate) fn bind() -> Result<Pdfium, PdforgeError> {
    pdfium_locator::bind_silent().map_err(|e| PdforgeError::PdfiumBindingFailed(e.to_string()))
}

/// Open a document for reading, classifying pdfium load failures.
///
/// pdfium reports password problems and corruption through the same error
/// type; we inspect the debug representation to distinguish a missing or
/// wrong password from a structurally broken file.
pub(crate) fn open_document<'a>(
    pdfium: &'a Pdfium,
    path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, PdforgeError> {
    pdfium.load_pdf_from_file(path, password).map_err(|e| {
        let detail = format!("{e:?}");
        if detail.contains("Password") || detail.contains("password") {
            if password.is_some() {
                PdforgeError::WrongPassword {
                    path: path.to_path_buf(),
                }
            } else {
                PdforgeError::PasswordRequired {
                    path: path.to_path_buf(),
                }
            }
        } else {
            PdforgeError::CorruptPdf {
                path: path.to_path_buf(),
                detail,
            }
        }
    })
}
