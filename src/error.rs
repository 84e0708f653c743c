//! Error types for the pdforge library.
//!
//! Every operation returns `Result<_, PdforgeError>`. Failures are logged
//! with context at the operation boundary and then propagated, so callers
//! can match on the variant and decide recovery themselves. Nothing in this
//! crate retries; all failures are terminal for the invoking call.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdforge library.
#[derive(Debug, Error)]
pub enum PdforgeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// An input image could not be decoded (compose accepts GIF, JPEG, PNG, TIFF).
    #[error("Failed to decode image '{path}': {detail}")]
    ImageDecodeFailed { path: PathBuf, detail: String },

    /// Compose was called with an empty image list.
    #[error("No input images given — composing an empty PDF is not supported.")]
    EmptyImageList,

    /// A file in a numerically-ordered input directory has a non-numeric stem.
    #[error(
        "File '{path}' does not have a numeric name (e.g. '3.png').\n\
         Directory composition orders files by the numeric value of the filename stem."
    )]
    NonNumericFilename { path: PathBuf },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// Requested page numbers exceed the actual page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// A page range with start 0 or start > end.
    #[error("Invalid page range {start}-{end}: pages are 1-based and start must be <= end")]
    InvalidPageRange { start: usize, end: usize },

    /// A page did not contain exactly one embedded image object.
    ///
    /// Image extraction assumes one full-page image per page (scanned
    /// documents, or PDFs produced by compose). Pages with none or several
    /// image objects abort the run rather than guessing which to extract.
    #[error(
        "Page {page} contains {count} image objects, expected exactly 1.\n\
         Image extraction only supports documents with one embedded image per page."
    )]
    UnexpectedImageCount { page: usize, count: usize },

    /// pdfium failed while reading or writing page content.
    #[error("Page operation failed on page {page}: {detail}")]
    PageOperationFailed { page: usize, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file or directory.
    #[error("Failed to write output '{path}': {detail}")]
    OutputWriteFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Invalid caller-supplied configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to the PDFium library: {0}\n\n\
PDFium is normally located or downloaded automatically on first run.\n\
If that failed, you can:\n\
  • Check your internet connection and try again.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Install a system-wide pdfium package.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_image_count_display() {
        let e = PdforgeError::UnexpectedImageCount { page: 4, count: 0 };
        let msg = e.to_string();
        assert!(msg.contains("Page 4"), "got: {msg}");
        assert!(msg.contains("0 image objects"), "got: {msg}");
    }

    #[test]
    fn page_out_of_range_display() {
        let e = PdforgeError::PageOutOfRange { page: 9, total: 3 };
        assert!(e.to_string().contains("Page 9"));
        assert!(e.to_string().contains("3 pages"));
    }

    #[test]
    fn invalid_page_range_display() {
        let e = PdforgeError::InvalidPageRange { start: 5, end: 2 };
        assert!(e.to_string().contains("5-2"));
    }

    #[test]
    fn non_numeric_filename_display_names_file() {
        let e = PdforgeError::NonNumericFilename {
            path: PathBuf::from("/scans/cover.png"),
        };
        assert!(e.to_string().contains("cover.png"));
    }

    #[test]
    fn not_a_pdf_display_shows_magic() {
        let e = PdforgeError::NotAPdf {
            path: PathBuf::from("/tmp/x.pdf"),
            magic: *b"GIF8",
        };
        assert!(e.to_string().contains("not a valid PDF"));
    }
}
