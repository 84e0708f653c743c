//! Progress-callback trait for per-page events.
//!
//! Long scanned documents take a while to walk page by page; injecting an
//! `Arc<dyn PageProgress>` through [`crate::config::RasterizeConfig`] lets a
//! host application drive a terminal progress bar, a log line per page, or a
//! UI update without this library knowing anything about the host. All
//! methods default to no-ops so implementors override only what they need.

use std::sync::Arc;

/// Receives events as an operation walks a document's pages in order.
pub trait PageProgress: Send + Sync {
    /// Called once before the first page, with the page total.
    fn on_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after each page's output file has been written.
    fn on_page(&self, page: usize, total_pages: usize) {
        let _ = (page, total_pages);
    }

    /// Called once after the last page.
    fn on_finish(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// No-op implementation for callers that don't care about progress.
pub struct NoopPageProgress;

impl PageProgress for NoopPageProgress {}

/// Convenience alias matching the field in [`crate::config::RasterizeConfig`].
pub type ProgressHook = Arc<dyn PageProgress>;
