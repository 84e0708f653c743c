//! Configuration types for the extraction operations.
//!
//! Compose, split, and the text operations take everything they need as
//! plain arguments. Rasterization has enough knobs (output encoding,
//! document password, progress reporting) to warrant a config struct, built
//! through [`RasterizeConfig::builder()`] in the usual builder style so new
//! fields never break existing callers.

use crate::progress::ProgressHook;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output encoding for extracted page images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// JPEG (default). Smallest output for scanned material; drops alpha.
    #[default]
    Jpeg,
    /// PNG. Lossless; keeps alpha.
    Png,
}

impl OutputFormat {
    /// File extension used for output filenames (`{page}.{ext}`).
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    pub(crate) fn image_format(self) -> image::ImageFormat {
        match self {
            OutputFormat::Jpeg => image::ImageFormat::Jpeg,
            OutputFormat::Png => image::ImageFormat::Png,
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            other => Err(format!("unknown image format '{other}' (expected jpeg or png)")),
        }
    }
}

/// Configuration for [`crate::ops::rasterize::rasterize_with`].
#[derive(Clone, Default)]
pub struct RasterizeConfig {
    /// Output image encoding. Default: JPEG.
    pub format: OutputFormat,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Per-page progress events; `None` stays silent.
    pub progress: Option<ProgressHook>,
}

impl fmt::Debug for RasterizeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterizeConfig")
            .field("format", &self.format)
            .field("password", &self.password.as_ref().map(|_| "<set>"))
            .field("progress", &self.progress.as_ref().map(|_| "<hook>"))
            .finish()
    }
}

impl RasterizeConfig {
    /// Create a new builder with default settings.
    pub fn builder() -> RasterizeConfigBuilder {
        RasterizeConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RasterizeConfig`].
#[derive(Debug, Default)]
pub struct RasterizeConfigBuilder {
    config: RasterizeConfig,
}

impl RasterizeConfigBuilder {
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = Some(password.into());
        self
    }

    pub fn progress(mut self, hook: ProgressHook) -> Self {
        self.config.progress = Some(hook);
        self
    }

    pub fn build(self) -> RasterizeConfig {
        self.config
    }
}
