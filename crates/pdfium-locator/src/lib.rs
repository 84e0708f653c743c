//! # pdfium-locator
//!
//! Resolve the PDFium dynamic library for `pdfium-render` without asking the
//! user to download anything or fiddle with `LD_LIBRARY_PATH`.
//!
//! Resolution order, first match wins:
//!
//! 1. `PDFIUM_LIB_PATH` — explicit path to an existing library.
//! 2. The per-version cache directory (see [`library_cache_dir`]).
//! 3. A system-installed pdfium (`Pdfium::bind_to_system_library`).
//! 4. Download the platform archive from
//!    [bblanchon/pdfium-binaries](https://github.com/bblanchon/pdfium-binaries),
//!    extract the library into the cache, and bind it.
//!
//! [`bind_local`] stops after step 3 and never touches the network — use it
//! in tests and other environments where downloading is not acceptable.
//!
//! ## Environment variables
//!
//! - `PDFIUM_LIB_PATH` — path to an existing pdfium library; skips everything else.
//! - `PDFIUM_CACHE_DIR` — override the default cache directory.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use pdfium_render::prelude::Pdfium;
use thiserror::Error;

/// The pdfium-binaries release tag downloads are pinned to.
///
/// Corresponds to the `chromium/7690` release of
/// [bblanchon/pdfium-binaries](https://github.com/bblanchon/pdfium-binaries/releases).
pub const PDFIUM_VERSION: &str = "7690";

const RELEASE_BASE_URL: &str = "https://github.com/bblanchon/pdfium-binaries/releases/download";

/// Errors returned by pdfium-locator operations.
#[derive(Error, Debug)]
pub enum LocatorError {
    /// The current OS/architecture combination has no prebuilt pdfium.
    #[error("No prebuilt PDFium for this platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// Could not create or write the local cache directory.
    #[error("PDFium cache directory error: {0}")]
    CacheDir(#[source] std::io::Error),

    /// Network download failed.
    #[error("PDFium download failed: {0}")]
    Download(String),

    /// gzip/tar extraction failed.
    #[error("PDFium archive extraction failed: {0}")]
    Extract(String),

    /// The library was found on disk but could not be loaded.
    #[error("Failed to load PDFium from '{path}': {reason}")]
    Bind { path: PathBuf, reason: String },

    /// No library was found and downloading was not permitted.
    #[error(
        "No PDFium library found (checked PDFIUM_LIB_PATH, the local cache, and \
         system library paths) and network download was disabled.\n\
         Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium system-wide."
    )]
    NotFoundLocally,
}

/// Release asset name and on-disk library name for one platform.
struct Platform {
    archive: &'static str,
    inner_path: &'static str,
    lib_name: &'static str,
}

fn platform() -> Result<Platform, LocatorError> {
    match (std::env::consts::OS, std::env::consts::ARCH) {
        ("macos", "aarch64") => Ok(Platform {
            archive: "pdfium-mac-arm64.tgz",
            inner_path: "lib/libpdfium.dylib",
            lib_name: "libpdfium.dylib",
        }),
        ("macos", "x86_64") => Ok(Platform {
            archive: "pdfium-mac-x64.tgz",
            inner_path: "lib/libpdfium.dylib",
            lib_name: "libpdfium.dylib",
        }),
        ("linux", "x86_64") => Ok(Platform {
            archive: "pdfium-linux-x64.tgz",
            inner_path: "lib/libpdfium.so",
            lib_name: "libpdfium.so",
        }),
        ("linux", "aarch64") => Ok(Platform {
            archive: "pdfium-linux-arm64.tgz",
            inner_path: "lib/libpdfium.so",
            lib_name: "libpdfium.so",
        }),
        ("windows", "x86_64") => Ok(Platform {
            archive: "pdfium-win-x64.tgz",
            inner_path: "bin/pdfium.dll",
            lib_name: "pdfium.dll",
        }),
        ("windows", "aarch64") => Ok(Platform {
            archive: "pdfium-win-arm64.tgz",
            inner_path: "bin/pdfium.dll",
            lib_name: "pdfium.dll",
        }),
        (os, arch) => Err(LocatorError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        }),
    }
}

/// The per-version cache directory holding the downloaded library.
///
/// Defaults:
/// - macOS: `~/Library/Caches/pdforge/pdfium-{VERSION}/`
/// - Linux: `~/.cache/pdforge/pdfium-{VERSION}/`
/// - Windows: `%LOCALAPPDATA%\pdforge\pdfium-{VERSION}\`
///
/// Override the base with `PDFIUM_CACHE_DIR`.
pub fn library_cache_dir() -> PathBuf {
    let base = match std::env::var("PDFIUM_CACHE_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::cache_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
            .unwrap_or_else(std::env::temp_dir)
            .join("pdforge"),
    };
    base.join(format!("pdfium-{PDFIUM_VERSION}"))
}

// Resolved-once path for the lifetime of the process.
static RESOLVED: OnceLock<PathBuf> = OnceLock::new();

/// Returns the on-disk library path if one is already available without any
/// network access (env override or cache hit).
pub fn locate_local() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("PDFIUM_LIB_PATH") {
        let p = PathBuf::from(p);
        if p.exists() {
            return Some(p);
        }
    }
    let p = library_cache_dir().join(platform().ok()?.lib_name);
    p.exists().then_some(p)
}

/// True when the next [`ensure_library`] call will not need the network.
pub fn is_cached() -> bool {
    locate_local().is_some()
}

/// Ensures the PDFium library is present on disk, downloading it on a miss.
///
/// `on_progress` receives `(bytes_downloaded, total_bytes)` during the
/// download; pass `None` to stay silent. The download happens at most once
/// per process; concurrent callers race benignly on the `OnceLock`.
pub fn ensure_library(
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<PathBuf, LocatorError> {
    if let Some(path) = RESOLVED.get() {
        return Ok(path.clone());
    }

    let path = match locate_local() {
        Some(p) => p,
        None => download_into_cache(on_progress)?,
    };

    let _ = RESOLVED.set(path.clone());
    Ok(path)
}

/// Binds to PDFium, downloading the library first if necessary.
pub fn bind(on_progress: Option<&dyn Fn(u64, Option<u64>)>) -> Result<Pdfium, LocatorError> {
    if let Some(path) = locate_local() {
        return bind_from_path(&path);
    }
    // Prefer a system-installed pdfium over pulling ~30 MB off the network.
    if let Ok(bindings) = Pdfium::bind_to_system_library() {
        return Ok(Pdfium::new(bindings));
    }
    let path = ensure_library(on_progress)?;
    bind_from_path(&path)
}

/// Binds to PDFium without any progress output.
pub fn bind_silent() -> Result<Pdfium, LocatorError> {
    bind(None)
}

/// Binds to PDFium using only local sources: env override, cache, system
/// library. Never downloads. Returns [`LocatorError::NotFoundLocally`] when
/// nothing is installed.
pub fn bind_local() -> Result<Pdfium, LocatorError> {
    if let Some(path) = locate_local() {
        return bind_from_path(&path);
    }
    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|_| LocatorError::NotFoundLocally)
}

/// Binds to a PDFium library at an explicit path, bypassing resolution.
pub fn bind_from_path(path: &Path) -> Result<Pdfium, LocatorError> {
    Pdfium::bind_to_library(path)
        .map(Pdfium::new)
        .map_err(|e| LocatorError::Bind {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn download_into_cache(
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<PathBuf, LocatorError> {
    let info = platform()?;
    let cache_dir = library_cache_dir();
    let lib_path = cache_dir.join(info.lib_name);

    std::fs::create_dir_all(&cache_dir).map_err(LocatorError::CacheDir)?;

    let url = format!("{RELEASE_BASE_URL}/chromium%2F{PDFIUM_VERSION}/{}", info.archive);
    let archive = fetch(&url, on_progress)?;
    extract_one(&archive, info.inner_path, &lib_path)?;

    Ok(lib_path)
}

/// Streams a URL into memory, reporting progress every 64 KiB chunk.
fn fetch(
    url: &str,
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<Vec<u8>, LocatorError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("pdfium-locator/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| LocatorError::Download(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| LocatorError::Download(format!("GET {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(LocatorError::Download(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }

    let total = response.content_length();
    let mut buf = Vec::with_capacity(total.unwrap_or(32 * 1024 * 1024) as usize);
    let mut reader = response;
    let mut chunk = vec![0u8; 64 * 1024];
    let mut downloaded = 0u64;

    loop {
        match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                downloaded += n as u64;
                if let Some(cb) = on_progress {
                    cb(downloaded, total);
                }
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(LocatorError::Download(format!("read error: {e}"))),
        }
    }

    Ok(buf)
}

/// Extracts a single entry from a gzipped tar archive to `dest`.
fn extract_one(archive: &[u8], inner_path: &str, dest: &Path) -> Result<(), LocatorError> {
    use flate2::read::GzDecoder;
    use tar::Archive;

    let mut tar = Archive::new(GzDecoder::new(archive));

    for entry in tar
        .entries()
        .map_err(|e| LocatorError::Extract(e.to_string()))?
    {
        let mut entry = entry.map_err(|e| LocatorError::Extract(e.to_string()))?;
        let matches = entry
            .path()
            .map(|p| p.to_string_lossy() == inner_path)
            .unwrap_or(false);
        if matches {
            entry
                .unpack(dest)
                .map_err(|e| LocatorError::Extract(format!("unpack failed: {e}")))?;
            return Ok(());
        }
    }

    Err(LocatorError::Extract(format!(
        "'{inner_path}' not present in archive"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_platform_is_supported() {
        platform().expect("current platform should have a prebuilt pdfium");
    }

    #[test]
    fn platform_fields_nonempty() {
        let info = platform().unwrap();
        assert!(!info.archive.is_empty());
        assert!(!info.inner_path.is_empty());
        assert!(!info.lib_name.is_empty());
    }

    #[test]
    fn cache_dir_is_deterministic_and_versioned() {
        let a = library_cache_dir();
        let b = library_cache_dir();
        assert_eq!(a, b);
        assert!(a.to_str().unwrap().contains(PDFIUM_VERSION));
    }

    #[test]
    fn not_found_locally_error_mentions_env_var() {
        let msg = LocatorError::NotFoundLocally.to_string();
        assert!(msg.contains("PDFIUM_LIB_PATH"));
    }
}
