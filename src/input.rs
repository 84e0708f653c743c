//! Input validation and ordering helpers.
//!
//! pdfium gives unhelpful errors for nonexistent or non-PDF files, so every
//! operation validates its source path here first: the file must exist, be
//! readable, and start with the `%PDF` magic bytes.

use crate::error::PdforgeError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate that `path` points at a readable PDF file.
pub(crate) fn validate_pdf_path(path: &Path) -> Result<(), PdforgeError> {
    if !path.exists() {
        return Err(PdforgeError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(PdforgeError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PdforgeError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(PdforgeError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("validated PDF source: {}", path.display());
    Ok(())
}

/// List the files of `dir` ordered by the numeric value of their filename
/// stem, so `2.png` sorts before `10.png`.
///
/// Subdirectories are ignored. Any file whose stem does not parse as an
/// unsigned integer violates the ordering contract and fails the whole call.
pub(crate) fn numbered_files(dir: &Path) -> Result<Vec<PathBuf>, PdforgeError> {
    let entries = std::fs::read_dir(dir).map_err(|_| PdforgeError::FileNotFound {
        path: dir.to_path_buf(),
    })?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PdforgeError::Internal(e.to_string()))?;
        if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            files.push(entry.path());
        }
    }

    sort_by_numeric_stem(files)
}

/// Sort paths by the numeric value of their filename stem.
fn sort_by_numeric_stem(paths: Vec<PathBuf>) -> Result<Vec<PathBuf>, PdforgeError> {
    let mut keyed: Vec<(u64, PathBuf)> = paths
        .into_iter()
        .map(|p| {
            let stem = p
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            match stem.parse::<u64>() {
                Ok(n) => Ok((n, p)),
                Err(_) => Err(PdforgeError::NonNumericFilename { path: p }),
            }
        })
        .collect::<Result<_, _>>()?;

    keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    Ok(keyed.into_iter().map(|(_, p)| p).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn numeric_stem_sort_is_numeric_not_lexicographic() {
        let sorted = sort_by_numeric_stem(paths(&["2.png", "10.png", "1.png"])).unwrap();
        assert_eq!(sorted, paths(&["1.png", "2.png", "10.png"]));
    }

    #[test]
    fn numeric_stem_sort_rejects_non_numeric() {
        let err = sort_by_numeric_stem(paths(&["1.png", "cover.png"])).unwrap_err();
        match err {
            PdforgeError::NonNumericFilename { path } => {
                assert_eq!(path, PathBuf::from("cover.png"));
            }
            other => panic!("expected NonNumericFilename, got {other:?}"),
        }
    }

    #[test]
    fn numeric_stem_sort_ties_break_on_full_path() {
        let sorted = sort_by_numeric_stem(paths(&["3.png", "3.jpg"])).unwrap();
        assert_eq!(sorted, paths(&["3.jpg", "3.png"]));
    }

    #[test]
    fn validate_rejects_missing_file() {
        let err = validate_pdf_path(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, PdforgeError::FileNotFound { .. }));
    }

    #[test]
    fn validate_rejects_non_pdf_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"GIF89a not a pdf at all").unwrap();

        let err = validate_pdf_path(&path).unwrap_err();
        assert!(matches!(err, PdforgeError::NotAPdf { .. }));
    }

    #[test]
    fn validate_accepts_pdf_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.pdf");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"%PDF-1.7\n%fake but magic is right").unwrap();

        validate_pdf_path(&path).unwrap();
    }

    #[test]
    fn numbered_files_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("7")).unwrap();
        std::fs::write(dir.path().join("2.png"), b"x").unwrap();
        std::fs::write(dir.path().join("1.png"), b"x").unwrap();

        let files = numbered_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["1.png", "2.png"]);
    }
}
