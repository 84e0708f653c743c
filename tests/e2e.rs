//! End-to-end integration tests for pdforge.
//!
//! These tests exercise the real pdfium library. They are skipped (with a
//! message) when no pdfium is available locally — set `PDFIUM_LIB_PATH`, or
//! install pdfium system-wide, to run them. No test downloads anything.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture

use image::{Rgb, RgbImage};
use pdforge::{
    compose, compose_dir, extract_text, extract_text_first_page, extract_text_range, page_count,
    rasterize, rasterize_with, split, OutputFormat, PdforgeError, RasterizeConfig,
};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless a pdfium library is available without downloading.
/// Evaluates to a bound `Pdfium` for tests that need direct document access.
macro_rules! skip_unless_pdfium {
    () => {
        match pdfium_locator::bind_local() {
            Ok(pdfium) => pdfium,
            Err(_) => {
                println!(
                    "SKIP — no local PDFium library (set PDFIUM_LIB_PATH or install pdfium)"
                );
                return;
            }
        }
    };
}

/// Write a solid-colour RGB PNG of the given size and return its path.
fn png_fixture(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let img = RgbImage::from_pixel(width, height, Rgb([180, 40, 40]));
    img.save(&path).expect("fixture PNG should encode");
    path
}

/// Page sizes of a PDF, in points, rounded to whole numbers.
fn page_sizes(pdfium: &Pdfium, path: &Path) -> Vec<(u32, u32)> {
    let document = pdfium
        .load_pdf_from_file(path, None)
        .expect("test PDF should open");
    document
        .pages()
        .iter()
        .map(|p| (p.width().value.round() as u32, p.height().value.round() as u32))
        .collect()
}

// ── Compose ──────────────────────────────────────────────────────────────────

#[test]
fn compose_one_page_per_image_sized_to_pixels() {
    let pdfium = skip_unless_pdfium!();
    let dir = TempDir::new().unwrap();

    let images = vec![
        png_fixture(dir.path(), "a.png", 120, 80),
        png_fixture(dir.path(), "b.png", 200, 150),
        png_fixture(dir.path(), "c.png", 64, 64),
    ];
    let out = dir.path().join("album.pdf");

    let summary = compose(&images, &out).expect("compose should succeed");
    assert_eq!(summary.pages, 3);
    assert_eq!(page_count(&out).unwrap(), 3);

    assert_eq!(
        page_sizes(&pdfium, &out),
        vec![(120, 80), (200, 150), (64, 64)],
        "page sizes must match source pixel dimensions, in input order"
    );
}

#[test]
fn compose_dir_orders_by_numeric_stem() {
    let pdfium = skip_unless_pdfium!();
    let dir = TempDir::new().unwrap();
    let scans = dir.path().join("scans");
    std::fs::create_dir(&scans).unwrap();

    // Width encodes the expected position, so ordering is observable.
    png_fixture(&scans, "2.png", 20, 30);
    png_fixture(&scans, "10.png", 100, 30);
    png_fixture(&scans, "1.png", 10, 30);

    let out = dir.path().join("ordered.pdf");
    compose_dir(&scans, &out).expect("compose_dir should succeed");

    let widths: Vec<u32> = page_sizes(&pdfium, &out).iter().map(|s| s.0).collect();
    assert_eq!(widths, vec![10, 20, 100], "numeric, not lexicographic, order");
}

// ── Rasterize (round-trip with compose) ──────────────────────────────────────

#[test]
fn rasterize_roundtrip_preserves_count_and_dimensions() {
    let _pdfium = skip_unless_pdfium!();
    let dir = TempDir::new().unwrap();

    let sizes = [(120u32, 80u32), (200, 150), (64, 64)];
    let images: Vec<PathBuf> = sizes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| png_fixture(dir.path(), &format!("src{i}.png"), w, h))
        .collect();
    let pdf = dir.path().join("scans.pdf");
    compose(&images, &pdf).unwrap();

    let out_dir = dir.path().join("pages");
    let config = RasterizeConfig::builder().format(OutputFormat::Png).build();
    let summary = rasterize_with(&pdf, &out_dir, &config).expect("rasterize should succeed");

    assert_eq!(summary.pages, sizes.len());
    assert_eq!(summary.files.len(), sizes.len());

    for (i, &(w, h)) in sizes.iter().enumerate() {
        let file = out_dir.join(format!("{}.png", i + 1));
        assert!(file.exists(), "missing {}", file.display());
        let decoded = image::open(&file).expect("output should decode");
        assert_eq!((decoded.width(), decoded.height()), (w, h), "page {}", i + 1);
    }
}

#[test]
fn rasterize_default_output_is_jpeg() {
    let _pdfium = skip_unless_pdfium!();
    let dir = TempDir::new().unwrap();

    let image = png_fixture(dir.path(), "only.png", 40, 40);
    let pdf = dir.path().join("one.pdf");
    compose(&[&image], &pdf).unwrap();

    let out_dir = dir.path().join("out");
    let summary = rasterize(&pdf, &out_dir).unwrap();

    assert_eq!(summary.files, vec![out_dir.join("1.jpg")]);
    assert!(out_dir.join("1.jpg").exists());
}

#[test]
fn rasterize_rejects_page_without_embedded_image() {
    let pdfium = skip_unless_pdfium!();
    let dir = TempDir::new().unwrap();

    // A blank page has zero image objects.
    let pdf = dir.path().join("blank.pdf");
    let mut document = pdfium.create_new_pdf().unwrap();
    document
        .pages_mut()
        .create_page_at_end(PdfPagePaperSize::a4())
        .unwrap();
    document.save_to_file(&pdf).unwrap();

    let err = rasterize(&pdf, &dir.path().join("out")).unwrap_err();
    match err {
        PdforgeError::UnexpectedImageCount { page, count } => {
            assert_eq!(page, 1);
            assert_eq!(count, 0);
        }
        other => panic!("expected UnexpectedImageCount, got {other:?}"),
    }
}

// ── Split ────────────────────────────────────────────────────────────────────

#[test]
fn split_partitions_and_preserves_page_order() {
    let pdfium = skip_unless_pdfium!();
    let dir = TempDir::new().unwrap();

    // Five pages with widths 10..50 so order survives observation.
    let images: Vec<PathBuf> = (1..=5u32)
        .map(|i| png_fixture(dir.path(), &format!("{i}.png"), i * 10, 25))
        .collect();
    let pdf = dir.path().join("five.pdf");
    compose(&images, &pdf).unwrap();

    let parts_dir = dir.path().join("parts");
    let summary = split(&pdf, &parts_dir, 2).expect("split should succeed");
    assert_eq!(summary.parts, 3, "ceil(5 / 2) parts");

    let expected_counts = [2usize, 2, 1];
    let mut concatenated_widths = Vec::new();
    for (i, expected) in expected_counts.iter().enumerate() {
        let part = parts_dir.join(format!("{}.pdf", i + 1));
        assert_eq!(page_count(&part).unwrap(), *expected, "part {}", i + 1);
        concatenated_widths.extend(page_sizes(&pdfium, &part).iter().map(|s| s.0));
    }
    assert_eq!(
        concatenated_widths,
        vec![10, 20, 30, 40, 50],
        "concatenating parts in filename order must reproduce the source sequence"
    );
}

#[test]
fn split_single_part_when_k_exceeds_page_count() {
    let _pdfium = skip_unless_pdfium!();
    let dir = TempDir::new().unwrap();

    let image = png_fixture(dir.path(), "1.png", 30, 30);
    let pdf = dir.path().join("one.pdf");
    compose(&[&image], &pdf).unwrap();

    let summary = split(&pdf, &dir.path().join("parts"), 100).unwrap();
    assert_eq!(summary.parts, 1);
    assert_eq!(page_count(&summary.files[0]).unwrap(), 1);
}

// ── Text extraction & page count ─────────────────────────────────────────────

#[test]
fn full_range_default_matches_explicit_full_range() {
    let _pdfium = skip_unless_pdfium!();
    let dir = TempDir::new().unwrap();

    let images = vec![
        png_fixture(dir.path(), "1.png", 50, 50),
        png_fixture(dir.path(), "2.png", 50, 50),
    ];
    let pdf = dir.path().join("two.pdf");
    compose(&images, &pdf).unwrap();

    let total = page_count(&pdf).unwrap();
    let full = extract_text(&pdf).unwrap();
    let explicit = extract_text_range(&pdf, 1, total).unwrap();
    assert_eq!(full, explicit);

    let first = extract_text_first_page(&pdf).unwrap();
    assert_eq!(first, extract_text_range(&pdf, 1, 1).unwrap());
}

#[test]
fn out_of_range_extraction_is_a_typed_error() {
    let _pdfium = skip_unless_pdfium!();
    let dir = TempDir::new().unwrap();

    let images = vec![
        png_fixture(dir.path(), "1.png", 50, 50),
        png_fixture(dir.path(), "2.png", 50, 50),
    ];
    let pdf = dir.path().join("two.pdf");
    compose(&images, &pdf).unwrap();

    let err = extract_text_range(&pdf, 1, 5).unwrap_err();
    match err {
        PdforgeError::PageOutOfRange { page, total } => {
            assert_eq!(page, 5);
            assert_eq!(total, 2);
        }
        other => panic!("expected PageOutOfRange, got {other:?}"),
    }
}

#[test]
fn page_count_matches_composed_input_count() {
    let _pdfium = skip_unless_pdfium!();
    let dir = TempDir::new().unwrap();

    let images: Vec<PathBuf> = (1..=4u32)
        .map(|i| png_fixture(dir.path(), &format!("{i}.png"), 32, 32))
        .collect();
    let pdf = dir.path().join("four.pdf");
    compose(&images, &pdf).unwrap();

    assert_eq!(page_count(&pdf).unwrap(), 4);
}
