//! # Extraction Tests
//!
//! End-to-end runs over synthesized capture files: map the input, extract,
//! then decode the written images back and check their pixels.

use std::fs;
use std::io::Write;
use std::path::Path;

use pretty_assertions::assert_eq;
use raspa::extract::{self, ErrorPolicy, ExtractConfig};
use raspa::protocol::commands;
use raspa::raster::{ImageEncoder, OutputFormat, RowScan};
use raspa::source::{DEFAULT_MAX_MAP, InputMap};
use raspa::{ExtractSummary, RaspaError};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Build a stream with one sentinel per image followed by its rows.
fn stream(images: &[&[&[u8]]]) -> Vec<u8> {
    let mut data = Vec::new();
    for rows in images {
        data.extend(commands::move_vert_pos(24));
        for row in rows.iter() {
            data.extend(commands::start_row(row));
        }
    }
    data
}

fn write_capture(dir: &Path, data: &[u8]) -> std::path::PathBuf {
    let path = dir.join("capture.prn");
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(data).unwrap();
    path
}

fn run(data: &[u8], config: &ExtractConfig) -> (tempfile::TempDir, ExtractSummary) {
    let dir = tempfile::tempdir().unwrap();
    let capture = write_capture(dir.path(), data);
    let input = InputMap::open(&capture, DEFAULT_MAX_MAP).unwrap();

    let out_dir = extract::output_dir(&dir.path().join("out"), false).unwrap();
    let summary =
        extract::extract_images(&input, &out_dir, &ImageEncoder::new(config.format), config).unwrap();
    (dir, summary)
}

/// Decode an image file into rows of '#' (black) and '.' (white).
fn ascii(path: &Path) -> Vec<String> {
    let img = image::open(path).unwrap().to_luma8();
    (0..img.height())
        .map(|y| {
            (0..img.width())
                .map(|x| if img.get_pixel(x, y).0[0] < 128 { '#' } else { '.' })
                .collect()
        })
        .collect()
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_two_images() {
    let data = stream(&[&[&[0x07, 0x00, 0x05]], &[&[0x03, 0x01]]]);
    let (dir, summary) = run(&data, &ExtractConfig::default());

    assert_eq!(summary.images_seen, 2);
    assert_eq!(summary.images_written, 2);

    let out = dir.path().join("out");
    assert_eq!(ascii(&out.join("1.bmp")), vec![".....###.............#.#"]);
    assert_eq!(ascii(&out.join("2.bmp")), vec!["......##.......#"]);
}

#[test]
fn test_ragged_rows_are_padded() {
    let data = stream(&[&[&[0xFF, 0xFF, 0xFF], &[0x80], &[0x01, 0x01]]]);
    let (dir, summary) = run(&data, &ExtractConfig::default());

    assert_eq!(summary.images_written, 1);
    assert_eq!(
        ascii(&dir.path().join("out").join("1.bmp")),
        vec![
            "########################",
            "#.......................",
            ".......#.......#........",
        ]
    );
}

#[test]
fn test_png_output() {
    let data = stream(&[&[&[0xF0], &[0x0F]]]);
    let config = ExtractConfig {
        format: OutputFormat::Png,
        ..Default::default()
    };
    let (dir, summary) = run(&data, &config);

    let path = dir.path().join("out").join("1.png");
    assert_eq!(summary.outputs, vec![path.clone()]);
    assert_eq!(ascii(&path), vec!["####....", "....####"]);
}

#[test]
fn test_empty_first_row_is_skipped() {
    let data = stream(&[&[&[], &[0xFF]], &[&[0xAA]]]);
    let (dir, summary) = run(&data, &ExtractConfig::default());

    assert_eq!(summary.images_seen, 2);
    assert_eq!(summary.images_skipped, 1);
    assert_eq!(summary.images_written, 1);
    assert!(!dir.path().join("out").join("1.bmp").exists());
    assert_eq!(ascii(&dir.path().join("out").join("2.bmp")), vec!["#.#.#.#."]);
}

#[test]
fn test_no_sentinels_writes_nothing() {
    let mut data = commands::start_row(&[0xFF, 0xFF]);
    data.extend_from_slice(b"\x1b@ plain text \x0c");
    let (dir, summary) = run(&data, &ExtractConfig::default());

    assert_eq!(summary, ExtractSummary::default());
    assert_eq!(fs::read_dir(dir.path().join("out")).unwrap().count(), 0);
}

#[test]
fn test_empty_file() {
    let (_dir, summary) = run(&[], &ExtractConfig::default());
    assert_eq!(summary.images_seen, 0);
}

#[test]
fn test_preamble_is_ignored() {
    let mut data = b"\x1b@\x1bx\x01 header bytes".to_vec();
    data.extend(stream(&[&[&[0x81]]]));
    let (dir, _summary) = run(&data, &ExtractConfig::default());

    assert_eq!(ascii(&dir.path().join("out").join("1.bmp")), vec!["#......#"]);
}

#[test]
fn test_signature_inside_payload() {
    // 0x62 inside a payload is also a row command under overlapping scan
    let data = stream(&[&[&[0x62, 0x01, 0x00, 0xFF]]]);
    let skip_payload = ExtractConfig {
        row_scan: RowScan::SkipPayload,
        ..Default::default()
    };

    let overlapping = extract::survey(&data, ExtractConfig::default().reconstruct());
    let skipping = extract::survey(&data, skip_payload.reconstruct());
    assert_eq!(overlapping[0].rows, 2);
    assert_eq!(skipping[0].rows, 1);

    let (dir, _summary) = run(&data, &ExtractConfig::default());
    assert_eq!(
        ascii(&dir.path().join("out").join("1.bmp")),
        vec![
            ".##...#........#........########",
            "########........................",
        ]
    );
}

#[test]
fn test_truncated_region_best_effort_and_fail_fast() {
    let mut data = commands::move_vert_pos(24);
    data.extend_from_slice(&commands::start_row_header(500));
    data.extend(stream(&[&[&[0xFF]]]));

    let (dir, summary) = run(&data, &ExtractConfig::default());
    assert_eq!(summary.faults, 1);
    assert_eq!(summary.outputs, vec![dir.path().join("out").join("2.bmp")]);

    let dir = tempfile::tempdir().unwrap();
    let config = ExtractConfig {
        policy: ErrorPolicy::FailFast,
        ..Default::default()
    };
    let err =
        extract::extract_images(&data, dir.path(), &ImageEncoder::default(), &config).unwrap_err();
    assert!(matches!(err, RaspaError::Decode(_)));
}

#[test]
fn test_mapping_window_cuts_stream() {
    let data = stream(&[&[&[0xFF]], &[&[0xFF]]]);
    let dir = tempfile::tempdir().unwrap();
    let capture = write_capture(dir.path(), &data);

    // The window ends inside the second sentinel
    let input = InputMap::open(&capture, 12).unwrap();
    assert!(input.is_truncated());

    let summary = extract::extract_images(
        &input,
        dir.path(),
        &ImageEncoder::default(),
        &ExtractConfig::default(),
    )
    .unwrap();
    assert_eq!(summary.images_seen, 1);
    assert_eq!(summary.images_written, 1);
}

#[test]
fn test_mapping_window_cuts_last_payload() {
    let data = stream(&[&[&[0xF0]], &[&[0x0F], &[0xAA, 0xAA, 0xAA]]]);
    let dir = tempfile::tempdir().unwrap();
    let capture = write_capture(dir.path(), &data);

    // Second image: sentinel at 10, rows at 16 and 20; the window ends
    // inside the payload of the row at 20
    let input = InputMap::open(&capture, 25).unwrap();
    assert!(input.is_truncated());

    let out = dir.path().join("out");
    let out = extract::output_dir(&out, false).unwrap();
    let summary = extract::extract_images(
        &input,
        &out,
        &ImageEncoder::default(),
        &ExtractConfig::default(),
    )
    .unwrap();

    assert_eq!(summary.images_seen, 2);
    assert_eq!(summary.images_written, 2);
    assert_eq!(summary.faults, 1);
    assert_eq!(ascii(&out.join("1.bmp")), vec!["####...."]);
    assert_eq!(ascii(&out.join("2.bmp")), vec!["....####"]);
}

#[test]
fn test_timestamped_output_dir() {
    let base = tempfile::tempdir().unwrap();
    let out = extract::output_dir(base.path(), true).unwrap();

    let summary = extract::extract_images(
        &stream(&[&[&[0x01]]]),
        &out,
        &ImageEncoder::default(),
        &ExtractConfig::default(),
    )
    .unwrap();

    assert_eq!(summary.outputs, vec![out.join("1.bmp")]);
    assert!(out.starts_with(base.path()));
}
