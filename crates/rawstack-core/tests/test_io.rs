#[allow(dead_code)]
mod common;

use std::sync::Arc;

use tempfile::TempDir;

use rawstack_core::calibration::{calibrate_frame, CALIBRATION_FORMAT};
use rawstack_core::error::StackError;
use rawstack_core::frame::Frame;
use rawstack_core::io::{clean_stale_artifacts, discover_frames};
use rawstack_core::normalize::normalize_frame;
use rawstack_core::tools::Tool;

use common::{arg, file_names, make_frames, ScriptedRunner};

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[test]
fn test_discover_sorts_and_filters_by_extension() {
    let dir = TempDir::new().unwrap();
    make_frames(
        dir.path(),
        &["c.ARW", "a.nef", "b.CR3", "readme.txt", "preview.jpg", "d.tif"],
    );

    let frames = discover_frames(dir.path()).unwrap();
    let names: Vec<String> = frames.iter().map(|f| f.stem()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_discover_skips_previous_outputs_and_temporaries() {
    let dir = TempDir::new().unwrap();
    make_frames(
        dir.path(),
        &[
            "A.nef",
            "A.dng",
            "A-stack2_median.dng",
            "temp.dng",
            "B-temp.dng",
            "X.dng",
        ],
    );

    let frames = discover_frames(dir.path()).unwrap();
    let names: Vec<String> = frames
        .iter()
        .map(|f| f.source().file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["A.nef", "X.dng"]);
}

#[test]
fn test_discover_rejects_shared_stems() {
    let dir = TempDir::new().unwrap();
    make_frames(dir.path(), &["A.cr2", "A.nef", "B.nef"]);

    let err = discover_frames(dir.path()).unwrap_err();
    match err {
        StackError::DuplicateStem { stem, first, second } => {
            assert_eq!(stem, "A");
            assert_eq!(first, dir.path().join("A.cr2"));
            assert_eq!(second, dir.path().join("A.nef"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_discover_empty_directory() {
    let dir = TempDir::new().unwrap();
    assert!(discover_frames(dir.path()).unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Stale artifact cleanup
// ---------------------------------------------------------------------------

#[test]
fn test_cleanup_removes_temporaries() {
    let dir = TempDir::new().unwrap();
    make_frames(
        dir.path(),
        &["temp.dng", "temp.tif", "temp.xmp", "A.tif", "A.nef", "A.dng"],
    );

    let removed = clean_stale_artifacts(dir.path()).unwrap();

    assert_eq!(removed.len(), 4);
    assert_eq!(file_names(dir.path()), vec!["A.dng", "A.nef"]);
}

#[test]
fn test_cleanup_is_idempotent() {
    let dir = TempDir::new().unwrap();
    make_frames(dir.path(), &["temp.dng", "B.tif", "B.raw"]);

    clean_stale_artifacts(dir.path()).unwrap();
    let after_once = file_names(dir.path());
    let removed = clean_stale_artifacts(dir.path()).unwrap();
    let after_twice = file_names(dir.path());

    assert!(removed.is_empty());
    assert_eq!(after_once, after_twice);
    assert_eq!(after_twice, vec!["B.raw"]);
}

// ---------------------------------------------------------------------------
// Normalizer and calibration reader
// ---------------------------------------------------------------------------

#[test]
fn test_normalize_converts_and_renders_raster() {
    let dir = TempDir::new().unwrap();
    let frame = make_frames(dir.path(), &["A.cr2"]).remove(0);
    let runner = Arc::new(ScriptedRunner::new());
    let toolchain = common::toolchain(dir.path(), runner.clone());

    let frame = normalize_frame(&toolchain, frame).unwrap();

    assert_eq!(frame.normalized_dng().unwrap(), dir.path().join("A.dng"));
    assert_eq!(frame.raster().unwrap(), dir.path().join("A.tif"));
    assert!(!dir.path().join("A-temp.dng").exists());

    let tools: Vec<Tool> = runner.calls().iter().map(|c| c.tool).collect();
    assert_eq!(tools, vec![Tool::DngConverter, Tool::ExifTool, Tool::DngValidate]);

    let strip = runner.calls_for(Tool::ExifTool)[0].args_lossy();
    assert_eq!(
        strip,
        vec![
            "-OpcodeList3=".to_string(),
            "-OpcodeList2=".to_string(),
            arg(&dir.path().join("A.dng")),
            "-o".to_string(),
            arg(&dir.path().join("A-temp.dng")),
        ]
    );
}

#[test]
fn test_normalize_keeps_uppercase_dng_source() {
    let dir = TempDir::new().unwrap();
    let frame = make_frames(dir.path(), &["A.DNG"]).remove(0);
    let runner = Arc::new(ScriptedRunner::new());
    let toolchain = common::toolchain(dir.path(), runner.clone());

    let frame = normalize_frame(&toolchain, frame).unwrap();

    assert_eq!(frame.normalized_dng().unwrap(), dir.path().join("A.DNG"));
    assert!(runner.calls_for(Tool::DngConverter).is_empty());
}

#[test]
fn test_calibrate_frame_reads_values() {
    let dir = TempDir::new().unwrap();
    let frame = make_frames(dir.path(), &["A.dng"]).remove(0);
    let runner = Arc::new(ScriptedRunner::new().with_calibration("A", 1024.0, 15000.0, 0.25));
    let toolchain = common::toolchain(dir.path(), runner.clone());

    let frame = normalize_frame(&toolchain, frame).unwrap();
    let frame = calibrate_frame(&toolchain, frame).unwrap();

    let cal = frame.calibration().unwrap();
    assert_eq!(cal.black_level, 1024.0);
    assert_eq!(cal.white_level, 15000.0);
    assert_eq!(cal.exposure_time, 0.25);

    let query = runner.calls().last().unwrap().args_lossy();
    assert_eq!(query[..3], ["-n", "-p", CALIBRATION_FORMAT]);
}

#[test]
fn test_calibrate_requires_normalized_frame() {
    let dir = TempDir::new().unwrap();
    let toolchain = common::toolchain(dir.path(), Arc::new(ScriptedRunner::new()));

    let err = calibrate_frame(&toolchain, Frame::new(dir.path().join("A.raw"))).unwrap_err();
    assert!(matches!(err, StackError::CalibrationRead { .. }), "got: {err}");
}
