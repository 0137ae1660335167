//! Regression tests for the picslide command line tool.

use std::path::{Path, PathBuf};
use std::process::Command;

use clap::Parser;
use image::{GrayImage, Luma};

use picslide::cli::Cli;
use picslide::error::ScriptError;
use picslide::hypersurface::{hypersurface_allclose, read_hypersurface, ATOL, RTOL};
use picslide::slide::slide_images;

const BIN: &str = env!("CARGO_BIN_EXE_picslide");

/// Deterministic high-entropy texture; each pixel is an avalanche hash of
/// its flat index, so no translated window resembles another.
fn texture_pixel(r: u32, c: u32) -> u8 {
    let mut x = r * 131 + c;
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x as u8
}

fn write_texture_png(path: &Path, width: u32, height: u32) {
    let img = GrayImage::from_fn(width, height, |x, y| Luma([texture_pixel(y, x)]));
    img.save(path).expect("failed to write test image");
}

/// Writes the crop of the texture starting at (dy, dx) as its own image.
fn write_texture_crop_png(path: &Path, dy: u32, dx: u32, width: u32, height: u32) {
    let img = GrayImage::from_fn(width, height, |x, y| Luma([texture_pixel(dy + y, dx + x)]));
    img.save(path).expect("failed to write test image");
}

fn parse_cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("picslide").chain(args.iter().copied()))
}

#[test]
fn script_error_writes_one_line_and_exits_1() {
    let workdir = tempfile::tempdir().expect("no tempdir");
    let base = workdir.path().join("base.png");
    write_texture_png(&base, 16, 16);
    let missing = workdir.path().join("missing.png");
    let outfile = workdir.path().join("hypersurface_cur.dat");

    let output = Command::new(BIN)
        .arg(&base)
        .arg(&missing)
        .arg("-o")
        .arg(&outfile)
        .output()
        .expect("failed to spawn picslide");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).expect("stderr not utf-8");
    let expected = format!(
        "ScriptError: Invalid input path: {} does not exist or is not a file\n",
        missing.display()
    );
    assert_eq!(stderr, expected);
    assert!(!outfile.exists());
}

#[test]
fn successful_run_exits_0_with_empty_stderr() {
    let workdir = tempfile::tempdir().expect("no tempdir");
    let base = workdir.path().join("base.png");
    let sub = workdir.path().join("sub.png");
    write_texture_png(&base, 24, 18);
    write_texture_crop_png(&sub, 4, 6, 10, 8);
    let outfile = workdir.path().join("hypersurface_cur.dat");

    let output = Command::new(BIN)
        .arg(&base)
        .arg(&sub)
        .arg("-o")
        .arg(&outfile)
        .output()
        .expect("failed to spawn picslide");

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stderr.is_empty());

    let surface = read_hypersurface(&outfile).expect("output did not parse");
    assert_eq!(surface.dim(), (18 - 8 + 1, 24 - 10 + 1));
}

#[test]
fn argument_errors_bypass_the_script_error_channel() {
    // A malformed option is a usage error, not an expected slide failure:
    // no "ScriptError:" line, and clap's distinct exit code.
    let output = Command::new(BIN)
        .args(["base.png", "sub.png", "--bins", "whale"])
        .output()
        .expect("failed to spawn picslide");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).expect("stderr not utf-8");
    assert!(!stderr.contains("ScriptError:"));
}

#[test]
fn json_report_names_the_best_offset() {
    let workdir = tempfile::tempdir().expect("no tempdir");
    let base = workdir.path().join("base.png");
    let sub = workdir.path().join("sub.png");
    write_texture_png(&base, 40, 40);
    write_texture_crop_png(&sub, 9, 13, 20, 20);
    let outfile = workdir.path().join("hypersurface_cur.dat");

    let output = Command::new(BIN)
        .arg(&base)
        .arg(&sub)
        .arg("-o")
        .arg(&outfile)
        .args(["--bins", "8", "--json"])
        .output()
        .expect("failed to spawn picslide");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).expect("stdout not utf-8");
    let json_start = stdout.find('{').expect("no JSON object on stdout");
    let report: serde_json::Value =
        serde_json::from_str(&stdout[json_start..]).expect("report did not parse");

    assert_eq!(report["best_dy"], 9);
    assert_eq!(report["best_dx"], 13);
    assert_eq!(report["surface_rows"], 21);
    assert_eq!(report["surface_cols"], 21);
}

#[test]
fn core_planted_patch_regression() {
    let workdir = tempfile::tempdir().expect("no tempdir");
    let base_file = workdir.path().join("base.png");
    let sub_file = workdir.path().join("sub.png");
    write_texture_png(&base_file, 40, 40);
    write_texture_crop_png(&sub_file, 9, 13, 20, 20);
    let outfile = workdir.path().join("hypersurface_cur.dat");

    let cli = parse_cli(&[
        base_file.to_str().unwrap(),
        sub_file.to_str().unwrap(),
        "-o",
        outfile.to_str().unwrap(),
        "--bins",
        "8",
    ]);
    picslide::run(&cli).expect("run failed");

    // The written surface must match an independent in-process slide of
    // the same pixels within the regression tolerances.
    let written = read_hypersurface(&outfile).expect("output did not parse");
    let base = picslide::image_loader::load_gray_image(&base_file).expect("load failed");
    let sub = picslide::image_loader::load_gray_image(&sub_file).expect("load failed");
    let reference = slide_images(&base, &sub, 8).expect("slide failed");
    assert!(hypersurface_allclose(
        &written,
        &reference.hypersurface,
        RTOL,
        ATOL
    ));

    // And its maximum must sit where the patch was planted.
    let (mut best, mut best_mi) = ((0usize, 0usize), f64::NEG_INFINITY);
    for ((dy, dx), &mi) in written.indexed_iter() {
        if mi > best_mi {
            best = (dy, dx);
            best_mi = mi;
        }
    }
    assert_eq!(best, (9, 13));
}

#[test]
fn invalid_infile_raises_script_error() {
    let workdir = tempfile::tempdir().expect("no tempdir");
    let base_file = workdir.path().join("base.png");
    write_texture_png(&base_file, 16, 16);
    let missing = workdir.path().join("missing.png");
    let outfile = workdir.path().join("hypersurface_cur.dat");

    let cli = parse_cli(&[
        base_file.to_str().unwrap(),
        missing.to_str().unwrap(),
        "-o",
        outfile.to_str().unwrap(),
    ]);
    let err = picslide::run(&cli).expect_err("run should fail");
    let script_error = err
        .downcast::<ScriptError>()
        .expect("failure was not a ScriptError");
    assert!(matches!(script_error, ScriptError::InvalidInputPath(_)));
}

#[test]
fn oversized_sub_raises_script_error() {
    let workdir = tempfile::tempdir().expect("no tempdir");
    let base_file = workdir.path().join("base.png");
    let sub_file = workdir.path().join("sub.png");
    write_texture_png(&base_file, 8, 8);
    write_texture_png(&sub_file, 12, 12);
    let outfile = workdir.path().join("hypersurface_cur.dat");

    let cli = parse_cli(&[
        base_file.to_str().unwrap(),
        sub_file.to_str().unwrap(),
        "-o",
        outfile.to_str().unwrap(),
    ]);
    let err = picslide::run(&cli).expect_err("run should fail");
    let script_error = err
        .downcast::<ScriptError>()
        .expect("failure was not a ScriptError");
    assert!(matches!(
        script_error,
        ScriptError::SubImageDoesNotFit { .. }
    ));
}

#[test]
fn unwritable_output_raises_script_error() {
    let workdir = tempfile::tempdir().expect("no tempdir");
    let base_file = workdir.path().join("base.png");
    let sub_file = workdir.path().join("sub.png");
    write_texture_png(&base_file, 16, 16);
    write_texture_crop_png(&sub_file, 2, 3, 6, 6);
    let outfile: PathBuf = workdir.path().join("no_such_dir").join("out.dat");

    let cli = parse_cli(&[
        base_file.to_str().unwrap(),
        sub_file.to_str().unwrap(),
        "-o",
        outfile.to_str().unwrap(),
    ]);
    let err = picslide::run(&cli).expect_err("run should fail");
    let script_error = err
        .downcast::<ScriptError>()
        .expect("failure was not a ScriptError");
    assert!(matches!(
        script_error,
        ScriptError::HypersurfaceWrite { .. }
    ));
}

#[test]
fn missing_positional_arguments_fail_parsing() {
    assert!(Cli::try_parse_from(["picslide"]).is_err());
    assert!(Cli::try_parse_from(["picslide", "base.png"]).is_err());
    assert!(Cli::try_parse_from(["picslide", "base.png", "sub.png"]).is_ok());
}
