//! The main library for the `picslide` application.
//!
//! This crate provides the core logic for sliding one picture over another
//! so that the most suitable overlap arises, in terms of mutual
//! information. It orchestrates the flow from command-line arguments to
//! the hypersurface output file and the best-overlap report. The primary
//! entry point is the `run` function, which takes the parsed CLI arguments
//! and executes the slide.
//!
//! The library is structured into several modules:
//! - `cli`: Defines the command-line interface.
//! - `image_loader`: Loads image files as grayscale pixel matrices.
//! - `mutual_info`: The joint-histogram mutual information metric.
//! - `slide`: The exhaustive offset search producing the hypersurface.
//! - `hypersurface`: Text output, parsing and tolerant comparison of
//!   hypersurface files.
//! - `error`: Defines the expected-failure error type.

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

pub mod cli;
pub mod error;
pub mod hypersurface;
pub mod image_loader;
pub mod mutual_info;
pub mod slide;

use crate::cli::Cli;
use crate::error::ScriptError;

/// Summary of one completed slide run.
#[derive(Debug, Serialize)]
pub struct SlideReport {
    /// Path of the base image.
    pub base: PathBuf,
    /// Path of the sub image.
    pub sub: PathBuf,
    /// Best row offset of the sub image inside the base.
    pub best_dy: usize,
    /// Best column offset of the sub image inside the base.
    pub best_dx: usize,
    /// Mutual information at the best offset, in nats.
    pub mutual_information: f64,
    /// Offset-grid rows of the hypersurface.
    pub surface_rows: usize,
    /// Offset-grid columns of the hypersurface.
    pub surface_cols: usize,
    /// Path the hypersurface was written to.
    pub output: PathBuf,
}

/// The main entry point for the application logic.
///
/// This function orchestrates the entire process:
/// 1.  It loads the base and sub images as grayscale pixel matrices.
/// 2.  It slides the sub image over the base and scores every offset.
/// 3.  It writes the mutual information hypersurface to the output file.
/// 4.  It reports the best overlap on stdout.
///
/// # Arguments
///
/// * `cli` - A reference to the `Cli` struct containing parsed command-line arguments.
///
/// # Errors
///
/// Expected failures (bad paths, undecodable images, a sub image that does
/// not fit, an unwritable output file) are returned as `ScriptError`
/// values, never context-wrapped, so the caller can downcast and report
/// them. Anything else is an internal fault.
pub fn run(cli: &Cli) -> Result<()> {
    // 1. Load both images as grayscale pixel matrices.
    println!("Loading '{}'...", cli.base.display());
    let base = image_loader::load_gray_image(&cli.base)?;
    println!("Loading '{}'...", cli.sub.display());
    let sub = image_loader::load_gray_image(&cli.sub)?;

    if cli.debug {
        print_image_stats("base", &base, cli.bins);
        print_image_stats("sub", &sub, cli.bins);
    }

    // 2. Slide the sub image across the base and score every offset.
    let outcome = slide::slide_images(&base, &sub, cli.bins)?;
    let (rows, cols) = outcome.hypersurface.dim();
    if cli.debug {
        println!("  -> Scored {} offsets ({} x {})", rows * cols, rows, cols);
    }

    // 3. Write the hypersurface file.
    let rendered = hypersurface::render_hypersurface(&outcome.hypersurface, &cli.base, &cli.sub);
    fs::write(&cli.output, rendered).map_err(|source| ScriptError::HypersurfaceWrite {
        path: cli.output.clone(),
        source,
    })?;
    println!("  -> Hypersurface saved to '{}'", cli.output.display());

    // 4. Report the best overlap.
    let report = SlideReport {
        base: cli.base.clone(),
        sub: cli.sub.clone(),
        best_dy: outcome.best_offset.0,
        best_dx: outcome.best_offset.1,
        mutual_information: outcome.best_mi,
        surface_rows: rows,
        surface_cols: cols,
        output: cli.output.clone(),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Best overlap at offset (dy={}, dx={}) with {:.6} nats of mutual information.",
            report.best_dy, report.best_dx, report.mutual_information
        );
        println!("Done.");
    }

    Ok(())
}

/// Prints shape and entropy of one loaded image.
fn print_image_stats(label: &str, pixels: &ndarray::Array2<u8>, bins: usize) {
    let (h, w) = pixels.dim();
    let bins = bins.clamp(2, mutual_info::MAX_BINS);
    println!(
        "  -> {}: {} rows x {} cols, entropy {:.6} nats ({} bins)",
        label,
        h,
        w,
        mutual_info::entropy(pixels.view(), bins),
        bins
    );
}
