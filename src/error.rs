use std::path::PathBuf;
use thiserror::Error;

/// Expected, user-correctable failures raised by the slide pipeline.
///
/// Exactly one of these is rendered at the top level as a single
/// `ScriptError: <message>` line with exit code 1. Every other failure
/// category is an internal fault and propagates unhandled.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Invalid input path: {0} does not exist or is not a file")]
    InvalidInputPath(PathBuf),

    #[error("Cannot decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Sub image ({sub_w}x{sub_h}) does not fit inside base image ({base_w}x{base_h})")]
    SubImageDoesNotFit {
        base_w: usize,
        base_h: usize,
        sub_w: usize,
        sub_h: usize,
    },

    #[error("Histogram bin count {0} is out of range (2..=256)")]
    InvalidBinCount(usize),

    #[error("Cannot write hypersurface to {path}: {source}")]
    HypersurfaceWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed hypersurface data: {0}")]
    MalformedHypersurface(String),

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}
