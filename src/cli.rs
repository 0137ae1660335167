use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Slides pictures on top of each other so that the most suitable overlap arises, in terms of mutual information."
)]
pub struct Cli {
    /// The base image the sub image is slid across.
    #[arg(required = true)]
    pub base: PathBuf,

    /// The sub image. Must fit entirely inside the base image.
    #[arg(required = true)]
    pub sub: PathBuf,

    /// File to write the mutual information hypersurface to.
    #[arg(short, long, default_value = "hypersurface.dat")]
    pub output: PathBuf,

    /// Number of histogram bins used for the metric (2..=256).
    #[arg(long, default_value_t = 256)]
    pub bins: usize,

    /// Print the final report as JSON instead of plain text.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Print debug info about the loaded images and the search grid.
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}
