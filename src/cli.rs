//! CLI argument definitions using clap derive macros.

use clap::Parser;

/// Bulk download studio comparison scene samples.
///
/// Walks every lighting, camera, format and ISO combination of the studio
/// scene and saves both the processed and the original image of each into
/// downloads/stills/<lighting>/<camera>/<format>/. Files already on disk are
/// skipped, so an interrupted run can simply be restarted.
#[derive(Parser, Debug)]
#[command(name = "studio-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// Number of combinations to download (0 downloads all of them)
    #[arg(long, default_value_t = 0)]
    pub num_images: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
