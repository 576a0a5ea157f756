//! CLI entry point for per-band GeoTIFF normalization

use bandnorm::io::cli::{Cli, PipelineRunner};
use bandnorm::io::logging::init_logging;
use clap::Parser;

fn main() -> bandnorm::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level());
    let mut processor = PipelineRunner::new(cli);
    processor.process().map(|_| ())
}
