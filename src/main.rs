//! CLI entry point for greedy stochastic stencil placement

use clap::Parser;
use stencilfit::io::cli::{Cli, FileProcessor, init_logging};

fn main() -> stencilfit::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet);
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
