//! # colstripe CLI
//!
//! Command-line companion for the columnar stripe writer.
//!
//! ## Usage
//!
//! ```bash
//! # Write a synthetic nested dataset
//! colstripe demo demo.cstr --rows 250000 --profile max-compression
//!
//! # Show the file footer and stripe directory
//! colstripe info demo.cstr --stripes
//!
//! # Check file integrity
//! colstripe validate demo.cstr
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{dispatch, init_logging, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());
    dispatch(cli)
}
