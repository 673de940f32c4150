use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod demo;
mod info;
mod validate;

mod config;
mod profile;

pub use profile::Profile;

/// colstripe - columnar stripe writer toolkit
#[derive(Parser)]
#[command(name = "colstripe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Writer profile for optimizing speed vs compression.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ProfileArg {
    /// Prioritize speed over compression
    Fast,
    /// Balance between speed and compression
    #[default]
    Balanced,
    /// Maximum compression, slower writes
    MaxCompression,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Fast => Profile::Fast,
            ProfileArg::Balanced => Profile::Balanced,
            ProfileArg::MaxCompression => Profile::MaxCompression,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write a synthetic nested dataset
    Demo {
        /// Output file path
        #[arg(value_name = "OUTPUT", default_value = "demo.cstr")]
        output: PathBuf,

        /// Number of rows to generate
        #[arg(short = 'n', long, default_value_t = 100_000)]
        rows: usize,

        /// Writer profile (fast, balanced, max-compression)
        #[arg(short = 'p', long, default_value = "balanced", value_enum)]
        profile: ProfileArg,

        /// Load writer settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        // === Advanced tuning flags (hidden from --help) ===
        /// Rows per row group (0 disables the row index)
        #[arg(short = 's', long, hide = true)]
        row_index_stride: Option<usize>,

        /// Stripe size in bytes
        #[arg(long, hide = true)]
        stripe_size: Option<u64>,
    },

    /// Display the footer of a columnar stripe file
    Info {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Also list every stripe
        #[arg(long)]
        stripes: bool,
    },

    /// Validate file integrity
    Validate {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Demo {
            output,
            rows,
            profile,
            config,
            row_index_stride,
            stripe_size,
        } => demo::run(
            output,
            rows,
            Profile::from(profile),
            config,
            row_index_stride,
            stripe_size,
        ),
        Commands::Info { file, stripes } => info::run(file, stripes),
        Commands::Validate { file } => validate::run(file),
    }
}
