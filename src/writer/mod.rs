//! # Stripe File Writer
//!
//! This module drives a column writer tree over a whole file.
//!
//! ## File Layout
//!
//! ```text
//! "CSTR"
//! stripe 0: index streams | data streams | stripe footer (JSON)
//! stripe 1: ...
//! file footer (JSON)
//! footer length (u64 LE)
//! "CSTR"
//! ```
//!
//! ## Design Principles
//!
//! 1. **Streaming Architecture**: Rows are encoded into in-memory streams and a
//!    stripe is written out as soon as its estimated size reaches `stripe_size`.
//!
//! 2. **Seekable Row Groups**: Every `row_index_stride` rows the writer closes a
//!    row group, so readers can skip straight to it using the row index.
//!
//! 3. **Self-Describing Files**: The file footer carries the schema, the writer
//!    options, the stripe directory and statistics for every stripe and the file.
//!
//! 4. **Configurable Compression**: Supports ZSTD (default), Zlib, and uncompressed.

mod config;
mod error;
mod file_writer;
mod footer;
mod stats;

#[cfg(test)]
mod tests;

pub use config::{CompressionType, WriterConfig, MAX_COMPRESSION_BLOCK_SIZE};
pub use error::WriterError;
pub use file_writer::ColumnarFileWriter;
pub use footer::{
    read_file_footer, read_range, read_stripe_footer, FileFooter, StreamInfo, StripeFooter,
    StripeInformation, FORMAT_VERSION, MAGIC,
};
pub use stats::WriterStats;
