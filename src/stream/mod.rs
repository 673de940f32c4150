//! # Output Streams
//!
//! Every column writer emits its bytes into one or more typed streams (present
//! bits, data, lengths, dictionary, row index). Streams are buffered in memory for
//! the duration of a stripe and drained by `flush`; writing them to durable
//! storage is the caller's job.
//!
//! ## Chunk Framing
//!
//! Compressed streams are cut into chunks of at most `compression_block_size` raw
//! bytes. Each chunk starts with a 3-byte little-endian header:
//!
//! ```text
//! header = (chunk_length << 1) | is_original
//! ```
//!
//! `is_original` is set when compression would not shrink the chunk, in which case
//! the raw bytes are stored as-is.
//!
//! ## Positions
//!
//! A recorded stream position is one value for uncompressed streams (bytes
//! written so far) and two values for compressed streams (compressed bytes already
//! emitted, raw bytes buffered in the open chunk). [`seek_stream`] turns those
//! positions back into the byte sequence starting at that point.

mod compression;
mod factory;
mod kind;
mod output;

#[cfg(test)]
mod tests;

pub use factory::{MemoryStreamsFactory, StreamsFactory};
pub use kind::StreamKind;
pub use output::{decompress_stream, seek_stream, OutputStream, StreamData};
