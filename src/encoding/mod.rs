//! # Value Encoders
//!
//! Run-length encoders layered on top of an [`OutputStream`](crate::stream::OutputStream):
//!
//! - [`ByteRleEncoder`]: runs of 3..=130 equal bytes or literal groups of up to 128 bytes
//! - [`BooleanEncoder`]: bits packed MSB-first into bytes, fed to a byte RLE
//! - [`IntRleEncoder`]: runs of 3..=130 values with a constant delta in -128..=127,
//!   or literal groups of up to 128 base-128 varints (zigzag for signed values)
//!
//! Each encoder records its position as the underlying stream position followed
//! by the number of values still buffered in the current run, so a reader can seek
//! to the stream position and skip that many values.

mod boolean;
mod byte_rle;
mod int_rle;

#[cfg(test)]
pub(crate) mod decode;

pub use boolean::BooleanEncoder;
pub use byte_rle::ByteRleEncoder;
pub use int_rle::IntRleEncoder;

/// Minimum run length emitted as a run
pub(crate) const MIN_REPEAT_SIZE: usize = 3;
/// Maximum run length
pub(crate) const MAX_REPEAT_SIZE: usize = 127 + MIN_REPEAT_SIZE;
/// Maximum literal group length
pub(crate) const MAX_LITERAL_SIZE: usize = 128;

/// Sink for the stream positions that make up a row-index entry
pub trait PositionRecorder {
    /// Appends one position value
    fn add(&mut self, position: u64);
}

impl PositionRecorder for Vec<u64> {
    fn add(&mut self, position: u64) {
        self.push(position);
    }
}
