use crate::stream::{OutputStream, StreamData};
use crate::writer::WriterError;

use super::{ByteRleEncoder, PositionRecorder};

/// Bit-packing encoder over a byte RLE
#[derive(Debug)]
pub struct BooleanEncoder {
    rle: ByteRleEncoder,
    current: u8,
    bits_left: u8,
}

impl BooleanEncoder {
    /// Wraps an output stream
    pub fn new(output: OutputStream) -> Self {
        Self {
            rle: ByteRleEncoder::new(output),
            current: 0,
            bits_left: 8,
        }
    }

    /// Encodes one bit
    pub fn write(&mut self, value: bool) -> Result<(), WriterError> {
        self.bits_left -= 1;
        if value {
            self.current |= 1 << self.bits_left;
        }
        if self.bits_left == 0 {
            self.write_byte()?;
        }
        Ok(())
    }

    fn write_byte(&mut self) -> Result<(), WriterError> {
        self.rle.write(self.current)?;
        self.current = 0;
        self.bits_left = 8;
        Ok(())
    }

    /// Records the byte RLE position plus the bits in the open byte
    pub fn record_position(&self, recorder: &mut dyn PositionRecorder) {
        self.rle.record_position(recorder);
        recorder.add(u64::from(8 - self.bits_left));
    }

    /// Buffered bytes, open byte included
    pub fn estimated_size(&self) -> u64 {
        self.rle.estimated_size() + 1
    }

    /// Pads the open byte with zero bits and drains the stream
    pub fn flush(&mut self) -> Result<StreamData, WriterError> {
        if self.bits_left != 8 {
            self.write_byte()?;
        }
        self.rle.flush()
    }
}
