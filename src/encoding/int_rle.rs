use crate::stream::{OutputStream, StreamData};
use crate::writer::WriterError;

use super::{PositionRecorder, MAX_LITERAL_SIZE, MAX_REPEAT_SIZE, MIN_REPEAT_SIZE};

const MIN_DELTA: i64 = -128;
const MAX_DELTA: i64 = 127;

pub(crate) fn zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

pub(crate) fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Integer run-length encoder (version 1).
///
/// Arithmetic wraps, so deltas between extreme values round-trip as long as the
/// reader wraps too.
#[derive(Debug)]
pub struct IntRleEncoder {
    output: OutputStream,
    signed: bool,
    literals: [i64; MAX_LITERAL_SIZE],
    num_literals: usize,
    delta: i64,
    repeat: bool,
    tail_run_length: usize,
    scratch: Vec<u8>,
}

impl IntRleEncoder {
    /// Wraps an output stream; `signed` selects zigzag varints
    pub fn new(output: OutputStream, signed: bool) -> Self {
        Self {
            output,
            signed,
            literals: [0; MAX_LITERAL_SIZE],
            num_literals: 0,
            delta: 0,
            repeat: false,
            tail_run_length: 0,
            scratch: Vec::with_capacity(16),
        }
    }

    /// Encodes one value
    pub fn write(&mut self, value: i64) -> Result<(), WriterError> {
        if self.num_literals == 0 {
            self.literals[0] = value;
            self.num_literals = 1;
            self.tail_run_length = 1;
        } else if self.repeat {
            let expected = self.literals[0]
                .wrapping_add(self.delta.wrapping_mul(self.num_literals as i64));
            if value == expected {
                self.num_literals += 1;
                if self.num_literals == MAX_REPEAT_SIZE {
                    self.write_values()?;
                }
            } else {
                self.write_values()?;
                self.literals[0] = value;
                self.num_literals = 1;
                self.tail_run_length = 1;
            }
        } else {
            let last = self.literals[self.num_literals - 1];
            if self.tail_run_length > 1 && value == last.wrapping_add(self.delta) {
                self.tail_run_length += 1;
            } else {
                self.delta = value.wrapping_sub(last);
                self.tail_run_length = if (MIN_DELTA..=MAX_DELTA).contains(&self.delta) {
                    2
                } else {
                    1
                };
            }
            if self.tail_run_length == MIN_REPEAT_SIZE {
                if self.num_literals + 1 == MIN_REPEAT_SIZE {
                    self.repeat = true;
                    self.num_literals += 1;
                } else {
                    // The last two literals become the head of the run
                    self.num_literals -= MIN_REPEAT_SIZE - 1;
                    let base = self.literals[self.num_literals];
                    self.write_values()?;
                    self.literals[0] = base;
                    self.repeat = true;
                    self.num_literals = MIN_REPEAT_SIZE;
                }
            } else {
                self.literals[self.num_literals] = value;
                self.num_literals += 1;
                if self.num_literals == MAX_LITERAL_SIZE {
                    self.write_values()?;
                }
            }
        }
        Ok(())
    }

    fn push_value(&mut self, value: i64) {
        if self.signed {
            write_varint(&mut self.scratch, zigzag(value));
        } else {
            write_varint(&mut self.scratch, value as u64);
        }
    }

    fn write_values(&mut self) -> Result<(), WriterError> {
        if self.num_literals == 0 {
            return Ok(());
        }
        self.scratch.clear();
        if self.repeat {
            self.scratch.push((self.num_literals - MIN_REPEAT_SIZE) as u8);
            self.scratch.push(self.delta as i8 as u8);
            self.push_value(self.literals[0]);
        } else {
            self.scratch.push((-(self.num_literals as i32)) as u8);
            for i in 0..self.num_literals {
                self.push_value(self.literals[i]);
            }
        }
        self.output.write_bytes(&self.scratch)?;
        self.repeat = false;
        self.num_literals = 0;
        self.tail_run_length = 0;
        Ok(())
    }

    /// Records stream position plus the values buffered in the open run
    pub fn record_position(&self, recorder: &mut dyn PositionRecorder) {
        self.output.record_position(recorder);
        recorder.add(self.num_literals as u64);
    }

    /// Buffered bytes, with a rough size for the pending run
    pub fn estimated_size(&self) -> u64 {
        self.output.buffered_size() + (self.num_literals * 8) as u64
    }

    /// Underlying stream, for columns that also write raw bytes into it
    pub(crate) fn output_mut(&mut self) -> &mut OutputStream {
        &mut self.output
    }

    /// Underlying stream
    pub(crate) fn output(&self) -> &OutputStream {
        &self.output
    }

    /// Emits the open run and drains the stream
    pub fn flush(&mut self) -> Result<StreamData, WriterError> {
        self.write_values()?;
        self.output.flush()
    }
}
