use crate::stream::{OutputStream, StreamData};
use crate::writer::WriterError;

use super::{PositionRecorder, MAX_LITERAL_SIZE, MAX_REPEAT_SIZE, MIN_REPEAT_SIZE};

/// Byte run-length encoder
#[derive(Debug)]
pub struct ByteRleEncoder {
    output: OutputStream,
    literals: [u8; MAX_LITERAL_SIZE],
    num_literals: usize,
    repeat: bool,
    tail_run_length: usize,
}

impl ByteRleEncoder {
    /// Wraps an output stream
    pub fn new(output: OutputStream) -> Self {
        Self {
            output,
            literals: [0; MAX_LITERAL_SIZE],
            num_literals: 0,
            repeat: false,
            tail_run_length: 0,
        }
    }

    /// Encodes one byte
    pub fn write(&mut self, value: u8) -> Result<(), WriterError> {
        if self.num_literals == 0 {
            self.literals[0] = value;
            self.num_literals = 1;
            self.tail_run_length = 1;
        } else if self.repeat {
            if value == self.literals[0] {
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
            if value == self.literals[self.num_literals - 1] {
                self.tail_run_length += 1;
            } else {
                self.tail_run_length = 1;
            }
            if self.tail_run_length == MIN_REPEAT_SIZE {
                if self.num_literals + 1 == MIN_REPEAT_SIZE {
                    self.repeat = true;
                    self.num_literals += 1;
                } else {
                    // Emit the literals before the run, then start the run
                    self.num_literals -= MIN_REPEAT_SIZE - 1;
                    self.write_values()?;
                    self.literals[0] = value;
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

    fn write_values(&mut self) -> Result<(), WriterError> {
        if self.num_literals == 0 {
            return Ok(());
        }
        if self.repeat {
            self.output
                .write_byte((self.num_literals - MIN_REPEAT_SIZE) as u8)?;
            self.output.write_byte(self.literals[0])?;
        } else {
            self.output.write_byte((-(self.num_literals as i32)) as u8)?;
            self.output
                .write_bytes(&self.literals[..self.num_literals])?;
        }
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

    /// Buffered bytes, pending run included
    pub fn estimated_size(&self) -> u64 {
        self.output.buffered_size() + self.num_literals as u64
    }

    /// Emits the open run and drains the stream
    pub fn flush(&mut self) -> Result<StreamData, WriterError> {
        self.write_values()?;
        self.output.flush()
    }
}
