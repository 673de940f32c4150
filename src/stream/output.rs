use std::io;

use bytes::Bytes;

use crate::encoding::PositionRecorder;
use crate::writer::{CompressionType, WriterError};

use super::compression::Codec;
use super::kind::StreamKind;

const CHUNK_HEADER_SIZE: usize = 3;

/// A drained stream: its owner, kind and final bytes for one stripe
#[derive(Debug, Clone, PartialEq)]
pub struct StreamData {
    /// Column that produced the stream
    pub column_id: u32,
    /// Kind of the stream
    pub kind: StreamKind,
    /// Final (possibly compressed) bytes
    pub data: Bytes,
}

impl StreamData {
    /// Length of the stream in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the stream holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Buffered, optionally compressed byte sink for one (column, kind) pair.
///
/// Bytes stay in memory until [`OutputStream::flush`] hands them back; the
/// stream is then empty and its positions restart at zero.
#[derive(Debug)]
pub struct OutputStream {
    column_id: u32,
    kind: StreamKind,
    codec: Option<Codec>,
    block_size: usize,
    // Raw bytes of the open chunk (or all bytes when uncompressed)
    buffer: Vec<u8>,
    // Framed chunks already emitted
    compressed: Vec<u8>,
}

impl OutputStream {
    pub(crate) fn new(
        column_id: u32,
        kind: StreamKind,
        compression: CompressionType,
        block_size: usize,
    ) -> Self {
        Self {
            column_id,
            kind,
            codec: Codec::for_compression(compression),
            block_size,
            buffer: Vec::new(),
            compressed: Vec::new(),
        }
    }

    /// Column owning this stream
    pub fn column_id(&self) -> u32 {
        self.column_id
    }

    /// Kind of this stream
    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    /// Appends one byte
    #[inline]
    pub fn write_byte(&mut self, byte: u8) -> Result<(), WriterError> {
        self.buffer.push(byte);
        if self.codec.is_some() && self.buffer.len() >= self.block_size {
            self.spill()?;
        }
        Ok(())
    }

    /// Appends a byte slice, cutting chunks at the block size
    pub fn write_bytes(&mut self, mut data: &[u8]) -> Result<(), WriterError> {
        if self.codec.is_none() {
            self.buffer.extend_from_slice(data);
            return Ok(());
        }
        while !data.is_empty() {
            let room = self.block_size - self.buffer.len();
            let take = room.min(data.len());
            self.buffer.extend_from_slice(&data[..take]);
            data = &data[take..];
            if self.buffer.len() >= self.block_size {
                self.spill()?;
            }
        }
        Ok(())
    }

    /// Compresses the open chunk and appends it with its header
    fn spill(&mut self) -> Result<(), WriterError> {
        let codec = match self.codec {
            Some(codec) if !self.buffer.is_empty() => codec,
            _ => return Ok(()),
        };
        let compressed = codec
            .compress(&self.buffer)
            .map_err(|source| WriterError::StreamError {
                column_id: self.column_id,
                kind: self.kind,
                source,
            })?;

        let original = compressed.len() >= self.buffer.len();
        let length = if original {
            self.buffer.len()
        } else {
            compressed.len()
        };
        let header = ((length as u32) << 1) | u32::from(original);
        self.compressed
            .extend_from_slice(&header.to_le_bytes()[..CHUNK_HEADER_SIZE]);
        if original {
            self.compressed.extend_from_slice(&self.buffer);
        } else {
            self.compressed.extend_from_slice(&compressed);
        }
        self.buffer.clear();
        Ok(())
    }

    /// Records the current cursor: `[bytes]` or `[chunk offset, offset in chunk]`
    pub fn record_position(&self, recorder: &mut dyn PositionRecorder) {
        if self.codec.is_some() {
            recorder.add(self.compressed.len() as u64);
        }
        recorder.add(self.buffer.len() as u64);
    }

    /// Bytes held by the stream, compressed or not
    pub fn buffered_size(&self) -> u64 {
        (self.compressed.len() + self.buffer.len()) as u64
    }

    /// Finishes the open chunk and hands back everything written this stripe
    pub fn flush(&mut self) -> Result<StreamData, WriterError> {
        let data = if self.codec.is_some() {
            self.spill()?;
            std::mem::take(&mut self.compressed)
        } else {
            std::mem::take(&mut self.buffer)
        };
        Ok(StreamData {
            column_id: self.column_id,
            kind: self.kind,
            data: Bytes::from(data),
        })
    }
}

impl io::Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Chunks are only closed by `OutputStream::flush` at stripe end
        Ok(())
    }
}

fn read_chunk_header(data: &[u8], offset: usize) -> Result<(usize, bool), WriterError> {
    let header = data
        .get(offset..offset + CHUNK_HEADER_SIZE)
        .ok_or_else(|| WriterError::InvalidFile(format!("truncated chunk header at {}", offset)))?;
    let value = u32::from(header[0]) | (u32::from(header[1]) << 8) | (u32::from(header[2]) << 16);
    Ok(((value >> 1) as usize, value & 1 == 1))
}

fn decode_chunks(
    data: &[u8],
    mut offset: usize,
    codec: Codec,
) -> Result<Vec<Vec<u8>>, WriterError> {
    let mut chunks = Vec::new();
    while offset < data.len() {
        let (length, original) = read_chunk_header(data, offset)?;
        let start = offset + CHUNK_HEADER_SIZE;
        let body = data.get(start..start + length).ok_or_else(|| {
            WriterError::InvalidFile(format!("chunk at {} overruns stream", offset))
        })?;
        if original {
            chunks.push(body.to_vec());
        } else {
            chunks.push(codec.decompress(body)?);
        }
        offset = start + length;
    }
    Ok(chunks)
}

/// Decodes a whole stream back into its raw bytes
pub fn decompress_stream(data: &[u8], compression: CompressionType) -> Result<Vec<u8>, WriterError> {
    match Codec::for_compression(compression) {
        None => Ok(data.to_vec()),
        Some(codec) => Ok(decode_chunks(data, 0, codec)?.concat()),
    }
}

/// Returns the raw bytes of a stream starting at a recorded position, and the
/// number of position values the stream consumed.
pub fn seek_stream(
    data: &[u8],
    compression: CompressionType,
    positions: &[u64],
) -> Result<(Vec<u8>, usize), WriterError> {
    let missing = || WriterError::InvalidData("not enough positions for stream seek".to_string());
    match Codec::for_compression(compression) {
        None => {
            let offset = *positions.first().ok_or_else(missing)? as usize;
            let rest = data.get(offset..).ok_or_else(|| {
                WriterError::InvalidData(format!("position {} beyond stream end", offset))
            })?;
            Ok((rest.to_vec(), 1))
        }
        Some(codec) => {
            let chunk_offset = *positions.first().ok_or_else(missing)? as usize;
            let within = *positions.get(1).ok_or_else(missing)? as usize;
            let raw = decode_chunks(data, chunk_offset, codec)?.concat();
            let rest = raw.get(within..).ok_or_else(|| {
                WriterError::InvalidData(format!("position {} beyond chunk end", within))
            })?;
            Ok((rest.to_vec(), 2))
        }
    }
}
