use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use serde::{Deserialize, Serialize};

use crate::column::ColumnEncoding;
use crate::schema::TypeDescription;
use crate::statistics::ColumnStatisticsSummary;
use crate::stream::StreamKind;

use super::config::CompressionType;
use super::error::WriterError;

/// Magic bytes at the start and the end of every file
pub const MAGIC: &[u8; 4] = b"CSTR";

/// Layout version written into the file footer
pub const FORMAT_VERSION: u32 = 1;

/// Footer length (u64 LE) plus trailing magic
pub(crate) const TAIL_SIZE: u64 = 8 + 4;

/// Location of one stream inside its stripe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    /// Column that produced the stream
    pub column_id: u32,
    /// Kind of the stream
    pub kind: StreamKind,
    /// Length in bytes
    pub length: u64,
}

/// Per-stripe footer: stream layout and column encodings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripeFooter {
    /// Streams in file order, index streams first
    pub streams: Vec<StreamInfo>,
    /// Encoding of every column in pre-order
    pub encodings: Vec<ColumnEncoding>,
}

impl StripeFooter {
    /// Absolute offset of every stream, given the stripe's start offset
    pub fn stream_offsets(&self, stripe_offset: u64) -> Vec<(StreamInfo, u64)> {
        let mut offset = stripe_offset;
        self.streams
            .iter()
            .map(|info| {
                let start = offset;
                offset = offset.saturating_add(info.length);
                (info.clone(), start)
            })
            .collect()
    }
}

/// Where a stripe lives in the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripeInformation {
    /// Offset of the first index stream
    pub offset: u64,
    /// Bytes of index streams
    pub index_length: u64,
    /// Bytes of data streams
    pub data_length: u64,
    /// Bytes of the JSON stripe footer
    pub footer_length: u64,
    /// Rows in the stripe
    pub number_of_rows: u64,
}

impl StripeInformation {
    /// Offset of the stripe footer
    pub fn footer_offset(&self) -> u64 {
        self.offset
            .saturating_add(self.index_length)
            .saturating_add(self.data_length)
    }

    /// First byte after the stripe
    pub fn end(&self) -> u64 {
        self.footer_offset().saturating_add(self.footer_length)
    }
}

/// File footer, written once at close
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFooter {
    /// Layout version
    pub format_version: u32,
    /// Logical schema the column ids refer to
    pub schema: TypeDescription,
    /// Compression of every stream
    pub compression: CompressionType,
    /// Raw bytes per compressed chunk
    pub compression_block_size: usize,
    /// Rows per row group (0 when the row index is disabled)
    pub row_index_stride: usize,
    /// Rows in the file
    pub number_of_rows: u64,
    /// Stripes in file order
    pub stripes: Vec<StripeInformation>,
    /// Statistics of every column, per stripe
    pub stripe_statistics: Vec<Vec<ColumnStatisticsSummary>>,
    /// Statistics of every column over the whole file
    pub statistics: Vec<ColumnStatisticsSummary>,
}

/// Reads the file footer from the tail of a file
pub fn read_file_footer<R: Read + Seek>(reader: &mut R) -> Result<FileFooter, WriterError> {
    let file_len = reader.seek(SeekFrom::End(0))?;
    if file_len < MAGIC.len() as u64 + TAIL_SIZE {
        return Err(WriterError::InvalidFile(format!(
            "file is too short ({} bytes)",
            file_len
        )));
    }

    let mut magic = [0u8; 4];
    reader.seek(SeekFrom::Start(0))?;
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(WriterError::InvalidFile("missing leading magic".to_string()));
    }

    reader.seek(SeekFrom::Start(file_len - TAIL_SIZE))?;
    let footer_len = reader.read_u64::<LittleEndian>()?;
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(WriterError::InvalidFile("missing trailing magic".to_string()));
    }

    let footer_start = (file_len - TAIL_SIZE)
        .checked_sub(footer_len)
        .filter(|&start| start >= MAGIC.len() as u64)
        .ok_or_else(|| {
            WriterError::InvalidFile(format!("footer length {} exceeds file", footer_len))
        })?;
    let bytes = read_range(reader, footer_start, footer_len)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Reads the footer of one stripe
pub fn read_stripe_footer<R: Read + Seek>(
    reader: &mut R,
    stripe: &StripeInformation,
) -> Result<StripeFooter, WriterError> {
    let bytes = read_range(reader, stripe.footer_offset(), stripe.footer_length)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Reads `length` bytes at `offset`
pub fn read_range<R: Read + Seek>(
    reader: &mut R,
    offset: u64,
    length: u64,
) -> Result<Vec<u8>, WriterError> {
    let file_len = reader.seek(SeekFrom::End(0))?;
    if offset.checked_add(length).map_or(true, |end| end > file_len) {
        return Err(WriterError::InvalidFile(format!(
            "range {}+{} exceeds file length {}",
            offset, length, file_len
        )));
    }
    reader.seek(SeekFrom::Start(offset))?;
    let mut bytes = vec![0u8; length as usize];
    reader.read_exact(&mut bytes)?;
    Ok(bytes)
}
