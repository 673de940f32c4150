use serde::{Deserialize, Serialize};

use super::error::WriterError;

/// Largest chunk a 3-byte chunk header can describe
pub const MAX_COMPRESSION_BLOCK_SIZE: usize = (1 << 23) - 1;

/// Compression options for stream chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "codec", content = "level", rename_all = "snake_case")]
pub enum CompressionType {
    /// ZSTD compression (recommended, best compression ratio)
    Zstd(i32),
    /// Raw deflate compression
    Zlib(u32),
    /// No compression (fastest write, largest files)
    Uncompressed,
}

impl Default for CompressionType {
    fn default() -> Self {
        // ZSTD level 3 is a good balance of speed and compression
        Self::Zstd(3)
    }
}

impl CompressionType {
    /// Maximum compression (slower write, smallest files)
    pub fn max_compression() -> Self {
        Self::Zstd(19)
    }

    /// Balanced compression (recommended default)
    pub fn balanced() -> Self {
        Self::Zstd(3)
    }

    /// Fast compression (faster write, larger files)
    pub fn fast() -> Self {
        Self::Zlib(1)
    }

    /// True when streams are framed into compressed chunks
    pub fn is_compressed(&self) -> bool {
        !matches!(self, Self::Uncompressed)
    }
}

/// Configuration for the column writers and the file driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Compression type to use for every stream
    pub compression: CompressionType,

    /// Raw bytes per compressed chunk
    pub compression_block_size: usize,

    /// Buffered bytes after which the current stripe is closed
    pub stripe_size: u64,

    /// Rows per row group; 0 disables the row index
    pub row_index_stride: usize,

    /// Use dictionary encoding for a string column when
    /// `distinct values / non-null values` is at most this ratio (0.0 disables)
    pub dictionary_key_size_threshold: f64,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: CompressionType::default(),
            // 256KB chunks
            compression_block_size: 256 * 1024,
            // 64MB stripes
            stripe_size: 64 * 1024 * 1024,
            row_index_stride: 10_000,
            dictionary_key_size_threshold: 0.8,
        }
    }
}

impl WriterConfig {
    /// Configuration optimized for maximum compression (slower write)
    pub fn max_compression() -> Self {
        Self {
            compression: CompressionType::max_compression(),
            compression_block_size: 1024 * 1024,
            stripe_size: 256 * 1024 * 1024,
            row_index_stride: 10_000,
            dictionary_key_size_threshold: 0.8,
        }
    }

    /// Configuration optimized for fast writing (larger files)
    pub fn fast_write() -> Self {
        Self {
            compression: CompressionType::fast(),
            compression_block_size: 64 * 1024,
            stripe_size: 32 * 1024 * 1024,
            row_index_stride: 10_000,
            dictionary_key_size_threshold: 0.0,
        }
    }

    /// Balanced configuration (default)
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Whether row groups are indexed
    pub fn index_enabled(&self) -> bool {
        self.row_index_stride > 0
    }

    /// Checks that the configuration can drive a writer
    pub fn validate(&self) -> Result<(), WriterError> {
        if self.compression_block_size == 0
            || self.compression_block_size > MAX_COMPRESSION_BLOCK_SIZE
        {
            return Err(WriterError::InvalidConfig(format!(
                "compression_block_size must be in 1..={}, got {}",
                MAX_COMPRESSION_BLOCK_SIZE, self.compression_block_size
            )));
        }
        match self.compression {
            CompressionType::Zstd(level) if !(1..=22).contains(&level) => {
                return Err(WriterError::InvalidConfig(format!(
                    "ZSTD level must be in 1..=22, got {}",
                    level
                )))
            }
            CompressionType::Zlib(level) if level > 9 => {
                return Err(WriterError::InvalidConfig(format!(
                    "Zlib level must be in 0..=9, got {}",
                    level
                )))
            }
            _ => {}
        }
        if !(0.0..=1.0).contains(&self.dictionary_key_size_threshold) {
            return Err(WriterError::InvalidConfig(format!(
                "dictionary_key_size_threshold must be in 0.0..=1.0, got {}",
                self.dictionary_key_size_threshold
            )));
        }
        if self.stripe_size == 0 {
            return Err(WriterError::InvalidConfig(
                "stripe_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
