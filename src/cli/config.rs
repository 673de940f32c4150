//! TOML configuration file support for power users.
//!
//! Instead of passing many CLI flags, users can specify writer settings in a config file:
//!
//! ```toml
//! # colstripe.toml
//! [writer]
//! compression = "zstd"
//! compression_level = 9
//! compression_block_size = 131072
//! stripe_size = 16777216
//! row_index_stride = 5000
//! dictionary_key_size_threshold = 0.5
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use colstripe::writer::{CompressionType, WriterConfig};

/// Root configuration structure for colstripe.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Writer settings.
    #[serde(default)]
    pub writer: WriterSection,
}

/// Overrides applied on top of a profile's writer configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriterSection {
    /// Codec name: "zstd", "zlib" or "none".
    pub compression: Option<String>,

    /// Codec level (ZSTD 1-22, Zlib 0-9).
    pub compression_level: Option<i32>,

    /// Raw bytes per compressed chunk.
    pub compression_block_size: Option<usize>,

    /// Buffered bytes after which a stripe is closed.
    pub stripe_size: Option<u64>,

    /// Rows per row group; 0 disables the row index.
    pub row_index_stride: Option<usize>,

    /// Distinct/non-null ratio below which strings use a dictionary.
    pub dictionary_key_size_threshold: Option<f64>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Applies the `[writer]` overrides to `base` and validates the result.
    pub fn apply(&self, mut base: WriterConfig) -> Result<WriterConfig> {
        let section = &self.writer;
        if let Some(codec) = &section.compression {
            base.compression = match codec.to_lowercase().as_str() {
                "zstd" => CompressionType::Zstd(section.compression_level.unwrap_or(3)),
                "zlib" => CompressionType::Zlib(section.compression_level.unwrap_or(6).max(0) as u32),
                "none" | "uncompressed" => CompressionType::Uncompressed,
                other => bail!("Unknown compression codec '{}'", other),
            };
        } else if let Some(level) = section.compression_level {
            base.compression = match base.compression {
                CompressionType::Zstd(_) => CompressionType::Zstd(level),
                CompressionType::Zlib(_) => CompressionType::Zlib(level.max(0) as u32),
                CompressionType::Uncompressed => CompressionType::Uncompressed,
            };
        }
        if let Some(size) = section.compression_block_size {
            base.compression_block_size = size;
        }
        if let Some(size) = section.stripe_size {
            base.stripe_size = size;
        }
        if let Some(stride) = section.row_index_stride {
            base.row_index_stride = stride;
        }
        if let Some(threshold) = section.dictionary_key_size_threshold {
            base.dictionary_key_size_threshold = threshold;
        }
        base.validate().context("Invalid writer configuration")?;
        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [writer]
            compression = "zlib"
            compression_level = 9
            compression_block_size = 4096
            stripe_size = 1048576
            row_index_stride = 500
            dictionary_key_size_threshold = 0.25
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.writer.compression.as_deref(), Some("zlib"));
        let writer = config.apply(WriterConfig::default()).unwrap();
        assert_eq!(writer.compression, CompressionType::Zlib(9));
        assert_eq!(writer.compression_block_size, 4096);
        assert_eq!(writer.stripe_size, 1_048_576);
        assert_eq!(writer.row_index_stride, 500);
        assert_eq!(writer.dictionary_key_size_threshold, 0.25);
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [writer]
            compression_level = 10
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.writer.row_index_stride, None);
        let writer = config.apply(WriterConfig::default()).unwrap();
        assert_eq!(writer.compression, CompressionType::Zstd(10));
        assert_eq!(writer.stripe_size, WriterConfig::default().stripe_size);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.apply(WriterConfig::fast_write()).unwrap(), WriterConfig::fast_write());
    }

    #[test]
    fn test_invalid_overrides() {
        let config = Config::from_str("[writer]\ncompression = \"lz4\"").unwrap();
        assert!(config.apply(WriterConfig::default()).is_err());

        let config = Config::from_str("[writer]\ncompression_block_size = 0").unwrap();
        assert!(config.apply(WriterConfig::default()).is_err());

        assert!(Config::from_str("[writer]\nbogus = 1").is_err());
    }
}
