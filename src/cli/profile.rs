//! Writer profiles for common use cases.
//!
//! Profiles map onto the [`WriterConfig`] presets so that CLI users never
//! have to pick chunk sizes or compression levels by hand.

use std::fmt;
use std::str::FromStr;

use colstripe::writer::WriterConfig;

/// Writer profiles for common use cases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Profile {
    /// Prioritize speed over compression.
    ///
    /// - Compression: Zlib level 1
    /// - Stripes: 32MB
    /// - Strings: always direct
    Fast,

    /// Balance between speed and compression (default).
    ///
    /// - Compression: ZSTD level 3
    /// - Stripes: 64MB
    #[default]
    Balanced,

    /// Maximum compression, slower writes.
    ///
    /// - Compression: ZSTD level 19
    /// - Stripes: 256MB
    MaxCompression,
}

impl Profile {
    /// Returns the writer configuration for this profile.
    pub fn writer_config(&self) -> WriterConfig {
        match self {
            Profile::Fast => WriterConfig::fast_write(),
            Profile::Balanced => WriterConfig::balanced(),
            Profile::MaxCompression => WriterConfig::max_compression(),
        }
    }

    /// Returns all available profile names.
    pub fn variants() -> &'static [&'static str] {
        &["fast", "balanced", "max-compression"]
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Fast => write!(f, "fast"),
            Profile::Balanced => write!(f, "balanced"),
            Profile::MaxCompression => write!(f, "max-compression"),
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Profile::Fast),
            "balanced" | "default" => Ok(Profile::Balanced),
            "max-compression" | "maxcompression" | "max" => Ok(Profile::MaxCompression),
            _ => Err(format!(
                "Unknown profile '{}'. Valid options: {}",
                s,
                Profile::variants().join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colstripe::writer::CompressionType;

    #[test]
    fn test_profile_defaults() {
        let balanced = Profile::default();
        assert_eq!(balanced, Profile::Balanced);
        assert_eq!(balanced.writer_config(), WriterConfig::default());
        assert_eq!(
            Profile::Fast.writer_config().compression,
            CompressionType::Zlib(1)
        );
        assert_eq!(
            Profile::MaxCompression.writer_config().compression,
            CompressionType::Zstd(19)
        );
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!(Profile::from_str("fast").unwrap(), Profile::Fast);
        assert_eq!(Profile::from_str("BALANCED").unwrap(), Profile::Balanced);
        assert_eq!(
            Profile::from_str("max-compression").unwrap(),
            Profile::MaxCompression
        );
        assert!(Profile::from_str("invalid").is_err());
        assert_eq!(Profile::MaxCompression.to_string(), "max-compression");
    }
}
