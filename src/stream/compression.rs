use std::io::{self, Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;

use crate::writer::CompressionType;

/// Chunk codec for a compressed stream
#[derive(Debug, Clone, Copy)]
pub(crate) enum Codec {
    Zlib(u32),
    Zstd(i32),
}

impl Codec {
    pub(crate) fn for_compression(compression: CompressionType) -> Option<Self> {
        match compression {
            CompressionType::Zlib(level) => Some(Codec::Zlib(level)),
            CompressionType::Zstd(level) => Some(Codec::Zstd(level)),
            CompressionType::Uncompressed => None,
        }
    }

    pub(crate) fn compress(&self, raw: &[u8]) -> io::Result<Vec<u8>> {
        match self {
            Codec::Zlib(level) => {
                let mut encoder =
                    DeflateEncoder::new(Vec::with_capacity(raw.len()), flate2::Compression::new(*level));
                encoder.write_all(raw)?;
                encoder.finish()
            }
            Codec::Zstd(level) => zstd::bulk::compress(raw, *level),
        }
    }

    pub(crate) fn decompress(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        match self {
            Codec::Zlib(_) => {
                let mut out = Vec::new();
                DeflateDecoder::new(data).read_to_end(&mut out)?;
                Ok(out)
            }
            Codec::Zstd(_) => zstd::stream::decode_all(data),
        }
    }
}
