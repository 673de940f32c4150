use std::collections::HashSet;

use crate::schema::TypeKind;
use crate::writer::{CompressionType, WriterConfig, WriterError};

use super::kind::StreamKind;
use super::output::OutputStream;

/// Supplies the output streams of a writer tree.
///
/// Each (column, kind) pair yields exactly one stream, owned by the column writer
/// that requested it and reused for every stripe.
pub trait StreamsFactory {
    /// Creates the stream of `kind` for column `column_id` of type `type_kind`.
    ///
    /// Fails with [`WriterError::UnsupportedStream`] if that column type never
    /// produces such a stream, and with [`WriterError::DuplicateStream`] if the
    /// pair was already handed out.
    fn create_stream(
        &mut self,
        column_id: u32,
        type_kind: TypeKind,
        kind: StreamKind,
    ) -> Result<OutputStream, WriterError>;
}

/// In-memory stream factory configured from a [`WriterConfig`]
#[derive(Debug)]
pub struct MemoryStreamsFactory {
    compression: CompressionType,
    block_size: usize,
    created: HashSet<(u32, StreamKind)>,
}

impl MemoryStreamsFactory {
    /// Creates a factory using the config's compression settings
    pub fn new(config: &WriterConfig) -> Self {
        Self {
            compression: config.compression,
            block_size: config.compression_block_size,
            created: HashSet::new(),
        }
    }

    /// Number of streams handed out so far
    pub fn stream_count(&self) -> usize {
        self.created.len()
    }
}

impl StreamsFactory for MemoryStreamsFactory {
    fn create_stream(
        &mut self,
        column_id: u32,
        type_kind: TypeKind,
        kind: StreamKind,
    ) -> Result<OutputStream, WriterError> {
        if !kind.is_supported_for(type_kind) {
            return Err(WriterError::UnsupportedStream {
                column_id,
                type_kind,
                kind,
            });
        }
        if !self.created.insert((column_id, kind)) {
            return Err(WriterError::DuplicateStream { column_id, kind });
        }
        Ok(OutputStream::new(
            column_id,
            kind,
            self.compression,
            self.block_size,
        ))
    }
}
