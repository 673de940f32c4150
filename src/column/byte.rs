use arrow::array::{Array, Int8Array};

use crate::encoding::{ByteRleEncoder, PositionRecorder};
use crate::schema::TypeDescription;
use crate::stream::{StreamData, StreamKind, StreamsFactory};
use crate::writer::{WriterConfig, WriterError};

use super::base::ColumnWriterBase;
use super::protocol::ColumnWriter;
use super::types::{ColumnEncoding, ColumnEncodingKind};

/// Writer for tinyint columns, byte run-length encoded
#[derive(Debug)]
pub struct ByteColumnWriter {
    base: ColumnWriterBase,
    data: ByteRleEncoder,
}

impl ByteColumnWriter {
    /// Creates the writer and its streams
    pub fn new(
        ty: &TypeDescription,
        factory: &mut dyn StreamsFactory,
        config: &WriterConfig,
    ) -> Result<Self, WriterError> {
        let base = ColumnWriterBase::new(ty, factory, config)?;
        let data = ByteRleEncoder::new(factory.create_stream(
            ty.column_id(),
            ty.kind(),
            StreamKind::Data,
        )?);
        Ok(Self { base, data })
    }
}

impl ColumnWriter for ByteColumnWriter {
    fn base(&self) -> &ColumnWriterBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ColumnWriterBase {
        &mut self.base
    }

    fn validate(&self, batch: &dyn Array, offset: usize, num_values: usize) -> Result<(), WriterError> {
        self.base.downcast::<Int8Array>(batch)?;
        self.base.check_batch(batch, offset, num_values)
    }

    fn write(&mut self, batch: &dyn Array, offset: usize, num_values: usize) -> Result<(), WriterError> {
        let values = self.base.downcast::<Int8Array>(batch)?;
        self.base.write_present(batch, offset, num_values)?;
        for i in offset..offset + num_values {
            if values.is_valid(i) {
                let value = values.value(i);
                self.data.write(value as u8)?;
                self.base.index_stats_mut().update_integer(i64::from(value));
            }
        }
        Ok(())
    }

    fn flush_encoders(&mut self, streams: &mut Vec<StreamData>) -> Result<(), WriterError> {
        streams.push(self.data.flush()?);
        Ok(())
    }

    fn record_data_positions(&mut self, recorder: &mut dyn PositionRecorder) {
        self.data.record_position(recorder);
    }

    fn encoder_estimated_size(&self) -> u64 {
        self.data.estimated_size()
    }

    fn get_column_encoding(&self, encodings: &mut Vec<ColumnEncoding>) {
        encodings.push(ColumnEncoding {
            column_id: self.base.column_id(),
            kind: ColumnEncodingKind::Direct,
        });
    }
}
