use std::marker::PhantomData;

use arrow::array::{Array, ArrowPrimitiveType, PrimitiveArray};
use byteorder::{ByteOrder, LittleEndian};

use crate::encoding::PositionRecorder;
use crate::schema::{TypeDescription, TypeKind};
use crate::stream::{OutputStream, StreamData, StreamKind, StreamsFactory};
use crate::writer::{WriterConfig, WriterError};

use super::base::ColumnWriterBase;
use super::protocol::ColumnWriter;
use super::types::{ColumnEncoding, ColumnEncodingKind};

/// Writer for float and double columns.
///
/// Values are stored as raw little-endian IEEE-754, 4 bytes for float and 8 for
/// double, so the only position is the stream position.
#[derive(Debug)]
pub struct DoubleColumnWriter<T> {
    base: ColumnWriterBase,
    data: OutputStream,
    is_float: bool,
    _arrow_type: PhantomData<T>,
}

impl<T> DoubleColumnWriter<T>
where
    T: ArrowPrimitiveType,
    T::Native: Into<f64>,
{
    /// Creates the writer and its streams
    pub fn new(
        ty: &TypeDescription,
        factory: &mut dyn StreamsFactory,
        config: &WriterConfig,
    ) -> Result<Self, WriterError> {
        let base = ColumnWriterBase::new(ty, factory, config)?;
        let data = factory.create_stream(ty.column_id(), ty.kind(), StreamKind::Data)?;
        Ok(Self {
            base,
            data,
            is_float: ty.kind() == TypeKind::Float,
            _arrow_type: PhantomData,
        })
    }
}

impl<T> ColumnWriter for DoubleColumnWriter<T>
where
    T: ArrowPrimitiveType + std::fmt::Debug + Send,
    T::Native: Into<f64>,
{
    fn base(&self) -> &ColumnWriterBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ColumnWriterBase {
        &mut self.base
    }

    fn validate(&self, batch: &dyn Array, offset: usize, num_values: usize) -> Result<(), WriterError> {
        self.base.downcast::<PrimitiveArray<T>>(batch)?;
        self.base.check_batch(batch, offset, num_values)
    }

    fn write(&mut self, batch: &dyn Array, offset: usize, num_values: usize) -> Result<(), WriterError> {
        let values = self.base.downcast::<PrimitiveArray<T>>(batch)?;
        self.base.write_present(batch, offset, num_values)?;
        let mut buf = [0u8; 8];
        for i in offset..offset + num_values {
            if values.is_valid(i) {
                let value: f64 = values.value(i).into();
                if self.is_float {
                    LittleEndian::write_f32(&mut buf[..4], value as f32);
                    self.data.write_bytes(&buf[..4])?;
                } else {
                    LittleEndian::write_f64(&mut buf, value);
                    self.data.write_bytes(&buf)?;
                }
                self.base.index_stats_mut().update_double(value);
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
        self.data.buffered_size()
    }

    fn get_column_encoding(&self, encodings: &mut Vec<ColumnEncoding>) {
        encodings.push(ColumnEncoding {
            column_id: self.base.column_id(),
            kind: ColumnEncodingKind::Direct,
        });
    }
}
