use std::marker::PhantomData;

use arrow::array::{Array, ArrowPrimitiveType, PrimitiveArray};

use crate::encoding::{IntRleEncoder, PositionRecorder};
use crate::schema::TypeDescription;
use crate::stream::{StreamData, StreamKind, StreamsFactory};
use crate::writer::{WriterConfig, WriterError};

use super::base::ColumnWriterBase;
use super::protocol::ColumnWriter;
use super::types::{ColumnEncoding, ColumnEncodingKind};

/// Writer for smallint, int, bigint and date columns, signed integer RLE.
///
/// `T` is the Arrow type the column's batches arrive as (`Int16Type`,
/// `Int32Type`, `Int64Type` or `Date32Type`).
#[derive(Debug)]
pub struct IntegerColumnWriter<T> {
    base: ColumnWriterBase,
    data: IntRleEncoder,
    _arrow_type: PhantomData<T>,
}

impl<T> IntegerColumnWriter<T>
where
    T: ArrowPrimitiveType,
    T::Native: Into<i64>,
{
    /// Creates the writer and its streams
    pub fn new(
        ty: &TypeDescription,
        factory: &mut dyn StreamsFactory,
        config: &WriterConfig,
    ) -> Result<Self, WriterError> {
        let base = ColumnWriterBase::new(ty, factory, config)?;
        let data = IntRleEncoder::new(
            factory.create_stream(ty.column_id(), ty.kind(), StreamKind::Data)?,
            true,
        );
        Ok(Self {
            base,
            data,
            _arrow_type: PhantomData,
        })
    }
}

impl<T> ColumnWriter for IntegerColumnWriter<T>
where
    T: ArrowPrimitiveType + std::fmt::Debug + Send,
    T::Native: Into<i64>,
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
        for i in offset..offset + num_values {
            if values.is_valid(i) {
                let value: i64 = values.value(i).into();
                self.data.write(value)?;
                self.base.index_stats_mut().update_integer(value);
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
