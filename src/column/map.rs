use arrow::array::{Array, MapArray};

use crate::encoding::{IntRleEncoder, PositionRecorder};
use crate::schema::TypeDescription;
use crate::stream::{StreamData, StreamKind, StreamsFactory};
use crate::writer::{WriterConfig, WriterError};

use super::base::ColumnWriterBase;
use super::factory::build_node;
use super::list::{child_ranges, write_lengths};
use super::protocol::ColumnWriter;
use super::types::{ColumnEncoding, ColumnEncodingKind};

/// Writer for map columns: entry counts in LENGTH, keys and values in two child
/// writers over the same entry ranges
#[derive(Debug)]
pub struct MapColumnWriter {
    base: ColumnWriterBase,
    length: IntRleEncoder,
    children: Vec<Box<dyn ColumnWriter>>,
}

impl MapColumnWriter {
    /// Creates the writer, its LENGTH stream and the key and value writers
    pub fn new(
        ty: &TypeDescription,
        factory: &mut dyn StreamsFactory,
        config: &WriterConfig,
    ) -> Result<Self, WriterError> {
        let base = ColumnWriterBase::new(ty, factory, config)?;
        let length = IntRleEncoder::new(
            factory.create_stream(ty.column_id(), ty.kind(), StreamKind::Length)?,
            false,
        );
        let children = ty
            .children()
            .iter()
            .map(|child| build_node(child, factory, config))
            .collect::<Result<Vec<_>, _>>()?;
        if children.len() != 2 {
            return Err(WriterError::UnsupportedType(format!(
                "map column {} needs a key and a value type, found {} children",
                ty.column_id(),
                children.len()
            )));
        }
        Ok(Self {
            base,
            length,
            children,
        })
    }
}

impl ColumnWriter for MapColumnWriter {
    fn base(&self) -> &ColumnWriterBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ColumnWriterBase {
        &mut self.base
    }

    fn children(&self) -> &[Box<dyn ColumnWriter>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Box<dyn ColumnWriter>] {
        &mut self.children
    }

    fn validate(&self, batch: &dyn Array, offset: usize, num_values: usize) -> Result<(), WriterError> {
        let array = self.base.downcast::<MapArray>(batch)?;
        self.base.check_batch(batch, offset, num_values)?;
        let ranges = child_ranges(batch, array.value_offsets(), offset, num_values);
        let columns = [array.keys(), array.values()];
        for (child, column) in self.children.iter().zip(columns) {
            for range in &ranges {
                child.validate(column.as_ref(), range.start, range.len())?;
            }
        }
        Ok(())
    }

    fn write(&mut self, batch: &dyn Array, offset: usize, num_values: usize) -> Result<(), WriterError> {
        let array = self.base.downcast::<MapArray>(batch)?;
        let nulls = self.base.write_present(batch, offset, num_values)?;
        self.base
            .index_stats_mut()
            .increment_values(num_values as u64 - nulls);
        write_lengths(&mut self.length, batch, array.value_offsets(), offset, num_values)?;
        let ranges = child_ranges(batch, array.value_offsets(), offset, num_values);
        let columns = [array.keys(), array.values()];
        for (child, column) in self.children.iter_mut().zip(columns) {
            for range in &ranges {
                child.write(column.as_ref(), range.start, range.len())?;
            }
        }
        Ok(())
    }

    fn flush_encoders(&mut self, streams: &mut Vec<StreamData>) -> Result<(), WriterError> {
        streams.push(self.length.flush()?);
        Ok(())
    }

    fn record_data_positions(&mut self, recorder: &mut dyn PositionRecorder) {
        self.length.record_position(recorder);
    }

    fn encoder_estimated_size(&self) -> u64 {
        self.length.estimated_size()
    }

    fn get_column_encoding(&self, encodings: &mut Vec<ColumnEncoding>) {
        encodings.push(ColumnEncoding {
            column_id: self.base.column_id(),
            kind: ColumnEncodingKind::Direct,
        });
        for child in &self.children {
            child.get_column_encoding(encodings);
        }
    }
}
