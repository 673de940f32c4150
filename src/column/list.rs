use std::ops::Range;

use arrow::array::{Array, ListArray};

use crate::encoding::{IntRleEncoder, PositionRecorder};
use crate::schema::TypeDescription;
use crate::stream::{StreamData, StreamKind, StreamsFactory};
use crate::writer::{WriterConfig, WriterError};

use super::base::ColumnWriterBase;
use super::factory::build_node;
use super::protocol::ColumnWriter;
use super::types::{ColumnEncoding, ColumnEncodingKind};

/// Child value ranges covered by the non-null rows of `offset..offset + num_values`.
///
/// Adjacent spans are coalesced, so a run of non-null rows yields one range.
pub(super) fn child_ranges(
    batch: &dyn Array,
    value_offsets: &[i32],
    offset: usize,
    num_values: usize,
) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = Vec::new();
    for row in offset..offset + num_values {
        if batch.is_null(row) {
            continue;
        }
        let start = value_offsets[row] as usize;
        let end = value_offsets[row + 1] as usize;
        if start == end {
            continue;
        }
        match ranges.last_mut() {
            Some(last) if last.end == start => last.end = end,
            _ => ranges.push(start..end),
        }
    }
    ranges
}

/// Writes the element count of every non-null row
pub(super) fn write_lengths(
    length: &mut IntRleEncoder,
    batch: &dyn Array,
    value_offsets: &[i32],
    offset: usize,
    num_values: usize,
) -> Result<(), WriterError> {
    for row in offset..offset + num_values {
        if batch.is_valid(row) {
            length.write(i64::from(value_offsets[row + 1] - value_offsets[row]))?;
        }
    }
    Ok(())
}

/// Writer for list columns: element counts in LENGTH, elements in the child writer
#[derive(Debug)]
pub struct ListColumnWriter {
    base: ColumnWriterBase,
    length: IntRleEncoder,
    children: Vec<Box<dyn ColumnWriter>>,
}

impl ListColumnWriter {
    /// Creates the writer, its LENGTH stream and the element writer
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
        Ok(Self {
            base,
            length,
            children,
        })
    }
}

impl ColumnWriter for ListColumnWriter {
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
        let array = self.base.downcast::<ListArray>(batch)?;
        self.base.check_batch(batch, offset, num_values)?;
        let ranges = child_ranges(batch, array.value_offsets(), offset, num_values);
        for child in &self.children {
            for range in &ranges {
                child.validate(array.values().as_ref(), range.start, range.len())?;
            }
        }
        Ok(())
    }

    fn write(&mut self, batch: &dyn Array, offset: usize, num_values: usize) -> Result<(), WriterError> {
        let array = self.base.downcast::<ListArray>(batch)?;
        let nulls = self.base.write_present(batch, offset, num_values)?;
        self.base
            .index_stats_mut()
            .increment_values(num_values as u64 - nulls);
        write_lengths(&mut self.length, batch, array.value_offsets(), offset, num_values)?;
        let ranges = child_ranges(batch, array.value_offsets(), offset, num_values);
        for child in &mut self.children {
            for range in &ranges {
                child.write(array.values().as_ref(), range.start, range.len())?;
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
