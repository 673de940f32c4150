use std::ops::Range;

use arrow::array::{Array, StructArray};

use crate::encoding::PositionRecorder;
use crate::schema::TypeDescription;
use crate::stream::{StreamData, StreamsFactory};
use crate::writer::{WriterConfig, WriterError};

use super::base::ColumnWriterBase;
use super::factory::build_node;
use super::protocol::ColumnWriter;
use super::types::{ColumnEncoding, ColumnEncodingKind};

/// Runs of non-null rows inside `offset..offset + num_values`
fn valid_runs(batch: &dyn Array, offset: usize, num_values: usize) -> Vec<Range<usize>> {
    let end = offset + num_values;
    if batch.null_count() == 0 {
        return if num_values == 0 { Vec::new() } else { vec![offset..end] };
    }
    let mut runs: Vec<Range<usize>> = Vec::new();
    for row in (offset..end).filter(|&row| batch.is_valid(row)) {
        match runs.last_mut() {
            Some(last) if last.end == row => last.end = row + 1,
            _ => runs.push(row..row + 1),
        }
    }
    runs
}

/// Writer for struct columns. Owns only a PRESENT stream; every field is written
/// by a child writer over the rows where the struct itself is not null.
#[derive(Debug)]
pub struct StructColumnWriter {
    base: ColumnWriterBase,
    children: Vec<Box<dyn ColumnWriter>>,
}

impl StructColumnWriter {
    /// Creates the writer, then one child writer per field in schema order
    pub fn new(
        ty: &TypeDescription,
        factory: &mut dyn StreamsFactory,
        config: &WriterConfig,
    ) -> Result<Self, WriterError> {
        let base = ColumnWriterBase::new(ty, factory, config)?;
        let children = ty
            .children()
            .iter()
            .map(|child| build_node(child, factory, config))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { base, children })
    }

    fn fields<'a>(&self, batch: &'a dyn Array) -> Result<&'a StructArray, WriterError> {
        let array = self.base.downcast::<StructArray>(batch)?;
        if array.num_columns() != self.children.len() {
            return Err(WriterError::BatchTypeMismatch {
                column_id: self.base.column_id(),
                expected: self.base.type_kind(),
                actual: format!(
                    "struct with {} fields, expected {}",
                    array.num_columns(),
                    self.children.len()
                ),
            });
        }
        Ok(array)
    }
}

impl ColumnWriter for StructColumnWriter {
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
        let array = self.fields(batch)?;
        self.base.check_batch(batch, offset, num_values)?;
        let runs = valid_runs(batch, offset, num_values);
        for (child, column) in self.children.iter().zip(array.columns()) {
            for run in &runs {
                child.validate(column.as_ref(), run.start, run.len())?;
            }
        }
        Ok(())
    }

    fn write(&mut self, batch: &dyn Array, offset: usize, num_values: usize) -> Result<(), WriterError> {
        let array = self.fields(batch)?;
        let nulls = self.base.write_present(batch, offset, num_values)?;
        self.base
            .index_stats_mut()
            .increment_values(num_values as u64 - nulls);
        let runs = valid_runs(batch, offset, num_values);
        for (child, column) in self.children.iter_mut().zip(array.columns()) {
            for run in &runs {
                child.write(column.as_ref(), run.start, run.len())?;
            }
        }
        Ok(())
    }

    fn flush_encoders(&mut self, _streams: &mut Vec<StreamData>) -> Result<(), WriterError> {
        Ok(())
    }

    fn record_data_positions(&mut self, _recorder: &mut dyn PositionRecorder) {}

    fn encoder_estimated_size(&self) -> u64 {
        0
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
