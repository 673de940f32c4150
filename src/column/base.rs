use std::mem;

use arrow::array::Array;
use serde::{Deserialize, Serialize};

use crate::encoding::BooleanEncoder;
use crate::schema::{TypeDescription, TypeKind};
use crate::statistics::ColumnStatistics;
use crate::stream::{OutputStream, StreamData, StreamKind, StreamsFactory};
use crate::writer::{WriterConfig, WriterError};

use super::types::{RowIndex, RowIndexEntry};

/// Where a writer stands in the per-stripe protocol.
///
/// `add`, `create_row_index_entry` and `flush` need [`StripePhase::Writing`];
/// `flush` moves to `Flushed`, `merge_stripe_stats_into_file_stats` to `Merged`
/// and `reset` back to `Writing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StripePhase {
    /// Accepting values for the current stripe
    Writing,
    /// Streams drained, stripe statistics not yet folded into file statistics
    Flushed,
    /// Stripe statistics folded into file statistics
    Merged,
}

/// State every column writer carries, whatever its type
#[derive(Debug)]
pub struct ColumnWriterBase {
    column_id: u32,
    type_kind: TypeKind,
    nullable: bool,
    present: Option<BooleanEncoder>,
    index_stats: ColumnStatistics,
    stripe_stats: ColumnStatistics,
    file_stats: ColumnStatistics,
    enable_index: bool,
    row_index: Vec<RowIndexEntry>,
    pending_positions: Vec<u64>,
    index_stream: Option<OutputStream>,
    phase: StripePhase,
    index_written: bool,
}

impl ColumnWriterBase {
    /// Creates the shared state of the writer for `ty`, requesting its PRESENT
    /// stream (nullable columns) and ROW_INDEX stream (indexing enabled).
    pub fn new(
        ty: &TypeDescription,
        factory: &mut dyn StreamsFactory,
        config: &WriterConfig,
    ) -> Result<Self, WriterError> {
        let column_id = ty.column_id();
        let type_kind = ty.kind();
        let present = if ty.is_nullable() {
            Some(BooleanEncoder::new(factory.create_stream(
                column_id,
                type_kind,
                StreamKind::Present,
            )?))
        } else {
            None
        };
        let index_stream = if config.index_enabled() {
            Some(factory.create_stream(column_id, type_kind, StreamKind::RowIndex)?)
        } else {
            None
        };

        Ok(Self {
            column_id,
            type_kind,
            nullable: ty.is_nullable(),
            present,
            index_stats: ColumnStatistics::new(type_kind),
            stripe_stats: ColumnStatistics::new(type_kind),
            file_stats: ColumnStatistics::new(type_kind),
            enable_index: config.index_enabled(),
            row_index: Vec::new(),
            pending_positions: Vec::new(),
            index_stream,
            phase: StripePhase::Writing,
            index_written: false,
        })
    }

    /// Column id
    pub fn column_id(&self) -> u32 {
        self.column_id
    }

    /// Logical type kind
    pub fn type_kind(&self) -> TypeKind {
        self.type_kind
    }

    /// Whether the column accepts nulls
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether row-index entries are built
    pub fn index_enabled(&self) -> bool {
        self.enable_index
    }

    /// Current protocol phase
    pub fn phase(&self) -> StripePhase {
        self.phase
    }

    /// Statistics of the open row group
    pub fn index_statistics(&self) -> &ColumnStatistics {
        &self.index_stats
    }

    /// Statistics of the current stripe
    pub fn stripe_statistics(&self) -> &ColumnStatistics {
        &self.stripe_stats
    }

    /// Statistics of every merged stripe
    pub fn file_statistics(&self) -> &ColumnStatistics {
        &self.file_stats
    }

    /// Closed row-index entries of the current stripe
    pub fn row_index(&self) -> &[RowIndexEntry] {
        &self.row_index
    }

    pub(crate) fn index_stats_mut(&mut self) -> &mut ColumnStatistics {
        &mut self.index_stats
    }

    pub(crate) fn row_index_mut(&mut self) -> &mut [RowIndexEntry] {
        &mut self.row_index
    }

    pub(crate) fn require_phase(
        &self,
        allowed: &[StripePhase],
        operation: &str,
    ) -> Result<(), WriterError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(WriterError::contract(
                self.column_id,
                format!("{} is not allowed in phase {:?}", operation, self.phase),
            ))
        }
    }

    pub(crate) fn require_closed_row_group(&self) -> Result<(), WriterError> {
        if self.index_stats.is_empty() {
            Ok(())
        } else {
            Err(WriterError::contract(
                self.column_id,
                format!(
                    "flush with an open row group of {} values",
                    self.index_stats.count()
                ),
            ))
        }
    }

    /// Downcasts a batch to the Arrow array type this column encodes
    pub(crate) fn downcast<'a, T: Array + 'static>(
        &self,
        batch: &'a dyn Array,
    ) -> Result<&'a T, WriterError> {
        batch
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| WriterError::BatchTypeMismatch {
                column_id: self.column_id,
                expected: self.type_kind,
                actual: batch.data_type().to_string(),
            })
    }

    /// Checks the requested range and the null constraint of the column
    pub(crate) fn check_batch(
        &self,
        batch: &dyn Array,
        offset: usize,
        num_values: usize,
    ) -> Result<(), WriterError> {
        let in_range = offset
            .checked_add(num_values)
            .is_some_and(|end| end <= batch.len());
        if !in_range {
            return Err(WriterError::OutOfRange {
                column_id: self.column_id,
                offset,
                num_values,
                len: batch.len(),
            });
        }
        if !self.nullable && batch.null_count() > 0 {
            if let Some(row) = (offset..offset + num_values).find(|&i| batch.is_null(i)) {
                return Err(WriterError::contract(
                    self.column_id,
                    format!("null at row {} in a non-nullable column", row),
                ));
            }
        }
        Ok(())
    }

    /// Writes the not-null bits of the range and counts its nulls.
    /// Returns the number of nulls.
    pub(crate) fn write_present(
        &mut self,
        batch: &dyn Array,
        offset: usize,
        num_values: usize,
    ) -> Result<u64, WriterError> {
        let mut nulls = 0u64;
        for i in offset..offset + num_values {
            let valid = batch.is_valid(i);
            if !valid {
                nulls += 1;
            }
            if let Some(present) = &mut self.present {
                present.write(valid)?;
            }
        }
        self.index_stats.increment_nulls(nulls);
        Ok(nulls)
    }

    pub(crate) fn record_present_position(&self, positions: &mut Vec<u64>) {
        if let Some(present) = &self.present {
            present.record_position(positions);
        }
    }

    pub(crate) fn set_pending_positions(&mut self, positions: Vec<u64>) {
        self.pending_positions = positions;
    }

    pub(crate) fn present_estimated_size(&self) -> u64 {
        self.present.as_ref().map_or(0, |p| p.estimated_size())
    }

    pub(crate) fn flush_present(&mut self, streams: &mut Vec<StreamData>) -> Result<(), WriterError> {
        if let Some(present) = &mut self.present {
            streams.push(present.flush()?);
        }
        Ok(())
    }

    /// Folds the row-group statistics into the stripe and clears them
    pub(crate) fn merge_index_into_stripe(&mut self) -> Result<(), WriterError> {
        self.stripe_stats
            .merge(&self.index_stats)
            .map_err(WriterError::statistics(self.column_id))?;
        self.index_stats.reset();
        Ok(())
    }

    /// Closes the open row group: merge into the stripe, snapshot, clear
    pub(crate) fn close_row_group(&mut self) -> Result<(), WriterError> {
        self.stripe_stats
            .merge(&self.index_stats)
            .map_err(WriterError::statistics(self.column_id))?;
        if self.enable_index {
            let entry = RowIndexEntry {
                positions: mem::take(&mut self.pending_positions),
                statistics: self.index_stats.summary(self.column_id),
            };
            self.row_index.push(entry);
        }
        self.index_stats.reset();
        Ok(())
    }

    pub(crate) fn mark_flushed(&mut self) {
        self.phase = StripePhase::Flushed;
    }

    pub(crate) fn merge_stripe_into_file(&mut self) -> Result<(), WriterError> {
        match self.phase {
            StripePhase::Flushed => {}
            StripePhase::Merged => {
                return Err(WriterError::contract(
                    self.column_id,
                    "stripe statistics were already merged into file statistics",
                ))
            }
            StripePhase::Writing => {
                return Err(WriterError::contract(
                    self.column_id,
                    "stripe statistics merged before flush",
                ))
            }
        }
        self.file_stats
            .merge(&self.stripe_stats)
            .map_err(WriterError::statistics(self.column_id))?;
        self.stripe_stats.reset();
        self.phase = StripePhase::Merged;
        Ok(())
    }

    pub(crate) fn write_index(&mut self, streams: &mut Vec<StreamData>) -> Result<(), WriterError> {
        self.require_phase(&[StripePhase::Flushed, StripePhase::Merged], "write_index")?;
        if self.index_written {
            return Err(WriterError::contract(
                self.column_id,
                "row index was already written for this stripe",
            ));
        }
        if let Some(stream) = &mut self.index_stream {
            let index = RowIndex {
                column_id: self.column_id,
                entries: self.row_index.clone(),
            };
            stream.write_bytes(&serde_json::to_vec(&index)?)?;
            streams.push(stream.flush()?);
        }
        self.index_written = true;
        Ok(())
    }

    pub(crate) fn start_stripe(&mut self) -> Result<(), WriterError> {
        self.require_phase(&[StripePhase::Flushed, StripePhase::Merged], "reset")?;
        self.index_stats.reset();
        self.row_index.clear();
        self.pending_positions.clear();
        self.index_written = false;
        self.phase = StripePhase::Writing;
        Ok(())
    }
}
