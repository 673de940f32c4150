use std::fmt;

use arrow::array::Array;

use crate::encoding::PositionRecorder;
use crate::statistics::{ColumnStatistics, ColumnStatisticsSummary};
use crate::stream::StreamData;
use crate::writer::WriterError;

use super::base::{ColumnWriterBase, StripePhase};
use super::types::{ColumnEncoding, RowIndexEntry};

/// A node of the column writer tree.
///
/// Concrete writers supply the type-specific hooks (`validate`, `write`,
/// `flush_encoders`, `record_data_positions`, `encoder_estimated_size`,
/// `get_column_encoding`); the protocol itself lives in the provided methods and
/// works on the shared [`ColumnWriterBase`] and the child writers.
///
/// One tree is driven by one thread. Per stripe the caller runs
/// `add`/`create_row_index_entry` any number of times, then `flush`,
/// `write_index`, `merge_stripe_stats_into_file_stats` and `reset`.
pub trait ColumnWriter: fmt::Debug + Send {
    /// Shared state of this node
    fn base(&self) -> &ColumnWriterBase;

    /// Mutable shared state of this node
    fn base_mut(&mut self) -> &mut ColumnWriterBase;

    /// Child writers in schema order
    fn children(&self) -> &[Box<dyn ColumnWriter>] {
        &[]
    }

    /// Mutable child writers in schema order
    fn children_mut(&mut self) -> &mut [Box<dyn ColumnWriter>] {
        &mut []
    }

    /// Checks that `add` would succeed for this subtree, without side effects
    fn validate(&self, batch: &dyn Array, offset: usize, num_values: usize)
        -> Result<(), WriterError>;

    /// Encodes a validated range into this subtree
    fn write(&mut self, batch: &dyn Array, offset: usize, num_values: usize)
        -> Result<(), WriterError>;

    /// Drains this node's value streams (the PRESENT stream is handled by `flush`)
    fn flush_encoders(&mut self, streams: &mut Vec<StreamData>) -> Result<(), WriterError>;

    /// Records the positions of this node's value streams
    fn record_data_positions(&mut self, recorder: &mut dyn PositionRecorder);

    /// Buffered bytes held by this node's value encoders
    fn encoder_estimated_size(&self) -> u64;

    /// Appends the encoding of this column and of its children
    fn get_column_encoding(&self, encodings: &mut Vec<ColumnEncoding>);

    /// Column id
    fn column_id(&self) -> u32 {
        self.base().column_id()
    }

    /// Current protocol phase
    fn phase(&self) -> StripePhase {
        self.base().phase()
    }

    /// Closed row-index entries of the current stripe
    fn row_index(&self) -> &[RowIndexEntry] {
        self.base().row_index()
    }

    /// Statistics of the open row group
    fn index_statistics(&self) -> &ColumnStatistics {
        self.base().index_statistics()
    }

    /// Consumes `num_values` values of `batch` starting at `offset`.
    ///
    /// The whole subtree is validated before anything is written, so a
    /// rejected call leaves statistics and streams untouched.
    fn add(&mut self, batch: &dyn Array, offset: usize, num_values: usize) -> Result<(), WriterError> {
        self.base().require_phase(&[StripePhase::Writing], "add")?;
        self.validate(batch, offset, num_values)?;
        self.write(batch, offset, num_values)
    }

    /// Upper bound on the bytes buffered by this subtree
    fn estimated_size(&self) -> u64 {
        self.base().present_estimated_size()
            + self.encoder_estimated_size()
            + self
                .children()
                .iter()
                .map(|child| child.estimated_size())
                .sum::<u64>()
    }

    /// Closes the current row group for this subtree and starts the next one
    fn create_row_index_entry(&mut self) -> Result<(), WriterError> {
        self.base()
            .require_phase(&[StripePhase::Writing], "create_row_index_entry")?;
        self.base_mut().close_row_group()?;
        for child in self.children_mut() {
            child.create_row_index_entry()?;
        }
        self.record_position();
        Ok(())
    }

    /// Snapshots the stream positions the next row-index entry starts at
    fn record_position(&mut self) {
        if !self.base().index_enabled() {
            return;
        }
        let mut positions = Vec::new();
        self.base().record_present_position(&mut positions);
        self.record_data_positions(&mut positions);
        self.base_mut().set_pending_positions(positions);
    }

    /// Finishes every stream of this subtree for the stripe.
    ///
    /// The open row group must be closed first, by `create_row_index_entry`
    /// or `merge_row_group_stats_into_stripe_stats`. A child only holds
    /// values when its parent does, so checking this node is enough.
    fn flush(&mut self, streams: &mut Vec<StreamData>) -> Result<(), WriterError> {
        self.base().require_phase(&[StripePhase::Writing], "flush")?;
        self.base().require_closed_row_group()?;
        self.base_mut().flush_present(streams)?;
        self.flush_encoders(streams)?;
        for child in self.children_mut() {
            child.flush(streams)?;
        }
        self.base_mut().mark_flushed();
        Ok(())
    }

    /// Serializes the row index of every column of this subtree
    fn write_index(&mut self, streams: &mut Vec<StreamData>) -> Result<(), WriterError> {
        self.base_mut().write_index(streams)?;
        for child in self.children_mut() {
            child.write_index(streams)?;
        }
        Ok(())
    }

    /// Folds the open row group into the stripe statistics without closing an entry
    fn merge_row_group_stats_into_stripe_stats(&mut self) -> Result<(), WriterError> {
        self.base_mut().merge_index_into_stripe()?;
        for child in self.children_mut() {
            child.merge_row_group_stats_into_stripe_stats()?;
        }
        Ok(())
    }

    /// Folds the stripe statistics into the file statistics; once per stripe
    fn merge_stripe_stats_into_file_stats(&mut self) -> Result<(), WriterError> {
        self.base_mut().merge_stripe_into_file()?;
        for child in self.children_mut() {
            child.merge_stripe_stats_into_file_stats()?;
        }
        Ok(())
    }

    /// Appends the stripe statistics of this subtree in pre-order
    fn get_stripe_statistics(&self, stats: &mut Vec<ColumnStatisticsSummary>) {
        let base = self.base();
        stats.push(base.stripe_statistics().summary(base.column_id()));
        for child in self.children() {
            child.get_stripe_statistics(stats);
        }
    }

    /// Appends the file statistics of this subtree in pre-order
    fn get_file_statistics(&self, stats: &mut Vec<ColumnStatisticsSummary>) {
        let base = self.base();
        stats.push(base.file_statistics().summary(base.column_id()));
        for child in self.children() {
            child.get_file_statistics(stats);
        }
    }

    /// Clears the row index and prepares this subtree for the next stripe
    fn reset(&mut self) -> Result<(), WriterError> {
        self.base_mut().start_stripe()?;
        self.record_position();
        for child in self.children_mut() {
            child.reset()?;
        }
        Ok(())
    }
}
