use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use arrow::array::{Array, StructArray};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use byteorder::{LittleEndian, WriteBytesExt};
use log::{debug, info, warn};

use crate::column::{build_writer, ColumnWriter};
use crate::schema::{TypeDescription, TypeKind};
use crate::statistics::ColumnStatisticsSummary;
use crate::stream::{MemoryStreamsFactory, StreamData};

use super::config::WriterConfig;
use super::error::WriterError;
use super::footer::{FileFooter, StreamInfo, StripeFooter, StripeInformation, FORMAT_VERSION, MAGIC};
use super::stats::WriterStats;

/// Streaming writer for columnar stripe files.
///
/// Rows are cut into row groups of `row_index_stride` rows and into stripes once
/// the buffered size reaches `stripe_size`. Each stripe is written as its index
/// streams, its data streams and a JSON stripe footer; `finish` appends the
/// JSON file footer, its length and the magic.
pub struct ColumnarFileWriter<W: Write> {
    writer: W,
    schema: TypeDescription,
    config: WriterConfig,
    root: Box<dyn ColumnWriter>,
    position: u64,
    stripes: Vec<StripeInformation>,
    stripe_statistics: Vec<Vec<ColumnStatisticsSummary>>,
    rows_in_row_group: usize,
    rows_in_stripe: u64,
    rows_written: u64,
    row_groups_written: usize,
}

impl ColumnarFileWriter<BufWriter<File>> {
    /// Create a new writer to a file path
    pub fn new_file<P: AsRef<Path>>(
        path: P,
        schema: SchemaRef,
        config: WriterConfig,
    ) -> Result<Self, WriterError> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), schema, config)
    }
}

impl<W: Write> ColumnarFileWriter<W> {
    /// Create a new writer for record batches of `schema`
    pub fn new(writer: W, schema: SchemaRef, config: WriterConfig) -> Result<Self, WriterError> {
        let ty = TypeDescription::from_arrow_schema(&schema)?;
        Self::with_type(writer, ty, config)
    }

    /// Create a new writer for arrays of a logical type.
    ///
    /// Batches for a struct root can be written with [`Self::write_batch`]; any
    /// root accepts [`Self::write_array`].
    pub fn with_type(
        mut writer: W,
        schema: TypeDescription,
        config: WriterConfig,
    ) -> Result<Self, WriterError> {
        config.validate()?;
        let mut factory = MemoryStreamsFactory::new(&config);
        let root = build_writer(&schema, &mut factory, &config)?;
        info!(
            "Writing {} columns ({} streams), compression {:?}",
            schema.column_count(),
            factory.stream_count(),
            config.compression
        );

        writer.write_all(MAGIC)?;
        Ok(Self {
            writer,
            schema,
            config,
            root,
            position: MAGIC.len() as u64,
            stripes: Vec::new(),
            stripe_statistics: Vec::new(),
            rows_in_row_group: 0,
            rows_in_stripe: 0,
            rows_written: 0,
            row_groups_written: 0,
        })
    }

    /// Logical schema of the file
    pub fn schema(&self) -> &TypeDescription {
        &self.schema
    }

    /// Writes a record batch through the root struct writer
    pub fn write_batch(&mut self, batch: &RecordBatch) -> Result<(), WriterError> {
        if self.schema.kind() != TypeKind::Struct {
            return Err(WriterError::InvalidData(format!(
                "record batches need a struct root, schema is {}",
                self.schema
            )));
        }
        let array = StructArray::from(batch.clone());
        self.write_array(&array)
    }

    /// Writes every row of an array matching the root type
    pub fn write_array(&mut self, array: &dyn Array) -> Result<(), WriterError> {
        let stride = self.config.row_index_stride;
        let mut offset = 0;
        while offset < array.len() {
            let remaining = array.len() - offset;
            let chunk = if self.config.index_enabled() {
                remaining.min(stride - self.rows_in_row_group)
            } else {
                remaining
            };
            self.root.add(array, offset, chunk)?;
            offset += chunk;
            self.rows_in_row_group += chunk;
            self.rows_in_stripe += chunk as u64;
            self.rows_written += chunk as u64;

            if self.config.index_enabled() && self.rows_in_row_group == stride {
                self.root.create_row_index_entry()?;
                self.row_groups_written += 1;
                self.rows_in_row_group = 0;
            }
            if self.root.estimated_size() >= self.config.stripe_size {
                self.write_stripe()?;
            }
        }
        Ok(())
    }

    /// Closes the current stripe, if it holds any rows
    pub fn flush(&mut self) -> Result<(), WriterError> {
        self.write_stripe()
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), WriterError> {
        self.writer.write_all(bytes)?;
        self.position += bytes.len() as u64;
        Ok(())
    }

    fn write_streams(
        &mut self,
        streams: &[StreamData],
        infos: &mut Vec<StreamInfo>,
    ) -> Result<u64, WriterError> {
        let mut total = 0;
        for stream in streams {
            self.write_bytes(&stream.data)?;
            total += stream.len() as u64;
            infos.push(StreamInfo {
                column_id: stream.column_id,
                kind: stream.kind,
                length: stream.len() as u64,
            });
        }
        Ok(total)
    }

    fn write_stripe(&mut self) -> Result<(), WriterError> {
        if self.rows_in_stripe == 0 {
            return Ok(());
        }

        if self.rows_in_row_group > 0 {
            if self.config.index_enabled() {
                self.root.create_row_index_entry()?;
                self.row_groups_written += 1;
            } else {
                self.root.merge_row_group_stats_into_stripe_stats()?;
            }
        }

        let mut data_streams = Vec::new();
        self.root.flush(&mut data_streams)?;
        let mut index_streams = Vec::new();
        self.root.write_index(&mut index_streams)?;
        let mut encodings = Vec::new();
        self.root.get_column_encoding(&mut encodings);
        let mut statistics = Vec::new();
        self.root.get_stripe_statistics(&mut statistics);
        self.root.merge_stripe_stats_into_file_stats()?;
        self.root.reset()?;

        let offset = self.position;
        let mut infos = Vec::with_capacity(index_streams.len() + data_streams.len());
        let index_length = self.write_streams(&index_streams, &mut infos)?;
        let data_length = self.write_streams(&data_streams, &mut infos)?;
        let footer = serde_json::to_vec(&StripeFooter {
            streams: infos,
            encodings,
        })?;
        self.write_bytes(&footer)?;

        debug!(
            "Stripe {}: {} rows, {} index bytes, {} data bytes",
            self.stripes.len(),
            self.rows_in_stripe,
            index_length,
            data_length
        );
        self.stripes.push(StripeInformation {
            offset,
            index_length,
            data_length,
            footer_length: footer.len() as u64,
            number_of_rows: self.rows_in_stripe,
        });
        self.stripe_statistics.push(statistics);
        self.rows_in_stripe = 0;
        self.rows_in_row_group = 0;
        Ok(())
    }

    fn close(&mut self) -> Result<WriterStats, WriterError> {
        self.write_stripe()?;
        if self.stripes.is_empty() {
            warn!("Closing a file without rows");
        }

        let mut statistics = Vec::new();
        self.root.get_file_statistics(&mut statistics);
        let footer = FileFooter {
            format_version: FORMAT_VERSION,
            schema: self.schema.clone(),
            compression: self.config.compression,
            compression_block_size: self.config.compression_block_size,
            row_index_stride: self.config.row_index_stride,
            number_of_rows: self.rows_written,
            stripes: std::mem::take(&mut self.stripes),
            stripe_statistics: std::mem::take(&mut self.stripe_statistics),
            statistics,
        };
        let bytes = serde_json::to_vec(&footer)?;
        self.write_bytes(&bytes)?;
        self.writer.write_u64::<LittleEndian>(bytes.len() as u64)?;
        self.writer.write_all(MAGIC)?;
        self.position += 8 + MAGIC.len() as u64;
        self.writer.flush()?;

        let stats = WriterStats {
            rows_written: self.rows_written,
            stripes_written: footer.stripes.len(),
            row_groups_written: self.row_groups_written,
            file_size_bytes: self.position,
        };
        info!("{}", stats);
        Ok(stats)
    }

    /// Flush any buffered rows and finalize the file
    pub fn finish(mut self) -> Result<WriterStats, WriterError> {
        self.close()
    }

    /// Finalize the file and return the underlying writer
    ///
    /// This is useful when the writer is backed by an in-memory buffer and you need
    /// to access the written data.
    pub fn finish_into_inner(mut self) -> Result<W, WriterError> {
        self.close()?;
        Ok(self.writer)
    }

    /// Get current statistics
    pub fn stats(&self) -> WriterStats {
        WriterStats {
            rows_written: self.rows_written,
            stripes_written: self.stripes.len(),
            row_groups_written: self.row_groups_written,
            file_size_bytes: self.position,
        }
    }
}
