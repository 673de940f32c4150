use std::collections::HashMap;
use std::mem;

use arrow::array::{Array, StringArray};
use log::debug;

use crate::encoding::{IntRleEncoder, PositionRecorder};
use crate::schema::TypeDescription;
use crate::stream::{OutputStream, StreamData, StreamKind, StreamsFactory};
use crate::writer::{WriterConfig, WriterError};

use super::base::ColumnWriterBase;
use super::protocol::ColumnWriter;
use super::types::{ColumnEncoding, ColumnEncodingKind, RowIndexEntry};

/// Writer for string columns.
///
/// Values are collected into a dictionary for the whole stripe. At flush the
/// column is written with dictionary encoding when
/// `distinct / non_null <= dictionary_key_size_threshold`:
///
/// - DICTIONARY_DATA: the sorted distinct values, concatenated
/// - LENGTH: byte length of each dictionary entry
/// - DATA: dictionary id of each value (unsigned integer RLE)
///
/// and with direct encoding otherwise:
///
/// - DATA: the value bytes, concatenated
/// - LENGTH: byte length of each value
///
/// Since the encoding is only known at flush, the value-stream positions of every
/// row group are appended to the row-index entries then.
#[derive(Debug)]
pub struct StringColumnWriter {
    base: ColumnWriterBase,
    data: IntRleEncoder,
    length: IntRleEncoder,
    dictionary_data: OutputStream,
    threshold: f64,
    dictionary: HashMap<String, u32>,
    keys: Vec<String>,
    dictionary_bytes: u64,
    rows: Vec<u32>,
    // Index into `rows` where each row group starts
    row_group_starts: Vec<usize>,
    last_encoding: ColumnEncodingKind,
}

impl StringColumnWriter {
    /// Creates the writer and its streams
    pub fn new(
        ty: &TypeDescription,
        factory: &mut dyn StreamsFactory,
        config: &WriterConfig,
    ) -> Result<Self, WriterError> {
        let base = ColumnWriterBase::new(ty, factory, config)?;
        let (id, kind) = (ty.column_id(), ty.kind());
        let data = IntRleEncoder::new(factory.create_stream(id, kind, StreamKind::Data)?, false);
        let length = IntRleEncoder::new(factory.create_stream(id, kind, StreamKind::Length)?, false);
        let dictionary_data = factory.create_stream(id, kind, StreamKind::DictionaryData)?;
        Ok(Self {
            base,
            data,
            length,
            dictionary_data,
            threshold: config.dictionary_key_size_threshold,
            dictionary: HashMap::new(),
            keys: Vec::new(),
            dictionary_bytes: 0,
            rows: Vec::new(),
            row_group_starts: Vec::new(),
            last_encoding: ColumnEncodingKind::Direct,
        })
    }

    fn use_dictionary(&self) -> bool {
        let non_null = self.rows.len();
        non_null > 0 && self.keys.len() as f64 <= self.threshold * non_null as f64
    }

    fn insert(&mut self, value: &str) -> u32 {
        if let Some(&id) = self.dictionary.get(value) {
            return id;
        }
        let id = self.keys.len() as u32;
        self.dictionary.insert(value.to_string(), id);
        self.keys.push(value.to_string());
        self.dictionary_bytes += value.len() as u64;
        id
    }

    fn write_dictionary(&mut self) -> Result<(), WriterError> {
        let mut order: Vec<u32> = (0..self.keys.len() as u32).collect();
        order.sort_unstable_by(|&a, &b| self.keys[a as usize].cmp(&self.keys[b as usize]));

        let mut remap = vec![0u32; order.len()];
        for (sorted_id, &id) in order.iter().enumerate() {
            let key = &self.keys[id as usize];
            self.dictionary_data.write_bytes(key.as_bytes())?;
            self.length.write(key.len() as i64)?;
            remap[id as usize] = sorted_id as u32;
        }

        let Self {
            base,
            data,
            rows,
            row_group_starts,
            ..
        } = self;
        let mut marks = RowGroupMarks::new(base.row_index_mut(), row_group_starts.as_slice());
        for (row, &id) in rows.iter().enumerate() {
            marks.record_until(row, |positions| data.record_position(positions));
            data.write(i64::from(remap[id as usize]))?;
        }
        marks.record_until(usize::MAX, |positions| data.record_position(positions));
        Ok(())
    }

    fn write_direct(&mut self) -> Result<(), WriterError> {
        let Self {
            base,
            data,
            length,
            keys,
            rows,
            row_group_starts,
            ..
        } = self;
        let mut marks = RowGroupMarks::new(base.row_index_mut(), row_group_starts.as_slice());
        for (row, &id) in rows.iter().enumerate() {
            marks.record_until(row, |positions| {
                data.output().record_position(positions);
                length.record_position(positions);
            });
            let key = &keys[id as usize];
            data.output_mut().write_bytes(key.as_bytes())?;
            length.write(key.len() as i64)?;
        }
        marks.record_until(usize::MAX, |positions| {
            data.output().record_position(positions);
            length.record_position(positions);
        });
        Ok(())
    }
}

/// Walks the closed row-index entries alongside the buffered rows
struct RowGroupMarks<'a> {
    entries: &'a mut [RowIndexEntry],
    starts: &'a [usize],
    next: usize,
}

impl<'a> RowGroupMarks<'a> {
    fn new(entries: &'a mut [RowIndexEntry], starts: &'a [usize]) -> Self {
        Self {
            entries,
            starts,
            next: 0,
        }
    }

    /// Records positions for every entry whose row group starts at or before `row`
    fn record_until(&mut self, row: usize, mut record: impl FnMut(&mut Vec<u64>)) {
        while self.next < self.entries.len()
            && self.starts.get(self.next).is_some_and(|&start| start <= row)
        {
            record(&mut self.entries[self.next].positions);
            self.next += 1;
        }
    }
}

impl ColumnWriter for StringColumnWriter {
    fn base(&self) -> &ColumnWriterBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ColumnWriterBase {
        &mut self.base
    }

    fn validate(&self, batch: &dyn Array, offset: usize, num_values: usize) -> Result<(), WriterError> {
        self.base.downcast::<StringArray>(batch)?;
        self.base.check_batch(batch, offset, num_values)
    }

    fn write(&mut self, batch: &dyn Array, offset: usize, num_values: usize) -> Result<(), WriterError> {
        let values = self.base.downcast::<StringArray>(batch)?;
        self.base.write_present(batch, offset, num_values)?;
        for i in offset..offset + num_values {
            if values.is_valid(i) {
                let value = values.value(i);
                let id = self.insert(value);
                self.rows.push(id);
                self.base.index_stats_mut().update_string(value);
            }
        }
        Ok(())
    }

    fn flush_encoders(&mut self, streams: &mut Vec<StreamData>) -> Result<(), WriterError> {
        if self.use_dictionary() {
            debug!(
                "Column {}: dictionary encoding, {} keys for {} values",
                self.base.column_id(),
                self.keys.len(),
                self.rows.len()
            );
            self.write_dictionary()?;
            self.last_encoding = ColumnEncodingKind::Dictionary {
                size: self.keys.len() as u32,
            };
            streams.push(self.data.flush()?);
            streams.push(self.length.flush()?);
            streams.push(self.dictionary_data.flush()?);
        } else {
            debug!(
                "Column {}: direct encoding, {} keys for {} values",
                self.base.column_id(),
                self.keys.len(),
                self.rows.len()
            );
            self.write_direct()?;
            self.last_encoding = ColumnEncodingKind::Direct;
            streams.push(self.data.flush()?);
            streams.push(self.length.flush()?);
        }

        self.dictionary.clear();
        self.keys.clear();
        self.rows.clear();
        self.row_group_starts.clear();
        self.dictionary_bytes = 0;
        Ok(())
    }

    fn record_data_positions(&mut self, _recorder: &mut dyn PositionRecorder) {
        // Value-stream positions are resolved at flush
        self.row_group_starts.push(self.rows.len());
    }

    fn encoder_estimated_size(&self) -> u64 {
        self.dictionary_bytes
            + (self.rows.len() * mem::size_of::<u32>()) as u64
            + self.data.estimated_size()
            + self.length.estimated_size()
            + self.dictionary_data.buffered_size()
    }

    fn get_column_encoding(&self, encodings: &mut Vec<ColumnEncoding>) {
        encodings.push(ColumnEncoding {
            column_id: self.base.column_id(),
            kind: self.last_encoding,
        });
    }
}
