use std::io::Cursor;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use super::*;
use crate::column::ColumnEncodingKind;
use crate::schema::TypeDescription;
use crate::statistics::TypedStatistics;
use crate::stream::StreamKind;

fn schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, true),
        Field::new("score", DataType::Float64, true),
    ]))
}

fn batch(start: i64, rows: i64) -> RecordBatch {
    let ids: Vec<i64> = (start..start + rows).collect();
    let names: Vec<Option<String>> = ids
        .iter()
        .map(|i| (i % 4 != 0).then(|| format!("name-{}", i % 3)))
        .collect();
    let scores: Vec<f64> = ids.iter().map(|&i| i as f64 * 0.5).collect();
    RecordBatch::try_new(
        schema(),
        vec![
            Arc::new(Int64Array::from(ids)) as ArrayRef,
            Arc::new(StringArray::from(names)) as ArrayRef,
            Arc::new(Float64Array::from(scores)) as ArrayRef,
        ],
    )
    .unwrap()
}

fn write(config: WriterConfig, batches: &[RecordBatch]) -> (Vec<u8>, FileFooter) {
    let mut writer = ColumnarFileWriter::new(Cursor::new(Vec::new()), schema(), config).unwrap();
    for batch in batches {
        writer.write_batch(batch).unwrap();
    }
    let bytes = writer.finish_into_inner().unwrap().into_inner();
    let footer = read_file_footer(&mut Cursor::new(&bytes)).unwrap();
    (bytes, footer)
}

#[test]
fn test_config_presets_validate() {
    assert!(WriterConfig::default().validate().is_ok());
    assert!(WriterConfig::fast_write().validate().is_ok());
    assert!(WriterConfig::max_compression().validate().is_ok());
    assert_eq!(WriterConfig::balanced(), WriterConfig::default());
    assert!(WriterConfig::fast_write().compression.is_compressed());

    let bad = WriterConfig {
        compression_block_size: MAX_COMPRESSION_BLOCK_SIZE + 1,
        ..WriterConfig::default()
    };
    assert!(matches!(bad.validate(), Err(WriterError::InvalidConfig(_))));

    let bad = WriterConfig {
        compression: CompressionType::Zstd(30),
        ..WriterConfig::default()
    };
    assert!(bad.validate().is_err());

    let bad = WriterConfig {
        dictionary_key_size_threshold: 1.5,
        ..WriterConfig::default()
    };
    assert!(bad.validate().is_err());
}

#[test]
fn test_config_serde_round_trip() {
    let config = WriterConfig::fast_write();
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"codec\":\"zlib\""));
    let back: WriterConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_single_stripe_file() {
    let (bytes, footer) = write(WriterConfig::default(), &[batch(0, 100), batch(100, 50)]);

    assert_eq!(&bytes[..4], MAGIC);
    assert_eq!(&bytes[bytes.len() - 4..], MAGIC);
    assert_eq!(footer.format_version, FORMAT_VERSION);
    assert_eq!(footer.number_of_rows, 150);
    assert_eq!(footer.stripes.len(), 1);
    assert_eq!(footer.stripes[0].offset, 4);
    assert_eq!(footer.schema.column_count(), 4);

    let id_stats = &footer.statistics[1];
    assert_eq!(id_stats.count, 150);
    assert_eq!(
        id_stats.typed,
        TypedStatistics::Integer {
            min: Some(0),
            max: Some(149),
            sum: Some((0..150).sum()),
        }
    );
    let name_stats = &footer.statistics[2];
    assert_eq!(name_stats.count, 150);
    assert_eq!(name_stats.null_count, 38);
}

#[test]
fn test_stripe_footer_lists_index_streams_first() {
    let (bytes, footer) = write(WriterConfig::default(), &[batch(0, 10)]);
    let stripe = &footer.stripes[0];
    let stripe_footer = read_stripe_footer(&mut Cursor::new(&bytes), stripe).unwrap();

    let index_streams = stripe_footer
        .streams
        .iter()
        .take_while(|s| s.kind == StreamKind::RowIndex)
        .count();
    assert_eq!(index_streams, 4);
    let index_bytes: u64 = stripe_footer.streams[..index_streams]
        .iter()
        .map(|s| s.length)
        .sum();
    assert_eq!(index_bytes, stripe.index_length);
    assert_eq!(stripe.end() as usize, bytes.len() - footer_tail(&bytes));

    assert_eq!(stripe_footer.encodings.len(), 4);
    assert!(matches!(
        stripe_footer.encodings[2].kind,
        ColumnEncodingKind::Dictionary { size: 3 }
    ));
}

fn footer_tail(bytes: &[u8]) -> usize {
    let len_at = bytes.len() - 12;
    let mut len = [0u8; 8];
    len.copy_from_slice(&bytes[len_at..len_at + 8]);
    u64::from_le_bytes(len) as usize + 12
}

#[test]
fn test_small_stripes_split_at_row_groups() {
    let config = WriterConfig {
        stripe_size: 1,
        row_index_stride: 100,
        ..WriterConfig::default()
    };
    let mut writer = ColumnarFileWriter::new(Cursor::new(Vec::new()), schema(), config).unwrap();
    writer.write_batch(&batch(0, 1000)).unwrap();
    let stats = writer.stats();
    assert_eq!(stats.rows_written, 1000);
    assert_eq!(stats.stripes_written, 10);
    assert_eq!(stats.row_groups_written, 10);

    let bytes = writer.finish_into_inner().unwrap().into_inner();
    let footer = read_file_footer(&mut Cursor::new(&bytes)).unwrap();
    assert_eq!(footer.stripes.len(), 10);
    for pair in footer.stripes.windows(2) {
        assert_eq!(pair[0].end(), pair[1].offset);
    }

    for column in 0..4 {
        let total: u64 = footer
            .stripe_statistics
            .iter()
            .map(|stripe| stripe[column].count)
            .sum();
        assert_eq!(total, footer.statistics[column].count);
    }
}

#[test]
fn test_partial_row_group_closed_at_finish() {
    let config = WriterConfig {
        row_index_stride: 64,
        ..WriterConfig::default()
    };
    let mut writer = ColumnarFileWriter::new(Cursor::new(Vec::new()), schema(), config).unwrap();
    writer.write_batch(&batch(0, 100)).unwrap();
    let stats = writer.finish().unwrap();
    assert_eq!(stats.row_groups_written, 2);
    assert_eq!(stats.stripes_written, 1);
    assert!(stats.to_string().starts_with("Wrote 100 rows in 1 stripes"));
}

#[test]
fn test_empty_file_has_footer() {
    let (_, footer) = write(WriterConfig::default(), &[]);
    assert!(footer.stripes.is_empty());
    assert_eq!(footer.statistics.len(), 4);
    assert!(footer.statistics.iter().all(|s| s.count == 0));
}

#[test]
fn test_write_array_requires_struct_root_for_batches() {
    let mut writer = ColumnarFileWriter::with_type(
        Cursor::new(Vec::new()),
        TypeDescription::long(),
        WriterConfig::default(),
    )
    .unwrap();
    assert!(matches!(
        writer.write_batch(&batch(0, 1)),
        Err(WriterError::InvalidData(_))
    ));
    writer
        .write_array(&Int64Array::from(vec![1, 2, 3]))
        .unwrap();
    assert_eq!(writer.finish().unwrap().rows_written, 3);
}

#[test]
fn test_truncated_file_is_rejected() {
    let (bytes, _) = write(WriterConfig::default(), &[batch(0, 10)]);
    let truncated = &bytes[..bytes.len() - 3];
    assert!(matches!(
        read_file_footer(&mut Cursor::new(truncated)),
        Err(WriterError::InvalidFile(_))
    ));
    assert!(read_file_footer(&mut Cursor::new(&bytes[..6])).is_err());
}

#[test]
fn test_statistics_mismatch_names_the_column() {
    use crate::schema::TypeKind;
    use crate::statistics::ColumnStatistics;

    let mut ints = ColumnStatistics::new(TypeKind::Int);
    let err = ints
        .merge(&ColumnStatistics::new(TypeKind::String))
        .map_err(WriterError::statistics(3))
        .unwrap_err();
    assert!(matches!(err, WriterError::StatisticsMismatch { column_id: 3, .. }));
    assert_eq!(
        err.to_string(),
        "Column 3: cannot merge string statistics into integer statistics"
    );
}
