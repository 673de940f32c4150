//! Integration tests for colstripe
//!
//! These tests drive the public API end to end: Arrow batches in, a validated
//! file out, footers and statistics read back.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use arrow::array::{ArrayRef, Date32Array, Int16Array, ListArray, StringArray, StructArray};
use arrow::datatypes::{DataType, Field, Fields, Int32Type, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use colstripe::prelude::*;
use colstripe::statistics::TypedStatistics;
use colstripe::writer::{read_file_footer, read_stripe_footer};
use tempfile::tempdir;

fn point_fields() -> Fields {
    Fields::from(vec![
        Field::new("x", DataType::Int16, true),
        Field::new("label", DataType::Utf8, true),
    ])
}

fn schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("day", DataType::Date32, false),
        Field::new(
            "readings",
            DataType::List(Arc::new(Field::new("item", DataType::Int32, true))),
            true,
        ),
        Field::new("point", DataType::Struct(point_fields()), true),
    ]))
}

fn batch(start: i32, rows: i32) -> RecordBatch {
    let days = Date32Array::from_iter_values(start..start + rows);
    let readings = ListArray::from_iter_primitive::<Int32Type, _, _>((start..start + rows).map(|i| {
        (i % 6 != 0).then(|| (0..i % 3).map(move |j| (j != 1).then_some(i * 10 + j)))
    }));
    let xs = Int16Array::from_iter((start..start + rows).map(|i| Some((i % 300) as i16)));
    let labels = StringArray::from_iter((start..start + rows).map(|i| (i % 2 == 0).then(|| format!("p{}", i % 4))));
    let point = StructArray::new(
        point_fields(),
        vec![Arc::new(xs) as ArrayRef, Arc::new(labels) as ArrayRef],
        None,
    );
    RecordBatch::try_new(
        schema(),
        vec![
            Arc::new(days) as ArrayRef,
            Arc::new(readings) as ArrayRef,
            Arc::new(point) as ArrayRef,
        ],
    )
    .unwrap()
}

/// Test the complete write-validate-read cycle
#[test]
fn test_write_validate_read_cycle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cycle.cstr");

    let config = WriterConfig {
        row_index_stride: 250,
        stripe_size: 1,
        compression_block_size: 1024,
        ..WriterConfig::default()
    };
    let mut writer = ColumnarFileWriter::new_file(&path, schema(), config).unwrap();
    for start in (0..5_000).step_by(1_000) {
        writer.write_batch(&batch(start, 1_000)).unwrap();
    }
    let stats = writer.finish().unwrap();
    assert_eq!(stats.rows_written, 5_000);
    assert_eq!(stats.stripes_written, 20);

    let report = validate_file(&path).unwrap();
    assert!(report.is_valid(), "{}", report);

    let mut reader = BufReader::new(File::open(&path).unwrap());
    let footer = read_file_footer(&mut reader).unwrap();
    assert_eq!(footer.number_of_rows, 5_000);
    assert_eq!(footer.stripes.len(), stats.stripes_written);
    assert_eq!(stats.file_size_bytes, std::fs::metadata(&path).unwrap().len());

    // root, day, readings, readings.item, point, point.x, point.label
    assert_eq!(footer.schema.column_count(), 7);
    assert_eq!(
        footer.statistics[1].typed,
        TypedStatistics::Integer {
            min: Some(0),
            max: Some(4_999),
            sum: Some((0..5_000i64).sum()),
        }
    );
    let readings = &footer.statistics[2];
    assert_eq!(readings.count, 5_000);
    assert_eq!(readings.null_count, (0..5_000).filter(|i| i % 6 == 0).count() as u64);

    let items = &footer.statistics[3];
    let expected_items: u64 = (0..5_000).filter(|i| i % 6 != 0).map(|i| (i % 3) as u64).sum();
    assert_eq!(items.count, expected_items);

    let labels = &footer.statistics[6];
    assert_eq!(labels.null_count, 2_500);
    assert!(matches!(
        &labels.typed,
        TypedStatistics::String { min: Some(min), max: Some(max), .. } if min == "p0" && max == "p2"
    ));

    for column in 0..7 {
        let total: u64 = footer.stripe_statistics.iter().map(|s| s[column].count).sum();
        assert_eq!(total, footer.statistics[column].count);
    }

    let stripe_footer = read_stripe_footer(&mut reader, &footer.stripes[0]).unwrap();
    assert_eq!(stripe_footer.encodings.len(), 7);
    assert!(matches!(
        stripe_footer.encodings[6].kind,
        ColumnEncodingKind::Dictionary { size: 2 }
    ));
}

/// Test writing an empty file
#[test]
fn test_empty_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.cstr");

    let writer = ColumnarFileWriter::new_file(&path, schema(), WriterConfig::default()).unwrap();
    let stats = writer.finish().unwrap();
    assert_eq!(stats.rows_written, 0);
    assert_eq!(stats.stripes_written, 0);

    let report = validate_file(&path).unwrap();
    assert!(report.is_valid());
    assert!(report.has_warnings());
}

/// Every compression setting produces a valid file with identical statistics
#[test]
fn test_compression_types() {
    let dir = tempdir().unwrap();
    let mut footers = Vec::new();

    for compression in [
        CompressionType::Uncompressed,
        CompressionType::Zlib(6),
        CompressionType::Zstd(3),
        CompressionType::max_compression(),
    ] {
        let path = dir.path().join(format!("{:?}.cstr", compression));
        let config = WriterConfig {
            compression,
            row_index_stride: 100,
            ..WriterConfig::default()
        };
        let mut writer = ColumnarFileWriter::new_file(&path, schema(), config).unwrap();
        writer.write_batch(&batch(0, 777)).unwrap();
        writer.finish().unwrap();

        let report = validate_file(&path).unwrap();
        assert!(report.is_valid(), "{:?}: {}", compression, report);
        let footer = read_file_footer(&mut BufReader::new(File::open(&path).unwrap())).unwrap();
        assert_eq!(footer.compression, compression);
        footers.push(footer);
    }

    for footer in &footers[1..] {
        assert_eq!(footer.statistics, footers[0].statistics);
    }
}

/// A writer tree built directly over the in-memory stream factory
#[test]
fn test_build_writer_over_memory_streams() {
    let config = WriterConfig {
        row_index_stride: 2,
        ..WriterConfig::default()
    };
    let ty = TypeDescription::list(TypeDescription::int());
    let mut factory = MemoryStreamsFactory::new(&config);
    let mut writer = build_writer(&ty, &mut factory, &config).unwrap();
    // list Present + Length + RowIndex, element Present + Data + RowIndex
    assert_eq!(factory.stream_count(), 6);

    let lists = ListArray::from_iter_primitive::<Int32Type, _, _>(vec![
        Some(vec![Some(1), Some(2)]),
        None,
        Some(vec![]),
        Some(vec![Some(3)]),
    ]);
    writer.add(&lists, 0, 2).unwrap();
    writer.create_row_index_entry().unwrap();
    writer.add(&lists, 2, 2).unwrap();
    writer.create_row_index_entry().unwrap();

    let mut streams = Vec::new();
    writer.flush(&mut streams).unwrap();
    writer.write_index(&mut streams).unwrap();
    writer.merge_stripe_stats_into_file_stats().unwrap();
    assert_eq!(writer.phase(), StripePhase::Merged);

    let mut file_stats = Vec::new();
    writer.get_file_statistics(&mut file_stats);
    assert_eq!(file_stats[0].count, 4);
    assert_eq!(file_stats[0].null_count, 1);
    assert_eq!(file_stats[1].count, 3);
    assert_eq!(writer.row_index().len(), 2);
    assert_eq!(writer.children()[0].row_index().len(), 2);

    assert!(streams.iter().any(|s| s.kind == StreamKind::RowIndex));
    assert!(streams.iter().all(|s| s.column_id <= 1));
}
