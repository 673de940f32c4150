use std::io::Cursor;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use colstripe::prelude::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tempfile::TempDir;

fn schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("category", DataType::Utf8, true),
        Field::new("value", DataType::Float64, true),
    ]))
}

/// Synthetic table with a low-cardinality string column
fn generate_batch(rows: usize) -> RecordBatch {
    let ids = Int64Array::from_iter_values(0..rows as i64);
    let categories = StringArray::from_iter(
        (0..rows).map(|i| (i % 9 != 0).then(|| format!("category-{}", i % 32))),
    );
    let values = Float64Array::from_iter((0..rows).map(|i| (i % 5 != 0).then_some(i as f64 * 0.25)));
    RecordBatch::try_new(
        schema(),
        vec![
            Arc::new(ids) as ArrayRef,
            Arc::new(categories) as ArrayRef,
            Arc::new(values) as ArrayRef,
        ],
    )
    .unwrap()
}

/// Benchmark end-to-end file writing per compression type
fn bench_file_writing(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_writing");
    let batch = generate_batch(100_000);
    group.throughput(Throughput::Elements(batch.num_rows() as u64));

    for (name, compression) in [
        ("uncompressed", CompressionType::Uncompressed),
        ("zlib1", CompressionType::fast()),
        ("zstd3", CompressionType::balanced()),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &compression, |b, &compression| {
            b.iter_batched(
                || {
                    let temp_dir = TempDir::new().unwrap();
                    let output_path = temp_dir.path().join("bench.cstr");
                    (temp_dir, output_path)
                },
                |(temp_dir, output_path)| {
                    let config = WriterConfig {
                        compression,
                        ..WriterConfig::default()
                    };
                    let mut writer = ColumnarFileWriter::new_file(&output_path, schema(), config).unwrap();
                    writer.write_batch(&batch).unwrap();
                    writer.finish().unwrap();
                    drop(temp_dir);
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

/// Benchmark a single string column in dictionary and direct mode
fn bench_string_encodings(c: &mut Criterion) {
    let mut group = c.benchmark_group("string_encodings");
    let strings = StringArray::from_iter_values((0..50_000).map(|i| format!("key-{}", i % 64)));
    group.throughput(Throughput::Elements(strings.len() as u64));

    for (name, threshold) in [("dictionary", 0.8), ("direct", 0.0)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &threshold, |b, &threshold| {
            let config = WriterConfig {
                dictionary_key_size_threshold: threshold,
                row_index_stride: 10_000,
                ..WriterConfig::default()
            };
            b.iter(|| {
                let mut factory = MemoryStreamsFactory::new(&config);
                let mut writer = build_writer(&TypeDescription::string(), &mut factory, &config).unwrap();
                for offset in (0..strings.len()).step_by(10_000) {
                    writer.add(&strings, offset, 10_000).unwrap();
                    writer.create_row_index_entry().unwrap();
                }
                let mut streams = Vec::new();
                writer.flush(&mut streams).unwrap();
                writer.write_index(&mut streams).unwrap();
                streams
            });
        });
    }

    group.finish();
}

/// Benchmark in-memory writing with the row index enabled and disabled
fn bench_row_index_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_index_overhead");
    let batch = generate_batch(50_000);
    group.throughput(Throughput::Elements(batch.num_rows() as u64));

    for stride in [0usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(stride), &stride, |b, &stride| {
            b.iter(|| {
                let config = WriterConfig {
                    row_index_stride: stride,
                    compression: CompressionType::Uncompressed,
                    ..WriterConfig::default()
                };
                let mut writer = ColumnarFileWriter::new(Cursor::new(Vec::new()), schema(), config).unwrap();
                writer.write_batch(&batch).unwrap();
                writer.finish_into_inner().unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_file_writing,
    bench_string_encodings,
    bench_row_index_overhead
);
criterion_main!(benches);
