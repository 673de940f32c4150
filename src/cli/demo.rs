use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int32Builder, Int64Array, ListBuilder, MapBuilder,
    StringArray, StringBuilder, StructArray,
};
use arrow::buffer::NullBuffer;
use arrow::datatypes::{DataType, Field, Fields, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use colstripe::writer::ColumnarFileWriter;

use super::config::Config;
use super::profile::Profile;

const BATCH_SIZE: usize = 10_000;
const CITIES: [&str; 6] = ["Lisbon", "Oslo", "Quito", "Hanoi", "Perth", "Tunis"];
const TAGS: [&str; 5] = ["new", "sale", "bulk", "gift", "eco"];

/// Write a synthetic nested dataset
pub fn run(
    output: PathBuf,
    rows: usize,
    profile: Profile,
    config_path: Option<PathBuf>,
    row_index_stride: Option<usize>,
    stripe_size: Option<u64>,
) -> Result<()> {
    info!("colstripe demo writer");
    info!("=====================");

    let mut config = profile.writer_config();
    if let Some(path) = config_path {
        config = Config::from_file(&path)?.apply(config)?;
    }
    if let Some(stride) = row_index_stride {
        config.row_index_stride = stride;
    }
    if let Some(size) = stripe_size {
        config.stripe_size = size;
    }
    info!(
        "Profile {}: {:?}, stripes of {} bytes, {} rows per row group",
        profile, config.compression, config.stripe_size, config.row_index_stride
    );

    let location = location_fields();
    let schema = demo_batch(0, 0, &location)?.schema();
    let mut writer =
        ColumnarFileWriter::new_file(&output, schema, config).context("Failed to create writer")?;

    let mut start = 0;
    while start < rows {
        let len = BATCH_SIZE.min(rows - start);
        let batch = demo_batch(start, len, &location).context("Failed to build demo batch")?;
        writer.write_batch(&batch).context("Failed to write batch")?;
        start += len;
        info!("  Written {} rows...", start);
    }

    let stats = writer.finish().context("Failed to finalize file")?;

    println!("Demo file written: {}", output.display());
    println!("  {}", stats);
    Ok(())
}

fn location_fields() -> Fields {
    Fields::from(vec![
        Field::new("city", DataType::Utf8, false),
        Field::new("lat", DataType::Float64, false),
        Field::new("lon", DataType::Float64, false),
    ])
}

/// Rows `start..start + len` of the demo table.
///
/// Values cycle with different periods so every encoder sees runs, literals,
/// nulls and both string encodings.
fn demo_batch(start: usize, len: usize, location: &Fields) -> Result<RecordBatch> {
    let rows = start..start + len;

    let ids = Int64Array::from_iter_values(rows.clone().map(|i| i as i64));
    let names = StringArray::from_iter(
        rows.clone()
            .map(|i| (i % 11 != 0).then(|| format!("customer-{:05}", i % 5_000))),
    );
    let scores = Float64Array::from_iter(
        rows.clone()
            .map(|i| (i % 7 != 3).then(|| ((i * 37) % 1_000) as f64 / 10.0)),
    );
    let flags = BooleanArray::from_iter(rows.clone().map(|i| (i % 13 != 0).then_some(i % 3 == 0)));

    let mut tags = ListBuilder::new(StringBuilder::new());
    for i in rows.clone() {
        if i % 17 == 0 {
            tags.append(false);
            continue;
        }
        for t in 0..i % 4 {
            tags.values().append_value(TAGS[(i + t) % TAGS.len()]);
        }
        tags.append(true);
    }
    let tags = tags.finish();

    let mut attrs = MapBuilder::new(None, StringBuilder::new(), Int32Builder::new());
    for i in rows.clone() {
        if i % 19 == 0 {
            attrs.append(false)?;
            continue;
        }
        for k in 0..i % 3 {
            attrs.keys().append_value(format!("attr{}", k));
            if (i + k) % 5 == 0 {
                attrs.values().append_null();
            } else {
                attrs.values().append_value((i * (k + 1)) as i32);
            }
        }
        attrs.append(true)?;
    }
    let attrs = attrs.finish();

    let cities = StringArray::from_iter_values(rows.clone().map(|i| CITIES[i % CITIES.len()]));
    let lats = Float64Array::from_iter_values(rows.clone().map(|i| (i % 180) as f64 - 90.0));
    let lons = Float64Array::from_iter_values(rows.clone().map(|i| (i % 360) as f64 - 180.0));
    let location_valid = NullBuffer::from(rows.clone().map(|i| i % 23 != 0).collect::<Vec<_>>());
    let locations = StructArray::try_new(
        location.clone(),
        vec![
            Arc::new(cities) as ArrayRef,
            Arc::new(lats) as ArrayRef,
            Arc::new(lons) as ArrayRef,
        ],
        Some(location_valid),
    )?;

    let columns: Vec<(&str, ArrayRef, bool)> = vec![
        ("id", Arc::new(ids), false),
        ("name", Arc::new(names), true),
        ("score", Arc::new(scores), true),
        ("flag", Arc::new(flags), true),
        ("tags", Arc::new(tags), true),
        ("attrs", Arc::new(attrs), true),
        ("location", Arc::new(locations), true),
    ];
    let schema: SchemaRef = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, array, nullable)| Field::new(*name, array.data_type().clone(), *nullable))
            .collect::<Vec<_>>(),
    ));
    let arrays = columns.into_iter().map(|(_, array, _)| array).collect();
    Ok(RecordBatch::try_new(schema, arrays)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use colstripe::validator::validate_file;

    #[test]
    fn test_demo_batch_shape() {
        let batch = demo_batch(0, 100, &location_fields()).unwrap();
        assert_eq!(batch.num_rows(), 100);
        assert_eq!(batch.num_columns(), 7);
        assert_eq!(batch.column(1).null_count(), 10);
    }

    #[test]
    fn test_demo_writes_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("demo.cstr");
        run(
            output.clone(),
            25_000,
            Profile::Fast,
            None,
            Some(1_000),
            Some(64 * 1024),
        )
        .unwrap();

        let report = validate_file(&output).unwrap();
        assert!(report.is_valid(), "{}", report);
    }
}
