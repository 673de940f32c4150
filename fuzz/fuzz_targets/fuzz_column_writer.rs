#![no_main]

use arrow::array::{Int64Array, StringArray};
use colstripe::prelude::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // First byte picks the row-group stride, second the codec
    let stride = (data[0] % 16) as usize;
    let compression = match data[1] % 3 {
        0 => CompressionType::Uncompressed,
        1 => CompressionType::Zlib(1),
        _ => CompressionType::Zstd(1),
    };
    let config = WriterConfig {
        compression,
        compression_block_size: 64,
        row_index_stride: stride,
        ..WriterConfig::default()
    };
    let payload = &data[2..];

    let ints = Int64Array::from_iter(payload.chunks(3).map(|c| {
        (c[0] % 7 != 0).then(|| c.iter().fold(0i64, |acc, b| acc.wrapping_mul(251).wrapping_add(*b as i64)))
    }));
    let strings = StringArray::from_iter(payload.chunks(3).map(|c| {
        (c[0] % 5 != 0).then(|| String::from_utf8_lossy(&c[1..]).into_owned())
    }));

    for (ty, array) in [
        (TypeDescription::long(), &ints as &dyn arrow::array::Array),
        (TypeDescription::string(), &strings as &dyn arrow::array::Array),
    ] {
        let mut factory = MemoryStreamsFactory::new(&config);
        let mut writer = build_writer(&ty, &mut factory, &config).unwrap();

        // Writing any data in any grouping must never panic, and the rolled-up
        // count must equal the number of rows written
        let step = stride.max(1);
        let mut offset = 0;
        while offset < array.len() {
            let len = step.min(array.len() - offset);
            writer.add(array, offset, len).unwrap();
            writer.create_row_index_entry().unwrap();
            offset += len;
        }
        let mut streams = Vec::new();
        writer.flush(&mut streams).unwrap();
        writer.write_index(&mut streams).unwrap();
        writer.merge_stripe_stats_into_file_stats().unwrap();

        let mut stats = Vec::new();
        writer.get_file_statistics(&mut stats);
        assert_eq!(stats[0].count, array.len() as u64);
    }
});
