use super::*;
use crate::schema::TypeKind;
use crate::writer::{CompressionType, WriterConfig, WriterError};

fn factory(compression: CompressionType, block_size: usize) -> MemoryStreamsFactory {
    MemoryStreamsFactory::new(&WriterConfig {
        compression,
        compression_block_size: block_size,
        ..WriterConfig::default()
    })
}

#[test]
fn test_uncompressed_positions_count_bytes() {
    let mut factory = factory(CompressionType::Uncompressed, 16);
    let mut stream = factory
        .create_stream(1, TypeKind::Long, StreamKind::Data)
        .unwrap();

    stream.write_bytes(b"hello").unwrap();
    let mut positions = Vec::new();
    stream.record_position(&mut positions);
    assert_eq!(positions, vec![5]);

    stream.write_bytes(b" world").unwrap();
    let data = stream.flush().unwrap();
    assert_eq!(&data.data[..], b"hello world");

    let (rest, used) = seek_stream(&data.data, CompressionType::Uncompressed, &positions).unwrap();
    assert_eq!(rest, b" world");
    assert_eq!(used, 1);
}

#[test]
fn test_compressed_chunks_and_seek() {
    for compression in [CompressionType::Zlib(6), CompressionType::Zstd(3)] {
        let mut factory = factory(compression, 64);
        let mut stream = factory
            .create_stream(2, TypeKind::String, StreamKind::Data)
            .unwrap();

        let payload: Vec<u8> = (0..1000u32).map(|i| (i % 7) as u8).collect();
        let mut marks = Vec::new();
        for (i, chunk) in payload.chunks(50).enumerate() {
            if i == 9 {
                stream.record_position(&mut marks);
            }
            stream.write_bytes(chunk).unwrap();
        }
        assert_eq!(marks.len(), 2);

        let data = stream.flush().unwrap();
        assert_eq!(decompress_stream(&data.data, compression).unwrap(), payload);

        let (rest, used) = seek_stream(&data.data, compression, &marks).unwrap();
        assert_eq!(used, 2);
        assert_eq!(rest, payload[450..].to_vec());
    }
}

#[test]
fn test_incompressible_chunk_is_stored_original() {
    let mut factory = factory(CompressionType::Zlib(9), 8);
    let mut stream = factory
        .create_stream(0, TypeKind::Byte, StreamKind::Data)
        .unwrap();
    stream.write_bytes(&[0x9a, 0x13, 0xf0]).unwrap();
    let data = stream.flush().unwrap();

    // header: (3 << 1) | 1
    assert_eq!(&data.data[..3], &[7, 0, 0]);
    assert_eq!(&data.data[3..], &[0x9a, 0x13, 0xf0]);
}

#[test]
fn test_flush_restarts_positions() {
    let mut factory = factory(CompressionType::Zstd(1), 32);
    let mut stream = factory
        .create_stream(3, TypeKind::Int, StreamKind::Data)
        .unwrap();
    stream.write_bytes(&[1; 100]).unwrap();
    assert!(stream.buffered_size() > 0);
    stream.flush().unwrap();

    let mut positions = Vec::new();
    stream.record_position(&mut positions);
    assert_eq!(positions, vec![0, 0]);
    assert_eq!(stream.buffered_size(), 0);
}

#[test]
fn test_factory_rejects_unsupported_and_duplicate_streams() {
    let mut factory = factory(CompressionType::Uncompressed, 16);

    let err = factory
        .create_stream(1, TypeKind::Struct, StreamKind::Data)
        .unwrap_err();
    assert!(matches!(err, WriterError::UnsupportedStream { column_id: 1, .. }));

    let err = factory
        .create_stream(1, TypeKind::Long, StreamKind::DictionaryData)
        .unwrap_err();
    assert!(matches!(err, WriterError::UnsupportedStream { .. }));

    factory
        .create_stream(1, TypeKind::Long, StreamKind::Data)
        .unwrap();
    let err = factory
        .create_stream(1, TypeKind::Long, StreamKind::Data)
        .unwrap_err();
    assert!(matches!(err, WriterError::DuplicateStream { column_id: 1, kind: StreamKind::Data }));

    // Same kind for another column is a distinct stream
    factory
        .create_stream(2, TypeKind::Long, StreamKind::Data)
        .unwrap();
    assert_eq!(factory.stream_count(), 2);
}

#[test]
fn test_io_write_goes_through_chunking() {
    use byteorder::{LittleEndian, WriteBytesExt};

    let mut factory = factory(CompressionType::Zlib(6), 8);
    let mut stream = factory
        .create_stream(3, TypeKind::Double, StreamKind::Data)
        .unwrap();
    for v in [1.5f64, -2.25, 1e300] {
        stream.write_f64::<LittleEndian>(v).unwrap();
    }
    let data = stream.flush().unwrap();

    let raw = decompress_stream(&data.data, CompressionType::Zlib(6)).unwrap();
    assert_eq!(raw.len(), 24);
    assert_eq!(&raw[8..16], &(-2.25f64).to_le_bytes());
}

#[test]
fn test_every_stream_kind_has_a_column_kind() {
    let type_kinds = [
        TypeKind::Boolean,
        TypeKind::Long,
        TypeKind::Double,
        TypeKind::String,
        TypeKind::Struct,
        TypeKind::List,
    ];
    for kind in [
        StreamKind::Present,
        StreamKind::Data,
        StreamKind::Length,
        StreamKind::DictionaryData,
        StreamKind::RowIndex,
    ] {
        assert!(
            type_kinds.iter().any(|&ty| kind.is_supported_for(ty)),
            "{} is never produced",
            kind
        );
    }
    assert!(!StreamKind::Data.is_supported_for(TypeKind::Struct));
    assert!(StreamKind::Length.is_supported_for(TypeKind::List));
}
