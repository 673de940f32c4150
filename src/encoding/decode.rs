//! Reference decoders used to check encoder output and recorded positions.

use crate::stream::seek_stream;
use crate::writer::CompressionType;

fn read_varint(data: &[u8], pos: &mut usize) -> u64 {
    let mut result = 0u64;
    let mut shift = 0;
    loop {
        let byte = data[*pos];
        *pos += 1;
        result |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return result;
        }
        shift += 7;
    }
}

fn unzigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

pub(crate) fn decode_byte_rle(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < data.len() {
        let control = data[pos] as i8;
        pos += 1;
        if control >= 0 {
            let len = control as usize + 3;
            out.extend(std::iter::repeat(data[pos]).take(len));
            pos += 1;
        } else {
            let len = (-(control as i32)) as usize;
            out.extend_from_slice(&data[pos..pos + len]);
            pos += len;
        }
    }
    out
}

pub(crate) fn decode_booleans(data: &[u8]) -> Vec<bool> {
    decode_byte_rle(data)
        .into_iter()
        .flat_map(|byte| (0..8).rev().map(move |bit| byte & (1 << bit) != 0))
        .collect()
}

pub(crate) fn decode_int_rle(data: &[u8], signed: bool) -> Vec<i64> {
    let read = |pos: &mut usize| {
        let raw = read_varint(data, pos);
        if signed {
            unzigzag(raw)
        } else {
            raw as i64
        }
    };
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < data.len() {
        let control = data[pos] as i8;
        pos += 1;
        if control >= 0 {
            let len = control as usize + 3;
            let delta = data[pos] as i8 as i64;
            pos += 1;
            let base = read(&mut pos);
            for i in 0..len {
                out.push(base.wrapping_add(delta.wrapping_mul(i as i64)));
            }
        } else {
            let len = (-(control as i32)) as usize;
            for _ in 0..len {
                out.push(read(&mut pos));
            }
        }
    }
    out
}

/// Seeks a byte-RLE stream; returns the values from the position and the
/// number of position entries consumed.
pub(crate) fn seek_byte_rle(
    data: &[u8],
    compression: CompressionType,
    positions: &[u64],
) -> (Vec<u8>, usize) {
    let (rest, used) = seek_stream(data, compression, positions).unwrap();
    let skip = positions[used] as usize;
    (decode_byte_rle(&rest)[skip..].to_vec(), used + 1)
}

pub(crate) fn seek_booleans(
    data: &[u8],
    compression: CompressionType,
    positions: &[u64],
) -> (Vec<bool>, usize) {
    let (rest, used) = seek_stream(data, compression, positions).unwrap();
    let skip_bytes = positions[used] as usize;
    let skip_bits = positions[used + 1] as usize;
    let bits = decode_booleans(&rest);
    (bits[skip_bytes * 8 + skip_bits..].to_vec(), used + 2)
}

pub(crate) fn seek_int_rle(
    data: &[u8],
    compression: CompressionType,
    positions: &[u64],
    signed: bool,
) -> (Vec<i64>, usize) {
    let (rest, used) = seek_stream(data, compression, positions).unwrap();
    let skip = positions[used] as usize;
    (decode_int_rle(&rest, signed)[skip..].to_vec(), used + 1)
}
