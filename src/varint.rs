//! Variable-length integer encoding (LEB128) and zigzag mapping
//!
//! The compact wire variant writes tags and integers as zigzag varints and
//! lengths/counts as unsigned varints.

use crate::error::{Error, Result};

/// Maximum bytes needed for a u32 varint (5 bytes)
pub const MAX_VARINT_U32_SIZE: usize = 5;

/// Maximum bytes needed for a u64 varint (10 bytes)
pub const MAX_VARINT_U64_SIZE: usize = 10;

/// Encode a u32 as varint into the given buffer
///
/// Returns the number of bytes written, or Error::ShortBuffer if insufficient space.
#[inline]
pub fn encode_u32(value: u32, buf: &mut [u8]) -> Result<usize> {
    encode_u64(u64::from(value), buf)
}

/// Decode a u32 varint from the given buffer
///
/// Returns (value, bytes_consumed) or an error.
#[inline]
pub fn decode_u32(buf: &[u8]) -> Result<(u32, usize)> {
    let (value, len) = decode_bounded(buf, MAX_VARINT_U32_SIZE)?;
    let value = u32::try_from(value).map_err(|_| Error::Overflow)?;
    Ok((value, len))
}

/// Encode a u64 as varint into the given buffer
///
/// Returns the number of bytes written, or Error::ShortBuffer if insufficient space.
#[inline]
pub fn encode_u64(value: u64, buf: &mut [u8]) -> Result<usize> {
    let mut value = value;
    let mut pos = 0;

    loop {
        if pos >= buf.len() {
            return Err(Error::ShortBuffer);
        }

        if value < 0x80 {
            buf[pos] = value as u8;
            return Ok(pos + 1);
        }

        buf[pos] = (value as u8) | 0x80;
        value >>= 7;
        pos += 1;
    }
}

/// Decode a u64 varint from the given buffer
///
/// Returns (value, bytes_consumed) or an error.
#[inline]
pub fn decode_u64(buf: &[u8]) -> Result<(u64, usize)> {
    decode_bounded(buf, MAX_VARINT_U64_SIZE)
}

fn decode_bounded(buf: &[u8], max_len: usize) -> Result<(u64, usize)> {
    let mut result = 0u64;
    let mut shift = 0u32;

    for pos in 0..max_len {
        let Some(&byte) = buf.get(pos) else {
            return Err(Error::UnexpectedEof);
        };

        let bits = u64::from(byte & 0x7F);
        // 10th byte of a u64 may only carry the top bit
        if shift == 63 && bits > 1 {
            return Err(Error::Overflow);
        }
        result |= bits << shift;

        if byte & 0x80 == 0 {
            return Ok((result, pos + 1));
        }

        shift += 7;
    }

    Err(Error::Overflow)
}

/// Map a signed integer onto an unsigned one so small magnitudes stay small
#[inline]
pub const fn zigzag_encode_i64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode_i64`]
#[inline]
pub const fn zigzag_decode_i64(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// 32-bit zigzag mapping
#[inline]
pub const fn zigzag_encode_i32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Inverse of [`zigzag_encode_i32`]
#[inline]
pub const fn zigzag_decode_i32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u32_roundtrip() {
        let test_values = [0, 1, 127, 128, 16383, 16384, u32::MAX];

        for &val in &test_values {
            let mut buf = [0u8; MAX_VARINT_U32_SIZE];
            let encoded_len = encode_u32(val, &mut buf).unwrap();
            let (decoded_val, decoded_len) = decode_u32(&buf[..encoded_len]).unwrap();

            assert_eq!(val, decoded_val);
            assert_eq!(encoded_len, decoded_len);
        }
    }

    #[test]
    fn test_u64_roundtrip() {
        let test_values = [0, 1, 127, 128, 16383, 16384, u32::MAX as u64, u64::MAX];

        for &val in &test_values {
            let mut buf = [0u8; MAX_VARINT_U64_SIZE];
            let encoded_len = encode_u64(val, &mut buf).unwrap();
            let (decoded_val, decoded_len) = decode_u64(&buf[..encoded_len]).unwrap();

            assert_eq!(val, decoded_val);
            assert_eq!(encoded_len, decoded_len);
        }
    }

    #[test]
    fn test_known_encodings() {
        let mut buf = [0u8; MAX_VARINT_U32_SIZE];
        assert_eq!(encode_u32(300, &mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[0xAC, 0x02]);
    }

    #[test]
    fn test_buffer_too_small() {
        let mut buf = [0u8; 2]; // Too small for large values
        assert_eq!(encode_u32(u32::MAX, &mut buf), Err(Error::ShortBuffer));
    }

    #[test]
    fn test_unexpected_eof() {
        let buf = [0x80]; // Incomplete varint
        assert_eq!(decode_u32(&buf), Err(Error::UnexpectedEof));
    }

    #[test]
    fn test_overlong_varint() {
        let buf = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01];
        assert_eq!(decode_u32(&buf), Err(Error::Overflow));

        // fits in five bytes but not in 32 bits
        let buf = [0xFF, 0xFF, 0xFF, 0xFF, 0x7F];
        assert_eq!(decode_u32(&buf), Err(Error::Overflow));

        let buf = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x02];
        assert_eq!(decode_u64(&buf), Err(Error::Overflow));
    }

    #[test]
    fn test_zigzag() {
        assert_eq!(zigzag_encode_i64(0), 0);
        assert_eq!(zigzag_encode_i64(-1), 1);
        assert_eq!(zigzag_encode_i64(1), 2);
        assert_eq!(zigzag_encode_i64(-2), 3);
        assert_eq!(zigzag_encode_i32(i32::MIN), u32::MAX);

        for v in [0i64, 1, -1, 63, -64, i64::MIN, i64::MAX] {
            assert_eq!(zigzag_decode_i64(zigzag_encode_i64(v)), v);
        }
        for v in [0i32, 1, -1, i32::MIN, i32::MAX] {
            assert_eq!(zigzag_decode_i32(zigzag_encode_i32(v)), v);
        }
    }
}
