//! Low-level, bounds-checked little-endian reading and writing.
//!
//! The tables stream stores every column as a little-endian integer whose width is either
//! fixed (2 or 4 bytes for flags) or dynamic (2 or 4 bytes for heap and table indices,
//! depending on heap and table sizes). These helpers are the only place where raw bytes are
//! touched; everything above them works on `u32` column values.
//!
//! All functions return [`crate::Error::OutOfBounds`] instead of panicking when the buffer is
//! too small.
//!
//! ```rust,ignore
//! use cilgraph::file::io::{read_le_at, write_le_at};
//!
//! let mut data = [0u8; 6];
//! let mut offset = 0;
//! write_le_at(&mut data, &mut offset, 1u16)?;
//! write_le_at(&mut data, &mut offset, 2u32)?;
//!
//! offset = 0;
//! assert_eq!(read_le_at::<u16>(&data, &mut offset)?, 1);
//! assert_eq!(read_le_at::<u32>(&data, &mut offset)?, 2);
//! # Ok::<(), cilgraph::Error>(())
//! ```

use crate::{Error::OutOfBounds, Result};

/// Trait for type-specific, endian-aware conversion between integers and byte arrays.
///
/// Each implementation defines a `Bytes` associated type that represents the fixed-size
/// byte array required for that particular type (e.g., `[u8; 4]` for `u32`).
pub trait CilIO: Sized {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in little-endian
    fn to_le_bytes(self) -> Self::Bytes;
}

// Implement CilIO support for u64
impl CilIO for u64 {
    type Bytes = [u8; 8];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u64::from_le_bytes(bytes)
    }

    fn to_le_bytes(self) -> Self::Bytes {
        u64::to_le_bytes(self)
    }
}

// Implement CilIO support for u32
impl CilIO for u32 {
    type Bytes = [u8; 4];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u32::from_le_bytes(bytes)
    }

    fn to_le_bytes(self) -> Self::Bytes {
        u32::to_le_bytes(self)
    }
}

// Implement CilIO support from u16
impl CilIO for u16 {
    type Bytes = [u8; 2];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u16::from_le_bytes(bytes)
    }

    fn to_le_bytes(self) -> Self::Bytes {
        u16::to_le_bytes(self)
    }
}

// Implement CilIO support from u8
impl CilIO for u8 {
    type Bytes = [u8; 1];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u8::from_le_bytes(bytes)
    }

    fn to_le_bytes(self) -> Self::Bytes {
        u8::to_le_bytes(self)
    }
}

/// Read a little-endian value from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is too short.
pub fn read_le<T: CilIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Read a little-endian value at `offset`, advancing the offset by the size of `T`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn read_le_at<T: CilIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    if (type_len + *offset) > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..*offset + type_len].try_into() else {
        return Err(OutOfBounds);
    };

    *offset += type_len;

    Ok(T::from_le_bytes(read))
}

/// Read a 2 or 4 byte little-endian index, depending on `is_large`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the buffer is too short.
pub fn read_le_at_dyn(data: &[u8], offset: &mut usize, is_large: bool) -> Result<u32> {
    let res = if is_large {
        read_le_at::<u32>(data, offset)?
    } else {
        u32::from(read_le_at::<u16>(data, offset)?)
    };

    Ok(res)
}

/// Write a little-endian value at `offset`, advancing the offset by the size of `T`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the value does not fit into `data`.
pub fn write_le_at<T: CilIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    let type_len = std::mem::size_of::<T>();
    if (type_len + *offset) > data.len() {
        return Err(OutOfBounds);
    }

    data[*offset..*offset + type_len].copy_from_slice(value.to_le_bytes().as_ref());
    *offset += type_len;

    Ok(())
}

/// Write a 2 or 4 byte little-endian index, depending on `is_large`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the value does not fit into `data`, or
/// [`crate::Error::Malformed`] if a small index can not hold `value`.
pub fn write_le_at_dyn(
    data: &mut [u8],
    offset: &mut usize,
    value: u32,
    is_large: bool,
) -> Result<()> {
    if is_large {
        write_le_at::<u32>(data, offset, value)
    } else {
        let Ok(small) = u16::try_from(value) else {
            return Err(malformed_error!(
                "Value 0x{:x} does not fit into a 2 byte index",
                value
            ));
        };
        write_le_at::<u16>(data, offset, small)
    }
}

/// Read an ECMA-335 II.23.2 compressed unsigned integer at `offset`, advancing it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the encoding runs past `data`, or
/// [`crate::Error::Malformed`] for an invalid leading byte.
pub fn read_compressed_uint_at(data: &[u8], offset: &mut usize) -> Result<u32> {
    let first_byte = read_le_at::<u8>(data, offset)?;

    // 1-byte encoding: 0xxxxxxx
    if (first_byte & 0x80) == 0 {
        return Ok(u32::from(first_byte));
    }

    // 2-byte encoding: 10xxxxxx xxxxxxxx
    if (first_byte & 0xC0) == 0x80 {
        let second_byte = read_le_at::<u8>(data, offset)?;
        return Ok(((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte));
    }

    // 4-byte encoding: 11xxxxxx xxxxxxxx xxxxxxxx xxxxxxxx
    if (first_byte & 0xE0) == 0xC0 {
        let b1 = u32::from(read_le_at::<u8>(data, offset)?);
        let b2 = u32::from(read_le_at::<u8>(data, offset)?);
        let b3 = u32::from(read_le_at::<u8>(data, offset)?);
        return Ok(((u32::from(first_byte) & 0x1F) << 24) | (b1 << 16) | (b2 << 8) | b3);
    }

    Err(malformed_error!("Invalid compressed uint - {}", first_byte))
}

/// Append `value` as an ECMA-335 II.23.2 compressed unsigned integer.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if `value` exceeds `0x1FFF_FFFF`.
pub fn write_compressed_uint(out: &mut Vec<u8>, value: u32) -> Result<()> {
    match value {
        0..=0x7F => out.push(value.to_le_bytes()[0]),
        0x80..=0x3FFF => {
            let bytes = value.to_be_bytes();
            out.extend_from_slice(&[bytes[2] | 0x80, bytes[3]]);
        }
        0x4000..=0x1FFF_FFFF => {
            let bytes = value.to_be_bytes();
            out.extend_from_slice(&[bytes[0] | 0xC0, bytes[1], bytes[2], bytes[3]]);
        }
        _ => {
            return Err(malformed_error!(
                "Value 0x{:x} is too large for a compressed uint",
                value
            ))
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_le_u16() {
        let result = read_le::<u16>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0201);
    }

    #[test]
    fn read_le_u32() {
        let result = read_le::<u32>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0403_0201);
    }

    #[test]
    fn read_le_u64() {
        let result = read_le::<u64>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0807_0605_0403_0201);
    }

    #[test]
    fn read_le_at_advances() {
        let mut offset = 0;
        assert_eq!(read_le_at::<u16>(&TEST_BUFFER, &mut offset).unwrap(), 0x0201);
        assert_eq!(offset, 2);
        assert_eq!(read_le_at::<u16>(&TEST_BUFFER, &mut offset).unwrap(), 0x0403);
        assert_eq!(offset, 4);
    }

    #[test]
    fn read_dyn() {
        let mut offset = 0;
        assert_eq!(read_le_at_dyn(&TEST_BUFFER, &mut offset, false).unwrap(), 0x0201);
        assert_eq!(read_le_at_dyn(&TEST_BUFFER, &mut offset, true).unwrap(), 0x0605_0403);
        assert_eq!(offset, 6);
    }

    #[test]
    fn read_out_of_bounds() {
        let mut offset = 6;
        assert!(matches!(
            read_le_at::<u32>(&TEST_BUFFER, &mut offset),
            Err(OutOfBounds)
        ));
        assert_eq!(offset, 6);
    }

    #[test]
    fn write_then_read() {
        let mut data = [0u8; 6];
        let mut offset = 0;
        write_le_at_dyn(&mut data, &mut offset, 0x1234, false).unwrap();
        write_le_at_dyn(&mut data, &mut offset, 0xAABB_CCDD, true).unwrap();
        assert_eq!(data, [0x34, 0x12, 0xDD, 0xCC, 0xBB, 0xAA]);
        assert_eq!(offset, 6);
    }

    #[test]
    fn write_small_overflow() {
        let mut data = [0u8; 2];
        let mut offset = 0;
        assert!(write_le_at_dyn(&mut data, &mut offset, 0x1_0000, false).is_err());
    }

    #[test]
    fn write_out_of_bounds() {
        let mut data = [0u8; 3];
        let mut offset = 0;
        assert!(matches!(
            write_le_at::<u32>(&mut data, &mut offset, 1),
            Err(OutOfBounds)
        ));
    }

    #[test]
    fn compressed_uint_encodings() {
        let cases: [(u32, &[u8]); 6] = [
            (0x03, &[0x03]),
            (0x7F, &[0x7F]),
            (0x80, &[0x80, 0x80]),
            (0x2E57, &[0xAE, 0x57]),
            (0x4000, &[0xC0, 0x00, 0x40, 0x00]),
            (0x1FFF_FFFF, &[0xDF, 0xFF, 0xFF, 0xFF]),
        ];

        for (value, encoded) in cases {
            let mut out = Vec::new();
            write_compressed_uint(&mut out, value).unwrap();
            assert_eq!(out, encoded);

            let mut offset = 0;
            assert_eq!(read_compressed_uint_at(encoded, &mut offset).unwrap(), value);
            assert_eq!(offset, encoded.len());
        }
    }

    #[test]
    fn compressed_uint_invalid() {
        let mut out = Vec::new();
        assert!(write_compressed_uint(&mut out, 0x2000_0000).is_err());

        let mut offset = 0;
        assert!(read_compressed_uint_at(&[0xFF], &mut offset).is_err());

        let mut offset = 0;
        assert!(matches!(
            read_compressed_uint_at(&[0xC0, 0x01], &mut offset),
            Err(OutOfBounds)
        ));
    }
}
