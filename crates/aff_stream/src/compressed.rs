//! The "maybe compressed" envelope for arrays of fixed-width scalars.
//!
//! Several formats store bulk arrays behind a small dispatch: short arrays
//! are raw, long ones are LZO-wrapped (or LZSS in legacy files), and some
//! call sites carry an explicit one-byte flag instead of the 1024-byte
//! threshold. The element count precedes the data as a u32.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Read;

use crate::error::Result;
use crate::lzo;
use crate::lzss::{self, ChecksumKind};
use crate::read::ReadAffExt;

/// Threshold above which flag-less arrays are stored compressed
pub const COMPRESSION_THRESHOLD: usize = 1024;

/// A fixed-width scalar that can be reinterpreted from little-endian bytes
pub trait Scalar: Sized {
    /// Encoded width in bytes
    const SIZE: usize;

    /// Build the scalar from exactly [`Self::SIZE`] little-endian bytes
    fn from_le_bytes(bytes: &[u8]) -> Self;
}

impl Scalar for u16 {
    const SIZE: usize = 2;

    fn from_le_bytes(bytes: &[u8]) -> Self {
        u16::from_le_bytes([bytes[0], bytes[1]])
    }
}

impl Scalar for u32 {
    const SIZE: usize = 4;

    fn from_le_bytes(bytes: &[u8]) -> Self {
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

impl Scalar for f32 {
    const SIZE: usize = 4;

    fn from_le_bytes(bytes: &[u8]) -> Self {
        f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

/// Read `expected_size` bytes behind the maybe-compressed envelope.
///
/// With `use_flag` a one-byte flag selects the path; without it, sizes of
/// [`COMPRESSION_THRESHOLD`] and above are compressed. The compressed path
/// is LZO; the block must extend to the end of the source, so callers with
/// mid-stream blocks hand in a sliced reader.
pub fn read_compressed_bytes<R: Read>(
    reader: &mut R,
    expected_size: usize,
    use_flag: bool,
) -> Result<Vec<u8>> {
    if expected_size == 0 {
        return Ok(Vec::new());
    }

    let compressed = if use_flag {
        reader.read_bool()?
    } else {
        expected_size >= COMPRESSION_THRESHOLD
    };

    if !compressed {
        return reader.read_bytes(expected_size);
    }

    let mut remainder = Vec::new();
    reader.read_to_end(&mut remainder)?;
    lzo::decompress(&remainder, expected_size)
}

/// Legacy envelope: LZSS instead of LZO on the threshold path, LZO only
/// when the caller says so
pub fn read_compressed_bytes_old<R: Read>(
    reader: &mut R,
    expected_size: usize,
    use_lzo: bool,
) -> Result<Vec<u8>> {
    if expected_size == 0 {
        return Ok(Vec::new());
    }

    if use_lzo {
        let mut remainder = Vec::new();
        reader.read_to_end(&mut remainder)?;
        return lzo::decompress(&remainder, expected_size);
    }

    if expected_size < COMPRESSION_THRESHOLD {
        return reader.read_bytes(expected_size);
    }

    lzss::decompress(reader, expected_size, ChecksumKind::Unsigned)
}

/// Read a u32 element count followed by a maybe-compressed array of `T`
pub fn read_compressed_array<T: Scalar, R: Read>(
    reader: &mut R,
    use_flag: bool,
) -> Result<Vec<T>> {
    let count = reader.read_u32::<LittleEndian>()? as usize;
    let raw = read_compressed_bytes(reader, count * T::SIZE, use_flag)?;
    Ok(raw.chunks_exact(T::SIZE).map(T::from_le_bytes).collect())
}

/// Legacy variant of [`read_compressed_array`]
pub fn read_compressed_array_old<T: Scalar, R: Read>(
    reader: &mut R,
    use_lzo: bool,
) -> Result<Vec<T>> {
    let count = reader.read_u32::<LittleEndian>()? as usize;
    let raw = read_compressed_bytes_old(reader, count * T::SIZE, use_lzo)?;
    Ok(raw.chunks_exact(T::SIZE).map(T::from_le_bytes).collect())
}
