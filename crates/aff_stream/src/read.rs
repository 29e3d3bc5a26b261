//! Typed little-endian read helpers
//!

use byteorder::{LittleEndian, ReadBytesExt};
use std::{
    io::{Read, Seek, SeekFrom},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use crate::error::Result;

/// A position in 3D space, three consecutive little-endian f32
pub type XyzTriplet = [f32; 3];

/// A 4x3 transform, four consecutive [`XyzTriplet`]s
pub type TransformMatrix = [XyzTriplet; 4];

/// Read helpers for the engine's recurring encodings.
///
/// Implemented for every [`Read`]; all methods consume from the current
/// position and fail with [`crate::Error::UnexpectedEof`] when the source
/// cannot supply the requested bytes.
pub trait ReadAffExt: Read {
    /// Read a 3-byte little-endian unsigned integer ("arma ushort")
    fn read_u24_le(&mut self) -> Result<u32> {
        Ok(ReadBytesExt::read_u24::<LittleEndian>(self)?)
    }

    /// Read a single byte as a boolean, nonzero meaning true
    fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Read a variable-width 7-bit integer as used by binarized configs.
    ///
    /// Continuation bytes have the high bit set. The accumulation is
    /// `ret += (b - 1) * 128` for every continuation byte, without a
    /// per-byte shift; this is not LEB128, but it is what the engine's
    /// files contain, so it is preserved bit for bit.
    fn read_compressed_integer(&mut self) -> Result<u32> {
        let mut val = self.read_u8()? as u32;
        let mut ret = val;
        while val & 0x80 != 0 {
            val = self.read_u8()? as u32;
            ret = ret.wrapping_add(val.wrapping_sub(1).wrapping_mul(0x80));
        }
        Ok(ret)
    }

    /// Read bytes up to and including the next 0x00, returning everything
    /// before the terminator
    fn read_zero_terminated(&mut self) -> Result<String> {
        let mut raw = Vec::new();
        loop {
            let byte = self.read_u8()?;
            if byte == 0 {
                break;
            }
            raw.push(byte);
        }
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    /// Read exactly `count` raw bytes
    fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; count];
        self.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Read a fixed-size string of `count` bytes
    fn read_string(&mut self, count: usize) -> Result<String> {
        let raw = self.read_bytes(count)?;
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    /// Read three consecutive little-endian f32
    fn read_xyz(&mut self) -> Result<XyzTriplet> {
        Ok([
            self.read_f32::<LittleEndian>()?,
            self.read_f32::<LittleEndian>()?,
            self.read_f32::<LittleEndian>()?,
        ])
    }

    /// Read four consecutive xyz triplets
    fn read_matrix_4x3(&mut self) -> Result<TransformMatrix> {
        Ok([
            self.read_xyz()?,
            self.read_xyz()?,
            self.read_xyz()?,
            self.read_xyz()?,
        ])
    }

    /// Read a u32 of seconds since the Unix epoch
    fn read_timestamp(&mut self) -> Result<SystemTime> {
        let seconds = self.read_u32::<LittleEndian>()?;
        Ok(UNIX_EPOCH + Duration::from_secs(seconds as u64))
    }
}

impl<R: Read + ?Sized> ReadAffExt for R {}

/// Peek helpers, implemented as save-offset / read / restore-offset on the
/// owning reader so loop termination conditions stay straightforward.
pub trait PeekAffExt: Read + Seek {
    /// Read a u8 without consuming it
    fn peek_u8(&mut self) -> Result<u8> {
        let pos = self.stream_position()?;
        let value = self.read_u8()?;
        self.seek(SeekFrom::Start(pos))?;
        Ok(value)
    }

    /// Read a little-endian u16 without consuming it
    fn peek_u16(&mut self) -> Result<u16> {
        let pos = self.stream_position()?;
        let value = self.read_u16::<LittleEndian>()?;
        self.seek(SeekFrom::Start(pos))?;
        Ok(value)
    }

    /// Read a little-endian u32 without consuming it
    fn peek_u32(&mut self) -> Result<u32> {
        let pos = self.stream_position()?;
        let value = self.read_u32::<LittleEndian>()?;
        self.seek(SeekFrom::Start(pos))?;
        Ok(value)
    }
}

impl<R: Read + Seek + ?Sized> PeekAffExt for R {}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::{PeekAffExt, ReadAffExt};
    use crate::error::{Error, Result};

    #[test]
    fn read_u24() -> Result<()> {
        let mut input = Cursor::new(vec![0xD2, 0x04, 0x00]);
        assert_eq!(input.read_u24_le()?, 1234);
        Ok(())
    }

    #[test]
    fn read_u24_truncated() {
        let mut input = Cursor::new(vec![0xD2, 0x04]);
        assert!(matches!(input.read_u24_le(), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn read_compressed_integer_single_byte() -> Result<()> {
        let mut input = Cursor::new(vec![0x05]);
        assert_eq!(input.read_compressed_integer()?, 5);
        Ok(())
    }

    #[test]
    fn read_compressed_integer_continuation() -> Result<()> {
        // 0x85 + (0x03 - 1) * 0x80 = 5 + 128 + 256 = 389
        let mut input = Cursor::new(vec![0x85, 0x03]);
        assert_eq!(input.read_compressed_integer()?, 0x85 + 2 * 0x80);
        Ok(())
    }

    #[test]
    fn read_zero_terminated() -> Result<()> {
        let mut input = Cursor::new(b"prefix\0foo\0".to_vec());
        assert_eq!(input.read_zero_terminated()?, "prefix");
        assert_eq!(input.read_zero_terminated()?, "foo");
        Ok(())
    }

    #[test]
    fn read_zero_terminated_unterminated() {
        let mut input = Cursor::new(b"prefix".to_vec());
        assert!(matches!(
            input.read_zero_terminated(),
            Err(Error::UnexpectedEof)
        ));
    }

    #[test]
    fn read_xyz() -> Result<()> {
        let mut input = Cursor::new(
            [1.0f32, 2.0, 3.0]
                .iter()
                .flat_map(|f| f.to_le_bytes())
                .collect::<Vec<_>>(),
        );
        assert_eq!(input.read_xyz()?, [1.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn peek_does_not_consume() -> Result<()> {
        let mut input = Cursor::new(vec![0xAB, 0xCD, 0xEF, 0x01]);
        assert_eq!(input.peek_u8()?, 0xAB);
        assert_eq!(input.peek_u16()?, 0xCDAB);
        assert_eq!(input.peek_u32()?, 0x01EFCDAB);
        assert_eq!(input.position(), 0);
        assert_eq!(input.read_bytes(4)?, vec![0xAB, 0xCD, 0xEF, 0x01]);
        Ok(())
    }

    #[test]
    fn read_timestamp() -> Result<()> {
        use std::time::{Duration, UNIX_EPOCH};

        let mut input = Cursor::new(0x5F00_0000u32.to_le_bytes().to_vec());
        assert_eq!(
            input.read_timestamp()?,
            UNIX_EPOCH + Duration::from_secs(0x5F00_0000)
        );
        Ok(())
    }
}
