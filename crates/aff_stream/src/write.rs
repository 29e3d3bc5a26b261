//! Typed little-endian write helpers
//!

use byteorder::{LittleEndian, WriteBytesExt};
use std::{
    io::Write,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::error::Result;

/// Write helpers mirroring [`crate::ReadAffExt`].
///
/// Writers append to the sink; they never pre-allocate or seek.
pub trait WriteAffExt: Write {
    /// Write the low 3 bytes of `value` little-endian ("arma ushort").
    ///
    /// The caller must ensure the value fits in 24 bits; the top byte is
    /// silently discarded.
    fn write_u24_le(&mut self, value: u32) -> Result<()> {
        Ok(WriteBytesExt::write_u24::<LittleEndian>(self, value & 0x00FF_FFFF)?)
    }

    /// Write a string followed by a 0x00 terminator
    fn write_zero_terminated(&mut self, value: &str) -> Result<()> {
        self.write_all(value.as_bytes())?;
        self.write_u8(0)?;
        Ok(())
    }

    /// Write a timestamp as a u32 of seconds since the Unix epoch
    fn write_timestamp(&mut self, value: SystemTime) -> Result<()> {
        let seconds = value
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);
        self.write_u32::<LittleEndian>(seconds)?;
        Ok(())
    }
}

impl<W: Write + ?Sized> WriteAffExt for W {}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::WriteAffExt;
    use crate::error::Result;

    #[test]
    fn write_u24() -> Result<()> {
        let mut out = Vec::new();
        out.write_u24_le(1234)?;
        assert_eq!(out, vec![0xD2, 0x04, 0x00]);
        Ok(())
    }

    #[test]
    fn write_zero_terminated() -> Result<()> {
        let mut out = Vec::new();
        out.write_zero_terminated("prefix")?;
        assert_eq!(out, b"prefix\0");
        Ok(())
    }
}
