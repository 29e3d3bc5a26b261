//! Base types for the structure of a PBO file.

use binrw::{BinRead, BinWrite, NullString};

/// Packing method of unpacked entries
pub const PACKING_UNCOMPRESSED: u32 = 0;

/// Packing method "Cprs", marking LZSS-packed entries.
///
/// Some archives in the wild carry this marker with sizes that do not
/// indicate compression; [`EntryRecord::is_packed`] is authoritative.
pub const PACKING_COMPRESSED: u32 = 0x4370_7273;

/// PBO signature
///
/// Every PBO starts with a single zero byte, the "Vers" magic and 16
/// reserved bytes. The reserved bytes are zero in every archive the game
/// produces but are not validated strictly.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, Default, PartialEq)]
#[brw(little, magic = b"\x00sreV")]
pub struct PboSignature {
    /// 16 reserved bytes following the magic
    pub reserved: [u8; 16],
}

/// PBO entry header
///
/// Describes one file stored in the archive. The payloads follow the
/// header list back to back in header order.
#[derive(BinRead, BinWrite, Debug, Clone, Default, PartialEq)]
#[brw(little)]
pub struct EntryRecord {
    /// Stored path of the entry, `\` separated
    pub filename: NullString,

    /// Packing method marker ([`PACKING_COMPRESSED`] for LZSS)
    pub packing_method: u32,

    /// Size of the entry when unpacked
    pub original_size: u32,

    /// Reserved field
    pub reserved: u32,

    /// Modification time, seconds since the Unix epoch
    pub timestamp: u32,

    /// Length of the payload as stored in the file
    pub data_size: u32,
}

impl EntryRecord {
    /// Whether the payload is LZSS-packed.
    ///
    /// The size discrepancy rule decides; the packing method field is
    /// informational only.
    pub fn is_packed(&self) -> bool {
        self.original_size != 0 && self.original_size != self.data_size
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::{BinRead, BinWrite};
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::types::{EntryRecord, PboSignature};

    #[test]
    fn read_signature() -> Result<()> {
        let mut input = Cursor::new(
            [
                vec![0x00, 0x73, 0x72, 0x65, 0x56],
                vec![0x00; 16],
            ]
            .concat(),
        );

        assert_eq!(PboSignature::read(&mut input)?, PboSignature::default());
        Ok(())
    }

    #[test]
    fn read_signature_missing_leading_zero() {
        let mut input = Cursor::new([vec![0x73, 0x72, 0x65, 0x56, 0x00], vec![0x00; 16]].concat());
        assert!(PboSignature::read(&mut input).is_err());
    }

    #[test]
    fn write_signature() -> Result<()> {
        let mut actual = Vec::new();
        PboSignature::default().write(&mut Cursor::new(&mut actual))?;

        assert_eq!(
            actual,
            [vec![0x00, 0x73, 0x72, 0x65, 0x56], vec![0x00; 16]].concat()
        );
        Ok(())
    }

    #[test]
    fn entry_record_roundtrip() -> Result<()> {
        let record = EntryRecord {
            filename: "config.bin".into(),
            packing_method: 0,
            original_size: 0,
            reserved: 0,
            timestamp: 0x5F00_0000,
            data_size: 11,
        };

        let mut raw = Vec::new();
        record.write(&mut Cursor::new(&mut raw))?;
        assert_eq!(raw.len(), 11 + 20);

        assert_eq!(EntryRecord::read(&mut Cursor::new(raw))?, record);
        Ok(())
    }

    #[test]
    fn packed_entries_follow_the_size_rule() {
        let mut record = EntryRecord {
            original_size: 100,
            data_size: 42,
            ..Default::default()
        };
        assert!(record.is_packed());

        record.original_size = 42;
        assert!(!record.is_packed());

        record.original_size = 0;
        record.packing_method = super::PACKING_COMPRESSED;
        assert!(!record.is_packed());
    }
}
