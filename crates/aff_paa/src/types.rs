//! Base types for the structure of a PAA file.

use byteorder::{ByteOrder, LittleEndian};

/// Pixel format of a PAA, selected by the leading magic number.
///
/// The magic ↔ kind mapping is a fixed table; only the DXT1/DXT5 pair is
/// block-decoded by this crate, the remaining kinds pass their pixel data
/// through untouched.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PaxKind {
    /// S3TC DXT1, 8 bytes per 4x4 tile
    Dxt1,
    /// S3TC DXT2 (premultiplied DXT3)
    Dxt2,
    /// S3TC DXT3
    Dxt3,
    /// S3TC DXT4 (premultiplied DXT5)
    Dxt4,
    /// S3TC DXT5, 16 bytes per 4x4 tile
    #[default]
    Dxt5,
    /// RGBA 4:4:4:4
    Rgba4444,
    /// RGBA 5:5:5:1
    Rgba5551,
    /// RGBA 8:8:8:8
    Rgba8888,
    /// 8 bits gray, 8 bits alpha
    GrayAlpha,
}

impl PaxKind {
    /// Map a magic number to its kind
    pub fn from_magic(magic: u16) -> Option<PaxKind> {
        match magic {
            0xFF01 => Some(PaxKind::Dxt1),
            0xFF02 => Some(PaxKind::Dxt2),
            0xFF03 => Some(PaxKind::Dxt3),
            0xFF04 => Some(PaxKind::Dxt4),
            0xFF05 => Some(PaxKind::Dxt5),
            0x4444 => Some(PaxKind::Rgba4444),
            0x1555 => Some(PaxKind::Rgba5551),
            0x8888 => Some(PaxKind::Rgba8888),
            0x8080 => Some(PaxKind::GrayAlpha),
            _ => None,
        }
    }

    /// The magic number of this kind
    pub fn magic(&self) -> u16 {
        match self {
            PaxKind::Dxt1 => 0xFF01,
            PaxKind::Dxt2 => 0xFF02,
            PaxKind::Dxt3 => 0xFF03,
            PaxKind::Dxt4 => 0xFF04,
            PaxKind::Dxt5 => 0xFF05,
            PaxKind::Rgba4444 => 0x4444,
            PaxKind::Rgba5551 => 0x1555,
            PaxKind::Rgba8888 => 0x8888,
            PaxKind::GrayAlpha => 0x8080,
        }
    }

    /// Whether this is one of the DXT block formats
    pub fn is_dxt(&self) -> bool {
        matches!(
            self,
            PaxKind::Dxt1 | PaxKind::Dxt2 | PaxKind::Dxt3 | PaxKind::Dxt4 | PaxKind::Dxt5
        )
    }

    /// Encoded byte count of a `width` × `height` mipmap in this format
    pub fn encoded_len(&self, width: u16, height: u16) -> usize {
        let pixels = width as usize * height as usize;
        match self {
            PaxKind::Dxt1 => pixels / 2,
            PaxKind::Dxt2 | PaxKind::Dxt3 | PaxKind::Dxt4 | PaxKind::Dxt5 => pixels,
            PaxKind::Rgba4444 | PaxKind::Rgba5551 | PaxKind::GrayAlpha => pixels * 2,
            PaxKind::Rgba8888 => pixels * 4,
        }
    }
}

/// A TLV chunk inside a PAA.
///
/// The signature is kept exactly as stored (byte-reversed tokens); payload
/// length on disk is authoritative and equals `data.len()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tagg {
    /// 8-byte signature as stored on disk
    pub signature: [u8; 8],
    /// Raw payload
    pub data: Vec<u8>,
}

impl Tagg {
    /// On-disk signature of the average color tagg ("AVGCTAGG")
    pub const AVERAGE_COLOR: [u8; 8] = *b"GGATCGVA";
    /// On-disk signature of the maximum color tagg ("MAXCTAGG")
    pub const MAXIMUM_COLOR: [u8; 8] = *b"GGATCXAM";
    /// On-disk signature of the transparency flag tagg
    pub const TRANSPARENCY: [u8; 8] = *b"GGATGALF";
    /// On-disk signature of the mipmap offset table tagg ("OFFSTAGG")
    pub const OFFSETS: [u8; 8] = *b"GGATSFFO";

    /// Average color tagg with an RGBA payload
    pub fn average_color(rgba: [u8; 4]) -> Tagg {
        Tagg {
            signature: Self::AVERAGE_COLOR,
            data: rgba.to_vec(),
        }
    }

    /// Maximum color tagg; the engine's tools always write opaque white
    pub fn maximum_color() -> Tagg {
        Tagg {
            signature: Self::MAXIMUM_COLOR,
            data: vec![0xFF; 4],
        }
    }

    /// Transparency flag tagg
    pub fn transparency() -> Tagg {
        Tagg {
            signature: Self::TRANSPARENCY,
            data: vec![0x01, 0xFF, 0xFF, 0xFF],
        }
    }

    /// Mipmap offset table tagg, one u32 per serialized mipmap
    pub fn offsets(offsets: &[u32]) -> Tagg {
        let mut data = vec![0u8; offsets.len() * 4];
        LittleEndian::write_u32_into(offsets, &mut data);
        Tagg {
            signature: Self::OFFSETS,
            data,
        }
    }

    /// Parse this tagg as an offset table, if it is one
    pub fn as_offsets(&self) -> Option<Vec<u32>> {
        if self.signature != Self::OFFSETS || self.data.len() % 4 != 0 {
            return None;
        }
        let mut offsets = vec![0u32; self.data.len() / 4];
        LittleEndian::read_u32_into(&self.data, &mut offsets);
        Some(offsets)
    }
}

/// One mipmap level.
///
/// After reading a DXT file the data is the decoded RGBA8 pixel grid; for
/// the remaining kinds it is the raw stored payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mipmap {
    /// Width in pixels (LZO top bit already cleared)
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Pixel data
    pub data: Vec<u8>,
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{PaxKind, Tagg};

    #[test]
    fn magic_table_roundtrips() {
        for magic in [
            0xFF01u16, 0xFF02, 0xFF03, 0xFF04, 0xFF05, 0x4444, 0x1555, 0x8888, 0x8080,
        ] {
            let kind = PaxKind::from_magic(magic).expect("known magic");
            assert_eq!(kind.magic(), magic);
        }
        assert_eq!(PaxKind::from_magic(0xBEEF), None);
    }

    #[test]
    fn encoded_lengths() {
        assert_eq!(PaxKind::Dxt1.encoded_len(64, 64), 2048);
        assert_eq!(PaxKind::Dxt5.encoded_len(64, 64), 4096);
        assert_eq!(PaxKind::Rgba8888.encoded_len(16, 16), 1024);
        assert_eq!(PaxKind::GrayAlpha.encoded_len(16, 16), 512);
    }

    #[test]
    fn offsets_tagg_roundtrips() {
        let tagg = Tagg::offsets(&[128, 2176, 2688]);
        assert_eq!(tagg.data.len(), 12);
        assert_eq!(tagg.as_offsets(), Some(vec![128, 2176, 2688]));

        assert_eq!(Tagg::transparency().as_offsets(), None);
    }
}
