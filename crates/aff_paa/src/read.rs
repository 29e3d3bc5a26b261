//! Types for reading PAA textures
//!

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, Seek};
use tracing::{debug, instrument};

use aff_stream::{lzo, PeekAffExt, ReadAffExt};

use crate::{
    dxt,
    error::{Error, Result},
    types::{Mipmap, PaxKind, Tagg},
};

/// An in-memory PAA texture.
///
/// For DXT1/DXT5 files the mipmap data is held as decoded RGBA8; the
/// remaining pixel formats pass through as stored.
#[derive(Debug, Clone)]
pub struct Paa {
    /// Pixel format of the file
    pub kind: PaxKind,
    /// All taggs in file order, unknown signatures included
    pub taggs: Vec<Tagg>,
    /// Palette bytes; empty unless the file is palettized
    pub palette: Vec<u8>,
    /// Mipmap chain, index 0 at full resolution
    pub mipmaps: Vec<Mipmap>,
    /// Whether a transparency tagg was present or computed
    pub has_transparency: bool,
}

impl Default for Paa {
    fn default() -> Self {
        Paa {
            kind: PaxKind::default(),
            taggs: Vec::new(),
            palette: Vec::new(),
            mipmaps: Vec::new(),
            has_transparency: false,
        }
    }
}

impl Paa {
    /// Build a texture from a single RGBA8 raster.
    ///
    /// Mipmaps and color taggs are generated when the texture is written.
    pub fn from_rgba(width: u16, height: u16, rgba: Vec<u8>) -> Result<Paa> {
        if width == 0 || height == 0 || !width.is_power_of_two() || !height.is_power_of_two() {
            return Err(Error::InvalidFormat("dimensions must be powers of two"));
        }
        if rgba.len() != width as usize * height as usize * 4 {
            return Err(Error::InvalidFormat("pixel buffer does not match dimensions"));
        }

        Ok(Paa {
            mipmaps: vec![Mipmap {
                width,
                height,
                data: rgba,
            }],
            ..Paa::default()
        })
    }

    /// Read a PAA texture from a byte source.
    #[instrument(skip(reader), err)]
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Paa> {
        let magic = reader.read_u16::<LittleEndian>()?;
        let kind = PaxKind::from_magic(magic).ok_or(Error::InvalidMagic(magic))?;

        let mut taggs = Vec::new();
        let mut has_transparency = false;
        while reader.peek_u8()? != 0 {
            let mut signature = [0u8; 8];
            reader
                .read_exact(&mut signature)
                .map_err(aff_stream::Error::from)?;
            let length = reader.read_u32::<LittleEndian>()?;
            let data = reader.read_bytes(length as usize)?;

            if signature == Tagg::TRANSPARENCY {
                has_transparency = true;
            }
            taggs.push(Tagg { signature, data });
        }

        let palette_length = reader.read_u16::<LittleEndian>()?;
        let palette = reader.read_bytes(palette_length as usize)?;
        if !palette.is_empty() {
            debug!("palettized paa, {} palette bytes passed through", palette.len());
        }

        let mut mipmaps = Vec::new();
        while reader.peek_u16()? != 0 {
            mipmaps.push(Self::read_mipmap(reader, kind)?);
        }

        for _ in 0..3 {
            if reader.read_u16::<LittleEndian>()? != 0 {
                return Err(Error::InvalidFormat("missing mipmap terminator"));
            }
        }

        Ok(Paa {
            kind,
            taggs,
            palette,
            mipmaps,
            has_transparency,
        })
    }

    fn read_mipmap<R: Read + Seek>(reader: &mut R, kind: PaxKind) -> Result<Mipmap> {
        let mut width = reader.read_u16::<LittleEndian>()?;
        let lzo_wrapped = width & 0x8000 != 0;
        width &= 0x7FFF;
        let height = reader.read_u16::<LittleEndian>()?;
        let data_length = reader.read_u24_le()? as usize;

        let mut data = reader.read_bytes(data_length)?;

        if lzo_wrapped {
            data = lzo::decompress(&data, kind.encoded_len(width, height))?;
        }

        if matches!(kind, PaxKind::Dxt1 | PaxKind::Dxt5) {
            data = dxt::decode(kind, width, height, &data)?;
        }

        Ok(Mipmap {
            width,
            height,
            data,
        })
    }

    /// The stored offset table, if an OFFS tagg was read
    pub fn offsets(&self) -> Option<Vec<u32>> {
        self.taggs.iter().find_map(Tagg::as_offsets)
    }
}
