//! Types for writing PAA textures
//!

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;
use tracing::{debug, instrument};

use aff_stream::{lzo, WriteAffExt};

use crate::{
    dxt,
    error::{Error, Result},
    mipmap,
    read::Paa,
    types::{PaxKind, Tagg},
};

/// Mipmaps wider than this are LZO-wrapped on write
const LZO_WIDTH_THRESHOLD: u16 = 128;

impl Paa {
    /// Serialize the texture.
    ///
    /// When only the base mipmap is present, the pyramid and the color
    /// taggs are generated first. The target kind defaults to DXT5 for
    /// transparent images and DXT1 otherwise; kinds other than those two
    /// are not supported for writing, and neither are palettized images.
    #[instrument(skip(self, writer), err)]
    pub fn write<W: Write>(&mut self, writer: &mut W, kind: Option<PaxKind>) -> Result<()> {
        if self.mipmaps.is_empty() {
            return Err(Error::InvalidFormat("no mipmaps to write"));
        }
        if !self.palette.is_empty() {
            return Err(Error::Unsupported("palettized paa".into()));
        }

        if self.mipmaps.len() <= 1 {
            self.calculate_mipmaps_and_taggs();
        }

        let kind = kind.unwrap_or(if self.has_transparency {
            PaxKind::Dxt5
        } else {
            PaxKind::Dxt1
        });
        if !matches!(kind, PaxKind::Dxt1 | PaxKind::Dxt5) {
            return Err(Error::Unsupported(format!("writing {kind:?}")));
        }
        self.kind = kind;

        // encode every level, wrapping the large ones
        let mut records = Vec::with_capacity(self.mipmaps.len());
        for level in &self.mipmaps {
            let mut width = level.width;
            let mut data = dxt::encode(kind, level.width, level.height, &level.data)?;

            if width > LZO_WIDTH_THRESHOLD {
                data = lzo::compress(&data)?;
                width |= 0x8000;
            }

            records.push((width, level.height, data));
        }

        // offsets depend on everything before the mipmaps, including the
        // offset tagg itself, whose length is known up front
        let taggs: Vec<&Tagg> = self
            .taggs
            .iter()
            .filter(|t| t.signature != Tagg::OFFSETS)
            .collect();

        let mut offset: u32 = 2;
        for tagg in &taggs {
            offset += 8 + 4 + tagg.data.len() as u32;
        }
        offset += 8 + 4 + 4 * records.len() as u32;
        offset += 2;

        let mut offsets = Vec::with_capacity(records.len());
        for (_, _, data) in &records {
            offsets.push(offset);
            offset += 2 + 2 + 3 + data.len() as u32;
        }
        let offset_tagg = Tagg::offsets(&offsets);
        debug!(mipmaps = records.len(), "writing paa");

        writer.write_u16::<LittleEndian>(kind.magic())?;
        for tagg in taggs {
            Self::write_tagg(writer, tagg)?;
        }
        Self::write_tagg(writer, &offset_tagg)?;

        writer.write_u16::<LittleEndian>(self.palette.len() as u16)?;

        for (width, height, data) in &records {
            writer.write_u16::<LittleEndian>(*width)?;
            writer.write_u16::<LittleEndian>(*height)?;
            writer.write_u24_le(data.len() as u32)?;
            writer.write_all(data).map_err(aff_stream::Error::from)?;
        }

        for _ in 0..3 {
            writer.write_u16::<LittleEndian>(0)?;
        }

        Ok(())
    }

    fn write_tagg<W: Write>(writer: &mut W, tagg: &Tagg) -> Result<()> {
        writer
            .write_all(&tagg.signature)
            .map_err(aff_stream::Error::from)?;
        writer.write_u32::<LittleEndian>(tagg.data.len() as u32)?;
        writer.write_all(&tagg.data).map_err(aff_stream::Error::from)?;
        Ok(())
    }

    /// Rebuild the mipmap pyramid from level 0 and append the color taggs.
    pub fn calculate_mipmaps_and_taggs(&mut self) {
        let base = self.mipmaps.swap_remove(0);
        let pixels = base.width as u64 * base.height as u64;
        self.mipmaps = mipmap::build_chain(base);

        let mut sums = [0u64; 4];
        for pixel in self.mipmaps[0].data.chunks_exact(4) {
            for (sum, &channel) in sums.iter_mut().zip(pixel) {
                *sum += channel as u64;
            }
        }
        let average = [
            (sums[0] / pixels) as u8,
            (sums[1] / pixels) as u8,
            (sums[2] / pixels) as u8,
            (sums[3] / pixels) as u8,
        ];

        self.taggs.push(Tagg::average_color(average));
        self.taggs.push(Tagg::maximum_color());

        if average[3] != 255 {
            self.has_transparency = true;
            self.taggs.push(Tagg::transparency());
        }
    }
}
