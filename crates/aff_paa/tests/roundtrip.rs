use std::io::Cursor;

use pretty_assertions::assert_eq;
use tracing_test::traced_test;

use aff_paa::error::Result;
use aff_paa::{Paa, PaxKind, Tagg};

/// Horizontal gradient raster with a fixed alpha
fn gradient(width: u16, height: u16, alpha: u8) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
    for _y in 0..height {
        for x in 0..width {
            let value = (x as u32 * 255 / (width as u32 - 1)) as u8;
            rgba.extend([value, value, 255 - value, alpha]);
        }
    }
    rgba
}

fn max_channel_diff(a: &[u8], b: &[u8]) -> u8 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| x.abs_diff(y))
        .max()
        .unwrap_or(0)
}

#[traced_test]
#[test]
fn dxt5_roundtrip_with_transparency() -> Result<()> {
    let source = gradient(64, 64, 128);
    let mut paa = Paa::from_rgba(64, 64, source.clone())?;

    let mut raw = Vec::new();
    paa.write(&mut raw, None)?;

    // translucent input selects DXT5 and emits the transparency tagg
    assert_eq!(paa.kind, PaxKind::Dxt5);

    let reread = Paa::read(&mut Cursor::new(raw))?;
    assert_eq!(reread.kind, PaxKind::Dxt5);
    assert!(reread.has_transparency);

    let dims: Vec<(u16, u16)> = reread.mipmaps.iter().map(|m| (m.width, m.height)).collect();
    assert_eq!(dims, vec![(64, 64), (32, 32), (16, 16), (8, 8)]);

    assert!(reread
        .taggs
        .iter()
        .any(|t| t.signature == Tagg::AVERAGE_COLOR));
    assert!(reread
        .taggs
        .iter()
        .any(|t| t.signature == Tagg::TRANSPARENCY));

    // level 0 within DXT5 quantization tolerance; alpha is uniform and
    // survives exactly
    let level0 = &reread.mipmaps[0];
    assert_eq!(level0.data.len(), source.len());
    assert!(max_channel_diff(&level0.data, &source) <= 20);
    for pixel in level0.data.chunks_exact(4) {
        assert_eq!(pixel[3], 128);
    }

    Ok(())
}

#[traced_test]
#[test]
fn lzo_wrapped_dxt1_roundtrip() -> Result<()> {
    let source = gradient(256, 256, 255);
    let mut paa = Paa::from_rgba(256, 256, source.clone())?;

    let mut raw = Vec::new();
    paa.write(&mut raw, None)?;
    assert_eq!(paa.kind, PaxKind::Dxt1);

    let reread = Paa::read(&mut Cursor::new(raw.clone()))?;
    assert_eq!(
        reread.mipmaps.iter().map(|m| m.width).collect::<Vec<_>>(),
        vec![256, 128, 64, 32, 16, 8]
    );

    // the offset table covers every mipmap and increases monotonically
    let offsets = reread.offsets().expect("offset tagg");
    assert_eq!(offsets.len(), 6);
    assert!(offsets.windows(2).all(|w| w[0] < w[1]));

    // level 0 is wider than 128, so its stored width carries the LZO bit
    let record = offsets[0] as usize;
    let stored_width = u16::from_le_bytes([raw[record], raw[record + 1]]);
    assert_eq!(stored_width, 256 | 0x8000);
    // level 1 sits exactly at the 128 threshold and stays unwrapped
    let record = offsets[1] as usize;
    let stored_width = u16::from_le_bytes([raw[record], raw[record + 1]]);
    assert_eq!(stored_width, 128);

    assert!(max_channel_diff(&reread.mipmaps[0].data, &source) <= 20);

    Ok(())
}

#[traced_test]
#[test]
fn unknown_taggs_survive_roundtrip() -> Result<()> {
    let mut paa = Paa::from_rgba(16, 16, vec![0xFF; 16 * 16 * 4])?;
    paa.taggs.push(Tagg {
        signature: *b"GGATZZZZ",
        data: vec![0xDE, 0xAD],
    });

    let mut raw = Vec::new();
    paa.write(&mut raw, None)?;

    let mut reread = Paa::read(&mut Cursor::new(raw))?;
    let unknown = reread
        .taggs
        .iter()
        .find(|t| &t.signature == b"GGATZZZZ")
        .expect("unknown tagg preserved");
    assert_eq!(unknown.data, vec![0xDE, 0xAD]);

    // a second write does not duplicate the offset table it just read
    let mut raw = Vec::new();
    reread.write(&mut raw, None)?;
    let again = Paa::read(&mut Cursor::new(raw))?;
    let offset_taggs = again
        .taggs
        .iter()
        .filter(|t| t.signature == Tagg::OFFSETS)
        .count();
    assert_eq!(offset_taggs, 1);
    assert!(again.taggs.iter().any(|t| &t.signature == b"GGATZZZZ"));

    Ok(())
}

#[traced_test]
#[test]
fn offsets_point_at_mipmap_records() -> Result<()> {
    let mut paa = Paa::from_rgba(32, 32, gradient(32, 32, 255))?;

    let mut raw = Vec::new();
    paa.write(&mut raw, None)?;

    let reread = Paa::read(&mut Cursor::new(raw.clone()))?;
    let offsets = reread.offsets().expect("offset tagg");

    for (offset, level) in offsets.iter().zip(&reread.mipmaps) {
        let record = *offset as usize;
        let width = u16::from_le_bytes([raw[record], raw[record + 1]]) & 0x7FFF;
        let height = u16::from_le_bytes([raw[record + 2], raw[record + 3]]);
        assert_eq!((width, height), (level.width, level.height));
    }

    Ok(())
}
