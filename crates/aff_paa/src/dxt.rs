//! DXT (S3TC) block encode and decode.
//!
//! Decoding delegates to `bcdec_rs`; encoding picks block endpoints from
//! the luminance extent of each 4×4 tile, which is plenty for game
//! textures and exact for solid tiles on the 5:6:5 lattice. Dimensions
//! that are not multiples of 4 are padded with edge pixels at encode time
//! and cropped at decode time.

use crate::error::{Error, Result};
use crate::types::PaxKind;

/// Decode a DXT block stream into a width × height RGBA8 pixel grid
pub fn decode(kind: PaxKind, width: u16, height: u16, blocks: &[u8]) -> Result<Vec<u8>> {
    let block_size = match kind {
        PaxKind::Dxt1 => 8,
        PaxKind::Dxt5 => 16,
        other => return Err(Error::Dxt(format!("cannot decode {other:?} blocks"))),
    };

    let width = width as usize;
    let height = height as usize;
    if width == 0 || height == 0 {
        return Err(Error::Dxt("zero mipmap dimension".into()));
    }

    let blocks_x = width.div_ceil(4);
    let blocks_y = height.div_ceil(4);
    if blocks.len() < blocks_x * blocks_y * block_size {
        return Err(Error::Dxt(format!(
            "{} block bytes for {width}x{height}, need {}",
            blocks.len(),
            blocks_x * blocks_y * block_size
        )));
    }

    let mut rgba = vec![0u8; width * height * 4];

    // one decoded 4x4 tile: 16 pixels, 16 bytes per row
    let mut tile = [0u8; 64];
    let tile_pitch = 16;

    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let start = (by * blocks_x + bx) * block_size;
            let block = &blocks[start..start + block_size];

            match kind {
                PaxKind::Dxt1 => bcdec_rs::bc1(block, &mut tile, tile_pitch),
                PaxKind::Dxt5 => bcdec_rs::bc3(block, &mut tile, tile_pitch),
                _ => unreachable!("kind checked above"),
            }

            for py in 0..4 {
                for px in 0..4 {
                    let x = bx * 4 + px;
                    let y = by * 4 + py;
                    if x >= width || y >= height {
                        continue;
                    }
                    let src = (py * 4 + px) * 4;
                    let dst = (y * width + x) * 4;
                    rgba[dst..dst + 4].copy_from_slice(&tile[src..src + 4]);
                }
            }
        }
    }

    Ok(rgba)
}

/// Encode a width × height RGBA8 pixel grid into a DXT block stream
pub fn encode(kind: PaxKind, width: u16, height: u16, rgba: &[u8]) -> Result<Vec<u8>> {
    let width = width as usize;
    let height = height as usize;
    if width == 0 || height == 0 {
        return Err(Error::Dxt("zero mipmap dimension".into()));
    }
    if rgba.len() != width * height * 4 {
        return Err(Error::Dxt(format!(
            "{} pixel bytes for {width}x{height}, need {}",
            rgba.len(),
            width * height * 4
        )));
    }

    let (block_size, encoder): (usize, fn(&[[u8; 4]; 16], &mut [u8])) = match kind {
        PaxKind::Dxt1 => (8, |tile, out| out.copy_from_slice(&encode_dxt1_block(tile))),
        PaxKind::Dxt5 => (16, |tile, out| out.copy_from_slice(&encode_dxt5_block(tile))),
        other => return Err(Error::Dxt(format!("cannot encode {other:?} blocks"))),
    };

    let blocks_x = width.div_ceil(4);
    let blocks_y = height.div_ceil(4);
    let mut out = vec![0u8; blocks_x * blocks_y * block_size];

    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let tile = extract_tile(rgba, width, height, bx * 4, by * 4);
            let start = (by * blocks_x + bx) * block_size;
            encoder(&tile, &mut out[start..start + block_size]);
        }
    }

    Ok(out)
}

/// Extract a 4x4 tile of RGBA pixels, padding with edge pixels if needed
fn extract_tile(rgba: &[u8], width: usize, height: usize, x: usize, y: usize) -> [[u8; 4]; 16] {
    let mut tile = [[0u8; 4]; 16];

    for py in 0..4 {
        for px in 0..4 {
            let sx = (x + px).min(width - 1);
            let sy = (y + py).min(height - 1);
            let src = (sy * width + sx) * 4;
            tile[py * 4 + px].copy_from_slice(&rgba[src..src + 4]);
        }
    }

    tile
}

/// Encode a 4x4 tile to DXT1 (8 bytes)
fn encode_dxt1_block(tile: &[[u8; 4]; 16]) -> [u8; 8] {
    let (c0, c1) = endpoint_colors(tile);

    // c0 >= c1 selects 4-color mode, no 1-bit transparency
    let (c0, c1) = if c0 >= c1 { (c0, c1) } else { (c1, c0) };
    let palette = color_palette(c0, c1);

    let mut indices = 0u32;
    for (i, pixel) in tile.iter().enumerate() {
        indices |= u32::from(closest_color(pixel, &palette)) << (i * 2);
    }

    let mut out = [0u8; 8];
    out[0..2].copy_from_slice(&c0.to_le_bytes());
    out[2..4].copy_from_slice(&c1.to_le_bytes());
    out[4..8].copy_from_slice(&indices.to_le_bytes());
    out
}

/// Encode a 4x4 tile to DXT5 (8 alpha bytes + a DXT1 color block)
fn encode_dxt5_block(tile: &[[u8; 4]; 16]) -> [u8; 16] {
    let mut out = [0u8; 16];
    out[0..8].copy_from_slice(&encode_alpha_block(tile));
    out[8..16].copy_from_slice(&encode_dxt1_block(tile));
    out
}

/// Interpolated alpha block of DXT5
fn encode_alpha_block(tile: &[[u8; 4]; 16]) -> [u8; 8] {
    let mut min = 255u8;
    let mut max = 0u8;
    for pixel in tile {
        min = min.min(pixel[3]);
        max = max.max(pixel[3]);
    }

    let a0 = max;
    let a1 = min;

    let lerp = |num: u16, a: u8, b: u8, den: u16| -> u8 {
        ((num * u16::from(a) + (den - num) * u16::from(b)) / den) as u8
    };

    let palette = if a0 > a1 {
        [
            a0,
            a1,
            lerp(6, a0, a1, 7),
            lerp(5, a0, a1, 7),
            lerp(4, a0, a1, 7),
            lerp(3, a0, a1, 7),
            lerp(2, a0, a1, 7),
            lerp(1, a0, a1, 7),
        ]
    } else {
        [
            a0,
            a1,
            lerp(4, a0, a1, 5),
            lerp(3, a0, a1, 5),
            lerp(2, a0, a1, 5),
            lerp(1, a0, a1, 5),
            0,
            255,
        ]
    };

    let mut indices = 0u64;
    for (i, pixel) in tile.iter().enumerate() {
        let mut best = 0u64;
        let mut best_dist = i32::MAX;
        for (j, &candidate) in palette.iter().enumerate() {
            let dist = (i32::from(pixel[3]) - i32::from(candidate)).abs();
            if dist < best_dist {
                best_dist = dist;
                best = j as u64;
            }
        }
        indices |= best << (i * 3);
    }

    let mut out = [0u8; 8];
    out[0] = a0;
    out[1] = a1;
    out[2..8].copy_from_slice(&indices.to_le_bytes()[..6]);
    out
}

/// Pick block endpoints from the tile's luminance extent, as RGB565
fn endpoint_colors(tile: &[[u8; 4]; 16]) -> (u16, u16) {
    let mut min_lum = u32::MAX;
    let mut max_lum = 0u32;
    let mut min_px = [0u8; 3];
    let mut max_px = [0u8; 3];

    for pixel in tile {
        let lum = u32::from(pixel[0]) + u32::from(pixel[1]) + u32::from(pixel[2]);
        if lum < min_lum {
            min_lum = lum;
            min_px = [pixel[0], pixel[1], pixel[2]];
        }
        if lum > max_lum {
            max_lum = lum;
            max_px = [pixel[0], pixel[1], pixel[2]];
        }
    }

    (
        rgb_to_565(max_px[0], max_px[1], max_px[2]),
        rgb_to_565(min_px[0], min_px[1], min_px[2]),
    )
}

/// Convert RGB888 to RGB565
fn rgb_to_565(r: u8, g: u8, b: u8) -> u16 {
    (u16::from(r >> 3) << 11) | (u16::from(g >> 2) << 5) | u16::from(b >> 3)
}

/// Expand the two 565 endpoints into the 4-entry block palette
fn color_palette(c0: u16, c1: u16) -> [[u8; 3]; 4] {
    let expand5 = |v: u8| (v << 3) | (v >> 2);
    let expand6 = |v: u8| (v << 2) | (v >> 4);

    let p0 = [
        expand5(((c0 >> 11) & 0x1F) as u8),
        expand6(((c0 >> 5) & 0x3F) as u8),
        expand5((c0 & 0x1F) as u8),
    ];
    let p1 = [
        expand5(((c1 >> 11) & 0x1F) as u8),
        expand6(((c1 >> 5) & 0x3F) as u8),
        expand5((c1 & 0x1F) as u8),
    ];

    let mix = |a: u8, b: u8, na: u16, nb: u16, den: u16| -> u8 {
        ((na * u16::from(a) + nb * u16::from(b)) / den) as u8
    };

    if c0 > c1 {
        [
            p0,
            p1,
            [
                mix(p0[0], p1[0], 2, 1, 3),
                mix(p0[1], p1[1], 2, 1, 3),
                mix(p0[2], p1[2], 2, 1, 3),
            ],
            [
                mix(p0[0], p1[0], 1, 2, 3),
                mix(p0[1], p1[1], 1, 2, 3),
                mix(p0[2], p1[2], 1, 2, 3),
            ],
        ]
    } else {
        [
            p0,
            p1,
            [
                mix(p0[0], p1[0], 1, 1, 2),
                mix(p0[1], p1[1], 1, 1, 2),
                mix(p0[2], p1[2], 1, 1, 2),
            ],
            // 3-color mode: the 4th entry is transparent black, which the
            // encoder never selects
            [0, 0, 0],
        ]
    }
}

/// Index of the palette entry closest to the pixel
fn closest_color(pixel: &[u8; 4], palette: &[[u8; 3]; 4]) -> u8 {
    let mut best = 0u8;
    let mut best_dist = i32::MAX;

    // entry 3 of 3-color mode is transparent; restricting to the first
    // three would need the mode, but equal distances resolve to the
    // earlier entry, so a [0,0,0] duplicate is harmless
    for (i, candidate) in palette.iter().enumerate() {
        let dist = (0..3)
            .map(|c| {
                let d = i32::from(pixel[c]) - i32::from(candidate[c]);
                d * d
            })
            .sum::<i32>();
        if dist < best_dist {
            best_dist = dist;
            best = i as u8;
        }
    }

    best
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{decode, encode};
    use crate::error::{Error, Result};
    use crate::types::PaxKind;

    fn solid_tile(rgba: [u8; 4]) -> Vec<u8> {
        rgba.repeat(16)
    }

    #[test]
    fn dxt1_solid_lattice_tile_is_exact() -> Result<()> {
        // every channel on the 5:6:5 lattice
        let tile = solid_tile([8, 12, 255, 255]);

        let blocks = encode(PaxKind::Dxt1, 4, 4, &tile)?;
        assert_eq!(blocks.len(), 8);

        let decoded = decode(PaxKind::Dxt1, 4, 4, &blocks)?;
        assert_eq!(decoded, tile);
        Ok(())
    }

    #[test]
    fn dxt5_solid_tile_preserves_alpha() -> Result<()> {
        let tile = solid_tile([8, 12, 255, 128]);

        let blocks = encode(PaxKind::Dxt5, 4, 4, &tile)?;
        assert_eq!(blocks.len(), 16);

        let decoded = decode(PaxKind::Dxt5, 4, 4, &blocks)?;
        assert_eq!(decoded, tile);
        Ok(())
    }

    #[test]
    fn two_color_tile_roundtrips() -> Result<()> {
        // top half white, bottom half black; both are palette endpoints
        let mut tile = Vec::new();
        tile.extend([255u8, 255, 255, 255].repeat(8));
        tile.extend([0u8, 0, 0, 255].repeat(8));

        let blocks = encode(PaxKind::Dxt1, 4, 4, &tile)?;
        let decoded = decode(PaxKind::Dxt1, 4, 4, &blocks)?;
        assert_eq!(decoded, tile);
        Ok(())
    }

    #[test]
    fn odd_dimensions_pad_and_crop() -> Result<()> {
        let width = 6u16;
        let height = 3u16;
        let rgba: Vec<u8> = (0..width as usize * height as usize)
            .flat_map(|i| [(i * 8) as u8, 0, 0, 255])
            .collect();

        let blocks = encode(PaxKind::Dxt1, width, height, &rgba)?;
        assert_eq!(blocks.len(), 2 * 8);

        let decoded = decode(PaxKind::Dxt1, width, height, &blocks)?;
        assert_eq!(decoded.len(), rgba.len());
        Ok(())
    }

    #[test]
    fn short_block_stream_is_rejected() {
        let result = decode(PaxKind::Dxt1, 8, 8, &[0u8; 8]);
        assert!(matches!(result, Err(Error::Dxt(_))));
    }

    #[test]
    fn wrong_pixel_count_is_rejected() {
        let result = encode(PaxKind::Dxt5, 4, 4, &[0u8; 10]);
        assert!(matches!(result, Err(Error::Dxt(_))));
    }

    #[test]
    fn non_dxt_kind_is_rejected() {
        let result = encode(PaxKind::Rgba8888, 4, 4, &[0u8; 64]);
        assert!(matches!(result, Err(Error::Dxt(_))));
    }
}
