//! Mipmap pyramid generation.

use image::{imageops, imageops::FilterType, RgbaImage};

use crate::types::Mipmap;

/// Bilinearly resample an RGBA8 buffer down to half its width and height.
///
/// The resampler is component-wise over all four channels and makes no
/// premultiplication assumption.
pub fn halve(rgba: &[u8], width: u16, height: u16) -> Vec<u8> {
    let source = RgbaImage::from_raw(width as u32, height as u32, rgba.to_vec())
        .expect("pixel buffer matches its dimensions");

    imageops::resize(
        &source,
        width as u32 / 2,
        height as u32 / 2,
        FilterType::Triangle,
    )
    .into_raw()
}

/// Build the full mipmap chain from a base level.
///
/// Each level halves width and height; generation stops once a further
/// halving would bring the smaller dimension to 4 or below, so the last
/// generated level has `min(width, height) == 8` (or the base itself is
/// already at or below that).
pub fn build_chain(base: Mipmap) -> Vec<Mipmap> {
    let mut levels = vec![base];

    loop {
        let last = levels.last().expect("chain starts with the base level");
        if last.width.min(last.height) <= 8 {
            break;
        }

        let next = Mipmap {
            width: last.width / 2,
            height: last.height / 2,
            data: halve(&last.data, last.width, last.height),
        };
        levels.push(next);
    }

    levels
}
