//! LZSS block codec.
//!
//! The engine packs PBO entries and some legacy arrays with an LZSS variant
//! using a 4096-byte sliding window, 18-byte maximum match and a 16-bit
//! token per back-reference. Every compressed block is followed by a 4-byte
//! little-endian additive checksum of the decoded bytes; depending on the
//! call site the bytes are summed as signed or unsigned (the caller picks).

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};
use tracing::instrument;

use crate::error::{Error, Result};

/// Sliding window size in bytes
pub const WINDOW: usize = 4096;
/// Longest encodable match
pub const MAX_MATCH: usize = 18;
/// Matches at or below this length are emitted as literals
pub const THRESHOLD: usize = 2;

const INITIAL_CURSOR: usize = WINDOW - MAX_MATCH;

/// Sign convention for the additive trailer checksum.
///
/// PBO entry data sums unsigned bytes; some legacy call sites sum
/// sign-extended bytes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ChecksumKind {
    /// Sum bytes as u8
    #[default]
    Unsigned,
    /// Sum bytes as i8
    Signed,
}

#[derive(Debug)]
struct Checksum {
    kind: ChecksumKind,
    value: i32,
}

impl Checksum {
    fn new(kind: ChecksumKind) -> Self {
        Self { kind, value: 0 }
    }

    fn push(&mut self, byte: u8) {
        self.value = match self.kind {
            ChecksumKind::Unsigned => self.value.wrapping_add(byte as i32),
            ChecksumKind::Signed => self.value.wrapping_add(byte as i8 as i32),
        };
    }

    fn verify(&self, stored: i32) -> Result<()> {
        if stored != self.value {
            return Err(Error::ChecksumMismatch {
                stored,
                computed: self.value,
            });
        }
        Ok(())
    }
}

/// Compute the additive checksum of a decoded buffer
pub fn checksum_of(data: &[u8], kind: ChecksumKind) -> i32 {
    let mut sum = Checksum::new(kind);
    for &byte in data {
        sum.push(byte);
    }
    sum.value
}

/// Decompress a block whose uncompressed size is known a priori.
///
/// Consumes the compressed tokens followed by the 4-byte trailer checksum
/// and verifies it. `expected_size == 0` returns empty without touching
/// the reader.
#[instrument(skip(reader), err)]
pub fn decompress<R: Read>(
    reader: &mut R,
    expected_size: usize,
    kind: ChecksumKind,
) -> Result<Vec<u8>> {
    if expected_size == 0 {
        return Ok(Vec::new());
    }

    let mut window = [0x20u8; WINDOW];
    let mut cursor = INITIAL_CURSOR;
    let mut out = vec![0u8; expected_size];
    let mut written = 0usize;
    let mut flags = 0u32;
    let mut checksum = Checksum::new(kind);

    while written < expected_size {
        flags >>= 1;
        if flags & 0x100 == 0 {
            flags = reader.read_u8()? as u32 | 0xFF00;
        }

        if flags & 1 != 0 {
            let byte = reader.read_u8()?;
            checksum.push(byte);
            out[written] = byte;
            written += 1;
            window[cursor] = byte;
            cursor = (cursor + 1) & (WINDOW - 1);
        } else {
            let low = reader.read_u8()? as usize;
            let high = reader.read_u8()? as usize;
            let offset = low | ((high & 0xF0) << 4);
            let length = (high & 0x0F) + THRESHOLD;

            // the token copies length + 1 bytes
            if length + 1 > expected_size - written {
                return Err(Error::Overflow(expected_size));
            }

            let mut src = cursor.wrapping_sub(offset) & (WINDOW - 1);
            for _ in 0..=length {
                let byte = window[src];
                src = (src + 1) & (WINDOW - 1);
                checksum.push(byte);
                out[written] = byte;
                written += 1;
                window[cursor] = byte;
                cursor = (cursor + 1) & (WINDOW - 1);
            }
        }
    }

    let stored = reader.read_i32::<LittleEndian>()?;
    checksum.verify(stored)?;

    Ok(out)
}

/// Decompress a source whose total length is known but whose uncompressed
/// size is not.
///
/// Decodes tokens from the start of the source until 4 bytes before its
/// end, then reads and verifies the unsigned trailer checksum. Used where
/// a whole file is one LZSS stream.
#[instrument(skip(reader), err)]
pub fn decompress_to_end<R: Read + Seek>(reader: &mut R) -> Result<Vec<u8>> {
    let total = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;
    if total < 4 {
        return Err(Error::UnexpectedEof);
    }
    let token_end = total - 4;

    let mut window = [0x20u8; WINDOW];
    let mut cursor = INITIAL_CURSOR;
    let mut out = Vec::with_capacity(total as usize * 4);
    let mut flags = 0u32;
    let mut checksum = Checksum::new(ChecksumKind::Unsigned);

    while reader.stream_position()? < token_end {
        flags >>= 1;
        if flags & 0x100 == 0 {
            flags = reader.read_u8()? as u32 | 0xFF00;
        }

        if flags & 1 != 0 {
            let byte = reader.read_u8()?;
            checksum.push(byte);
            out.push(byte);
            window[cursor] = byte;
            cursor = (cursor + 1) & (WINDOW - 1);
        } else {
            let low = reader.read_u8()? as usize;
            let high = reader.read_u8()? as usize;
            let offset = low | ((high & 0xF0) << 4);
            let length = (high & 0x0F) + THRESHOLD;

            let mut src = cursor.wrapping_sub(offset) & (WINDOW - 1);
            for _ in 0..=length {
                let byte = window[src];
                src = (src + 1) & (WINDOW - 1);
                checksum.push(byte);
                out.push(byte);
                window[cursor] = byte;
                cursor = (cursor + 1) & (WINDOW - 1);
            }
        }
    }

    let stored = reader.read_i32::<LittleEndian>()?;
    checksum.verify(stored)?;

    Ok(out)
}

/// Compress a buffer into an LZSS stream the decoder round-trips,
/// including the 4-byte trailer checksum.
///
/// Uses a naive longest-prefix search over the window; archives are
/// written rarely.
pub fn compress(input: &[u8], kind: ChecksumKind) -> Vec<u8> {
    let mut window = [0x20u8; WINDOW];
    let mut cursor = INITIAL_CURSOR;
    let mut out = Vec::with_capacity(input.len() + input.len() / 8 + 8);
    let mut pos = 0usize;

    let mut flag_pos = 0usize;
    let mut bit = 8u8;

    while pos < input.len() {
        if bit == 8 {
            flag_pos = out.len();
            out.push(0);
            bit = 0;
        }

        let lookahead = &input[pos..];
        let max_len = MAX_MATCH.min(lookahead.len());
        let (offset, length) = longest_match(&window, cursor, lookahead, max_len);

        if length > THRESHOLD {
            out.push((offset & 0xFF) as u8);
            out.push((((offset >> 4) & 0xF0) | (length - THRESHOLD - 1)) as u8);
            for &byte in &lookahead[..length] {
                window[cursor] = byte;
                cursor = (cursor + 1) & (WINDOW - 1);
            }
            pos += length;
        } else {
            out[flag_pos] |= 1 << bit;
            out.push(lookahead[0]);
            window[cursor] = lookahead[0];
            cursor = (cursor + 1) & (WINDOW - 1);
            pos += 1;
        }
        bit += 1;
    }

    out.extend_from_slice(&checksum_of(input, kind).to_le_bytes());
    out
}

/// Longest match of `lookahead` against the window, decoder-accurate:
/// positions at or past the cursor replay the bytes copied so far, exactly
/// as the decoder writes through the ring during a copy.
fn longest_match(
    window: &[u8; WINDOW],
    cursor: usize,
    lookahead: &[u8],
    max_len: usize,
) -> (usize, usize) {
    let mut best = (0usize, 0usize);
    if max_len <= THRESHOLD {
        return best;
    }

    for offset in 1..WINDOW {
        let mut len = 0usize;
        while len < max_len {
            let byte = if len >= offset {
                lookahead[len - offset]
            } else {
                window[(cursor + WINDOW - offset + len) & (WINDOW - 1)]
            };
            if byte != lookahead[len] {
                break;
            }
            len += 1;
        }
        if len > best.1 {
            best = (offset, len);
            if len == max_len {
                break;
            }
        }
    }

    best
}
