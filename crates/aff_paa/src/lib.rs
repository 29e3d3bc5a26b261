//! This library handles reading from and creating **PAA** textures used by the *Arma* series.
//!
//! # PAA Texture Format Documentation
//!
//! A PAA ("Packed Arma Asset") is a mipmapped texture, usually DXT
//! block-compressed and optionally LZO-wrapped. PAA files are typically
//! identified with the `.paa` (or legacy `.pac`) extension.
//!
//! ## File Structure
//!
//! | Field      | Description                                                    |
//! |------------|----------------------------------------------------------------|
//! | Magic      | 2 bytes selecting the pixel format (see table below)           |
//! | Taggs      | Zero or more TLV chunks, read while the next byte is nonzero   |
//! | Palette    | 2-byte length followed by that many bytes (0 unless palettized)|
//! | Mipmaps    | Mipmap records, read while the next u16 is nonzero             |
//! | Terminator | Three u16 zeros                                                |
//!
//! ### Magic
//!
//! | u16    | Format     |
//! |--------|------------|
//! | 0xFF01 | DXT1       |
//! | 0xFF02 | DXT2       |
//! | 0xFF03 | DXT3       |
//! | 0xFF04 | DXT4       |
//! | 0xFF05 | DXT5       |
//! | 0x4444 | RGBA 4:4:4:4 |
//! | 0x1555 | RGBA 5:5:5:1 |
//! | 0x8888 | RGBA 8:8:8:8 |
//! | 0x8080 | Gray + Alpha |
//!
//! ### Taggs
//!
//! Each tagg is an 8-byte signature, a u32 payload length and the payload.
//! Signatures are stored byte-reversed, so the average color tagg
//! "AVGCTAGG" appears on disk as `GGATCGVA`. Recognized taggs are the
//! average color, the maximum color, the transparency flag and the mipmap
//! offset table (one u32 per serialized mipmap); unknown taggs are
//! preserved on round-trip.
//!
//! ### Mipmap Records
//!
//! | Field  | Description                                                    |
//! |--------|----------------------------------------------------------------|
//! | Width  | u16; the top bit marks an LZO-wrapped payload and is not part of the width |
//! | Height | u16                                                            |
//! | Length | 3-byte little-endian payload length                            |
//! | Data   | The payload: DXT blocks, optionally LZO-wrapped                |
//!
//! Mipmap 0 is the full resolution; every following level halves width and
//! height. Widths and heights are powers of two. Writers LZO-wrap every
//! mipmap wider than 128 pixels.
//!

pub mod dxt;
pub mod error;
pub mod mipmap;
pub mod read;
pub mod types;
pub mod write;

pub use read::Paa;
pub use types::{Mipmap, PaxKind, Tagg};
