//! Stream primitives shared by the Arma file format crates.
//!
//! The engine's binary formats are all little-endian and lean on a small set
//! of recurring encodings:
//!
//! - zero-terminated ASCII strings
//! - a 3-byte unsigned integer ("arma ushort") used for mipmap sizes
//! - a variable-width 7-bit integer used by binarized configs
//! - LZSS-packed blocks with a trailing additive checksum (4096-byte
//!   sliding window, 18-byte max match)
//! - LZO1X-wrapped blocks for large payloads
//! - a "maybe compressed" envelope for arrays of fixed-width scalars
//!
//! This crate provides those primitives as extension traits over
//! [`std::io::Read`]/[`std::io::Write`] plus standalone codec modules, so
//! the format crates (`aff_pbo`, `aff_paa`) can stay focused on structure.

pub mod compressed;
pub mod error;
pub mod lzo;
pub mod lzss;
pub mod read;
pub mod write;

pub use error::{Error, Result};
pub use lzss::ChecksumKind;
pub use read::{PeekAffExt, ReadAffExt};
pub use write::WriteAffExt;
