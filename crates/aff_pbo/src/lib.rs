//! This library handles reading from and creating **PBO** archives used by the *Arma* series.
//!
//! # PBO Archive Format Documentation
//!
//! A PBO ("Packed Bank of Files") is the engine's archive container. It
//! stores a flat list of files together with free-form product metadata and
//! a SHA-1 integrity trailer. PBO files are typically identified with the
//! `.pbo` extension.
//!
//! ## File Structure
//!
//! A PBO consists of a signature, product entries, an entry header list,
//! the entry payloads, and a hash trailer, strictly in that order:
//!
//! | Field            | Description                                              |
//! |------------------|----------------------------------------------------------|
//! | Signature        | 1 byte 0x00, then 4 bytes 0x56657273 ("Vers"), then 16 reserved zero bytes |
//! | Product entries  | Zero or more (key, value) pairs of zero-terminated strings, terminated by a single 0x00 |
//! | Entry headers    | Zero or more entry headers (see below), terminated by 21 zero bytes |
//! | Payloads         | The data of every entry, back to back, in header order    |
//! | Trailer          | 1 byte 0x00 followed by a 20-byte SHA-1                   |
//!
//! ### Entry Header
//!
//! | Offset (bytes) | Field          | Description                                     |
//! |----------------|----------------|-------------------------------------------------|
//! | 0x0000         | Filename       | Zero-terminated string, `\` path separators     |
//! | —              | Packing Method | 4 bytes: 0x43707273 ("Cprs") marks compression  |
//! | —              | Original Size  | 4 bytes: uncompressed size hint                 |
//! | —              | Reserved       | 4 bytes                                         |
//! | —              | Timestamp      | 4 bytes: seconds since the Unix epoch           |
//! | —              | Data Size      | 4 bytes: length of the payload in the file      |
//!
//! An entry's payload is LZSS-packed when `original_size` is nonzero and
//! differs from `data_size`; the size rule is authoritative even where the
//! packing method field disagrees. Packed payloads carry the unsigned
//! additive checksum convention.
//!
//! ### Paths
//!
//! Filenames are stored with `\` separators and compared
//! case-insensitively. When the requested path starts with the archive's
//! `prefix` product entry, the prefix and one following separator are
//! stripped before lookup.
//!
//! ### Hash Trailer
//!
//! The trailing SHA-1 covers every byte of the file up to, but not
//! including, the single 0x00 that immediately precedes it. The hash is
//! optional for correctness but mandatory for archives loaded by the game.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.pbo`
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod error;
pub mod read;
pub mod types;
pub mod write;

pub use read::{PboArchive, PboEntry};
pub use write::{PboFileOptions, PboWriter};
