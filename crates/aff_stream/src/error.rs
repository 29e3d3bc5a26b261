//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for the stream kernel
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// input ended before the requested bytes could be read
    #[error("input ended before the requested bytes could be read")]
    UnexpectedEof,

    /// Wrapper for [`std::io::Error`] other than early EOF
    #[error(transparent)]
    Io(std::io::Error),

    /// LZSS trailer checksum did not match the decoded data
    #[error("lzss checksum mismatch (stored {stored:#010x}, computed {computed:#010x})")]
    ChecksumMismatch {
        /// Checksum stored after the compressed block
        stored: i32,
        /// Checksum accumulated while decoding
        computed: i32,
    },

    /// An LZSS back-reference would write past the declared output size
    #[error("lzss back-reference overruns the declared output size of {0} bytes")]
    Overflow(usize),

    /// The LZO library reported a failure
    #[error("lzo: {0}")]
    Lzo(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof
        } else {
            Error::Io(e)
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
