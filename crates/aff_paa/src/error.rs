//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`aff_stream::Error`]
    #[error(transparent)]
    Stream(#[from] aff_stream::Error),

    /// The magic number maps to no known pixel format
    #[error("unknown paa magic {0:#06x}")]
    InvalidMagic(u16),

    /// A structural expectation of the file was violated
    #[error("invalid paa: {0}")]
    InvalidFormat(&'static str),

    /// DXT block encode/decode rejected the input
    #[error("dxt: {0}")]
    Dxt(String),

    /// The requested operation is outside what this codec supports
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Stream(e.into())
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
