//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`aff_stream::Error`]
    #[error(transparent)]
    Stream(#[from] aff_stream::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRw(#[from] binrw::Error),

    /// file is an invalid pbo archive
    #[error("file is an invalid pbo archive")]
    InvalidArchive,

    /// unable to find requested entry
    #[error("unable to find entry {0}")]
    FileNotFound(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Stream(e.into())
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
