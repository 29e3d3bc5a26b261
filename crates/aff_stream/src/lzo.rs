//! LZO1X bridge.
//!
//! Large PAA mipmaps and a handful of compressed arrays are wrapped with
//! plain LZO1X; the wire format is fixed and externally documented, so the
//! algorithm is treated as opaque and delegated to `minilzo-rs`. Library
//! initialization is handled per call and is idempotent.

use crate::error::{Error, Result};

/// Compress a buffer with LZO1X-1
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    let mut lzo = minilzo_rs::LZO::init().map_err(|e| Error::Lzo(format!("init: {e:?}")))?;
    lzo.compress(input)
        .map_err(|e| Error::Lzo(format!("compress: {e:?}")))
}

/// Decompress an LZO1X buffer of known uncompressed size
pub fn decompress(input: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    let lzo = minilzo_rs::LZO::init().map_err(|e| Error::Lzo(format!("init: {e:?}")))?;
    lzo.decompress_safe(input, expected_size)
        .map_err(|e| Error::Lzo(format!("decompress: {e:?}")))
}
