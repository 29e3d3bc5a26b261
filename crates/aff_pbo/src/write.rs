//! Types for writing PBO archives
//!

use binrw::BinWrite;
use bon::Builder;
use byteorder::WriteBytesExt;
use indexmap::IndexMap;
use sha1::{Digest, Sha1};
use std::io::{Cursor, Write};
use tracing::instrument;

use aff_stream::WriteAffExt;

use crate::error::Result;
use crate::types::{EntryRecord, PboSignature};

/// Per-file options for [`PboWriter::add_file`]
#[derive(Debug, Clone, Copy, Default, Builder)]
pub struct PboFileOptions {
    /// Modification time, seconds since the Unix epoch
    #[builder(default)]
    pub timestamp: u32,

    /// Packing method marker to record in the header
    #[builder(default)]
    pub packing_method: u32,
}

/// PBO archive generator
///
/// Collects product entries and files, then emits the fixed archive layout
/// followed by the SHA-1 trailer. Payloads are written as given; the
/// writer never recompresses.
///
/// ```
/// # fn doit() -> aff_pbo::error::Result<()>
/// # {
/// use aff_pbo::{PboFileOptions, PboWriter};
///
/// let mut pbo = PboWriter::new(std::io::Cursor::new(Vec::new()));
/// pbo.add_product_entry("prefix", "z\\my_mod");
/// pbo.add_file("config.bin", b"raP\0".to_vec(), PboFileOptions::default())?;
///
/// let buffer = pbo.finish()?;
/// # let _ = buffer;
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct PboWriter<W: Write> {
    inner: W,
    product_entries: IndexMap<String, String>,
    entries: Vec<(EntryRecord, Vec<u8>)>,
}

impl<W: Write> PboWriter<W> {
    /// Initializes the archive.
    pub fn new(inner: W) -> PboWriter<W> {
        PboWriter {
            inner,
            product_entries: IndexMap::new(),
            entries: Vec::new(),
        }
    }

    /// Add a (key, value) product entry. Duplicate keys keep their first
    /// position, last value wins.
    pub fn add_product_entry(&mut self, key: impl ToString, value: impl ToString) {
        self.product_entries
            .insert(key.to_string(), value.to_string());
    }

    /// Add a file with its payload.
    ///
    /// The name is lowercased and `/` separators become `\`. The header's
    /// `original_size` is written as zero: the payload is stored as given,
    /// so a reader must never take the unpack path for it.
    #[instrument(skip(self, name, data), fields(size = data.len()), err)]
    pub fn add_file(
        &mut self,
        name: impl ToString,
        data: Vec<u8>,
        options: PboFileOptions,
    ) -> Result<()> {
        let filename = name.to_string().replace('/', "\\").to_lowercase();

        let record = EntryRecord {
            filename: filename.into(),
            packing_method: options.packing_method,
            original_size: 0,
            reserved: 0,
            timestamp: options.timestamp,
            data_size: data.len() as u32,
        };
        self.entries.push((record, data));

        Ok(())
    }

    /// Assemble the archive and write it to the sink, trailer included.
    ///
    /// Returns the sink; one should normally not append any data to the
    /// end of the file.
    #[instrument(skip(self), err)]
    pub fn finish(self) -> Result<W> {
        let mut body = Cursor::new(Vec::new());

        PboSignature::default().write(&mut body)?;

        for (key, value) in &self.product_entries {
            body.write_zero_terminated(key)?;
            body.write_zero_terminated(value)?;
        }
        body.write_u8(0).map_err(aff_stream::Error::from)?;

        for (record, _) in &self.entries {
            record.write(&mut body)?;
        }
        body.write_all(&[0u8; 21]).map_err(aff_stream::Error::from)?;

        for (_, data) in &self.entries {
            body.write_all(data).map_err(aff_stream::Error::from)?;
        }

        let body = body.into_inner();

        let mut hasher = Sha1::new();
        hasher.update(&body);
        let hash: [u8; 20] = hasher.finalize().into();

        let mut inner = self.inner;
        inner.write_all(&body).map_err(aff_stream::Error::from)?;
        inner.write_u8(0).map_err(aff_stream::Error::from)?;
        inner.write_all(&hash).map_err(aff_stream::Error::from)?;
        inner.flush().map_err(aff_stream::Error::from)?;

        Ok(inner)
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;
    use sha1::{Digest, Sha1};

    use crate::error::Result;
    use crate::write::{PboFileOptions, PboWriter};

    #[test]
    fn empty_pbo_write() -> Result<()> {
        #[rustfmt::skip]
        let mut expected = [
            // Signature
            vec![0x00, 0x73, 0x72, 0x65, 0x56],
            vec![0x00; 16],
            // Product entry terminator
            vec![0x00],
            // Entry header terminator
            vec![0x00; 21],
        ]
        .concat();

        let hash = Sha1::digest(&expected);
        expected.push(0x00);
        expected.extend(hash);

        let writer = PboWriter::new(Cursor::new(Vec::new()));
        let actual = writer.finish()?.into_inner();

        assert_eq!(actual, expected);
        Ok(())
    }

    #[test]
    fn single_file_write() -> Result<()> {
        #[rustfmt::skip]
        let mut expected = [
            vec![0x00, 0x73, 0x72, 0x65, 0x56],
            vec![0x00; 16],
            // Product entries
            b"prefix\0foo\0".to_vec(),
            vec![0x00],
            // Entry header for hello.txt
            b"hello.txt\0".to_vec(),
            0u32.to_le_bytes().to_vec(),
            0u32.to_le_bytes().to_vec(),
            0u32.to_le_bytes().to_vec(),
            0x5F00_0000u32.to_le_bytes().to_vec(),
            11u32.to_le_bytes().to_vec(),
            vec![0x00; 21],
            // Payload
            b"Hello World".to_vec(),
        ]
        .concat();

        let hash = Sha1::digest(&expected);
        expected.push(0x00);
        expected.extend(hash);

        let mut writer = PboWriter::new(Cursor::new(Vec::new()));
        writer.add_product_entry("prefix", "foo");
        writer.add_file(
            "Hello.txt",
            b"Hello World".to_vec(),
            PboFileOptions::builder().timestamp(0x5F00_0000).build(),
        )?;

        let actual = writer.finish()?.into_inner();
        assert_eq!(actual, expected);
        Ok(())
    }

    #[test]
    fn separators_are_normalized() -> Result<()> {
        let mut writer = PboWriter::new(Cursor::new(Vec::new()));
        writer.add_file(
            "Addons/Config.bin",
            Vec::new(),
            PboFileOptions::default(),
        )?;

        let raw = writer.finish()?.into_inner();
        let haystack = raw.windows(18).any(|w| w == b"addons\\config.bin\0");
        assert!(haystack);
        Ok(())
    }
}
