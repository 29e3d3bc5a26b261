//! Types for reading PBO archives
//!

use binrw::BinRead;
use byteorder::ReadBytesExt;
use indexmap::IndexMap;
use sha1::{Digest, Sha1};
use std::{
    io::{Cursor, Read, Seek, SeekFrom},
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tracing::{debug, instrument};

use aff_stream::{lzss, ChecksumKind, PeekAffExt, ReadAffExt};

use crate::{
    error::{Error, Result},
    types::{EntryRecord, PboSignature},
};

/// One file stored in a PBO archive.
///
/// The header fields are kept verbatim; `data` holds the unpacked payload
/// once it has been loaded.
#[derive(Debug, Clone, Default)]
pub struct PboEntry {
    /// Stored path, lowercased, `\` separated
    pub filename: Box<str>,
    /// Packing method marker from the header
    pub packing_method: u32,
    /// Uncompressed size hint from the header
    pub original_size: u32,
    /// Reserved header field
    pub reserved: u32,
    /// Modification time, seconds since the Unix epoch
    pub timestamp: u32,
    /// Length of the payload as stored in the file
    pub data_size: u32,
    data: Option<Vec<u8>>,
}

impl PboEntry {
    fn from_record(record: EntryRecord) -> Self {
        let filename = String::from_utf8_lossy(&record.filename).to_lowercase();
        PboEntry {
            filename: filename.into(),
            packing_method: record.packing_method,
            original_size: record.original_size,
            reserved: record.reserved,
            timestamp: record.timestamp,
            data_size: record.data_size,
            data: None,
        }
    }

    /// Whether the on-disk payload is LZSS-packed (size rule, see
    /// [`EntryRecord::is_packed`])
    pub fn is_packed(&self) -> bool {
        self.original_size != 0 && self.original_size != self.data_size
    }

    /// Modification time of the entry
    pub fn modified(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.timestamp as u64)
    }

    /// The unpacked payload, if it has been loaded
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Unpack a raw on-disk payload according to the header
    fn unpack(&self, raw: Vec<u8>) -> Result<Vec<u8>> {
        if !self.is_packed() {
            return Ok(raw);
        }
        Ok(lzss::decompress(
            &mut Cursor::new(raw),
            self.data_size as usize,
            ChecksumKind::Unsigned,
        )?)
    }
}

/// Surface binrw failures as the crate's error kinds: a failed magic is an
/// invalid archive, early EOF keeps its meaning.
fn map_binrw(e: binrw::Error) -> Error {
    match e {
        binrw::Error::BadMagic { .. } => Error::InvalidArchive,
        binrw::Error::Io(io) => Error::Stream(io.into()),
        other => Error::BinRw(other),
    }
}

/// PBO archive reader
///
/// Parses the header on construction; payloads are loaded on demand
/// ([`PboArchive::entry_data`]) or all at once ([`PboArchive::read_all`]).
///
/// ```no_run
/// fn list_pbo_contents(reader: impl std::io::Read + std::io::Seek) -> aff_pbo::error::Result<()> {
///     let pbo = aff_pbo::PboArchive::new(reader)?;
///
///     for name in pbo.file_names() {
///         println!("{name}");
///     }
///
///     Ok(())
/// }
/// ```
pub struct PboArchive<R> {
    reader: R,
    product_entries: IndexMap<String, String>,
    entries: IndexMap<Box<str>, PboEntry>,
    data_start: u64,
    pre_hash_pos: Option<u64>,
    stored_hash: Option<[u8; 20]>,
}

impl<R: Read + Seek> PboArchive<R> {
    /// Read the signature, product entries and entry headers of an archive.
    pub fn new(mut reader: R) -> Result<PboArchive<R>> {
        reader.seek(SeekFrom::Start(0))?;

        let signature = PboSignature::read(&mut reader).map_err(map_binrw)?;
        if signature.reserved != [0u8; 16] {
            debug!("nonzero reserved bytes in signature");
        }

        let mut product_entries = IndexMap::new();
        while reader.peek_u8()? != 0 {
            let key = reader.read_zero_terminated()?;
            let value = reader.read_zero_terminated()?;
            product_entries.insert(key, value);
        }
        reader.read_u8()?;

        let mut entries: IndexMap<Box<str>, PboEntry> = IndexMap::new();
        while reader.peek_u16()? != 0 {
            let record = EntryRecord::read(&mut reader).map_err(map_binrw)?;
            let entry = PboEntry::from_record(record);
            entries.insert(entry.filename.clone(), entry);
        }
        let _terminator = reader.read_bytes(21)?;

        let data_start = reader.stream_position()?;

        Ok(PboArchive {
            reader,
            product_entries,
            entries,
            data_start,
            pre_hash_pos: None,
            stored_hash: None,
        })
    }

    /// Number of entries contained in this archive
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this archive contains no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the stored entry paths, in header order
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_ref())
    }

    /// The (key, value) product entries, in file order
    pub fn product_entries(&self) -> &IndexMap<String, String> {
        &self.product_entries
    }

    /// The archive's `prefix` product entry, if present
    pub fn prefix(&self) -> Option<&str> {
        self.product_entries.get("prefix").map(|s| s.as_str())
    }

    /// Offset of the first payload byte
    pub fn data_start(&self) -> u64 {
        self.data_start
    }

    /// The stored trailer hash, available after [`PboArchive::read_all`]
    pub fn stored_hash(&self) -> Option<&[u8; 20]> {
        self.stored_hash.as_ref()
    }

    /// Whether the archive contains the given path.
    ///
    /// Comparison is case-insensitive with `/` treated as `\`; a leading
    /// archive prefix is stripped.
    pub fn has_entry(&self, path: &str) -> bool {
        self.entries.contains_key(self.resolve(path).as_str())
    }

    /// Entry metadata by stored path (after prefix resolution)
    pub fn entry(&self, path: &str) -> Option<&PboEntry> {
        self.entries.get(self.resolve(path).as_str())
    }

    /// Entry metadata by header order index
    pub fn entry_by_index(&self, index: usize) -> Option<&PboEntry> {
        self.entries.get_index(index).map(|(_, e)| e)
    }

    /// The unpacked payload of a single entry.
    ///
    /// Seeks past the payloads of all preceding entries and reads only the
    /// requested one; the result is cached on the entry.
    #[instrument(skip(self))]
    pub fn entry_data(&mut self, path: &str) -> Result<&[u8]> {
        let key = self.resolve(path);
        let index = self
            .entries
            .get_index_of(key.as_str())
            .ok_or_else(|| Error::FileNotFound(path.to_owned()))?;

        self.load_entry(index)?;

        Ok(self.entries[index]
            .data
            .as_deref()
            .expect("entry payload should be cached after loading"))
    }

    /// Load every payload sequentially and capture the hash trailer.
    #[instrument(skip(self), err)]
    pub fn read_all(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(self.data_start))?;

        for entry in self.entries.values_mut() {
            let raw = self.reader.read_bytes(entry.data_size as usize)?;
            entry.data = Some(entry.unpack(raw)?);
        }

        self.pre_hash_pos = Some(self.reader.stream_position()?);
        self.reader.read_u8()?;
        let mut hash = [0u8; 20];
        self.reader.read_exact(&mut hash).map_err(aff_stream::Error::from)?;
        self.stored_hash = Some(hash);

        Ok(())
    }

    /// Verify the trailer hash against the file contents.
    ///
    /// Loads the remaining payloads first when necessary. A mismatch is
    /// reported as `false`, not as an error.
    #[instrument(skip(self), err)]
    pub fn check_hash(&mut self) -> Result<bool> {
        if self.pre_hash_pos.is_none() {
            self.read_all()?;
        }
        let pre_hash_pos = self.pre_hash_pos.expect("set by read_all");

        self.reader.seek(SeekFrom::Start(0))?;
        let hashed = self.reader.read_bytes(pre_hash_pos as usize)?;

        let mut hasher = Sha1::new();
        hasher.update(&hashed);
        let computed: [u8; 20] = hasher.finalize().into();

        Ok(Some(&computed) == self.stored_hash.as_ref())
    }

    /// Unwrap and return the inner reader object
    ///
    /// The position of the reader is undefined.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Normalize a requested path to a stored entry key: `\` separators,
    /// lowercase, archive prefix stripped.
    fn resolve(&self, path: &str) -> String {
        let mut resolved = path.replace('/', "\\").to_lowercase();

        if let Some(prefix) = self.prefix() {
            let prefix = prefix.replace('/', "\\").to_lowercase();
            if !prefix.is_empty()
                && resolved.starts_with(&prefix)
                && resolved[prefix.len()..].starts_with('\\')
            {
                resolved.drain(..=prefix.len());
            }
        }

        resolved
    }

    fn load_entry(&mut self, index: usize) -> Result<()> {
        if self.entries[index].data.is_some() {
            return Ok(());
        }

        let offset: u64 = self
            .entries
            .values()
            .take(index)
            .map(|e| e.data_size as u64)
            .sum();
        self.reader.seek(SeekFrom::Start(self.data_start + offset))?;

        let raw = self
            .reader
            .read_bytes(self.entries[index].data_size as usize)?;
        let entry = &mut self.entries[index];
        entry.data = Some(entry.unpack(raw)?);

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::read::PboArchive;

    #[test]
    fn read_invalid_magic() {
        let input = [0x01u8; 64];
        let archive = PboArchive::new(Cursor::new(input));
        assert!(matches!(archive, Err(Error::InvalidArchive)));
    }

    #[test]
    fn read_header_only() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            // Signature
            vec![0x00, 0x73, 0x72, 0x65, 0x56],
            vec![0x00; 16],
            // Product entry "prefix" = "foo"
            b"prefix\0foo\0".to_vec(),
            vec![0x00],
            // Entry header terminator
            vec![0x00; 21],
        ]
        .concat();

        let archive = PboArchive::new(Cursor::new(input))?;
        assert!(archive.is_empty());
        assert_eq!(archive.product_entries().len(), 1);
        assert_eq!(archive.prefix(), Some("foo"));
        assert_eq!(archive.data_start(), 54);

        Ok(())
    }

    #[test]
    fn read_truncated_header() {
        let input = vec![0x00u8, 0x73, 0x72, 0x65, 0x56, 0x00, 0x00];
        let archive = PboArchive::new(Cursor::new(input));
        assert!(matches!(
            archive,
            Err(Error::Stream(aff_stream::Error::UnexpectedEof))
        ));
    }

    #[test]
    fn duplicate_product_keys_last_wins() -> Result<()> {
        let input = [
            vec![0x00, 0x73, 0x72, 0x65, 0x56],
            vec![0x00; 16],
            b"version\0one\0version\0two\0".to_vec(),
            vec![0x00],
            vec![0x00; 21],
        ]
        .concat();

        let archive = PboArchive::new(Cursor::new(input))?;
        assert_eq!(archive.product_entries().len(), 1);
        assert_eq!(
            archive.product_entries().get("version").map(String::as_str),
            Some("two")
        );

        Ok(())
    }

    #[test]
    fn lookup_is_case_insensitive() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            vec![0x00, 0x73, 0x72, 0x65, 0x56],
            vec![0x00; 16],
            vec![0x00],
            // Entry "Config.Bin", all sizes zero
            b"Config.Bin\0".to_vec(),
            vec![0x00; 20],
            vec![0x00; 21],
        ]
        .concat();

        let archive = PboArchive::new(Cursor::new(input))?;
        assert_eq!(archive.len(), 1);
        assert!(archive.has_entry("config.bin"));
        assert!(archive.has_entry("CONFIG.BIN"));
        assert!(!archive.has_entry("other.bin"));

        Ok(())
    }

    #[test]
    fn prefix_is_stripped_on_lookup() -> Result<()> {
        let input = [
            vec![0x00, 0x73, 0x72, 0x65, 0x56],
            vec![0x00; 16],
            b"prefix\0z\\my_mod\0".to_vec(),
            vec![0x00],
            b"config.bin\0".to_vec(),
            vec![0x00; 20],
            vec![0x00; 21],
        ]
        .concat();

        let archive = PboArchive::new(Cursor::new(input))?;
        assert!(archive.has_entry("config.bin"));
        assert!(archive.has_entry("z\\my_mod\\config.bin"));
        assert!(archive.has_entry("Z\\My_Mod\\Config.bin"));
        assert!(archive.has_entry("z/my_mod/config.bin"));
        // no separator after the prefix: not a prefix match
        assert!(!archive.has_entry("z\\my_modconfig.bin"));

        Ok(())
    }
}
