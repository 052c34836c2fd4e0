//! Pack container index.
//!
//! Only the version this tool was written against is understood. Layout
//! (little-endian):
//! - 0x00: u32 magic ("GDPC")
//! - 0x04: u32 format_version
//! - 0x08: u32 engine major, minor, patch
//! - 0x14: [u32; 16] reserved
//! - 0x54: u32 file_count
//! - 0x58: file_count entries:
//!     - u32 name_len
//!     - [name_len] name bytes (NUL padded), then align to 4
//!     - i64 offset (absolute)
//!     - i64 size
//!     - [u8; 16] md5 of the payload, then align to 4

use md5::{Digest, Md5};

use crate::{ByteReader, PackError};

const RES_PREFIX: &str = "res://";

/// Extension of compiled script assets.
pub const COMPILED_SCRIPT_EXT: &str = "gdc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackHeader {
    pub format_version: u32,
    pub engine_major: u32,
    pub engine_minor: u32,
    pub engine_patch: u32,
    pub file_count: u32,
}

impl PackHeader {
    pub const MAGIC: u32 = 0x4350_4447;
    pub const SIZE: usize = 88;

    pub fn parse(r: &mut ByteReader<'_>) -> Result<Self, PackError> {
        let magic = r.peek_u32()?;
        if magic != Self::MAGIC {
            return Err(PackError::BadMagic {
                found: magic,
                expected: Self::MAGIC,
            });
        }
        r.skip(4)?;

        let format_version = r.read_u32()?;
        let engine_major = r.read_u32()?;
        let engine_minor = r.read_u32()?;
        let engine_patch = r.read_u32()?;
        r.skip(16 * 4)?;
        let file_count = r.read_u32()?;

        Ok(Self {
            format_version,
            engine_major,
            engine_minor,
            engine_patch,
            file_count,
        })
    }

    pub fn engine_version(&self) -> String {
        format!("{}.{}.{}", self.engine_major, self.engine_minor, self.engine_patch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackEntry {
    /// Full resource path, usually `res://...`.
    pub name: String,
    /// Absolute offset of the payload inside the container.
    pub offset: u64,
    pub size: u64,
    pub md5: [u8; 16],
}

impl PackEntry {
    /// Length word, empty name, offset, size, md5.
    pub const MIN_ENTRY_SIZE: usize = 4 + 8 + 8 + 16;

    pub fn parse(r: &mut ByteReader<'_>, index: usize) -> Result<Self, PackError> {
        let name_len = r.read_u32()? as usize;
        let raw = r.read_bytes(name_len)?;
        let name = String::from_utf8_lossy(raw).trim_end_matches('\0').to_string();
        r.align(4)?;

        let offset = r.read_i64()?;
        let size = r.read_i64()?;
        let mut md5 = [0u8; 16];
        md5.copy_from_slice(r.read_bytes(16)?);
        r.align(4)?;

        if offset < 0 || size < 0 {
            return Err(PackError::BadEntry {
                index,
                offset,
                size,
            });
        }

        Ok(Self {
            name,
            offset: offset as u64,
            size: size as u64,
            md5,
        })
    }

    /// The resource path with its `res://` prefix removed.
    pub fn relative_path(&self) -> &str {
        self.name.strip_prefix(RES_PREFIX).unwrap_or(&self.name)
    }

    pub fn extension(&self) -> Option<&str> {
        let file_name = self.relative_path().rsplit('/').next()?;
        let (stem, ext) = file_name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        Some(ext)
    }

    pub fn is_compiled_script(&self) -> bool {
        self.extension() == Some(COMPILED_SCRIPT_EXT)
    }

    /// Check the stored digest against the payload bytes.
    pub fn verify(&self, payload: &[u8]) -> bool {
        Md5::digest(payload).as_slice() == &self.md5[..]
    }
}

/// Header plus the full asset table.
#[derive(Debug, Clone)]
pub struct PackIndex {
    pub header: PackHeader,
    pub entries: Vec<PackEntry>,
}

impl PackIndex {
    /// Parse the index at the start of `data` (the whole container).
    pub fn parse(data: &[u8]) -> Result<Self, PackError> {
        let mut r = ByteReader::new(data);
        let header = PackHeader::parse(&mut r)?;

        // the count is untrusted; no entry is shorter than MIN_ENTRY_SIZE
        let reserve = (header.file_count as usize).min(r.remaining() / PackEntry::MIN_ENTRY_SIZE);
        let mut entries = Vec::with_capacity(reserve);
        for i in 0..header.file_count as usize {
            entries.push(PackEntry::parse(&mut r, i)?);
        }
        log::debug!("read {} pack entries, index ends at 0x{:X}", entries.len(), r.pos());

        Ok(Self { header, entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn push_u32(buf: &mut Vec<u8>, v: u32) {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    fn pad4(buf: &mut Vec<u8>) {
        while buf.len() % 4 != 0 {
            buf.push(0);
        }
    }

    fn build_pack(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut index = Vec::new();
        push_u32(&mut index, PackHeader::MAGIC);
        push_u32(&mut index, 1);
        push_u32(&mut index, 3);
        push_u32(&mut index, 5);
        push_u32(&mut index, 1);
        index.extend_from_slice(&[0u8; 64]);
        push_u32(&mut index, files.len() as u32);

        // fixed size per entry lets us compute payload offsets up front
        let entry_len = |name: &str| 4 + ((name.len() + 3) & !3) + 8 + 8 + 16;
        let table_len: usize = files.iter().map(|(n, _)| entry_len(n)).sum();
        let mut offset = (index.len() + table_len) as i64;

        let mut payloads = Vec::new();
        for (name, data) in files {
            push_u32(&mut index, name.len() as u32);
            index.extend_from_slice(name.as_bytes());
            pad4(&mut index);
            index.extend_from_slice(&offset.to_le_bytes());
            index.extend_from_slice(&(data.len() as i64).to_le_bytes());
            index.extend_from_slice(Md5::digest(data).as_slice());
            offset += data.len() as i64;
            payloads.extend_from_slice(data);
        }

        index.extend_from_slice(&payloads);
        index
    }

    #[test]
    fn parse_index() {
        let data = build_pack(&[("res://a.txt", b"abc"), ("res://scripts/main.gdc", b"GDSC")]);
        let pack = PackIndex::parse(&data).unwrap();

        assert_eq!(pack.header.format_version, 1);
        assert_eq!(pack.header.engine_version(), "3.5.1");
        assert_eq!(pack.entries.len(), 2);

        let first = &pack.entries[0];
        assert_eq!(first.relative_path(), "a.txt");
        assert!(!first.is_compiled_script());
        let start = first.offset as usize;
        assert_eq!(&data[start..start + first.size as usize], b"abc");
        assert!(first.verify(b"abc"));
        assert!(!first.verify(b"abd"));

        let second = &pack.entries[1];
        assert_eq!(second.relative_path(), "scripts/main.gdc");
        assert!(second.is_compiled_script());
        assert_eq!(second.offset, first.offset + 3);
    }

    #[test]
    fn bad_magic() {
        let mut data = build_pack(&[]);
        data[0] = b'X';
        assert!(matches!(
            PackIndex::parse(&data),
            Err(PackError::BadMagic { .. })
        ));
    }

    #[test]
    fn truncated_table() {
        let data = build_pack(&[("res://a.txt", b"abc")]);
        let cut = &data[..PackHeader::SIZE + 6];
        assert!(matches!(PackIndex::parse(cut), Err(PackError::Bounds(_))));
    }

    #[test]
    fn huge_file_count_is_bounds_error() {
        let mut data = build_pack(&[("res://a.txt", b"abc")]);
        let count_at = PackHeader::SIZE - 4;
        data[count_at..PackHeader::SIZE].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(PackIndex::parse(&data), Err(PackError::Bounds(_))));
    }

    #[test]
    fn extension_rules() {
        let entry = |name: &str| PackEntry {
            name: name.to_string(),
            offset: 0,
            size: 0,
            md5: [0; 16],
        };
        assert_eq!(entry("res://dir.v2/file").extension(), None);
        assert_eq!(entry("res://.gdc").extension(), None);
        assert_eq!(entry("res://x.gdc_decompiled").extension(), Some("gdc_decompiled"));
        assert_eq!(entry("plain.gdc").relative_path(), "plain.gdc");
    }
}
