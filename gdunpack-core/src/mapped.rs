use std::fs::File;
use std::io;
use std::path::Path;

use memmap2::Mmap;

use crate::{BoundsError, ByteReader};

/// A read-only, memory-mapped medium.
///
/// Nothing in the crate writes through the mapping; every consumer gets
/// bounds-checked slices or [`ByteReader`]s cut from it.
#[derive(Debug)]
pub struct MappedFile {
    data: Mmap,
}

impl MappedFile {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        // The medium is opened read-only and never resized while mapped.
        let data = unsafe { Mmap::map(&file)? };

        log::debug!("mapped {:?} ({} bytes)", path.as_ref(), data.len());
        Ok(Self { data })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Slice `[offset, offset + len)`; `None` runs to the end of the medium.
    pub fn range(&self, offset: u64, len: Option<u64>) -> Result<&[u8], BoundsError> {
        slice_range(&self.data, offset, len)
    }

    pub fn reader(&self, offset: u64, len: Option<u64>) -> Result<ByteReader<'_>, BoundsError> {
        Ok(ByteReader::with_base(self.range(offset, len)?, offset))
    }
}

pub(crate) fn slice_range(data: &[u8], offset: u64, len: Option<u64>) -> Result<&[u8], BoundsError> {
    let total = data.len() as u64;
    let available = total.saturating_sub(offset);
    let len = len.unwrap_or(available);

    if offset > total || len > available {
        return Err(BoundsError {
            offset,
            len,
            available,
        });
    }
    Ok(&data[offset as usize..(offset + len) as usize])
}
