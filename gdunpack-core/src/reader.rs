use byteorder::{ByteOrder, LittleEndian};

use crate::BoundsError;

/// Forward cursor over an immutable byte range.
///
/// `base` is the absolute offset of the first byte of the range inside the
/// medium it was cut from. Error offsets and [`ByteReader::align`] are
/// expressed in absolute terms, the same way the on-disk formats are.
///
/// A failed read never moves the cursor.
#[derive(Clone, Debug)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    base: u64,
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_base(bytes, 0)
    }

    pub fn with_base(bytes: &'a [u8], base: u64) -> Self {
        Self { bytes, base, pos: 0 }
    }

    /// Position relative to the start of the range.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Position inside the whole medium.
    #[inline]
    pub fn abs_pos(&self) -> u64 {
        self.base + self.pos as u64
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn ensure(&self, len: usize) -> Result<(), BoundsError> {
        if len > self.remaining() {
            return Err(BoundsError {
                offset: self.abs_pos(),
                len: len as u64,
                available: self.remaining() as u64,
            });
        }
        Ok(())
    }

    /// Borrow `len` bytes at the cursor without consuming them.
    pub fn peek_bytes(&self, len: usize) -> Result<&'a [u8], BoundsError> {
        self.ensure(len)?;
        Ok(&self.bytes[self.pos..self.pos + len])
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], BoundsError> {
        let out = self.peek_bytes(len)?;
        self.pos += len;
        Ok(out)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), BoundsError> {
        self.ensure(len)?;
        self.pos += len;
        Ok(())
    }

    pub fn peek_u8(&self) -> Result<u8, BoundsError> {
        Ok(self.peek_bytes(1)?[0])
    }

    pub fn read_u8(&mut self) -> Result<u8, BoundsError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn peek_u32(&self) -> Result<u32, BoundsError> {
        Ok(LittleEndian::read_u32(self.peek_bytes(4)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, BoundsError> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32, BoundsError> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_i64(&mut self) -> Result<i64, BoundsError> {
        Ok(LittleEndian::read_i64(self.read_bytes(8)?))
    }

    /// Advance until the absolute position is a multiple of `alignment`.
    pub fn align(&mut self, alignment: usize) -> Result<(), BoundsError> {
        let abs = self.abs_pos();
        let align = alignment as u64;
        let padding = ((align - abs % align) % align) as usize;
        self.skip(padding)
    }
}

/// Round `n` up to the next multiple of four.
#[inline]
pub fn align4(n: usize) -> usize {
    (n + 3) & !3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian() {
        let bytes = [0x47, 0x44, 0x53, 0x43, 0xFF, 0xFF, 0xFF, 0xFF];
        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_u32().unwrap(), 0x4353_4447);
        assert_eq!(r.read_i32().unwrap(), -1);
        assert!(r.is_empty());
    }

    #[test]
    fn failed_read_keeps_cursor() {
        let bytes = [1, 2, 3];
        let mut r = ByteReader::with_base(&bytes, 0x100);
        r.read_u8().unwrap();
        let err = r.read_u32().unwrap_err();
        assert_eq!(
            err,
            BoundsError {
                offset: 0x101,
                len: 4,
                available: 2
            }
        );
        assert_eq!(r.pos(), 1);
        assert_eq!(r.read_u8().unwrap(), 2);
    }

    #[test]
    fn align_uses_absolute_offset() {
        let bytes = [0u8; 16];
        // range starts at 2 so absolute 4 is relative 2
        let mut r = ByteReader::with_base(&bytes, 2);
        r.skip(1).unwrap();
        r.align(4).unwrap();
        assert_eq!(r.pos(), 2);
        assert_eq!(r.abs_pos(), 4);

        r.align(4).unwrap();
        assert_eq!(r.pos(), 2);
    }

    #[test]
    fn align4_rounds_up() {
        assert_eq!(align4(0), 0);
        assert_eq!(align4(5), 8);
        assert_eq!(align4(8), 8);
    }
}
