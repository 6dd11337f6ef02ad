//! raw font bytes

use std::ops::RangeBounds;

use sfnt_types::Scalar;

use crate::read::ReadError;

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, providing bounds-checked access to
/// the scalar values that make up font tables. Every read is checked against
/// the length of the underlying slice; an out-of-bounds read is an error,
/// never a clamp or a wrap.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

/// A cursor for validating bytes during parsing.
///
/// This improves the ergonomics of sequential header reads; call
/// [`finish`](Cursor::finish) when you're done to ensure you're in bounds.
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Return the data from `pos` onwards, or `None` if `pos` is out of bounds.
    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(|bytes| FontData { bytes })
    }

    /// Return a sub-range of the data, or `None` if the range is out of bounds.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(|bytes| FontData { bytes })
    }

    /// Read a scalar value out of the buffer at `offset`.
    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        self.bytes
            .get(offset..)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    pub(crate) fn check_in_bounds(&self, offset: usize) -> Result<(), ReadError> {
        if offset <= self.bytes.len() {
            Ok(())
        } else {
            Err(ReadError::OutOfBounds)
        }
    }

    pub fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    /// The underlying bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Cursor<'a> {
    pub fn advance<T: Scalar>(&mut self) {
        self.pos += T::RAW_BYTE_LEN;
    }

    pub fn advance_by(&mut self, n_bytes: usize) {
        self.pos += n_bytes;
    }

    pub fn read<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let temp = self.data.read_at(self.pos);
        self.pos += T::RAW_BYTE_LEN;
        temp
    }

    /// return the current position, or an error if we are out of bounds
    pub fn position(&self) -> Result<usize, ReadError> {
        self.data.check_in_bounds(self.pos).map(|_| self.pos)
    }

    pub fn remaining_bytes(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Check that everything read so far was in bounds.
    pub fn finish(self) -> Result<(), ReadError> {
        self.data.check_in_bounds(self.pos)
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfnt_types::{GlyphId, Tag};

    #[test]
    fn read_scalars() {
        let data = FontData::new(&[0x00, 0x01, 0x00, 0x2c, 0xff, 0xfe]);
        assert_eq!(data.read_at::<u32>(0), Ok(0x0001_002c));
        assert_eq!(data.read_at::<u16>(2), Ok(0x2c));
        assert_eq!(data.read_at::<i16>(4), Ok(-2));
        assert_eq!(data.read_at::<GlyphId>(2), Ok(GlyphId::new(0x2c)));
    }

    #[test]
    fn reads_are_bounds_checked() {
        let data = FontData::new(&[0xde, 0xad]);
        assert_eq!(data.read_at::<u32>(0), Err(ReadError::OutOfBounds));
        assert_eq!(data.read_at::<u16>(1), Err(ReadError::OutOfBounds));
        assert_eq!(data.read_at::<u8>(2), Err(ReadError::OutOfBounds));
        assert!(data.read_at::<u16>(0).is_ok());
    }

    #[test]
    fn slicing() {
        let data = FontData::new(&[1, 2, 3, 4]);
        assert_eq!(data.slice(1..3).map(|d| d.len()), Some(2));
        assert_eq!(data.slice(..5), None);
        assert_eq!(data.split_off(4).map(|d| d.len()), Some(0));
        assert_eq!(data.split_off(5), None);
    }

    #[test]
    fn cursor_bounds() {
        let data = FontData::new(&[0x00, 0x01, 0x00, 0x00]);
        let mut cursor = data.cursor();
        assert_eq!(cursor.read::<Tag>(), Ok(Tag::from_u32(0x0001_0000)));
        cursor.advance::<u16>();
        assert_eq!(cursor.read::<u16>(), Err(ReadError::OutOfBounds));
    }
}
