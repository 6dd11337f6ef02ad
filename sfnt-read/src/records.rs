//! Fixed-size records and lists of records.

use std::marker::PhantomData;

use sfnt_types::Scalar;

use crate::font_data::FontData;
use crate::read::ReadError;

/// A fixed-size item that can be read from anywhere in a table.
pub trait Record<'a>: Sized {
    /// The encoded length of this record, in bytes.
    const RECORD_SIZE: usize;

    /// Read a record starting at `pos` in `data`.
    fn read_at(data: FontData<'a>, pos: usize) -> Result<Self, ReadError>;
}

impl<'a, T: Scalar> Record<'a> for T {
    const RECORD_SIZE: usize = T::RAW_BYTE_LEN;

    fn read_at(data: FontData<'a>, pos: usize) -> Result<Self, ReadError> {
        data.read_at(pos)
    }
}

/// Describes where a record list's count and values live within a table.
///
/// Most lists store a 16-bit count immediately followed by the values, but
/// some tables interleave other fields between the two.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordListLayout {
    /// Offset of the big-endian `u16` count field.
    pub count_offset: usize,
    /// Offset of the first record.
    pub values_offset: usize,
}

impl RecordListLayout {
    /// A count field directly followed by the records.
    pub const PREFIXED: RecordListLayout = RecordListLayout {
        count_offset: 0,
        values_offset: 2,
    };
}

/// A lazily-parsed list of fixed-size records.
///
/// The full span of the list is bounds-checked at construction time, so
/// individual accesses cannot read past the end of the underlying data.
pub struct RecordList<'a, T> {
    data: FontData<'a>,
    values_offset: usize,
    count: u16,
    _marker: PhantomData<fn() -> T>,
}

// a derive would bound these on `T`, but no `T` is actually stored
impl<T> Clone for RecordList<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RecordList<'_, T> {}

impl<'a, T: Record<'a> + 'a> RecordList<'a, T> {
    /// Read a list with a `u16` count directly preceding the records.
    pub fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Self::read_with_layout(data, RecordListLayout::PREFIXED)
    }

    /// Read a list whose count and values live at the provided offsets.
    pub fn read_with_layout(data: FontData<'a>, layout: RecordListLayout) -> Result<Self, ReadError> {
        let count: u16 = data.read_at(layout.count_offset)?;
        let len = (count as usize)
            .checked_mul(T::RECORD_SIZE)
            .ok_or(ReadError::OutOfBounds)?;
        let end = layout
            .values_offset
            .checked_add(len)
            .ok_or(ReadError::OutOfBounds)?;
        data.check_in_bounds(end)?;
        Ok(RecordList {
            data,
            values_offset: layout.values_offset,
            count,
            _marker: PhantomData,
        })
    }

    /// The number of records in the list.
    pub fn count(&self) -> u16 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The record at `idx`, or an error if `idx` is out of range.
    pub fn get(&self, idx: usize) -> Result<T, ReadError> {
        if idx >= self.count as usize {
            return Err(ReadError::OutOfBounds);
        }
        T::read_at(self.data, self.values_offset + idx * T::RECORD_SIZE)
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<T, ReadError>> + 'a {
        let this = *self;
        (0..this.count as usize).map(move |i| this.get(i))
    }
}

impl<T> std::fmt::Debug for RecordList<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordList")
            .field("count", &self.count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_list() {
        let bytes: &[u8] = &[0, 3, 0, 5, 0, 6, 0, 7];
        let list: RecordList<u16> = RecordList::read(FontData::new(bytes)).unwrap();
        assert_eq!(list.count(), 3);
        assert_eq!(list.get(0), Ok(5));
        assert_eq!(list.get(2), Ok(7));
        assert_eq!(list.get(3), Err(ReadError::OutOfBounds));
    }

    #[test]
    fn count_too_large_for_data() {
        let bytes: &[u8] = &[0, 9, 0, 5];
        let result: Result<RecordList<u16>, _> = RecordList::read(FontData::new(bytes));
        assert_eq!(result.err(), Some(ReadError::OutOfBounds));
    }

    #[test]
    fn iterator_outlives_the_list() {
        let bytes: &[u8] = &[0, 2, 0, 1, 0, 2];
        let iter = {
            let list: RecordList<u16> = RecordList::read(FontData::new(bytes)).unwrap();
            list.iter()
        };
        let values: Vec<_> = iter.collect::<Result<_, _>>().unwrap();
        assert_eq!(values, [1, 2]);
    }

    #[test]
    fn interleaved_layout() {
        // count at 0, a reserved field, then values at 4
        let bytes: &[u8] = &[0, 2, 0xde, 0xad, 0, 1, 0, 2];
        let layout = RecordListLayout {
            count_offset: 0,
            values_offset: 4,
        };
        let list: RecordList<u16> =
            RecordList::read_with_layout(FontData::new(bytes), layout).unwrap();
        let values: Vec<_> = list.iter().collect::<Result<_, _>>().unwrap();
        assert_eq!(values, [1, 2]);
    }
}
