//! Owned, editable lists of fixed-size records.

use crate::error::BuildError;
use crate::validate::{Validate, ValidationCtx};
use crate::write::{FontWrite, TableWriter};

/// An owned list of records, serialized as a `u16` count followed by the
/// records in order.
///
/// The count field is always recomputed from the live length at write
/// time; it cannot drift from the contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordList<T> {
    items: Vec<T>,
}

impl<T> RecordList<T> {
    pub fn new() -> Self {
        RecordList { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Insert `item` at `index`, shifting later records up.
    pub fn insert(&mut self, index: usize, item: T) -> Result<(), BuildError> {
        if index > self.items.len() {
            return Err(BuildError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, item);
        Ok(())
    }

    /// Remove and return the record at `index`, shifting later records down.
    pub fn remove(&mut self, index: usize) -> Result<T, BuildError> {
        if index >= self.items.len() {
            return Err(BuildError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Replace the record at `index`.
    pub fn set(&mut self, index: usize, item: T) -> Result<(), BuildError> {
        match self.items.get_mut(index) {
            Some(slot) => {
                *slot = item;
                Ok(())
            }
            None => Err(BuildError::IndexOutOfRange {
                index,
                len: self.items.len(),
            }),
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> From<Vec<T>> for RecordList<T> {
    fn from(items: Vec<T>) -> Self {
        RecordList { items }
    }
}

impl<T> FromIterator<T> for RecordList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        RecordList {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T: FontWrite> FontWrite for RecordList<T> {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write(self.items.len() as u16);
        self.items.write_into(writer);
    }
}

impl<T> Validate for RecordList<T> {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.check_array_len(self.items.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_tracks_edits() {
        let mut list: RecordList<u16> = vec![1, 2, 3].into();
        list.insert(1, 9).unwrap();
        assert_eq!(list.remove(3).unwrap(), 3);
        list.set(0, 7).unwrap();
        let mut writer = TableWriter::default();
        list.write_into(&mut writer);
        assert_eq!(writer.into_data(), [0, 3, 0, 7, 0, 9, 0, 2]);
    }

    #[test]
    fn edits_out_of_range() {
        let mut list: RecordList<u16> = vec![1].into();
        assert!(matches!(
            list.insert(2, 5),
            Err(BuildError::IndexOutOfRange { index: 2, len: 1 })
        ));
        assert!(list.remove(1).is_err());
        assert!(list.set(1, 5).is_err());
        // inserting at the current length appends
        list.insert(1, 5).unwrap();
        assert_eq!(list.as_slice(), [1, 5]);
    }
}
