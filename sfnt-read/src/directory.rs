//! The sfnt table directory.

use sfnt_types::{Tag, TRUE_SFNT_VERSION, TT_SFNT_VERSION};

use crate::font_data::FontData;
use crate::read::{FontRead, ReadError};
use crate::records::{Record, RecordList, RecordListLayout};

/// The tag of the `head` table, needed here for checksum handling.
const HEAD: Tag = Tag::new(b"head");

/// Offset of `checksum_adjustment` within the `head` table.
const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;

/// The table directory at the start of a font file.
#[derive(Clone)]
pub struct TableDirectory<'a> {
    sfnt_version: u32,
    records: RecordList<'a, TableRecord>,
    /// Whether records are sorted by tag, enabling binary search.
    ///
    /// Fonts are required to sort the directory, but some in the wild don't.
    sorted: bool,
}

/// A single entry in the table directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableRecord {
    pub tag: Tag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

impl<'a> Record<'a> for TableRecord {
    const RECORD_SIZE: usize = 16;

    fn read_at(data: FontData<'a>, pos: usize) -> Result<Self, ReadError> {
        Ok(TableRecord {
            tag: data.read_at(pos)?,
            checksum: data.read_at(pos + 4)?,
            offset: data.read_at(pos + 8)?,
            length: data.read_at(pos + 12)?,
        })
    }
}

impl<'a> FontRead<'a> for TableDirectory<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let sfnt_version: u32 = data.read_at(0)?;
        if ![TT_SFNT_VERSION, TRUE_SFNT_VERSION].contains(&sfnt_version) {
            return Err(ReadError::InvalidSfnt(sfnt_version));
        }
        // num_tables at 4; search_range, entry_selector and range_shift are
        // derivable and ignored on the read side.
        let records: RecordList<TableRecord> = RecordList::read_with_layout(
            data,
            RecordListLayout {
                count_offset: 4,
                values_offset: 12,
            },
        )?;
        let mut sorted = true;
        let mut last_tag = Tag::new(&[0u8; 4]);
        for record in records.iter() {
            let tag = record?.tag;
            if tag <= last_tag {
                sorted = false;
            }
            last_tag = tag;
        }
        Ok(TableDirectory {
            sfnt_version,
            records,
            sorted,
        })
    }
}

impl<'a> TableDirectory<'a> {
    pub fn sfnt_version(&self) -> u32 {
        self.sfnt_version
    }

    pub fn num_tables(&self) -> u16 {
        self.records.count()
    }

    pub fn table_records(&self) -> &RecordList<'a, TableRecord> {
        &self.records
    }

    /// Find the record for `tag`, using binary search when the directory
    /// is sorted.
    pub fn find_record(&self, tag: Tag) -> Option<TableRecord> {
        if self.sorted {
            let mut lo = 0usize;
            let mut hi = self.records.count() as usize;
            while lo < hi {
                let mid = (lo + hi) / 2;
                let record = self.records.get(mid).ok()?;
                match record.tag.cmp(&tag) {
                    std::cmp::Ordering::Less => lo = mid + 1,
                    std::cmp::Ordering::Greater => hi = mid,
                    std::cmp::Ordering::Equal => return Some(record),
                }
            }
            None
        } else {
            self.records
                .iter()
                .filter_map(|rec| rec.ok())
                .find(|rec| rec.tag == tag)
        }
    }
}

/// Compute the standard sfnt checksum of a byte slice.
///
/// The data is interpreted as a sequence of big-endian `u32` words, with the
/// tail zero-padded to a word boundary, summed with wrapping arithmetic.
pub fn compute_checksum(bytes: &[u8]) -> u32 {
    let mut sum = 0u32;
    let mut chunks = bytes.chunks_exact(4);
    for chunk in &mut chunks {
        let word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        sum = sum.wrapping_add(word);
    }
    let remainder = chunks.remainder();
    if !remainder.is_empty() {
        let mut tail = [0u8; 4];
        tail[..remainder.len()].copy_from_slice(remainder);
        sum = sum.wrapping_add(u32::from_be_bytes(tail));
    }
    sum
}

/// Verify the directory checksum of every table in `font_data`.
///
/// The `head` table is summed with its `checksum_adjustment` field treated
/// as zero, per the format definition.
pub fn verify_checksums(
    font_data: FontData<'_>,
    directory: &TableDirectory<'_>,
) -> Result<(), ReadError> {
    for record in directory.table_records().iter() {
        let record = record?;
        let start = record.offset as usize;
        let end = start
            .checked_add(record.length as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let table = font_data.slice(start..end).ok_or(ReadError::OutOfBounds)?;
        let sum = if record.tag == HEAD {
            checksum_ignoring_adjustment(table.as_ref())
        } else {
            compute_checksum(table.as_ref())
        };
        if sum != record.checksum {
            return Err(ReadError::ChecksumMismatch(record.tag));
        }
    }
    Ok(())
}

fn checksum_ignoring_adjustment(bytes: &[u8]) -> u32 {
    let sum = compute_checksum(bytes);
    match bytes
        .get(CHECKSUM_ADJUSTMENT_OFFSET..CHECKSUM_ADJUSTMENT_OFFSET + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    {
        Some(adjustment) => sum.wrapping_sub(adjustment),
        None => sum,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_pads_tail_with_zeros() {
        assert_eq!(compute_checksum(&[0, 0, 0, 1]), 1);
        assert_eq!(compute_checksum(&[0, 0, 0, 1, 0x80]), 0x8000_0001);
        assert_eq!(compute_checksum(&[0xff, 0xff, 0xff, 0xff, 0, 0, 0, 1]), 0);
    }

    #[test]
    fn rejects_unknown_magic() {
        let bytes = 0xDEAD_BEEFu32.to_be_bytes();
        let result = TableDirectory::read(FontData::new(&bytes));
        assert_eq!(result.err(), Some(ReadError::InvalidSfnt(0xDEAD_BEEF)));
    }
}
