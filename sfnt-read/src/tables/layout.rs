//! Common layout table components.

use sfnt_types::{GlyphId, Offset, Offset16};

use crate::records::{Record, RecordList};
use crate::{FontData, FontRead, ReadError};

/// A [coverage table](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#lookup-table)
///
/// Maps covered glyphs to their coverage index, the position a lookup
/// subtable uses to find the glyph's substitution data.
#[derive(Clone)]
pub enum CoverageTable<'a> {
    /// A sorted list of covered glyph ids.
    Format1(RecordList<'a, GlyphId>),
    /// Ranges of covered glyph ids.
    Format2(RecordList<'a, RangeRecord>),
}

/// A contiguous range of covered glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeRecord {
    pub start_glyph_id: GlyphId,
    pub end_glyph_id: GlyphId,
    /// Coverage index of `start_glyph_id`.
    pub start_coverage_index: u16,
}

impl<'a> Record<'a> for RangeRecord {
    const RECORD_SIZE: usize = 6;

    fn read_at(data: FontData<'a>, pos: usize) -> Result<Self, ReadError> {
        Ok(RangeRecord {
            start_glyph_id: data.read_at(pos)?,
            end_glyph_id: data.read_at(pos + 2)?,
            start_coverage_index: data.read_at(pos + 4)?,
        })
    }
}

impl<'a> FontRead<'a> for CoverageTable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        // both formats store a count at 2 and records at 4
        let list_data = data.split_off(2).ok_or(ReadError::OutOfBounds)?;
        match format {
            1 => RecordList::read(list_data).map(CoverageTable::Format1),
            2 => RecordList::read(list_data).map(CoverageTable::Format2),
            other => Err(ReadError::InvalidFormat(other as i64)),
        }
    }
}

impl<'a> CoverageTable<'a> {
    /// The coverage index of `gid`, or `None` when uncovered.
    pub fn get(&self, gid: GlyphId) -> Option<u16> {
        match self {
            CoverageTable::Format1(glyphs) => {
                let mut lo = 0usize;
                let mut hi = glyphs.count() as usize;
                while lo < hi {
                    let mid = (lo + hi) / 2;
                    match glyphs.get(mid).ok()?.cmp(&gid) {
                        std::cmp::Ordering::Less => lo = mid + 1,
                        std::cmp::Ordering::Greater => hi = mid,
                        std::cmp::Ordering::Equal => return Some(mid as u16),
                    }
                }
                None
            }
            CoverageTable::Format2(ranges) => {
                for range in ranges.iter() {
                    let range = range.ok()?;
                    if gid >= range.start_glyph_id && gid <= range.end_glyph_id {
                        let delta = gid.to_u16() - range.start_glyph_id.to_u16();
                        return Some(range.start_coverage_index + delta);
                    }
                }
                None
            }
        }
    }

    /// The covered glyphs, in coverage order.
    pub fn glyphs(&self) -> Vec<GlyphId> {
        match self {
            CoverageTable::Format1(glyphs) => glyphs.iter().filter_map(|g| g.ok()).collect(),
            CoverageTable::Format2(ranges) => {
                let mut out = Vec::new();
                for range in ranges.iter().filter_map(|r| r.ok()) {
                    for gid in range.start_glyph_id.to_u16()..=range.end_glyph_id.to_u16() {
                        out.push(GlyphId::new(gid));
                    }
                }
                out
            }
        }
    }
}

/// Resolve a 16-bit offset field at `pos` into the subtable it points at.
///
/// Offsets in layout tables are relative to the start of the enclosing
/// table's data.
pub(crate) fn resolve_offset<'a>(
    data: FontData<'a>,
    pos: usize,
) -> Result<FontData<'a>, ReadError> {
    let offset: Offset16 = data.read_at(pos)?;
    let offset = offset.non_null().ok_or(ReadError::NullOffset)?;
    data.split_off(offset).ok_or(ReadError::OutOfBounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format1_binary_search() {
        // format 1, 3 glyphs: 2, 5, 9
        let bytes = [0x00, 0x01, 0x00, 0x03, 0x00, 0x02, 0x00, 0x05, 0x00, 0x09];
        let coverage = CoverageTable::read(FontData::new(&bytes)).unwrap();
        assert_eq!(coverage.get(GlyphId::new(2)), Some(0));
        assert_eq!(coverage.get(GlyphId::new(9)), Some(2));
        assert_eq!(coverage.get(GlyphId::new(4)), None);
    }

    #[test]
    fn format2_ranges() {
        // format 2, one range: glyphs 10..=12 at coverage index 5
        let bytes = [0x00, 0x02, 0x00, 0x01, 0x00, 0x0a, 0x00, 0x0c, 0x00, 0x05];
        let coverage = CoverageTable::read(FontData::new(&bytes)).unwrap();
        assert_eq!(coverage.get(GlyphId::new(11)), Some(6));
        assert_eq!(coverage.get(GlyphId::new(13)), None);
        assert_eq!(
            coverage.glyphs(),
            [GlyphId::new(10), GlyphId::new(11), GlyphId::new(12)]
        );
    }

    #[test]
    fn unknown_format_rejected() {
        let bytes = [0x00, 0x03, 0x00, 0x00];
        assert!(matches!(
            CoverageTable::read(FontData::new(&bytes)),
            Err(ReadError::InvalidFormat(3))
        ));
    }
}
