//! The [cmap](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap) table

use sfnt_types::{GlyphId, Offset, Offset32, Tag};

use crate::records::{Record, RecordList, RecordListLayout};
use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The character-to-glyph-index mapping table.
#[derive(Clone)]
pub struct Cmap<'a> {
    data: FontData<'a>,
    records: RecordList<'a, EncodingRecord>,
}

/// A platform/encoding pair and the subtable it points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodingRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub subtable_offset: Offset32,
}

impl<'a> Record<'a> for EncodingRecord {
    const RECORD_SIZE: usize = 8;

    fn read_at(data: FontData<'a>, pos: usize) -> Result<Self, ReadError> {
        Ok(EncodingRecord {
            platform_id: data.read_at(pos)?,
            encoding_id: data.read_at(pos + 2)?,
            subtable_offset: data.read_at(pos + 4)?,
        })
    }
}

impl EncodingRecord {
    /// True for the unicode-capable platform/encoding pairs we consult.
    fn is_unicode(&self) -> bool {
        self.platform_id == 0
            || (self.platform_id == 3 && matches!(self.encoding_id, 1 | 10))
    }
}

impl TopLevelTable for Cmap<'_> {
    const TAG: Tag = Tag::new(b"cmap");
}

impl<'a> FontRead<'a> for Cmap<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        // version at 0, num_tables at 2, records at 4
        let records = RecordList::read_with_layout(
            data,
            RecordListLayout {
                count_offset: 2,
                values_offset: 4,
            },
        )?;
        Ok(Cmap { data, records })
    }
}

impl<'a> Cmap<'a> {
    pub fn encoding_records(&self) -> &RecordList<'a, EncodingRecord> {
        &self.records
    }

    /// The subtable a record points at.
    pub fn subtable(&self, record: EncodingRecord) -> Result<CmapSubtable<'a>, ReadError> {
        let data = self
            .data
            .split_off(record.subtable_offset.to_usize())
            .ok_or(ReadError::OutOfBounds)?;
        CmapSubtable::read(data)
    }

    /// The first unicode-capable subtable, if any.
    pub fn unicode_subtable(&self) -> Result<CmapSubtable<'a>, ReadError> {
        for record in self.records.iter() {
            let record = record?;
            if record.is_unicode() {
                return self.subtable(record);
            }
        }
        Err(ReadError::MalformedData("no unicode cmap subtable"))
    }

    /// Map `codepoint` through the subtables in record order.
    pub fn map_codepoint(&self, codepoint: u32) -> Result<GlyphId, ReadError> {
        for record in self.records.iter() {
            let gid = self.subtable(record?)?.glyph_id(codepoint)?;
            if gid != GlyphId::NOTDEF {
                return Ok(gid);
            }
        }
        Ok(GlyphId::NOTDEF)
    }
}

/// A parsed cmap subtable.
///
/// Only the segment-mapping format (4) and the segmented-coverage format
/// (12) are supported; other formats fail with `InvalidFormat`.
#[derive(Clone)]
pub enum CmapSubtable<'a> {
    Format4(Cmap4<'a>),
    Format12(Cmap12<'a>),
}

impl<'a> FontRead<'a> for CmapSubtable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            4 => Cmap4::read(data).map(CmapSubtable::Format4),
            12 => Cmap12::read(data).map(CmapSubtable::Format12),
            other => Err(ReadError::InvalidFormat(other as i64)),
        }
    }
}

impl<'a> CmapSubtable<'a> {
    /// The glyph mapped to `codepoint`, or NOTDEF when unmapped.
    pub fn glyph_id(&self, codepoint: u32) -> Result<GlyphId, ReadError> {
        match self {
            CmapSubtable::Format4(table) => table.glyph_id(codepoint),
            CmapSubtable::Format12(table) => table.glyph_id(codepoint),
        }
    }

    /// Every (codepoint, glyph) pair in the subtable, ascending by codepoint.
    pub fn mappings(&self) -> Vec<(u32, GlyphId)> {
        match self {
            CmapSubtable::Format4(table) => table.mappings(),
            CmapSubtable::Format12(table) => table.mappings(),
        }
    }
}

/// A format 4 (segment mapping to delta values) subtable.
#[derive(Clone)]
pub struct Cmap4<'a> {
    data: FontData<'a>,
    seg_count: usize,
}

const CMAP4_END_CODES: usize = 14;

impl<'a> FontRead<'a> for Cmap4<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let seg_count_x2: u16 = data.read_at(6)?;
        if seg_count_x2 % 2 != 0 || seg_count_x2 == 0 {
            return Err(ReadError::MalformedData("invalid cmap4 segment count"));
        }
        let seg_count = seg_count_x2 as usize / 2;
        // end codes, reserved pad, start codes, deltas, range offsets
        data.check_in_bounds(CMAP4_END_CODES + 2 + seg_count * 8)?;
        Ok(Cmap4 { data, seg_count })
    }
}

impl<'a> Cmap4<'a> {
    fn end_code(&self, seg: usize) -> Result<u16, ReadError> {
        self.data.read_at(CMAP4_END_CODES + seg * 2)
    }

    fn start_code(&self, seg: usize) -> Result<u16, ReadError> {
        self.data
            .read_at(CMAP4_END_CODES + self.seg_count * 2 + 2 + seg * 2)
    }

    fn id_delta(&self, seg: usize) -> Result<i16, ReadError> {
        self.data
            .read_at(CMAP4_END_CODES + self.seg_count * 4 + 2 + seg * 2)
    }

    fn id_range_offset_pos(&self, seg: usize) -> usize {
        CMAP4_END_CODES + self.seg_count * 6 + 2 + seg * 2
    }

    fn lookup(&self, seg: usize, codepoint: u16) -> Result<GlyphId, ReadError> {
        let range_offset_pos = self.id_range_offset_pos(seg);
        let id_range_offset: u16 = self.data.read_at(range_offset_pos)?;
        if id_range_offset == 0 {
            let delta = self.id_delta(seg)?;
            return Ok(GlyphId::new(codepoint.wrapping_add(delta as u16)));
        }
        // the range offset is relative to its own position in the file
        let start = self.start_code(seg)?;
        let pos = range_offset_pos
            + id_range_offset as usize
            + (codepoint - start) as usize * 2;
        let gid: u16 = self.data.read_at(pos)?;
        if gid == 0 {
            return Ok(GlyphId::NOTDEF);
        }
        let delta = self.id_delta(seg)?;
        Ok(GlyphId::new(gid.wrapping_add(delta as u16)))
    }

    pub fn glyph_id(&self, codepoint: u32) -> Result<GlyphId, ReadError> {
        let Ok(codepoint) = u16::try_from(codepoint) else {
            return Ok(GlyphId::NOTDEF);
        };
        let mut lo = 0;
        let mut hi = self.seg_count;
        while lo < hi {
            let mid = (lo + hi) / 2;
            if self.end_code(mid)? < codepoint {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        if lo == self.seg_count || self.start_code(lo)? > codepoint {
            return Ok(GlyphId::NOTDEF);
        }
        self.lookup(lo, codepoint)
    }

    pub fn mappings(&self) -> Vec<(u32, GlyphId)> {
        let mut out = Vec::new();
        for seg in 0..self.seg_count {
            let (Ok(start), Ok(end)) = (self.start_code(seg), self.end_code(seg)) else {
                continue;
            };
            if start == 0xFFFF {
                continue;
            }
            for cp in start..=end {
                if let Ok(gid) = self.lookup(seg, cp) {
                    if gid != GlyphId::NOTDEF {
                        out.push((cp as u32, gid));
                    }
                }
            }
        }
        out
    }
}

/// A format 12 (segmented coverage) subtable.
#[derive(Clone)]
pub struct Cmap12<'a> {
    data: FontData<'a>,
    num_groups: usize,
}

const CMAP12_GROUPS: usize = 16;
const GROUP_SIZE: usize = 12;

impl<'a> FontRead<'a> for Cmap12<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let num_groups: u32 = data.read_at(12)?;
        let num_groups = num_groups as usize;
        let len = num_groups
            .checked_mul(GROUP_SIZE)
            .and_then(|n| n.checked_add(CMAP12_GROUPS))
            .ok_or(ReadError::OutOfBounds)?;
        data.check_in_bounds(len)?;
        Ok(Cmap12 { data, num_groups })
    }
}

impl<'a> Cmap12<'a> {
    fn group(&self, i: usize) -> Result<(u32, u32, u32), ReadError> {
        let pos = CMAP12_GROUPS + i * GROUP_SIZE;
        Ok((
            self.data.read_at(pos)?,
            self.data.read_at(pos + 4)?,
            self.data.read_at(pos + 8)?,
        ))
    }

    pub fn glyph_id(&self, codepoint: u32) -> Result<GlyphId, ReadError> {
        let mut lo = 0;
        let mut hi = self.num_groups;
        while lo < hi {
            let mid = (lo + hi) / 2;
            let (start, end, start_gid) = self.group(mid)?;
            if end < codepoint {
                lo = mid + 1;
            } else if start > codepoint {
                hi = mid;
            } else {
                let gid = start_gid + (codepoint - start);
                return Ok(u16::try_from(gid)
                    .map(GlyphId::new)
                    .unwrap_or(GlyphId::NOTDEF));
            }
        }
        Ok(GlyphId::NOTDEF)
    }

    pub fn mappings(&self) -> Vec<(u32, GlyphId)> {
        let mut out = Vec::new();
        for i in 0..self.num_groups {
            let Ok((start, end, start_gid)) = self.group(i) else {
                continue;
            };
            // a malformed group could span most of the u32 range
            let end = end.min(char::MAX as u32);
            for cp in start..=end {
                let gid = start_gid + (cp - start);
                if let Ok(gid) = u16::try_from(gid) {
                    if gid != 0 {
                        out.push((cp, GlyphId::new(gid)));
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        sfnt_test_data::test_fonts::cmap_table()
    }

    #[test]
    fn lookup_mapped_codepoints() {
        let data = sample();
        let cmap = Cmap::read(FontData::new(&data)).unwrap();
        assert_eq!(cmap.map_codepoint(0x41), Ok(GlyphId::new(1)));
        assert_eq!(cmap.map_codepoint(0x2c), Ok(GlyphId::new(2)));
        assert_eq!(cmap.map_codepoint(0x44), Ok(GlyphId::new(7)));
    }

    #[test]
    fn unmapped_is_notdef() {
        let data = sample();
        let cmap = Cmap::read(FontData::new(&data)).unwrap();
        assert_eq!(cmap.map_codepoint(0x20), Ok(GlyphId::NOTDEF));
        assert_eq!(cmap.map_codepoint(0x1_F600), Ok(GlyphId::NOTDEF));
    }

    #[test]
    fn mappings_round_trip() {
        let data = sample();
        let cmap = Cmap::read(FontData::new(&data)).unwrap();
        let subtable = cmap.unicode_subtable().unwrap();
        let mappings = subtable.mappings();
        assert!(mappings
            .iter()
            .any(|&(cp, gid)| cp == 0x42 && gid == GlyphId::new(6)));
        // ascending by codepoint
        assert!(mappings.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn format12_group_span_clamped_to_unicode_range() {
        // a single group claiming to run to u32::MAX
        let bytes = sfnt_test_data::BeBuffer::new()
            .push(12u16) // format
            .push(0u16) // reserved
            .push(28u32) // length
            .push(0u32) // language
            .push(1u32) // group count
            .push(0x10_FFFEu32) // start codepoint
            .push(u32::MAX) // end codepoint
            .push(1u32) // start glyph id
            .into_vec();
        let subtable = CmapSubtable::read(FontData::new(&bytes)).unwrap();
        let mappings = subtable.mappings();
        assert_eq!(
            mappings,
            [
                (0x10_FFFE, GlyphId::new(1)),
                (0x10_FFFF, GlyphId::new(2)),
            ]
        );
    }

    #[test]
    fn unsupported_format_rejected() {
        // format 6 subtable
        let bytes = [0x00, 0x06, 0x00, 0x0a, 0x00, 0x00];
        assert!(matches!(
            CmapSubtable::read(FontData::new(&bytes)),
            Err(ReadError::InvalidFormat(6))
        ));
    }
}
