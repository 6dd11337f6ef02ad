//! Building the cmap table.

use sfnt_read::TopLevelTable;
use sfnt_types::{GlyphId, Tag};

use crate::records::RecordList;
use crate::util::SearchRange;
use crate::validate::{Validate, ValidationCtx};
use crate::write::{FontWrite, TableWriter};

const WINDOWS_PLATFORM: u16 = 3;
const UNICODE_BMP: u16 = 1;
const UNICODE_FULL: u16 = 10;

/// A cmap table regenerated from a flat list of mappings.
///
/// The table always carries a 3/1 format 4 subtable for the BMP entries
/// and adds a 3/10 format 12 subtable when any mapping lies above the BMP.
#[derive(Clone, Debug, Default)]
pub struct Cmap {
    mappings: Vec<(u32, GlyphId)>,
}

impl TopLevelTable for Cmap {
    const TAG: Tag = Tag::new(b"cmap");
}

impl Cmap {
    /// Build from (codepoint, glyph) pairs; the input is sorted and
    /// deduplicated by codepoint, first entry winning.
    pub fn from_mappings(mut mappings: Vec<(u32, GlyphId)>) -> Self {
        mappings.sort_by_key(|(cp, _)| *cp);
        mappings.dedup_by_key(|(cp, _)| *cp);
        Cmap { mappings }
    }

    pub fn mappings(&self) -> &[(u32, GlyphId)] {
        &self.mappings
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    fn bmp_mappings(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.mappings
            .iter()
            .filter(|(cp, _)| *cp < 0xFFFF)
            .map(|(cp, gid)| (*cp as u16, gid.to_u16()))
    }

    fn has_supra_bmp(&self) -> bool {
        self.mappings.iter().any(|(cp, _)| *cp > 0xFFFF)
    }

    /// Split the BMP mappings into delta-encodable segments: runs where
    /// both the codepoints and the glyph ids advance by one.
    fn format4_segments(&self) -> Vec<Segment> {
        let mut segments: Vec<Segment> = Vec::new();
        for (cp, gid) in self.bmp_mappings() {
            if let Some(last) = segments.last_mut() {
                if cp == last.end + 1 && gid == last.start_gid + (cp - last.start) {
                    last.end = cp;
                    continue;
                }
            }
            segments.push(Segment {
                start: cp,
                end: cp,
                start_gid: gid,
            });
        }
        segments
    }

    /// Runs of consecutive codepoints and glyph ids, for format 12.
    fn format12_groups(&self) -> Vec<(u32, u32, u32)> {
        let mut groups: Vec<(u32, u32, u32)> = Vec::new();
        for (cp, gid) in &self.mappings {
            let gid = gid.to_u16() as u32;
            if let Some((start, end, start_gid)) = groups.last_mut() {
                if *cp == *end + 1 && gid == *start_gid + (*cp - *start) {
                    *end = *cp;
                    continue;
                }
            }
            groups.push((*cp, *cp, gid));
        }
        groups
    }

    fn write_format4(&self, writer: &mut TableWriter) {
        let mut segments = self.format4_segments();
        // the required final segment
        segments.push(Segment {
            start: 0xFFFF,
            end: 0xFFFF,
            start_gid: 0,
        });
        let seg_count = segments.len();
        let assists = SearchRange::compute(seg_count, 2);
        let length = 16 + seg_count * 8;
        writer.write(4u16);
        writer.write(length as u16);
        writer.write(0u16); // language
        writer.write((seg_count * 2) as u16);
        writer.write(assists.search_range);
        writer.write(assists.entry_selector);
        writer.write(assists.range_shift);
        for segment in &segments {
            writer.write(segment.end);
        }
        writer.write(0u16); // reserved pad
        for segment in &segments {
            writer.write(segment.start);
        }
        for segment in &segments {
            // the final segment maps 0xFFFF to notdef through wraparound
            let delta = if segment.start == 0xFFFF && segment.start_gid == 0 {
                1u16
            } else {
                segment.start_gid.wrapping_sub(segment.start)
            };
            writer.write(delta);
        }
        for _ in &segments {
            writer.write(0u16); // id range offsets: all segments are deltas
        }
    }

    fn write_format12(&self, writer: &mut TableWriter) {
        let groups = self.format12_groups();
        writer.write(12u16);
        writer.write(0u16); // reserved
        writer.write((16 + groups.len() * 12) as u32); // length
        writer.write(0u32); // language
        writer.write(groups.len() as u32);
        for (start, end, start_gid) in groups {
            writer.write(start);
            writer.write(end);
            writer.write(start_gid);
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Segment {
    start: u16,
    end: u16,
    start_gid: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct EncodingRecord {
    platform_id: u16,
    encoding_id: u16,
    subtable_offset: u32,
}

impl FontWrite for EncodingRecord {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write(self.platform_id);
        writer.write(self.encoding_id);
        writer.write(self.subtable_offset);
    }
}

impl FontWrite for Cmap {
    fn write_into(&self, writer: &mut TableWriter) {
        let num_tables: u16 = if self.has_supra_bmp() { 2 } else { 1 };
        let record_end = 4 + num_tables as u32 * 8;
        // measure the format 4 subtable to place a format 12 after it
        let format4_len = {
            let mut trial = TableWriter::default();
            self.write_format4(&mut trial);
            trial.len() as u32
        };
        let mut records = RecordList::new();
        records.push(EncodingRecord {
            platform_id: WINDOWS_PLATFORM,
            encoding_id: UNICODE_BMP,
            subtable_offset: record_end,
        });
        if num_tables == 2 {
            records.push(EncodingRecord {
                platform_id: WINDOWS_PLATFORM,
                encoding_id: UNICODE_FULL,
                subtable_offset: record_end + format4_len,
            });
        }
        writer.write(0u16); // version
        records.write_into(writer);
        self.write_format4(writer);
        if num_tables == 2 {
            self.write_format12(writer);
        }
    }
}

impl Validate for Cmap {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("cmap", |ctx| {
            ctx.in_field("mappings", |ctx| {
                // length is a u16; one extra segment for the 0xFFFF sentinel
                if 16 + (self.format4_segments().len() + 1) * 8 > u16::MAX as usize {
                    ctx.report("format 4 subtable too long");
                }
                if self.mappings.iter().any(|(cp, _)| *cp > 0x10_FFFF) {
                    ctx.report("codepoint outside unicode range");
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use sfnt_read::tables::cmap::Cmap as CmapRef;
    use sfnt_read::{FontData, FontRead};

    use super::*;
    use crate::dump_table;

    fn build_and_parse(mappings: Vec<(u32, GlyphId)>) -> Vec<u8> {
        dump_table(&Cmap::from_mappings(mappings)).unwrap()
    }

    #[test]
    fn bmp_round_trip() {
        let mappings = vec![
            (0x41, GlyphId::new(1)),
            (0x42, GlyphId::new(2)),
            (0x43, GlyphId::new(9)),
            (0x31, GlyphId::new(4)),
        ];
        let bytes = build_and_parse(mappings.clone());
        let cmap = CmapRef::read(FontData::new(&bytes)).unwrap();
        for (cp, gid) in mappings {
            assert_eq!(cmap.map_codepoint(cp), Ok(gid), "codepoint {cp:#x}");
        }
        assert_eq!(cmap.map_codepoint(0x44), Ok(GlyphId::NOTDEF));
    }

    #[test]
    fn consecutive_runs_share_a_segment() {
        // codepoints and gids both consecutive: one segment plus the
        // final sentinel
        let bytes = build_and_parse(vec![
            (0x41, GlyphId::new(10)),
            (0x42, GlyphId::new(11)),
            (0x43, GlyphId::new(12)),
        ]);
        let seg_count_x2 = u16::from_be_bytes([bytes[12 + 6], bytes[12 + 7]]);
        assert_eq!(seg_count_x2, 4);
    }

    #[test]
    fn supra_bmp_adds_format12() {
        let mappings = vec![(0x41, GlyphId::new(1)), (0x1_F600, GlyphId::new(2))];
        let bytes = build_and_parse(mappings);
        let cmap = CmapRef::read(FontData::new(&bytes)).unwrap();
        assert_eq!(cmap.encoding_records().count(), 2);
        assert_eq!(cmap.map_codepoint(0x1_F600), Ok(GlyphId::new(2)));
        assert_eq!(cmap.map_codepoint(0x41), Ok(GlyphId::new(1)));
    }
}
