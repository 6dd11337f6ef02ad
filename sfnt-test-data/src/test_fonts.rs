//! A small synthetic TrueType font, assembled by hand.
//!
//! The font has eight glyphs:
//!
//! | gid | description            |
//! |-----|------------------------|
//! | 0   | simple (.notdef)       |
//! | 1   | simple                 |
//! | 2   | simple                 |
//! | 3   | empty                  |
//! | 4   | simple                 |
//! | 5   | composite of gid 1     |
//! | 6   | simple                 |
//! | 7   | composite of gids 6, 3 |
//!
//! and a format 4 cmap plus a GSUB table with one single-substitution and
//! one ligature lookup.

use sfnt_types::Tag;

use crate::BeBuffer;

pub const NUM_GLYPHS: u16 = 8;
pub const NUMBER_OF_H_METRICS: u16 = 6;

/// Glyf offsets of the eight glyphs, plus the trailing end offset.
pub const GLYPH_OFFSETS: [u32; 9] = [0, 18, 36, 54, 54, 72, 88, 106, 128];

/// The (codepoint, glyph) pairs carried by the cmap table.
pub const CODEPOINT_MAP: [(u32, u16); 6] = [
    (0x2C, 2),
    (0x31, 4),
    (0x41, 1),
    (0x42, 6),
    (0x43, 5),
    (0x44, 7),
];

/// The (advance, lsb) pairs for the six long metrics in hmtx.
pub const LONG_METRICS: [(u16, i16); 6] = [(500, 50), (600, 60), (550, 55), (0, 0), (520, 52), (520, 40)];

/// A single-contour, single-point glyph, padded to even length (18 bytes).
pub fn simple_glyph_bytes() -> Vec<u8> {
    BeBuffer::new()
        .push(1i16) // number of contours
        .push(0i16) // x_min
        .push(0i16) // y_min
        .push(100i16) // x_max
        .push(100i16) // y_max
        .push(0u16) // end point of contour 0
        .push(0u16) // instruction length
        .push(0x07u8) // on-curve, x-short, y-short
        .push(10u8) // x coordinate
        .push(20u8) // y coordinate
        .push(0u8) // padding
        .into_vec()
}

/// A composite glyph referencing `components`, in order, with zero offsets.
pub fn composite_glyph_bytes(components: &[u16]) -> Vec<u8> {
    let mut buf = BeBuffer::new()
        .push(-1i16)
        .push(0i16)
        .push(0i16)
        .push(100i16)
        .push(100i16);
    for (i, gid) in components.iter().enumerate() {
        let more = if i + 1 < components.len() { 0x0020 } else { 0 };
        // args-are-xy-values, byte args
        buf = buf.push(0x0002u16 | more).push(*gid).push(0u8).push(0u8);
    }
    buf.into_vec()
}

pub fn glyf_table() -> Vec<u8> {
    let mut glyf = Vec::new();
    for gid in 0..NUM_GLYPHS {
        let data = match gid {
            3 => Vec::new(),
            5 => composite_glyph_bytes(&[1]),
            7 => composite_glyph_bytes(&[6, 3]),
            _ => simple_glyph_bytes(),
        };
        assert_eq!(glyf.len() as u32, GLYPH_OFFSETS[gid as usize]);
        glyf.extend(data);
    }
    assert_eq!(glyf.len() as u32, GLYPH_OFFSETS[NUM_GLYPHS as usize]);
    glyf
}

/// The loca table, short format.
pub fn loca_table() -> Vec<u8> {
    GLYPH_OFFSETS
        .iter()
        .fold(BeBuffer::new(), |buf, off| buf.push((off / 2) as u16))
        .into_vec()
}

/// A head table with a zero checksum adjustment and short loca format.
pub fn simple_head() -> Vec<u8> {
    BeBuffer::new()
        .push(1u16) // major version
        .push(0u16) // minor version
        .push(0x0001_0000i32) // font revision
        .push(0u32) // checksum adjustment, patched at assembly
        .push(0x5F0F_3CF5u32) // magic
        .push(0x0003u16) // flags
        .push(1000u16) // units per em
        .push(3_655_512_000i64) // created
        .push(3_655_512_000i64) // modified
        .push(0i16) // x_min
        .push(0i16) // y_min
        .push(1000i16) // x_max
        .push(1000i16) // y_max
        .push(0u16) // mac style
        .push(8u16) // lowest rec ppem
        .push(2i16) // font direction hint
        .push(0i16) // index to loc format: short
        .push(0i16) // glyph data format
        .into_vec()
}

pub fn maxp_table() -> Vec<u8> {
    BeBuffer::new()
        .push(0x0001_0000u32)
        .push(NUM_GLYPHS)
        .push(4u16) // max points
        .push(1u16) // max contours
        .push(4u16) // max composite points
        .push(1u16) // max composite contours
        .push(2u16) // max zones
        .push(0u16) // max twilight points
        .push(0u16) // max storage
        .push(0u16) // max function defs
        .push(0u16) // max instruction defs
        .push(0u16) // max stack elements
        .push(0u16) // max size of instructions
        .push(2u16) // max component elements
        .push(1u16) // max component depth
        .into_vec()
}

pub fn hhea_table() -> Vec<u8> {
    BeBuffer::new()
        .push(1u16)
        .push(0u16)
        .push(800i16) // ascender
        .push(-200i16) // descender
        .push(90i16) // line gap
        .push(600u16) // advance width max
        .push(0i16) // min lsb
        .push(0i16) // min rsb
        .push(600i16) // x max extent
        .push(1i16) // caret slope rise
        .push(0i16) // caret slope run
        .push(0i16) // caret offset
        .extend([0i16; 4]) // reserved
        .push(0i16) // metric data format
        .push(NUMBER_OF_H_METRICS)
        .into_vec()
}

pub fn hmtx_table() -> Vec<u8> {
    let mut buf = BeBuffer::new();
    for (advance, lsb) in LONG_METRICS {
        buf = buf.push(advance).push(lsb);
    }
    // bare side bearings for gids 6 and 7
    buf.push(30i16).push(20i16).into_vec()
}

/// A cmap with a single 3/1 format 4 subtable carrying [`CODEPOINT_MAP`].
///
/// The 0x41..=0x44 block is stored through the glyph-id array so the
/// range-offset path gets exercised; the other segments use deltas.
pub fn cmap_table() -> Vec<u8> {
    BeBuffer::new()
        .push(0u16) // version
        .push(1u16) // num tables
        .push(3u16) // platform: windows
        .push(1u16) // encoding: unicode bmp
        .push(12u32) // subtable offset
        // format 4 subtable
        .push(4u16)
        .push(56u16) // length
        .push(0u16) // language
        .push(8u16) // seg count x2
        .push(8u16) // search range
        .push(2u16) // entry selector
        .push(0u16) // range shift
        .extend([0x2Cu16, 0x31, 0x44, 0xFFFF]) // end codes
        .push(0u16) // reserved pad
        .extend([0x2Cu16, 0x31, 0x41, 0xFFFF]) // start codes
        .extend([2i16 - 0x2C, 4 - 0x31, 0, 1]) // id deltas
        .extend([0u16, 0, 4, 0]) // id range offsets
        .extend([1u16, 6, 5, 7]) // glyph id array
        .into_vec()
}

/// A GSUB with two lookups: a format 2 single substitution mapping
/// glyphs 1, 2 to 5, 6, and a ligature lookup forming glyph 7 from 1 + 2.
pub fn gsub_table() -> Vec<u8> {
    BeBuffer::new()
        .push(1u16) // major version
        .push(0u16) // minor version
        .push(10u16) // script list offset
        .push(12u16) // feature list offset
        .push(14u16) // lookup list offset
        .push(0u16) // script list: no scripts
        .push(0u16) // feature list: no features
        // lookup list
        .push(2u16) // lookup count
        .extend([6u16, 32]) // lookup offsets
        // lookup 0: single substitution
        .push(1u16) // lookup type
        .push(0u16) // lookup flag
        .push(1u16) // subtable count
        .push(8u16) // subtable offset
        .push(2u16) // format 2
        .push(10u16) // coverage offset
        .push(2u16) // glyph count
        .extend([5u16, 6]) // substitutes
        .push(1u16) // coverage format 1
        .push(2u16) // glyph count
        .extend([1u16, 2]) // covered glyphs
        // lookup 1: ligature substitution
        .push(4u16) // lookup type
        .push(0u16) // lookup flag
        .push(1u16) // subtable count
        .push(8u16) // subtable offset
        .push(1u16) // format 1
        .push(8u16) // coverage offset
        .push(1u16) // ligature set count
        .push(14u16) // ligature set offset
        .push(1u16) // coverage format 1
        .push(1u16) // glyph count
        .push(1u16) // covered glyph
        // ligature set
        .push(1u16) // ligature count
        .push(4u16) // ligature offset
        .push(7u16) // ligature glyph
        .push(2u16) // component count
        .push(2u16) // second component glyph
        .into_vec()
}

/// A GSUB with populated script and feature lists: DFLT and latn scripts,
/// liga and smcp features, and one single substitution mapping 2 to 6.
pub fn gsub_table_with_scripts() -> Vec<u8> {
    BeBuffer::new()
        .push(1u16) // major version
        .push(0u16) // minor version
        .push(10u16) // script list offset
        .push(48u16) // feature list offset
        .push(74u16) // lookup list offset
        // script list
        .push(2u16) // script count
        .push(Tag::new(b"DFLT"))
        .push(14u16)
        .push(Tag::new(b"latn"))
        .push(26u16)
        .push(4u16) // DFLT: default lang sys offset
        .push(0u16) // no other lang sys
        .extend([0u16, 0xFFFF, 1, 0]) // lang sys referencing feature 0
        .push(4u16) // latn: default lang sys offset
        .push(0u16)
        .extend([0u16, 0xFFFF, 1, 1]) // lang sys referencing feature 1
        // feature list
        .push(2u16) // feature count
        .push(Tag::new(b"liga"))
        .push(14u16)
        .push(Tag::new(b"smcp"))
        .push(20u16)
        .extend([0u16, 1, 0]) // liga: lookup 0
        .extend([0u16, 1, 0]) // smcp: lookup 0
        // lookup list
        .push(1u16) // lookup count
        .push(4u16) // lookup offset
        .extend([1u16, 0, 1, 8]) // lookup type, flag, subtable count, offset
        .extend([1u16, 6, 4]) // single subst format 1, coverage offset, delta
        .extend([1u16, 1, 2]) // coverage format 1, one glyph, glyph 2
        .into_vec()
}

fn checksum(bytes: &[u8]) -> u32 {
    let mut sum = 0u32;
    for chunk in bytes.chunks(4) {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum = sum.wrapping_add(u32::from_be_bytes(word));
    }
    sum
}

/// Assemble a font file from raw tables, computing the directory,
/// padding, checksums and the head checksum adjustment.
///
/// Tables may be passed in any order; the directory is sorted by tag.
pub fn build_font(tables: &[(Tag, Vec<u8>)]) -> Vec<u8> {
    let mut tables: Vec<_> = tables.to_vec();
    tables.sort_by_key(|(tag, _)| *tag);
    let n = tables.len() as u16;
    let largest_pow2 = 1u16 << (15 - n.leading_zeros() as u16);
    let mut buf = BeBuffer::new()
        .push(0x0001_0000u32)
        .push(n)
        .push(largest_pow2 * 16) // search range
        .push(largest_pow2.trailing_zeros() as u16) // entry selector
        .push((n - largest_pow2) * 16); // range shift
    let mut offset = 12 + 16 * tables.len() as u32;
    let mut head_offset = None;
    for (tag, data) in &tables {
        if *tag == Tag::new(b"head") {
            head_offset = Some(offset as usize);
        }
        buf = buf
            .push(*tag)
            .push(checksum(data))
            .push(offset)
            .push(data.len() as u32);
        offset += (data.len() as u32 + 3) & !3;
    }
    let mut font = buf.into_vec();
    for (_, data) in &tables {
        font.extend(data);
        while font.len() % 4 != 0 {
            font.push(0);
        }
    }
    if let Some(head) = head_offset {
        let adjustment = 0xB1B0_AFBAu32.wrapping_sub(checksum(&font));
        font[head + 8..head + 12].copy_from_slice(&adjustment.to_be_bytes());
    }
    font
}

/// The fully assembled synthetic font.
pub fn test_font() -> Vec<u8> {
    build_font(&[
        (Tag::new(b"head"), simple_head()),
        (Tag::new(b"maxp"), maxp_table()),
        (Tag::new(b"hhea"), hhea_table()),
        (Tag::new(b"hmtx"), hmtx_table()),
        (Tag::new(b"loca"), loca_table()),
        (Tag::new(b"glyf"), glyf_table()),
        (Tag::new(b"cmap"), cmap_table()),
        (Tag::new(b"GSUB"), gsub_table()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyf_matches_loca() {
        let glyf = glyf_table();
        assert_eq!(glyf.len(), 128);
        assert_eq!(loca_table().len(), 18);
    }

    #[test]
    fn directory_sums_to_magic() {
        let font = test_font();
        assert_eq!(checksum(&font), 0xB1B0_AFBA);
    }
}
