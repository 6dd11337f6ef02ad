//! Editing the glyf table.

use sfnt_read::tables::glyf::{Component, Glyph};
use sfnt_read::{FontData, ReadError, TopLevelTable};
use sfnt_types::Tag;
use sfnt_types::GlyphId;

use crate::error::BuildError;
use crate::records::RecordList;
use crate::util::round2;
use crate::validate::{Validate, ValidationCtx};
use crate::write::{FontWrite, TableWriter};

/// A single glyph, held as an owned description blob.
///
/// An empty blob is a glyph with no outline. The blob is not re-encoded
/// on write, so anything a font carries after the point data (padding,
/// instructions) survives editing untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphBuilder {
    data: Vec<u8>,
}

impl GlyphBuilder {
    pub fn new(data: Vec<u8>) -> Self {
        GlyphBuilder { data }
    }

    pub fn empty() -> Self {
        GlyphBuilder::default()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Parse the blob as a glyph description.
    pub fn parse(&self) -> Result<Glyph<'_>, ReadError> {
        Glyph::read(FontData::new(&self.data))
    }

    /// The components, when this is a composite glyph.
    pub fn components(&self) -> Result<Vec<Component>, ReadError> {
        match self.parse()? {
            Glyph::Composite(composite) => composite.components().collect(),
            _ => Ok(Vec::new()),
        }
    }

    /// Overwrite the component glyph id at byte position `gid_offset`.
    ///
    /// Positions come from [`Component::gid_offset`].
    pub fn set_component_gid(&mut self, gid_offset: usize, gid: GlyphId) -> Result<(), BuildError> {
        let Some(slot) = self.data.get_mut(gid_offset..gid_offset + 2) else {
            return Err(BuildError::IndexOutOfRange {
                index: gid_offset,
                len: self.data.len(),
            });
        };
        slot.copy_from_slice(&gid.to_u16().to_be_bytes());
        Ok(())
    }
}

/// An ordered collection of glyphs, the editable form of glyf + loca.
///
/// Component glyph ids are not adjusted when glyphs are inserted or
/// removed; renumbering is a caller policy, not a storage concern.
#[derive(Clone, Debug, Default)]
pub struct GlyphTableBuilder {
    glyphs: RecordList<GlyphBuilder>,
}

impl TopLevelTable for GlyphTableBuilder {
    const TAG: Tag = Tag::new(b"glyf");
}

impl GlyphTableBuilder {
    pub fn new() -> Self {
        GlyphTableBuilder::default()
    }

    /// Split a glyf blob into per-glyph builders using loca offsets.
    pub fn from_raw(glyf: &[u8], loca_offsets: &[u32]) -> Result<Self, ReadError> {
        let mut glyphs = Vec::with_capacity(loca_offsets.len().saturating_sub(1));
        for window in loca_offsets.windows(2) {
            let (start, end) = (window[0] as usize, window[1] as usize);
            if end < start {
                return Err(ReadError::MalformedData("loca offsets out of order"));
            }
            let data = glyf.get(start..end).ok_or(ReadError::OutOfBounds)?;
            glyphs.push(GlyphBuilder::new(data.to_vec()));
        }
        Ok(GlyphTableBuilder {
            glyphs: glyphs.into(),
        })
    }

    pub fn num_glyphs(&self) -> usize {
        self.glyphs.len()
    }

    pub fn glyph(&self, i: usize) -> Option<&GlyphBuilder> {
        self.glyphs.get(i)
    }

    pub fn glyph_mut(&mut self, i: usize) -> Option<&mut GlyphBuilder> {
        self.glyphs.get_mut(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GlyphBuilder> {
        self.glyphs.iter()
    }

    pub fn push(&mut self, glyph: GlyphBuilder) {
        self.glyphs.push(glyph);
    }

    pub fn insert(&mut self, i: usize, glyph: GlyphBuilder) -> Result<(), BuildError> {
        self.glyphs.insert(i, glyph)
    }

    pub fn remove(&mut self, i: usize) -> Result<GlyphBuilder, BuildError> {
        self.glyphs.remove(i)
    }

    pub fn replace(&mut self, i: usize, glyph: GlyphBuilder) -> Result<GlyphBuilder, BuildError> {
        match self.glyphs.get_mut(i) {
            Some(slot) => Ok(std::mem::replace(slot, glyph)),
            None => Err(BuildError::IndexOutOfRange {
                index: i,
                len: self.glyphs.len(),
            }),
        }
    }

    pub fn clear(&mut self) {
        self.glyphs.clear();
    }

    /// The loca list this table serializes under: each glyph padded to a
    /// two-byte boundary, offsets accumulated in order.
    ///
    /// An empty table yields `[0, 0]`, one empty glyph slot.
    pub fn generate_loca_list(&self) -> Vec<u32> {
        if self.glyphs.is_empty() {
            return vec![0, 0];
        }
        let mut offsets = Vec::with_capacity(self.glyphs.len() + 1);
        let mut offset = 0u32;
        offsets.push(0);
        for glyph in self.glyphs.iter() {
            offset += round2(glyph.len()) as u32;
            offsets.push(offset);
        }
        offsets
    }
}

impl FontWrite for GlyphTableBuilder {
    fn write_into(&self, writer: &mut TableWriter) {
        for glyph in self.glyphs.iter() {
            writer.write_slice(&glyph.data);
            writer.pad_to(2);
        }
    }
}

impl Validate for GlyphTableBuilder {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("glyf", |ctx| {
            ctx.in_field("glyphs", |ctx| {
                // one more loca entry than glyphs, both capped at u16
                ctx.check_array_len(self.glyphs.len() + 1);
            })
        })
    }
}


#[cfg(test)]
mod tests {
    use sfnt_test_data::test_fonts;

    use super::*;
    use crate::dump_table;

    fn sample() -> GlyphTableBuilder {
        GlyphTableBuilder::from_raw(&test_fonts::glyf_table(), &test_fonts::GLYPH_OFFSETS)
            .unwrap()
    }

    #[test]
    fn from_raw_splits_on_loca() {
        let table = sample();
        assert_eq!(table.num_glyphs(), 8);
        assert!(table.glyph(3).unwrap().is_empty());
        assert_eq!(table.glyph(5).unwrap().len(), 16);
    }

    #[test]
    fn untouched_round_trip() {
        let table = sample();
        assert_eq!(table.generate_loca_list().to_vec(), test_fonts::GLYPH_OFFSETS);
        assert_eq!(dump_table(&table).unwrap(), test_fonts::glyf_table());
    }

    #[test]
    fn loca_list_tracks_edits() {
        let mut table = sample();
        table.remove(0).unwrap();
        let loca = table.generate_loca_list();
        assert_eq!(loca.len(), 8);
        // every offset shifts down by the removed glyph's padded length
        assert_eq!(loca[0], 0);
        assert_eq!(*loca.last().unwrap(), 110);
    }

    #[test]
    fn cleared_table_is_a_single_empty_slot() {
        let mut table = sample();
        table.clear();
        assert_eq!(table.generate_loca_list(), [0, 0]);
        assert!(dump_table(&table).unwrap().is_empty());
    }

    #[test]
    fn odd_length_glyphs_are_padded() {
        let mut table = GlyphTableBuilder::new();
        table.push(GlyphBuilder::new(vec![0; 17]));
        table.push(GlyphBuilder::new(vec![0; 4]));
        assert_eq!(table.generate_loca_list(), [0, 18, 22]);
        assert_eq!(dump_table(&table).unwrap().len(), 22);
    }

    #[test]
    fn component_rewrite() {
        let mut table = sample();
        let components = table.glyph(7).unwrap().components().unwrap();
        assert_eq!(components.len(), 2);
        let offset = components[0].gid_offset;
        table
            .glyph_mut(7)
            .unwrap()
            .set_component_gid(offset, GlyphId::new(2))
            .unwrap();
        let components = table.glyph(7).unwrap().components().unwrap();
        assert_eq!(components[0].glyph, GlyphId::new(2));
    }
}
