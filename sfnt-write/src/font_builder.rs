//! A builder for top-level font objects

use std::borrow::Cow;
use std::collections::BTreeMap;

use sfnt_read::tables::cmap::Cmap as CmapRef;
use sfnt_read::tables::head::Head;
use sfnt_read::tables::hhea::Hhea;
use sfnt_read::tables::hmtx::Hmtx as HmtxRef;
use sfnt_read::tables::loca::Loca as LocaRef;
use sfnt_read::tables::maxp::Maxp;
use sfnt_read::{
    compute_checksum, FontData, FontRead, FontReadWithArgs, FontRef, TopLevelTable,
};
use sfnt_types::{Tag, TT_SFNT_VERSION};

use crate::error::BuildError;
use crate::tables::cmap::Cmap;
use crate::tables::glyf::GlyphTableBuilder;
use crate::tables::hmtx::Hmtx;
use crate::tables::loca::{Loca, LocaFormat};
use crate::util::SearchRange;
use crate::validate::Validate;
use crate::write::{dump_table, FontWrite, TableWriter};

const TABLE_RECORD_LEN: usize = 16;
const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;
const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;

/// Build a font from some set of tables.
///
/// Tables start out as raw bytes (borrowed from a source font or added
/// directly) and are converted to their typed builders on first access
/// through one of the `_mut` accessors. Untouched raw entries pass through
/// [`build`](Self::build) byte for byte.
#[derive(Clone, Debug, Default)]
pub struct FontBuilder<'a> {
    tables: BTreeMap<Tag, TableEntry<'a>>,
}

/// A single table held by a [`FontBuilder`].
#[derive(Clone, Debug)]
enum TableEntry<'a> {
    Raw(Cow<'a, [u8]>),
    Head(Head),
    Maxp(Maxp),
    Hhea(Hhea),
    Hmtx(Hmtx),
    Cmap(Cmap),
    Glyf(GlyphTableBuilder),
}

impl<'a> FontBuilder<'a> {
    /// Create a new builder to compile a binary font
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder holding every table of the source font as raw bytes.
    pub fn from_font(font: &FontRef<'a>) -> Self {
        let mut this = Self::new();
        this.copy_missing_tables(font);
        this
    }

    /// Add a table to the builder.
    ///
    /// The table can be any top-level table defined in this crate. This
    /// function will attempt to compile the table and then add it to the
    /// builder if successful, returning an error otherwise.
    pub fn add_table<T>(&mut self, table: &T) -> Result<&mut Self, BuildError>
    where
        T: FontWrite + Validate + TopLevelTable,
    {
        let bytes = dump_table(table)?;
        Ok(self.add_raw(T::TAG, bytes))
    }

    /// A builder method to add raw data for the provided tag
    pub fn add_raw(&mut self, tag: Tag, data: impl Into<Cow<'a, [u8]>>) -> &mut Self {
        self.tables.insert(tag, TableEntry::Raw(data.into()));
        self
    }

    /// Copy each table from the source font if it does not already exist
    pub fn copy_missing_tables(&mut self, font: &FontRef<'a>) -> &mut Self {
        for record in font
            .table_directory()
            .table_records()
            .iter()
            .filter_map(Result::ok)
        {
            let tag = record.tag;
            if !self.tables.contains_key(&tag) {
                if let Some(data) = font.table_data(tag) {
                    self.add_raw(tag, data.as_bytes());
                } else {
                    log::warn!("data for '{tag}' is malformed");
                }
            }
        }
        self
    }

    /// Returns `true` if the builder contains a table with this tag.
    pub fn contains(&self, tag: Tag) -> bool {
        self.tables.contains_key(&tag)
    }

    /// The head table, decoded on first access.
    pub fn head_mut(&mut self) -> Result<&mut Head, BuildError> {
        if let Some(TableEntry::Raw(data)) = self.tables.get(&Head::TAG) {
            let head = decode::<Head>(Head::TAG, data)?;
            self.tables.insert(Head::TAG, TableEntry::Head(head));
        }
        match self.tables.get_mut(&Head::TAG) {
            Some(TableEntry::Head(head)) => Ok(head),
            _ => Err(BuildError::MissingTable(Head::TAG)),
        }
    }

    /// The maxp table, decoded on first access.
    pub fn maxp_mut(&mut self) -> Result<&mut Maxp, BuildError> {
        if let Some(TableEntry::Raw(data)) = self.tables.get(&Maxp::TAG) {
            let maxp = decode::<Maxp>(Maxp::TAG, data)?;
            self.tables.insert(Maxp::TAG, TableEntry::Maxp(maxp));
        }
        match self.tables.get_mut(&Maxp::TAG) {
            Some(TableEntry::Maxp(maxp)) => Ok(maxp),
            _ => Err(BuildError::MissingTable(Maxp::TAG)),
        }
    }

    /// The hhea table, decoded on first access.
    pub fn hhea_mut(&mut self) -> Result<&mut Hhea, BuildError> {
        if let Some(TableEntry::Raw(data)) = self.tables.get(&Hhea::TAG) {
            let hhea = decode::<Hhea>(Hhea::TAG, data)?;
            self.tables.insert(Hhea::TAG, TableEntry::Hhea(hhea));
        }
        match self.tables.get_mut(&Hhea::TAG) {
            Some(TableEntry::Hhea(hhea)) => Ok(hhea),
            _ => Err(BuildError::MissingTable(Hhea::TAG)),
        }
    }

    /// The hmtx table, decoded on first access.
    ///
    /// Decoding needs the metric count from hhea and the glyph count from
    /// maxp, so those tables must be present.
    pub fn hmtx_mut(&mut self) -> Result<&mut Hmtx, BuildError> {
        if matches!(self.tables.get(&Hmtx::TAG), Some(TableEntry::Raw(_))) {
            let number_of_h_metrics = self.hhea_snapshot()?.number_of_h_metrics;
            let num_glyphs = self.maxp_snapshot()?.num_glyphs;
            let Some(TableEntry::Raw(data)) = self.tables.get(&Hmtx::TAG) else {
                return Err(BuildError::MissingTable(Hmtx::TAG));
            };
            let table =
                HmtxRef::read_with_args(FontData::new(data), &(number_of_h_metrics, num_glyphs))
                    .map_err(|inner| BuildError::DecodeFailed {
                        tag: Hmtx::TAG,
                        inner,
                    })?;
            let hmtx = Hmtx::from_table(&table);
            self.tables.insert(Hmtx::TAG, TableEntry::Hmtx(hmtx));
        }
        match self.tables.get_mut(&Hmtx::TAG) {
            Some(TableEntry::Hmtx(hmtx)) => Ok(hmtx),
            _ => Err(BuildError::MissingTable(Hmtx::TAG)),
        }
    }

    /// The cmap table, decoded on first access into a flat mapping list.
    pub fn cmap_mut(&mut self) -> Result<&mut Cmap, BuildError> {
        if let Some(TableEntry::Raw(data)) = self.tables.get(&Cmap::TAG) {
            let mappings = CmapRef::read(FontData::new(data))
                .and_then(|table| Ok(table.unicode_subtable()?.mappings()))
                .map_err(|inner| BuildError::DecodeFailed {
                    tag: Cmap::TAG,
                    inner,
                })?;
            let cmap = Cmap::from_mappings(mappings);
            self.tables.insert(Cmap::TAG, TableEntry::Cmap(cmap));
        }
        match self.tables.get_mut(&Cmap::TAG) {
            Some(TableEntry::Cmap(cmap)) => Ok(cmap),
            _ => Err(BuildError::MissingTable(Cmap::TAG)),
        }
    }

    /// The glyf table, split into per-glyph builders on first access.
    ///
    /// Splitting consumes the raw loca entry; a fresh loca is regenerated
    /// from the glyph list at [`build`](Self::build) time.
    pub fn glyf_loca_mut(&mut self) -> Result<&mut GlyphTableBuilder, BuildError> {
        let glyf_tag = GlyphTableBuilder::TAG;
        if matches!(self.tables.get(&glyf_tag), Some(TableEntry::Raw(_))) {
            let format = LocaFormat::from_i16(self.head_snapshot()?.index_to_loc_format)
                .map_err(|inner| BuildError::DecodeFailed {
                    tag: Head::TAG,
                    inner,
                })?;
            let loca_bytes = self
                .raw_bytes(Loca::TAG)
                .ok_or(BuildError::MissingTable(Loca::TAG))?;
            let loca = LocaRef::read_with_args(FontData::new(loca_bytes), &format).map_err(
                |inner| BuildError::DecodeFailed {
                    tag: Loca::TAG,
                    inner,
                },
            )?;
            let offsets: Vec<u32> = loca.offsets().collect();
            let glyf_bytes = self
                .raw_bytes(glyf_tag)
                .ok_or(BuildError::MissingTable(glyf_tag))?;
            let glyphs = GlyphTableBuilder::from_raw(glyf_bytes, &offsets).map_err(|inner| {
                BuildError::DecodeFailed {
                    tag: glyf_tag,
                    inner,
                }
            })?;
            self.tables.insert(glyf_tag, TableEntry::Glyf(glyphs));
            self.tables.remove(&Loca::TAG);
        }
        match self.tables.get_mut(&glyf_tag) {
            Some(TableEntry::Glyf(glyphs)) => Ok(glyphs),
            _ => Err(BuildError::MissingTable(glyf_tag)),
        }
    }

    /// Assemble all the tables into a binary font file with a table directory.
    ///
    /// Typed builders are serialized, the loca table is regenerated from the
    /// glyph list when one is present, and the head checksum adjustment is
    /// recomputed over the finished file.
    pub fn build(&mut self) -> Result<Vec<u8>, BuildError> {
        // Regenerate loca and sync the head offset format before flushing.
        let regenerated_loca = match self.tables.get(&GlyphTableBuilder::TAG) {
            Some(TableEntry::Glyf(glyphs)) => Some(Loca::new(glyphs.generate_loca_list())),
            _ => None,
        };
        if let Some(loca) = &regenerated_loca {
            let maxp_glyphs = self.maxp_snapshot()?.num_glyphs;
            if loca.num_glyphs() != maxp_glyphs as usize {
                return Err(BuildError::MismatchedGlyphCount {
                    loca_glyphs: loca.num_glyphs(),
                    maxp_glyphs,
                });
            }
            self.head_mut()?.index_to_loc_format = match loca.format() {
                LocaFormat::Short => 0,
                LocaFormat::Long => 1,
            };
        }

        let mut flushed: BTreeMap<Tag, Cow<'_, [u8]>> = BTreeMap::new();
        if let Some(loca) = &regenerated_loca {
            flushed.insert(Loca::TAG, dump_table(loca)?.into());
        }
        for (tag, entry) in &self.tables {
            let bytes: Cow<'_, [u8]> = match entry {
                // The adjustment is summed as zero; the real value is
                // patched in after the whole file is assembled.
                TableEntry::Raw(data) if *tag == Head::TAG => {
                    let mut head = data.clone().into_owned();
                    if let Some(slot) = head
                        .get_mut(CHECKSUM_ADJUSTMENT_OFFSET..CHECKSUM_ADJUSTMENT_OFFSET + 4)
                    {
                        slot.copy_from_slice(&[0; 4]);
                    }
                    head.into()
                }
                TableEntry::Raw(data) => data.clone(),
                TableEntry::Head(head) => {
                    let mut head = head.clone();
                    head.checksum_adjustment = 0;
                    dump_table(&head)?.into()
                }
                TableEntry::Maxp(maxp) => dump_table(maxp)?.into(),
                TableEntry::Hhea(hhea) => dump_table(hhea)?.into(),
                TableEntry::Hmtx(hmtx) => dump_table(hmtx)?.into(),
                TableEntry::Cmap(cmap) => dump_table(cmap)?.into(),
                TableEntry::Glyf(glyphs) => dump_table(glyphs)?.into(),
            };
            flushed.insert(*tag, bytes);
        }

        let header_len = std::mem::size_of::<u32>() // sfnt
            + std::mem::size_of::<u16>() * 4 // num_tables to range_shift
            + flushed.len() * TABLE_RECORD_LEN;

        let mut writer = TableWriter::default();
        writer.write(TT_SFNT_VERSION);
        writer.write(flushed.len() as u16);
        let computed = SearchRange::compute(flushed.len(), TABLE_RECORD_LEN);
        writer.write(computed.search_range);
        writer.write(computed.entry_selector);
        writer.write(computed.range_shift);

        let mut position = header_len as u32;
        let mut head_offset = None;
        for (tag, table) in &flushed {
            if *tag == Head::TAG {
                head_offset = Some(position as usize);
            }
            writer.write(*tag);
            writer.write(compute_checksum(table));
            writer.write(position);
            writer.write(table.len() as u32);
            position += table.len() as u32;
            position += (crate::util::round4(table.len()) - table.len()) as u32;
        }

        let mut data = writer.into_data();
        for table in flushed.values() {
            data.extend_from_slice(table);
            let rem = crate::util::round4(table.len()) - table.len();
            data.extend_from_slice(&[0u8; 4][..rem]);
        }

        if let Some(offset) = head_offset {
            let adjustment = CHECKSUM_MAGIC.wrapping_sub(compute_checksum(&data));
            let start = offset + CHECKSUM_ADJUSTMENT_OFFSET;
            if let Some(slot) = data.get_mut(start..start + 4) {
                slot.copy_from_slice(&adjustment.to_be_bytes());
            }
        }
        Ok(data)
    }

    fn raw_bytes(&self, tag: Tag) -> Option<&[u8]> {
        match self.tables.get(&tag) {
            Some(TableEntry::Raw(data)) => Some(data),
            _ => None,
        }
    }

    fn head_snapshot(&self) -> Result<Head, BuildError> {
        match self.tables.get(&Head::TAG) {
            Some(TableEntry::Head(head)) => Ok(head.clone()),
            Some(TableEntry::Raw(data)) => decode::<Head>(Head::TAG, data),
            _ => Err(BuildError::MissingTable(Head::TAG)),
        }
    }

    fn maxp_snapshot(&self) -> Result<Maxp, BuildError> {
        match self.tables.get(&Maxp::TAG) {
            Some(TableEntry::Maxp(maxp)) => Ok(maxp.clone()),
            Some(TableEntry::Raw(data)) => decode::<Maxp>(Maxp::TAG, data),
            _ => Err(BuildError::MissingTable(Maxp::TAG)),
        }
    }

    fn hhea_snapshot(&self) -> Result<Hhea, BuildError> {
        match self.tables.get(&Hhea::TAG) {
            Some(TableEntry::Hhea(hhea)) => Ok(hhea.clone()),
            Some(TableEntry::Raw(data)) => decode::<Hhea>(Hhea::TAG, data),
            _ => Err(BuildError::MissingTable(Hhea::TAG)),
        }
    }
}

fn decode<T: for<'b> FontRead<'b>>(tag: Tag, data: &[u8]) -> Result<T, BuildError> {
    T::read(FontData::new(data)).map_err(|inner| BuildError::DecodeFailed { tag, inner })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sfnt_read::{FontRef, TableProvider};
    use sfnt_test_data::test_fonts;
    use sfnt_types::{GlyphId, Tag};

    use super::*;
    use crate::tables::glyf::GlyphBuilder;

    #[test]
    fn untouched_font_passes_through_byte_identical() {
        let source = test_fonts::test_font();
        let font = FontRef::new(&source).unwrap();
        let rebuilt = FontBuilder::from_font(&font).build().unwrap();
        assert_eq!(source, rebuilt);
    }

    #[test]
    fn sets_binary_search_assists() {
        // Based on Roboto's num tables
        let data = b"doesn't matter".to_vec();
        let mut builder = FontBuilder::default();
        (0..0x16u32).for_each(|i| {
            builder.add_raw(Tag::from_u32(i), data.clone());
        });
        let bytes = builder.build().unwrap();
        // search_range, entry_selector and range_shift live at offsets 6-11.
        let field = |at: usize| u16::from_be_bytes([bytes[at], bytes[at + 1]]);
        assert_eq!(
            (256, 4, 0x16 * 16 - 256),
            (field(6), field(8), field(10))
        );
    }

    #[test]
    fn survives_no_tables() {
        FontBuilder::default().build().unwrap();
    }

    #[test]
    fn rebuilt_file_checksums_hold() {
        let source = test_fonts::test_font();
        let font = FontRef::new(&source).unwrap();
        let rebuilt = FontBuilder::from_font(&font).build().unwrap();
        let rebuilt = FontRef::new(&rebuilt).unwrap();
        rebuilt.verify_checksums().unwrap();
    }

    #[test]
    fn remove_glyph_and_rebuild() {
        let source = test_fonts::test_font();
        let font = FontRef::new(&source).unwrap();
        let mut builder = FontBuilder::from_font(&font);

        let glyphs = builder.glyf_loca_mut().unwrap();
        glyphs.remove(7).unwrap();
        builder.maxp_mut().unwrap().num_glyphs = 7;
        let bytes = builder.build().unwrap();

        let rebuilt = FontRef::new(&bytes).unwrap();
        assert_eq!(rebuilt.maxp().unwrap().num_glyphs, 7);
        let loca = rebuilt.loca().unwrap();
        assert_eq!(loca.num_glyphs(), 7);
        // Still short offsets, so the head format field stays 0.
        assert_eq!(rebuilt.head().unwrap().index_to_loc_format, 0);
        let glyf = rebuilt.glyf().unwrap();
        let data = glyf.glyph_data(&loca, GlyphId::new(6)).unwrap();
        assert_eq!(data.as_bytes(), test_fonts::simple_glyph_bytes());
    }

    #[test]
    fn glyph_count_mismatch_is_an_error() {
        let source = test_fonts::test_font();
        let font = FontRef::new(&source).unwrap();
        let mut builder = FontBuilder::from_font(&font);
        builder.glyf_loca_mut().unwrap().remove(7).unwrap();
        let err = builder.build().unwrap_err();
        assert!(matches!(
            err,
            BuildError::MismatchedGlyphCount {
                loca_glyphs: 7,
                maxp_glyphs: 8
            }
        ));
    }

    #[test]
    fn long_offsets_update_head_format() {
        let source = test_fonts::test_font();
        let font = FontRef::new(&source).unwrap();
        let mut builder = FontBuilder::from_font(&font);
        let glyphs = builder.glyf_loca_mut().unwrap();
        glyphs
            .replace(0, GlyphBuilder::new(vec![0; 0x2_0000]))
            .unwrap();
        let bytes = builder.build().unwrap();

        let rebuilt = FontRef::new(&bytes).unwrap();
        assert_eq!(rebuilt.head().unwrap().index_to_loc_format, 1);
        assert_eq!(rebuilt.loca().unwrap().num_glyphs(), 8);
    }

    #[test]
    fn copy_missing_tables_keeps_existing_entries() {
        let source = test_fonts::test_font();
        let font = FontRef::new(&source).unwrap();
        let hmtx = vec![0u8; 4];
        let mut builder = FontBuilder::new();
        builder.add_raw(Tag::new(b"hmtx"), hmtx.clone());
        builder.copy_missing_tables(&font);
        let bytes = builder.build().unwrap();

        let rebuilt = FontRef::new(&bytes).unwrap();
        assert_eq!(
            rebuilt.table_data(Tag::new(b"hmtx")).unwrap().as_bytes(),
            hmtx
        );
        assert!(rebuilt.table_data(Tag::new(b"GSUB")).is_some());
    }

    #[test]
    fn glyf_access_requires_head_and_loca() {
        let mut builder = FontBuilder::new();
        builder.add_raw(Tag::new(b"glyf"), test_fonts::glyf_table());
        let err = builder.glyf_loca_mut().unwrap_err();
        assert!(matches!(err, BuildError::MissingTable(tag) if tag == Tag::new(b"head")));
    }
}
