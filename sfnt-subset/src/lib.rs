//! Reducing a font to a chosen set of glyphs.
//!
//! A [`Plan`] resolves the caller's glyph ids and codepoints into the full
//! set of glyphs to retain (composite components included) and assigns the
//! retained glyphs new, densely packed ids. [`subset_font`] then rebuilds
//! the glyph-bearing tables around that renumbering and copies everything
//! else through untouched.

#![forbid(unsafe_code)]

mod cmap;
mod glyf_loca;
mod gsub;
mod hmtx;
mod parsing_util;

use std::collections::{BTreeMap, BTreeSet};

use sfnt_read::tables::glyf::{Glyf, Glyph};
use sfnt_read::tables::loca::{Loca, LocaFormat};
use sfnt_read::{FontRef, ReadError, TableProvider};
use sfnt_types::{GlyphId, Tag};
use sfnt_write::{BuildError, FontBuilder};
use thiserror::Error;

pub use parsing_util::{parse_unicodes, populate_gids};

const MAX_COMPOSITE_OPERATIONS_PER_GLYPH: u8 = 64;
const MAX_NESTING_LEVEL: u8 = 64;

/// Tables that reference glyph ids but are not rewritten here; carrying
/// them across a renumbering would corrupt them.
const DROP_TABLES: [Tag; 2] = [Tag::new(b"GDEF"), Tag::new(b"GPOS")];

#[derive(Debug, Error)]
pub enum SubsetError {
    #[error("Invalid input gid {0}")]
    InvalidGid(String),

    #[error("Invalid gid range {start}-{end}")]
    InvalidGidRange { start: u32, end: u32 },

    #[error("Invalid input unicode {0}")]
    InvalidUnicode(String),

    #[error("Invalid unicode range {start}-{end}")]
    InvalidUnicodeRange { start: u32, end: u32 },

    #[error("Subsetting table '{0}' failed")]
    SubsetTableError(Tag),

    #[error(transparent)]
    ReadFailed(#[from] ReadError),

    #[error(transparent)]
    BuildFailed(#[from] BuildError),
}

/// The glyphs to retain, and the ids they will have in the output.
///
/// New ids preserve the ascending order of the old ones, so any glyph
/// list that was sorted in the source stays sorted after remapping.
#[derive(Clone, Debug, Default)]
pub struct Plan {
    glyph_map: BTreeMap<GlyphId, GlyphId>,
    new_to_old: Vec<GlyphId>,
    font_num_glyphs: u16,
}

impl Plan {
    pub fn new(
        input_gids: &BTreeSet<GlyphId>,
        input_unicodes: &BTreeSet<u32>,
        font: &FontRef,
    ) -> Result<Self, SubsetError> {
        let font_num_glyphs = get_font_num_glyphs(font);

        let mut seeds = BTreeSet::new();
        seeds.insert(GlyphId::NOTDEF);
        for &gid in input_gids {
            if gid.to_u16() >= font_num_glyphs {
                return Err(SubsetError::InvalidGid(gid.to_string()));
            }
            seeds.insert(gid);
        }
        if !input_unicodes.is_empty() {
            let subtable = font.cmap()?.unicode_subtable()?;
            for &cp in input_unicodes {
                let gid = subtable.glyph_id(cp)?;
                // unmapped codepoints are skipped, not an error
                if gid != GlyphId::NOTDEF {
                    seeds.insert(gid);
                }
            }
        }

        let loca = font.loca()?;
        let glyf = font.glyf()?;
        let mut glyphset = BTreeSet::new();
        let mut operation_count =
            seeds.len() as i32 * MAX_COMPOSITE_OPERATIONS_PER_GLYPH as i32;
        for &gid in &seeds {
            operation_count =
                glyf_closure_glyphs(&loca, &glyf, gid, &mut glyphset, operation_count, 0);
        }
        glyphset.retain(|gid| gid.to_u16() < font_num_glyphs);

        let new_to_old: Vec<GlyphId> = glyphset.into_iter().collect();
        let glyph_map = new_to_old
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, GlyphId::new(new as u16)))
            .collect();
        Ok(Plan {
            glyph_map,
            new_to_old,
            font_num_glyphs,
        })
    }

    /// The number of glyphs the subset font will contain.
    pub fn num_output_glyphs(&self) -> u16 {
        self.new_to_old.len() as u16
    }

    /// The id `old` will have in the output, if it is retained.
    pub fn remap(&self, old: GlyphId) -> Option<GlyphId> {
        self.glyph_map.get(&old).copied()
    }

    pub fn retains(&self, old: GlyphId) -> bool {
        self.glyph_map.contains_key(&old)
    }

    /// Retained glyphs in output order; index is the new id.
    pub fn new_to_old(&self) -> &[GlyphId] {
        &self.new_to_old
    }

    /// The glyph count of the source font.
    pub fn font_num_glyphs(&self) -> u16 {
        self.font_num_glyphs
    }
}

/// glyph closure for composite glyphs in the glyf table,
/// limiting the amount of work through an operation budget
fn glyf_closure_glyphs(
    loca: &Loca,
    glyf: &Glyf,
    gid: GlyphId,
    gids_to_retain: &mut BTreeSet<GlyphId>,
    operation_count: i32,
    depth: u8,
) -> i32 {
    if gids_to_retain.contains(&gid) {
        return operation_count;
    }
    gids_to_retain.insert(gid);

    if depth > MAX_NESTING_LEVEL {
        return operation_count;
    }
    let depth = depth + 1;

    let mut operation_count = operation_count - 1;
    if operation_count < 0 {
        return operation_count;
    }

    if let Ok(Glyph::Composite(glyph)) = glyf.glyph(loca, gid) {
        for child in glyph.components().filter_map(Result::ok) {
            operation_count = glyf_closure_glyphs(
                loca,
                glyf,
                child.glyph,
                gids_to_retain,
                operation_count,
                depth,
            );
        }
    }
    operation_count
}

fn get_font_num_glyphs(font: &FontRef) -> u16 {
    let from_maxp = font.maxp().map(|maxp| maxp.num_glyphs).unwrap_or_default();
    let from_loca = font
        .loca()
        .map(|loca| loca.num_glyphs().min(u16::MAX as usize) as u16)
        .unwrap_or_default();
    from_maxp.max(from_loca)
}

/// Build a subset font containing exactly the glyphs the plan retains.
pub fn subset_font(font: &FontRef, plan: &Plan) -> Result<Vec<u8>, SubsetError> {
    let mut builder = FontBuilder::new();

    let loca_format = glyf_loca::subset_glyf_loca(font, plan, &mut builder)?;
    let mut head = font.head()?;
    head.index_to_loc_format = match loca_format {
        LocaFormat::Short => 0,
        LocaFormat::Long => 1,
    };
    builder.add_table(&head)?;

    let mut maxp = font.maxp()?;
    maxp.num_glyphs = plan.num_output_glyphs();
    builder.add_table(&maxp)?;

    hmtx::subset_hmtx_hhea(font, plan, &mut builder)?;
    cmap::subset_cmap(font, plan, &mut builder)?;
    gsub::subset_gsub(font, plan, &mut builder)?;

    for record in font
        .table_directory()
        .table_records()
        .iter()
        .filter_map(Result::ok)
    {
        let tag = record.tag;
        if DROP_TABLES.contains(&tag) {
            log::info!("dropping '{tag}', not rewritten under renumbering");
            continue;
        }
        if tag == Tag::new(b"cmap") && !builder.contains(tag) {
            // the rewrite left it out on purpose; the original maps old ids
            continue;
        }
        if !builder.contains(tag) {
            if let Some(data) = font.table_data(tag) {
                builder.add_raw(tag, data.as_bytes().to_vec());
            } else {
                log::warn!("data for '{tag}' is malformed");
            }
        }
    }
    Ok(builder.build()?)
}

/// Subset to `codepoints`, or pass the font through untouched when the
/// set is empty.
pub fn subset_or_copy(font: &FontRef, codepoints: &BTreeSet<u32>) -> Result<Vec<u8>, SubsetError> {
    if codepoints.is_empty() {
        return Ok(font.data().as_bytes().to_vec());
    }
    let plan = Plan::new(&BTreeSet::new(), codepoints, font)?;
    subset_font(font, &plan)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sfnt_read::tables::gsub::SubstitutionSubtable;
    use sfnt_test_data::{test_fonts, BeBuffer};

    use super::*;

    fn gid_set(gids: &[u16]) -> BTreeSet<GlyphId> {
        gids.iter().copied().map(GlyphId::new).collect()
    }

    fn unicode_set(cps: &[u32]) -> BTreeSet<u32> {
        cps.iter().copied().collect()
    }

    #[test]
    fn plan_resolves_unicodes_and_inserts_notdef() {
        let data = test_fonts::test_font();
        let font = FontRef::new(&data).unwrap();
        let plan = Plan::new(&BTreeSet::new(), &unicode_set(&[0x41, 0x42]), &font).unwrap();
        // notdef plus gids 1 ('A') and 6 ('B')
        assert_eq!(plan.new_to_old(), [GlyphId::NOTDEF, GlyphId::new(1), GlyphId::new(6)]);
        assert_eq!(plan.remap(GlyphId::new(6)), Some(GlyphId::new(2)));
        assert_eq!(plan.remap(GlyphId::new(5)), None);
    }

    #[test]
    fn plan_closes_over_composite_components() {
        let data = test_fonts::test_font();
        let font = FontRef::new(&data).unwrap();
        // glyph 7 is a composite of glyphs 6 and 3
        let plan = Plan::new(&gid_set(&[7]), &BTreeSet::new(), &font).unwrap();
        assert_eq!(
            plan.new_to_old(),
            [GlyphId::NOTDEF, GlyphId::new(3), GlyphId::new(6), GlyphId::new(7)]
        );
    }

    #[test]
    fn plan_skips_unmapped_codepoints() {
        let data = test_fonts::test_font();
        let font = FontRef::new(&data).unwrap();
        let plan = Plan::new(&BTreeSet::new(), &unicode_set(&[0x7A]), &font).unwrap();
        assert_eq!(plan.num_output_glyphs(), 1);
    }

    #[test]
    fn plan_rejects_out_of_range_gids() {
        let data = test_fonts::test_font();
        let font = FontRef::new(&data).unwrap();
        let err = Plan::new(&gid_set(&[12]), &BTreeSet::new(), &font).unwrap_err();
        assert!(matches!(err, SubsetError::InvalidGid(_)));
    }

    #[test]
    fn subset_rewrites_component_references() {
        let data = test_fonts::test_font();
        let font = FontRef::new(&data).unwrap();
        let plan = Plan::new(&BTreeSet::new(), &unicode_set(&[0x44]), &font).unwrap();
        let out = subset_font(&font, &plan).unwrap();

        let subset = FontRef::new(&out).unwrap();
        assert_eq!(subset.maxp().unwrap().num_glyphs, 4);
        let loca = subset.loca().unwrap();
        let glyf = subset.glyf().unwrap();
        // old glyph 7 is now 3; its components 6 and 3 became 2 and 1
        match glyf.glyph(&loca, GlyphId::new(3)).unwrap() {
            Glyph::Composite(composite) => {
                let children: Vec<_> = composite
                    .components()
                    .filter_map(Result::ok)
                    .map(|child| child.glyph)
                    .collect();
                assert_eq!(children, [GlyphId::new(2), GlyphId::new(1)]);
            }
            _ => panic!("expected a composite glyph"),
        }
    }

    #[test]
    fn subset_trims_trailing_advance_run() {
        let data = test_fonts::test_font();
        let font = FontRef::new(&data).unwrap();
        // retained glyphs 0, 3, 6, 7 carry advances 500, 0, 520, 520
        let plan = Plan::new(&gid_set(&[7]), &BTreeSet::new(), &font).unwrap();
        let out = subset_font(&font, &plan).unwrap();

        let subset = FontRef::new(&out).unwrap();
        assert_eq!(subset.hhea().unwrap().number_of_h_metrics, 3);
        let hmtx = subset.hmtx().unwrap();
        assert_eq!(hmtx.advance(GlyphId::new(3)).unwrap(), 520);
        assert_eq!(hmtx.side_bearing(GlyphId::new(3)).unwrap(), 20);
    }

    #[test]
    fn subset_regenerates_cmap_from_retained_mappings() {
        let data = test_fonts::test_font();
        let font = FontRef::new(&data).unwrap();
        let plan = Plan::new(&BTreeSet::new(), &unicode_set(&[0x41, 0x2C, 0x44]), &font).unwrap();
        let out = subset_font(&font, &plan).unwrap();

        let subset = FontRef::new(&out).unwrap();
        let cmap = subset.cmap().unwrap();
        assert_eq!(cmap.map_codepoint(0x41).unwrap(), GlyphId::new(1));
        assert_eq!(cmap.map_codepoint(0x2C).unwrap(), GlyphId::new(2));
        assert_eq!(cmap.map_codepoint(0x44).unwrap(), GlyphId::new(5));
        // 'C' mapped to a dropped glyph
        assert_eq!(cmap.map_codepoint(0x43).unwrap(), GlyphId::NOTDEF);
    }

    #[test]
    fn gid_plan_succeeds_without_a_unicode_cmap() {
        // a lone 1/0 (mac roman) format 6 subtable; nothing to regenerate from
        let mac_cmap = BeBuffer::new()
            .push(0u16) // version
            .push(1u16) // num tables
            .push(1u16) // platform: macintosh
            .push(0u16) // encoding: roman
            .push(12u32) // subtable offset
            .push(6u16) // format 6
            .push(14u16) // length
            .push(0u16) // language
            .push(0x41u16) // first code
            .push(1u16) // entry count
            .push(1u16) // glyph id
            .into_vec();
        let data = test_fonts::build_font(&[
            (Tag::new(b"head"), test_fonts::simple_head()),
            (Tag::new(b"maxp"), test_fonts::maxp_table()),
            (Tag::new(b"hhea"), test_fonts::hhea_table()),
            (Tag::new(b"hmtx"), test_fonts::hmtx_table()),
            (Tag::new(b"loca"), test_fonts::loca_table()),
            (Tag::new(b"glyf"), test_fonts::glyf_table()),
            (Tag::new(b"cmap"), mac_cmap),
        ]);
        let font = FontRef::new(&data).unwrap();
        let plan = Plan::new(&gid_set(&[7]), &BTreeSet::new(), &font).unwrap();
        let out = subset_font(&font, &plan).unwrap();

        // the stale mapping is dropped rather than copied through
        let subset = FontRef::new(&out).unwrap();
        assert_eq!(subset.maxp().unwrap().num_glyphs, 4);
        assert!(subset.table_data(Tag::new(b"cmap")).is_none());
    }

    #[test]
    fn subset_remaps_gsub_lookups() {
        let data = test_fonts::test_font();
        let font = FontRef::new(&data).unwrap();
        // old ids 0,1,2,3,6,7 become 0,1,2,3,4,5
        let plan = Plan::new(&BTreeSet::new(), &unicode_set(&[0x41, 0x2C, 0x44]), &font).unwrap();
        let out = subset_font(&font, &plan).unwrap();

        let subset = FontRef::new(&out).unwrap();
        let gsub = subset.gsub().unwrap();
        let lookups = gsub.lookup_list().unwrap();
        assert_eq!(lookups.lookup_count(), 2);

        // single subst kept only the pair whose glyphs both survived
        let single = lookups.lookup(0).unwrap();
        match single.subtable(0).unwrap() {
            SubstitutionSubtable::Single(table) => {
                assert_eq!(
                    table.substitute(GlyphId::new(2)).unwrap(),
                    Some(GlyphId::new(4))
                );
                assert_eq!(table.substitute(GlyphId::new(1)).unwrap(), None);
            }
            _ => panic!("expected a single substitution"),
        }

        // the f+i style ligature survived with remapped glyphs
        let ligature = lookups.lookup(1).unwrap();
        match ligature.subtable(0).unwrap() {
            SubstitutionSubtable::Ligature(table) => {
                let set = table.ligature_set(0).unwrap();
                assert_eq!(set.len(), 1);
                assert_eq!(set[0].ligature_glyph, GlyphId::new(5));
                assert_eq!(set[0].components, [GlyphId::new(2)]);
            }
            _ => panic!("expected a ligature substitution"),
        }
    }

    #[test]
    fn dropped_glyphs_empty_lookups_but_keep_their_slots() {
        let data = test_fonts::test_font();
        let font = FontRef::new(&data).unwrap();
        // glyphs 5, 6 and 7 all dropped; both lookups lose their entries
        let plan = Plan::new(&BTreeSet::new(), &unicode_set(&[0x41, 0x31, 0x2C]), &font).unwrap();
        let out = subset_font(&font, &plan).unwrap();

        let subset = FontRef::new(&out).unwrap();
        let lookups = subset.gsub().unwrap().lookup_list().unwrap();
        assert_eq!(lookups.lookup_count(), 2);
        let first = lookups.lookup(0).unwrap();
        assert_eq!(first.lookup_type(), 1);
        assert_eq!(first.subtable_count(), 0);
        let second = lookups.lookup(1).unwrap();
        assert_eq!(second.lookup_type(), 4);
        assert_eq!(second.subtable_count(), 0);
    }

    #[test]
    fn empty_codepoint_set_copies_the_font_unmodified() {
        let data = test_fonts::test_font();
        let font = FontRef::new(&data).unwrap();
        let out = subset_or_copy(&font, &BTreeSet::new()).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn subset_output_checksums_hold() {
        let data = test_fonts::test_font();
        let font = FontRef::new(&data).unwrap();
        let plan = Plan::new(&BTreeSet::new(), &unicode_set(&[0x41]), &font).unwrap();
        let out = subset_font(&font, &plan).unwrap();
        FontRef::new(&out).unwrap().verify_checksums().unwrap();
    }
}
