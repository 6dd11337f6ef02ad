//! Rewriting glyf and loca for a subset plan.

use sfnt_read::{FontRef, TableProvider};
use sfnt_types::Tag;
use sfnt_write::tables::glyf::{GlyphBuilder, GlyphTableBuilder};
use sfnt_write::tables::loca::{Loca, LocaFormat};
use sfnt_write::FontBuilder;

use crate::{Plan, SubsetError};

const GLYF: Tag = Tag::new(b"glyf");

/// Rebuild glyf in output order and add it, with a fresh loca, to the
/// builder. Returns the format the new loca serializes in, which the
/// caller must mirror into head.
pub(crate) fn subset_glyf_loca(
    font: &FontRef,
    plan: &Plan,
    builder: &mut FontBuilder,
) -> Result<LocaFormat, SubsetError> {
    let loca = font.loca()?;
    let glyf = font.glyf()?;

    let mut glyphs = GlyphTableBuilder::new();
    for &old in plan.new_to_old() {
        let data = glyf.glyph_data(&loca, old)?;
        let mut glyph = GlyphBuilder::new(data.as_bytes().to_vec());
        for component in glyph.components()? {
            // closure guarantees every referenced component is retained
            let new = plan
                .remap(component.glyph)
                .ok_or(SubsetError::SubsetTableError(GLYF))?;
            glyph.set_component_gid(component.gid_offset, new)?;
        }
        glyphs.push(glyph);
    }

    let new_loca = Loca::new(glyphs.generate_loca_list());
    let format = new_loca.format();
    builder.add_table(&glyphs)?;
    builder.add_table(&new_loca)?;
    Ok(format)
}
