//! Regenerating cmap from the retained mappings.

use sfnt_read::{FontRef, ReadError, TableProvider};
use sfnt_types::GlyphId;
use sfnt_write::tables::cmap::Cmap;
use sfnt_write::FontBuilder;

use crate::{Plan, SubsetError};

pub(crate) fn subset_cmap(
    font: &FontRef,
    plan: &Plan,
    builder: &mut FontBuilder,
) -> Result<(), SubsetError> {
    let cmap = match font.cmap() {
        Ok(table) => table,
        Err(ReadError::TableIsMissing(_)) => return Ok(()),
        Err(err) => return Err(err.into()),
    };
    let subtable = match cmap.unicode_subtable() {
        Ok(subtable) => subtable,
        // without a unicode subtable there is nothing to regenerate from;
        // gid-driven plans still work, the output just carries no cmap
        Err(ReadError::MalformedData(_)) => {
            log::warn!("no unicode cmap subtable, omitting cmap from the subset");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    let mappings: Vec<(u32, GlyphId)> = subtable
        .mappings()
        .into_iter()
        .filter_map(|(cp, old)| plan.remap(old).map(|new| (cp, new)))
        .collect();
    builder.add_table(&Cmap::from_mappings(mappings))?;
    Ok(())
}
