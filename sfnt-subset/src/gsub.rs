//! Rewriting GSUB lookups for a subset plan.
//!
//! The four concrete substitution kinds are rebuilt with remapped glyph
//! ids, dropping entries that reference glyphs outside the subset.
//! Contextual and reverse subtables index into glyph sequences we do not
//! rewrite, so they are discarded; their lookups keep their slots (and
//! declared types) so that feature indices stay valid.

use sfnt_read::tables::gsub::{
    lookup_type, AlternateSubst, Ligature, LigatureSubst, Lookup, MultipleSubst, SingleSubst,
    SubstitutionSubtable,
};
use sfnt_read::{FontRef, ReadError, TableProvider};
use sfnt_types::GlyphId;
use sfnt_write::tables::gsub::{
    AlternateSubstBuilder, GsubBuilder, LigatureSubstBuilder, LookupBuilder, MultipleSubstBuilder,
    SingleSubstBuilder, SubstitutionBuilder,
};
use sfnt_write::FontBuilder;

use crate::{Plan, SubsetError};

pub(crate) fn subset_gsub(
    font: &FontRef,
    plan: &Plan,
    builder: &mut FontBuilder,
) -> Result<(), SubsetError> {
    let gsub = match font.gsub() {
        Ok(table) => table,
        Err(ReadError::TableIsMissing(_)) => return Ok(()),
        Err(err) => return Err(err.into()),
    };
    let mut out = GsubBuilder::with_lists_from(&gsub)?;
    for lookup in gsub.lookup_list()?.lookups() {
        out.lookups.push(subset_lookup(&lookup?, plan)?);
    }
    builder.add_table(&out)?;
    Ok(())
}

fn subset_lookup(lookup: &Lookup, plan: &Plan) -> Result<LookupBuilder, SubsetError> {
    let mut rebuilt = LookupBuilder::new(lookup.lookup_type(), lookup.lookup_flag());
    for i in 0..lookup.subtable_count() as usize {
        let subtable = match lookup.subtable(i)? {
            SubstitutionSubtable::Single(table) => {
                SubstitutionBuilder::Single(subset_single(&table, plan)?)
            }
            SubstitutionSubtable::Multiple(table) => {
                SubstitutionBuilder::Multiple(subset_multiple(&table, plan)?)
            }
            SubstitutionSubtable::Alternate(table) => {
                SubstitutionBuilder::Alternate(subset_alternate(&table, plan)?)
            }
            SubstitutionSubtable::Ligature(table) => {
                SubstitutionBuilder::Ligature(subset_ligature(&table, plan)?)
            }
            SubstitutionSubtable::Contextual(_)
            | SubstitutionSubtable::ChainContextual(_)
            | SubstitutionSubtable::Reverse(_) => continue,
        };
        if !subtable.is_empty() {
            rebuilt.subtables.push(subtable);
        }
    }
    // extension lookups unwrap to their payload type; the rebuilt lookup
    // declares that type directly
    if lookup.lookup_type() == lookup_type::EXTENSION {
        if let Some(first) = rebuilt.subtables.first() {
            rebuilt.lookup_type = first.lookup_type();
        }
    }
    Ok(rebuilt)
}

fn subset_single(table: &SingleSubst, plan: &Plan) -> Result<SingleSubstBuilder, SubsetError> {
    let mut builder = SingleSubstBuilder::default();
    for target in table.coverage().glyphs() {
        let Some(new_target) = plan.remap(target) else {
            continue;
        };
        let Some(replacement) = table.substitute(target)? else {
            continue;
        };
        let Some(new_replacement) = plan.remap(replacement) else {
            continue;
        };
        builder.insert(new_target, new_replacement);
    }
    Ok(builder)
}

fn subset_multiple(table: &MultipleSubst, plan: &Plan) -> Result<MultipleSubstBuilder, SubsetError> {
    let mut builder = MultipleSubstBuilder::default();
    for (index, target) in table.coverage().glyphs().into_iter().enumerate() {
        let Some(new_target) = plan.remap(target) else {
            continue;
        };
        // the whole sequence must survive or the entry is dropped
        let replacement: Option<Vec<GlyphId>> = table
            .sequence(index)?
            .iter()
            .map(|&gid| plan.remap(gid))
            .collect();
        let Some(replacement) = replacement else {
            continue;
        };
        builder.insert(new_target, replacement);
    }
    Ok(builder)
}

fn subset_alternate(
    table: &AlternateSubst,
    plan: &Plan,
) -> Result<AlternateSubstBuilder, SubsetError> {
    let mut builder = AlternateSubstBuilder::default();
    for (index, target) in table.coverage().glyphs().into_iter().enumerate() {
        let Some(new_target) = plan.remap(target) else {
            continue;
        };
        let alternates: Vec<GlyphId> = table
            .alternate_set(index)?
            .iter()
            .filter_map(|&gid| plan.remap(gid))
            .collect();
        if alternates.is_empty() {
            continue;
        }
        builder.insert(new_target, alternates);
    }
    Ok(builder)
}

fn subset_ligature(table: &LigatureSubst, plan: &Plan) -> Result<LigatureSubstBuilder, SubsetError> {
    let mut builder = LigatureSubstBuilder::default();
    for (index, first) in table.coverage().glyphs().into_iter().enumerate() {
        let Some(new_first) = plan.remap(first) else {
            continue;
        };
        for ligature in table.ligature_set(index)? {
            let Some(ligature_glyph) = plan.remap(ligature.ligature_glyph) else {
                continue;
            };
            let components: Option<Vec<GlyphId>> = ligature
                .components
                .iter()
                .map(|&gid| plan.remap(gid))
                .collect();
            let Some(components) = components else {
                continue;
            };
            builder.insert(
                new_first,
                Ligature {
                    ligature_glyph,
                    components,
                },
            );
        }
    }
    Ok(builder)
}
