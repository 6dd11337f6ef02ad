//! Building the GSUB table.

use std::collections::BTreeMap;

use sfnt_read::tables::gsub::{
    lookup_type, AlternateSubst, Gsub as GsubRef, Ligature, LigatureSubst, MultipleSubst,
    SingleSubst,
};
use sfnt_read::{ReadError, TopLevelTable};
use sfnt_types::{GlyphId, Tag};

use crate::validate::{Validate, ValidationCtx};
use crate::write::{FontWrite, TableWriter};

/// A glyph coverage set, written as whichever format encodes smaller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoverageTableBuilder {
    // invariant: sorted, deduplicated
    glyphs: Vec<GlyphId>,
}

impl FromIterator<GlyphId> for CoverageTableBuilder {
    fn from_iter<T: IntoIterator<Item = GlyphId>>(iter: T) -> Self {
        let mut glyphs: Vec<_> = iter.into_iter().collect();
        glyphs.sort_unstable();
        glyphs.dedup();
        CoverageTableBuilder { glyphs }
    }
}

impl CoverageTableBuilder {
    pub fn glyphs(&self) -> &[GlyphId] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    fn ranges(&self) -> Vec<(GlyphId, GlyphId)> {
        let mut ranges: Vec<(GlyphId, GlyphId)> = Vec::new();
        for gid in &self.glyphs {
            if let Some((_, end)) = ranges.last_mut() {
                if gid.to_u16() == end.to_u16() + 1 {
                    *end = *gid;
                    continue;
                }
            }
            ranges.push((*gid, *gid));
        }
        ranges
    }

}

impl FontWrite for CoverageTableBuilder {
    fn write_into(&self, writer: &mut TableWriter) {
        let ranges = self.ranges();
        if 4 + ranges.len() * 6 < 4 + self.glyphs.len() * 2 {
            writer.write(2u16);
            writer.write(ranges.len() as u16);
            let mut coverage_index = 0u16;
            for (start, end) in ranges {
                writer.write(start);
                writer.write(end);
                writer.write(coverage_index);
                coverage_index += end.to_u16() - start.to_u16() + 1;
            }
        } else {
            writer.write(1u16);
            writer.write(self.glyphs.len() as u16);
            for gid in &self.glyphs {
                writer.write(*gid);
            }
        }
    }
}

impl Validate for CoverageTableBuilder {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_field("coverage", |ctx| ctx.check_array_len(self.glyphs.len()));
    }
}

/// A single substitution builder; serializes as format 1 when every pair
/// shares one delta, format 2 otherwise.
#[derive(Clone, Debug, Default)]
pub struct SingleSubstBuilder {
    pairs: BTreeMap<GlyphId, GlyphId>,
}

impl SingleSubstBuilder {
    pub fn insert(&mut self, target: GlyphId, replacement: GlyphId) {
        self.pairs.insert(target, replacement);
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GlyphId, GlyphId)> + '_ {
        self.pairs.iter().map(|(k, v)| (*k, *v))
    }

    pub fn from_table(table: &SingleSubst) -> Result<Self, ReadError> {
        let mut out = SingleSubstBuilder::default();
        for gid in table.coverage().glyphs() {
            if let Some(replacement) = table.substitute(gid)? {
                out.insert(gid, replacement);
            }
        }
        Ok(out)
    }

    fn common_delta(&self) -> Option<i16> {
        let mut deltas = self
            .pairs
            .iter()
            .map(|(k, v)| v.to_u16().wrapping_sub(k.to_u16()) as i16);
        let first = deltas.next()?;
        deltas.all(|d| d == first).then_some(first)
    }

    fn coverage(&self) -> CoverageTableBuilder {
        self.pairs.keys().copied().collect()
    }
}

impl FontWrite for SingleSubstBuilder {
    fn write_into(&self, writer: &mut TableWriter) {
        let coverage = self.coverage();
        match self.common_delta() {
            Some(delta) => {
                writer.write(1u16);
                writer.write(6u16); // coverage directly after the header
                writer.write(delta);
            }
            None => {
                writer.write(2u16);
                writer.write((6 + self.pairs.len() * 2) as u16);
                writer.write(self.pairs.len() as u16);
                for replacement in self.pairs.values() {
                    writer.write(*replacement);
                }
            }
        }
        coverage.write_into(writer);
    }
}

impl Validate for SingleSubstBuilder {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("SingleSubst", |ctx| {
            ctx.check_array_len(self.pairs.len());
            self.coverage().validate_impl(ctx);
        })
    }
}

/// A multiple substitution builder.
#[derive(Clone, Debug, Default)]
pub struct MultipleSubstBuilder {
    sequences: BTreeMap<GlyphId, Vec<GlyphId>>,
}

impl MultipleSubstBuilder {
    pub fn insert(&mut self, target: GlyphId, replacement: Vec<GlyphId>) {
        self.sequences.insert(target, replacement);
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GlyphId, &[GlyphId])> + '_ {
        self.sequences.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn from_table(table: &MultipleSubst) -> Result<Self, ReadError> {
        let mut out = MultipleSubstBuilder::default();
        for (index, gid) in table.coverage().glyphs().into_iter().enumerate() {
            out.insert(gid, table.sequence(index)?);
        }
        Ok(out)
    }
}

impl FontWrite for MultipleSubstBuilder {
    fn write_into(&self, writer: &mut TableWriter) {
        write_sequence_lists(writer, &self.sequences, |seq| seq);
    }
}

impl Validate for MultipleSubstBuilder {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("MultipleSubst", |ctx| {
            ctx.check_array_len(self.sequences.len());
            if self.sequences.values().any(|seq| seq.is_empty()) {
                ctx.report("empty replacement sequence");
            }
        })
    }
}

/// An alternate substitution builder.
#[derive(Clone, Debug, Default)]
pub struct AlternateSubstBuilder {
    alternates: BTreeMap<GlyphId, Vec<GlyphId>>,
}

impl AlternateSubstBuilder {
    pub fn insert(&mut self, target: GlyphId, alternates: Vec<GlyphId>) {
        self.alternates.insert(target, alternates);
    }

    pub fn is_empty(&self) -> bool {
        self.alternates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GlyphId, &[GlyphId])> + '_ {
        self.alternates.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn from_table(table: &AlternateSubst) -> Result<Self, ReadError> {
        let mut out = AlternateSubstBuilder::default();
        for (index, gid) in table.coverage().glyphs().into_iter().enumerate() {
            out.insert(gid, table.alternate_set(index)?);
        }
        Ok(out)
    }
}

impl FontWrite for AlternateSubstBuilder {
    fn write_into(&self, writer: &mut TableWriter) {
        write_sequence_lists(writer, &self.alternates, |set| set);
    }
}

impl Validate for AlternateSubstBuilder {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("AlternateSubst", |ctx| {
            ctx.check_array_len(self.alternates.len());
            if self.alternates.values().any(|set| set.is_empty()) {
                ctx.report("empty alternate set");
            }
        })
    }
}

/// Multiple and alternate substitutions share a wire shape: a coverage
/// table plus per-glyph glyph lists behind an offset array.
fn write_sequence_lists<'a>(
    writer: &mut TableWriter,
    map: &'a BTreeMap<GlyphId, Vec<GlyphId>>,
    as_list: impl Fn(&'a Vec<GlyphId>) -> &'a [GlyphId],
) {
    let coverage: CoverageTableBuilder = map.keys().copied().collect();
    let count = map.len();
    writer.write(1u16);
    // lists follow the offset array, coverage comes last
    let mut next_offset = 6 + count * 2;
    let mut offsets = Vec::with_capacity(count);
    for list in map.values() {
        offsets.push(next_offset as u16);
        next_offset += 2 + as_list(list).len() * 2;
    }
    writer.write(next_offset as u16); // coverage offset
    writer.write(count as u16);
    for offset in offsets {
        writer.write(offset);
    }
    for list in map.values() {
        let list = as_list(list);
        writer.write(list.len() as u16);
        for gid in list {
            writer.write(*gid);
        }
    }
    coverage.write_into(writer);
}

/// A ligature substitution builder, keyed by first component.
#[derive(Clone, Debug, Default)]
pub struct LigatureSubstBuilder {
    ligatures: BTreeMap<GlyphId, Vec<Ligature>>,
}

impl LigatureSubstBuilder {
    pub fn insert(&mut self, first: GlyphId, ligature: Ligature) {
        self.ligatures.entry(first).or_default().push(ligature);
    }

    pub fn is_empty(&self) -> bool {
        self.ligatures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GlyphId, &[Ligature])> + '_ {
        self.ligatures.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn from_table(table: &LigatureSubst) -> Result<Self, ReadError> {
        let mut out = LigatureSubstBuilder::default();
        for (index, gid) in table.coverage().glyphs().into_iter().enumerate() {
            for ligature in table.ligature_set(index)? {
                out.insert(gid, ligature);
            }
        }
        Ok(out)
    }
}

impl FontWrite for LigatureSubstBuilder {
    fn write_into(&self, writer: &mut TableWriter) {
        let coverage: CoverageTableBuilder = self.ligatures.keys().copied().collect();
        let set_count = self.ligatures.len();
        // sets follow the offset array, coverage comes last
        let mut next_offset = 6 + set_count * 2;
        let mut set_offsets = Vec::with_capacity(set_count);
        for set in self.ligatures.values() {
            set_offsets.push(next_offset as u16);
            let ligatures_len: usize = set
                .iter()
                .map(|lig| 4 + lig.components.len() * 2)
                .sum();
            next_offset += 2 + set.len() * 2 + ligatures_len;
        }
        writer.write(1u16);
        writer.write(next_offset as u16); // coverage offset
        writer.write(set_count as u16);
        for offset in set_offsets {
            writer.write(offset);
        }
        for set in self.ligatures.values() {
            // offsets within the set are relative to the set itself
            writer.write(set.len() as u16);
            let mut lig_offset = 2 + set.len() * 2;
            for lig in set {
                writer.write(lig_offset as u16);
                lig_offset += 4 + lig.components.len() * 2;
            }
            for lig in set {
                writer.write(lig.ligature_glyph);
                writer.write((lig.components.len() + 1) as u16);
                for component in &lig.components {
                    writer.write(*component);
                }
            }
        }
        coverage.write_into(writer);
    }
}

impl Validate for LigatureSubstBuilder {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("LigatureSubst", |ctx| {
            ctx.check_array_len(self.ligatures.len());
        })
    }
}

/// A lookup subtable builder of one of the concrete substitution kinds.
#[derive(Clone, Debug)]
pub enum SubstitutionBuilder {
    Single(SingleSubstBuilder),
    Multiple(MultipleSubstBuilder),
    Alternate(AlternateSubstBuilder),
    Ligature(LigatureSubstBuilder),
}

impl SubstitutionBuilder {
    pub fn lookup_type(&self) -> u16 {
        match self {
            SubstitutionBuilder::Single(_) => lookup_type::SINGLE,
            SubstitutionBuilder::Multiple(_) => lookup_type::MULTIPLE,
            SubstitutionBuilder::Alternate(_) => lookup_type::ALTERNATE,
            SubstitutionBuilder::Ligature(_) => lookup_type::LIGATURE,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SubstitutionBuilder::Single(t) => t.is_empty(),
            SubstitutionBuilder::Multiple(t) => t.is_empty(),
            SubstitutionBuilder::Alternate(t) => t.is_empty(),
            SubstitutionBuilder::Ligature(t) => t.is_empty(),
        }
    }
}

impl FontWrite for SubstitutionBuilder {
    fn write_into(&self, writer: &mut TableWriter) {
        match self {
            SubstitutionBuilder::Single(t) => t.write_into(writer),
            SubstitutionBuilder::Multiple(t) => t.write_into(writer),
            SubstitutionBuilder::Alternate(t) => t.write_into(writer),
            SubstitutionBuilder::Ligature(t) => t.write_into(writer),
        }
    }
}

impl Validate for SubstitutionBuilder {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        match self {
            SubstitutionBuilder::Single(t) => t.validate_impl(ctx),
            SubstitutionBuilder::Multiple(t) => t.validate_impl(ctx),
            SubstitutionBuilder::Alternate(t) => t.validate_impl(ctx),
            SubstitutionBuilder::Ligature(t) => t.validate_impl(ctx),
        }
    }
}

/// A lookup under construction.
///
/// The declared type is kept even when the subtable list is empty, so a
/// lookup can be hollowed out without disturbing the indices that
/// features use to reference later lookups.
#[derive(Clone, Debug)]
pub struct LookupBuilder {
    pub lookup_type: u16,
    pub lookup_flag: u16,
    pub subtables: Vec<SubstitutionBuilder>,
}

impl LookupBuilder {
    pub fn new(lookup_type: u16, lookup_flag: u16) -> Self {
        LookupBuilder {
            lookup_type,
            lookup_flag,
            subtables: Vec::new(),
        }
    }

    /// A lookup with its declared type but no subtables.
    pub fn emptied(lookup_type: u16, lookup_flag: u16) -> Self {
        Self::new(lookup_type, lookup_flag)
    }
}

impl FontWrite for LookupBuilder {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write(self.lookup_type);
        writer.write(self.lookup_flag);
        writer.write(self.subtables.len() as u16);
        let mut next_offset = 6 + self.subtables.len() * 2;
        let mut bodies = Vec::with_capacity(self.subtables.len());
        for subtable in &self.subtables {
            let mut body = TableWriter::default();
            subtable.write_into(&mut body);
            let body = body.into_data();
            writer.write(next_offset as u16);
            next_offset += body.len();
            bodies.push(body);
        }
        for body in bodies {
            writer.write_slice(&body);
        }
    }
}

impl Validate for LookupBuilder {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("Lookup", |ctx| {
            ctx.check_array_len(self.subtables.len());
            for subtable in &self.subtables {
                if subtable.lookup_type() != self.lookup_type {
                    ctx.report("subtable kind disagrees with lookup type");
                }
                subtable.validate_impl(ctx);
            }
        })
    }
}

/// A GSUB table under construction.
///
/// Scripts and features are carried as raw bytes; glyph-level rewriting
/// only ever touches the lookups.
#[derive(Clone, Debug, Default)]
pub struct GsubBuilder {
    pub script_list: Vec<u8>,
    pub feature_list: Vec<u8>,
    pub lookups: Vec<LookupBuilder>,
}

impl TopLevelTable for GsubBuilder {
    const TAG: Tag = Tag::new(b"GSUB");
}

impl GsubBuilder {
    /// Capture the script and feature lists of an existing table.
    ///
    /// Lookups are not converted here; callers rebuild them explicitly.
    pub fn with_lists_from(table: &GsubRef) -> Result<Self, ReadError> {
        Ok(GsubBuilder {
            script_list: table.script_list_data()?.as_bytes().to_vec(),
            feature_list: table.feature_list_data()?.as_bytes().to_vec(),
            lookups: Vec::new(),
        })
    }
}

impl FontWrite for GsubBuilder {
    fn write_into(&self, writer: &mut TableWriter) {
        let script_offset = 10usize;
        let feature_offset = script_offset + self.script_list.len();
        let lookup_offset = feature_offset + self.feature_list.len();
        writer.write(1u16);
        writer.write(0u16);
        writer.write(script_offset as u16);
        writer.write(feature_offset as u16);
        writer.write(lookup_offset as u16);
        writer.write_slice(&self.script_list);
        writer.write_slice(&self.feature_list);
        // lookup list
        writer.write(self.lookups.len() as u16);
        let mut next_offset = 2 + self.lookups.len() * 2;
        let mut bodies = Vec::with_capacity(self.lookups.len());
        for lookup in &self.lookups {
            let mut body = TableWriter::default();
            lookup.write_into(&mut body);
            let body = body.into_data();
            writer.write(next_offset as u16);
            next_offset += body.len();
            bodies.push(body);
        }
        for body in bodies {
            writer.write_slice(&body);
        }
    }
}

impl Validate for GsubBuilder {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("GSUB", |ctx| {
            ctx.in_field("script_list", |ctx| {
                if self.script_list.len() < 2 {
                    ctx.report("missing script list count");
                }
            });
            ctx.in_field("feature_list", |ctx| {
                if self.feature_list.len() < 2 {
                    ctx.report("missing feature list count");
                }
            });
            // header offsets are u16; oversized lists would wrap them
            let lookup_offset = 10 + self.script_list.len() + self.feature_list.len();
            if lookup_offset > u16::MAX as usize {
                ctx.in_field("lookup_list_offset", |ctx| {
                    ctx.report("script and feature lists push the lookup list past 0xFFFF");
                });
            }
            ctx.in_field("lookups", |ctx| {
                ctx.check_array_len(self.lookups.len());
                for lookup in &self.lookups {
                    lookup.validate_impl(ctx);
                }
            });
        })
    }
}

#[cfg(test)]
mod tests {
    use sfnt_read::tables::gsub::SubstitutionSubtable;
    use sfnt_read::{FontData, FontRead};
    use sfnt_test_data::test_fonts;

    use super::*;
    use crate::dump_table;

    fn gid(raw: u16) -> GlyphId {
        GlyphId::new(raw)
    }

    #[test]
    fn coverage_format_choice() {
        // a long consecutive run encodes smaller as ranges
        let run: CoverageTableBuilder = (10..30).map(gid).collect();
        let bytes = dump_table(&run).unwrap();
        assert_eq!(bytes[..4], [0, 2, 0, 1]);
        // scattered glyphs stay a glyph list
        let scattered: CoverageTableBuilder = [2, 9, 40].into_iter().map(gid).collect();
        let bytes = dump_table(&scattered).unwrap();
        assert_eq!(bytes[..4], [0, 1, 0, 3]);
    }

    #[test]
    fn single_subst_uniform_delta_uses_format1() {
        let mut builder = SingleSubstBuilder::default();
        builder.insert(gid(4), gid(10));
        builder.insert(gid(5), gid(11));
        let bytes = dump_table(&builder).unwrap();
        assert_eq!(bytes[..2], [0, 1]);
        let parsed = SingleSubst::read(FontData::new(&bytes)).unwrap();
        assert_eq!(parsed.substitute(gid(4)), Ok(Some(gid(10))));
        assert_eq!(parsed.substitute(gid(5)), Ok(Some(gid(11))));
    }

    #[test]
    fn single_subst_mixed_uses_format2() {
        let mut builder = SingleSubstBuilder::default();
        builder.insert(gid(4), gid(10));
        builder.insert(gid(5), gid(3));
        let bytes = dump_table(&builder).unwrap();
        assert_eq!(bytes[..2], [0, 2]);
        let parsed = SingleSubst::read(FontData::new(&bytes)).unwrap();
        assert_eq!(parsed.substitute(gid(5)), Ok(Some(gid(3))));
        assert_eq!(parsed.substitute(gid(6)), Ok(None));
    }

    #[test]
    fn ligature_round_trip() {
        let mut builder = LigatureSubstBuilder::default();
        builder.insert(
            gid(1),
            Ligature {
                ligature_glyph: gid(7),
                components: vec![gid(2)],
            },
        );
        builder.insert(
            gid(1),
            Ligature {
                ligature_glyph: gid(8),
                components: vec![gid(2), gid(3)],
            },
        );
        let bytes = dump_table(&builder).unwrap();
        let parsed = LigatureSubst::read(FontData::new(&bytes)).unwrap();
        let set = parsed.ligature_set(0).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set[0].ligature_glyph, gid(7));
        assert_eq!(set[1].components, [gid(2), gid(3)]);
    }

    #[test]
    fn multiple_subst_round_trip() {
        let mut builder = MultipleSubstBuilder::default();
        builder.insert(gid(3), vec![gid(4), gid(5)]);
        let bytes = dump_table(&builder).unwrap();
        let parsed = MultipleSubst::read(FontData::new(&bytes)).unwrap();
        assert_eq!(parsed.sequence(0).unwrap(), [gid(4), gid(5)]);
    }

    #[test]
    fn rebuilt_gsub_parses() {
        let source_bytes = test_fonts::gsub_table();
        let source = GsubRef::read(FontData::new(&source_bytes)).unwrap();
        let mut builder = GsubBuilder::with_lists_from(&source).unwrap();
        let lookup_list = source.lookup_list().unwrap();
        for lookup in lookup_list.lookups() {
            let lookup = lookup.unwrap();
            let mut rebuilt = LookupBuilder::new(lookup.lookup_type(), lookup.lookup_flag());
            for subtable in lookup.subtables() {
                match subtable.unwrap() {
                    SubstitutionSubtable::Single(t) => rebuilt.subtables.push(
                        SubstitutionBuilder::Single(SingleSubstBuilder::from_table(&t).unwrap()),
                    ),
                    SubstitutionSubtable::Ligature(t) => rebuilt.subtables.push(
                        SubstitutionBuilder::Ligature(
                            LigatureSubstBuilder::from_table(&t).unwrap(),
                        ),
                    ),
                    _ => {}
                }
            }
            builder.lookups.push(rebuilt);
        }
        let bytes = dump_table(&builder).unwrap();
        let reparsed = GsubRef::read(FontData::new(&bytes)).unwrap();
        let lookups = reparsed.lookup_list().unwrap();
        assert_eq!(lookups.lookup_count(), 2);
        let SubstitutionSubtable::Single(single) =
            lookups.lookup(0).unwrap().subtable(0).unwrap()
        else {
            panic!("expected single substitution");
        };
        assert_eq!(single.substitute(gid(1)), Ok(Some(gid(5))));
    }

    #[test]
    fn captured_lists_stop_at_the_next_list() {
        let source_bytes = test_fonts::gsub_table();
        let source = GsubRef::read(FontData::new(&source_bytes)).unwrap();
        let builder = GsubBuilder::with_lists_from(&source).unwrap();
        assert_eq!(builder.script_list, [0, 0]);
        assert_eq!(builder.feature_list, [0, 0]);
    }

    #[test]
    fn script_and_feature_lists_round_trip() {
        let source_bytes = test_fonts::gsub_table_with_scripts();
        let source = GsubRef::read(FontData::new(&source_bytes)).unwrap();
        let mut builder = GsubBuilder::with_lists_from(&source).unwrap();
        let lookup = source.lookup_list().unwrap().lookup(0).unwrap();
        let SubstitutionSubtable::Single(single) = lookup.subtable(0).unwrap() else {
            panic!("expected single substitution");
        };
        let mut rebuilt = LookupBuilder::new(lookup.lookup_type(), lookup.lookup_flag());
        rebuilt.subtables.push(SubstitutionBuilder::Single(
            SingleSubstBuilder::from_table(&single).unwrap(),
        ));
        builder.lookups.push(rebuilt);

        let bytes = dump_table(&builder).unwrap();
        let reparsed = GsubRef::read(FontData::new(&bytes)).unwrap();
        assert_eq!(
            reparsed.script_list_data().unwrap().as_bytes(),
            source.script_list_data().unwrap().as_bytes()
        );
        assert_eq!(
            reparsed.feature_list_data().unwrap().as_bytes(),
            source.feature_list_data().unwrap().as_bytes()
        );
        let lookup = reparsed.lookup_list().unwrap().lookup(0).unwrap();
        let SubstitutionSubtable::Single(single) = lookup.subtable(0).unwrap() else {
            panic!("expected single substitution");
        };
        assert_eq!(single.substitute(gid(2)), Ok(Some(gid(6))));
    }

    #[test]
    fn oversized_lists_fail_validation() {
        let builder = GsubBuilder {
            script_list: vec![0; 70_000],
            feature_list: vec![0, 0],
            lookups: Vec::new(),
        };
        assert!(dump_table(&builder).is_err());
    }

    #[test]
    fn emptied_lookup_keeps_type() {
        let lookup = LookupBuilder::emptied(lookup_type::CONTEXTUAL, 0);
        let mut writer = TableWriter::default();
        lookup.write_into(&mut writer);
        assert_eq!(writer.into_data(), [0, 5, 0, 0, 0, 0]);
    }
}
