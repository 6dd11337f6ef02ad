//! The [GSUB](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub) table

use sfnt_types::{GlyphId, Offset, Offset16, Tag};

use crate::records::RecordList;
use crate::tables::layout::{resolve_offset, CoverageTable};
use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// Lookup type discriminants, per the format definition.
pub mod lookup_type {
    pub const SINGLE: u16 = 1;
    pub const MULTIPLE: u16 = 2;
    pub const ALTERNATE: u16 = 3;
    pub const LIGATURE: u16 = 4;
    pub const CONTEXTUAL: u16 = 5;
    pub const CHAIN_CONTEXTUAL: u16 = 6;
    pub const EXTENSION: u16 = 7;
    pub const REVERSE: u16 = 8;
}

/// The glyph substitution table.
#[derive(Clone)]
pub struct Gsub<'a> {
    data: FontData<'a>,
}

impl TopLevelTable for Gsub<'_> {
    const TAG: Tag = Tag::new(b"GSUB");
}

impl<'a> FontRead<'a> for Gsub<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let major: u16 = data.read_at(0)?;
        if major != 1 {
            return Err(ReadError::InvalidFormat(major as i64));
        }
        // minor version, then script/feature/lookup list offsets
        data.check_in_bounds(10)?;
        Ok(Gsub { data })
    }
}

impl<'a> Gsub<'a> {
    /// The script list, as raw bytes.
    ///
    /// Scripts and features are carried through edits untouched, so no
    /// structured reader is provided.
    pub fn script_list_data(&self) -> Result<FontData<'a>, ReadError> {
        self.list_data(4)
    }

    /// The feature list, as raw bytes.
    pub fn feature_list_data(&self) -> Result<FontData<'a>, ReadError> {
        self.list_data(6)
    }

    /// Slice the list whose offset lives at `offset_pos` in the header.
    ///
    /// The format gives no explicit list lengths; a list extends to the
    /// nearest following header offset, or to the end of the table.
    fn list_data(&self, offset_pos: usize) -> Result<FontData<'a>, ReadError> {
        let start: Offset16 = self.data.read_at(offset_pos)?;
        let start = start.non_null().ok_or(ReadError::NullOffset)?;
        let mut end = self.data.len();
        for other_pos in [4usize, 6, 8] {
            if other_pos == offset_pos {
                continue;
            }
            let other: Offset16 = self.data.read_at(other_pos)?;
            let other = other.to_usize();
            if other > start && other < end {
                end = other;
            }
        }
        self.data.slice(start..end).ok_or(ReadError::OutOfBounds)
    }

    pub fn lookup_list(&self) -> Result<LookupList<'a>, ReadError> {
        let data = resolve_offset(self.data, 8)?;
        let offsets = RecordList::read(data)?;
        Ok(LookupList { data, offsets })
    }
}

/// The list of lookups in a GSUB table.
#[derive(Clone)]
pub struct LookupList<'a> {
    data: FontData<'a>,
    offsets: RecordList<'a, Offset16>,
}

impl<'a> LookupList<'a> {
    pub fn lookup_count(&self) -> u16 {
        self.offsets.count()
    }

    pub fn lookup(&self, index: usize) -> Result<Lookup<'a>, ReadError> {
        let offset = self
            .offsets
            .get(index)?
            .non_null()
            .ok_or(ReadError::NullOffset)?;
        let data = self.data.split_off(offset).ok_or(ReadError::OutOfBounds)?;
        Lookup::read(data)
    }

    pub fn lookups(&self) -> impl Iterator<Item = Result<Lookup<'a>, ReadError>> + '_ {
        (0..self.lookup_count() as usize).map(|i| self.lookup(i))
    }
}

/// A single lookup: a type, flags, and one or more subtables.
#[derive(Clone)]
pub struct Lookup<'a> {
    data: FontData<'a>,
    lookup_type: u16,
    lookup_flag: u16,
    subtable_offsets: Vec<u16>,
}

impl<'a> FontRead<'a> for Lookup<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let lookup_type: u16 = data.read_at(0)?;
        let lookup_flag: u16 = data.read_at(2)?;
        let subtable_count: u16 = data.read_at(4)?;
        let mut subtable_offsets = Vec::with_capacity(subtable_count as usize);
        for i in 0..subtable_count as usize {
            subtable_offsets.push(data.read_at(6 + i * 2)?);
        }
        Ok(Lookup {
            data,
            lookup_type,
            lookup_flag,
            subtable_offsets,
        })
    }
}

impl<'a> Lookup<'a> {
    pub fn lookup_type(&self) -> u16 {
        self.lookup_type
    }

    pub fn lookup_flag(&self) -> u16 {
        self.lookup_flag
    }

    pub fn subtable_count(&self) -> u16 {
        self.subtable_offsets.len() as u16
    }

    /// The subtable at `index`, resolved through the lookup's type.
    ///
    /// Extension subtables are unwrapped transparently; the returned value
    /// reports the wrapped type.
    pub fn subtable(&self, index: usize) -> Result<SubstitutionSubtable<'a>, ReadError> {
        let offset = *self
            .subtable_offsets
            .get(index)
            .ok_or(ReadError::OutOfBounds)?;
        let data = self
            .data
            .split_off(offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        SubstitutionSubtable::read_typed(data, self.lookup_type)
    }

    pub fn subtables(
        &self,
    ) -> impl Iterator<Item = Result<SubstitutionSubtable<'a>, ReadError>> + '_ {
        (0..self.subtable_offsets.len()).map(|i| self.subtable(i))
    }
}

/// A lookup subtable, resolved to its concrete kind.
///
/// Dispatch happens once, on the lookup type; every variant knows its own
/// type and reading data under the wrong type is an error, not a
/// reinterpretation.
#[derive(Clone)]
pub enum SubstitutionSubtable<'a> {
    Single(SingleSubst<'a>),
    Multiple(MultipleSubst<'a>),
    Alternate(AlternateSubst<'a>),
    Ligature(LigatureSubst<'a>),
    Contextual(ContextualSubst<'a>),
    ChainContextual(ChainContextualSubst<'a>),
    Reverse(ReverseSubst<'a>),
}

impl<'a> SubstitutionSubtable<'a> {
    pub fn read_typed(data: FontData<'a>, lookup_type: u16) -> Result<Self, ReadError> {
        match lookup_type {
            lookup_type::SINGLE => SingleSubst::read(data).map(SubstitutionSubtable::Single),
            lookup_type::MULTIPLE => MultipleSubst::read(data).map(SubstitutionSubtable::Multiple),
            lookup_type::ALTERNATE => {
                AlternateSubst::read(data).map(SubstitutionSubtable::Alternate)
            }
            lookup_type::LIGATURE => LigatureSubst::read(data).map(SubstitutionSubtable::Ligature),
            lookup_type::CONTEXTUAL => {
                ContextualSubst::read(data).map(SubstitutionSubtable::Contextual)
            }
            lookup_type::CHAIN_CONTEXTUAL => {
                ChainContextualSubst::read(data).map(SubstitutionSubtable::ChainContextual)
            }
            lookup_type::EXTENSION => Self::read_extension(data),
            lookup_type::REVERSE => ReverseSubst::read(data).map(SubstitutionSubtable::Reverse),
            other => Err(ReadError::InvalidFormat(other as i64)),
        }
    }

    /// Unwrap an extension subtable to its wrapped concrete subtable.
    fn read_extension(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format as i64));
        }
        let wrapped_type: u16 = data.read_at(2)?;
        if wrapped_type == lookup_type::EXTENSION {
            return Err(ReadError::MalformedData("nested extension lookup"));
        }
        let offset: u32 = data.read_at(4)?;
        let inner = data
            .split_off(offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        Self::read_typed(inner, wrapped_type)
    }

    /// The lookup type of the resolved subtable.
    pub fn lookup_type(&self) -> u16 {
        match self {
            SubstitutionSubtable::Single(_) => lookup_type::SINGLE,
            SubstitutionSubtable::Multiple(_) => lookup_type::MULTIPLE,
            SubstitutionSubtable::Alternate(_) => lookup_type::ALTERNATE,
            SubstitutionSubtable::Ligature(_) => lookup_type::LIGATURE,
            SubstitutionSubtable::Contextual(_) => lookup_type::CONTEXTUAL,
            SubstitutionSubtable::ChainContextual(_) => lookup_type::CHAIN_CONTEXTUAL,
            SubstitutionSubtable::Reverse(_) => lookup_type::REVERSE,
        }
    }
}

/// A single substitution subtable, either format.
#[derive(Clone)]
pub enum SingleSubst<'a> {
    /// All covered glyphs shift by one delta.
    Format1 {
        coverage: CoverageTable<'a>,
        delta_glyph_id: i16,
    },
    /// Covered glyphs map through a parallel substitute array.
    Format2 {
        coverage: CoverageTable<'a>,
        substitutes: RecordList<'a, GlyphId>,
    },
}

impl<'a> FontRead<'a> for SingleSubst<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        let coverage = CoverageTable::read(resolve_offset(data, 2)?)?;
        match format {
            1 => Ok(SingleSubst::Format1 {
                coverage,
                delta_glyph_id: data.read_at(4)?,
            }),
            2 => {
                let list_data = data.split_off(4).ok_or(ReadError::OutOfBounds)?;
                Ok(SingleSubst::Format2 {
                    coverage,
                    substitutes: RecordList::read(list_data)?,
                })
            }
            other => Err(ReadError::InvalidFormat(other as i64)),
        }
    }
}

impl<'a> SingleSubst<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        match self {
            SingleSubst::Format1 { coverage, .. } | SingleSubst::Format2 { coverage, .. } => {
                coverage
            }
        }
    }

    /// The substitute for `gid`, or `None` when uncovered.
    pub fn substitute(&self, gid: GlyphId) -> Result<Option<GlyphId>, ReadError> {
        match self {
            SingleSubst::Format1 {
                coverage,
                delta_glyph_id,
            } => Ok(coverage.get(gid).map(|_| {
                GlyphId::new(gid.to_u16().wrapping_add(*delta_glyph_id as u16))
            })),
            SingleSubst::Format2 {
                coverage,
                substitutes,
            } => match coverage.get(gid) {
                Some(index) => substitutes.get(index as usize).map(Some),
                None => Ok(None),
            },
        }
    }
}

/// A multiple substitution (one glyph to a sequence) subtable.
#[derive(Clone)]
pub struct MultipleSubst<'a> {
    data: FontData<'a>,
    coverage: CoverageTable<'a>,
    sequence_offsets: RecordList<'a, u16>,
}

impl<'a> FontRead<'a> for MultipleSubst<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format as i64));
        }
        let coverage = CoverageTable::read(resolve_offset(data, 2)?)?;
        let list_data = data.split_off(4).ok_or(ReadError::OutOfBounds)?;
        Ok(MultipleSubst {
            data,
            coverage,
            sequence_offsets: RecordList::read(list_data)?,
        })
    }
}

impl<'a> MultipleSubst<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        &self.coverage
    }

    pub fn sequence_count(&self) -> u16 {
        self.sequence_offsets.count()
    }

    /// The replacement sequence at coverage index `index`.
    pub fn sequence(&self, index: usize) -> Result<Vec<GlyphId>, ReadError> {
        let offset = self.sequence_offsets.get(index)?;
        let data = self
            .data
            .split_off(offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let glyphs: RecordList<GlyphId> = RecordList::read(data)?;
        glyphs.iter().collect()
    }
}

/// An alternate substitution (one glyph to a choice set) subtable.
#[derive(Clone)]
pub struct AlternateSubst<'a> {
    data: FontData<'a>,
    coverage: CoverageTable<'a>,
    set_offsets: RecordList<'a, u16>,
}

impl<'a> FontRead<'a> for AlternateSubst<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format as i64));
        }
        let coverage = CoverageTable::read(resolve_offset(data, 2)?)?;
        let list_data = data.split_off(4).ok_or(ReadError::OutOfBounds)?;
        Ok(AlternateSubst {
            data,
            coverage,
            set_offsets: RecordList::read(list_data)?,
        })
    }
}

impl<'a> AlternateSubst<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        &self.coverage
    }

    pub fn alternate_set_count(&self) -> u16 {
        self.set_offsets.count()
    }

    /// The alternates at coverage index `index`.
    pub fn alternate_set(&self, index: usize) -> Result<Vec<GlyphId>, ReadError> {
        let offset = self.set_offsets.get(index)?;
        let data = self
            .data
            .split_off(offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let glyphs: RecordList<GlyphId> = RecordList::read(data)?;
        glyphs.iter().collect()
    }
}

/// A ligature substitution (many glyphs to one) subtable.
#[derive(Clone)]
pub struct LigatureSubst<'a> {
    data: FontData<'a>,
    coverage: CoverageTable<'a>,
    set_offsets: RecordList<'a, u16>,
}

/// One ligature: a target glyph and the component glyphs that form it.
///
/// The first component is implied by the coverage table and not stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ligature {
    pub ligature_glyph: GlyphId,
    pub components: Vec<GlyphId>,
}

impl<'a> FontRead<'a> for LigatureSubst<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format as i64));
        }
        let coverage = CoverageTable::read(resolve_offset(data, 2)?)?;
        let list_data = data.split_off(4).ok_or(ReadError::OutOfBounds)?;
        Ok(LigatureSubst {
            data,
            coverage,
            set_offsets: RecordList::read(list_data)?,
        })
    }
}

impl<'a> LigatureSubst<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        &self.coverage
    }

    pub fn ligature_set_count(&self) -> u16 {
        self.set_offsets.count()
    }

    /// The ligatures whose first component is at coverage index `index`.
    pub fn ligature_set(&self, index: usize) -> Result<Vec<Ligature>, ReadError> {
        let offset = self.set_offsets.get(index)?;
        let set_data = self
            .data
            .split_off(offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let lig_offsets: RecordList<u16> = RecordList::read(set_data)?;
        let mut out = Vec::with_capacity(lig_offsets.count() as usize);
        for lig_offset in lig_offsets.iter() {
            let data = set_data
                .split_off(lig_offset? as usize)
                .ok_or(ReadError::OutOfBounds)?;
            let ligature_glyph: GlyphId = data.read_at(0)?;
            let component_count: u16 = data.read_at(2)?;
            if component_count == 0 {
                return Err(ReadError::MalformedData("ligature with zero components"));
            }
            let mut components = Vec::with_capacity(component_count as usize - 1);
            for i in 0..component_count as usize - 1 {
                components.push(data.read_at(4 + i * 2)?);
            }
            out.push(Ligature {
                ligature_glyph,
                components,
            });
        }
        Ok(out)
    }
}

/// An opaque contextual substitution subtable.
///
/// Context rules reference glyph positions and lookup indices that cannot
/// survive glyph renumbering without a full rewrite, so only the coverage
/// is exposed.
#[derive(Clone)]
pub struct ContextualSubst<'a> {
    data: FontData<'a>,
    format: u16,
}

impl<'a> FontRead<'a> for ContextualSubst<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        if !(1..=3).contains(&format) {
            return Err(ReadError::InvalidFormat(format as i64));
        }
        Ok(ContextualSubst { data, format })
    }
}

impl<'a> ContextualSubst<'a> {
    pub fn format(&self) -> u16 {
        self.format
    }

    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    /// The primary coverage table, where the format defines one.
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        match self.format {
            1 | 2 => CoverageTable::read(resolve_offset(self.data, 2)?),
            // format 3 stores an array of coverages; report the first
            _ => {
                let coverage_data = {
                    let offset: u16 = self.data.read_at(6)?;
                    self.data
                        .split_off(offset as usize)
                        .ok_or(ReadError::OutOfBounds)?
                };
                CoverageTable::read(coverage_data)
            }
        }
    }
}

/// An opaque chained contextual substitution subtable.
#[derive(Clone)]
pub struct ChainContextualSubst<'a> {
    data: FontData<'a>,
    format: u16,
}

impl<'a> FontRead<'a> for ChainContextualSubst<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        if !(1..=3).contains(&format) {
            return Err(ReadError::InvalidFormat(format as i64));
        }
        Ok(ChainContextualSubst { data, format })
    }
}

impl<'a> ChainContextualSubst<'a> {
    pub fn format(&self) -> u16 {
        self.format
    }

    pub fn data(&self) -> FontData<'a> {
        self.data
    }
}

/// An opaque reverse chaining single substitution subtable.
#[derive(Clone)]
pub struct ReverseSubst<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for ReverseSubst<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format as i64));
        }
        Ok(ReverseSubst { data })
    }
}

impl<'a> ReverseSubst<'a> {
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        CoverageTable::read(resolve_offset(self.data, 2)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        sfnt_test_data::test_fonts::gsub_table()
    }

    #[test]
    fn list_slices_stop_at_the_next_list() {
        let data = sample();
        let gsub = Gsub::read(FontData::new(&data)).unwrap();
        // the fixture carries empty script and feature lists, two bytes each
        assert_eq!(gsub.script_list_data().unwrap().as_bytes(), [0, 0]);
        assert_eq!(gsub.feature_list_data().unwrap().as_bytes(), [0, 0]);
    }

    #[test]
    fn populated_list_slices_have_true_extents() {
        let data = sfnt_test_data::test_fonts::gsub_table_with_scripts();
        let gsub = Gsub::read(FontData::new(&data)).unwrap();
        let scripts = gsub.script_list_data().unwrap();
        assert_eq!(scripts.len(), 38);
        assert_eq!(scripts.as_bytes()[..2], [0, 2]);
        let features = gsub.feature_list_data().unwrap();
        assert_eq!(features.len(), 26);
        assert_eq!(features.as_bytes()[..2], [0, 2]);
    }

    #[test]
    fn lookup_dispatch() {
        let data = sample();
        let gsub = Gsub::read(FontData::new(&data)).unwrap();
        let lookups = gsub.lookup_list().unwrap();
        assert_eq!(lookups.lookup_count(), 2);
        let single = lookups.lookup(0).unwrap();
        assert_eq!(single.lookup_type(), lookup_type::SINGLE);
        let ligature = lookups.lookup(1).unwrap();
        assert_eq!(ligature.lookup_type(), lookup_type::LIGATURE);
    }

    #[test]
    fn single_subst_lookup() {
        let data = sample();
        let gsub = Gsub::read(FontData::new(&data)).unwrap();
        let lookup = gsub.lookup_list().unwrap().lookup(0).unwrap();
        let SubstitutionSubtable::Single(single) = lookup.subtable(0).unwrap() else {
            panic!("expected a single substitution");
        };
        assert_eq!(single.substitute(GlyphId::new(1)), Ok(Some(GlyphId::new(5))));
        assert_eq!(single.substitute(GlyphId::new(3)), Ok(None));
    }

    #[test]
    fn ligature_sets() {
        let data = sample();
        let gsub = Gsub::read(FontData::new(&data)).unwrap();
        let lookup = gsub.lookup_list().unwrap().lookup(1).unwrap();
        let SubstitutionSubtable::Ligature(lig) = lookup.subtable(0).unwrap() else {
            panic!("expected a ligature substitution");
        };
        let sets = lig.ligature_set(0).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].ligature_glyph, GlyphId::new(7));
        assert_eq!(sets[0].components, [GlyphId::new(2)]);
    }

    #[test]
    fn type_confusion_is_an_error() {
        let data = sample();
        let gsub = Gsub::read(FontData::new(&data)).unwrap();
        let lookup = gsub.lookup_list().unwrap().lookup(0).unwrap();
        // read the single-subst subtable bytes as a ligature subst
        let offset: u16 = lookup.data.read_at(6).unwrap();
        let subtable_data = lookup.data.split_off(offset as usize).unwrap();
        let result = SubstitutionSubtable::read_typed(subtable_data, lookup_type::LIGATURE);
        assert_eq!(result.err(), Some(ReadError::InvalidFormat(2)));
    }
}
