//! The [glyf](https://learn.microsoft.com/en-us/typography/opentype/spec/glyf) table

use sfnt_types::{GlyphId, Tag};

use crate::tables::loca::Loca;
use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The glyph data table.
///
/// The table is an undifferentiated blob of glyph descriptions; individual
/// glyphs are located through loca.
#[derive(Clone)]
pub struct Glyf<'a>(FontData<'a>);

impl TopLevelTable for Glyf<'_> {
    const TAG: Tag = Tag::new(b"glyf");
}

impl<'a> FontRead<'a> for Glyf<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Glyf(data))
    }
}

impl<'a> Glyf<'a> {
    pub fn data(&self) -> FontData<'a> {
        self.0
    }

    /// The raw bytes of glyph `gid`, located through `loca`.
    ///
    /// Empty glyphs yield an empty slice.
    pub fn glyph_data(&self, loca: &Loca<'a>, gid: GlyphId) -> Result<FontData<'a>, ReadError> {
        match loca.glyph_range(gid.to_usize())? {
            None => Ok(FontData::new(&[])),
            Some(range) => self.0.slice(range).ok_or(ReadError::OutOfBounds),
        }
    }

    /// The parsed glyph `gid`.
    pub fn glyph(&self, loca: &Loca<'a>, gid: GlyphId) -> Result<Glyph<'a>, ReadError> {
        Glyph::read(self.glyph_data(loca, gid)?)
    }
}

bitflags::bitflags! {
    /// Flags used in [`SimpleGlyph`] point data.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SimpleGlyphFlags: u8 {
        const ON_CURVE_POINT = 0x01;
        const X_SHORT_VECTOR = 0x02;
        const Y_SHORT_VECTOR = 0x04;
        const REPEAT_FLAG = 0x08;
        const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR = 0x10;
        const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR = 0x20;
        const OVERLAP_SIMPLE = 0x40;
    }
}

bitflags::bitflags! {
    /// Flags used in [`Component`] records.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CompositeGlyphFlags: u16 {
        const ARG_1_AND_2_ARE_WORDS = 0x0001;
        const ARGS_ARE_XY_VALUES = 0x0002;
        const ROUND_XY_TO_GRID = 0x0004;
        const WE_HAVE_A_SCALE = 0x0008;
        const MORE_COMPONENTS = 0x0020;
        const WE_HAVE_AN_X_AND_Y_SCALE = 0x0040;
        const WE_HAVE_A_TWO_BY_TWO = 0x0080;
        const WE_HAVE_INSTRUCTIONS = 0x0100;
        const USE_MY_METRICS = 0x0200;
        const OVERLAP_COMPOUND = 0x0400;
        const SCALED_COMPONENT_OFFSET = 0x0800;
        const UNSCALED_COMPONENT_OFFSET = 0x1000;
    }
}

/// Glyph header + flags, common to both glyph kinds.
const GLYPH_HEADER_LEN: usize = 10;

/// A parsed glyph description.
#[derive(Clone)]
pub enum Glyph<'a> {
    /// A glyph with no outline and no data.
    Empty,
    Simple(SimpleGlyph<'a>),
    Composite(CompositeGlyph<'a>),
}

impl<'a> Glyph<'a> {
    pub fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        if data.is_empty() {
            return Ok(Glyph::Empty);
        }
        let number_of_contours: i16 = data.read_at(0)?;
        // bounds: x_min, y_min, x_max, y_max
        data.check_in_bounds(GLYPH_HEADER_LEN)?;
        if number_of_contours < 0 {
            Ok(Glyph::Composite(CompositeGlyph { data }))
        } else {
            Ok(Glyph::Simple(SimpleGlyph {
                data,
                number_of_contours: number_of_contours as u16,
            }))
        }
    }
}

/// A glyph defined by its own contours.
///
/// Point data is carried opaquely; editing and subsetting treat simple
/// glyphs as indivisible byte blobs.
#[derive(Clone)]
pub struct SimpleGlyph<'a> {
    data: FontData<'a>,
    number_of_contours: u16,
}

impl<'a> SimpleGlyph<'a> {
    pub fn number_of_contours(&self) -> u16 {
        self.number_of_contours
    }

    pub fn x_min(&self) -> Result<i16, ReadError> {
        self.data.read_at(2)
    }

    pub fn y_min(&self) -> Result<i16, ReadError> {
        self.data.read_at(4)
    }

    pub fn x_max(&self) -> Result<i16, ReadError> {
        self.data.read_at(6)
    }

    pub fn y_max(&self) -> Result<i16, ReadError> {
        self.data.read_at(8)
    }
}

/// A glyph assembled from other glyphs.
#[derive(Clone)]
pub struct CompositeGlyph<'a> {
    data: FontData<'a>,
}

impl<'a> CompositeGlyph<'a> {
    /// The component records, in file order.
    pub fn components(&self) -> ComponentIter<'a> {
        ComponentIter {
            data: self.data,
            pos: GLYPH_HEADER_LEN,
            done: false,
        }
    }

    /// The glyph ids this composite references, without duplicates removed.
    pub fn component_gids(&self) -> impl Iterator<Item = Result<GlyphId, ReadError>> + 'a {
        self.components().map(|comp| comp.map(|c| c.glyph))
    }
}

/// A single component of a composite glyph.
#[derive(Clone, Copy, Debug)]
pub struct Component {
    pub flags: CompositeGlyphFlags,
    pub glyph: GlyphId,
    /// Byte offset of the component's glyph id within the glyph data.
    ///
    /// Subsetters rewrite ids in place at this position.
    pub gid_offset: usize,
}

/// Iterator over the components of a composite glyph.
///
/// Records are variable-size, so each step decodes the flags to find the
/// start of the next record. A malformed record ends iteration with an
/// error item.
pub struct ComponentIter<'a> {
    data: FontData<'a>,
    pos: usize,
    done: bool,
}

impl<'a> Iterator for ComponentIter<'a> {
    type Item = Result<Component, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let flags = match self.data.read_at::<u16>(self.pos) {
            Ok(raw) => CompositeGlyphFlags::from_bits_truncate(raw),
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        let gid_offset = self.pos + 2;
        let glyph = match self.data.read_at::<GlyphId>(gid_offset) {
            Ok(gid) => gid,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        let args_len = if flags.contains(CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS) {
            4
        } else {
            2
        };
        let transform_len = if flags.contains(CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO) {
            8
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            4
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_A_SCALE) {
            2
        } else {
            0
        };
        self.pos = gid_offset + 2 + args_len + transform_len;
        if !flags.contains(CompositeGlyphFlags::MORE_COMPONENTS) {
            self.done = true;
        }
        Some(Ok(Component {
            flags,
            glyph,
            gid_offset,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_glyph() {
        assert!(matches!(
            Glyph::read(FontData::new(&[])),
            Ok(Glyph::Empty)
        ));
    }

    #[test]
    fn simple_glyph_header() {
        let data = sfnt_test_data::test_fonts::simple_glyph_bytes();
        let glyph = Glyph::read(FontData::new(&data)).unwrap();
        let Glyph::Simple(simple) = glyph else {
            panic!("expected a simple glyph");
        };
        assert_eq!(simple.number_of_contours(), 1);
        assert_eq!(simple.x_min(), Ok(0));
    }

    #[test]
    fn composite_components() {
        let data = sfnt_test_data::test_fonts::composite_glyph_bytes(&[4, 6]);
        let glyph = Glyph::read(FontData::new(&data)).unwrap();
        let Glyph::Composite(composite) = glyph else {
            panic!("expected a composite glyph");
        };
        let gids: Vec<_> = composite
            .component_gids()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(gids, [GlyphId::new(4), GlyphId::new(6)]);
    }

    #[test]
    fn truncated_composite_errors() {
        let data = sfnt_test_data::test_fonts::composite_glyph_bytes(&[4, 6]);
        let truncated = FontData::new(&data[..GLYPH_HEADER_LEN + 3]);
        let glyph = Glyph::read(truncated).unwrap();
        let Glyph::Composite(composite) = glyph else {
            panic!("expected a composite glyph");
        };
        assert!(composite.component_gids().any(|c| c.is_err()));
    }
}
