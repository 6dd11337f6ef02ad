//! Writing and editing the loca table.

pub use sfnt_read::tables::loca::LocaFormat;
use sfnt_read::tables::loca::Loca as LocaRef;
use sfnt_read::TopLevelTable;
use sfnt_types::Tag;

use crate::error::BuildError;
use crate::validate::{Validate, ValidationCtx};
use crate::write::{FontWrite, TableWriter};

/// Short entries store offset / 2, so they top out at twice u16::MAX.
const SHORT_OFFSET_LIMIT: u32 = 0x2_0000;

/// An owned, editable index-to-location table.
///
/// Offsets are held in actual-byte form regardless of the output format;
/// the format is chosen at write time from the offsets themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Loca {
    offsets: Vec<u32>,
}

impl TopLevelTable for Loca {
    const TAG: Tag = Tag::new(b"loca");
}

impl Loca {
    pub fn new(offsets: Vec<u32>) -> Self {
        Loca { offsets }
    }

    pub fn from_table(table: &LocaRef) -> Self {
        Loca {
            offsets: table.offsets().collect(),
        }
    }

    /// The stored offsets, in actual bytes.
    pub fn loca_list(&self) -> &[u32] {
        &self.offsets
    }

    /// Replace the whole offset list.
    pub fn set_loca_list(&mut self, offsets: Vec<u32>) {
        self.offsets = offsets;
    }

    /// The number of loca entries.
    pub fn num_locas(&self) -> usize {
        self.offsets.len()
    }

    /// The number of glyphs the table describes.
    pub fn num_glyphs(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// The glyf offset of glyph `i`.
    pub fn glyph_offset(&self, i: usize) -> Result<u32, BuildError> {
        self.offsets
            .get(i)
            .copied()
            .ok_or(BuildError::IndexOutOfRange {
                index: i,
                len: self.offsets.len(),
            })
    }

    /// The byte length of glyph `i` in glyf.
    pub fn glyph_length(&self, i: usize) -> Result<u32, BuildError> {
        let start = self.glyph_offset(i)?;
        let end = self.glyph_offset(i + 1)?;
        Ok(end.saturating_sub(start))
    }

    /// The storage format these offsets will be written in.
    ///
    /// Short wins whenever it can represent every offset: all offsets even
    /// and the last one below the short limit.
    pub fn format(&self) -> LocaFormat {
        let last = self.offsets.last().copied().unwrap_or_default();
        if last < SHORT_OFFSET_LIMIT && self.offsets.iter().all(|off| off % 2 == 0) {
            LocaFormat::Short
        } else {
            LocaFormat::Long
        }
    }
}

impl FontWrite for Loca {
    fn write_into(&self, writer: &mut TableWriter) {
        match self.format() {
            LocaFormat::Short => {
                for off in &self.offsets {
                    writer.write((off / 2) as u16);
                }
            }
            LocaFormat::Long => {
                for off in &self.offsets {
                    writer.write(*off);
                }
            }
        }
    }
}

impl Validate for Loca {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("loca", |ctx| {
            if self.offsets.windows(2).any(|w| w[0] > w[1]) {
                ctx.in_field("offsets", |ctx| ctx.report("offsets must be ascending"));
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump_table;

    #[test]
    fn picks_short_when_even_and_small() {
        let loca = Loca::new(vec![0, 18, 36]);
        assert_eq!(loca.format(), LocaFormat::Short);
        assert_eq!(dump_table(&loca).unwrap(), [0, 0, 0, 9, 0, 18]);
    }

    #[test]
    fn odd_offset_forces_long() {
        let loca = Loca::new(vec![0, 17, 36]);
        assert_eq!(loca.format(), LocaFormat::Long);
        assert_eq!(dump_table(&loca).unwrap().len(), 12);
    }

    #[test]
    fn large_offset_forces_long() {
        let loca = Loca::new(vec![0, SHORT_OFFSET_LIMIT]);
        assert_eq!(loca.format(), LocaFormat::Long);
    }

    #[test]
    fn descending_offsets_rejected() {
        let loca = Loca::new(vec![0, 20, 10]);
        assert!(dump_table(&loca).is_err());
    }

    #[test]
    fn replacing_the_offset_list() {
        let mut loca = Loca::new(vec![0, 18]);
        let offsets: Vec<u32> = (0..1024).map(|i| i * 2).collect();
        loca.set_loca_list(offsets.clone());
        assert_eq!(loca.num_locas(), 1024);
        assert_eq!(loca.num_glyphs(), 1023);
        assert_eq!(loca.loca_list(), offsets.as_slice());
        assert_eq!(dump_table(&loca).unwrap().len(), 2048);
    }

    #[test]
    fn glyph_arithmetic() {
        let loca = Loca::new(vec![0, 18, 18, 40]);
        assert_eq!(loca.num_glyphs(), 3);
        assert_eq!(loca.glyph_offset(1).unwrap(), 18);
        assert_eq!(loca.glyph_length(1).unwrap(), 0);
        assert_eq!(loca.glyph_length(2).unwrap(), 22);
        assert!(loca.glyph_length(3).is_err());
    }
}
