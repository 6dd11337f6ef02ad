//! Writing the hmtx table.

use sfnt_read::tables::hmtx::{Hmtx as HmtxRef, LongMetric};
use sfnt_read::TopLevelTable;
use sfnt_types::Tag;

use crate::validate::{Validate, ValidationCtx};
use crate::write::{FontWrite, TableWriter};

/// An owned horizontal metrics table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hmtx {
    pub h_metrics: Vec<LongMetric>,
    /// Bare side bearings for the glyphs past the last long metric.
    pub left_side_bearings: Vec<i16>,
}

impl TopLevelTable for Hmtx {
    const TAG: Tag = Tag::new(b"hmtx");
}

impl Hmtx {
    pub fn new(h_metrics: Vec<LongMetric>, left_side_bearings: Vec<i16>) -> Self {
        Hmtx {
            h_metrics,
            left_side_bearings,
        }
    }

    pub fn from_table(table: &HmtxRef) -> Self {
        let h_metrics: Vec<_> = table.h_metrics().collect();
        let left_side_bearings = (table.number_of_h_metrics()..table.num_glyphs())
            .filter_map(|gid| table.side_bearing(sfnt_types::GlyphId::new(gid)).ok())
            .collect();
        Hmtx {
            h_metrics,
            left_side_bearings,
        }
    }

    /// The number of glyphs this table covers.
    pub fn num_glyphs(&self) -> usize {
        self.h_metrics.len() + self.left_side_bearings.len()
    }

    /// The value hhea's `number_of_h_metrics` must carry for this table.
    pub fn number_of_h_metrics(&self) -> u16 {
        self.h_metrics.len() as u16
    }
}

impl FontWrite for Hmtx {
    fn write_into(&self, writer: &mut TableWriter) {
        for metric in &self.h_metrics {
            writer.write(metric.advance);
            writer.write(metric.side_bearing);
        }
        for lsb in &self.left_side_bearings {
            writer.write(*lsb);
        }
    }
}

impl Validate for Hmtx {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("hmtx", |ctx| {
            ctx.in_field("h_metrics", |ctx| {
                ctx.check_array_len(self.h_metrics.len());
                if self.h_metrics.is_empty() && !self.left_side_bearings.is_empty() {
                    ctx.report("bare side bearings require at least one long metric");
                }
            });
        })
    }
}

#[cfg(test)]
mod tests {
    use sfnt_read::FontReadWithArgs;
    use sfnt_read::FontData;

    use super::*;
    use crate::dump_table;

    #[test]
    fn round_trip() {
        let bytes = sfnt_test_data::test_fonts::hmtx_table();
        let table = HmtxRef::read_with_args(
            FontData::new(&bytes),
            &(
                sfnt_test_data::test_fonts::NUMBER_OF_H_METRICS,
                sfnt_test_data::test_fonts::NUM_GLYPHS,
            ),
        )
        .unwrap();
        let hmtx = Hmtx::from_table(&table);
        assert_eq!(hmtx.left_side_bearings, [30, 20]);
        assert_eq!(dump_table(&hmtx).unwrap(), bytes);
    }

    #[test]
    fn bare_bearings_without_metrics_rejected() {
        let hmtx = Hmtx::new(vec![], vec![1, 2]);
        assert!(dump_table(&hmtx).is_err());
    }
}
