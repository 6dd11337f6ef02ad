//! Writing the hhea table.

pub use sfnt_read::tables::hhea::Hhea;

use crate::validate::{Validate, ValidationCtx};
use crate::write::{FontWrite, TableWriter};

impl FontWrite for Hhea {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write(self.major_version);
        writer.write(self.minor_version);
        writer.write(self.ascender);
        writer.write(self.descender);
        writer.write(self.line_gap);
        writer.write(self.advance_width_max);
        writer.write(self.min_left_side_bearing);
        writer.write(self.min_right_side_bearing);
        writer.write(self.x_max_extent);
        writer.write(self.caret_slope_rise);
        writer.write(self.caret_slope_run);
        writer.write(self.caret_offset);
        // reserved
        writer.write_slice(&[0u8; 8]);
        writer.write(self.metric_data_format);
        writer.write(self.number_of_h_metrics);
    }
}

impl Validate for Hhea {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("hhea", |ctx| {
            if self.metric_data_format != 0 {
                ctx.in_field("metric_data_format", |ctx| ctx.report("expected 0"));
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use sfnt_read::{FontData, FontRead};

    use super::*;
    use crate::dump_table;

    #[test]
    fn round_trip() {
        let bytes = sfnt_test_data::test_fonts::hhea_table();
        let hhea = Hhea::read(FontData::new(&bytes)).unwrap();
        assert_eq!(dump_table(&hhea).unwrap(), bytes);
    }
}
