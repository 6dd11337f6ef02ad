//! Writing the head table.
//!
//! The read-side type is already a plain owned struct, so it doubles as
//! the builder; this module adds serialization on top.

pub use sfnt_read::tables::head::Head;

use crate::validate::{Validate, ValidationCtx};
use crate::write::{FontWrite, TableWriter};

const MAGIC_NUMBER: u32 = 0x5F0F_3CF5;

impl FontWrite for Head {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write(self.major_version);
        writer.write(self.minor_version);
        writer.write(self.font_revision);
        writer.write(self.checksum_adjustment);
        writer.write(self.magic_number);
        writer.write(self.flags);
        writer.write(self.units_per_em);
        writer.write(self.created);
        writer.write(self.modified);
        writer.write(self.x_min);
        writer.write(self.y_min);
        writer.write(self.x_max);
        writer.write(self.y_max);
        writer.write(self.mac_style);
        writer.write(self.lowest_rec_ppem);
        writer.write(self.font_direction_hint);
        writer.write(self.index_to_loc_format);
        writer.write(self.glyph_data_format);
    }
}

impl Validate for Head {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("head", |ctx| {
            if self.magic_number != MAGIC_NUMBER {
                ctx.in_field("magic_number", |ctx| ctx.report("wrong magic number"));
            }
            if !(0..=1).contains(&self.index_to_loc_format) {
                ctx.in_field("index_to_loc_format", |ctx| {
                    ctx.report("expected 0 or 1")
                });
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
        let bytes = sfnt_test_data::test_fonts::simple_head();
        let head = Head::read(FontData::new(&bytes)).unwrap();
        assert_eq!(dump_table(&head).unwrap(), bytes);
    }

    #[test]
    fn bad_loca_format_rejected() {
        let bytes = sfnt_test_data::test_fonts::simple_head();
        let mut head = Head::read(FontData::new(&bytes)).unwrap();
        head.index_to_loc_format = 2;
        assert!(dump_table(&head).is_err());
    }
}
