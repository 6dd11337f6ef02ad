//! Writing the maxp table.

pub use sfnt_read::tables::maxp::{Maxp, MaxpProfile, VERSION_0_5, VERSION_1_0};

use crate::validate::{Validate, ValidationCtx};
use crate::write::{FontWrite, TableWriter};

impl FontWrite for Maxp {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write(self.version);
        writer.write(self.num_glyphs);
        if let Some(profile) = &self.profile {
            writer.write(profile.max_points);
            writer.write(profile.max_contours);
            writer.write(profile.max_composite_points);
            writer.write(profile.max_composite_contours);
            writer.write(profile.max_zones);
            writer.write(profile.max_twilight_points);
            writer.write(profile.max_storage);
            writer.write(profile.max_function_defs);
            writer.write(profile.max_instruction_defs);
            writer.write(profile.max_stack_elements);
            writer.write(profile.max_size_of_instructions);
            writer.write(profile.max_component_elements);
            writer.write(profile.max_component_depth);
        }
    }
}

impl Validate for Maxp {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("maxp", |ctx| {
            let wants_profile = self.version == VERSION_1_0;
            if wants_profile != self.profile.is_some() {
                ctx.in_field("profile", |ctx| {
                    ctx.report("profile must be present exactly for version 1.0")
                });
            }
            if !matches!(self.version, VERSION_0_5 | VERSION_1_0) {
                ctx.in_field("version", |ctx| ctx.report("unknown version"));
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
        let bytes = sfnt_test_data::test_fonts::maxp_table();
        let maxp = Maxp::read(FontData::new(&bytes)).unwrap();
        assert_eq!(dump_table(&maxp).unwrap(), bytes);
    }

    #[test]
    fn set_num_glyphs_does_not_touch_profile() {
        let bytes = sfnt_test_data::test_fonts::maxp_table();
        let mut maxp = Maxp::read(FontData::new(&bytes)).unwrap();
        let profile = maxp.profile;
        maxp.num_glyphs = 3;
        assert_eq!(maxp.profile, profile);
        let written = dump_table(&maxp).unwrap();
        assert_eq!(&written[4..6], [0, 3]);
        assert_eq!(written[6..], bytes[6..]);
    }
}
