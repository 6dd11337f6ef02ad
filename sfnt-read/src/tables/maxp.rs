//! The [maxp](https://learn.microsoft.com/en-us/typography/opentype/spec/maxp) table

use sfnt_types::Tag;

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// Version of the maxp table carrying only `num_glyphs`.
pub const VERSION_0_5: u32 = 0x0000_5000;
/// Full TrueType maxp version.
pub const VERSION_1_0: u32 = 0x0001_0000;

/// The maximum profile table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maxp {
    pub version: u32,
    pub num_glyphs: u16,
    /// The version 1.0 statistics, absent for version 0.5 tables.
    pub profile: Option<MaxpProfile>,
}

/// The TrueType-specific fields of a version 1.0 maxp table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaxpProfile {
    pub max_points: u16,
    pub max_contours: u16,
    pub max_composite_points: u16,
    pub max_composite_contours: u16,
    pub max_zones: u16,
    pub max_twilight_points: u16,
    pub max_storage: u16,
    pub max_function_defs: u16,
    pub max_instruction_defs: u16,
    pub max_stack_elements: u16,
    pub max_size_of_instructions: u16,
    pub max_component_elements: u16,
    pub max_component_depth: u16,
}

impl TopLevelTable for Maxp {
    const TAG: Tag = Tag::new(b"maxp");
}

impl<'a> FontRead<'a> for Maxp {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: u32 = cursor.read()?;
        let num_glyphs: u16 = cursor.read()?;
        let profile = match version {
            VERSION_0_5 => None,
            VERSION_1_0 => Some(MaxpProfile {
                max_points: cursor.read()?,
                max_contours: cursor.read()?,
                max_composite_points: cursor.read()?,
                max_composite_contours: cursor.read()?,
                max_zones: cursor.read()?,
                max_twilight_points: cursor.read()?,
                max_storage: cursor.read()?,
                max_function_defs: cursor.read()?,
                max_instruction_defs: cursor.read()?,
                max_stack_elements: cursor.read()?,
                max_size_of_instructions: cursor.read()?,
                max_component_elements: cursor.read()?,
                max_component_depth: cursor.read()?,
            }),
            other => return Err(ReadError::InvalidFormat(other as i64)),
        };
        Ok(Maxp {
            version,
            num_glyphs,
            profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_0_5_has_no_profile() {
        let bytes = [0x00, 0x00, 0x50, 0x00, 0x00, 0x08];
        let maxp = Maxp::read(FontData::new(&bytes)).unwrap();
        assert_eq!(maxp.num_glyphs, 8);
        assert!(maxp.profile.is_none());
    }

    #[test]
    fn unknown_version_rejected() {
        let bytes = [0x00, 0x02, 0x00, 0x00, 0x00, 0x08];
        assert_eq!(
            Maxp::read(FontData::new(&bytes)),
            Err(ReadError::InvalidFormat(0x0002_0000))
        );
    }
}
