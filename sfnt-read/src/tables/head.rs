//! The [head](https://learn.microsoft.com/en-us/typography/opentype/spec/head) table

use sfnt_types::Tag;

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The font header table.
///
/// This table is small and fixed-size, so it is decoded into an owned
/// struct rather than borrowed from the font data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Head {
    pub major_version: u16,
    pub minor_version: u16,
    /// Set by font manufacturer; stored as a 16.16 fixed value.
    pub font_revision: i32,
    /// Checksum adjustment for the whole font file.
    pub checksum_adjustment: u32,
    /// Set to 0x5F0F3CF5.
    pub magic_number: u32,
    pub flags: u16,
    pub units_per_em: u16,
    /// Seconds since 1904-01-01, midnight.
    pub created: i64,
    pub modified: i64,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    pub mac_style: u16,
    pub lowest_rec_ppem: u16,
    pub font_direction_hint: i16,
    /// 0 for short loca offsets, 1 for long.
    pub index_to_loc_format: i16,
    pub glyph_data_format: i16,
}

impl TopLevelTable for Head {
    const TAG: Tag = Tag::new(b"head");
}

impl<'a> FontRead<'a> for Head {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        Ok(Head {
            major_version: cursor.read()?,
            minor_version: cursor.read()?,
            font_revision: cursor.read()?,
            checksum_adjustment: cursor.read()?,
            magic_number: cursor.read()?,
            flags: cursor.read()?,
            units_per_em: cursor.read()?,
            created: cursor.read()?,
            modified: cursor.read()?,
            x_min: cursor.read()?,
            y_min: cursor.read()?,
            x_max: cursor.read()?,
            y_max: cursor.read()?,
            mac_style: cursor.read()?,
            lowest_rec_ppem: cursor.read()?,
            font_direction_hint: cursor.read()?,
            index_to_loc_format: cursor.read()?,
            glyph_data_format: cursor.read()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test() {
        let data = sfnt_test_data::test_fonts::simple_head();
        let head = Head::read(FontData::new(&data)).unwrap();
        assert_eq!(head.magic_number, 0x5F0F3CF5);
        assert_eq!(head.units_per_em, 1000);
        assert_eq!(head.index_to_loc_format, 0);
    }

    #[test]
    fn truncated() {
        let data = sfnt_test_data::test_fonts::simple_head();
        assert_eq!(
            Head::read(FontData::new(&data[..20])),
            Err(ReadError::OutOfBounds)
        );
    }
}
