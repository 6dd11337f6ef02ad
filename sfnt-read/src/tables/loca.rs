//! The [loca](https://learn.microsoft.com/en-us/typography/opentype/spec/loca) table

use sfnt_types::Tag;

use crate::{FontData, FontReadWithArgs, ReadArgs, ReadError, TopLevelTable};

/// The storage format of loca offsets, selected by head.index_to_loc_format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocaFormat {
    /// Each entry is a `u16` storing the actual offset divided by two.
    Short,
    /// Each entry is a `u32` storing the actual offset.
    Long,
}

impl LocaFormat {
    pub fn from_i16(raw: i16) -> Result<LocaFormat, ReadError> {
        match raw {
            0 => Ok(LocaFormat::Short),
            1 => Ok(LocaFormat::Long),
            other => Err(ReadError::InvalidFormat(other as i64)),
        }
    }

    pub fn entry_size(self) -> usize {
        match self {
            LocaFormat::Short => 2,
            LocaFormat::Long => 4,
        }
    }
}

/// The index-to-location table.
///
/// A font with `n` glyphs stores `n + 1` offsets; glyph `i` occupies the
/// glyf bytes between offsets `i` and `i + 1`.
#[derive(Clone)]
pub struct Loca<'a> {
    data: FontData<'a>,
    format: LocaFormat,
}

impl TopLevelTable for Loca<'_> {
    const TAG: Tag = Tag::new(b"loca");
}

impl ReadArgs for Loca<'_> {
    type Args = LocaFormat;
}

impl<'a> FontReadWithArgs<'a> for Loca<'a> {
    fn read_with_args(data: FontData<'a>, args: &LocaFormat) -> Result<Self, ReadError> {
        if data.len() % args.entry_size() != 0 {
            return Err(ReadError::InvalidArrayLen);
        }
        Ok(Loca {
            data,
            format: *args,
        })
    }
}

impl<'a> Loca<'a> {
    pub fn format(&self) -> LocaFormat {
        self.format
    }

    /// The number of stored offsets.
    pub fn num_offsets(&self) -> usize {
        self.data.len() / self.format.entry_size()
    }

    /// The number of glyphs the table describes, one less than the offsets.
    pub fn num_glyphs(&self) -> usize {
        self.num_offsets().saturating_sub(1)
    }

    /// The actual glyf byte offset at entry `i`, with short entries doubled.
    pub fn get_raw(&self, i: usize) -> Result<u32, ReadError> {
        match self.format {
            LocaFormat::Short => {
                let half: u16 = self.data.read_at(i * 2)?;
                Ok(half as u32 * 2)
            }
            LocaFormat::Long => self.data.read_at(i * 4),
        }
    }

    /// All actual offsets, in order.
    pub fn offsets(&self) -> impl Iterator<Item = u32> + 'a {
        let this = self.clone();
        (0..this.num_offsets()).filter_map(move |i| this.get_raw(i).ok())
    }

    /// The glyf byte range of glyph `gid`, or `None` for an empty glyph.
    pub fn glyph_range(&self, gid: usize) -> Result<Option<std::ops::Range<usize>>, ReadError> {
        let start = self.get_raw(gid)? as usize;
        let end = self.get_raw(gid + 1)? as usize;
        if end < start {
            return Err(ReadError::MalformedData("loca offsets out of order"));
        }
        Ok((start != end).then_some(start..end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_offsets_are_doubled() {
        let bytes = [0x00, 0x00, 0x00, 0x09, 0x00, 0x0f];
        let loca = Loca::read_with_args(FontData::new(&bytes), &LocaFormat::Short).unwrap();
        assert_eq!(loca.num_glyphs(), 2);
        assert_eq!(loca.get_raw(1), Ok(18));
        assert_eq!(loca.get_raw(2), Ok(30));
        assert_eq!(loca.get_raw(3), Err(ReadError::OutOfBounds));
    }

    #[test]
    fn empty_glyph_has_no_range() {
        let bytes = [0x00, 0x00, 0x00, 0x00, 0x00, 0x09];
        let loca = Loca::read_with_args(FontData::new(&bytes), &LocaFormat::Short).unwrap();
        assert_eq!(loca.glyph_range(0), Ok(None));
        assert_eq!(loca.glyph_range(1), Ok(Some(0..18)));
    }

    #[test]
    fn ragged_length_rejected() {
        let bytes = [0x00, 0x00, 0x00];
        assert!(Loca::read_with_args(FontData::new(&bytes), &LocaFormat::Short).is_err());
    }
}
