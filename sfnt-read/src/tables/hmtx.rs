//! The [hmtx](https://learn.microsoft.com/en-us/typography/opentype/spec/hmtx) table

use sfnt_types::{GlyphId, Tag};

use crate::records::Record;
use crate::{FontData, FontReadWithArgs, ReadArgs, ReadError, TopLevelTable};

/// An advance width and left side bearing pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LongMetric {
    pub advance: u16,
    pub side_bearing: i16,
}

impl<'a> Record<'a> for LongMetric {
    const RECORD_SIZE: usize = 4;

    fn read_at(data: FontData<'a>, pos: usize) -> Result<Self, ReadError> {
        Ok(LongMetric {
            advance: data.read_at(pos)?,
            side_bearing: data.read_at(pos + 2)?,
        })
    }
}

/// The horizontal metrics table.
///
/// The table has no internal counts; both lengths come from hhea and maxp,
/// so this reader takes `(number_of_h_metrics, num_glyphs)` as arguments.
#[derive(Clone)]
pub struct Hmtx<'a> {
    data: FontData<'a>,
    number_of_h_metrics: u16,
    num_glyphs: u16,
}

impl TopLevelTable for Hmtx<'_> {
    const TAG: Tag = Tag::new(b"hmtx");
}

impl ReadArgs for Hmtx<'_> {
    type Args = (u16, u16);
}

impl<'a> FontReadWithArgs<'a> for Hmtx<'a> {
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError> {
        let (number_of_h_metrics, num_glyphs) = *args;
        let long_len = number_of_h_metrics as usize * LongMetric::RECORD_SIZE;
        let bearing_count = (num_glyphs as usize).saturating_sub(number_of_h_metrics as usize);
        data.check_in_bounds(long_len + bearing_count * 2)?;
        Ok(Hmtx {
            data,
            number_of_h_metrics,
            num_glyphs,
        })
    }
}

impl<'a> Hmtx<'a> {
    pub fn number_of_h_metrics(&self) -> u16 {
        self.number_of_h_metrics
    }

    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }

    /// The long metrics at the front of the table.
    pub fn h_metrics(&self) -> impl Iterator<Item = LongMetric> + 'a {
        let data = self.data;
        (0..self.number_of_h_metrics as usize)
            .filter_map(move |i| LongMetric::read_at(data, i * LongMetric::RECORD_SIZE).ok())
    }

    /// The advance width for `gid`.
    ///
    /// Glyphs past the last long metric share its advance.
    pub fn advance(&self, gid: GlyphId) -> Result<u16, ReadError> {
        if gid.to_u16() >= self.num_glyphs {
            return Err(ReadError::OutOfBounds);
        }
        let idx = gid.to_usize().min(self.number_of_h_metrics.saturating_sub(1) as usize);
        self.data.read_at(idx * LongMetric::RECORD_SIZE)
    }

    /// The left side bearing for `gid`.
    pub fn side_bearing(&self, gid: GlyphId) -> Result<i16, ReadError> {
        if gid.to_u16() >= self.num_glyphs {
            return Err(ReadError::OutOfBounds);
        }
        let idx = gid.to_usize();
        if idx < self.number_of_h_metrics as usize {
            self.data.read_at(idx * LongMetric::RECORD_SIZE + 2)
        } else {
            let base = self.number_of_h_metrics as usize * LongMetric::RECORD_SIZE;
            self.data
                .read_at(base + (idx - self.number_of_h_metrics as usize) * 2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2 long metrics then 2 bare side bearings, for 4 glyphs.
    const HMTX: [u8; 12] = [
        0x02, 0x2c, 0x00, 0x14, // advance 556, lsb 20
        0x01, 0xf4, 0xff, 0xf6, // advance 500, lsb -10
        0x00, 0x1e, // lsb 30
        0x00, 0x28, // lsb 40
    ];

    fn sample() -> Hmtx<'static> {
        Hmtx::read_with_args(FontData::new(&HMTX), &(2, 4)).unwrap()
    }

    #[test]
    fn long_metrics() {
        let hmtx = sample();
        assert_eq!(hmtx.advance(GlyphId::new(0)), Ok(556));
        assert_eq!(hmtx.side_bearing(GlyphId::new(1)), Ok(-10));
    }

    #[test]
    fn trailing_run_shares_last_advance() {
        let hmtx = sample();
        assert_eq!(hmtx.advance(GlyphId::new(2)), Ok(500));
        assert_eq!(hmtx.advance(GlyphId::new(3)), Ok(500));
        assert_eq!(hmtx.side_bearing(GlyphId::new(2)), Ok(30));
        assert_eq!(hmtx.side_bearing(GlyphId::new(3)), Ok(40));
    }

    #[test]
    fn gid_out_of_range() {
        let hmtx = sample();
        assert_eq!(hmtx.advance(GlyphId::new(4)), Err(ReadError::OutOfBounds));
    }

    #[test]
    fn truncated_table() {
        let result = Hmtx::read_with_args(FontData::new(&HMTX[..10]), &(2, 4));
        assert!(result.is_err());
    }
}
