//! subsetter input parsing util functions

use std::collections::BTreeSet;

use sfnt_types::GlyphId;

use crate::SubsetError;

/// Parse the input gid string: a comma-separated list of decimal glyph
/// ids or id ranges, e.g. `1,5,9-12`.
pub fn populate_gids(gid_str: &str) -> Result<BTreeSet<GlyphId>, SubsetError> {
    let mut result = BTreeSet::new();
    for gid in gid_str.split(',').filter(|raw| !raw.is_empty()) {
        if let Some((start, end)) = gid.split_once('-') {
            let start: u16 = start
                .parse()
                .map_err(|_| SubsetError::InvalidGid(start.to_owned()))?;
            let end: u16 = end
                .parse()
                .map_err(|_| SubsetError::InvalidGid(end.to_owned()))?;
            if start > end {
                return Err(SubsetError::InvalidGidRange {
                    start: start as u32,
                    end: end as u32,
                });
            }
            result.extend((start..=end).map(GlyphId::new));
        } else {
            let glyph_id: u16 = gid
                .parse()
                .map_err(|_| SubsetError::InvalidGid(gid.to_owned()))?;
            result.insert(GlyphId::new(glyph_id));
        }
    }
    Ok(result)
}

/// Parse the input unicode string: a comma/whitespace-separated list of
/// codepoints or ranges as hex numbers, optionally prefixed with `U+`.
/// For example `--unicodes=41-5a,61-7a` adds the ASCII letters, as does
/// the more verbose `--unicodes=U+0041-005A,U+0061-007A`.
pub fn parse_unicodes(unicode_str: &str) -> Result<BTreeSet<u32>, SubsetError> {
    let mut result = BTreeSet::new();
    for cp in unicode_str
        .split([',', ';', ' ', '\t', '\n'])
        .filter(|raw| !raw.is_empty())
    {
        let cp = cp
            .trim_start_matches("U+")
            .trim_start_matches("u+")
            .trim_start_matches("0x");
        if let Some((start, end)) = cp.split_once('-') {
            let start = u32::from_str_radix(start, 16)
                .map_err(|_| SubsetError::InvalidUnicode(start.to_owned()))?;
            let end = u32::from_str_radix(end, 16)
                .map_err(|_| SubsetError::InvalidUnicode(end.to_owned()))?;
            if start > end {
                return Err(SubsetError::InvalidUnicodeRange { start, end });
            }
            result.extend(start..=end);
        } else {
            let unicode = u32::from_str_radix(cp, 16)
                .map_err(|_| SubsetError::InvalidUnicode(cp.to_owned()))?;
            result.insert(unicode);
        }
    }
    Ok(result)
}
