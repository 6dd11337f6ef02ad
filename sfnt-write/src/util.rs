//! Misc utility functions

/// The binary-search assist fields of a table directory or cmap4 header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchRange {
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
}

impl SearchRange {
    /// Compute the assist fields for `n_items` records of `item_size` bytes.
    pub fn compute(n_items: usize, item_size: usize) -> Self {
        if n_items == 0 {
            return SearchRange {
                search_range: 0,
                entry_selector: 0,
                range_shift: 0,
            };
        }
        let entry_selector = n_items.ilog2();
        let search_range = item_size * 2usize.pow(entry_selector);
        let range_shift = n_items * item_size - search_range;
        SearchRange {
            search_range: search_range as u16,
            entry_selector: entry_selector as u16,
            range_shift: range_shift as u16,
        }
    }
}

/// Round up to a multiple of four.
pub(crate) fn round4(sz: usize) -> usize {
    (sz + 3) & !3
}

/// Round up to a multiple of two.
pub(crate) fn round2(sz: usize) -> usize {
    (sz + 1) & !1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_range_for_directory() {
        // Based on Roboto's num tables
        let computed = SearchRange::compute(0x16, 16);
        assert_eq!(
            (
                computed.search_range,
                computed.entry_selector,
                computed.range_shift
            ),
            (256, 4, 96)
        );
    }

    #[test]
    fn rounding() {
        assert_eq!(round4(0), 0);
        assert_eq!(round4(1), 4);
        assert_eq!(round4(4), 4);
        assert_eq!(round2(17), 18);
    }
}
