//! Offsets to tables and subtables.
//!
//! Offsets in sfnt data are always relative to some containing table, and a
//! value of zero frequently means "not present". The typed wrappers here keep
//! those semantics out of the call sites.

/// A trait for the different offset widths.
pub trait Offset: Copy {
    /// The offset as a usize, relative to the parent table.
    fn to_usize(self) -> usize;

    /// Returns `Some(self)` only if this offset is non-zero.
    fn non_null(self) -> Option<usize> {
        let raw = self.to_usize();
        (raw != 0).then_some(raw)
    }
}

macro_rules! offset_type {
    ($name:ident, $inner:ty, $docs:literal) => {
        #[doc = $docs]
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($inner);

        impl $name {
            /// Create a new offset.
            pub const fn new(raw: $inner) -> Self {
                Self(raw)
            }

            /// The raw offset value.
            pub const fn to_raw(self) -> $inner {
                self.0
            }
        }

        impl Offset for $name {
            fn to_usize(self) -> usize {
                self.0 as usize
            }
        }

        crate::raw::newtype_scalar!($name, $inner);
    };
}

offset_type!(Offset16, u16, "A 16-bit offset, relative to its parent table.");
offset_type!(Offset32, u32, "A 32-bit offset, relative to its parent table.");
