//! Common scalar types for sfnt font files.
//!
//! Everything in an sfnt container is stored big-endian. This crate defines
//! the scalar types shared by the read and write crates, along with the
//! [`Scalar`] trait that describes how each of them converts to and from its
//! raw byte representation.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod glyph_id;
mod offset;
mod raw;
mod tag;

pub use glyph_id::GlyphId;
pub use offset::{Offset, Offset16, Offset32};
pub use raw::{FixedSize, Scalar};
pub use tag::Tag;

/// A 16-bit signed quantity in font design units.
pub type FWord = i16;

/// A 16-bit unsigned quantity in font design units.
pub type UfWord = u16;

/// The sfnt version for fonts with TrueType outlines.
pub const TT_SFNT_VERSION: u32 = 0x0001_0000;

/// The sfnt version used by some legacy Apple TrueType fonts.
pub const TRUE_SFNT_VERSION: u32 = 0x7472_7565; // 'true'
