//! Building and editing sfnt font files.
//!
//! Where [`sfnt_read`] parses tables in place, this crate owns its data:
//! tables are loaded into mutable builders, edited, and serialized back to
//! big-endian bytes. The top-level entry point is [`FontBuilder`], which
//! collects raw and typed tables and assembles a complete font file.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod error;
mod font_builder;
mod records;
mod util;
mod validate;
mod write;

pub mod tables;

pub use error::BuildError;
pub use font_builder::FontBuilder;
pub use records::RecordList;
pub use util::SearchRange;
pub use validate::{Validate, ValidationCtx, ValidationReport};
pub use write::{dump_table, FontWrite, TableWriter};

/// The corresponding parsing crate, reexported for convenience.
pub use sfnt_read as read;

/// The basic scalar types used in font data, reexported for convenience.
pub use sfnt_types as types;
