//! Reading sfnt font files.
//!
//! This crate provides a low-level interface for parsing the binary sfnt
//! container and the TrueType tables it carries. Parsing is zero-copy:
//! tables borrow the underlying font bytes, and all reads are bounds
//! checked against the lengths declared in the data itself.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod directory;
mod font_data;
mod read;
mod records;
mod table_provider;

pub mod tables;

pub use directory::{compute_checksum, verify_checksums, TableDirectory, TableRecord};
pub use font_data::{Cursor, FontData};
pub use read::{FontRead, FontReadWithArgs, ReadArgs, ReadError};
pub use records::{Record, RecordList, RecordListLayout};
pub use table_provider::{TableProvider, TopLevelTable};

use sfnt_types::Tag;

/// Reference to an in-memory font.
///
/// This is a simple implementation of the [`TableProvider`] trait backed
/// by a borrowed slice containing font data. TrueType collections are not
/// supported; the data must begin with a table directory.
#[derive(Clone)]
pub struct FontRef<'a> {
    data: FontData<'a>,
    table_directory: TableDirectory<'a>,
}

impl<'a> FontRef<'a> {
    /// Creates a new reference to an in-memory font backed by the given data.
    ///
    /// Fails if the data does not begin with a table directory carrying a
    /// recognized sfnt version, or if the directory itself is truncated.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let table_directory = TableDirectory::read(data)?;
        Ok(FontRef {
            data,
            table_directory,
        })
    }

    /// Returns the underlying font data.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    /// Returns the associated table directory.
    pub fn table_directory(&self) -> &TableDirectory<'a> {
        &self.table_directory
    }

    /// Returns the data for the table with the specified tag, if present.
    ///
    /// Returns `None` both when the directory has no entry for `tag` and
    /// when the entry's declared range falls outside the font data.
    pub fn table_data(&self, tag: Tag) -> Option<FontData<'a>> {
        let record = self.table_directory.find_record(tag)?;
        let start = record.offset as usize;
        let end = start.checked_add(record.length as usize)?;
        self.data.slice(start..end)
    }

    /// Verify every table against its directory checksum.
    pub fn verify_checksums(&self) -> Result<(), ReadError> {
        verify_checksums(self.data, &self.table_directory)
    }
}

impl<'a> TableProvider<'a> for FontRef<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>> {
        self.table_data(tag)
    }
}
