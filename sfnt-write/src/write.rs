//! Serialization of owned tables to big-endian bytes.

use sfnt_types::Scalar;

use crate::validate::{Validate, ValidationReport};

/// A type that can be written out as part of a font file.
pub trait FontWrite {
    /// Write our data into this [TableWriter].
    fn write_into(&self, writer: &mut TableWriter);
}

/// A byte sink for serializing a single table.
///
/// Offsets within a table are resolved by the table's own builder before
/// or while writing; the writer itself only appends bytes.
#[derive(Debug, Default)]
pub struct TableWriter {
    data: Vec<u8>,
}

/// Attempt to serialize a table.
///
/// If the table is malformed, this will return an Err([`ValidationReport`]),
/// otherwise it will return the bytes encoding the table.
pub fn dump_table<T: FontWrite + Validate>(table: &T) -> Result<Vec<u8>, ValidationReport> {
    table.validate()?;
    let mut writer = TableWriter::default();
    table.write_into(&mut writer);
    Ok(writer.into_data())
}

impl TableWriter {
    /// Append a scalar in its big-endian encoding.
    pub fn write<T: Scalar>(&mut self, value: T) {
        self.data.extend_from_slice(value.to_raw().as_ref());
    }

    pub fn write_slice(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// The number of bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append zero bytes until the length is a multiple of `align`.
    pub fn pad_to(&mut self, align: usize) {
        while self.data.len() % align != 0 {
            self.data.push(0);
        }
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

macro_rules! scalar_font_write {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FontWrite for $ty {
                fn write_into(&self, writer: &mut TableWriter) {
                    writer.write(*self)
                }
            }
        )*
    };
}

scalar_font_write!(
    u8,
    i8,
    u16,
    i16,
    u32,
    i32,
    i64,
    sfnt_types::Tag,
    sfnt_types::GlyphId,
);

impl<T: FontWrite> FontWrite for [T] {
    fn write_into(&self, writer: &mut TableWriter) {
        for item in self {
            item.write_into(writer);
        }
    }
}

#[cfg(test)]
mod tests {
    use sfnt_types::{GlyphId, Tag};

    use super::*;

    #[test]
    fn scalars_are_big_endian() {
        let mut writer = TableWriter::default();
        writer.write(0x0102u16);
        writer.write(-2i16);
        writer.write(Tag::new(b"glyf"));
        writer.write(GlyphId::new(7));
        assert_eq!(
            writer.into_data(),
            [0x01, 0x02, 0xff, 0xfe, b'g', b'l', b'y', b'f', 0x00, 0x07]
        );
    }

    #[test]
    fn padding() {
        let mut writer = TableWriter::default();
        writer.write_slice(&[1, 2, 3]);
        writer.pad_to(4);
        assert_eq!(writer.len(), 4);
        writer.pad_to(4);
        assert_eq!(writer.len(), 4);
    }
}
