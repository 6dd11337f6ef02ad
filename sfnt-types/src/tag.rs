use std::fmt::{Debug, Display, Formatter};

/// An OpenType tag.
///
/// [Per the spec][spec], a tag is a 4-byte array where each byte is in the
/// printable ASCII range (`0x20..=0x7E`).
///
/// We do not strictly enforce this constraint, as it is possible to encounter
/// invalid tags in existing fonts, and these need to be representable.
///
/// [spec]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#data-types
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Construct a `Tag` from raw bytes.
    pub const fn new(src: &[u8; 4]) -> Tag {
        Tag(*src)
    }

    /// Construct a `Tag` from a big-endian `u32`.
    pub const fn from_u32(src: u32) -> Tag {
        Tag(src.to_be_bytes())
    }

    /// This tag as raw bytes.
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0
    }

    /// This tag as a big-endian `u32`.
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// The tag bytes, as a slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::borrow::Borrow<[u8; 4]> for Tag {
    fn borrow(&self) -> &[u8; 4] {
        &self.0
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<[u8; 4]> for Tag {
    fn eq(&self, other: &[u8; 4]) -> bool {
        &self.0 == other
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            // tags of fewer than four bytes are padded with spaces
            if byte.is_ascii_graphic() || byte == b' ' {
                Display::fmt(&(byte as char), f)?;
            } else {
                write!(f, "{{0x{byte:02X}}}")?;
            }
        }
        Ok(())
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag(\"{self}\")")
    }
}

impl crate::raw::FixedSize for Tag {
    const RAW_BYTE_LEN: usize = 4;
}

impl crate::raw::Scalar for Tag {
    type Raw = [u8; 4];

    fn to_raw(self) -> Self::Raw {
        self.0
    }

    fn from_raw(raw: Self::Raw) -> Self {
        Tag(raw)
    }

    fn read(bytes: &[u8]) -> Option<Self> {
        bytes.get(..4).map(|b| Tag(b.try_into().unwrap()))
    }
}
