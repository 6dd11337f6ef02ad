//! types for working with raw big-endian bytes

/// A type with a fixed size, as encoded in a font file.
///
/// This is not the same as `std::mem::size_of`: it is the number of bytes
/// the type occupies in the big-endian binary encoding.
pub trait FixedSize: Sized {
    /// The encoded length, in bytes.
    const RAW_BYTE_LEN: usize;
}

/// A trait for font scalars.
///
/// This handles encoding and decoding the big-endian representation used
/// everywhere in sfnt data.
pub trait Scalar: FixedSize + Copy {
    /// The raw big-endian byte representation of this type.
    type Raw: Copy + AsRef<[u8]>;

    /// Encode this value as raw big-endian bytes.
    fn to_raw(self) -> Self::Raw;

    /// Create an instance of this type from raw big-endian bytes.
    fn from_raw(raw: Self::Raw) -> Self;

    /// Read an instance of this type from the front of `bytes`.
    ///
    /// Returns `None` if `bytes` is shorter than [`Self::RAW_BYTE_LEN`](FixedSize::RAW_BYTE_LEN).
    fn read(bytes: &[u8]) -> Option<Self>;
}

macro_rules! int_scalar {
    ($ty:ty, $len:literal) => {
        impl FixedSize for $ty {
            const RAW_BYTE_LEN: usize = $len;
        }

        impl Scalar for $ty {
            type Raw = [u8; $len];

            fn to_raw(self) -> Self::Raw {
                self.to_be_bytes()
            }

            fn from_raw(raw: Self::Raw) -> Self {
                Self::from_be_bytes(raw)
            }

            fn read(bytes: &[u8]) -> Option<Self> {
                bytes
                    .get(..$len)
                    .map(|b| Self::from_be_bytes(b.try_into().unwrap()))
            }
        }
    };
}

int_scalar!(u8, 1);
int_scalar!(i8, 1);
int_scalar!(u16, 2);
int_scalar!(i16, 2);
int_scalar!(u32, 4);
int_scalar!(i32, 4);
int_scalar!(u64, 8);
int_scalar!(i64, 8);

/// An internal macro for implementing [`Scalar`] for simple newtypes.
macro_rules! newtype_scalar {
    ($name:ident, $inner:ty) => {
        impl crate::raw::FixedSize for $name {
            const RAW_BYTE_LEN: usize = <$inner as crate::raw::FixedSize>::RAW_BYTE_LEN;
        }

        impl crate::raw::Scalar for $name {
            type Raw = <$inner as crate::raw::Scalar>::Raw;

            fn to_raw(self) -> Self::Raw {
                self.0.to_raw()
            }

            fn from_raw(raw: Self::Raw) -> Self {
                Self(crate::raw::Scalar::from_raw(raw))
            }

            fn read(bytes: &[u8]) -> Option<Self> {
                <$inner as crate::raw::Scalar>::read(bytes).map(Self)
            }
        }
    };
}

pub(crate) use newtype_scalar;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_ints() {
        assert_eq!(u16::read(&0xBEEF_u16.to_raw()), Some(0xBEEF));
        assert_eq!(i16::read(&(-3_i16).to_raw()), Some(-3));
        assert_eq!(u32::read(&0xCAFE_F00D_u32.to_raw()), Some(0xCAFE_F00D));
    }

    #[test]
    fn short_buffer() {
        assert_eq!(u32::read(&[0xde, 0xad]), None);
        assert_eq!(u16::read(&[]), None);
    }

    #[test]
    fn reads_leading_bytes_only() {
        assert_eq!(u16::read(&[0, 2, 0xff, 0xff]), Some(2));
    }
}
