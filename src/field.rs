//! Named regions of a byte buffer used to build a [crate::layout::Layout].

use std::ops::Range;

use crate::{
    bits,
    errors::{AccessError, LayoutError},
    kind::Kind,
    value::Value,
};

/// Bit range inside a single byte. Offset 0 is the least significant bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitSpec {
    offset: u8,
    len: u8,
}

impl BitSpec {
    /// Fails unless `len >= 1` and `offset + len <= 8`.
    pub fn new(offset: u8, len: u8) -> Result<Self, LayoutError> {
        bits::check_range(offset, len).map_err(|_| LayoutError::InvalidBitRange {
            offset,
            length: len,
        })?;

        Ok(BitSpec { offset, len })
    }

    pub fn offset(&self) -> u8 {
        self.offset
    }

    pub fn len(&self) -> u8 {
        self.len
    }
}

/// A single named field: a plain byte range, or a bit range inside one byte.
///
/// A field's byte range is `[offset, offset + len)`. Bit fields always have
/// `len == 1` and read and write as a single byte holding the right-aligned bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    name: String,
    offset: usize,
    len: usize,
    bits: Option<BitSpec>,
}

impl Field {
    /// Plain field covering `len` bytes at `offset`.
    pub fn new(name: impl Into<String>, offset: usize, len: usize) -> Self {
        Field {
            name: name.into(),
            offset,
            len,
            bits: None,
        }
    }

    /// Field sized for an integer of `kind`.
    pub fn of_kind(name: impl Into<String>, offset: usize, kind: Kind) -> Self {
        Field::new(name, offset, kind.width())
    }

    /// Bit field of `bit_len` bits starting `bit_offset` bits into the byte at `offset`.
    ///
    /// ```
    /// use bytestruct::field::Field;
    ///
    /// let flags = Field::bits("flags", 1, 3, 2).unwrap();
    /// assert_eq!(flags.byte_range(), Some(1..2));
    /// assert!(Field::bits("bad", 0, 3, 6).is_err());
    /// ```
    pub fn bits(
        name: impl Into<String>,
        offset: usize,
        bit_offset: u8,
        bit_len: u8,
    ) -> Result<Self, LayoutError> {
        let spec = BitSpec::new(bit_offset, bit_len)?;

        Ok(Field {
            name: name.into(),
            offset,
            len: 1,
            bits: Some(spec),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bit_spec(&self) -> Option<BitSpec> {
        self.bits
    }

    pub fn is_bit_field(&self) -> bool {
        self.bits.is_some()
    }

    /// One past the last byte covered by this field, or `None` if that
    /// does not fit in a `usize`.
    pub fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.len)
    }

    pub fn byte_range(&self) -> Option<Range<usize>> {
        self.end().map(|end| self.offset..end)
    }

    /// Borrows the field's bytes out of `buf`.
    pub(crate) fn slice<'b>(&self, buf: &'b [u8]) -> Result<&'b [u8], AccessError> {
        self.byte_range()
            .and_then(|range| buf.get(range))
            .ok_or(AccessError::OutOfBounds {
                offset: self.offset,
                len: buf.len(),
            })
    }

    pub(crate) fn slice_mut<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], AccessError> {
        let len = buf.len();
        self.byte_range()
            .and_then(|range| buf.get_mut(range))
            .ok_or(AccessError::OutOfBounds {
                offset: self.offset,
                len,
            })
    }

    /// Reads the field out of `buf` as an independent copy.
    ///
    /// For a bit field the result is a single byte holding the extracted bits.
    pub fn extract(&self, buf: &[u8]) -> Result<Value<'static>, AccessError> {
        self.view(buf).map(Value::into_owned)
    }

    /// Like [Field::extract] but borrows plain fields from `buf` instead of copying them.
    pub fn view<'b>(&self, buf: &'b [u8]) -> Result<Value<'b>, AccessError> {
        let bytes = self.slice(buf)?;

        match self.bits {
            None => Ok(Value::borrowed(bytes)),
            Some(spec) => {
                let extracted = bits::get_bits(bytes[0], spec.offset, spec.len)?;
                Ok(Value::from_vec(vec![extracted]))
            }
        }
    }

    /// Writes `value` into the field's bytes of `buf`.
    ///
    /// Plain fields need a value of exactly `len` bytes. Bit fields need
    /// exactly one byte, of which only the low `bit_len` bits are stored;
    /// the other bits of the target byte are preserved.
    pub fn write(&self, buf: &mut [u8], value: impl AsRef<[u8]>) -> Result<(), AccessError> {
        let value = value.as_ref();
        if value.len() != self.len {
            return Err(AccessError::SizeMismatch {
                expected: self.len,
                actual: value.len(),
            });
        }

        let target = self.slice_mut(buf)?;

        match self.bits {
            None => target.copy_from_slice(value),
            Some(spec) => bits::set_bits_in_place(&mut target[0], spec.offset, spec.len, value[0])?,
        }

        Ok(())
    }
}

macro_rules! kind_constructors {
    ($($fn_name:ident => $kind:ident),* $(,)?) => {
        impl Field {
            $(
                #[doc = concat!("Field sized for a `", stringify!($fn_name), "` at `offset`.")]
                pub fn $fn_name(name: impl Into<String>, offset: usize) -> Self {
                    Field::of_kind(name, offset, Kind::$kind)
                }
            )*
        }
    };
}

kind_constructors!(
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
);
