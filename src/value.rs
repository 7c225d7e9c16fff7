//! Typed byte values.
//!
//! A [Value] is just bytes. Whether those bytes are an integer, a
//! zero-terminated string or an opaque blob is decided by the conversion the
//! caller picks, not by a stored tag. A value either owns its bytes or borrows
//! them from a larger buffer; mutating a borrowed [Value] copies it first, so
//! only a [ValueMut] writes through to the buffer it came from.

use std::{borrow::Cow, ops::Deref};

use crate::{errors::AccessError, kind::Primitive};

/// Bytes with integer and text conversions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Value<'a> {
    bytes: Cow<'a, [u8]>,
}

impl Value<'static> {
    /// Takes ownership of `bytes`.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Value {
            bytes: Cow::Owned(bytes),
        }
    }

    /// Encodes `v` little-endian into a value of exactly `T::WIDTH` bytes.
    pub fn from_int<T: Primitive>(v: T) -> Self {
        Value::from_vec(v.to_le_vec())
    }

    /// Encodes `s` followed by exactly one zero byte.
    ///
    /// ```
    /// use bytestruct::value::Value;
    ///
    /// assert_eq!(Value::from_zstr("Hello").as_bytes(), b"Hello\0");
    /// ```
    pub fn from_zstr(s: &str) -> Self {
        let mut bytes = Vec::with_capacity(s.len() + 1);
        bytes.extend_from_slice(s.as_bytes());
        bytes.push(0);

        Value::from_vec(bytes)
    }
}

impl<'a> Value<'a> {
    /// Borrows `bytes` without copying.
    pub fn borrowed(bytes: &'a [u8]) -> Self {
        Value {
            bytes: Cow::Borrowed(bytes),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable access to the bytes. A borrowed value is copied first and
    /// never writes back into the buffer it was borrowed from.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.bytes.to_mut()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes.into_owned()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True if the bytes live in someone else's buffer.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.bytes, Cow::Borrowed(_))
    }

    /// Independent copy of the bytes.
    pub fn clone_owned(&self) -> Value<'static> {
        Value::from_vec(self.bytes.to_vec())
    }

    pub fn into_owned(self) -> Value<'static> {
        Value::from_vec(self.bytes.into_owned())
    }

    /// Decodes a little-endian integer. The value must be exactly `T::WIDTH` bytes long.
    pub fn to_int<T: Primitive>(&self) -> Result<T, AccessError> {
        decode(&self.bytes)
    }

    /// Returns the text before the trailing zero byte.
    ///
    /// Exactly one trailing byte is stripped; it is not checked to be zero.
    pub fn to_zstr(&self) -> Result<&str, AccessError> {
        let Some((_, text)) = self.bytes.split_last() else {
            return Err(AccessError::SizeMismatch {
                expected: 1,
                actual: 0,
            });
        };

        std::str::from_utf8(text).map_err(|_| AccessError::InvalidText)
    }
}

macro_rules! named_conversions {
    ($($t:ty => $from:ident, $to:ident);* $(;)?) => {
        impl Value<'static> {
            $(
                #[doc = concat!("Encodes a `", stringify!($t), "` value.")]
                pub fn $from(v: $t) -> Self {
                    Value::from_int(v)
                }
            )*
        }

        impl Value<'_> {
            $(
                #[doc = concat!("Decodes a `", stringify!($t), "`; fails unless the value is exactly its width.")]
                pub fn $to(&self) -> Result<$t, AccessError> {
                    self.to_int::<$t>()
                }
            )*
        }
    };
}

named_conversions! {
    u8 => from_u8, to_u8;
    i8 => from_i8, to_i8;
    u16 => from_u16, to_u16;
    i16 => from_i16, to_i16;
    u32 => from_u32, to_u32;
    i32 => from_i32, to_i32;
    u64 => from_u64, to_u64;
    i64 => from_i64, to_i64;
}

impl Deref for Value<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for Value<'_> {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for Value<'static> {
    fn from(bytes: Vec<u8>) -> Self {
        Value::from_vec(bytes)
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Value::borrowed(bytes)
    }
}

/// A mutable window onto a range of a larger buffer. Writes land in that buffer.
#[derive(Debug, PartialEq, Eq)]
pub struct ValueMut<'a> {
    bytes: &'a mut [u8],
}

impl<'a> ValueMut<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Self {
        ValueMut { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &*self.bytes
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Copy of the current bytes, detached from the buffer.
    pub fn to_value(&self) -> Value<'static> {
        Value::from_vec(self.bytes.to_vec())
    }

    pub fn to_int<T: Primitive>(&self) -> Result<T, AccessError> {
        decode(&*self.bytes)
    }

    /// Overwrites the window with `bytes`, which must be exactly as long.
    pub fn set(&mut self, bytes: impl AsRef<[u8]>) -> Result<(), AccessError> {
        let bytes = bytes.as_ref();
        if bytes.len() != self.bytes.len() {
            return Err(AccessError::SizeMismatch {
                expected: self.bytes.len(),
                actual: bytes.len(),
            });
        }

        self.bytes.copy_from_slice(bytes);
        Ok(())
    }

    pub fn set_int<T: Primitive>(&mut self, v: T) -> Result<(), AccessError> {
        self.set(v.to_le_vec())
    }
}

impl AsRef<[u8]> for ValueMut<'_> {
    fn as_ref(&self) -> &[u8] {
        &*self.bytes
    }
}

fn decode<T: Primitive>(bytes: &[u8]) -> Result<T, AccessError> {
    T::from_le_slice(bytes).ok_or(AccessError::SizeMismatch {
        expected: T::WIDTH,
        actual: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_integer_encoding_is_little_endian() {
        assert_eq!(Value::from_u16(0x0102).as_bytes(), &[0x02, 0x01]);
        assert_eq!(Value::from_i32(-2).as_bytes(), &[0xFE, 0xFF, 0xFF, 0xFF]);
        assert_eq!(
            Value::from_u64(0x0102_0304_0506_0708).as_bytes(),
            &[8, 7, 6, 5, 4, 3, 2, 1]
        );
    }

    #[test]
    fn test_integer_decoding() {
        let value = Value::from_vec(vec![0x2A, 0x00]);
        assert_eq!(value.to_u16(), Ok(42));
        assert_eq!(value.to_i16(), Ok(42));
        assert_eq!(Value::from_vec(vec![0x80]).to_i8(), Ok(-128));
    }

    #[test]
    fn test_integer_size_mismatch() {
        let value = Value::from_vec(vec![1, 2, 3]);
        assert_eq!(
            value.to_u32(),
            Err(AccessError::SizeMismatch {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            value.to_u16(),
            Err(AccessError::SizeMismatch {
                expected: 2,
                actual: 3
            })
        );
        assert!(Value::default().to_u8().is_err());
    }

    #[test]
    fn test_zstr() {
        let value = Value::from_zstr("Hello");
        assert_eq!(value.len(), 6);
        assert_eq!(value.to_zstr(), Ok("Hello"));
        assert_eq!(Value::from_zstr("").as_bytes(), &[0]);
    }

    #[test]
    fn test_zstr_strips_exactly_one_byte() {
        let value = Value::borrowed(b"ab\0\0");
        assert_eq!(value.to_zstr(), Ok("ab\0"));
    }

    #[test]
    fn test_zstr_errors() {
        assert_eq!(
            Value::default().to_zstr(),
            Err(AccessError::SizeMismatch {
                expected: 1,
                actual: 0
            })
        );
        assert_eq!(
            Value::borrowed(&[0xFF, 0xFE, 0]).to_zstr(),
            Err(AccessError::InvalidText)
        );
    }

    #[test]
    fn test_borrowed_value_does_not_copy() {
        let buf = [1u8, 2, 3];
        let value = Value::borrowed(&buf);
        assert!(value.is_borrowed());
        assert_eq!(value.as_bytes().as_ptr(), buf.as_ptr());
    }

    #[test]
    fn test_mutating_borrowed_value_detaches() {
        let buf = vec![1u8, 2, 3];
        let mut value = Value::borrowed(&buf);
        value.as_bytes_mut()[0] = 9;
        assert!(!value.is_borrowed());
        assert_eq!(value.as_bytes(), &[9, 2, 3]);
        assert_eq!(buf, vec![1, 2, 3]);
    }

    #[test]
    fn test_clone_owned_is_independent() {
        let original = Value::from_vec(vec![1, 2]);
        let mut copy = original.clone_owned();
        copy.as_bytes_mut()[0] = 7;
        assert_eq!(original.as_bytes(), &[1, 2]);
        assert_eq!(copy.as_bytes(), &[7, 2]);
    }

    #[test]
    fn test_value_mut_writes_through() {
        let mut buf = [0u8; 4];
        {
            let mut view = ValueMut::new(&mut buf[1..3]);
            view.set_int(0xBEEF_u16).unwrap();
            assert_eq!(view.to_int::<u16>(), Ok(0xBEEF));
        }
        assert_eq!(buf, [0, 0xEF, 0xBE, 0]);
    }

    #[test]
    fn test_value_mut_rejects_wrong_size() {
        let mut buf = [0u8; 4];
        let mut view = ValueMut::new(&mut buf);
        assert_eq!(
            view.set([1u8, 2]),
            Err(AccessError::SizeMismatch {
                expected: 4,
                actual: 2
            })
        );
        assert!(view.set_int(1u8).is_err());
    }

    macro_rules! int_round_trips {
        ($($t:ty => $name:ident, $from:ident, $to:ident);* $(;)?) => {
            proptest! {
                $(
                    #[test]
                    fn $name(v in any::<$t>()) {
                        let width = size_of::<$t>();
                        let value = Value::$from(v);
                        prop_assert_eq!(value.len(), width);
                        prop_assert_eq!(value.$to(), Ok(v));
                        prop_assert_eq!(Value::borrowed(value.as_bytes()).to_int::<$t>(), Ok(v));

                        let mut longer = value.into_bytes();
                        longer.push(0);
                        prop_assert_eq!(
                            Value::from_vec(longer).$to(),
                            Err(AccessError::SizeMismatch { expected: width, actual: width + 1 })
                        );
                    }
                )*
            }
        };
    }

    int_round_trips! {
        u8 => u8_round_trip, from_u8, to_u8;
        i8 => i8_round_trip, from_i8, to_i8;
        u16 => u16_round_trip, from_u16, to_u16;
        i16 => i16_round_trip, from_i16, to_i16;
        u32 => u32_round_trip, from_u32, to_u32;
        i32 => i32_round_trip, from_i32, to_i32;
        u64 => u64_round_trip, from_u64, to_u64;
        i64 => i64_round_trip, from_i64, to_i64;
    }

    proptest! {
        #[test]
        fn zstr_round_trip(s in "[^\\x00]*") {
            let value = Value::from_zstr(&s);
            prop_assert_eq!(value.len(), s.len() + 1);
            prop_assert_eq!(value.to_zstr(), Ok(s.as_str()));
        }
    }
}
