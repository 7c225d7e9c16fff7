//! The closed set of fixed-width integers a field can hold.
//!
//! All integers are stored little-endian (least significant byte first).

/// Fixed-width integer kinds with a known byte width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Unsigned 8-bit integer.
    U8,
    /// Signed 8-bit integer.
    I8,
    /// Unsigned 16-bit integer.
    U16,
    /// Signed 16-bit integer.
    I16,
    /// Unsigned 32-bit integer.
    U32,
    /// Signed 32-bit integer.
    I32,
    /// Unsigned 64-bit integer.
    U64,
    /// Signed 64-bit integer.
    I64,
}

impl Kind {
    /// Width of the kind in bytes.
    pub const fn width(self) -> usize {
        match self {
            Kind::U8 | Kind::I8 => 1,
            Kind::U16 | Kind::I16 => 2,
            Kind::U32 | Kind::I32 => 4,
            Kind::U64 | Kind::I64 => 8,
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A Rust integer type that maps onto exactly one [Kind].
///
/// Implemented for `u8`, `i8`, `u16`, `i16`, `u32`, `i32`, `u64` and `i64`.
pub trait Primitive: sealed::Sealed + Copy {
    /// The kind this type is stored as.
    const KIND: Kind;
    /// Byte width, equal to `Self::KIND.width()`.
    const WIDTH: usize = Self::KIND.width();

    /// Encodes the value as little-endian bytes.
    fn to_le_vec(self) -> Vec<u8>;

    /// Decodes little-endian bytes. Returns `None` unless `bytes.len() == Self::WIDTH`.
    fn from_le_slice(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_primitive {
    ($($t:ty => $kind:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl Primitive for $t {
                const KIND: Kind = Kind::$kind;

                #[inline]
                fn to_le_vec(self) -> Vec<u8> {
                    self.to_le_bytes().to_vec()
                }

                #[inline]
                fn from_le_slice(bytes: &[u8]) -> Option<Self> {
                    bytes.try_into().ok().map(<$t>::from_le_bytes)
                }
            }
        )*
    };
}

impl_primitive!(
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
);
