//! Single-byte bit field arithmetic.
//!
//! Bits are addressed LSB-first inside the byte: offset 0 is the lowest bit,
//! offset 7 the highest. A range is valid when `length >= 1` and
//! `offset + length <= 8`.

use crate::errors::AccessError;

/// Checks that `offset`/`length` describe a non-empty range inside one byte.
pub fn check_range(offset: u8, length: u8) -> Result<(), AccessError> {
    if length == 0 || offset.checked_add(length).is_none_or(|end| end > 8) {
        return Err(AccessError::InvalidRange { offset, length });
    }

    Ok(())
}

/// Right-aligned mask of `length` ones. `length` must be in `1..=8`.
#[inline]
pub fn mask(length: u8) -> u8 {
    (((1u16) << length) - 1) as u8
}

/// Extracts the `length` bits at `offset`, right-aligned.
///
/// ```
/// use bytestruct::bits::get_bits;
///
/// assert_eq!(get_bits(0b1110_0110, 3, 2).unwrap(), 0b00);
/// assert_eq!(get_bits(0b1110_0110, 1, 2).unwrap(), 0b11);
/// ```
pub fn get_bits(byte: u8, offset: u8, length: u8) -> Result<u8, AccessError> {
    check_range(offset, length)?;

    Ok((byte >> offset) & mask(length))
}

/// Returns `byte` with the `length` bits at `offset` replaced by the low bits of `value`.
///
/// Bits of `value` above `length` are ignored; bits of `byte` outside the
/// range are left untouched.
//
// byte          = 0b1100_1010, offset = 4, length = 2, value = 0b10
// mask          = 0b0000_0011
// shifted_mask  = 0b0011_0000
// shifted_value = 0b0010_0000
// erased        = 0b1100_1010
// result        = 0b1110_1010
pub fn set_bits(byte: u8, offset: u8, length: u8, value: u8) -> Result<u8, AccessError> {
    check_range(offset, length)?;

    let mask = mask(length);
    let shifted_mask = mask << offset;
    let shifted_value = (value & mask) << offset;

    Ok((byte & !shifted_mask) | shifted_value)
}

/// In-place variant of [set_bits].
pub fn set_bits_in_place(
    byte: &mut u8,
    offset: u8,
    length: u8,
    value: u8,
) -> Result<(), AccessError> {
    *byte = set_bits(*byte, offset, length, value)?;
    Ok(())
}
