//! Native addresses of backing buffers, for handing them to code that works on raw pointers.
//!
//! Nothing here is checked against a layout. Dereferencing a returned pointer
//! is `unsafe` and bypasses every size and bounds check of the rest of the
//! crate; keep such code at the FFI boundary.

use crate::{
    record::Record,
    records::Records,
    value::{Value, ValueMut},
};

/// Exposes the address of the first byte of a backing buffer.
pub trait RawAddress {
    /// Pointer to the first byte. Dangling (but non-null) for empty buffers.
    fn as_ptr(&self) -> *const u8;

    /// The address as an integer.
    fn addr(&self) -> usize {
        self.as_ptr() as usize
    }
}

/// Mutable counterpart of [RawAddress] for views that own write access.
pub trait RawAddressMut: RawAddress {
    fn as_mut_ptr(&mut self) -> *mut u8;
}

impl RawAddress for Value<'_> {
    fn as_ptr(&self) -> *const u8 {
        self.as_bytes().as_ptr()
    }
}

impl RawAddress for ValueMut<'_> {
    fn as_ptr(&self) -> *const u8 {
        self.as_bytes().as_ptr()
    }
}

impl RawAddressMut for ValueMut<'_> {
    fn as_mut_ptr(&mut self) -> *mut u8 {
        self.as_bytes_mut().as_mut_ptr()
    }
}

impl<B: AsRef<[u8]>> RawAddress for Record<B> {
    fn as_ptr(&self) -> *const u8 {
        self.as_bytes().as_ptr()
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> RawAddressMut for Record<B> {
    fn as_mut_ptr(&mut self) -> *mut u8 {
        self.as_bytes_mut().as_mut_ptr()
    }
}

impl<B: AsRef<[u8]>> RawAddress for Records<B> {
    fn as_ptr(&self) -> *const u8 {
        self.as_bytes().as_ptr()
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> RawAddressMut for Records<B> {
    fn as_mut_ptr(&mut self) -> *mut u8 {
        self.as_bytes_mut().as_mut_ptr()
    }
}
