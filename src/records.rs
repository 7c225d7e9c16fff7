//! A [Layout] bound to a buffer of repeated, fixed-stride records.
//!
//! Records handed out by [Records::at] and friends alias the array's buffer:
//! [Records::at_mut] and [Records::nth_mut] return a [Record] whose writes
//! land directly in the array. Use [Record::cloned] or [Records::cloned] for
//! a detached copy.

use std::{iter::StepBy, ops::Range, sync::Arc};

use crate::{errors::AccessError, layout::Layout, record::Record};

/// Consecutive records of one layout sharing a single buffer.
///
/// The stride is `layout.size()`; the buffer length must be an exact multiple of it.
///
/// ```
/// use std::sync::Arc;
/// use bytestruct::{field::Field, layout::Layout, records::Records};
///
/// let layout = Arc::new(Layout::inferred([Field::u16("id", 0), Field::u8("ttl", 2)]).unwrap());
/// let mut records = Records::new(layout, vec![0u8; 9]).unwrap();
///
/// records.nth_mut(1).unwrap().set("id", 7u16).unwrap();
///
/// assert_eq!(records.count(), 3);
/// assert_eq!(records.offsets().collect::<Vec<_>>(), [0, 3, 6]);
/// assert_eq!(records.at(3).unwrap().get::<u16>("id"), Ok(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Records<B = Vec<u8>> {
    layout: Arc<Layout>,
    buf: B,
}

impl Records<Vec<u8>> {
    /// `count` zero-filled records.
    ///
    /// Fails with [AccessError::OutOfBounds] if `count` records do not fit in
    /// a `usize` of bytes.
    pub fn zeroed(layout: Arc<Layout>, count: usize) -> Result<Self, AccessError> {
        let len = layout
            .size()
            .checked_mul(count)
            .ok_or(AccessError::OutOfBounds {
                offset: usize::MAX,
                len: usize::MAX,
            })?;

        Records::new(layout, vec![0u8; len])
    }
}

impl<B: AsRef<[u8]>> Records<B> {
    /// Binds `layout` to `buf`; the length of `buf` must be a multiple of `layout.size()`.
    pub fn new(layout: Arc<Layout>, buf: B) -> Result<Self, AccessError> {
        let len = buf.as_ref().len();
        let stride = layout.size();
        if stride == 0 || len % stride != 0 {
            return Err(AccessError::MisalignedLength { len, stride });
        }

        tracing::debug!(stride, count = len / stride, "record array bound");

        Ok(Records { layout, buf })
    }

    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    /// Bytes between the starts of consecutive records.
    pub fn stride(&self) -> usize {
        self.layout.size()
    }

    /// Number of records.
    pub fn count(&self) -> usize {
        self.buf.as_ref().len() / self.stride()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.as_ref().is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_ref()
    }

    pub fn into_inner(self) -> B {
        self.buf
    }

    /// Start offset of every record, ascending.
    pub fn offsets(&self) -> StepBy<Range<usize>> {
        (0..self.buf.as_ref().len()).step_by(self.stride())
    }

    /// Byte range of the record starting at `offset`.
    fn record_range(&self, offset: usize) -> Result<Range<usize>, AccessError> {
        let len = self.buf.as_ref().len();
        let stride = self.stride();

        let end = offset
            .checked_add(stride)
            .filter(|&end| end <= len)
            .ok_or(AccessError::OutOfBounds { offset, len })?;

        if offset % stride != 0 {
            return Err(AccessError::Misaligned { offset, stride });
        }

        Ok(offset..end)
    }

    fn index_offset(&self, index: usize) -> Result<usize, AccessError> {
        index
            .checked_mul(self.stride())
            .ok_or(AccessError::OutOfBounds {
                offset: usize::MAX,
                len: self.buf.as_ref().len(),
            })
    }

    /// Record starting at byte `offset`, borrowed from the array.
    pub fn at(&self, offset: usize) -> Result<Record<&[u8]>, AccessError> {
        let range = self.record_range(offset)?;
        Ok(Record::from_parts(
            Arc::clone(&self.layout),
            &self.buf.as_ref()[range],
        ))
    }

    /// Record number `index`, i.e. `at(index * stride)`.
    pub fn nth(&self, index: usize) -> Result<Record<&[u8]>, AccessError> {
        self.at(self.index_offset(index)?)
    }

    /// Copies every record in offset order.
    pub fn cloned(&self) -> Records<Vec<u8>> {
        Records {
            layout: Arc::clone(&self.layout),
            buf: self.buf.as_ref().to_vec(),
        }
    }

    /// Records with their start offsets, in ascending offset order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Record<&[u8]>)> {
        let stride = self.stride();
        let layout = &self.layout;

        self.buf
            .as_ref()
            .chunks_exact(stride)
            .enumerate()
            .map(move |(i, chunk)| (i * stride, Record::from_parts(Arc::clone(layout), chunk)))
    }

    /// Calls `visit` once per record, in ascending offset order.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(usize, Record<&[u8]>),
    {
        for (offset, record) in self.iter() {
            visit(offset, record);
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Records<B> {
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.buf.as_mut()
    }

    /// Record starting at byte `offset`; writes through it change the array.
    pub fn at_mut(&mut self, offset: usize) -> Result<Record<&mut [u8]>, AccessError> {
        let range = self.record_range(offset)?;
        Ok(Record::from_parts(
            Arc::clone(&self.layout),
            &mut self.buf.as_mut()[range],
        ))
    }

    pub fn nth_mut(&mut self, index: usize) -> Result<Record<&mut [u8]>, AccessError> {
        let offset = self.index_offset(index)?;
        self.at_mut(offset)
    }

    /// Overwrites the record at `offset` with the bytes of `record`.
    ///
    /// `record` must have a layout equal to this array's layout.
    pub fn update<R: AsRef<[u8]>>(
        &mut self,
        offset: usize,
        record: &Record<R>,
    ) -> Result<(), AccessError> {
        let range = self.record_range(offset)?;

        if !Arc::ptr_eq(&self.layout, record.layout()) && *self.layout != **record.layout() {
            return Err(AccessError::IncompatibleLayout);
        }

        tracing::trace!(offset, "record replaced");

        self.buf.as_mut()[range].copy_from_slice(record.as_bytes());
        Ok(())
    }

    /// [Records::update] by record index.
    pub fn update_nth<R: AsRef<[u8]>>(
        &mut self,
        index: usize,
        record: &Record<R>,
    ) -> Result<(), AccessError> {
        let offset = self.index_offset(index)?;
        self.update(offset, record)
    }

    /// Mutable records with their start offsets, in ascending offset order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, Record<&mut [u8]>)> {
        let stride = self.stride();
        let layout = Arc::clone(&self.layout);

        self.buf
            .as_mut()
            .chunks_exact_mut(stride)
            .enumerate()
            .map(move |(i, chunk)| (i * stride, Record::from_parts(Arc::clone(&layout), chunk)))
    }
}

impl<'a, B: AsRef<[u8]>> IntoIterator for &'a Records<B> {
    type Item = (usize, Record<&'a [u8]>);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
