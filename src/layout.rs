//! Layout: an immutable set of named fields plus a total byte size.
//!
//! Build a [Layout] once, wrap it in an [std::sync::Arc] and bind it to as
//! many buffers as needed with [crate::record::Record] and
//! [crate::records::Records].

use std::collections::{BTreeMap, btree_map::Entry};

use crate::{
    errors::{AccessError, FieldKey, LayoutError},
    field::Field,
};

/// How the total size of a [Layout] is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutSize {
    /// Exactly this many bytes; must be at least what the fields need.
    Fixed(usize),
    /// Exactly what the fields need: the furthest field end.
    Inferred,
}

/// Named fields over a fixed-size byte buffer.
///
/// Field byte ranges may overlap, which gives union-like layouts: writing
/// through one field is visible when reading through any field that shares
/// its bytes.
///
/// Equality is structural: same size and the same set of fields, regardless
/// of the order the fields were given in.
///
/// ```
/// use bytestruct::{field::Field, layout::{Layout, LayoutSize}};
///
/// let layout = Layout::new(
///     LayoutSize::Inferred,
///     [Field::u32("id", 0), Field::u16("port", 4), Field::bits("flag", 6, 0, 1).unwrap()],
/// )
/// .unwrap();
/// assert_eq!(layout.size(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "crate::serde::LayoutDef", try_from = "crate::serde::LayoutDef")
)]
pub struct Layout {
    fields: BTreeMap<String, Field>,
    size: usize,
}

impl Layout {
    /// Builds a layout from `fields`.
    ///
    /// Fails with [LayoutError::EmptyLayout] without fields, with
    /// [LayoutError::DuplicateField] if two fields share a name, and with
    /// [LayoutError::LayoutTooSmall] if a fixed size cannot hold every field.
    /// A field whose end does not fit in a `usize` is a
    /// [LayoutError::FieldOverflow].
    pub fn new(
        size: LayoutSize,
        fields: impl IntoIterator<Item = Field>,
    ) -> Result<Self, LayoutError> {
        let mut map: BTreeMap<String, Field> = BTreeMap::new();

        for field in fields {
            match map.entry(field.name().to_owned()) {
                Entry::Occupied(entry) => {
                    return Err(LayoutError::DuplicateField(entry.key().clone()));
                }
                Entry::Vacant(entry) => {
                    entry.insert(field);
                }
            }
        }

        if map.is_empty() {
            return Err(LayoutError::EmptyLayout);
        }

        let required = map.values().try_fold(0, |required: usize, field| {
            field
                .end()
                .map(|end| required.max(end))
                .ok_or_else(|| LayoutError::FieldOverflow {
                    name: field.name().to_owned(),
                    offset: field.offset(),
                    length: field.len(),
                })
        })?;

        let inferred = size == LayoutSize::Inferred;
        let size = match size {
            LayoutSize::Inferred => required,
            LayoutSize::Fixed(declared) if declared < required => {
                return Err(LayoutError::LayoutTooSmall { required, declared });
            }
            LayoutSize::Fixed(declared) => declared,
        };

        tracing::debug!(fields = map.len(), size, inferred, "layout built");

        Ok(Layout { fields: map, size })
    }

    /// Shorthand for [Layout::new] with [LayoutSize::Inferred].
    pub fn inferred(fields: impl IntoIterator<Item = Field>) -> Result<Self, LayoutError> {
        Layout::new(LayoutSize::Inferred, fields)
    }

    /// Total size in bytes; also the stride of a record array.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Smallest size that holds every field.
    pub fn min_size(&self) -> usize {
        self.fields.values().filter_map(Field::end).max().unwrap_or(0)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field_named(&self, name: &str) -> Result<&Field, AccessError> {
        self.fields
            .get(name)
            .ok_or_else(|| AccessError::UnknownField(name.into()))
    }

    /// Field whose offset is exactly `offset`.
    ///
    /// When several fields start there, the one whose name sorts first wins.
    pub fn field_at(&self, offset: usize) -> Result<&Field, AccessError> {
        self.fields
            .values()
            .find(|field| field.offset() == offset)
            .ok_or(AccessError::UnknownField(FieldKey::Offset(offset)))
    }

    /// Describes this whole layout as one plain field of an enclosing layout.
    ///
    /// ```
    /// use bytestruct::{field::Field, layout::Layout};
    ///
    /// let inner = Layout::inferred([Field::u16("a", 0), Field::u16("b", 2)]).unwrap();
    /// let outer = Layout::inferred([Field::u8("tag", 0), inner.as_field("body", 1)]).unwrap();
    /// assert_eq!(outer.size(), 5);
    /// ```
    pub fn as_field(&self, name: impl Into<String>, offset: usize) -> Field {
        Field::new(name, offset, self.size)
    }
}
