//! Serializable description of a [Layout].
//!
//! These types describe the *shape* of a layout (field names, offsets,
//! lengths, bit ranges and total size) so it can be stored next to the data
//! it describes or shared between processes. They are unrelated to the bytes
//! the layout is later bound to.
//!
//! ```json
//! {
//!   "fields": [
//!     { "name": "flags", "offset": 1, "length": 1, "bf-offset": 3, "bf-len": 2 },
//!     { "name": "id", "offset": 2, "length": 4 }
//!   ],
//!   "size": 8
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    errors::LayoutError,
    field::Field,
    layout::{Layout, LayoutSize},
};

/// Top-level layout description.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LayoutDef {
    /// All fields of the layout; order does not matter.
    pub fields: Vec<FieldDef>,
    /// Total size in bytes; inferred from the fields when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

/// Description of a single field.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    /// Byte offset from the start of the record.
    pub offset: usize,
    /// Length in bytes; always 1 for bit fields.
    pub length: usize,
    /// First bit of a bit field, counted from the least significant bit.
    /// Omitted when 0.
    #[serde(rename = "bf-offset", default, skip_serializing_if = "Option::is_none")]
    pub bit_offset: Option<u8>,
    /// Number of bits of a bit field.
    #[serde(rename = "bf-len", default, skip_serializing_if = "Option::is_none")]
    pub bit_length: Option<u8>,
}

impl TryFrom<FieldDef> for Field {
    type Error = LayoutError;

    fn try_from(def: FieldDef) -> Result<Self, Self::Error> {
        match (def.bit_offset, def.bit_length) {
            (None, None) => Ok(Field::new(def.name, def.offset, def.length)),
            (offset, Some(length)) => {
                if def.length != 1 {
                    return Err(LayoutError::BitFieldWidth {
                        name: def.name,
                        length: def.length,
                    });
                }

                Field::bits(def.name, def.offset, offset.unwrap_or(0), length)
            }
            (Some(offset), None) => Err(LayoutError::InvalidBitRange { offset, length: 0 }),
        }
    }
}

impl From<&Field> for FieldDef {
    fn from(field: &Field) -> Self {
        let spec = field.bit_spec();

        FieldDef {
            name: field.name().to_owned(),
            offset: field.offset(),
            length: field.len(),
            bit_offset: spec.map(|s| s.offset()).filter(|&offset| offset != 0),
            bit_length: spec.map(|s| s.len()),
        }
    }
}

impl TryFrom<LayoutDef> for Layout {
    type Error = LayoutError;

    fn try_from(def: LayoutDef) -> Result<Self, Self::Error> {
        let fields = def
            .fields
            .into_iter()
            .map(Field::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let size = match def.size {
            Some(size) => LayoutSize::Fixed(size),
            None => LayoutSize::Inferred,
        };

        Layout::new(size, fields)
    }
}

impl From<&Layout> for LayoutDef {
    fn from(layout: &Layout) -> Self {
        LayoutDef {
            fields: layout.fields().map(FieldDef::from).collect(),
            size: Some(layout.size()),
        }
    }
}

impl From<Layout> for LayoutDef {
    fn from(layout: Layout) -> Self {
        LayoutDef::from(&layout)
    }
}
