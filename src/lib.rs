//! # bytestruct
//!
//! Overlay named, typed fields onto raw byte buffers whose layout is only
//! known at runtime.
//!
//! Describe a buffer once with a [Layout] of [Field]s (plain byte ranges or
//! bit ranges inside a single byte, possibly overlapping), then bind it to any
//! number of buffers: one record at a time with [Record], or as a packed array
//! of fixed-stride records with [Records]. Integers are little-endian.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use bytestruct::{Field, Layout, LayoutSize, Record, Value};
//!
//! let layout = Arc::new(
//!     Layout::new(
//!         LayoutSize::Fixed(8),
//!         [
//!             Field::u16("port", 0),
//!             Field::bits("syn", 2, 1, 1).unwrap(),
//!             Field::new("tag", 3, 5),
//!         ],
//!     )
//!     .unwrap(),
//! );
//!
//! let mut record = Record::zeroed(layout);
//! record.set("port", 8080u16).unwrap();
//! record.update("syn", [1u8]).unwrap();
//! record.update("tag", Value::from_zstr("abcd")).unwrap();
//!
//! assert_eq!(record.as_bytes(), &[0x90, 0x1F, 0b10, b'a', b'b', b'c', b'd', 0]);
//! assert_eq!(record.lookup("tag").unwrap().to_zstr(), Ok("abcd"));
//! ```

pub mod bits;
pub mod errors;
pub mod field;
pub mod kind;
pub mod layout;
pub mod raw;
pub mod record;
pub mod records;
#[cfg(feature = "serde")]
pub mod serde;
pub mod value;

pub use errors::{AccessError, FieldKey, LayoutError};
pub use field::{BitSpec, Field};
pub use kind::{Kind, Primitive};
pub use layout::{Layout, LayoutSize};
pub use record::Record;
pub use records::Records;
pub use value::{Value, ValueMut};
