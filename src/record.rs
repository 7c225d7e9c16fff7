//! A [Layout] bound to one buffer.

use std::sync::Arc;

use crate::{
    errors::AccessError,
    field::Field,
    kind::Primitive,
    layout::Layout,
    value::{Value, ValueMut},
};

/// One buffer of exactly `layout.size()` bytes read and written field by field.
///
/// `B` is the backing storage: an owned `Vec<u8>`, or a borrowed `&[u8]` /
/// `&mut [u8]` into a larger buffer such as a [crate::records::Records].
///
/// [Record::lookup] always returns a copy. [Record::update] writes in place,
/// so the change is visible to anything that shares the buffer.
///
/// ```
/// use std::sync::Arc;
/// use bytestruct::{field::Field, layout::{Layout, LayoutSize}, record::Record, value::Value};
///
/// let layout = Arc::new(Layout::new(LayoutSize::Fixed(8), [Field::u16("value", 3)]).unwrap());
/// let mut record = Record::zeroed(layout);
/// record.update("value", Value::from_u16(42)).unwrap();
///
/// assert_eq!(record.as_bytes(), &[0, 0, 0, 42, 0, 0, 0, 0]);
/// assert_eq!(record.get::<u16>("value"), Ok(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<B = Vec<u8>> {
    layout: Arc<Layout>,
    buf: B,
}

impl Record<Vec<u8>> {
    /// Allocates a zero-filled buffer of the layout's size.
    pub fn zeroed(layout: Arc<Layout>) -> Self {
        let buf = vec![0u8; layout.size()];
        Record { layout, buf }
    }
}

impl<B: AsRef<[u8]>> Record<B> {
    /// Binds `layout` to `buf`, which must be exactly `layout.size()` bytes.
    pub fn new(layout: Arc<Layout>, buf: B) -> Result<Self, AccessError> {
        let actual = buf.as_ref().len();
        if actual != layout.size() {
            return Err(AccessError::SizeMismatch {
                expected: layout.size(),
                actual,
            });
        }

        Ok(Record { layout, buf })
    }

    /// Caller guarantees `buf.as_ref().len() == layout.size()`.
    pub(crate) fn from_parts(layout: Arc<Layout>, buf: B) -> Self {
        debug_assert_eq!(buf.as_ref().len(), layout.size());
        Record { layout, buf }
    }

    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_ref()
    }

    pub fn into_inner(self) -> B {
        self.buf
    }

    /// Copy of the named field's bytes; a single byte for bit fields.
    pub fn lookup(&self, name: &str) -> Result<Value<'static>, AccessError> {
        self.layout.field_named(name)?.extract(self.buf.as_ref())
    }

    /// Named field borrowed from the buffer without copying.
    ///
    /// Bit fields have no bytes of their own and are still returned as a copy.
    pub fn view(&self, name: &str) -> Result<Value<'_>, AccessError> {
        self.layout.field_named(name)?.view(self.buf.as_ref())
    }

    /// Decodes the named field as an integer of type `T`.
    pub fn get<T: Primitive>(&self, name: &str) -> Result<T, AccessError> {
        self.view(name)?.to_int()
    }

    /// Same layout, independently owned copy of the bytes.
    pub fn cloned(&self) -> Record<Vec<u8>> {
        Record {
            layout: Arc::clone(&self.layout),
            buf: self.buf.as_ref().to_vec(),
        }
    }

    /// Reads the named field as a record of the nested `layout`.
    ///
    /// The field must be a plain field exactly `layout.size()` bytes long,
    /// typically one made with [Layout::as_field].
    pub fn nested(&self, name: &str, layout: Arc<Layout>) -> Result<Record<&[u8]>, AccessError> {
        let field = nested_field(&self.layout, name, &layout)?;
        let bytes = field.slice(self.buf.as_ref())?;

        Ok(Record::from_parts(layout, bytes))
    }
}

/// Plain field `name` of `outer` sized to hold exactly one `inner` record.
fn nested_field<'l>(
    outer: &'l Layout,
    name: &str,
    inner: &Layout,
) -> Result<&'l Field, AccessError> {
    let field = outer.field_named(name)?;
    if field.is_bit_field() {
        return Err(AccessError::BitFieldView(name.to_owned()));
    }
    if field.len() != inner.size() {
        return Err(AccessError::SizeMismatch {
            expected: inner.size(),
            actual: field.len(),
        });
    }

    Ok(field)
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Record<B> {
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.buf.as_mut()
    }

    /// Writes `value` into the named field in place.
    ///
    /// `value` must be exactly as long as the field; one byte for bit fields.
    pub fn update(&mut self, name: &str, value: impl AsRef<[u8]>) -> Result<(), AccessError> {
        self.layout
            .field_named(name)?
            .write(self.buf.as_mut(), value)
    }

    /// Encodes `v` into the named field, which must be exactly `T::WIDTH` bytes.
    pub fn set<T: Primitive>(&mut self, name: &str, v: T) -> Result<(), AccessError> {
        self.update(name, v.to_le_vec())
    }

    /// Mutable window onto a plain field's bytes.
    pub fn view_mut(&mut self, name: &str) -> Result<ValueMut<'_>, AccessError> {
        let field = self.layout.field_named(name)?;
        if field.is_bit_field() {
            return Err(AccessError::BitFieldView(name.to_owned()));
        }

        Ok(ValueMut::new(field.slice_mut(self.buf.as_mut())?))
    }

    /// Mutable counterpart of [Record::nested]; writes land in this record.
    pub fn nested_mut(
        &mut self,
        name: &str,
        layout: Arc<Layout>,
    ) -> Result<Record<&mut [u8]>, AccessError> {
        let field = nested_field(&self.layout, name, &layout)?;
        let bytes = field.slice_mut(self.buf.as_mut())?;

        Ok(Record::from_parts(layout, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::{FieldKey, LayoutError},
        layout::LayoutSize,
    };

    fn layout() -> Arc<Layout> {
        Arc::new(
            Layout::new(
                LayoutSize::Fixed(20),
                [Field::i64("field1", 2), Field::i64("field2", 10)],
            )
            .unwrap(),
        )
    }

    fn counting_data() -> Vec<u8> {
        (0..20).collect()
    }

    #[test]
    fn test_new_size_mismatch() {
        let data = counting_data();
        assert_eq!(
            Record::new(layout(), &data[0..16]).unwrap_err(),
            AccessError::SizeMismatch {
                expected: 20,
                actual: 16
            }
        );
        assert!(Record::new(layout(), data).is_ok());
    }

    #[test]
    fn test_zeroed() {
        let record = Record::zeroed(layout());
        assert_eq!(record.as_bytes(), &[0u8; 20]);
    }

    #[test]
    fn test_lookup() {
        let record = Record::new(layout(), counting_data()).unwrap();
        assert_eq!(
            record.lookup("field1").unwrap().as_bytes(),
            &[2, 3, 4, 5, 6, 7, 8, 9]
        );
        assert_eq!(
            record.lookup("no-such-field"),
            Err(AccessError::UnknownField(FieldKey::Name(
                "no-such-field".to_string()
            )))
        );
    }

    #[test]
    fn test_lookup_returns_copy() {
        let mut data = counting_data();
        let mut record = Record::new(layout(), data.as_mut_slice()).unwrap();

        let mut value = record.lookup("field1").unwrap();
        value.as_bytes_mut()[0] = 4;
        assert_eq!(record.as_bytes(), counting_data().as_slice());

        record.update("field1", [0xAAu8; 8]).unwrap();
        assert_eq!(value.as_bytes(), &[4, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_update() {
        let mut data = counting_data();
        let mut record = Record::new(layout(), data.as_mut_slice()).unwrap();
        let value: Vec<u8> = (0..8).collect();

        record.update("field1", &value).unwrap();
        assert_eq!(
            data,
            vec![0, 1, 0, 1, 2, 3, 4, 5, 6, 7, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19]
        );
    }

    #[test]
    fn test_update_errors() {
        let mut record = Record::new(layout(), counting_data()).unwrap();

        assert_eq!(
            record.update("no-such-field", [0u8; 8]),
            Err(AccessError::UnknownField(FieldKey::Name(
                "no-such-field".to_string()
            )))
        );
        assert_eq!(
            record.update("field1", [0u8; 7]),
            Err(AccessError::SizeMismatch {
                expected: 8,
                actual: 7
            })
        );
        assert_eq!(
            record.update("field1", Value::from_u32(1)),
            Err(AccessError::SizeMismatch {
                expected: 8,
                actual: 4
            })
        );
        assert!(record.update("field1", [0u8; 9]).is_err());
        assert_eq!(record.as_bytes(), counting_data().as_slice());
    }

    #[test]
    fn test_typed_access() {
        let mut record = Record::zeroed(layout());
        record.set("field2", -3i64).unwrap();
        assert_eq!(record.get::<i64>("field2"), Ok(-3));
        assert_eq!(record.get::<u64>("field2"), Ok(u64::MAX - 2));
        assert!(record.get::<u32>("field2").is_err());
        assert!(record.set("field2", 1u16).is_err());
    }

    #[test]
    fn test_bit_field_scenario() -> Result<(), LayoutError> {
        let layout = Arc::new(Layout::new(
            LayoutSize::Fixed(4),
            [Field::bits("f", 1, 3, 2)?],
        )?);
        let mut data: [u8; 4] = [0x00, 0b1110_0110, 0x00, 0x00];
        let mut record = Record::new(layout, &mut data[..]).unwrap();

        assert_eq!(record.lookup("f").unwrap().as_bytes(), &[0b00]);

        record.update("f", [0b10u8]).unwrap();
        assert_eq!(record.lookup("f").unwrap().as_bytes(), &[0b10]);
        assert_eq!(
            record.update("f", [0u8, 0]),
            Err(AccessError::SizeMismatch {
                expected: 1,
                actual: 2
            })
        );
        assert_eq!(data, [0x00, 0b1111_0110, 0x00, 0x00]);

        Ok(())
    }

    #[test]
    fn test_union_fields_share_bytes() {
        let layout =
            Arc::new(Layout::inferred([Field::u32("word", 0), Field::u16("low", 0)]).unwrap());
        let mut record = Record::zeroed(layout);

        record.set("word", 0x1234_5678u32).unwrap();
        assert_eq!(record.get::<u16>("low"), Ok(0x5678));

        record.set("low", 0xBEEFu16).unwrap();
        assert_eq!(record.get::<u32>("word"), Ok(0x1234_BEEF));
    }

    #[test]
    fn test_cloned_is_independent() {
        let record = Record::new(layout(), counting_data()).unwrap();
        let mut clone = record.cloned();

        assert_eq!(record.layout(), clone.layout());
        assert_eq!(record.as_bytes(), clone.as_bytes());

        clone.as_bytes_mut()[0] = 42;
        assert_eq!(record.as_bytes()[0], 0);
        assert_eq!(clone.as_bytes()[0], 42);
    }

    #[test]
    fn test_view_and_view_mut() {
        let mut record = Record::new(layout(), counting_data()).unwrap();
        assert!(record.view("field1").unwrap().is_borrowed());

        record.view_mut("field2").unwrap().set_int(7i64).unwrap();
        assert_eq!(record.get::<i64>("field2"), Ok(7));

        let bits = Arc::new(Layout::inferred([Field::bits("b", 0, 0, 1).unwrap()]).unwrap());
        let mut flags = Record::zeroed(bits);
        assert_eq!(
            flags.view_mut("b").unwrap_err(),
            AccessError::BitFieldView("b".to_string())
        );
    }

    #[test]
    fn test_nested() {
        let inner = Arc::new(Layout::inferred([Field::u16("a", 0), Field::u16("b", 2)]).unwrap());
        let outer = Arc::new(
            Layout::inferred([Field::u8("tag", 0), inner.as_field("body", 1)]).unwrap(),
        );
        let mut record = Record::new(outer, vec![9, 1, 0, 2, 0]).unwrap();

        let body = record.nested("body", Arc::clone(&inner)).unwrap();
        assert_eq!(body.get::<u16>("a"), Ok(1));
        assert_eq!(body.get::<u16>("b"), Ok(2));

        record
            .nested_mut("body", Arc::clone(&inner))
            .unwrap()
            .set("b", 0x0304u16)
            .unwrap();
        assert_eq!(record.as_bytes(), &[9, 1, 0, 4, 3]);

        assert_eq!(
            record.nested("tag", inner).unwrap_err(),
            AccessError::SizeMismatch {
                expected: 4,
                actual: 1
            }
        );
    }
}
