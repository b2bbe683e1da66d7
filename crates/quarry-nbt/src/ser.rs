use crate::tag::{write_length, write_string, TagType};
use byteorder::{BigEndian, WriteBytesExt};
use quarry_common::{QuarryError, Result};
use serde::ser::{self, Impossible, Serialize};
use std::io::Write;

/// Encodes serde records as a tag stream.
pub struct Serializer<W> {
    writer: W,
}

impl<W: Write> Serializer<W> {
    pub fn new(writer: W) -> Self {
        Serializer { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes `value` as the root compound named `name`.
    pub fn write_root<T: Serialize + ?Sized>(&mut self, name: &str, value: &T) -> Result<()> {
        value.serialize(Field {
            ser: self,
            header: Header::Root(name),
        })?;
        Ok(())
    }
}

/// Writes `value` as a root compound named `name`.
pub fn to_writer<W: Write, T: Serialize + ?Sized>(writer: W, name: &str, value: &T) -> Result<()> {
    Serializer::new(writer).write_root(name, value)
}

pub fn to_vec<T: Serialize + ?Sized>(name: &str, value: &T) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    to_writer(&mut buffer, name, value)?;
    Ok(buffer)
}

#[derive(Clone, Copy)]
enum Header<'a> {
    Root(&'a str),
    Named(&'a str),
    /// List elements carry no header.
    Element,
}

/// Serializes one value, emitting its header lazily once its tag type is known.
/// Every method returns the tag type written, `TAG_End` meaning nothing was.
struct Field<'a, W> {
    ser: &'a mut Serializer<W>,
    header: Header<'a>,
}

impl<'a, W: Write> Field<'a, W> {
    fn begin(&mut self, tag: TagType) -> Result<()> {
        let name = match self.header {
            Header::Element => return Ok(()),
            Header::Root(name) if tag != TagType::Compound => {
                return Err(QuarryError::contract(format!(
                    "root {:?} must encode as {}, not {}",
                    name,
                    TagType::Compound,
                    tag
                )));
            }
            Header::Root(name) | Header::Named(name) => name,
        };

        self.ser.writer.write_u8(tag.id())?;
        write_string(&mut self.ser.writer, name)
    }

    /// Rejects values that have no list element encoding.
    fn not_an_element(&self, what: &str) -> Result<()> {
        match self.header {
            Header::Element => Err(QuarryError::unsupported(format!(
                "{} can not be a list element",
                what
            ))),
            _ => Ok(()),
        }
    }

    fn unsupported(&self, what: &str) -> QuarryError {
        match self.header {
            Header::Root(name) | Header::Named(name) => {
                QuarryError::unsupported(format!("{:?}: can not encode {}", name, what))
            }
            Header::Element => QuarryError::unsupported(format!("can not encode {}", what)),
        }
    }
}

impl<'a, W: Write> ser::Serializer for Field<'a, W> {
    type Ok = TagType;
    type Error = QuarryError;

    type SerializeSeq = Sequence<'a, W>;
    type SerializeTuple = Sequence<'a, W>;
    type SerializeTupleStruct = Sequence<'a, W>;
    type SerializeTupleVariant = Impossible<TagType, QuarryError>;
    type SerializeMap = Compound<'a, W>;
    type SerializeStruct = Compound<'a, W>;
    type SerializeStructVariant = Impossible<TagType, QuarryError>;

    fn serialize_bool(mut self, v: bool) -> Result<TagType> {
        self.not_an_element("bool")?;
        self.begin(TagType::Byte)?;
        self.ser.writer.write_i8(v as i8)?;
        Ok(TagType::Byte)
    }

    fn serialize_i8(mut self, v: i8) -> Result<TagType> {
        self.begin(TagType::Byte)?;
        self.ser.writer.write_i8(v)?;
        Ok(TagType::Byte)
    }

    fn serialize_i16(mut self, v: i16) -> Result<TagType> {
        self.begin(TagType::Short)?;
        self.ser.writer.write_i16::<BigEndian>(v)?;
        Ok(TagType::Short)
    }

    fn serialize_i32(mut self, v: i32) -> Result<TagType> {
        self.begin(TagType::Int)?;
        self.ser.writer.write_i32::<BigEndian>(v)?;
        Ok(TagType::Int)
    }

    fn serialize_i64(mut self, v: i64) -> Result<TagType> {
        self.begin(TagType::Long)?;
        self.ser.writer.write_i64::<BigEndian>(v)?;
        Ok(TagType::Long)
    }

    fn serialize_u8(self, v: u8) -> Result<TagType> {
        self.serialize_i8(v as i8)
    }

    fn serialize_u16(self, v: u16) -> Result<TagType> {
        self.serialize_i16(v as i16)
    }

    fn serialize_u32(self, v: u32) -> Result<TagType> {
        self.serialize_i32(v as i32)
    }

    fn serialize_u64(self, v: u64) -> Result<TagType> {
        self.serialize_i64(v as i64)
    }

    fn serialize_f32(mut self, v: f32) -> Result<TagType> {
        self.begin(TagType::Float)?;
        self.ser.writer.write_f32::<BigEndian>(v)?;
        Ok(TagType::Float)
    }

    fn serialize_f64(mut self, v: f64) -> Result<TagType> {
        self.begin(TagType::Double)?;
        self.ser.writer.write_f64::<BigEndian>(v)?;
        Ok(TagType::Double)
    }

    fn serialize_char(self, _v: char) -> Result<TagType> {
        Err(self.unsupported("char"))
    }

    fn serialize_str(mut self, v: &str) -> Result<TagType> {
        self.not_an_element("string")?;
        self.begin(TagType::String)?;
        write_string(&mut self.ser.writer, v)?;
        Ok(TagType::String)
    }

    fn serialize_bytes(mut self, v: &[u8]) -> Result<TagType> {
        self.not_an_element("byte buffer")?;
        self.begin(TagType::ByteArray)?;
        write_length(&mut self.ser.writer, TagType::ByteArray, v.len())?;
        self.ser.writer.write_all(v)?;
        Ok(TagType::ByteArray)
    }

    fn serialize_none(self) -> Result<TagType> {
        match self.header {
            Header::Named(_) => Ok(TagType::End),
            Header::Root(_) => Err(QuarryError::contract("root value is empty")),
            Header::Element => Err(self.unsupported("an empty list element")),
        }
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<TagType> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<TagType> {
        Err(self.unsupported("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<TagType> {
        Err(self.unsupported(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<TagType> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<TagType> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<TagType> {
        Err(self.unsupported(&format!("{}::{}", name, variant)))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Sequence<'a, W>> {
        match self.header {
            Header::Named(name) => Ok(Sequence {
                ser: self.ser,
                name,
                element: None,
                count: 0,
                buffer: Vec::new(),
            }),
            Header::Root(_) => Err(QuarryError::contract(format!(
                "root value must encode as {}, not a sequence",
                TagType::Compound
            ))),
            Header::Element => Err(self.unsupported("a list of lists")),
        }
    }

    fn serialize_tuple(self, len: usize) -> Result<Sequence<'a, W>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<Sequence<'a, W>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.unsupported(&format!("{}::{}", name, variant)))
    }

    fn serialize_map(mut self, _len: Option<usize>) -> Result<Compound<'a, W>> {
        self.begin(TagType::Compound)?;
        Ok(Compound {
            ser: self.ser,
            key: None,
        })
    }

    fn serialize_struct(mut self, _name: &'static str, _len: usize) -> Result<Compound<'a, W>> {
        self.begin(TagType::Compound)?;
        Ok(Compound {
            ser: self.ser,
            key: None,
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.unsupported(&format!("{}::{}", name, variant)))
    }
}

/// Children of a compound whose header is already written.
pub struct Compound<'a, W> {
    ser: &'a mut Serializer<W>,
    key: Option<String>,
}

impl<'a, W: Write> Compound<'a, W> {
    fn field<T: Serialize + ?Sized>(&mut self, name: &str, value: &T) -> Result<()> {
        value.serialize(Field {
            ser: &mut *self.ser,
            header: Header::Named(name),
        })?;
        Ok(())
    }

    fn finish(self) -> Result<TagType> {
        self.ser.writer.write_u8(TagType::End.id())?;
        Ok(TagType::Compound)
    }
}

impl<'a, W: Write> ser::SerializeStruct for Compound<'a, W> {
    type Ok = TagType;
    type Error = QuarryError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.field(key, value)
    }

    fn end(self) -> Result<TagType> {
        self.finish()
    }
}

impl<'a, W: Write> ser::SerializeMap for Compound<'a, W> {
    type Ok = TagType;
    type Error = QuarryError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<()> {
        self.key = Some(key.serialize(KeyName)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let key = self
            .key
            .take()
            .ok_or_else(|| QuarryError::contract("compound value given before its name"))?;
        self.field(&key, value)
    }

    fn end(self) -> Result<TagType> {
        self.finish()
    }
}

/// Buffers list elements until the first one fixes the element type.
pub struct Sequence<'a, W> {
    ser: &'a mut Serializer<W>,
    name: &'a str,
    element: Option<TagType>,
    count: usize,
    buffer: Vec<u8>,
}

impl<'a, W: Write> Sequence<'a, W> {
    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let mut elements = Serializer::new(&mut self.buffer);
        let tag = value.serialize(Field {
            ser: &mut elements,
            header: Header::Element,
        })?;

        match self.element {
            None => self.element = Some(tag),
            Some(expected) if expected != tag => {
                return Err(QuarryError::unsupported(format!(
                    "{}({:?}) mixes {} and {} elements",
                    TagType::List,
                    self.name,
                    expected,
                    tag
                )));
            }
            Some(_) => {}
        }
        self.count += 1;
        Ok(())
    }

    fn finish(self) -> Result<TagType> {
        // 8 and 32-bit integer sequences become arrays, everything else a list.
        let (tag, element) = match self.element {
            None => (TagType::List, TagType::End),
            Some(TagType::Byte) => (TagType::ByteArray, TagType::Byte),
            Some(TagType::Int) => (TagType::IntArray, TagType::Int),
            Some(
                element @ (TagType::Short
                | TagType::Long
                | TagType::Float
                | TagType::Double
                | TagType::Compound),
            ) => (TagType::List, element),
            Some(element) => {
                return Err(QuarryError::unsupported(format!(
                    "{}({:?}): {} can not be a list element",
                    TagType::List,
                    self.name,
                    element
                )));
            }
        };

        let writer = &mut self.ser.writer;
        writer.write_u8(tag.id())?;
        write_string(writer, self.name)?;
        if tag == TagType::List {
            writer.write_u8(element.id())?;
        }
        write_length(writer, tag, self.count)?;
        writer.write_all(&self.buffer)?;
        Ok(tag)
    }
}

impl<'a, W: Write> ser::SerializeSeq for Sequence<'a, W> {
    type Ok = TagType;
    type Error = QuarryError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<TagType> {
        self.finish()
    }
}

impl<'a, W: Write> ser::SerializeTuple for Sequence<'a, W> {
    type Ok = TagType;
    type Error = QuarryError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<TagType> {
        self.finish()
    }
}

impl<'a, W: Write> ser::SerializeTupleStruct for Sequence<'a, W> {
    type Ok = TagType;
    type Error = QuarryError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<TagType> {
        self.finish()
    }
}

/// Compound keys must serialize as strings.
struct KeyName;

fn key_error() -> QuarryError {
    QuarryError::unsupported("compound keys must be strings")
}

impl ser::Serializer for KeyName {
    type Ok = String;
    type Error = QuarryError;

    type SerializeSeq = Impossible<String, QuarryError>;
    type SerializeTuple = Impossible<String, QuarryError>;
    type SerializeTupleStruct = Impossible<String, QuarryError>;
    type SerializeTupleVariant = Impossible<String, QuarryError>;
    type SerializeMap = Impossible<String, QuarryError>;
    type SerializeStruct = Impossible<String, QuarryError>;
    type SerializeStructVariant = Impossible<String, QuarryError>;

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<String> {
        Err(key_error())
    }

    fn serialize_i8(self, _v: i8) -> Result<String> {
        Err(key_error())
    }

    fn serialize_i16(self, _v: i16) -> Result<String> {
        Err(key_error())
    }

    fn serialize_i32(self, _v: i32) -> Result<String> {
        Err(key_error())
    }

    fn serialize_i64(self, _v: i64) -> Result<String> {
        Err(key_error())
    }

    fn serialize_u8(self, _v: u8) -> Result<String> {
        Err(key_error())
    }

    fn serialize_u16(self, _v: u16) -> Result<String> {
        Err(key_error())
    }

    fn serialize_u32(self, _v: u32) -> Result<String> {
        Err(key_error())
    }

    fn serialize_u64(self, _v: u64) -> Result<String> {
        Err(key_error())
    }

    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(key_error())
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(key_error())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(key_error())
    }

    fn serialize_none(self) -> Result<String> {
        Err(key_error())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _value: &T) -> Result<String> {
        Err(key_error())
    }

    fn serialize_unit(self) -> Result<String> {
        Err(key_error())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(key_error())
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String> {
        Err(key_error())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(key_error())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(key_error())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(key_error())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(key_error())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(key_error())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(key_error())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(key_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Tag;
    use assert_matches::assert_matches;
    use serde::Serialize;
    use std::collections::BTreeMap;
    use std::io::Cursor;

    fn read_back(bytes: &[u8]) -> (String, Tag) {
        Tag::read(&mut Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_bool_encodes_as_byte() {
        #[derive(Serialize)]
        struct Flags {
            #[serde(rename = "OnGround")]
            on_ground: bool,
        }

        let bytes = to_vec("", &Flags { on_ground: true }).unwrap();
        let (_, root) = read_back(&bytes);
        assert_eq!(root.get("OnGround"), Some(&Tag::Byte(1)));
    }

    #[test]
    fn test_wire_bytes_of_small_record() {
        #[derive(Serialize)]
        struct Small {
            a: i16,
        }

        let bytes = to_vec("r", &Small { a: 258 }).unwrap();
        assert_eq!(
            bytes,
            vec![10, 0, 1, b'r', 2, 0, 1, b'a', 1, 2, 0]
        );
    }

    #[test]
    fn test_sequence_classification() {
        #[derive(Serialize)]
        struct Lists {
            bytes: Vec<u8>,
            ints: Vec<u32>,
            shorts: Vec<i16>,
            longs: Vec<u64>,
            floats: Vec<f32>,
            doubles: [f64; 2],
            empty: Vec<i32>,
        }

        let bytes = to_vec(
            "",
            &Lists {
                bytes: vec![255, 1],
                ints: vec![u32::MAX],
                shorts: vec![1, -1],
                longs: vec![7],
                floats: vec![0.5],
                doubles: [1.0, 2.0],
                empty: vec![],
            },
        )
        .unwrap();
        let (_, root) = read_back(&bytes);

        assert_eq!(root.get("bytes"), Some(&Tag::ByteArray(vec![-1, 1])));
        assert_eq!(root.get("ints"), Some(&Tag::IntArray(vec![-1])));
        assert_eq!(
            root.get("shorts"),
            Some(&Tag::List(TagType::Short, vec![Tag::Short(1), Tag::Short(-1)]))
        );
        assert_eq!(
            root.get("longs"),
            Some(&Tag::List(TagType::Long, vec![Tag::Long(7)]))
        );
        assert_eq!(
            root.get("floats"),
            Some(&Tag::List(TagType::Float, vec![Tag::Float(0.5)]))
        );
        assert_eq!(
            root.get("doubles"),
            Some(&Tag::List(TagType::Double, vec![Tag::Double(1.0), Tag::Double(2.0)]))
        );
        assert_eq!(root.get("empty"), Some(&Tag::List(TagType::End, vec![])));
    }

    #[test]
    fn test_list_of_records() {
        #[derive(Serialize)]
        struct Item {
            id: i16,
        }

        #[derive(Serialize)]
        struct Inventory {
            items: Vec<Item>,
        }

        let bytes = to_vec(
            "",
            &Inventory {
                items: vec![Item { id: 1 }, Item { id: 2 }],
            },
        )
        .unwrap();
        let (_, root) = read_back(&bytes);
        assert_eq!(
            root.get("items"),
            Some(&Tag::List(
                TagType::Compound,
                vec![
                    Tag::Compound(vec![("id".to_string(), Tag::Short(1))]),
                    Tag::Compound(vec![("id".to_string(), Tag::Short(2))]),
                ]
            ))
        );
    }

    #[test]
    fn test_unsupported_list_elements() {
        #[derive(Serialize)]
        struct Strings {
            names: Vec<String>,
        }

        #[derive(Serialize)]
        struct Bools {
            flags: Vec<bool>,
        }

        #[derive(Serialize)]
        struct Nested {
            grid: Vec<Vec<i16>>,
        }

        let strings = Strings {
            names: vec!["a".to_string()],
        };
        assert_matches!(to_vec("", &strings), Err(QuarryError::TypeError(_)));
        assert_matches!(
            to_vec("", &Bools { flags: vec![true] }),
            Err(QuarryError::TypeError(_))
        );
        assert_matches!(
            to_vec("", &Nested { grid: vec![vec![1]] }),
            Err(QuarryError::TypeError(_))
        );
    }

    #[test]
    fn test_none_fields_are_skipped() {
        #[derive(Serialize)]
        struct Holder {
            a: Option<i32>,
            b: Option<Box<i64>>,
        }

        let bytes = to_vec(
            "",
            &Holder {
                a: None,
                b: Some(Box::new(5)),
            },
        )
        .unwrap();
        let (_, root) = read_back(&bytes);
        assert_eq!(
            root,
            Tag::Compound(vec![("b".to_string(), Tag::Long(5))])
        );
    }

    #[test]
    fn test_root_must_be_a_record() {
        assert_matches!(to_vec("", &7i32), Err(QuarryError::ContractError(_)));
        assert_matches!(to_vec("", &vec![1i16]), Err(QuarryError::ContractError(_)));
        assert_matches!(to_vec("", &None::<i32>), Err(QuarryError::ContractError(_)));
    }

    #[test]
    fn test_map_source() {
        let mut map = BTreeMap::new();
        map.insert("x".to_string(), 1.5f64);
        map.insert("y".to_string(), -2.0f64);

        let bytes = to_vec("pos", &map).unwrap();
        let (name, root) = read_back(&bytes);
        assert_eq!(name, "pos");
        assert_eq!(root.get("x"), Some(&Tag::Double(1.5)));
        assert_eq!(root.get("y"), Some(&Tag::Double(-2.0)));
    }

    #[test]
    fn test_non_string_keys() {
        let mut map = BTreeMap::new();
        map.insert(1, 2i32);
        assert_matches!(to_vec("", &map), Err(QuarryError::TypeError(_)));
    }
}
