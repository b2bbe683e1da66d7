use crate::tag::{read_bytes, read_length, read_string, read_type, skip, TagType};
use byteorder::{BigEndian, ReadBytesExt};
use quarry_common::{QuarryError, Result};
use serde::de::value::{StrDeserializer, StringDeserializer};
use serde::de::{self, DeserializeOwned, DeserializeSeed, IntoDeserializer, MapAccess, SeqAccess, Visitor};
use std::io::Read;

/// Decodes a tag stream into serde records.
pub struct Deserializer<R> {
    reader: R,
}

impl<R: Read> Deserializer<R> {
    pub fn new(reader: R) -> Self {
        Deserializer { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Reads the root header and decodes the root compound into `T`.
    pub fn read_root<T: DeserializeOwned>(&mut self) -> Result<(String, T)> {
        let tag = read_type(&mut self.reader)?;
        if tag != TagType::Compound {
            return Err(QuarryError::contract(format!(
                "root tag must be {}, found {}",
                TagType::Compound,
                tag
            )));
        }

        let name = read_string(&mut self.reader)?;
        let value = T::deserialize(Value {
            de: self,
            tag,
            name: name.clone(),
        })?;
        Ok((name, value))
    }
}

/// Decodes the root compound of `reader` into `T`.
pub fn from_reader<R: Read, T: DeserializeOwned>(reader: R) -> Result<T> {
    from_reader_named(reader).map(|(_, value)| value)
}

/// Like [`from_reader`], also returning the root tag's name.
pub fn from_reader_named<R: Read, T: DeserializeOwned>(reader: R) -> Result<(String, T)> {
    Deserializer::new(reader).read_root()
}

pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    from_reader(bytes)
}

/// Textual booleans accepted for a `TAG_String` decoded into `bool`.
pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// The payload of one tag whose header has already been read.
struct Value<'a, R> {
    de: &'a mut Deserializer<R>,
    tag: TagType,
    name: String,
}

impl<'a, R: Read> Value<'a, R> {
    fn mismatch(&self, expected: &str) -> QuarryError {
        QuarryError::unsupported(format!(
            "{}({:?}) can not be decoded into {}",
            self.tag, self.name, expected
        ))
    }

    /// Reads an integer tag no wider than `widest`.
    fn integer(&mut self, widest: TagType, expected: &str) -> Result<i64> {
        let reader = &mut self.de.reader;
        let value = match self.tag {
            TagType::Byte => reader.read_i8()? as i64,
            TagType::Short if widest != TagType::Byte => reader.read_i16::<BigEndian>()? as i64,
            TagType::Int if matches!(widest, TagType::Int | TagType::Long) => {
                reader.read_i32::<BigEndian>()? as i64
            }
            TagType::Long if widest == TagType::Long => reader.read_i64::<BigEndian>()?,
            _ => return Err(self.mismatch(expected)),
        };
        Ok(value)
    }
}

impl<'de, 'a, R: Read> de::Deserializer<'de> for Value<'a, R> {
    type Error = QuarryError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let reader = &mut self.de.reader;
        match self.tag {
            TagType::Byte => visitor.visit_i8(reader.read_i8()?),
            TagType::Short => visitor.visit_i16(reader.read_i16::<BigEndian>()?),
            TagType::Int => visitor.visit_i32(reader.read_i32::<BigEndian>()?),
            TagType::Long => visitor.visit_i64(reader.read_i64::<BigEndian>()?),
            TagType::Float => visitor.visit_f32(reader.read_f32::<BigEndian>()?),
            TagType::Double => visitor.visit_f64(reader.read_f64::<BigEndian>()?),
            TagType::String => visitor.visit_string(read_string(reader)?),
            TagType::ByteArray | TagType::IntArray | TagType::LongArray | TagType::List => {
                self.deserialize_seq(visitor)
            }
            TagType::Compound => self.deserialize_map(visitor),
            TagType::End => Err(QuarryError::format(format!("unexpected {}", TagType::End))),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.tag {
            TagType::Byte => visitor.visit_bool(self.de.reader.read_i8()? != 0),
            TagType::String => {
                let text = read_string(&mut self.de.reader)?;
                match parse_bool(&text) {
                    Some(value) => visitor.visit_bool(value),
                    None => Err(QuarryError::unsupported(format!(
                        "{}({:?}) value {:?} is not a boolean",
                        self.tag, self.name, text
                    ))),
                }
            }
            _ => Err(self.mismatch("bool")),
        }
    }

    fn deserialize_i8<V: Visitor<'de>>(mut self, visitor: V) -> Result<V::Value> {
        visitor.visit_i8(self.integer(TagType::Byte, "i8")? as i8)
    }

    fn deserialize_u8<V: Visitor<'de>>(mut self, visitor: V) -> Result<V::Value> {
        visitor.visit_u8(self.integer(TagType::Byte, "u8")? as u8)
    }

    fn deserialize_i16<V: Visitor<'de>>(mut self, visitor: V) -> Result<V::Value> {
        visitor.visit_i16(self.integer(TagType::Short, "i16")? as i16)
    }

    fn deserialize_u16<V: Visitor<'de>>(mut self, visitor: V) -> Result<V::Value> {
        visitor.visit_u16(self.integer(TagType::Short, "u16")? as u16)
    }

    fn deserialize_i32<V: Visitor<'de>>(mut self, visitor: V) -> Result<V::Value> {
        visitor.visit_i32(self.integer(TagType::Int, "i32")? as i32)
    }

    fn deserialize_u32<V: Visitor<'de>>(mut self, visitor: V) -> Result<V::Value> {
        visitor.visit_u32(self.integer(TagType::Int, "u32")? as u32)
    }

    fn deserialize_i64<V: Visitor<'de>>(mut self, visitor: V) -> Result<V::Value> {
        visitor.visit_i64(self.integer(TagType::Long, "i64")?)
    }

    fn deserialize_u64<V: Visitor<'de>>(mut self, visitor: V) -> Result<V::Value> {
        visitor.visit_u64(self.integer(TagType::Long, "u64")? as u64)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.tag {
            TagType::Float => visitor.visit_f32(self.de.reader.read_f32::<BigEndian>()?),
            _ => Err(self.mismatch("f32")),
        }
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.tag {
            TagType::Float => visitor.visit_f64(self.de.reader.read_f32::<BigEndian>()? as f64),
            TagType::Double => visitor.visit_f64(self.de.reader.read_f64::<BigEndian>()?),
            _ => Err(self.mismatch("f64")),
        }
    }

    fn deserialize_char<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(self.mismatch("char"))
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.tag {
            TagType::String => visitor.visit_string(read_string(&mut self.de.reader)?),
            _ => Err(self.mismatch("string")),
        }
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.tag {
            TagType::ByteArray => {
                let length = read_length(&mut self.de.reader, self.tag)?;
                visitor.visit_byte_buf(read_bytes(&mut self.de.reader, length)?)
            }
            _ => Err(self.mismatch("byte buffer")),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        // A tag present in the stream is always `Some`; absent fields are left to `default`.
        visitor.visit_some(self)
    }

    fn deserialize_unit<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(self.mismatch("unit"))
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        _visitor: V,
    ) -> Result<V::Value> {
        Err(self.mismatch(name))
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let reader = &mut self.de.reader;
        let (element, length) = match self.tag {
            TagType::ByteArray => (TagType::Byte, read_length(reader, self.tag)?),
            TagType::IntArray => (TagType::Int, read_length(reader, self.tag)?),
            TagType::LongArray => (TagType::Long, read_length(reader, self.tag)?),
            TagType::List => {
                let element = read_type(reader)?;
                let length = read_length(reader, self.tag)?;
                if element == TagType::End && length > 0 {
                    return Err(QuarryError::format(format!(
                        "{}({:?}) of {} with {} elements",
                        self.tag, self.name, element, length
                    )));
                }
                (element, length)
            }
            _ => return Err(self.mismatch("a sequence")),
        };

        let mut elements = Elements {
            de: self.de,
            tag: element,
            remaining: length,
        };
        let value = visitor.visit_seq(&mut elements)?;
        if elements.remaining > 0 {
            return Err(QuarryError::unsupported(format!(
                "{}({:?}) holds {} elements, {} left undecoded",
                self.tag, self.name, length, elements.remaining
            )));
        }
        Ok(value)
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.tag {
            TagType::Compound => visitor.visit_map(Fields {
                de: self.de,
                pending: None,
            }),
            _ => Err(self.mismatch("a map")),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.tag {
            TagType::Compound => visitor.visit_map(Fields {
                de: self.de,
                pending: None,
            }),
            _ => Err(self.mismatch(&format!("struct {}", name))),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.tag {
            TagType::String => {
                let variant: StringDeserializer<QuarryError> =
                    read_string(&mut self.de.reader)?.into_deserializer();
                visitor.visit_enum(variant)
            }
            _ => Err(self.mismatch(&format!("enum {}", name))),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        skip(&mut self.de.reader, self.tag)?;
        visitor.visit_unit()
    }
}

/// Children of a compound, read header by header until `TAG_End`.
struct Fields<'a, R> {
    de: &'a mut Deserializer<R>,
    pending: Option<(TagType, String)>,
}

impl<'de, 'a, R: Read> MapAccess<'de> for Fields<'a, R> {
    type Error = QuarryError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        let tag = read_type(&mut self.de.reader)?;
        if tag == TagType::End {
            return Ok(None);
        }

        let name = read_string(&mut self.de.reader)?;
        let key: StrDeserializer<'_, QuarryError> = name.as_str().into_deserializer();
        let key = seed.deserialize(key)?;
        self.pending = Some((tag, name));
        Ok(Some(key))
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let (tag, name) = self
            .pending
            .take()
            .ok_or_else(|| QuarryError::contract("compound value requested before its name"))?;
        seed.deserialize(Value {
            de: &mut *self.de,
            tag,
            name,
        })
    }
}

/// Unnamed elements of a list or array.
struct Elements<'a, R> {
    de: &'a mut Deserializer<R>,
    tag: TagType,
    remaining: usize,
}

impl<'de, 'a, R: Read> SeqAccess<'de> for Elements<'a, R> {
    type Error = QuarryError;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;

        seed.deserialize(Value {
            de: &mut *self.de,
            tag: self.tag,
            name: String::new(),
        })
        .map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}
