use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use quarry_common::{QuarryError, Result};
use std::fmt;
use std::io::{self, Read, Write};

/// Wire id of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagType {
    End,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    ByteArray,
    String,
    List,
    Compound,
    IntArray,
    LongArray,
}

impl TagType {
    pub fn from_id(id: u8) -> Result<Self> {
        Ok(match id {
            0 => TagType::End,
            1 => TagType::Byte,
            2 => TagType::Short,
            3 => TagType::Int,
            4 => TagType::Long,
            5 => TagType::Float,
            6 => TagType::Double,
            7 => TagType::ByteArray,
            8 => TagType::String,
            9 => TagType::List,
            10 => TagType::Compound,
            11 => TagType::IntArray,
            12 => TagType::LongArray,
            _ => return Err(QuarryError::format(format!("Invalid tag type: {}", id))),
        })
    }

    pub fn id(self) -> u8 {
        match self {
            TagType::End => 0,
            TagType::Byte => 1,
            TagType::Short => 2,
            TagType::Int => 3,
            TagType::Long => 4,
            TagType::Float => 5,
            TagType::Double => 6,
            TagType::ByteArray => 7,
            TagType::String => 8,
            TagType::List => 9,
            TagType::Compound => 10,
            TagType::IntArray => 11,
            TagType::LongArray => 12,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TagType::End => "TAG_End",
            TagType::Byte => "TAG_Byte",
            TagType::Short => "TAG_Short",
            TagType::Int => "TAG_Int",
            TagType::Long => "TAG_Long",
            TagType::Float => "TAG_Float",
            TagType::Double => "TAG_Double",
            TagType::ByteArray => "TAG_Byte_Array",
            TagType::String => "TAG_String",
            TagType::List => "TAG_List",
            TagType::Compound => "TAG_Compound",
            TagType::IntArray => "TAG_Int_Array",
            TagType::LongArray => "TAG_Long_Array",
        }
    }

    /// Payload size of fixed-width tags.
    fn fixed_size(self) -> Option<u64> {
        match self {
            TagType::Byte => Some(1),
            TagType::Short => Some(2),
            TagType::Int | TagType::Float => Some(4),
            TagType::Long | TagType::Double => Some(8),
            _ => None,
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) fn read_type<R: Read>(reader: &mut R) -> Result<TagType> {
    TagType::from_id(reader.read_u8()?)
}

/// Reads a string with a signed 16-bit byte count.
pub(crate) fn read_string<R: Read>(reader: &mut R) -> Result<String> {
    let length = reader.read_i16::<BigEndian>()?;
    if length < 0 {
        return Err(QuarryError::format(format!(
            "{} with size < 0",
            TagType::String
        )));
    }

    let mut bytes = vec![0u8; length as usize];
    reader.read_exact(&mut bytes)?;
    Ok(String::from_utf8(bytes)?)
}

pub(crate) fn write_string<W: Write>(writer: &mut W, value: &str) -> Result<()> {
    if value.len() > i16::MAX as usize {
        return Err(QuarryError::format(format!(
            "{} of {} bytes exceeds {}",
            TagType::String,
            value.len(),
            i16::MAX
        )));
    }

    writer.write_i16::<BigEndian>(value.len() as i16)?;
    writer.write_all(value.as_bytes())?;
    Ok(())
}

/// Reads the signed 32-bit element count of an array or list tag.
pub(crate) fn read_length<R: Read>(reader: &mut R, tag: TagType) -> Result<usize> {
    let length = reader.read_i32::<BigEndian>()?;
    if length < 0 {
        return Err(QuarryError::format(format!("{} with size < 0", tag)));
    }
    Ok(length as usize)
}

pub(crate) fn write_length<W: Write>(writer: &mut W, tag: TagType, length: usize) -> Result<()> {
    if length > i32::MAX as usize {
        return Err(QuarryError::format(format!(
            "{} with {} elements exceeds {}",
            tag,
            length,
            i32::MAX
        )));
    }
    writer.write_i32::<BigEndian>(length as i32)?;
    Ok(())
}

/// Reads exactly `length` bytes without trusting `length` for the allocation.
pub(crate) fn read_bytes<R: Read>(reader: &mut R, length: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.take(length as u64).read_to_end(&mut bytes)?;
    if bytes.len() != length {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {} bytes, found {}", length, bytes.len()),
        )
        .into());
    }
    Ok(bytes)
}

fn discard<R: Read>(reader: &mut R, count: u64) -> Result<()> {
    let copied = io::copy(&mut reader.take(count), &mut io::sink())?;
    if copied != count {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {} bytes, found {}", count, copied),
        )
        .into());
    }
    Ok(())
}

/// Reads and discards the payload of a tag of type `tag`.
pub(crate) fn skip<R: Read>(reader: &mut R, tag: TagType) -> Result<()> {
    if let Some(size) = tag.fixed_size() {
        return discard(reader, size);
    }

    match tag {
        TagType::String => {
            let length = reader.read_i16::<BigEndian>()?;
            if length < 0 {
                return Err(QuarryError::format(format!("{} with size < 0", tag)));
            }
            discard(reader, length as u64)
        }
        TagType::ByteArray => {
            let length = read_length(reader, tag)?;
            discard(reader, length as u64)
        }
        TagType::IntArray => {
            let length = read_length(reader, tag)?;
            discard(reader, length as u64 * 4)
        }
        TagType::LongArray => {
            let length = read_length(reader, tag)?;
            discard(reader, length as u64 * 8)
        }
        TagType::List => {
            let element = read_type(reader)?;
            let length = read_length(reader, tag)?;
            if length == 0 {
                return Ok(());
            }
            if let Some(size) = element.fixed_size() {
                return discard(reader, size * length as u64);
            }
            for _ in 0..length {
                skip(reader, element)?;
            }
            Ok(())
        }
        TagType::Compound => loop {
            let child = read_type(reader)?;
            if child == TagType::End {
                return Ok(());
            }
            read_string(reader)?;
            skip(reader, child)?;
        },
        TagType::End => Err(QuarryError::format(format!("unexpected {}", tag))),
        _ => unreachable!("fixed-size tags are handled above"),
    }
}

/// A schema-less tag tree. Compound children keep their stream order.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(TagType, Vec<Tag>),
    Compound(Vec<(String, Tag)>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    pub fn tag_type(&self) -> TagType {
        match self {
            Tag::End => TagType::End,
            Tag::Byte(_) => TagType::Byte,
            Tag::Short(_) => TagType::Short,
            Tag::Int(_) => TagType::Int,
            Tag::Long(_) => TagType::Long,
            Tag::Float(_) => TagType::Float,
            Tag::Double(_) => TagType::Double,
            Tag::ByteArray(_) => TagType::ByteArray,
            Tag::String(_) => TagType::String,
            Tag::List(..) => TagType::List,
            Tag::Compound(_) => TagType::Compound,
            Tag::IntArray(_) => TagType::IntArray,
            Tag::LongArray(_) => TagType::LongArray,
        }
    }

    pub fn get_type_id(&self) -> u8 {
        self.tag_type().id()
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<(String, Tag)> {
        let tag = read_type(reader)?;
        if tag == TagType::End {
            return Ok((String::new(), Tag::End));
        }

        let name = read_string(reader)?;
        let tag = Tag::read_payload(reader, tag)?;
        Ok((name, tag))
    }

    pub fn read_payload<R: Read>(reader: &mut R, tag: TagType) -> Result<Tag> {
        match tag {
            TagType::End => Ok(Tag::End),
            TagType::Byte => Ok(Tag::Byte(reader.read_i8()?)),
            TagType::Short => Ok(Tag::Short(reader.read_i16::<BigEndian>()?)),
            TagType::Int => Ok(Tag::Int(reader.read_i32::<BigEndian>()?)),
            TagType::Long => Ok(Tag::Long(reader.read_i64::<BigEndian>()?)),
            TagType::Float => Ok(Tag::Float(reader.read_f32::<BigEndian>()?)),
            TagType::Double => Ok(Tag::Double(reader.read_f64::<BigEndian>()?)),
            TagType::ByteArray => {
                let length = read_length(reader, tag)?;
                let bytes = read_bytes(reader, length)?;
                Ok(Tag::ByteArray(bytes.into_iter().map(|b| b as i8).collect()))
            }
            TagType::String => Ok(Tag::String(read_string(reader)?)),
            TagType::List => {
                let element = read_type(reader)?;
                let length = read_length(reader, tag)?;
                if element == TagType::End && length > 0 {
                    return Err(QuarryError::format(format!(
                        "{} of {} with {} elements",
                        TagType::List,
                        TagType::End,
                        length
                    )));
                }
                let mut list = Vec::with_capacity(length.min(1024));
                for _ in 0..length {
                    list.push(Tag::read_payload(reader, element)?);
                }
                Ok(Tag::List(element, list))
            }
            TagType::Compound => {
                let mut compound = Vec::new();
                loop {
                    let (name, tag) = Tag::read(reader)?;
                    if let Tag::End = tag {
                        break;
                    }
                    compound.push((name, tag));
                }
                Ok(Tag::Compound(compound))
            }
            TagType::IntArray => {
                let length = read_length(reader, tag)?;
                let mut ints = Vec::with_capacity(length.min(1024));
                for _ in 0..length {
                    ints.push(reader.read_i32::<BigEndian>()?);
                }
                Ok(Tag::IntArray(ints))
            }
            TagType::LongArray => {
                let length = read_length(reader, tag)?;
                let mut longs = Vec::with_capacity(length.min(1024));
                for _ in 0..length {
                    longs.push(reader.read_i64::<BigEndian>()?);
                }
                Ok(Tag::LongArray(longs))
            }
        }
    }

    pub fn write<W: Write>(&self, writer: &mut W, name: &str) -> Result<()> {
        writer.write_u8(self.get_type_id())?;

        if !matches!(self, Tag::End) {
            write_string(writer, name)?;
        }

        self.write_payload(writer)
    }

    pub fn write_payload<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Tag::End => {}
            Tag::Byte(v) => writer.write_i8(*v)?,
            Tag::Short(v) => writer.write_i16::<BigEndian>(*v)?,
            Tag::Int(v) => writer.write_i32::<BigEndian>(*v)?,
            Tag::Long(v) => writer.write_i64::<BigEndian>(*v)?,
            Tag::Float(v) => writer.write_f32::<BigEndian>(*v)?,
            Tag::Double(v) => writer.write_f64::<BigEndian>(*v)?,
            Tag::ByteArray(v) => {
                write_length(writer, TagType::ByteArray, v.len())?;
                let bytes: Vec<u8> = v.iter().map(|&b| b as u8).collect();
                writer.write_all(&bytes)?;
            }
            Tag::String(v) => write_string(writer, v)?,
            Tag::List(element, v) => {
                if let Some(other) = v.iter().find(|t| t.tag_type() != *element) {
                    return Err(QuarryError::format(format!(
                        "{} of {} holds a {}",
                        TagType::List,
                        element,
                        other.tag_type()
                    )));
                }
                writer.write_u8(element.id())?;
                write_length(writer, TagType::List, v.len())?;
                for tag in v {
                    tag.write_payload(writer)?;
                }
            }
            Tag::Compound(v) => {
                for (name, tag) in v {
                    tag.write(writer, name)?;
                }
                Tag::End.write(writer, "")?;
            }
            Tag::IntArray(v) => {
                write_length(writer, TagType::IntArray, v.len())?;
                for &i in v {
                    writer.write_i32::<BigEndian>(i)?;
                }
            }
            Tag::LongArray(v) => {
                write_length(writer, TagType::LongArray, v.len())?;
                for &l in v {
                    writer.write_i64::<BigEndian>(l)?;
                }
            }
        }
        Ok(())
    }

    /// Looks up a direct child of a compound by name.
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.as_compound()?
            .iter()
            .find(|(child, _)| child == name)
            .map(|(_, tag)| tag)
    }

    pub fn as_compound(&self) -> Option<&Vec<(String, Tag)>> {
        match self {
            Tag::Compound(children) => Some(children),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Tag>> {
        match self {
            Tag::List(_, list) => Some(list),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&String> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Tag::Long(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Tag::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Tag::Short(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i8(&self) -> Option<i8> {
        match self {
            Tag::Byte(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Tag::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Tag::Float(n) => Some(*n),
            _ => None,
        }
    }
}

impl serde::Serialize for Tag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        match self {
            Tag::End => serializer.serialize_unit(),
            Tag::Byte(v) => serializer.serialize_i8(*v),
            Tag::Short(v) => serializer.serialize_i16(*v),
            Tag::Int(v) => serializer.serialize_i32(*v),
            Tag::Long(v) => serializer.serialize_i64(*v),
            Tag::Float(v) => serializer.serialize_f32(*v),
            Tag::Double(v) => serializer.serialize_f64(*v),
            Tag::ByteArray(v) => serializer.collect_seq(v),
            Tag::String(v) => serializer.serialize_str(v),
            Tag::List(_, v) => serializer.collect_seq(v),
            Tag::Compound(v) => {
                let mut map = serializer.serialize_map(Some(v.len()))?;
                for (name, tag) in v {
                    map.serialize_entry(name, tag)?;
                }
                map.end()
            }
            Tag::IntArray(v) => serializer.collect_seq(v),
            Tag::LongArray(v) => serializer.collect_seq(v),
        }
    }
}
