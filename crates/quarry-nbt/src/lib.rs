//! Binary tag codec: a dynamic [`Tag`] tree plus a serde `Serializer` and
//! `Deserializer` mapping records to and from tag streams.

mod de;
mod file;
pub mod flag;
mod ser;
mod tag;
pub mod timestamp;
pub mod unsigned;

pub use de::{from_reader, from_reader_named, from_slice, Deserializer};
pub use file::NBTFile;
pub use ser::{to_vec, to_writer, Serializer};
pub use tag::{Tag, TagType};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use quarry_common::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// `skip_serializing_if` predicate for fields holding their zero value.
pub fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

pub fn from_gzip_reader<R: Read, T: DeserializeOwned>(reader: R) -> Result<T> {
    from_reader(BufReader::new(GzDecoder::new(reader)))
}

pub fn to_gzip_writer<W: Write, T: Serialize + ?Sized>(writer: W, name: &str, value: &T) -> Result<()> {
    let mut encoder = GzEncoder::new(writer, Compression::default());
    to_writer(&mut encoder, name, value)?;
    encoder.finish()?;
    Ok(())
}

/// Reads a gzip-compressed root record such as `level.dat`.
pub fn from_gzip_file<P: AsRef<Path>, T: DeserializeOwned>(path: P) -> Result<T> {
    from_gzip_reader(File::open(path)?)
}

pub fn to_gzip_file<P: AsRef<Path>, T: Serialize + ?Sized>(path: P, name: &str, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    to_gzip_writer(&mut writer, name, value)?;
    writer.flush()?;
    Ok(())
}
