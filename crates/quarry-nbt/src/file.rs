use crate::tag::{Tag, TagType};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use quarry_common::{QuarryError, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// One named root tag read without a schema, e.g. for dumping.
#[derive(Debug, Clone, PartialEq)]
pub struct NBTFile {
    pub name: String,
    pub root: Tag,
}

impl NBTFile {
    pub fn new(name: impl Into<String>, root: Tag) -> Self {
        NBTFile {
            name: name.into(),
            root,
        }
    }

    /// Reads an uncompressed stream. A stream holding only `TAG_End` is rejected.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let (name, root) = Tag::read(reader)?;
        if root == Tag::End {
            return Err(QuarryError::format(format!("empty stream: root is {}", TagType::End)));
        }
        Ok(NBTFile { name, root })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.root.write(writer, &self.name)
    }

    pub fn read_gzip<R: Read>(reader: R) -> Result<Self> {
        Self::read(&mut BufReader::new(GzDecoder::new(reader)))
    }

    pub fn write_gzip<W: Write>(&self, writer: W) -> Result<()> {
        let mut encoder = GzEncoder::new(writer, Compression::default());
        self.write(&mut encoder)?;
        encoder.finish()?;
        Ok(())
    }

    /// Opens a gzip-compressed file such as `level.dat`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read_gzip(File::open(path)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_gzip(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Cursor;

    fn sample() -> NBTFile {
        NBTFile::new(
            "Data",
            Tag::Compound(vec![
                ("LevelName".to_string(), Tag::String("world".to_string())),
                ("SpawnY".to_string(), Tag::Int(64)),
                (
                    "Pos".to_string(),
                    Tag::List(TagType::Double, vec![Tag::Double(0.5), Tag::Double(70.0)]),
                ),
            ]),
        )
    }

    #[test]
    fn test_plain_and_gzip_streams() {
        let file = sample();

        let mut plain = Vec::new();
        file.write(&mut plain).unwrap();
        assert_eq!(NBTFile::read(&mut Cursor::new(plain)).unwrap(), file);

        let mut packed = Vec::new();
        file.write_gzip(&mut packed).unwrap();
        assert_eq!(&packed[..2], &[0x1f, 0x8b]);
        assert_eq!(NBTFile::read_gzip(packed.as_slice()).unwrap(), file);
    }

    #[test]
    fn test_open_and_save() {
        let path = std::env::temp_dir().join(format!("quarry-nbtfile-{}.dat", std::process::id()));
        let file = sample();

        file.save(&path).unwrap();
        let opened = NBTFile::open(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(opened, file);
    }

    #[test]
    fn test_empty_stream() {
        assert_matches!(
            NBTFile::read(&mut Cursor::new(vec![0u8])),
            Err(QuarryError::FormatError(_))
        );
    }
}
