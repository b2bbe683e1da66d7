use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use quarry_common::{QuarryError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Read};
use std::time::{SystemTime, UNIX_EPOCH};

/// Byte size of one region sector.
pub const SECTOR_SIZE: usize = 4096;
/// Length prefix plus scheme byte in front of every stored chunk.
pub const CHUNK_HEADER_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionScheme {
    Gzip = 1,
    Zlib = 2,
}

impl CompressionScheme {
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(CompressionScheme::Gzip),
            2 => Some(CompressionScheme::Zlib),
            _ => None,
        }
    }
}

/// Number of sectors needed to hold `len` bytes.
pub fn sectors_for(len: usize) -> usize {
    (len + SECTOR_SIZE - 1) / SECTOR_SIZE
}

#[derive(Serialize)]
struct LevelRef<'a, T> {
    #[serde(rename = "Level")]
    level: &'a T,
}

#[derive(Deserialize)]
struct LevelOwned<T> {
    #[serde(rename = "Level")]
    level: T,
}

/// One slot of a region: an opaque compressed chunk blob.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkDescriptor {
    pub x: i32,
    pub z: i32,
    pub last_modified: SystemTime,
    scheme: u8,
    data: Vec<u8>,
    sector: u32,
    corrupt: Option<String>,
}

impl ChunkDescriptor {
    /// An empty slot at region-local coordinates `x`, `z`.
    pub fn new(x: i32, z: i32) -> Self {
        ChunkDescriptor {
            x,
            z,
            last_modified: UNIX_EPOCH,
            scheme: 0,
            data: Vec::new(),
            sector: 0,
            corrupt: None,
        }
    }

    /// True if the chunk has not been generated yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.corrupt.is_none()
    }

    /// True if the header points at a blob that could not be read back.
    /// Such a slot counts as present but fails to decode, and is dropped on save.
    pub fn is_corrupt(&self) -> bool {
        self.corrupt.is_some()
    }

    /// Raw scheme id of the stored blob. Not validated until decompression.
    pub fn scheme(&self) -> u8 {
        self.scheme
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Sector offset this blob was loaded from, 0 if it never was.
    pub fn sector(&self) -> u32 {
        self.sector
    }

    /// Length of the blob as framed on disk.
    pub fn framed_len(&self) -> usize {
        if self.data.is_empty() {
            0
        } else {
            CHUNK_HEADER_SIZE + self.data.len()
        }
    }

    pub fn sector_count(&self) -> usize {
        sectors_for(self.framed_len())
    }

    pub fn clear(&mut self) {
        self.scheme = 0;
        self.data = Vec::new();
        self.sector = 0;
        self.corrupt = None;
    }

    /// Replaces the blob with already compressed bytes.
    pub fn set_raw(&mut self, scheme: u8, data: Vec<u8>, last_modified: SystemTime) {
        self.scheme = scheme;
        self.data = data;
        self.last_modified = last_modified;
        self.corrupt = None;
    }

    pub(crate) fn set_sector(&mut self, sector: u32) {
        self.sector = sector;
    }

    pub(crate) fn mark_corrupt(&mut self, sector: u32, reason: impl Into<String>) {
        self.clear();
        self.sector = sector;
        self.corrupt = Some(reason.into());
    }

    /// Decompressed view of the blob.
    pub fn reader(&self) -> Result<Box<dyn Read + '_>> {
        if let Some(reason) = &self.corrupt {
            return Err(QuarryError::format(reason.clone()));
        }
        match CompressionScheme::from_id(self.scheme) {
            Some(CompressionScheme::Gzip) => Ok(Box::new(BufReader::new(GzDecoder::new(self.data.as_slice())))),
            Some(CompressionScheme::Zlib) => Ok(Box::new(BufReader::new(ZlibDecoder::new(self.data.as_slice())))),
            None => Err(QuarryError::format(format!(
                "unknown compression scheme {}",
                self.scheme
            ))),
        }
    }

    /// Decodes the `Level` compound of the stored chunk.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let root: LevelOwned<T> = quarry_nbt::from_reader(self.reader()?)?;
        Ok(root.level)
    }

    /// Compresses `value` wrapped in a `Level` compound and replaces the blob.
    pub fn encode<T: Serialize>(&mut self, value: &T, last_modified: SystemTime) -> Result<()> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        quarry_nbt::to_writer(&mut encoder, "", &LevelRef { level: value })?;
        let data = encoder.finish()?;

        self.set_raw(CompressionScheme::Zlib.id(), data, last_modified);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use quarry_nbt::Tag;
    use std::time::Duration;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Stub {
        #[serde(rename = "xPos")]
        x: i32,
        #[serde(rename = "Biomes")]
        biomes: Vec<u8>,
    }

    #[test]
    fn test_sector_sizing() {
        assert_eq!(sectors_for(0), 0);
        assert_eq!(sectors_for(100), 1);
        assert_eq!(sectors_for(4096), 1);
        assert_eq!(sectors_for(4097), 2);

        let mut descriptor = ChunkDescriptor::new(0, 0);
        assert_eq!(descriptor.sector_count(), 0);

        descriptor.set_raw(2, vec![0; 100], UNIX_EPOCH);
        assert_eq!(descriptor.framed_len(), 105);
        assert_eq!(descriptor.sector_count(), 1);

        descriptor.set_raw(2, vec![0; 4091], UNIX_EPOCH);
        assert_eq!(descriptor.sector_count(), 1);

        descriptor.set_raw(2, vec![0; 4092], UNIX_EPOCH);
        assert_eq!(descriptor.sector_count(), 2);
    }

    #[test]
    fn test_encode_decode() {
        let stub = Stub {
            x: -3,
            biomes: vec![1; 256],
        };
        let when = UNIX_EPOCH + Duration::from_secs(42);

        let mut descriptor = ChunkDescriptor::new(1, 2);
        descriptor.encode(&stub, when).unwrap();
        assert!(!descriptor.is_empty());
        assert_eq!(descriptor.scheme(), CompressionScheme::Zlib.id());
        assert_eq!(descriptor.last_modified, when);

        let decoded: Stub = descriptor.decode().unwrap();
        assert_eq!(decoded, stub);

        let (name, tree) = Tag::read(&mut descriptor.reader().unwrap()).unwrap();
        assert_eq!(name, "");
        assert_eq!(tree.get("Level").and_then(|level| level.get("xPos")), Some(&Tag::Int(-3)));
    }

    #[test]
    fn test_gzip_blob() {
        let mut bytes = Vec::new();
        let root = Tag::Compound(vec![(
            "Level".to_string(),
            Tag::Compound(vec![("xPos".to_string(), Tag::Int(9))]),
        )]);
        let mut encoder = flate2::write::GzEncoder::new(&mut bytes, Compression::default());
        root.write(&mut encoder, "").unwrap();
        encoder.finish().unwrap();

        let mut descriptor = ChunkDescriptor::new(0, 0);
        descriptor.set_raw(CompressionScheme::Gzip.id(), bytes, UNIX_EPOCH);
        let decoded: Stub = descriptor.decode().unwrap();
        assert_eq!(decoded.x, 9);
    }

    #[test]
    fn test_unknown_scheme() {
        let mut descriptor = ChunkDescriptor::new(0, 0);
        descriptor.set_raw(7, vec![1, 2, 3], UNIX_EPOCH);
        assert_matches!(descriptor.decode::<Stub>(), Err(QuarryError::FormatError(_)));
    }

    #[test]
    fn test_missing_level() {
        let mut descriptor = ChunkDescriptor::new(0, 0);
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        Tag::Compound(vec![]).write(&mut encoder, "").unwrap();
        descriptor.set_raw(2, encoder.finish().unwrap(), UNIX_EPOCH);

        assert_matches!(descriptor.decode::<Stub>(), Err(QuarryError::TypeError(_)));
    }

    #[test]
    fn test_clear() {
        let mut descriptor = ChunkDescriptor::new(4, 5);
        descriptor.encode(&Stub::default(), UNIX_EPOCH).unwrap();
        descriptor.clear();
        assert!(descriptor.is_empty());
        assert_eq!(descriptor.framed_len(), 0);
        assert_eq!((descriptor.x, descriptor.z), (4, 5));
    }

    #[test]
    fn test_corrupt_slot() {
        let mut descriptor = ChunkDescriptor::new(9, 0);
        descriptor.mark_corrupt(40, "chunk data cut short");
        assert!(!descriptor.is_empty());
        assert!(descriptor.is_corrupt());
        assert_eq!(descriptor.framed_len(), 0);
        assert_eq!(descriptor.sector(), 40);
        assert_matches!(descriptor.decode::<Stub>(), Err(QuarryError::FormatError(_)));

        descriptor.encode(&Stub::default(), UNIX_EPOCH).unwrap();
        assert!(!descriptor.is_corrupt());
        assert!(descriptor.decode::<Stub>().is_ok());
    }
}
