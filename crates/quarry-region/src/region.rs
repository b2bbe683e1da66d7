use crate::chunk::Chunk;
use crate::descriptor::{ChunkDescriptor, SECTOR_SIZE};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use quarry_common::{QuarryError, Result, CHUNKS_PER_REGION};
use quarry_logger::{log, LogSeverity};
use quarry_nbt::timestamp;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Chunk slots per region.
pub const CHUNKS: usize = (CHUNKS_PER_REGION * CHUNKS_PER_REGION) as usize;
/// File extension of region files, without the dot.
pub const REGION_FILE_EXTENSION: &str = "mca";

/// Sectors taken by the location and timestamp tables.
const HEADER_SECTORS: usize = 2;
const MAX_SECTOR_OFFSET: usize = 0xFF_FFFF;
const MAX_SECTOR_COUNT: usize = 0xFF;

/// Parses the region coordinates out of a `r.<X>.<Z>.<ext>` file name.
/// Leading directories are ignored.
pub fn region_coords<P: AsRef<Path>>(path: P) -> Option<(i32, i32)> {
    let name = path.as_ref().file_name()?.to_str()?;

    let fields: Vec<&str> = name.split('.').collect();
    if fields.len() != 4 {
        return None;
    }

    let x = fields[1].parse::<i32>().ok()?;
    let z = fields[2].parse::<i32>().ok()?;
    Some((x, z))
}

/// Slot index of a chunk. Coordinates wrap into the 32x32 grid.
pub fn chunk_index(x: i32, z: i32) -> usize {
    let x = x.rem_euclid(CHUNKS_PER_REGION);
    let z = z.rem_euclid(CHUNKS_PER_REGION);
    (x + z * CHUNKS_PER_REGION) as usize
}

/// An in-memory region file: 1024 compressed chunk slots.
///
/// Changes stay in memory until [`Region::save`] rewrites the whole file.
#[derive(Debug)]
pub struct Region {
    path: PathBuf,
    pub x: i32,
    pub z: i32,
    chunks: Vec<ChunkDescriptor>,
}

impl Region {
    /// Writes an empty region file at `path` and loads it.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Region> {
        let path = path.as_ref();
        let (x, z) = region_coords(path)
            .ok_or_else(|| QuarryError::contract(format!("invalid region file name {:?}", path)))?;

        let file = File::create(path).map_err(|e| QuarryError::from(e).in_region(x, z))?;
        Region::init(file, path, x, z)
    }

    /// Creates the region file at `path`, failing if it already exists.
    pub(crate) fn create_new(path: &Path) -> Result<Region> {
        let (x, z) = region_coords(path)
            .ok_or_else(|| QuarryError::contract(format!("invalid region file name {:?}", path)))?;

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| QuarryError::from(e).in_region(x, z))?;
        Region::init(file, path, x, z)
    }

    /// Fills a freshly opened file with empty header tables and loads it.
    fn init(mut file: File, path: &Path, x: i32, z: i32) -> Result<Region> {
        file.write_all(&[0; HEADER_SECTORS * SECTOR_SIZE])
            .map_err(|e| QuarryError::from(e).in_region(x, z))?;
        drop(file);

        Region::load(path)
    }

    /// Reads the region headers and every present chunk blob. Blobs are kept
    /// compressed.
    ///
    /// A slot whose blob lies in the header sectors or runs past the end of the
    /// file does not fail the load: it is kept as a corrupt slot that errors
    /// when read.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Region> {
        let path = path.as_ref();
        let (rx, rz) = region_coords(path)
            .ok_or_else(|| QuarryError::contract(format!("invalid region file name {:?}", path)))?;

        let mut reader = File::open(path)
            .map(BufReader::new)
            .map_err(|e| QuarryError::from(e).in_region(rx, rz))?;

        let mut locations = [0u8; SECTOR_SIZE];
        let mut timestamps = [0u8; SECTOR_SIZE];
        reader
            .read_exact(&mut locations)
            .and_then(|_| reader.read_exact(&mut timestamps))
            .map_err(|e| QuarryError::from(e).in_region(rx, rz))?;

        let mut region = Region {
            path: path.to_path_buf(),
            x: rx,
            z: rz,
            chunks: (0..CHUNKS as i32)
                .map(|index| ChunkDescriptor::new(index % CHUNKS_PER_REGION, index / CHUNKS_PER_REGION))
                .collect(),
        };

        for (index, descriptor) in region.chunks.iter_mut().enumerate() {
            let entry = &locations[index * 4..index * 4 + 4];
            let offset = (entry[0] as u32) << 16 | (entry[1] as u32) << 8 | entry[2] as u32;
            let sectors = entry[3];
            if offset == 0 && sectors == 0 {
                continue;
            }

            if (offset as usize) < HEADER_SECTORS {
                let reason = format!("chunk points into header sector {}", offset);
                log(
                    format!("region r({} {}) chunk ({} {}): {}", rx, rz, descriptor.x, descriptor.z, reason),
                    LogSeverity::Warning,
                );
                descriptor.mark_corrupt(offset, reason);
                continue;
            }

            let stamp = (&timestamps[index * 4..]).read_u32::<BigEndian>()?;
            match read_blob(&mut reader, descriptor, offset, stamp) {
                Ok(()) => {}
                Err(QuarryError::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    log(
                        format!(
                            "region r({} {}) chunk ({} {}) is truncated: {}",
                            rx, rz, descriptor.x, descriptor.z, e
                        ),
                        LogSeverity::Warning,
                    );
                    descriptor.mark_corrupt(offset, format!("truncated chunk at sector {}: {}", offset, e));
                }
                Err(e) => return Err(e.in_chunk(rx, rz, descriptor.x, descriptor.z)),
            }
        }

        log(
            format!("loaded region r({} {}) with {} chunks", rx, rz, region.chunk_len()),
            LogSeverity::Debug,
        );
        Ok(region)
    }

    /// Rewrites the whole file, packing chunks in slot order right after the
    /// header sectors.
    pub fn save(&self) -> Result<()> {
        let layout = self.layout()?;

        let mut locations = [0u8; SECTOR_SIZE];
        let mut timestamps = [0u8; SECTOR_SIZE];
        for &(index, offset, sectors) in &layout {
            let entry = &mut locations[index * 4..index * 4 + 4];
            entry[0] = (offset >> 16) as u8;
            entry[1] = (offset >> 8) as u8;
            entry[2] = offset as u8;
            entry[3] = sectors as u8;

            let seconds = timestamp::to_seconds(self.chunks[index].last_modified);
            let stamp = seconds.clamp(0, u32::MAX as i64) as u32;
            (&mut timestamps[index * 4..index * 4 + 4]).write_u32::<BigEndian>(stamp)?;
        }

        self.write_file(&locations, &timestamps, &layout)
            .map_err(|e| QuarryError::from(e).in_region(self.x, self.z))?;

        log(
            format!(
                "saved region r({} {}) with {} chunks",
                self.x,
                self.z,
                layout.len()
            ),
            LogSeverity::Debug,
        );
        Ok(())
    }

    /// Sector offset and count for every slot holding a blob, in slot order.
    /// Corrupt slots have none and are not written.
    fn layout(&self) -> Result<Vec<(usize, usize, usize)>> {
        let mut layout = Vec::new();
        let mut offset = HEADER_SECTORS;

        for (index, descriptor) in self.chunks.iter().enumerate() {
            if descriptor.framed_len() == 0 {
                continue;
            }

            let sectors = descriptor.sector_count();
            if sectors > MAX_SECTOR_COUNT {
                return Err(QuarryError::format(format!(
                    "chunk needs {} sectors, at most {} fit",
                    sectors, MAX_SECTOR_COUNT
                ))
                .in_chunk(self.x, self.z, descriptor.x, descriptor.z));
            }
            if offset > MAX_SECTOR_OFFSET {
                return Err(QuarryError::format(format!("sector offset {} out of range", offset))
                    .in_chunk(self.x, self.z, descriptor.x, descriptor.z));
            }

            layout.push((index, offset, sectors));
            offset += sectors;
        }

        Ok(layout)
    }

    fn write_file(
        &self,
        locations: &[u8],
        timestamps: &[u8],
        layout: &[(usize, usize, usize)],
    ) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        writer.write_all(locations)?;
        writer.write_all(timestamps)?;

        for &(index, offset, _) in layout {
            let descriptor = &self.chunks[index];
            writer.seek(SeekFrom::Start((offset * SECTOR_SIZE) as u64))?;
            writer.write_u32::<BigEndian>(descriptor.data().len() as u32)?;
            writer.write_u8(descriptor.scheme())?;
            writer.write_all(descriptor.data())?;
        }

        writer.flush()
    }

    /// Empties every slot. The file is untouched until the next save.
    pub fn clear(&mut self) {
        self.chunks.iter_mut().for_each(ChunkDescriptor::clear);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of generated chunks.
    pub fn chunk_len(&self) -> usize {
        self.chunks.iter().filter(|d| !d.is_empty()).count()
    }

    /// Region-local coordinates of every generated chunk, in slot order.
    pub fn chunks(&self) -> Vec<(i32, i32)> {
        self.chunks
            .iter()
            .filter(|d| !d.is_empty())
            .map(|d| (d.x, d.z))
            .collect()
    }

    pub fn has_chunk(&self, x: i32, z: i32) -> bool {
        !self.descriptor(x, z).is_empty()
    }

    pub fn descriptor(&self, x: i32, z: i32) -> &ChunkDescriptor {
        &self.chunks[chunk_index(x, z)]
    }

    pub fn descriptor_mut(&mut self, x: i32, z: i32) -> &mut ChunkDescriptor {
        &mut self.chunks[chunk_index(x, z)]
    }

    /// All 1024 slots in index order.
    pub fn descriptors(&self) -> &[ChunkDescriptor] {
        &self.chunks
    }

    /// Decodes the chunk at `x`, `z`. `Ok(None)` means the chunk was never
    /// generated; a blob that fails to decode is an error.
    pub fn read_chunk(&self, x: i32, z: i32) -> Result<Option<Chunk>> {
        self.read_chunk_as(x, z)
    }

    pub fn read_chunk_as<T: DeserializeOwned>(&self, x: i32, z: i32) -> Result<Option<T>> {
        let descriptor = self.descriptor(x, z);
        if descriptor.is_empty() {
            return Ok(None);
        }

        descriptor
            .decode()
            .map(Some)
            .map_err(|e| e.in_chunk(self.x, self.z, descriptor.x, descriptor.z))
    }

    /// Compresses `chunk` into its slot, stamping it with the current time.
    pub fn write_chunk(&mut self, x: i32, z: i32, chunk: &mut Chunk) -> Result<()> {
        let now = timestamp::from_seconds(quarry_logger::unix_timestamp());
        chunk.last_update = now;
        self.encode_chunk(x, z, chunk, now)
    }

    pub fn write_chunk_as<T: Serialize>(&mut self, x: i32, z: i32, value: &T) -> Result<()> {
        let now = timestamp::from_seconds(quarry_logger::unix_timestamp());
        self.encode_chunk(x, z, value, now)
    }

    fn encode_chunk<T: Serialize>(
        &mut self,
        x: i32,
        z: i32,
        value: &T,
        now: std::time::SystemTime,
    ) -> Result<()> {
        let (rx, rz) = (self.x, self.z);
        let descriptor = self.descriptor_mut(x, z);
        let (cx, cz) = (descriptor.x, descriptor.z);
        descriptor
            .encode(value, now)
            .map_err(|e| e.in_chunk(rx, rz, cx, cz))
    }
}

fn read_blob<R: Read + Seek>(
    reader: &mut R,
    descriptor: &mut ChunkDescriptor,
    offset: u32,
    stamp: u32,
) -> Result<()> {
    reader.seek(SeekFrom::Start(offset as u64 * SECTOR_SIZE as u64))?;
    let len = reader.read_u32::<BigEndian>()? as usize;
    let scheme = reader.read_u8()?;

    let mut data = Vec::new();
    reader.take(len as u64).read_to_end(&mut data)?;
    if data.len() != len {
        return Err(QuarryError::from(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("chunk data cut short at {} of {} bytes", data.len(), len),
        )));
    }

    descriptor.set_raw(scheme, data, timestamp::from_seconds(stamp as i64));
    descriptor.set_sector(offset);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Block, BlockId};
    use crate::descriptor::CompressionScheme;
    use assert_matches::assert_matches;
    use quarry_common::ErrorKind;
    use std::time::{Duration, UNIX_EPOCH};

    fn temp_region(name: &str, x: i32, z: i32) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("quarry-region-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(format!("r.{}.{}.mca", x, z))
    }

    #[test]
    fn test_region_coords() {
        assert_eq!(region_coords(""), None);
        assert_eq!(region_coords("r.1.2"), None);
        assert_eq!(region_coords("r.1.2."), Some((1, 2)));
        assert_eq!(region_coords("r.1.2.mca"), Some((1, 2)));
        assert_eq!(region_coords("r.-1.2.mca"), Some((-1, 2)));
        assert_eq!(region_coords("/a/b/x.-1.2.mca"), Some((-1, 2)));
        assert_eq!(region_coords("r.a.2.mca"), None);
        assert_eq!(region_coords("r.1.2.3.mca"), None);
    }

    #[test]
    fn test_chunk_index() {
        for x in -70..70 {
            for z in -70..70 {
                let index = chunk_index(x, z);
                assert!(index < CHUNKS);
                assert_eq!(index, chunk_index(x + 32, z));
                assert_eq!(index, chunk_index(x, z + 32));
            }
        }
        assert_eq!(chunk_index(0, 0), 0);
        assert_eq!(chunk_index(31, 0), 31);
        assert_eq!(chunk_index(0, 1), 32);
        assert_eq!(chunk_index(-1, -1), 1023);
    }

    #[test]
    fn test_create_empty_region() {
        let path = temp_region("empty", 3, -4);
        let region = Region::create(&path).unwrap();
        assert_eq!((region.x, region.z), (3, -4));
        assert_eq!(region.chunk_len(), 0);
        assert_eq!(region.descriptors().len(), CHUNKS);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 8192);
        assert_matches!(region.read_chunk(0, 0), Ok(None));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_name() {
        let path = std::env::temp_dir().join("quarry-region-bad.mca");
        assert_matches!(Region::create(&path), Err(QuarryError::ContractError(_)));
        assert_matches!(Region::load(&path), Err(QuarryError::ContractError(_)));
    }

    #[test]
    fn test_missing_file() {
        let path = temp_region("missing", 99, 99);
        let err = Region::load(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_matches!(err, QuarryError::RegionError { x: 99, z: 99, chunk: None, .. });
    }

    #[test]
    fn test_region_round_trip() {
        let path = temp_region("round-trip", 0, 0);
        let mut region = Region::create(&path).unwrap();

        let coords = [(0, 0), (31, 31), (5, 17), (16, 0)];
        for &(x, z) in &coords {
            let mut chunk = Chunk::new(x, z);
            chunk.write_block(x % 16, 70, z % 16, &Block::new(BlockId::new(1, (x % 7) as u32)));
            region.write_chunk(x, z, &mut chunk).unwrap();
        }
        region.save().unwrap();

        let reopened = Region::load(&path).unwrap();
        assert_eq!(reopened.chunk_len(), coords.len());
        assert_eq!(reopened.chunks(), vec![(0, 0), (16, 0), (5, 17), (31, 31)]);

        for &(x, z) in &coords {
            assert_eq!(reopened.descriptor(x, z).data(), region.descriptor(x, z).data());

            let chunk = reopened.read_chunk(x, z).unwrap().unwrap();
            assert_eq!((chunk.x, chunk.z), (x, z));
            let block = chunk.read_block(x % 16, 70, z % 16).unwrap();
            assert_eq!(block.id, BlockId::new(1, (x % 7) as u32));
        }
        assert!(!reopened.has_chunk(1, 1));
        assert_matches!(reopened.read_chunk(1, 1), Ok(None));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_layout() {
        let path = temp_region("layout", 1, 1);
        let mut region = Region::create(&path).unwrap();
        region.descriptor_mut(0, 0).set_raw(2, vec![0xAA; 5000], UNIX_EPOCH);
        region.descriptor_mut(1, 0).set_raw(2, vec![0xBB; 10], UNIX_EPOCH);
        region.save().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..4], &[0, 0, 2, 2]);
        assert_eq!(&bytes[4..8], &[0, 0, 4, 1]);
        assert_eq!(&bytes[2 * SECTOR_SIZE..2 * SECTOR_SIZE + 5], &[0, 0, 0x13, 0x88, 2]);
        assert_eq!(&bytes[4 * SECTOR_SIZE..4 * SECTOR_SIZE + 5], &[0, 0, 0, 10, 2]);
        assert_eq!(bytes.len(), 4 * SECTOR_SIZE + 15);

        let reopened = Region::load(&path).unwrap();
        assert_eq!(reopened.descriptor(0, 0).sector(), 2);
        assert_eq!(reopened.descriptor(1, 0).sector(), 4);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_oversized_chunk() {
        let path = temp_region("oversized", 2, 2);
        let mut region = Region::create(&path).unwrap();
        region
            .descriptor_mut(3, 4)
            .set_raw(2, vec![0; 256 * SECTOR_SIZE], UNIX_EPOCH);

        let err = region.save().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.chunk(), Some((3, 4)));

        // The file was left as it was.
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 8192);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_corrupt_chunk() {
        let path = temp_region("corrupt", -1, 0);
        let mut region = Region::create(&path).unwrap();
        region.write_chunk(0, 0, &mut Chunk::new(-32, 0)).unwrap();
        region.descriptor_mut(1, 0).set_raw(2, vec![1, 2, 3, 4], UNIX_EPOCH);
        region.write_chunk(2, 0, &mut Chunk::new(-30, 0)).unwrap();
        region.save().unwrap();

        let reopened = Region::load(&path).unwrap();
        let err = reopened.read_chunk(1, 0).unwrap_err();
        assert_matches!(err, QuarryError::RegionError { x: -1, z: 0, chunk: Some((1, 0)), .. });

        assert_eq!(reopened.read_chunk(0, 0).unwrap().unwrap().x, -32);
        assert_eq!(reopened.read_chunk(2, 0).unwrap().unwrap().x, -30);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_truncated_chunk_keeps_the_rest() {
        let path = temp_region("truncated", 0, 2);
        let mut region = Region::create(&path).unwrap();
        for x in 0..10 {
            region.write_chunk(x, 0, &mut Chunk::new(x, 64)).unwrap();
        }
        region.save().unwrap();

        let length = std::fs::metadata(&path).unwrap().len();
        OpenOptions::new()
            .write(true)
            .open(&path)
            .unwrap()
            .set_len(length - 3)
            .unwrap();

        let reopened = Region::load(&path).unwrap();
        assert_eq!(reopened.chunk_len(), 10);
        assert!(reopened.has_chunk(9, 0));
        assert!(reopened.descriptor(9, 0).is_corrupt());

        let err = reopened.read_chunk(9, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_matches!(err, QuarryError::RegionError { x: 0, z: 2, chunk: Some((9, 0)), .. });

        for x in 0..9 {
            assert_eq!(reopened.read_chunk(x, 0).unwrap().unwrap().x, x);
        }

        // Saving drops the unreadable slot.
        reopened.save().unwrap();
        let resaved = Region::load(&path).unwrap();
        assert_eq!(resaved.chunk_len(), 9);
        assert!(!resaved.has_chunk(9, 0));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_chunk_pointing_into_header() {
        let path = temp_region("header-pointer", 1, 2);
        let mut region = Region::create(&path).unwrap();
        region.write_chunk(0, 0, &mut Chunk::new(32, 64)).unwrap();
        region.save().unwrap();

        let mut bytes = std::fs::read(&path).unwrap();
        bytes[4..8].copy_from_slice(&[0, 0, 1, 1]);
        std::fs::write(&path, &bytes).unwrap();

        let reopened = Region::load(&path).unwrap();
        assert_eq!(reopened.read_chunk(0, 0).unwrap().unwrap().x, 32);
        let err = reopened.read_chunk(1, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.chunk(), Some((1, 0)));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_timestamps_are_clamped() {
        let path = temp_region("clamped", 2, 3);
        let mut region = Region::create(&path).unwrap();
        let before_epoch = UNIX_EPOCH - Duration::from_secs(10);
        let past_range = UNIX_EPOCH + Duration::from_secs(u32::MAX as u64 + 100);
        region.descriptor_mut(0, 0).set_raw(2, vec![1], before_epoch);
        region.descriptor_mut(1, 0).set_raw(2, vec![2], past_range);
        region.save().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[SECTOR_SIZE..SECTOR_SIZE + 4], &[0, 0, 0, 0]);
        assert_eq!(&bytes[SECTOR_SIZE + 4..SECTOR_SIZE + 8], &[0xFF; 4]);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_create_new_refuses_existing_file() {
        let path = temp_region("create-new", 4, 4);
        let _ = std::fs::remove_file(&path);

        let region = Region::create_new(&path).unwrap();
        assert_eq!(region.chunk_len(), 0);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 8192);

        let err = Region::create_new(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_matches!(err, QuarryError::RegionError { x: 4, z: 4, chunk: None, .. });
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_gzip_chunk_survives_save() {
        let path = temp_region("gzip", 0, 1);
        let mut region = Region::create(&path).unwrap();
        let mut bytes = Vec::new();
        let mut encoder = flate2::write::GzEncoder::new(&mut bytes, flate2::Compression::default());
        quarry_nbt::to_writer(&mut encoder, "", &LevelStub { level: Chunk::new(0, 32) }).unwrap();
        encoder.finish().unwrap();

        region
            .descriptor_mut(0, 0)
            .set_raw(CompressionScheme::Gzip.id(), bytes, UNIX_EPOCH);
        region.save().unwrap();

        let reopened = Region::load(&path).unwrap();
        assert_eq!(reopened.descriptor(0, 0).scheme(), CompressionScheme::Gzip.id());
        assert_eq!(reopened.read_chunk(0, 0).unwrap().unwrap().z, 32);
        std::fs::remove_file(&path).unwrap();
    }

    #[derive(Serialize)]
    struct LevelStub {
        #[serde(rename = "Level")]
        level: Chunk,
    }

    #[test]
    fn test_clear() {
        let path = temp_region("clear", 5, 5);
        let mut region = Region::create(&path).unwrap();
        region.write_chunk(3, 3, &mut Chunk::new(163, 163)).unwrap();
        assert_eq!(region.chunk_len(), 1);

        region.clear();
        assert_eq!(region.chunk_len(), 0);
        assert_eq!(Region::load(&path).unwrap().chunk_len(), 0);

        region.save().unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 8192);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_chunk_stamps_time() {
        let path = temp_region("stamp", 6, 6);
        let mut region = Region::create(&path).unwrap();
        let mut chunk = Chunk::new(0, 0);
        chunk.last_update = UNIX_EPOCH;

        region.write_chunk(0, 0, &mut chunk).unwrap();
        assert!(chunk.last_update > UNIX_EPOCH);
        assert_eq!(region.descriptor(0, 0).last_modified, chunk.last_update);
        std::fs::remove_file(&path).unwrap();
    }
}
