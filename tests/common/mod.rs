use quarry_nbt::{NBTFile, Tag};
use quarry_region::{Block, BlockId, Chunk, Region};
use std::fs;
use std::path::PathBuf;

/// Fresh scratch directory for one test.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("quarry-it-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Saves a region at `dir/r.0.0.mca` holding one chunk per entry of `coords`,
/// each with a stone block at the bottom.
pub fn write_region(dir: &PathBuf, coords: &[(i32, i32)]) -> PathBuf {
    let path = dir.join("r.0.0.mca");
    let mut region = Region::create(&path).unwrap();

    for &(x, z) in coords {
        let mut chunk = Chunk::new(x, z);
        chunk.write_block(0, 0, 0, &Block::new(BlockId::new(1, 0)));
        region.write_chunk(x, z, &mut chunk).unwrap();
    }

    region.save().unwrap();
    path
}

pub fn sample_tree() -> Tag {
    Tag::Compound(vec![
        ("LevelName".to_string(), Tag::String("Test World".to_string())),
        ("SpawnY".to_string(), Tag::Int(64)),
        ("Seed".to_string(), Tag::Long(-5)),
    ])
}

pub fn write_gzip_tree(path: &PathBuf, name: &str, tree: &Tag) {
    NBTFile::new(name, tree.clone()).save(path).unwrap();
}

pub fn output(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}
