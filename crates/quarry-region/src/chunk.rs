use crate::biome::PLAINS;
use crate::block::Block;
use crate::entity::{Entity, TileEntity};
use crate::section::Section;
use quarry_common::{BLOCKS_PER_CHUNK, MAX_CHUNK_HEIGHT, MAX_LIGHT};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Columns in a chunk, and so the length of its biome and height maps.
pub const COLUMNS_PER_CHUNK: usize = (BLOCKS_PER_CHUNK * BLOCKS_PER_CHUNK) as usize;

/// A pending block update saved with the chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileTick {
    #[serde(rename = "i")]
    pub id: String,
    /// Ticks until the update happens.
    pub t: i32,
    /// Priority.
    pub p: i32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// The `Level` compound of a stored chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chunk {
    #[serde(rename = "Entities")]
    pub entities: Vec<Entity>,
    #[serde(rename = "TileEntities")]
    pub tile_entities: Vec<TileEntity>,
    #[serde(rename = "TileTicks")]
    pub tile_ticks: Vec<TileTick>,
    #[serde(rename = "Sections")]
    pub sections: Vec<Section>,
    #[serde(rename = "Biomes")]
    pub biomes: Vec<u8>,
    #[serde(rename = "HeightMap")]
    pub height_map: Vec<i32>,
    #[serde(rename = "LastUpdate", with = "quarry_nbt::timestamp")]
    pub last_update: SystemTime,
    #[serde(rename = "InhabitedTime")]
    pub inhabited_time: i64,
    #[serde(rename = "xPos")]
    pub x: i32,
    #[serde(rename = "zPos")]
    pub z: i32,
    #[serde(rename = "V")]
    pub v: i8,
    #[serde(rename = "LightPopulated")]
    pub light_populated: bool,
    #[serde(rename = "TerrainPopulated")]
    pub terrain_populated: bool,
}

impl Default for Chunk {
    fn default() -> Self {
        Chunk {
            entities: Vec::new(),
            tile_entities: Vec::new(),
            tile_ticks: Vec::new(),
            sections: Vec::new(),
            biomes: Vec::new(),
            height_map: Vec::new(),
            last_update: UNIX_EPOCH,
            inhabited_time: 0,
            x: 0,
            z: 0,
            v: 0,
            light_populated: false,
            terrain_populated: false,
        }
    }
}

fn in_column(x: i32, z: i32) -> bool {
    (0..BLOCKS_PER_CHUNK).contains(&x) && (0..BLOCKS_PER_CHUNK).contains(&z)
}

impl Chunk {
    /// An empty, populated chunk of plains at chunk coordinates `x`, `z`.
    /// Sections are added as blocks are written.
    pub fn new(x: i32, z: i32) -> Self {
        Chunk {
            biomes: vec![PLAINS; COLUMNS_PER_CHUNK],
            height_map: vec![0; COLUMNS_PER_CHUNK],
            last_update: SystemTime::now(),
            x,
            z,
            v: 1,
            light_populated: true,
            terrain_populated: true,
            ..Default::default()
        }
    }

    fn section_index(y: i32) -> Option<u8> {
        if (0..MAX_CHUNK_HEIGHT).contains(&y) {
            Some((y / BLOCKS_PER_CHUNK) as u8)
        } else {
            None
        }
    }

    /// The section holding absolute height `y`, if it was generated.
    pub fn section(&self, y: i32) -> Option<&Section> {
        let index = Chunk::section_index(y)?;
        self.sections.iter().find(|s| s.y == index)
    }

    pub fn section_mut(&mut self, y: i32) -> Option<&mut Section> {
        let index = Chunk::section_index(y)?;
        self.sections.iter_mut().find(|s| s.y == index)
    }

    /// Like [`Chunk::section_mut`], adding a fresh section when missing.
    pub fn section_or_create(&mut self, y: i32) -> Option<&mut Section> {
        let index = Chunk::section_index(y)?;
        match self.sections.iter().position(|s| s.y == index) {
            Some(pos) => Some(&mut self.sections[pos]),
            None => {
                self.sections.push(Section::new(index));
                self.sections.last_mut()
            }
        }
    }

    /// Block at chunk-local `x`, `z` and absolute height `y`.
    pub fn read_block(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        self.section(y)?.read(x, y, z)
    }

    pub fn write_block(&mut self, x: i32, y: i32, z: i32, block: &Block) -> bool {
        if !in_column(x, z) {
            return false;
        }

        match self.section_or_create(y) {
            Some(section) => section.write(x, y, z, block),
            None => false,
        }
    }

    /// Recomputes the height map: per column, the highest block not under
    /// full sky light.
    pub fn update_heightmap(&mut self) {
        if self.height_map.is_empty() {
            return;
        }

        for x in 0..BLOCKS_PER_CHUNK {
            for z in 0..BLOCKS_PER_CHUNK {
                let mut y = MAX_CHUNK_HEIGHT - 1;
                while y > 0 {
                    match self.read_block(x, y, z) {
                        Some(block) if block.sky_light < MAX_LIGHT => break,
                        _ => y -= 1,
                    }
                }

                if let Some(height) = self.height_map.get_mut((z * BLOCKS_PER_CHUNK + x) as usize) {
                    *height = y;
                }
            }
        }
    }

    pub fn biome(&self, x: i32, z: i32) -> Option<u8> {
        if !in_column(x, z) {
            return None;
        }
        self.biomes.get((z * BLOCKS_PER_CHUNK + x) as usize).copied()
    }

    pub fn set_biome(&mut self, x: i32, z: i32, biome: u8) -> bool {
        if !in_column(x, z) {
            return false;
        }

        match self.biomes.get_mut((z * BLOCKS_PER_CHUNK + x) as usize) {
            Some(slot) => {
                *slot = biome;
                true
            }
            None => false,
        }
    }
}
