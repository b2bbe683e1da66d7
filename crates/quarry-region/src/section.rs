use crate::block::{Block, BlockId};
use quarry_common::{BLOCKS_PER_CHUNK, MAX_LIGHT};
use quarry_nbt::is_default;
use serde::{Deserialize, Serialize};

/// Blocks in one 16x16x16 section.
pub const BLOCKS_PER_SECTION: usize = 4096;
/// Byte length of a plane holding one nibble per block.
pub const NIBBLE_PLANE_LEN: usize = BLOCKS_PER_SECTION / 2;

/// One of the 16 vertical slices of a chunk.
///
/// Block attributes live in parallel planes indexed by `y*256 + z*16 + x`.
/// `blocks` holds one byte per block, the other planes one nibble per block.
/// `add` stays empty until a block id needs more than 8 bits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    #[serde(rename = "Blocks")]
    pub blocks: Vec<u8>,
    #[serde(rename = "Add", skip_serializing_if = "is_default")]
    pub add: Vec<u8>,
    #[serde(rename = "Data")]
    pub data: Vec<u8>,
    #[serde(rename = "BlockLight")]
    pub block_light: Vec<u8>,
    #[serde(rename = "SkyLight")]
    pub sky_light: Vec<u8>,
    #[serde(rename = "Y")]
    pub y: u8,
}

impl Section {
    pub fn new(y: u8) -> Self {
        let mut section = Section::default();
        section.init(y);
        section
    }

    /// Allocates empty planes with full sky light. Already populated sections
    /// are left alone.
    pub fn init(&mut self, y: u8) {
        if !self.blocks.is_empty() {
            return;
        }

        self.y = y;
        self.add = Vec::new();
        self.blocks = vec![0; BLOCKS_PER_SECTION];
        self.data = vec![0; NIBBLE_PLANE_LEN];
        self.block_light = vec![0; NIBBLE_PLANE_LEN];
        self.sky_light = vec![MAX_LIGHT | MAX_LIGHT << 4; NIBBLE_PLANE_LEN];
    }

    /// Linear block index for the given coordinates.
    ///
    /// `y` is either local to this section or an absolute chunk height that
    /// falls inside it.
    pub fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !(0..BLOCKS_PER_CHUNK).contains(&x) || !(0..BLOCKS_PER_CHUNK).contains(&z) || y < 0 {
            return None;
        }

        if y >= BLOCKS_PER_CHUNK && y / BLOCKS_PER_CHUNK != self.y as i32 {
            return None;
        }

        let y = y % BLOCKS_PER_CHUNK;
        Some((y * 256 + z * 16 + x) as usize)
    }

    fn has_planes(&self) -> bool {
        self.blocks.len() == BLOCKS_PER_SECTION
            && self.data.len() == NIBBLE_PLANE_LEN
            && self.block_light.len() == NIBBLE_PLANE_LEN
            && self.sky_light.len() == NIBBLE_PLANE_LEN
            && (self.add.is_empty() || self.add.len() == NIBBLE_PLANE_LEN)
    }

    /// Returns the block at the given coordinates, or `None` when they fall
    /// outside this section or the planes are malformed.
    pub fn read(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        let index = self.index(x, y, z)?;
        if !self.has_planes() {
            return None;
        }

        let mut id = self.blocks[index] as u32;
        if !self.add.is_empty() {
            id |= (nibble(&self.add, index) as u32) << 8;
        }
        id |= (nibble(&self.data, index) as u32) << 16;

        Some(Block {
            id: BlockId(id),
            block_light: nibble(&self.block_light, index),
            sky_light: nibble(&self.sky_light, index),
        })
    }

    /// Stores `block` at the given coordinates. Returns false when they fall
    /// outside this section or the planes are malformed.
    pub fn write(&mut self, x: i32, y: i32, z: i32, block: &Block) -> bool {
        let index = match self.index(x, y, z) {
            Some(index) if self.has_planes() => index,
            _ => return false,
        };

        let id = block.id.0;
        self.blocks[index] = id as u8;

        let add = ((id >> 8) & 0xF) as u8;
        if add > 0 && self.add.is_empty() {
            self.add = vec![0; NIBBLE_PLANE_LEN];
        }
        if !self.add.is_empty() {
            set_nibble(&mut self.add, index, add);
        }

        set_nibble(&mut self.data, index, (id >> 16) as u8);
        set_nibble(&mut self.block_light, index, block.block_light);
        set_nibble(&mut self.sky_light, index, block.sky_light);
        true
    }
}

/// Reads the 4-bit value at `index`: low nibble for even indices, high
/// nibble for odd ones.
pub fn nibble(plane: &[u8], index: usize) -> u8 {
    let byte = plane[index / 2];
    if index % 2 == 0 {
        byte & 0x0F
    } else {
        byte >> 4
    }
}

/// Writes the low 4 bits of `value` at `index`, keeping the other nibble of
/// the shared byte.
pub fn set_nibble(plane: &mut [u8], index: usize, value: u8) {
    let byte = &mut plane[index / 2];
    if index % 2 == 0 {
        *byte = (*byte & 0xF0) | (value & 0x0F);
    } else {
        *byte = (*byte & 0x0F) | ((value & 0x0F) << 4);
    }
}
