pub type Result<T> = std::result::Result<T, crate::error::QuarryError>;

pub const CHUNKS_PER_REGION: i32 = 32;
pub const BLOCKS_PER_CHUNK: i32 = 16;
pub const BLOCKS_PER_REGION: i32 = BLOCKS_PER_CHUNK * CHUNKS_PER_REGION;

/// Number of vertical sections in a chunk.
pub const SECTIONS_PER_CHUNK: i32 = 16;
/// Number of blocks a chunk spans along Y.
pub const MAX_CHUNK_HEIGHT: i32 = SECTIONS_PER_CHUNK * BLOCKS_PER_CHUNK;

/// Highest possible light level.
pub const MAX_LIGHT: u8 = 15;

/// Region coordinates containing the given absolute block position.
pub fn region_of_block(x: i32, z: i32) -> (i32, i32) {
    (x.div_euclid(BLOCKS_PER_REGION), z.div_euclid(BLOCKS_PER_REGION))
}

/// Chunk coordinates containing the given absolute block position.
pub fn chunk_of_block(x: i32, z: i32) -> (i32, i32) {
    (x.div_euclid(BLOCKS_PER_CHUNK), z.div_euclid(BLOCKS_PER_CHUNK))
}

/// Block offsets inside the owning chunk for an absolute block position.
/// Y is clamped into the chunk's height range.
pub fn block_in_chunk(x: i32, y: i32, z: i32) -> (i32, i32, i32) {
    (
        x.rem_euclid(BLOCKS_PER_CHUNK),
        y.clamp(0, MAX_CHUNK_HEIGHT - 1),
        z.rem_euclid(BLOCKS_PER_CHUNK),
    )
}
