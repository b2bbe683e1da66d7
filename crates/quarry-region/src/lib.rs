//! Region files, chunk sections and the world records stored in them.

pub mod biome;
pub mod block;
pub mod chunk;
pub mod descriptor;
pub mod entity;
pub mod level;
pub mod player;
pub mod region;
pub mod section;
pub mod world;

pub use block::{Block, BlockId};
pub use chunk::{Chunk, TileTick};
pub use descriptor::{sectors_for, ChunkDescriptor, CompressionScheme, SECTOR_SIZE};
pub use entity::{Entity, Item, TileEntity};
pub use level::{Difficulty, GameMode, GameRules, Level};
pub use player::Player;
pub use region::{chunk_index, region_coords, Region, REGION_FILE_EXTENSION};
pub use section::Section;
pub use world::{Dimension, World};
