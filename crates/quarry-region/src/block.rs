use std::fmt;

const ID_MASK: u32 = 0xFFFF;
const ID_BITS: u32 = 16;

/// Opaque block identity: primary id in the low 16 bits, sub id (damage or
/// variant) in the high 16 bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub u32);

impl BlockId {
    pub const AIR: BlockId = BlockId(0);

    pub fn new(primary: u32, sub: u32) -> Self {
        BlockId((primary & ID_MASK) | ((sub & ID_MASK) << ID_BITS))
    }

    pub fn primary(self) -> u32 {
        self.0 & ID_MASK
    }

    pub fn sub(self) -> u32 {
        self.0 >> ID_BITS
    }

    /// Parses the `primary:sub` form.
    pub fn parse(value: &str) -> Option<BlockId> {
        let (primary, sub) = value.split_once(':')?;
        if sub.contains(':') {
            return None;
        }

        let primary = primary.parse::<i32>().ok()?;
        let sub = sub.parse::<i32>().ok()?;
        Some(BlockId::new(primary as u32, sub as u32))
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.0)
    }
}

impl From<u32> for BlockId {
    fn from(id: u32) -> Self {
        BlockId(id)
    }
}

/// A single block as stored in a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    /// Amount of block-emitted light.
    pub block_light: u8,
    /// Amount of sunlight or moonlight hitting the block.
    pub sky_light: u8,
}

impl Block {
    pub fn new(id: BlockId) -> Self {
        Block {
            id,
            ..Default::default()
        }
    }
}
