mod generated {
    include!(concat!(env!("OUT_DIR"), "/biomes.rs"));
}
pub use generated::BIOMES;

pub const OCEAN: u8 = 0;
/// Biome written into every column of a new chunk.
pub const PLAINS: u8 = 1;

pub fn biome_name(id: u8) -> Option<&'static str> {
    BIOMES
        .binary_search_by_key(&id, |&(biome, _)| biome)
        .ok()
        .map(|index| BIOMES[index].1)
}

pub fn biome_id(name: &str) -> Option<u8> {
    BIOMES
        .iter()
        .find(|(_, biome)| biome.eq_ignore_ascii_case(name))
        .map(|&(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_biome_table_is_sorted() {
        assert!(BIOMES.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn test_biome_lookup() {
        assert_eq!(biome_name(OCEAN), Some("Ocean"));
        assert_eq!(biome_name(PLAINS), Some("Plains"));
        assert_eq!(biome_name(167), Some("MesaPlateauM"));
        assert_eq!(biome_name(200), None);

        assert_eq!(biome_id("plains"), Some(PLAINS));
        assert_eq!(biome_id("SunflowerPlains"), Some(129));
        assert_eq!(biome_id("Nowhere"), None);
    }
}
