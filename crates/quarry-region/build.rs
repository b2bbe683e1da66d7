use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

#[derive(Deserialize, Debug)]
struct Biome {
    id: u8,
    name: String,
}

fn main() {
    let biomes_json_path = "biomes.json";
    let biomes_json = fs::read_to_string(biomes_json_path).expect("Failed to read biomes.json");

    let mut biomes: Vec<Biome> =
        serde_json::from_str(&biomes_json).expect("Failed to parse biomes.json");
    biomes.sort_by_key(|biome| biome.id);

    let mut seen = HashSet::new();
    for biome in &biomes {
        if !seen.insert(biome.id) {
            panic!("biomes.json: duplicate biome id {}", biome.id);
        }
    }

    let out_dir = env::var_os("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("biomes.rs");
    let mut out_file = File::create(&dest_path).expect("Failed to create biomes.rs");

    // Sorted by id so lookups can binary search.
    writeln!(&mut out_file, "pub static BIOMES: &[(u8, &str)] = &[").unwrap();
    for biome in &biomes {
        writeln!(&mut out_file, "    ({}, {:?}),", biome.id, biome.name).unwrap();
    }
    writeln!(&mut out_file, "];").unwrap();

    println!("cargo:rerun-if-changed={}", biomes_json_path);
}
