mod common;

use assert_matches::assert_matches;
use common::*;
use quarry::{Dumper, Format};
use quarry_common::{ErrorKind, QuarryError};
use quarry_region::Region;
use std::fs;
use std::time::UNIX_EPOCH;

#[test]
fn test_dump_gzip_file() {
    let dir = scratch_dir("gzip");
    let path = dir.join("level.dat");
    write_gzip_tree(&path, "Data", &sample_tree());

    let mut dumper = Dumper::new(Vec::new(), Format::Text);
    dumper.dump_path(&path).unwrap();

    let expected = "\
TAG_Compound(\"Data\") {
  TAG_String(\"LevelName\"): \"Test World\"
  TAG_Int(\"SpawnY\"): 64
  TAG_Long(\"Seed\"): -5
}
";
    assert_eq!(output(dumper.into_inner()), expected);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_dump_region_text() {
    let dir = scratch_dir("region-text");
    let path = write_region(&dir, &[(0, 0), (1, 0)]);

    let mut dumper = Dumper::new(Vec::new(), Format::Text);
    let skipped = dumper.dump_region(&path).unwrap();
    assert_eq!(skipped, 0);

    let out = output(dumper.into_inner());
    let headers: Vec<&str> = out.lines().filter(|line| line.starts_with("Chunk ")).collect();
    assert_eq!(headers, vec!["Chunk 2:", "Chunk 3:"]);
    assert!(out.contains("  TAG_Compound(\"Level\") {"));
    assert!(out.contains("    TAG_Int(\"xPos\"): 1"));
    assert!(out.contains("    TAG_Byte_Array(\"Biomes\") [256] {"));
    assert!(out.contains("      [1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1]..."));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_dump_region_extension_is_case_insensitive() {
    let dir = scratch_dir("region-case");
    let path = write_region(&dir, &[(4, 4)]);
    let upper = dir.join("r.0.0.MCA");
    fs::rename(&path, &upper).unwrap();

    let mut dumper = Dumper::new(Vec::new(), Format::Text);
    dumper.dump_path(&upper).unwrap();
    assert!(output(dumper.into_inner()).starts_with("Chunk 2:\n"));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_dump_region_json() {
    let dir = scratch_dir("region-json");
    let path = write_region(&dir, &[(2, 3)]);

    let mut dumper = Dumper::new(Vec::new(), Format::Json);
    dumper.dump_path(&path).unwrap();

    let out = output(dumper.into_inner());
    let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(value["chunk"], serde_json::json!([2, 3]));
    assert_eq!(value["value"]["Level"]["zPos"], 3);
    assert_eq!(value["value"]["Level"]["Biomes"].as_array().map(Vec::len), Some(256));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_corrupt_chunk_is_skipped() {
    let dir = scratch_dir("region-corrupt");
    let path = write_region(&dir, &[(0, 0), (2, 0)]);

    let mut region = Region::load(&path).unwrap();
    region.descriptor_mut(1, 0).set_raw(9, vec![0; 16], UNIX_EPOCH);
    region.save().unwrap();

    let mut dumper = Dumper::new(Vec::new(), Format::Text);
    assert_eq!(dumper.dump_region(&path).unwrap(), 1);

    let out = output(dumper.into_inner());
    assert_eq!(out.lines().filter(|line| line.starts_with("Chunk ")).count(), 2);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_truncated_region_is_dumped() {
    let dir = scratch_dir("region-truncated");
    let path = write_region(&dir, &[(0, 0), (1, 0), (2, 0)]);
    let length = fs::metadata(&path).unwrap().len();
    fs::OpenOptions::new()
        .write(true)
        .open(&path)
        .unwrap()
        .set_len(length - 3)
        .unwrap();

    let mut dumper = Dumper::new(Vec::new(), Format::Text);
    assert_eq!(dumper.dump_region(&path).unwrap(), 1);

    let out = output(dumper.into_inner());
    let headers: Vec<&str> = out.lines().filter(|line| line.starts_with("Chunk ")).collect();
    assert_eq!(headers, vec!["Chunk 2:", "Chunk 3:"]);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_file() {
    let dir = scratch_dir("missing");
    let mut dumper = Dumper::new(Vec::new(), Format::Text);
    let err = dumper.dump_path(dir.join("nothing.dat")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_file_that_is_not_gzip() {
    let dir = scratch_dir("plain");
    let path = dir.join("plain.dat");
    fs::write(&path, b"not a tag file").unwrap();

    let mut dumper = Dumper::new(Vec::new(), Format::Text);
    assert_matches!(dumper.dump_path(&path), Err(QuarryError::IoError(_)));
    fs::remove_dir_all(&dir).unwrap();
}
