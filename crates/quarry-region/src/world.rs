use crate::level::Level;
use crate::region::{region_coords, Region, REGION_FILE_EXTENSION};
use quarry_common::{QuarryError, Result};
use quarry_logger::{log, LogSeverity};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const LEVEL_FILE: &str = "level.dat";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Overworld,
    Nether,
    End,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Overworld, Dimension::Nether, Dimension::End];

    /// Region directory relative to the world root.
    pub fn region_dir(self) -> &'static str {
        match self {
            Dimension::Overworld => "region",
            Dimension::Nether => "DIM-1/region",
            Dimension::End => "DIM1/region",
        }
    }
}

/// A world directory: `level.dat` plus per-dimension region files.
#[derive(Debug)]
pub struct World {
    pub level: Level,
    root: PathBuf,
    regions: HashMap<Dimension, Vec<(i32, i32)>>,
}

impl World {
    /// Loads `level.dat` from `root` and lists the regions of every dimension.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<World> {
        let root = root.as_ref().to_path_buf();
        let level = Level::load(root.join(LEVEL_FILE))?;

        let regions = Dimension::ALL
            .iter()
            .map(|&dim| (dim, list_regions(&root, dim)))
            .collect();

        Ok(World {
            level,
            root,
            regions,
        })
    }

    /// Writes `level` back to `level.dat`.
    pub fn save(&self) -> Result<()> {
        self.level.save(self.root.join(LEVEL_FILE))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Coordinates of the region files found for `dim`.
    pub fn regions(&self, dim: Dimension) -> &[(i32, i32)] {
        self.regions.get(&dim).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn region_path(&self, dim: Dimension, x: i32, z: i32) -> PathBuf {
        self.root
            .join(dim.region_dir())
            .join(format!("r.{}.{}.{}", x, z, REGION_FILE_EXTENSION))
    }

    pub fn load_region(&self, dim: Dimension, x: i32, z: i32) -> Result<Region> {
        Region::load(self.region_path(dim, x, z))
    }

    /// Creates an empty region file. Fails if it already exists.
    pub fn create_region(&mut self, dim: Dimension, x: i32, z: i32) -> Result<Region> {
        let dir = self.root.join(dim.region_dir());
        fs::create_dir_all(&dir).map_err(|e| QuarryError::from(e).in_region(x, z))?;

        let region = Region::create_new(&self.region_path(dim, x, z))?;
        self.regions.insert(dim, list_regions(&self.root, dim));
        Ok(region)
    }

    /// Removes the region file from disk. Open handles to it must not be
    /// saved afterwards.
    pub fn delete_region(&mut self, dim: Dimension, x: i32, z: i32) -> Result<()> {
        fs::remove_file(self.region_path(dim, x, z)).map_err(|e| QuarryError::from(e).in_region(x, z))?;

        log(format!("deleted region r({} {}) in {}", x, z, dim.region_dir()), LogSeverity::Debug);
        self.regions.insert(dim, list_regions(&self.root, dim));
        Ok(())
    }
}

/// Region coordinates of the `.mca` files in a dimension's directory. A
/// missing directory lists as empty.
fn list_regions(root: &Path, dim: Dimension) -> Vec<(i32, i32)> {
    let entries = match fs::read_dir(root.join(dim.region_dir())) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut regions: Vec<(i32, i32)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some(REGION_FILE_EXTENSION))
        .filter_map(region_coords)
        .collect();
    regions.sort_unstable();
    regions
}
