use crate::player::Player;
use quarry_common::Result;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameMode {
    #[default]
    Survival = 0,
    Creative = 1,
    Adventure = 2,
    Spectator = 3,
}

impl GameMode {
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(GameMode::Survival),
            1 => Some(GameMode::Creative),
            2 => Some(GameMode::Adventure),
            3 => Some(GameMode::Spectator),
            _ => None,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameMode::Survival => "Survival",
            GameMode::Creative => "Creative",
            GameMode::Adventure => "Adventure",
            GameMode::Spectator => "Spectator",
        };
        f.write_str(name)
    }
}

// Stored as a TAG_Int.
impl Serialize for GameMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_i32(*self as i32)
    }
}

impl<'de> Deserialize<'de> for GameMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let id = i32::deserialize(deserializer)?;
        GameMode::from_id(id).ok_or_else(|| D::Error::custom(format!("unknown game mode {}", id)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Difficulty {
    #[default]
    Peaceful = 0,
    Easy = 1,
    Normal = 2,
    Hard = 3,
}

impl Difficulty {
    pub fn from_id(id: i8) -> Option<Self> {
        match id {
            0 => Some(Difficulty::Peaceful),
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Normal),
            3 => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Peaceful => "Peaceful",
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

impl Serialize for Difficulty {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_i8(*self as i8)
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let id = i8::deserialize(deserializer)?;
        Difficulty::from_id(id).ok_or_else(|| D::Error::custom(format!("unknown difficulty {}", id)))
    }
}

/// World rules. Files store these as strings ("true"/"false"), which decode
/// into the boolean fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    #[serde(rename = "randomTickSpeed")]
    pub random_tick_speed: String,
    #[serde(rename = "commandBlockOutput")]
    pub command_block_output: bool,
    #[serde(rename = "doDaylightCycle")]
    pub daylight_cycle: bool,
    #[serde(rename = "doFireTick")]
    pub fire_tick: bool,
    #[serde(rename = "doTileDrops")]
    pub tile_drops: bool,
    #[serde(rename = "keepInventory")]
    pub keep_inventory: bool,
    #[serde(rename = "logAdminCommands")]
    pub log_admin_commands: bool,
    #[serde(rename = "doMobLoot")]
    pub mob_loot: bool,
    #[serde(rename = "doMobSpawning")]
    pub mob_spawning: bool,
    #[serde(rename = "mobGriefing")]
    pub mob_griefing: bool,
    #[serde(rename = "naturalRegeneration")]
    pub natural_regeneration: bool,
    #[serde(rename = "sendCommandFeedback")]
    pub send_command_feedback: bool,
    #[serde(rename = "showDeathMessages")]
    pub show_death_messages: bool,
    #[serde(rename = "reducedDebugInfo")]
    pub reduced_debug_info: bool,
    #[serde(rename = "doEntityDrops")]
    pub entity_drops: bool,
}

/// Contents of a world's `level.dat`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Level {
    #[serde(rename = "Player", skip_serializing_if = "Option::is_none")]
    pub player: Option<Player>,
    #[serde(rename = "GameRules")]
    pub rules: GameRules,
    #[serde(rename = "LevelName")]
    pub name: String,
    #[serde(rename = "generatorName")]
    pub generator_name: String,
    #[serde(rename = "generatorOptions")]
    pub generator_options: String,
    /// Milliseconds since the Unix epoch.
    #[serde(rename = "LastPlayed")]
    pub last_played: i64,
    #[serde(rename = "RandomSeed")]
    pub seed: i64,
    #[serde(rename = "Time")]
    pub time: i64,
    #[serde(rename = "DayTime")]
    pub day_time: i64,
    #[serde(rename = "SizeOnDisk")]
    pub size_on_disk: i64,
    #[serde(rename = "BorderSizeLerpTime")]
    pub border_size_lerp_time: i64,
    #[serde(rename = "BorderCenterX")]
    pub border_center_x: f64,
    #[serde(rename = "BorderCenterZ")]
    pub border_center_z: f64,
    #[serde(rename = "BorderSize")]
    pub border_size: f64,
    #[serde(rename = "BorderSizeLerpTarget")]
    pub border_size_lerp_target: f64,
    #[serde(rename = "BorderWarningBlocks")]
    pub border_warning_blocks: f64,
    #[serde(rename = "BorderWarningTime")]
    pub border_warning_time: f64,
    #[serde(rename = "BorderDamagePerBlock")]
    pub border_damage_per_block: f64,
    #[serde(rename = "BorderSafeZone")]
    pub border_safe_zone: f64,
    #[serde(rename = "generatorVersion")]
    pub generator_version: i32,
    #[serde(rename = "version")]
    pub version: i32,
    #[serde(rename = "SpawnX")]
    pub spawn_x: i32,
    #[serde(rename = "SpawnY")]
    pub spawn_y: i32,
    #[serde(rename = "SpawnZ")]
    pub spawn_z: i32,
    #[serde(rename = "rainTime")]
    pub rain_time: i32,
    #[serde(rename = "clearWeatherTime")]
    pub clear_weather_time: i32,
    #[serde(rename = "thunderTime")]
    pub thunder_time: i32,
    #[serde(rename = "GameType")]
    pub game_mode: GameMode,
    #[serde(rename = "Difficulty")]
    pub difficulty: Difficulty,
    #[serde(rename = "initialized")]
    pub initialized: bool,
    #[serde(rename = "MapFeatures")]
    pub map_features: bool,
    #[serde(rename = "allowCommands")]
    pub allow_commands: bool,
    #[serde(rename = "hardcore")]
    pub hardcore: bool,
    #[serde(rename = "DifficultyLocked")]
    pub difficulty_locked: bool,
    #[serde(rename = "raining")]
    pub raining: bool,
    #[serde(rename = "thundering")]
    pub thundering: bool,
}

#[derive(Deserialize)]
struct LevelFile {
    #[serde(rename = "Data")]
    data: Level,
}

#[derive(Serialize)]
struct LevelFileRef<'a> {
    #[serde(rename = "Data")]
    data: &'a Level,
}

impl Level {
    /// Reads a gzip-compressed `level.dat`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Level> {
        let file: LevelFile = quarry_nbt::from_gzip_file(path)?;
        Ok(file.data)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        quarry_nbt::to_gzip_file(path, "", &LevelFileRef { data: self })
    }
}
