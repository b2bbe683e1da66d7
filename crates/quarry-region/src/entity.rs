use quarry_nbt::is_default;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Joins the two halves stored as `UUIDMost` / `UUIDLeast`.
pub fn compose_uuid(most: i64, least: i64) -> Uuid {
    Uuid::from_u128((most as u64 as u128) << 64 | least as u64 as u128)
}

/// Splits `uuid` into its `UUIDMost` / `UUIDLeast` halves.
pub fn split_uuid(uuid: Uuid) -> (i64, i64) {
    let value = uuid.as_u128();
    ((value >> 64) as u64 as i64, value as u64 as i64)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifier {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "UUIDLeast")]
    pub uuid_least: i64,
    #[serde(rename = "UUIDMost")]
    pub uuid_most: i64,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "Operation")]
    pub operation: i32,
}

impl Modifier {
    pub fn uuid(&self) -> Uuid {
        compose_uuid(self.uuid_most, self.uuid_least)
    }

    pub fn set_uuid(&mut self, uuid: Uuid) {
        (self.uuid_most, self.uuid_least) = split_uuid(uuid);
    }
}

/// An active attribute and its modifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attribute {
    #[serde(rename = "Modifiers")]
    pub modifiers: Vec<Modifier>,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Base")]
    pub base: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventorySlot {
    pub id: String,
    #[serde(rename = "Damage")]
    pub damage: i16,
    #[serde(rename = "Count")]
    pub count: i8,
    #[serde(rename = "Slot")]
    pub slot: i8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Abilities {
    #[serde(rename = "flySpeed")]
    pub fly_speed: f32,
    #[serde(rename = "walkSpeed")]
    pub walk_speed: f32,
    pub flying: bool,
    pub instabuild: bool,
    pub invulnerable: bool,
    #[serde(rename = "mayfly")]
    pub may_fly: bool,
    #[serde(rename = "mayBuild")]
    pub may_build: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemTag {
    /// Decoded only. Lists of strings have no encoding, so the field is
    /// left out whenever the item is written.
    #[serde(rename = "CanDestroy", skip_serializing)]
    pub can_destroy: Vec<String>,
    #[serde(rename = "Unbreakable")]
    pub unbreakable: bool,
}

/// An item stack, as found in inventories, chests and dropped items.
/// `slot` is only meaningful inside containers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    #[serde(rename = "tag", skip_serializing_if = "Option::is_none")]
    pub tag: Option<ItemTag>,
    pub id: String,
    #[serde(rename = "Count")]
    pub count: i8,
    #[serde(rename = "Slot")]
    pub slot: i8,
    #[serde(rename = "Damage")]
    pub damage: i16,
}

/// Scoreboard objectives updated by the last command an entity ran.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandStats {
    #[serde(rename = "SuccessCountObjective")]
    pub success_count_objective: String,
    #[serde(rename = "SuccessCountName")]
    pub success_count_name: String,
    #[serde(rename = "AffectedBlocksObjective")]
    pub affected_blocks_objective: String,
    #[serde(rename = "AffectedBlocksName")]
    pub affected_blocks_name: String,
    #[serde(rename = "AffectedEntitiesObjective")]
    pub affected_entities_objective: String,
    #[serde(rename = "AffectedEntitiesName")]
    pub affected_entities_name: String,
    #[serde(rename = "AffectedItemsObjective")]
    pub affected_items_objective: String,
    #[serde(rename = "AffectedItemsName")]
    pub affected_items_name: String,
    #[serde(rename = "QueryResultObjective")]
    pub query_result_objective: String,
    #[serde(rename = "QueryResultName")]
    pub query_result_name: String,
}

/// A block entity such as a chest or a mob spawner. Fields of the other
/// kinds are left at their zero value and not written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileEntity {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,

    // Chests
    #[serde(rename = "Lock", skip_serializing_if = "is_default")]
    pub lock: String,
    #[serde(rename = "Items", skip_serializing_if = "is_default")]
    pub items: Vec<Item>,

    // Mob spawners
    #[serde(rename = "EntityId", skip_serializing_if = "is_default")]
    pub entity_id: String,
    #[serde(rename = "Delay", skip_serializing_if = "is_default")]
    pub delay: i16,
    #[serde(rename = "RequiredPlayerRange", skip_serializing_if = "is_default")]
    pub required_player_range: i16,
    #[serde(rename = "MaxNearbyEntities", skip_serializing_if = "is_default")]
    pub max_nearby_entities: i16,
    #[serde(rename = "MinSpawnDelay", skip_serializing_if = "is_default")]
    pub min_spawn_delay: i16,
    #[serde(rename = "MaxSpawnDelay", skip_serializing_if = "is_default")]
    pub max_spawn_delay: i16,
    #[serde(rename = "SpawnRange", skip_serializing_if = "is_default")]
    pub spawn_range: i16,
    #[serde(rename = "SpawnCount", skip_serializing_if = "is_default")]
    pub spawn_count: i16,
}

/// Fields shared by every entity kind. Kind-specific data is skipped on
/// decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entity {
    #[serde(rename = "Riding", skip_serializing_if = "Option::is_none")]
    pub riding: Option<Box<Entity>>,
    #[serde(rename = "CommandStats", skip_serializing_if = "Option::is_none")]
    pub command_stats: Option<CommandStats>,
    pub id: String,
    #[serde(rename = "CustomName", skip_serializing_if = "is_default")]
    pub custom_name: String,
    #[serde(rename = "OwnerUUID", skip_serializing_if = "is_default")]
    pub owner_uuid: String,
    #[serde(rename = "Owner", skip_serializing_if = "is_default")]
    pub owner: String,
    #[serde(rename = "Pos")]
    pub pos: Vec<f64>,
    #[serde(rename = "Motion")]
    pub motion: Vec<f64>,
    #[serde(rename = "Rotation")]
    pub rotation: Vec<f32>,
    #[serde(rename = "UUIDMost")]
    pub uuid_most: i64,
    #[serde(rename = "UUIDLeast")]
    pub uuid_least: i64,
    #[serde(rename = "FallDistance")]
    pub fall_distance: f32,
    #[serde(rename = "Dimension")]
    pub dimension: i32,
    #[serde(rename = "PortalCooldown")]
    pub portal_cooldown: i32,
    #[serde(rename = "InLove")]
    pub in_love: i32,
    #[serde(rename = "Fire")]
    pub fire: i16,
    #[serde(rename = "Air")]
    pub air: i16,
    #[serde(rename = "Health")]
    pub health: i16,
    #[serde(rename = "OnGround")]
    pub on_ground: bool,
    #[serde(rename = "Invulnerable")]
    pub invulnerable: bool,
    #[serde(rename = "CustomNameVisible")]
    pub custom_name_visible: bool,
    #[serde(rename = "Silent")]
    pub silent: bool,
}

impl Entity {
    pub fn uuid(&self) -> Uuid {
        compose_uuid(self.uuid_most, self.uuid_least)
    }

    pub fn set_uuid(&mut self, uuid: Uuid) {
        (self.uuid_most, self.uuid_least) = split_uuid(uuid);
    }
}
