use crate::entity::{compose_uuid, split_uuid, Abilities, Attribute, InventorySlot};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A player record. Single player worlds keep it inside `level.dat`, servers
/// in `playerdata/<uuid>.dat`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Player {
    #[serde(rename = "abilities")]
    pub abilities: Abilities,
    #[serde(rename = "Attributes")]
    pub attributes: Vec<Attribute>,
    #[serde(rename = "Inventory")]
    pub inventory: Vec<InventorySlot>,
    #[serde(rename = "EnderItems")]
    pub ender_items: Vec<InventorySlot>,
    #[serde(rename = "Motion")]
    pub motion: Vec<f64>,
    #[serde(rename = "Pos")]
    pub pos: Vec<f64>,
    #[serde(rename = "Rotation")]
    pub rotation: Vec<f32>,
    #[serde(rename = "UUIDLeast")]
    pub uuid_least: i64,
    #[serde(rename = "UUIDMost")]
    pub uuid_most: i64,
    #[serde(rename = "foodExhaustionLevel")]
    pub food_exhaustion_level: f32,
    #[serde(rename = "HealF")]
    pub heal_f: f32,
    #[serde(rename = "XpP")]
    pub xp_p: f32,
    #[serde(rename = "AbsorptionAmount")]
    pub absorption_amount: f32,
    #[serde(rename = "foodSaturationLevel")]
    pub food_saturation_level: f32,
    #[serde(rename = "FallDistance")]
    pub fall_distance: f32,
    #[serde(rename = "SelectedItemSlot")]
    pub selected_item_slot: i32,
    #[serde(rename = "foodTickTimer")]
    pub food_tick_timer: i32,
    #[serde(rename = "XpLevel")]
    pub xp_level: i32,
    #[serde(rename = "XpSeed")]
    pub xp_seed: i32,
    #[serde(rename = "XpTotal")]
    pub xp_total: i32,
    #[serde(rename = "playerGameType")]
    pub player_game_type: i32,
    #[serde(rename = "foodLevel")]
    pub food_level: i32,
    #[serde(rename = "Score")]
    pub score: i32,
    #[serde(rename = "HurtByTimestamp")]
    pub hurt_by_timestamp: i32,
    #[serde(rename = "Dimension")]
    pub dimension: i32,
    #[serde(rename = "PortalCooldown")]
    pub portal_cooldown: i32,
    #[serde(rename = "Health")]
    pub health: i16,
    #[serde(rename = "Fire")]
    pub fire: i16,
    #[serde(rename = "DeathTime")]
    pub death_time: i16,
    #[serde(rename = "SleepTimer")]
    pub sleep_timer: i16,
    #[serde(rename = "HurtTime")]
    pub hurt_time: i16,
    #[serde(rename = "Air")]
    pub air: i16,
    #[serde(rename = "Sleeping")]
    pub sleeping: bool,
    #[serde(rename = "Invulnerable")]
    pub invulnerable: bool,
    #[serde(rename = "OnGround")]
    pub on_ground: bool,
}

impl Player {
    pub fn uuid(&self) -> Uuid {
        compose_uuid(self.uuid_most, self.uuid_least)
    }

    pub fn set_uuid(&mut self, uuid: Uuid) {
        (self.uuid_most, self.uuid_least) = split_uuid(uuid);
    }

    /// The inventory stack in `slot`, if any.
    pub fn slot(&self, slot: i8) -> Option<&InventorySlot> {
        self.inventory.iter().find(|item| item.slot == slot)
    }
}
