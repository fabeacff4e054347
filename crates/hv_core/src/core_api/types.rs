use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    pub player: PlayerState,
    pub abilities: AbilitiesState,
    pub monsters: BTreeMap<u32, Monster>,
    pub log: CombatLog,
    pub items: ItemsState,
    pub warnings: Vec<String>,
}

impl Snapshot {
    /// Structural equality ignoring parse-time diagnostics.
    pub fn same_state(&self, other: &Snapshot) -> bool {
        self.player == other.player
            && self.abilities == other.abilities
            && self.monsters == other.monsters
            && self.log == other.log
            && self.items == other.items
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerState {
    pub hp_percent: f64,
    pub hp_value: u32,
    pub mp_percent: f64,
    pub mp_value: u32,
    pub sp_percent: f64,
    pub sp_value: u32,
    pub overcharge_value: u32,
    pub buffs: BTreeMap<String, Buff>,
}

/// A status effect. `remaining_turns` is `None` only for permanent effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Buff {
    pub name: String,
    pub remaining_turns: Option<u32>,
    pub is_permanent: bool,
}

impl Buff {
    pub fn timed(name: impl Into<String>, turns: u32) -> Self {
        Self {
            name: name.into(),
            remaining_turns: Some(turns),
            is_permanent: false,
        }
    }

    pub fn permanent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            remaining_turns: None,
            is_permanent: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostType {
    #[serde(rename = "MP")]
    Mp,
    #[serde(rename = "SP")]
    Sp,
    Overcharge,
}

impl CostType {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Mp => "MP",
            Self::Sp => "SP",
            Self::Overcharge => "Overcharge",
        }
    }
}

impl fmt::Display for CostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MP" => Ok(Self::Mp),
            "SP" => Ok(Self::Sp),
            "Overcharge" | "OC" => Ok(Self::Overcharge),
            other => Err(format!("unknown cost type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ability {
    pub name: String,
    pub available: bool,
    pub cost: Option<u32>,
    pub cost_type: Option<CostType>,
    pub cooldown_turns: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AbilitiesState {
    pub skills: BTreeMap<String, Ability>,
    pub spells: BTreeMap<String, Ability>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Monster {
    pub slot_index: u32,
    pub name: String,
    pub alive: bool,
    pub system_monster_type: Option<String>,
    pub hp_percent: f64,
    pub mp_percent: f64,
    pub sp_percent: f64,
    pub buffs: BTreeMap<String, Buff>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CombatLog {
    pub lines: Vec<String>,
    pub current_round: Option<u32>,
    pub total_round: Option<u32>,
}

/// Inventory position: a tagged slot (`"p"`, `"s1"`, ...) or a numbered one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemSlot {
    Number(u32),
    Tag(String),
}

impl fmt::Display for ItemSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Tag(tag) => f.write_str(tag),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Item {
    pub name: String,
    pub slot: ItemSlot,
    pub available: bool,
}

/// Quickbar position. An empty `name` means the slot is unbound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuickSlot {
    pub slot: u32,
    pub name: String,
}

impl QuickSlot {
    pub fn is_bound(&self) -> bool {
        !self.name.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemsState {
    pub items: BTreeMap<String, Item>,
    pub quickbar: Vec<QuickSlot>,
}
