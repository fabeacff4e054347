mod engine;
mod error;
mod options;
mod types;
pub mod well_known_monsters;

pub use engine::{Engine, Session};
pub use error::{CoreError, CoreErrorCode};
pub use options::ExtractOptions;
pub use types::{
    AbilitiesState, Ability, Buff, CombatLog, CostType, Item, ItemSlot, ItemsState, Monster,
    PlayerState, QuickSlot, Snapshot,
};
