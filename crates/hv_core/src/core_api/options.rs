use serde::{Deserialize, Serialize};

pub const PLAYER_BAR_WIDTH: u32 = 414;
pub const MONSTER_BAR_WIDTH: u32 = 120;
pub const QUICKBAR_SLOTS: u32 = 16;

/// Calibration for the battle screen geometry. The defaults match the stock
/// HentaiVerse layout; only skins with different bar art need to change them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractOptions {
    /// Pixel width of a full player vitals bar.
    pub player_bar_width: u32,
    /// Pixel width of a full monster bar.
    pub monster_bar_width: u32,
    pub quickbar_slots: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            player_bar_width: PLAYER_BAR_WIDTH,
            monster_bar_width: MONSTER_BAR_WIDTH,
            quickbar_slots: QUICKBAR_SLOTS,
        }
    }
}
