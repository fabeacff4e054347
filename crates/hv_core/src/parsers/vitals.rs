use tracing::debug;

use super::Warnings;
use super::fields::bar_percent;
use crate::core_api::{ExtractOptions, PlayerState};
use crate::dom::Document;

const HP_VALUE_ID: &str = "dvrhd";
const MP_VALUE_ID: &str = "dvrm";
const SP_VALUE_ID: &str = "dvrs";
const OVERCHARGE_VALUE_ID: &str = "dvrc";

const HP_BAR_ID: &str = "dvbh";
const MP_BAR_ID: &str = "dvbm";
const SP_BAR_ID: &str = "dvbs";

/// Player HP/MP/SP/Overcharge readings. Buffs are left empty; they come from
/// the effects pane.
pub fn parse_vitals(
    doc: &Document,
    options: &ExtractOptions,
    warnings: &mut Warnings,
) -> PlayerState {
    let hp_value = read_value(doc, "hp", HP_VALUE_ID, warnings);
    let mp_value = read_value(doc, "mp", MP_VALUE_ID, warnings);
    let sp_value = read_value(doc, "sp", SP_VALUE_ID, warnings);
    let overcharge_value = read_value(doc, "overcharge", OVERCHARGE_VALUE_ID, warnings);

    let full = options.player_bar_width;
    let player = PlayerState {
        hp_percent: read_percent(doc, "hp", HP_BAR_ID, full, warnings),
        hp_value,
        mp_percent: read_percent(doc, "mp", MP_BAR_ID, full, warnings),
        mp_value,
        sp_percent: read_percent(doc, "sp", SP_BAR_ID, full, warnings),
        sp_value,
        overcharge_value,
        buffs: Default::default(),
    };

    debug!(
        hp = player.hp_value,
        mp = player.mp_value,
        sp = player.sp_value,
        overcharge = player.overcharge_value,
        "parsed vitals"
    );
    player
}

/// Integer shown in a vitals readout. Only ASCII digits are accepted, so a
/// grouped value like `23,421` is rejected.
pub fn parse_display_int(text: &str) -> Option<u32> {
    let digits = text.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn read_value(doc: &Document, field: &str, id: &str, warnings: &mut Warnings) -> u32 {
    match doc.by_id(id).and_then(|node| parse_display_int(&node.text())) {
        Some(value) => value,
        None => {
            warnings.push(format!("missing {field} value"));
            0
        }
    }
}

fn read_percent(
    doc: &Document,
    field: &str,
    id: &str,
    full_width: u32,
    warnings: &mut Warnings,
) -> f64 {
    let percent = doc
        .by_id(id)
        .and_then(|container| container.select_one("img"))
        .and_then(|bar| bar_percent(bar, full_width));
    match percent {
        Some(percent) => percent,
        None => {
            warnings.push(format!("missing {field} bar"));
            0.0
        }
    }
}
