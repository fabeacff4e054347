use std::collections::BTreeMap;

use tracing::debug;

use super::fields::infopane_args;
use crate::core_api::Buff;
use crate::dom::{Document, Node};

const EFFECTS_PANE_ID: &str = "pane_effects";
const EFFECT_HANDLER: &str = "set_infopane_effect";

/// Effects shown in the player's effects pane. A missing pane means no
/// active effects, which is a normal state.
pub fn parse_player_buffs(doc: &Document) -> BTreeMap<String, Buff> {
    let Some(pane) = doc.by_id(EFFECTS_PANE_ID) else {
        debug!("no effects pane in document");
        return BTreeMap::new();
    };
    parse_effect_icons(&pane.select_all("img[onmouseover]"))
}

/// Decode a row of effect icons. Names are kept verbatim, including any
/// stack suffix the game renders, and the last icon wins when two names
/// are identical.
pub fn parse_effect_icons(icons: &[Node<'_>]) -> BTreeMap<String, Buff> {
    let mut buffs = BTreeMap::new();
    for icon in icons {
        let Some(args) = infopane_args(*icon, EFFECT_HANDLER) else {
            continue;
        };
        let Some(name) = args.first().map(|n| n.trim()).filter(|n| !n.is_empty()) else {
            continue;
        };
        let buff = buff_from_duration(name, args.get(2).map(String::as_str));
        buffs.insert(buff.name.clone(), buff);
    }
    buffs
}

/// Builds a buff from its duration marker: a turn count, `autocast` or
/// `permanent`. No marker (or one that cannot be read) means zero turns.
pub fn buff_from_duration(name: &str, duration: Option<&str>) -> Buff {
    let Some(raw) = duration.map(str::trim).filter(|d| !d.is_empty()) else {
        return Buff::timed(name, 0);
    };

    if raw.eq_ignore_ascii_case("autocast") || raw.eq_ignore_ascii_case("permanent") {
        return Buff::permanent(name);
    }

    let turns = raw
        .parse::<u32>()
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|t| t.is_finite() && *t >= 0.0)
                .map(|t| t.floor() as u32)
        })
        .unwrap_or(0);
    Buff::timed(name, turns)
}
