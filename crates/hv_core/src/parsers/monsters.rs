use std::collections::BTreeMap;

use tracing::debug;

use super::buffs::parse_effect_icons;
use super::fields::{bar_percent, is_faded};
use crate::core_api::{ExtractOptions, Monster, well_known_monsters};
use crate::dom::{Document, Node};

const MONSTER_PANE_ID: &str = "pane_monster";
const SLOT_ID_PREFIX: &str = "mkey_";
const DEAD_BAR_MARKER: &str = "nbardead";
const BAR_FIELDS: [&str; 3] = ["hp", "mp", "sp"];

/// Battlefield roster keyed by slot index. Empty slots are skipped; a missing
/// pane simply yields an empty roster. Nothing here records a warning: a slot
/// without bars reads as 0% and is only logged.
pub fn parse_monsters(doc: &Document, options: &ExtractOptions) -> BTreeMap<u32, Monster> {
    let Some(pane) = doc.by_id(MONSTER_PANE_ID) else {
        debug!("no monster pane in document");
        return BTreeMap::new();
    };

    let mut monsters = BTreeMap::new();
    for slot in pane.select_all(&format!("div[id^=\"{SLOT_ID_PREFIX}\"]")) {
        let Some(slot_index) = slot.id().and_then(monster_slot_from_id) else {
            continue;
        };
        if let Some(monster) = parse_slot(slot, slot_index, options) {
            monsters.insert(slot_index, monster);
        }
    }
    debug!(count = monsters.len(), "parsed monsters");
    monsters
}

/// Slot index from an element id. The tenth slot is rendered as `mkey_0`.
pub fn monster_slot_from_id(id: &str) -> Option<u32> {
    let suffix = id.strip_prefix(SLOT_ID_PREFIX)?;
    match suffix.parse::<u32>().ok()? {
        0 => Some(10),
        n => Some(n),
    }
}

fn parse_slot(slot: Node<'_>, slot_index: u32, options: &ExtractOptions) -> Option<Monster> {
    let name = monster_name(slot)?;
    let bars = slot.select_all(".btm4 .btm5 img");
    let alive = !is_defeated(slot, &bars);

    let mut percents = [0.0_f64; 3];
    if alive {
        for (i, field) in BAR_FIELDS.iter().enumerate() {
            match bars
                .get(i)
                .and_then(|bar| bar_percent(*bar, options.monster_bar_width))
            {
                Some(percent) => percents[i] = percent,
                None => debug!(slot = slot_index, field = *field, "monster bar missing"),
            }
        }
    }

    let system_monster_type = if has_system_marker(slot) {
        well_known_monsters::lookup(&name).map(str::to_string)
    } else {
        None
    };

    Some(Monster {
        slot_index,
        name,
        alive,
        system_monster_type,
        hp_percent: percents[0],
        mp_percent: percents[1],
        sp_percent: percents[2],
        buffs: parse_effect_icons(&slot.select_all(".btm6 img")),
    })
}

/// The name lives in the `title` of the name plate; its visible text may be
/// shortened, so it is only a fallback.
fn monster_name(slot: Node<'_>) -> Option<String> {
    let plate = slot.select_one(".btm3")?;
    plate
        .attr("title")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| Some(plate.text()).filter(|t| !t.is_empty()))
}

fn is_defeated(slot: Node<'_>, bars: &[Node<'_>]) -> bool {
    is_faded(slot)
        || bars
            .iter()
            .any(|bar| bar.attr("src").is_some_and(|src| src.contains(DEAD_BAR_MARKER)))
}

fn has_system_marker(slot: Node<'_>) -> bool {
    slot.select_one(".btm2")
        .and_then(|frame| frame.attr("style"))
        .is_some_and(|style| style.contains("background") || style.contains("border"))
}

#[cfg(test)]
mod tests {
    use super::{monster_slot_from_id, parse_monsters};
    use crate::core_api::ExtractOptions;
    use crate::dom::Document;

    fn slot(id: &str, attrs: &str, frame: &str, title: &str, bars: [&str; 3], effects: &str) -> String {
        format!(
            r#"<div id="{id}" class="btm1" {attrs}>
                <div class="btm2" {frame}><img src="/y/ms/m.png"></div>
                <div class="btm3" title="{title}"><div class="fc2 fal fcb"><div>{title}</div></div></div>
                <div class="btm4">
                    <div class="btm5"><div class="chbd"><img src="{0}" style="width:{1}px"></div></div>
                    <div class="btm5"><div class="chbd"><img src="{2}" style="width:{3}px"></div></div>
                    <div class="btm5"><div class="chbd"><img src="{4}" style="width:{5}px"></div></div>
                </div>
                <div class="btm6">{effects}</div>
            </div>"#,
            "/y/s/nbargreen.png",
            bars[0],
            "/y/s/nbarblue.png",
            bars[1],
            "/y/s/nbarred.png",
            bars[2],
        )
    }

    fn pane(slots: &[String]) -> String {
        format!("<div id=\"pane_monster\">{}</div>", slots.concat())
    }

    #[test]
    fn living_monster_percentages_from_bar_widths() {
        let html = pane(&[slot("mkey_1", "", "", "Touch", ["120", "60", "14"], "")]);
        let doc = Document::parse(&html);
        let monsters = parse_monsters(&doc, &ExtractOptions::default());

        let touch = &monsters[&1];
        assert_eq!(touch.slot_index, 1);
        assert_eq!(touch.name, "Touch");
        assert!(touch.alive);
        assert_eq!(touch.hp_percent, 100.0);
        assert_eq!(touch.mp_percent, 50.0);
        assert!(touch.sp_percent > 11.0 && touch.sp_percent < 12.0);
        assert_eq!(touch.system_monster_type, None);
        assert!(touch.buffs.is_empty());
    }

    #[test]
    fn defeated_monster_reports_zero_despite_stale_bars() {
        let html = pane(&[slot(
            "mkey_1",
            "style=\"opacity:0.3\"",
            "style=\"background:#ffd700\"",
            "Yuki Nagato",
            ["120", "80", "40"],
            "",
        )]);
        let doc = Document::parse(&html);
        let monsters = parse_monsters(&doc, &ExtractOptions::default());

        let yuki = &monsters[&1];
        assert!(!yuki.alive);
        assert_eq!(yuki.hp_percent, 0.0);
        assert_eq!(yuki.mp_percent, 0.0);
        assert_eq!(yuki.sp_percent, 0.0);
        assert_eq!(yuki.system_monster_type.as_deref(), Some("Legendary"));
    }

    #[test]
    fn dead_bar_art_marks_monster_defeated() {
        let html = r#"<div id="pane_monster"><div id="mkey_2">
            <div class="btm3" title="Thundaga"></div>
            <div class="btm4"><div class="btm5"><img src="/y/s/nbardead.png" style="width:120px"></div></div>
        </div></div>"#;
        let doc = Document::parse(html);
        let monsters = parse_monsters(&doc, &ExtractOptions::default());
        assert!(!monsters[&2].alive);
    }

    #[test]
    fn system_type_needs_marker_and_known_name() {
        let html = pane(&[
            slot("mkey_1", "", "style=\"border:1px solid red\"", "Manbearpig", ["100", "100", "100"], ""),
            slot("mkey_2", "", "", "Mikuru Asahina", ["100", "100", "100"], ""),
            slot("mkey_3", "", "style=\"background:#fff\"", "Touch", ["100", "100", "100"], ""),
        ]);
        let doc = Document::parse(&html);
        let monsters = parse_monsters(&doc, &ExtractOptions::default());

        assert_eq!(monsters[&1].system_monster_type.as_deref(), Some("Rare"));
        assert_eq!(monsters[&2].system_monster_type, None);
        assert_eq!(monsters[&3].system_monster_type, None);
    }

    #[test]
    fn monster_effects_and_empty_slots() {
        let effects = r#"<img onmouseover="battle.set_infopane_effect('Stunned', 'Cannot act.', 3)">
            <img onmouseover="battle.set_infopane_effect('Deep Burns', 'Burning.', 7)">"#;
        let html = pane(&[
            slot("mkey_1", "", "", "Thundaga", ["90", "30", "30"], effects),
            r#"<div id="mkey_2" class="btm1"><div class="btm3"></div></div>"#.to_string(),
            slot("mkey_0", "", "", "Tenth", ["90", "30", "30"], ""),
        ]);
        let doc = Document::parse(&html);
        let monsters = parse_monsters(&doc, &ExtractOptions::default());

        assert_eq!(monsters.len(), 2);
        assert!(!monsters.contains_key(&2));
        assert_eq!(monsters[&10].name, "Tenth");
        let thundaga = &monsters[&1];
        assert_eq!(thundaga.buffs["Stunned"].remaining_turns, Some(3));
        assert!(thundaga.buffs.contains_key("Deep Burns"));
    }

    #[test]
    fn living_monster_without_bars_reads_as_empty() {
        let html = r#"<div id="pane_monster"><div id="mkey_4">
            <div class="btm3" title="Peerless Oak Staff"></div>
        </div></div>"#;
        let doc = Document::parse(html);
        let monsters = parse_monsters(&doc, &ExtractOptions::default());

        let staff = &monsters[&4];
        assert!(staff.alive);
        assert_eq!(staff.hp_percent, 0.0);
        assert_eq!(staff.mp_percent, 0.0);
        assert_eq!(staff.sp_percent, 0.0);
    }

    #[test]
    fn slot_ids() {
        assert_eq!(monster_slot_from_id("mkey_1"), Some(1));
        assert_eq!(monster_slot_from_id("mkey_0"), Some(10));
        assert_eq!(monster_slot_from_id("mkey_x"), None);
        assert_eq!(monster_slot_from_id("ikey_1"), None);
    }
}
