use std::collections::BTreeMap;
use std::fmt::Write as _;

use hv_core::core_api::{
    AbilitiesState, Ability, Buff, CombatLog, Item, ItemSlot, ItemsState, Monster, PlayerState,
    QuickSlot, Snapshot,
};
use serde_json::{Map as JsonMap, Value as JsonValue};

const SHEET_WIDTH: usize = 76;
const NAME_COL_WIDTH: usize = 28;
const SLOT_COL_WIDTH: usize = 4;
const RECENT_LOG_LINES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    /// Print the whole combat log and every quickbar slot, bound or not.
    pub verbose: bool,
}

/// Top-level snapshot sections to render. Nothing selected means "all" to
/// callers that fall back to [`render_json_full`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SectionSelection {
    pub player: bool,
    pub abilities: bool,
    pub monsters: bool,
    pub log: bool,
    pub items: bool,
    pub warnings: bool,
}

impl SectionSelection {
    pub fn all() -> Self {
        Self {
            player: true,
            abilities: true,
            monsters: true,
            log: true,
            items: true,
            warnings: true,
        }
    }

    pub fn is_any_selected(&self) -> bool {
        self.player || self.abilities || self.monsters || self.log || self.items || self.warnings
    }
}

pub fn render_json_full(snapshot: &Snapshot, style: JsonStyle) -> JsonValue {
    render_json_selected(snapshot, &SectionSelection::all(), style)
}

pub fn render_json_selected(
    snapshot: &Snapshot,
    sections: &SectionSelection,
    style: JsonStyle,
) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(selected_json(sections, snapshot)),
    }
}

pub fn render_text(snapshot: &Snapshot) -> String {
    render_text_with_options(snapshot, TextRenderOptions::default())
}

pub fn render_text_with_options(snapshot: &Snapshot, options: TextRenderOptions) -> String {
    render_battle_sheet_impl(snapshot, options)
}

/// `key=value` summary lines for the selected sections, one entry per line.
pub fn render_selected_pairs(
    snapshot: &Snapshot,
    sections: &SectionSelection,
) -> Vec<(&'static str, String)> {
    let mut out = Vec::new();

    if sections.player {
        let player = &snapshot.player;
        out.push(("hp", vital_pair(player.hp_value, player.hp_percent)));
        out.push(("mp", vital_pair(player.mp_value, player.mp_percent)));
        out.push(("sp", vital_pair(player.sp_value, player.sp_percent)));
        out.push(("overcharge", player.overcharge_value.to_string()));
        for buff in player.buffs.values() {
            out.push(("buff", format!("{}={}", buff.name, format_duration(buff))));
        }
    }
    if sections.abilities {
        for ability in snapshot.abilities.skills.values() {
            out.push(("skill", ability_pair(ability)));
        }
        for ability in snapshot.abilities.spells.values() {
            out.push(("spell", ability_pair(ability)));
        }
    }
    if sections.monsters {
        for monster in snapshot.monsters.values() {
            out.push(("monster", monster_pair(monster)));
        }
    }
    if sections.log {
        if let Some(round) = format_round(&snapshot.log) {
            out.push(("round", round));
        }
        for line in &snapshot.log.lines {
            out.push(("log", line.clone()));
        }
    }
    if sections.items {
        for item in snapshot.items.items.values() {
            let tag = if item.available { "" } else { " [unavailable]" };
            out.push(("item", format!("{} {}{}", item.slot, item.name, tag)));
        }
        for slot in snapshot.items.quickbar.iter().filter(|q| q.is_bound()) {
            out.push(("quickslot", format!("{} {}", slot.slot, slot.name)));
        }
    }
    if sections.warnings {
        for warning in &snapshot.warnings {
            out.push(("warning", warning.clone()));
        }
    }

    out
}

fn selected_json(sections: &SectionSelection, snapshot: &Snapshot) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();

    if sections.player {
        out.insert("player".to_string(), player_to_json(&snapshot.player));
    }
    if sections.abilities {
        out.insert(
            "abilities".to_string(),
            abilities_to_json(&snapshot.abilities),
        );
    }
    if sections.monsters {
        out.insert("monsters".to_string(), monsters_to_json(&snapshot.monsters));
    }
    if sections.log {
        out.insert("log".to_string(), log_to_json(&snapshot.log));
    }
    if sections.items {
        out.insert("items".to_string(), items_to_json(&snapshot.items));
    }
    if sections.warnings {
        out.insert(
            "warnings".to_string(),
            JsonValue::Array(
                snapshot
                    .warnings
                    .iter()
                    .map(|w| JsonValue::String(w.clone()))
                    .collect(),
            ),
        );
    }

    out
}

fn player_to_json(player: &PlayerState) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("hp_percent".to_string(), JsonValue::from(player.hp_percent));
    m.insert("hp_value".to_string(), JsonValue::from(player.hp_value));
    m.insert("mp_percent".to_string(), JsonValue::from(player.mp_percent));
    m.insert("mp_value".to_string(), JsonValue::from(player.mp_value));
    m.insert("sp_percent".to_string(), JsonValue::from(player.sp_percent));
    m.insert("sp_value".to_string(), JsonValue::from(player.sp_value));
    m.insert(
        "overcharge_value".to_string(),
        JsonValue::from(player.overcharge_value),
    );
    m.insert("buffs".to_string(), buffs_to_json(&player.buffs));
    JsonValue::Object(m)
}

fn buffs_to_json(buffs: &BTreeMap<String, Buff>) -> JsonValue {
    let mut m = JsonMap::new();
    for (name, buff) in buffs {
        let mut b = JsonMap::new();
        b.insert("name".to_string(), JsonValue::String(buff.name.clone()));
        b.insert(
            "remaining_turns".to_string(),
            match buff.remaining_turns {
                Some(turns) => JsonValue::from(turns),
                None => JsonValue::Null,
            },
        );
        b.insert("is_permanent".to_string(), JsonValue::Bool(buff.is_permanent));
        m.insert(name.clone(), JsonValue::Object(b));
    }
    JsonValue::Object(m)
}

fn abilities_to_json(abilities: &AbilitiesState) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("skills".to_string(), ability_map_to_json(&abilities.skills));
    m.insert("spells".to_string(), ability_map_to_json(&abilities.spells));
    JsonValue::Object(m)
}

fn ability_map_to_json(abilities: &BTreeMap<String, Ability>) -> JsonValue {
    let mut m = JsonMap::new();
    for (name, ability) in abilities {
        let mut a = JsonMap::new();
        a.insert("name".to_string(), JsonValue::String(ability.name.clone()));
        a.insert("available".to_string(), JsonValue::Bool(ability.available));
        a.insert(
            "cost".to_string(),
            match ability.cost {
                Some(cost) => JsonValue::from(cost),
                None => JsonValue::Null,
            },
        );
        a.insert(
            "cost_type".to_string(),
            match ability.cost_type {
                Some(cost_type) => JsonValue::String(cost_type.as_str().to_string()),
                None => JsonValue::Null,
            },
        );
        a.insert(
            "cooldown_turns".to_string(),
            JsonValue::from(ability.cooldown_turns),
        );
        m.insert(name.clone(), JsonValue::Object(a));
    }
    JsonValue::Object(m)
}

fn monsters_to_json(monsters: &BTreeMap<u32, Monster>) -> JsonValue {
    let mut m = JsonMap::new();
    for (slot, monster) in monsters {
        let mut e = JsonMap::new();
        e.insert("slot_index".to_string(), JsonValue::from(monster.slot_index));
        e.insert("name".to_string(), JsonValue::String(monster.name.clone()));
        e.insert("alive".to_string(), JsonValue::Bool(monster.alive));
        e.insert(
            "system_monster_type".to_string(),
            match &monster.system_monster_type {
                Some(tier) => JsonValue::String(tier.clone()),
                None => JsonValue::Null,
            },
        );
        e.insert("hp_percent".to_string(), JsonValue::from(monster.hp_percent));
        e.insert("mp_percent".to_string(), JsonValue::from(monster.mp_percent));
        e.insert("sp_percent".to_string(), JsonValue::from(monster.sp_percent));
        e.insert("buffs".to_string(), buffs_to_json(&monster.buffs));
        m.insert(slot.to_string(), JsonValue::Object(e));
    }
    JsonValue::Object(m)
}

fn log_to_json(log: &CombatLog) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert(
        "lines".to_string(),
        JsonValue::Array(
            log.lines
                .iter()
                .map(|line| JsonValue::String(line.clone()))
                .collect(),
        ),
    );
    m.insert("current_round".to_string(), optional_u32(log.current_round));
    m.insert("total_round".to_string(), optional_u32(log.total_round));
    JsonValue::Object(m)
}

fn items_to_json(items: &ItemsState) -> JsonValue {
    let mut inventory = JsonMap::new();
    for (name, item) in &items.items {
        inventory.insert(name.clone(), item_to_json(item));
    }

    let mut m = JsonMap::new();
    m.insert("items".to_string(), JsonValue::Object(inventory));
    m.insert(
        "quickbar".to_string(),
        JsonValue::Array(items.quickbar.iter().map(quickslot_to_json).collect()),
    );
    JsonValue::Object(m)
}

fn item_to_json(item: &Item) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("name".to_string(), JsonValue::String(item.name.clone()));
    m.insert(
        "slot".to_string(),
        match &item.slot {
            ItemSlot::Number(n) => JsonValue::from(*n),
            ItemSlot::Tag(tag) => JsonValue::String(tag.clone()),
        },
    );
    m.insert("available".to_string(), JsonValue::Bool(item.available));
    JsonValue::Object(m)
}

fn quickslot_to_json(slot: &QuickSlot) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("slot".to_string(), JsonValue::from(slot.slot));
    m.insert("name".to_string(), JsonValue::String(slot.name.clone()));
    JsonValue::Object(m)
}

fn optional_u32(value: Option<u32>) -> JsonValue {
    match value {
        Some(v) => JsonValue::from(v),
        None => JsonValue::Null,
    }
}

fn render_battle_sheet_impl(snapshot: &Snapshot, options: TextRenderOptions) -> String {
    let mut out = String::new();

    writeln!(&mut out).expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "{}",
        centered_no_trailing("HENTAIVERSE BATTLE", SHEET_WIDTH)
    )
    .expect("writing to String cannot fail");
    if let Some(round) = format_round(&snapshot.log) {
        writeln!(
            &mut out,
            "{}",
            centered_no_trailing(&format!("Round {round}"), SHEET_WIDTH)
        )
        .expect("writing to String cannot fail");
    }
    writeln!(&mut out).expect("writing to String cannot fail");

    write_vitals_section(&mut out, &snapshot.player);
    write_abilities_section(&mut out, "Skills", &snapshot.abilities.skills);
    write_abilities_section(&mut out, "Spells", &snapshot.abilities.spells);
    write_monsters_section(&mut out, &snapshot.monsters);
    write_log_section(&mut out, &snapshot.log, options);
    write_items_section(&mut out, &snapshot.items, options);

    if !snapshot.warnings.is_empty() {
        writeln!(&mut out, " ::: Warnings :::").expect("writing to String cannot fail");
        for warning in &snapshot.warnings {
            writeln!(&mut out, "  - {warning}").expect("writing to String cannot fail");
        }
        writeln!(&mut out).expect("writing to String cannot fail");
    }

    out
}

fn write_vitals_section(out: &mut String, player: &PlayerState) {
    let vitals = [
        ("HP", player.hp_value, player.hp_percent),
        ("MP", player.mp_value, player.mp_percent),
        ("SP", player.sp_value, player.sp_percent),
    ];
    let mut line = String::from(" ");
    for (label, value, percent) in vitals {
        line.push_str(&format!(
            " {label}: {:>7} ({:>5.1}%)  ",
            format_number_with_commas(value),
            percent
        ));
    }
    line.push_str(&format!(
        "OC: {}",
        format_number_with_commas(player.overcharge_value)
    ));
    writeln!(out, "{line}").expect("writing to String cannot fail");
    writeln!(out).expect("writing to String cannot fail");

    writeln!(out, " ::: Effects :::").expect("writing to String cannot fail");
    if player.buffs.is_empty() {
        writeln!(out, "  (none)").expect("writing to String cannot fail");
    }
    for buff in player.buffs.values() {
        writeln!(
            out,
            "  {:<w$} {}",
            fit_column(&buff.name, NAME_COL_WIDTH),
            format_duration(buff),
            w = NAME_COL_WIDTH
        )
        .expect("writing to String cannot fail");
    }
    writeln!(out).expect("writing to String cannot fail");
}

fn write_abilities_section(out: &mut String, title: &str, abilities: &BTreeMap<String, Ability>) {
    writeln!(out, " ::: {title} :::").expect("writing to String cannot fail");
    if abilities.is_empty() {
        writeln!(out, "  (none)").expect("writing to String cannot fail");
    }
    for ability in abilities.values() {
        let mark = if ability.available { 'x' } else { ' ' };
        let mut line = format!(
            "  [{mark}] {:<w$} {}",
            fit_column(&ability.name, NAME_COL_WIDTH),
            format_cost(ability),
            w = NAME_COL_WIDTH
        );
        if ability.cooldown_turns > 0 {
            line.push_str(&format!(", cooldown {}", ability.cooldown_turns));
        }
        writeln!(out, "{line}").expect("writing to String cannot fail");
    }
    writeln!(out).expect("writing to String cannot fail");
}

fn write_monsters_section(out: &mut String, monsters: &BTreeMap<u32, Monster>) {
    writeln!(out, " ::: Monsters :::").expect("writing to String cannot fail");
    if monsters.is_empty() {
        writeln!(out, "  (none)").expect("writing to String cannot fail");
    }
    for monster in monsters.values() {
        let name = match &monster.system_monster_type {
            Some(tier) => format!("{} [{tier}]", monster.name),
            None => monster.name.clone(),
        };
        let status = if monster.alive {
            format!(
                "HP {:>5.1}%  MP {:>5.1}%  SP {:>5.1}%",
                monster.hp_percent, monster.mp_percent, monster.sp_percent
            )
        } else {
            "defeated".to_string()
        };
        let line = format!(
            "  {:>2}  {:<w$} {status}",
            monster.slot_index,
            fit_column(&name, NAME_COL_WIDTH),
            w = NAME_COL_WIDTH
        );
        writeln!(out, "{}", line.trim_end()).expect("writing to String cannot fail");
        if monster.alive && !monster.buffs.is_empty() {
            let effects: Vec<String> = monster
                .buffs
                .values()
                .map(|b| format!("{} ({})", b.name, format_duration(b)))
                .collect();
            writeln!(out, "      {}", effects.join(", ")).expect("writing to String cannot fail");
        }
    }
    writeln!(out).expect("writing to String cannot fail");
}

fn write_log_section(out: &mut String, log: &CombatLog, options: TextRenderOptions) {
    writeln!(out, " ::: Log :::").expect("writing to String cannot fail");
    let limit = if options.verbose {
        log.lines.len()
    } else {
        RECENT_LOG_LINES
    };
    for line in log.lines.iter().take(limit) {
        writeln!(out, "  {line}").expect("writing to String cannot fail");
    }
    if log.lines.len() > limit {
        writeln!(out, "  ({} more)", log.lines.len() - limit)
            .expect("writing to String cannot fail");
    }
    writeln!(out).expect("writing to String cannot fail");
}

fn write_items_section(out: &mut String, items: &ItemsState, options: TextRenderOptions) {
    writeln!(out, " ::: Items :::").expect("writing to String cannot fail");
    if items.items.is_empty() {
        writeln!(out, "  (none)").expect("writing to String cannot fail");
    }
    let mut by_slot: Vec<&Item> = items.items.values().collect();
    by_slot.sort_by(|a, b| a.slot.cmp(&b.slot));
    for item in by_slot {
        let mark = if item.available { 'x' } else { ' ' };
        writeln!(
            out,
            "  [{mark}] {:<s$} {}",
            item.slot.to_string(),
            item.name,
            s = SLOT_COL_WIDTH
        )
        .expect("writing to String cannot fail");
    }
    writeln!(out).expect("writing to String cannot fail");

    writeln!(out, " ::: Quickbar :::").expect("writing to String cannot fail");
    let mut any_bound = false;
    for slot in &items.quickbar {
        if !slot.is_bound() && !options.verbose {
            continue;
        }
        any_bound |= slot.is_bound();
        let name = if slot.is_bound() { slot.name.as_str() } else { "-" };
        writeln!(out, "  {:>2}  {name}", slot.slot).expect("writing to String cannot fail");
    }
    if !any_bound && !options.verbose {
        writeln!(out, "  (empty)").expect("writing to String cannot fail");
    }
    writeln!(out).expect("writing to String cannot fail");
}

fn vital_pair(value: u32, percent: f64) -> String {
    format!("{value} ({percent:.1}%)")
}

fn ability_pair(ability: &Ability) -> String {
    let tag = if ability.available {
        ""
    } else {
        " [unavailable]"
    };
    format!(
        "{}{} cost={} cooldown={}",
        ability.name,
        tag,
        format_cost(ability),
        ability.cooldown_turns
    )
}

fn monster_pair(monster: &Monster) -> String {
    let mut value = format!("{} {}", monster.slot_index, monster.name);
    if let Some(tier) = &monster.system_monster_type {
        value.push_str(&format!(" [{tier}]"));
    }
    if monster.alive {
        value.push_str(&format!(
            " hp={:.1} mp={:.1} sp={:.1}",
            monster.hp_percent, monster.mp_percent, monster.sp_percent
        ));
    } else {
        value.push_str(" defeated");
    }
    value
}

fn format_duration(buff: &Buff) -> String {
    match buff.remaining_turns {
        None => "permanent".to_string(),
        Some(1) => "1 turn".to_string(),
        Some(turns) => format!("{turns} turns"),
    }
}

fn format_cost(ability: &Ability) -> String {
    match (ability.cost, ability.cost_type) {
        (None, _) => "unknown".to_string(),
        (Some(0), None) => "free".to_string(),
        (Some(cost), None) => cost.to_string(),
        (Some(cost), Some(cost_type)) => format!("{cost} {cost_type}"),
    }
}

fn format_round(log: &CombatLog) -> Option<String> {
    match (log.current_round, log.total_round) {
        (Some(current), Some(total)) => Some(format!("{current}/{total}")),
        _ => None,
    }
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }

    let mut out = String::with_capacity(width);
    for ch in value.chars().take(width - 3) {
        out.push(ch);
    }
    out.push_str("...");
    out
}

fn centered_no_trailing(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }

    let left_padding = (width - len) / 2;
    format!("{}{}", " ".repeat(left_padding), value)
}

fn format_number_with_commas(n: u32) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}
