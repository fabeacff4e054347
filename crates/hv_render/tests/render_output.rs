use std::path::PathBuf;

use hv_core::core_api::{Engine, Snapshot};
use hv_render::{
    JsonStyle, SectionSelection, TextRenderOptions, render_json_full, render_json_selected,
    render_selected_pairs, render_text, render_text_with_options,
};
use serde_json::Value;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn snapshot_from_fixture(name: &str) -> Snapshot {
    let path = workspace_root().join("tests/fixtures/hv").join(name);
    Engine::new()
        .open_path(&path)
        .expect("fixture should parse")
        .into_snapshot()
}

fn keys(value: &Value) -> Vec<&str> {
    value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect()
}

#[test]
fn full_json_uses_canonical_top_level_order() {
    let snapshot = snapshot_from_fixture("arena_start.htm");
    let value = render_json_full(&snapshot, JsonStyle::CanonicalV1);

    assert_eq!(
        keys(&value),
        vec!["player", "abilities", "monsters", "log", "items", "warnings"]
    );
    assert_eq!(
        keys(&value["player"]),
        vec![
            "hp_percent",
            "hp_value",
            "mp_percent",
            "mp_value",
            "sp_percent",
            "sp_value",
            "overcharge_value",
            "buffs",
        ]
    );
    assert_eq!(
        keys(&value["abilities"]["skills"]["Shield Bash"]),
        vec!["name", "available", "cost", "cost_type", "cooldown_turns"]
    );
    assert_eq!(
        keys(&value["monsters"]["1"]),
        vec![
            "slot_index",
            "name",
            "alive",
            "system_monster_type",
            "hp_percent",
            "mp_percent",
            "sp_percent",
            "buffs",
        ]
    );
}

#[test]
fn canonical_json_matches_serde_form() {
    for name in ["arena_start.htm", "arena_midfight.htm", "truncated.htm"] {
        let snapshot = snapshot_from_fixture(name);
        let rendered = render_json_full(&snapshot, JsonStyle::CanonicalV1);
        let derived = serde_json::to_value(&snapshot).expect("snapshot should serialize");
        assert_eq!(rendered, derived, "{name}");

        let restored: Snapshot =
            serde_json::from_value(rendered).expect("rendered json should deserialize");
        assert!(snapshot.same_state(&restored));
    }
}

#[test]
fn selected_json_uses_canonical_subset_order() {
    let snapshot = snapshot_from_fixture("arena_midfight.htm");
    let sections = SectionSelection {
        warnings: true,
        monsters: true,
        player: true,
        ..SectionSelection::default()
    };
    assert!(sections.is_any_selected());
    assert!(!SectionSelection::default().is_any_selected());

    let value = render_json_selected(&snapshot, &sections, JsonStyle::CanonicalV1);
    assert_eq!(keys(&value), vec!["player", "monsters", "warnings"]);
    assert_eq!(value["monsters"]["4"]["system_monster_type"], "Rare");
    assert_eq!(value["player"]["overcharge_value"], 194);
    assert!(value["player"]["buffs"]["Spirit Stance"]["remaining_turns"].is_null());
}

#[test]
fn selected_pairs_follow_section_order() {
    let snapshot = snapshot_from_fixture("arena_midfight.htm");
    let sections = SectionSelection {
        player: true,
        items: true,
        ..SectionSelection::default()
    };
    let pairs = render_selected_pairs(&snapshot, &sections);

    assert_eq!(pairs[0], ("hp", "23421 (99.0%)".to_string()));
    assert_eq!(pairs[3], ("overcharge", "194".to_string()));
    assert!(pairs.contains(&("buff", "Spirit Stance=permanent".to_string())));
    assert!(pairs.contains(&("buff", "Overwhelming Strikes (x3)=5 turns".to_string())));
    assert!(pairs.contains(&("item", "p Spirit Gem".to_string())));
    assert!(pairs.contains(&("item", "1 Health Draught [unavailable]".to_string())));
    assert_eq!(
        pairs.last(),
        Some(&("quickslot", "16 Health Potion".to_string()))
    );
    assert!(pairs.iter().all(|(key, _)| *key != "warning"));
}

#[test]
fn selected_pairs_cover_abilities_monsters_and_log() {
    let snapshot = snapshot_from_fixture("arena_start.htm");
    let sections = SectionSelection {
        abilities: true,
        monsters: true,
        log: true,
        ..SectionSelection::default()
    };
    let pairs = render_selected_pairs(&snapshot, &sections);

    assert!(pairs.contains(&("skill", "Flee cost=free cooldown=0".to_string())));
    assert!(pairs.contains(&(
        "skill",
        "Shield Bash [unavailable] cost=25 Overcharge cooldown=10".to_string()
    )));
    assert!(pairs.contains(&("spell", "Cure cost=85 MP cooldown=2".to_string())));
    assert!(pairs.contains(&("monster", "1 Touch hp=100.0 mp=34.2 sp=11.7".to_string())));
    assert!(pairs.contains(&("round", "1/85".to_string())));
    assert_eq!(pairs.iter().filter(|(key, _)| *key == "log").count(), 5);
}

#[test]
fn battle_sheet_lists_every_section() {
    let snapshot = snapshot_from_fixture("arena_midfight.htm");
    let sheet = render_text(&snapshot);

    assert!(sheet.contains("HENTAIVERSE BATTLE"));
    assert!(sheet.contains("HP:  23,421 ( 99.0%)"));
    assert!(sheet.contains("OC: 194"));
    assert!(sheet.contains(" ::: Effects :::"));
    assert!(sheet.contains("[x] Shield Bash"));
    assert!(sheet.contains("[ ] Vital Strike"));
    assert!(sheet.contains("Yuki Nagato [Legendary]"));
    assert!(sheet.contains("defeated"));
    assert!(sheet.contains("Stunned (3 turns)"));
    assert!(sheet.contains("[x] p    Spirit Gem"));
    assert!(sheet.contains("   1  Cure"));
    assert!(!sheet.contains(" ::: Warnings :::"));
    assert!(!sheet.contains("Round "));
}

#[test]
fn battle_sheet_reports_warnings_and_round() {
    let truncated = render_text(&snapshot_from_fixture("truncated.htm"));
    assert!(truncated.contains(" ::: Warnings :::"));
    assert!(truncated.contains("  - missing skills table"));
    assert!(truncated.contains("(empty)"));

    let start = render_text(&snapshot_from_fixture("arena_start.htm"));
    assert!(start.contains("Round 1/85"));
}

#[test]
fn verbose_sheet_shows_unbound_quickslots() {
    let snapshot = snapshot_from_fixture("arena_start.htm");
    let verbose = render_text_with_options(&snapshot, TextRenderOptions { verbose: true });
    assert!(verbose.contains("  16  -"));

    let normal = render_text(&snapshot);
    assert!(!normal.contains("  16  -"));
}
